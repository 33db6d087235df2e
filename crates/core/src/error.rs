/// Result alias that carries the custom [`MidiolaError`] type.
pub type Result<T> = std::result::Result<T, MidiolaError>;

/// Common error type for the core crate.
///
/// Only start-up paths produce these. Message translation itself never
/// fails: a message is either applied in full or ignored.
#[derive(Debug, thiserror::Error)]
pub enum MidiolaError {
    /// Free-form error used by the host wiring (MIDI backend failures and
    /// the like) where a dedicated variant would add nothing.
    #[error("{0}")]
    Message(String),
    /// Wrapper around standard IO errors.
    #[error("{0}")]
    Io(#[from] std::io::Error),
    /// A configuration file could not be parsed.
    #[error("invalid configuration file: {0}")]
    Json(#[from] serde_json::Error),
    #[error("invalid mode `{0}`, expected one of: cc7, cc14, nrpn7, nrpn14")]
    InvalidMode(String),
    #[error("excluded MIDI channel {0} must be between 1..16")]
    ChannelOutOfRange(i64),
    #[error("client name must be less than 256 characters (got {0})")]
    ClientNameTooLong(usize),
    #[error("universe count {0} must be between 1..32")]
    UniverseCount(usize),
}

impl MidiolaError {
    /// Creates a new error that simply wraps the provided message.
    pub fn msg<T: Into<String>>(msg: T) -> Self {
        Self::Message(msg.into())
    }
}

impl From<&str> for MidiolaError {
    fn from(value: &str) -> Self {
        Self::msg(value)
    }
}

impl From<String> for MidiolaError {
    fn from(value: String) -> Self {
        Self::Message(value)
    }
}

use std::{fs::File, io, path::PathBuf};

use clap::{ArgAction, Parser};
use midiola_core::{
    BridgeConfig, DmxSink, JsonLinesSink, MidiolaError, Mode, TracingSink, TranslationContext,
};
use midir::{Ignore, MidiInput, MidiInputConnection, MidiInputPort};
use tracing_subscriber::EnvFilter;

const INPUT_PORT_NAME: &str = "input";

type Sink = Box<dyn DmxSink + Send>;

fn main() -> midiola_core::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.list_ports {
        return list_ports();
    }

    let config = cli.bridge_config()?;
    let sink = open_sink(cli.output.as_ref())?;
    run(&config, sink)
}

/// Owned by the MIDI backend thread once the input is connected.
struct Bridge {
    context: TranslationContext,
    sink: Sink,
}

fn on_midi(_timestamp: u64, message: &[u8], bridge: &mut Bridge) {
    bridge.context.process_raw(message, &mut bridge.sink);
}

fn run(config: &BridgeConfig, mut sink: Sink) -> midiola_core::Result<()> {
    let settings = config.settings()?;

    tracing::info!("starting midiola - MIDI to DMX bridge");
    tracing::info!(
        mode = %settings.mode,
        first_universe = settings.universe_base,
        universes = settings.universes,
        channels = %settings.channels,
        "configuration"
    );

    let context = TranslationContext::start(&settings, &mut sink);
    let _connection = connect(config, Bridge { context, sink })?;

    if settings.listen.control_change {
        tracing::info!("listening for MIDI CC");
    }
    if settings.listen.note_on {
        tracing::info!("listening for MIDI note-on");
    }

    // All work happens on the MIDI callback thread from here on.
    loop {
        std::thread::park();
    }
}

fn connect(config: &BridgeConfig, bridge: Bridge) -> midiola_core::Result<MidiInputConnection<Bridge>> {
    let mut input = MidiInput::new(&config.client_name)
        .map_err(|err| MidiolaError::msg(format!("failed to create MIDI input: {err}")))?;
    input.ignore(Ignore::All);

    match &config.port {
        Some(filter) => {
            let port = find_port(&input, filter)?;
            let name = input.port_name(&port).unwrap_or_else(|_| filter.clone());
            let connection = input
                .connect(&port, INPUT_PORT_NAME, on_midi, bridge)
                .map_err(|err| MidiolaError::msg(format!("failed to connect to {name}: {err}")))?;
            tracing::info!(port = %name, "connected MIDI input");
            Ok(connection)
        }
        None => create_virtual(input, bridge),
    }
}

#[cfg(unix)]
fn create_virtual(input: MidiInput, bridge: Bridge) -> midiola_core::Result<MidiInputConnection<Bridge>> {
    use midir::os::unix::VirtualInput;

    let connection = input
        .create_virtual(INPUT_PORT_NAME, on_midi, bridge)
        .map_err(|err| MidiolaError::msg(format!("cannot register virtual input port: {err}")))?;
    tracing::info!(port = INPUT_PORT_NAME, "created virtual MIDI input");
    Ok(connection)
}

#[cfg(not(unix))]
fn create_virtual(_input: MidiInput, _bridge: Bridge) -> midiola_core::Result<MidiInputConnection<Bridge>> {
    Err(MidiolaError::msg(
        "virtual MIDI ports are not supported on this platform, select one with --port",
    ))
}

fn find_port(input: &MidiInput, filter: &str) -> midiola_core::Result<MidiInputPort> {
    let needle = filter.to_lowercase();
    input
        .ports()
        .into_iter()
        .find(|port| {
            input
                .port_name(port)
                .map(|name| name.to_lowercase().contains(&needle))
                .unwrap_or(false)
        })
        .ok_or_else(|| MidiolaError::msg(format!("no MIDI input port matching `{filter}`")))
}

fn list_ports() -> midiola_core::Result<()> {
    let input = MidiInput::new("midiola-list")
        .map_err(|err| MidiolaError::msg(format!("failed to create MIDI input: {err}")))?;
    for (index, port) in input.ports().iter().enumerate() {
        let name = input
            .port_name(port)
            .unwrap_or_else(|_| format!("Unknown Device {index}"));
        println!("{index}: {name}");
    }
    Ok(())
}

fn open_sink(output: Option<&PathBuf>) -> midiola_core::Result<Sink> {
    let sink: Sink = match output {
        None => Box::new(TracingSink),
        Some(path) if path.as_os_str() == "-" => Box::new(JsonLinesSink::new(io::stdout())),
        Some(path) => Box::new(JsonLinesSink::new(File::create(path)?)),
    };
    Ok(sink)
}

/// Maps the `--verbose` level onto a filter; `RUST_LOG` takes precedence.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "off",
        1 => "error",
        2 => "info",
        _ => "debug",
    };
    let _ = tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
        .try_init();
}

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Bridge MIDI control messages to DMX lighting universes",
    long_about = None,
    disable_version_flag = true
)]
struct Cli {
    /// MIDI mode: cc7, cc14, nrpn7 or nrpn14 (default: cc7).
    #[arg(short, long)]
    mode: Option<Mode>,

    /// First universe (default: 1).
    #[arg(short, long)]
    universe: Option<u32>,

    /// Number of consecutive universes to drive, 1..32 (default: 32).
    #[arg(long)]
    universes: Option<usize>,

    /// Listen for MIDI CC (enabled unless only --note is given).
    #[arg(short, long)]
    cc: bool,

    /// Listen for MIDI note-on.
    #[arg(short, long)]
    note: bool,

    /// Do not listen on MIDI channel 1..16. May be given multiple times.
    #[arg(short = 'x', long, value_name = "CHANNEL")]
    exclude: Vec<i64>,

    /// MIDI client name (default: midiola).
    #[arg(short = 'j', long = "jackname", visible_alias = "client-name", value_name = "NAME")]
    client_name: Option<String>,

    /// Connect to the first input port whose name contains NAME instead of
    /// creating a virtual port.
    #[arg(short, long, value_name = "NAME")]
    port: Option<String>,

    /// List available MIDI input ports and exit.
    #[arg(long)]
    list_ports: bool,

    /// Write every transmitted universe as a JSON line to FILE (`-` for stdout).
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// JSON configuration file. Command line options override its values.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbosity: 0 silent, 1 errors, 2 info, 3 debug.
    #[arg(short = 'V', long, default_value_t = 2, value_parser = clap::value_parser!(u8).range(0..=3))]
    verbose: u8,

    /// Show version.
    #[arg(short = 'v', long, action = ArgAction::Version)]
    version: Option<bool>,
}

impl Cli {
    fn bridge_config(&self) -> midiola_core::Result<BridgeConfig> {
        let mut config = match &self.config {
            Some(path) => BridgeConfig::from_json_file(path)?,
            None => BridgeConfig::default(),
        };

        if let Some(mode) = self.mode {
            config.mode = mode;
        }
        if let Some(universe) = self.universe {
            config.universe = universe;
        }
        if let Some(universes) = self.universes {
            config.universes = universes;
        }
        if let Some(name) = &self.client_name {
            config.client_name = name.clone();
        }
        if let Some(port) = &self.port {
            config.port = Some(port.clone());
        }
        config.cc |= self.cc;
        config.note |= self.note;
        config.exclude.extend(self.exclude.iter().copied());

        config.validate()?;
        Ok(config)
    }
}

mod config;
mod general;
mod io;
mod remote;

use clap::Parser;
use log::{error, info, LevelFilter};
use midir::{Ignore, MidiInput};
use std::error::Error;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::channel;
use std::thread;
use std::time::Duration;

use config::{Backend, Config, SharedSettings, DEFAULT_CONFIG_PATH};
use general::instrument::Instrument;
use general::layout::Layout;
use general::player::LyrePlayer;
use general::transpose::Transpose;
use general::{check, forwarder, stdin_handler};
use io::output::{ConsoleOutput, InputSimulator};
use remote::osc_sender::OscOutput;

/// Trace for this crate, info for dependencies such as midir.
const DEFAULT_LOG_FILTER: &str = "lyre_transposer=trace,info";

/// Set by the console thread when the program should stop.
pub static EXIT_FLAG: AtomicBool = AtomicBool::new(false);

#[derive(Parser)]
#[command(name = "lyre-transposer")]
#[command(author, version, about = "Play in-game instruments from a MIDI keyboard")]
struct Args {
    /// Configuration file
    #[arg(long, short = 'c', default_value = DEFAULT_CONFIG_PATH)]
    config: PathBuf,

    /// List instruments, layouts and MIDI input ports, then exit
    #[arg(long)]
    list: bool,

    /// Instrument to play (overrides the config file)
    #[arg(long, short = 'i')]
    instrument: Option<Instrument>,

    /// Key layout (overrides the config file)
    #[arg(long, short = 'l')]
    layout: Option<Layout>,

    /// What to do with notes the instrument cannot play: up, down or ignore
    #[arg(long, short = 't')]
    transpose: Option<Transpose>,

    /// Output backend: console or osc
    #[arg(long, short = 'b')]
    backend: Option<Backend>,

    /// Substring of the MIDI input port name
    #[arg(long, short = 'p')]
    port: Option<String>,
}

impl Args {
    fn apply(&self, config: &mut Config) {
        if let Some(instrument) = self.instrument {
            config.player.instrument = instrument;
        }
        if let Some(layout) = self.layout {
            config.player.layout = layout;
        }
        if let Some(transpose) = self.transpose {
            config.player.transpose = transpose;
        }
        if let Some(backend) = self.backend {
            config.output.backend = backend;
        }
        if let Some(port) = &self.port {
            config.midi.input_port = port.clone();
        }
    }
}

fn main() {
    // Our own modules log at every level; the global max level decides what
    // is printed so 'debug on' can raise it at runtime.
    let from_env = std::env::var_os("RUST_LOG").is_some();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_LOG_FILTER)).init();
    if !from_env {
        log::set_max_level(LevelFilter::Info);
    }

    if let Err(err) = run(Args::parse()) {
        error!("{}", err);
        std::process::exit(1);
    }
}

fn create_output(config: &Config) -> Result<Box<dyn InputSimulator>, Box<dyn Error>> {
    Ok(match config.output.backend {
        Backend::Console => Box::new(ConsoleOutput::new()),
        Backend::Osc => {
            let output = OscOutput::new(&config.output.osc_target)?;
            info!("Sending input events as OSC to {}", output.target_addr());
            Box::new(output)
        }
    })
}

fn run(args: Args) -> Result<(), Box<dyn Error>> {
    let mut config = Config::load(&args.config)?;
    args.apply(&mut config);

    let mut midi_in = MidiInput::new("lyre-transposer input")?;
    midi_in.ignore(Ignore::All);

    if args.list {
        check::print_catalog();
        println!("MIDI input ports:");
        for (i, name) in io::input::input_port_names(&midi_in).iter().enumerate() {
            println!("  {}: {}", i, name);
        }
        return Ok(());
    }

    let settings = SharedSettings::new(config.player.clone());
    let player = LyrePlayer::new(create_output(&config)?);

    let (in_port, in_port_name) = io::input::choose_input_port(&midi_in, &config.midi.input_port)?;
    let (tx, rx) = channel::<Vec<u8>>();
    let conn_in = midi_in.connect(
        &in_port,
        "lyre-transposer-read-input",
        move |_stamp, message, _| {
            let _ = tx.send(message.to_vec());
        },
        (),
    )?;

    let forward_handle = forwarder::spawn_forwarder(player, rx, settings.clone(), config.midi.channel);
    let _stdin_handle = stdin_handler::spawn_stdin_handler(settings.clone());

    check::print_connections_active(&in_port_name, config.output.backend);
    check::print_status(&settings.get());

    while !EXIT_FLAG.load(Ordering::SeqCst) {
        thread::sleep(Duration::from_millis(100));
    }

    info!("Closing connections and exiting...");
    // Dropping the input connection drops the sender, which ends the forwarder.
    let _ = conn_in.close();
    let _ = forward_handle.join();

    Ok(())
}

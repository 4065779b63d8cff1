use log::{info, LevelFilter};
use std::io::stdin;
use std::sync::atomic::Ordering;
use std::thread;

use super::check;
use super::instrument::Instrument;
use super::layout::Layout;
use super::transpose::{clamp_key_offset, Transpose};
use crate::config::SharedSettings;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    SetInstrument(Instrument),
    SetLayout(Layout),
    SetTranspose(Transpose),
    SetKeyOffset(i32),
    Hold(bool),
    Debug(bool),
    Status,
    List,
    Help,
    Exit,
}

fn on_off(arg: &str) -> Option<bool> {
    match arg.to_ascii_lowercase().as_str() {
        "on" | "enable" | "1" | "true" => Some(true),
        "off" | "disable" | "0" | "false" => Some(false),
        _ => None,
    }
}

/// Parse one console line. An empty line means exit.
pub fn parse_command(line: &str) -> Result<Command, String> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(Command::Exit);
    }
    if let Ok(v) = line.parse::<i32>() {
        return Ok(Command::SetKeyOffset(v));
    }

    let (cmd, arg) = match line.split_once(char::is_whitespace) {
        Some((cmd, arg)) => (cmd, arg.trim()),
        None => (line, ""),
    };
    let unrecognized = || format!("Unrecognized command: '{}'. Type 'help' for available commands.", line);

    match cmd.to_ascii_lowercase().as_str() {
        "exit" | "quit" | "q" => Ok(Command::Exit),
        "help" | "h" => Ok(Command::Help),
        "status" | "s" => Ok(Command::Status),
        "list" | "ls" => Ok(Command::List),
        "instrument" | "i" => arg.parse().map(Command::SetInstrument).map_err(|e| e.to_string()),
        "layout" | "l" => arg.parse().map(Command::SetLayout).map_err(|e| e.to_string()),
        "transpose" | "t" => arg.parse().map(Command::SetTranspose).map_err(|e| e.to_string()),
        "key" | "k" => arg
            .parse::<i32>()
            .map(Command::SetKeyOffset)
            .map_err(|_| format!("key needs a number of semitones (got '{}')", arg)),
        "hold" => on_off(arg).map(Command::Hold).ok_or_else(unrecognized),
        "debug" => on_off(arg).map(Command::Debug).ok_or_else(unrecognized),
        _ => Err(unrecognized()),
    }
}

fn print_help() {
    println!("Commands:");
    println!("  instrument <name>       - Switch instrument (see 'list')");
    println!("  layout <name>           - Switch keyboard/gamepad layout");
    println!("  transpose up|down|ignore - What to do with notes the instrument lacks");
    println!("  key <n> / <n>           - Shift every note by n semitones");
    println!("  hold on/off             - Hold keys for the note length instead of tapping");
    println!("  debug on/off            - Enable/Disable verbose logging");
    println!("  status                  - Show current settings");
    println!("  list                    - Show instruments and layouts");
    println!("  help/h                  - Show this help");
    println!("  exit/quit/q             - Exit program");
}

/// Apply a command to the shared settings. Returns `false` once the program
/// should exit.
pub fn apply_command(command: Command, settings: &SharedSettings) -> bool {
    match command {
        Command::SetInstrument(instrument) => {
            settings.update(|s| s.instrument = instrument);
            info!("Instrument set to {}", instrument);
        }
        Command::SetLayout(layout) => {
            settings.update(|s| s.layout = layout);
            info!("Layout set to {}", layout);
        }
        Command::SetTranspose(transpose) => {
            settings.update(|s| s.transpose = transpose);
            info!("Transpose set to {}", transpose);
        }
        Command::SetKeyOffset(offset) => {
            let clamped = settings.update(|s| {
                s.key_offset = clamp_key_offset(offset);
                s.key_offset
            });
            info!("Key offset set to {:+}", clamped);
        }
        Command::Hold(hold) => {
            settings.update(|s| s.hold_notes = hold);
            info!("Hold notes {}", if hold { "enabled" } else { "disabled" });
        }
        Command::Debug(enabled) => {
            log::set_max_level(if enabled { LevelFilter::Trace } else { LevelFilter::Info });
            println!("Debug {}", if enabled { "enabled" } else { "disabled" });
        }
        Command::Status => check::print_status(&settings.get()),
        Command::List => check::print_catalog(),
        Command::Help => print_help(),
        Command::Exit => return false,
    }
    true
}

/// Spawn a thread that reads commands from stdin. Exit commands (and EOF)
/// set the global `EXIT_FLAG`.
pub fn spawn_stdin_handler(settings: SharedSettings) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let stdin = stdin();
        let mut line = String::new();
        loop {
            line.clear();
            match stdin.read_line(&mut line) {
                Ok(0) | Err(_) => break,
                Ok(_) => {}
            }
            match parse_command(&line) {
                Ok(command) => {
                    if !apply_command(command, &settings) {
                        break;
                    }
                }
                Err(message) => println!("{}", message),
            }
        }
        crate::EXIT_FLAG.store(true, Ordering::SeqCst);
    })
}

use log::info;
use midir::{MidiInput, MidiInputPort};
use std::error::Error;
use std::io::{stdin, stdout, Write};

/// Names of all MIDI input ports, in port order.
pub fn input_port_names(midi_in: &MidiInput) -> Vec<String> {
    midi_in
        .ports()
        .iter()
        .map(|p| midi_in.port_name(p).unwrap_or_else(|_| "<unknown>".to_string()))
        .collect()
}

/// Index of the first name containing `wanted`; an empty `wanted` matches nothing.
pub fn find_port(names: &[String], wanted: &str) -> Option<usize> {
    if wanted.trim().is_empty() {
        return None;
    }
    names.iter().position(|name| name.contains(wanted.trim()))
}

/// Select the MIDI input port to play from. Tries a name match first, then
/// the only available port, then asks on the console.
pub fn choose_input_port(midi_in: &MidiInput, wanted: &str) -> Result<(MidiInputPort, String), Box<dyn Error>> {
    let ports = midi_in.ports();
    if ports.is_empty() {
        return Err("no MIDI input port found".into());
    }
    let names = input_port_names(midi_in);

    let idx = if let Some(idx) = find_port(&names, wanted) {
        info!("Choosing input port matching '{}': {}", wanted, names[idx]);
        idx
    } else if ports.len() == 1 {
        info!("Choosing the only available input port: {}", names[0]);
        0
    } else {
        println!("\nAvailable input ports:");
        for (i, name) in names.iter().enumerate() {
            println!("{}: {}", i, name);
        }
        print!("Please select input port: ");
        stdout().flush()?;
        let mut choice = String::new();
        stdin().read_line(&mut choice)?;
        let idx = choice.trim().parse::<usize>()?;
        if idx >= ports.len() {
            return Err("invalid input port selected".into());
        }
        idx
    };

    Ok((ports[idx].clone(), names[idx].clone()))
}

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use super::instrument::Instrument;
use super::layout::{self, Layout};
use super::transpose::note_name;
use crate::config::{Backend, PlayerConfig};

fn print_colored(color: Color, text: &str) {
    let mut stdout = StandardStream::stdout(ColorChoice::Auto);
    let _ = stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_intense(true));
    let _ = writeln!(&mut stdout, "{}", text);
    let _ = stdout.reset();
}

pub fn print_quick_help() {
    print_colored(Color::Blue, "Type 'help' for commands, 'exit' to quit");
}

/// Startup banner once MIDI input and the output backend are connected.
pub fn print_connections_active(port_name: &str, backend: Backend) {
    print_colored(
        Color::Green,
        &format!("Playing from '{}' via {} output | Program started", port_name, backend),
    );
    print_quick_help();
}

/// One-line summary of the current player settings.
pub fn status_line(settings: &PlayerConfig) -> String {
    format!(
        "instrument={} layout={} transpose={} key={:+} hold={}",
        settings.instrument,
        settings.layout,
        settings.transpose,
        settings.key_offset,
        if settings.hold_notes { "on" } else { "off" },
    )
}

pub fn print_status(settings: &PlayerConfig) {
    print_colored(Color::Cyan, &status_line(settings));
}

/// Print every instrument with its playable range and every layout with its
/// low row.
pub fn print_catalog() {
    println!("Instruments:");
    for instrument in Instrument::ALL {
        let notes = instrument.notes();
        let (low, high) = (notes[0], notes[notes.len() - 1]);
        println!(
            "  {:<14} {:<14} {}..{} ({} notes)",
            instrument.name(),
            instrument.description(),
            note_name(low),
            note_name(high),
            notes.len()
        );
    }
    println!("Layouts:");
    for layout in Layout::ALL {
        let row = match (layout::keys(layout), layout::controls(layout)) {
            (Some(keys), _) => keys.iter().take(7).map(|k| k.to_string()).collect::<Vec<_>>().join(" "),
            (None, Some(_)) => "LB / - / RB + D-pad left, up, right, X, Y, B, A".to_string(),
            (None, None) => String::new(),
        };
        println!("  {:<14} {}", layout.name(), row);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general::transpose::Transpose;

    #[test]
    fn status_line_shows_signed_offset() {
        let settings = PlayerConfig {
            instrument: Instrument::VintageLyre,
            layout: Layout::Gamepad,
            transpose: Transpose::Down,
            key_offset: -3,
            hold_notes: true,
        };
        assert_eq!(
            status_line(&settings),
            "instrument=vintage_lyre layout=gamepad transpose=down key=-3 hold=on"
        );
    }
}

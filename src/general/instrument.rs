use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{normalize_name, ParseNameError};

/// C major over three octaves, low row first (C3..B5).
const DEFAULT_NOTES: [i32; 21] = [
    48, 50, 52, 53, 55, 57, 59, // C3 D3 E3 F3 G3 A3 B3
    60, 62, 64, 65, 67, 69, 71, // C4 D4 E4 F4 G4 A4 B4
    72, 74, 76, 77, 79, 81, 83, // C5 D5 E5 F5 G5 A5 B5
];

const VINTAGE_NOTES: [i32; 21] = [
    48, 50, 51, 53, 55, 57, 58, // C3 D3 Eb3 F3 G3 A3 Bb3
    60, 62, 63, 65, 67, 69, 70, // C4 D4 Eb4 F4 G4 A4 Bb4
    72, 73, 75, 77, 79, 80, 82, // C5 Db5 Eb5 F5 G5 Ab5 Bb5
];

/// An in-game instrument. The only thing that differs between instruments is
/// the set of notes they can play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Instrument {
    #[default]
    WindsongLyre,
    FloralZither,
    VintageLyre,
}

impl Instrument {
    pub const ALL: [Instrument; 3] = [
        Instrument::WindsongLyre,
        Instrument::FloralZither,
        Instrument::VintageLyre,
    ];

    /// Ordered (ascending) note table of the instrument.
    pub fn notes(self) -> &'static [i32] {
        match self {
            Instrument::WindsongLyre | Instrument::FloralZither => &DEFAULT_NOTES,
            Instrument::VintageLyre => &VINTAGE_NOTES,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Instrument::WindsongLyre => "windsong_lyre",
            Instrument::FloralZither => "floral_zither",
            Instrument::VintageLyre => "vintage_lyre",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Instrument::WindsongLyre => "Windsong Lyre",
            Instrument::FloralZither => "Floral Zither",
            Instrument::VintageLyre => "Vintage Lyre",
        }
    }
}

/// Note table of `instrument`.
pub fn notes(instrument: Instrument) -> &'static [i32] {
    instrument.notes()
}

impl fmt::Display for Instrument {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Instrument {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Instrument::ALL
            .iter()
            .copied()
            .find(|i| normalize_name(i.name()) == wanted)
            .or(match wanted.as_str() {
                "lyre" => Some(Instrument::WindsongLyre),
                "zither" => Some(Instrument::FloralZither),
                "oldlyre" | "vintage" => Some(Instrument::VintageLyre),
                _ => None,
            })
            .ok_or_else(|| ParseNameError::new("instrument", s))
    }
}

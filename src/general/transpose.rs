use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{normalize_name, ParseNameError};

pub const KEY_OFFSET_MIN: i32 = -27;
pub const KEY_OFFSET_MAX: i32 = 27;

const OCTAVE: i32 = 12;

const NOTE_NAMES: [&str; 12] = ["C", "C#", "D", "D#", "E", "F", "F#", "G", "G#", "A", "A#", "B"];

/// What to do with a note the instrument cannot play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Transpose {
    /// Leave the note alone; it is dropped if it has no key.
    #[default]
    Ignore,
    Up,
    Down,
}

impl Transpose {
    pub fn name(self) -> &'static str {
        match self {
            Transpose::Ignore => "ignore",
            Transpose::Up => "up",
            Transpose::Down => "down",
        }
    }
}

impl fmt::Display for Transpose {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Transpose {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match normalize_name(s).as_str() {
            "ignore" | "off" | "none" => Ok(Transpose::Ignore),
            "up" | "+" => Ok(Transpose::Up),
            "down" | "-" => Ok(Transpose::Down),
            _ => Err(ParseNameError::new("transpose direction", s)),
        }
    }
}

/// Move `note` into the playable set `notes` (ascending).
///
/// Notes outside `[min, max]` are shifted by whole octaves; a note that lands
/// between two playable notes is nudged one semitone in `direction` until it
/// hits one. `Transpose::Ignore` returns the note untouched.
///
/// `notes` must span at least an octave, otherwise octave shifting can jump
/// back and forth over the range forever.
pub fn transpose_note(notes: &[i32], note: i32, direction: Transpose) -> i32 {
    if direction == Transpose::Ignore {
        return note;
    }
    let (Some(&min), Some(&max)) = (notes.first(), notes.last()) else {
        return note;
    };

    let mut note = note;
    loop {
        if notes.contains(&note) {
            return note;
        }
        if note < min {
            note += OCTAVE;
        } else if note > max {
            note -= OCTAVE;
        } else {
            note += match direction {
                Transpose::Up => 1,
                Transpose::Down => -1,
                Transpose::Ignore => return note,
            };
        }
    }
}

pub fn clamp_key_offset(value: i32) -> i32 {
    value.clamp(KEY_OFFSET_MIN, KEY_OFFSET_MAX)
}

/// Shift a note by the player's key offset (in semitones).
pub fn apply_key_offset(note: i32, offset: i32) -> i32 {
    note + clamp_key_offset(offset)
}

/// Note name with octave, e.g. 60 -> "C4".
pub fn note_name(note: i32) -> String {
    let index = note.rem_euclid(OCTAVE) as usize;
    let octave = note.div_euclid(OCTAVE) - 1;
    format!("{}{}", NOTE_NAMES[index], octave)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::general::instrument::Instrument;

    const LYRE: &[i32] = &[
        48, 50, 52, 53, 55, 57, 59, 60, 62, 64, 65, 67, 69, 71, 72, 74, 76, 77, 79, 81, 83,
    ];

    #[test]
    fn members_are_unchanged() {
        for &n in LYRE {
            assert_eq!(transpose_note(LYRE, n, Transpose::Up), n);
            assert_eq!(transpose_note(LYRE, n, Transpose::Down), n);
        }
    }

    #[test]
    fn ignore_never_changes_the_note() {
        for n in 0..128 {
            assert_eq!(transpose_note(LYRE, n, Transpose::Ignore), n);
        }
    }

    #[test]
    fn octave_shift_into_range() {
        // C2 -> C3, C7 -> C5
        assert_eq!(transpose_note(LYRE, 36, Transpose::Up), 48);
        assert_eq!(transpose_note(LYRE, 96, Transpose::Down), 72);
        // B6 -> B5
        assert_eq!(transpose_note(LYRE, 95, Transpose::Up), 83);
    }

    #[test]
    fn semitone_step_follows_direction() {
        // C#4
        assert_eq!(transpose_note(LYRE, 61, Transpose::Up), 62);
        assert_eq!(transpose_note(LYRE, 61, Transpose::Down), 60);
        // C#2 is shifted an octave, then stepped
        assert_eq!(transpose_note(LYRE, 37, Transpose::Up), 50);
        assert_eq!(transpose_note(LYRE, 37, Transpose::Down), 48);
    }

    #[test]
    fn every_midi_note_converges_for_builtin_instruments() {
        for instrument in Instrument::ALL {
            let notes = instrument.notes();
            for n in 0..128 {
                for direction in [Transpose::Up, Transpose::Down] {
                    let t = transpose_note(notes, n, direction);
                    assert!(notes.contains(&t), "{} {} -> {}", instrument, n, t);
                    // at most one semitone of drift on top of whole octaves
                    let drift = (t - n).rem_euclid(OCTAVE);
                    assert!(matches!(drift, 0 | 1 | 11), "{} {} -> {}", instrument, n, t);
                }
            }
        }
    }

    #[test]
    fn empty_table_is_a_no_op() {
        assert_eq!(transpose_note(&[], 61, Transpose::Up), 61);
    }

    #[test]
    fn key_offset_is_clamped() {
        assert_eq!(apply_key_offset(60, 5), 65);
        assert_eq!(apply_key_offset(60, -100), 60 + KEY_OFFSET_MIN);
        assert_eq!(apply_key_offset(60, 100), 60 + KEY_OFFSET_MAX);
    }

    #[test]
    fn note_names() {
        assert_eq!(note_name(60), "C4");
        assert_eq!(note_name(61), "C#4");
        assert_eq!(note_name(0), "C-1");
        assert_eq!(note_name(-1), "B-2");
    }
}

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{normalize_name, ParseNameError};

/// Windows virtual key codes of the keys used by the instrument rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum VirtualKey {
    A = 0x41,
    B = 0x42,
    C = 0x43,
    D = 0x44,
    E = 0x45,
    F = 0x46,
    G = 0x47,
    H = 0x48,
    I = 0x49,
    J = 0x4A,
    K = 0x4B,
    L = 0x4C,
    M = 0x4D,
    N = 0x4E,
    O = 0x4F,
    P = 0x50,
    Q = 0x51,
    R = 0x52,
    S = 0x53,
    T = 0x54,
    U = 0x55,
    V = 0x56,
    W = 0x57,
    X = 0x58,
    Y = 0x59,
    Z = 0x5A,
    /// `;:` on US keyboards
    Oem1 = 0xBA,
    OemComma = 0xBC,
    OemPeriod = 0xBE,
    /// `'"` on US keyboards
    Oem7 = 0xDE,
}

impl VirtualKey {
    pub fn code(self) -> u16 {
        self as u16
    }
}

impl fmt::Display for VirtualKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            VirtualKey::Oem1 => f.write_str(";"),
            VirtualKey::OemComma => f.write_str(","),
            VirtualKey::OemPeriod => f.write_str("."),
            VirtualKey::Oem7 => f.write_str("'"),
            // Letters map directly to their ASCII code.
            key => write!(f, "{}", char::from(key.code() as u8)),
        }
    }
}

bitflags::bitflags! {
    /// XInput button bits.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct GamepadControl: u32 {
        const DPAD_UP = 0x0001;
        const DPAD_DOWN = 0x0002;
        const DPAD_LEFT = 0x0004;
        const DPAD_RIGHT = 0x0008;
        const START = 0x0010;
        const BACK = 0x0020;
        const LEFT_THUMB = 0x0040;
        const RIGHT_THUMB = 0x0080;
        const LEFT_SHOULDER = 0x0100;
        const RIGHT_SHOULDER = 0x0200;
        const A = 0x1000;
        const B = 0x2000;
        const X = 0x4000;
        const Y = 0x8000;
    }
}

impl GamepadControl {
    /// Row selectors; the low row is played with LB held, the top row with RB.
    pub const SHOULDERS: GamepadControl = GamepadControl::LEFT_SHOULDER.union(GamepadControl::RIGHT_SHOULDER);
}

use VirtualKey::*;

const QWERTY: [VirtualKey; 21] = [
    Z, X, C, V, B, N, M,
    A, S, D, F, G, H, J,
    Q, W, E, R, T, Y, U,
];

const QWERTZ: [VirtualKey; 21] = [
    Y, X, C, V, B, N, M,
    A, S, D, F, G, H, J,
    Q, W, E, R, T, Z, U,
];

const AZERTY: [VirtualKey; 21] = [
    W, X, C, V, B, N, OemComma,
    Q, S, D, F, G, H, J,
    A, Z, E, R, T, Y, U,
];

const DVORAK: [VirtualKey; 21] = [
    Oem1, Q, J, K, X, B, M,
    A, O, E, U, I, D, H,
    Oem7, OemComma, OemPeriod, P, Y, F, G,
];

const COLEMAK: [VirtualKey; 21] = [
    Z, X, C, V, B, K, M,
    A, R, S, T, D, H, N,
    Q, W, F, P, G, J, L,
];

const fn row(shoulder: GamepadControl) -> [GamepadControl; 7] {
    [
        shoulder.union(GamepadControl::DPAD_LEFT),
        shoulder.union(GamepadControl::DPAD_UP),
        shoulder.union(GamepadControl::DPAD_RIGHT),
        shoulder.union(GamepadControl::X),
        shoulder.union(GamepadControl::Y),
        shoulder.union(GamepadControl::B),
        shoulder.union(GamepadControl::A),
    ]
}

const LOW_ROW: [GamepadControl; 7] = row(GamepadControl::LEFT_SHOULDER);
const MIDDLE_ROW: [GamepadControl; 7] = row(GamepadControl::empty());
const TOP_ROW: [GamepadControl; 7] = row(GamepadControl::RIGHT_SHOULDER);

const GAMEPAD: [GamepadControl; 21] = [
    LOW_ROW[0], LOW_ROW[1], LOW_ROW[2], LOW_ROW[3], LOW_ROW[4], LOW_ROW[5], LOW_ROW[6],
    MIDDLE_ROW[0], MIDDLE_ROW[1], MIDDLE_ROW[2], MIDDLE_ROW[3], MIDDLE_ROW[4], MIDDLE_ROW[5], MIDDLE_ROW[6],
    TOP_ROW[0], TOP_ROW[1], TOP_ROW[2], TOP_ROW[3], TOP_ROW[4], TOP_ROW[5], TOP_ROW[6],
];

/// Physical input layout used to play the instrument rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Layout {
    #[default]
    Qwerty,
    Qwertz,
    Azerty,
    Dvorak,
    Colemak,
    Gamepad,
}

impl Layout {
    pub const ALL: [Layout; 6] = [
        Layout::Qwerty,
        Layout::Qwertz,
        Layout::Azerty,
        Layout::Dvorak,
        Layout::Colemak,
        Layout::Gamepad,
    ];

    pub fn is_gamepad(self) -> bool {
        self == Layout::Gamepad
    }

    pub fn name(self) -> &'static str {
        match self {
            Layout::Qwerty => "qwerty",
            Layout::Qwertz => "qwertz",
            Layout::Azerty => "azerty",
            Layout::Dvorak => "dvorak",
            Layout::Colemak => "colemak",
            Layout::Gamepad => "gamepad",
        }
    }
}

/// Keyboard table of `layout`, `None` for the gamepad layout.
pub fn keys(layout: Layout) -> Option<&'static [VirtualKey]> {
    match layout {
        Layout::Qwerty => Some(&QWERTY),
        Layout::Qwertz => Some(&QWERTZ),
        Layout::Azerty => Some(&AZERTY),
        Layout::Dvorak => Some(&DVORAK),
        Layout::Colemak => Some(&COLEMAK),
        Layout::Gamepad => None,
    }
}

/// Gamepad table of `layout`, `None` for keyboard layouts.
pub fn controls(layout: Layout) -> Option<&'static [GamepadControl]> {
    match layout {
        Layout::Gamepad => Some(&GAMEPAD),
        _ => None,
    }
}

impl fmt::Display for Layout {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Layout {
    type Err = ParseNameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = normalize_name(s);
        Layout::ALL
            .iter()
            .copied()
            .find(|l| l.name() == wanted)
            .or(match wanted.as_str() {
                "joystick" | "controller" | "xbox" => Some(Layout::Gamepad),
                _ => None,
            })
            .ok_or_else(|| ParseNameError::new("layout", s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn keyboard_layouts_have_distinct_keys() {
        for layout in Layout::ALL.iter().filter(|l| !l.is_gamepad()) {
            let table = keys(*layout).unwrap();
            assert_eq!(table.len(), 21);
            let unique: HashSet<_> = table.iter().collect();
            assert_eq!(unique.len(), 21, "{} repeats a key", layout);
        }
    }

    #[test]
    fn gamepad_rows_use_shoulder_selectors() {
        let table = controls(Layout::Gamepad).unwrap();
        assert_eq!(table.len(), 21);
        assert!(table[..7].iter().all(|c| c.contains(GamepadControl::LEFT_SHOULDER)));
        assert!(table[7..14].iter().all(|c| !c.intersects(GamepadControl::SHOULDERS)));
        assert!(table[14..].iter().all(|c| c.contains(GamepadControl::RIGHT_SHOULDER)));
        let unique: HashSet<_> = table.iter().collect();
        assert_eq!(unique.len(), 21);
    }

    #[test]
    fn modality_tables_are_exclusive() {
        for layout in Layout::ALL {
            assert_eq!(keys(layout).is_some(), !layout.is_gamepad());
            assert_eq!(controls(layout).is_some(), layout.is_gamepad());
        }
    }

    #[test]
    fn virtual_key_codes() {
        assert_eq!(VirtualKey::A.code(), 0x41);
        assert_eq!(VirtualKey::Z.code(), 0x5A);
        assert_eq!(VirtualKey::OemComma.code(), 0xBC);
        assert_eq!(VirtualKey::Q.to_string(), "Q");
        assert_eq!(VirtualKey::Oem1.to_string(), ";");
    }

    #[test]
    fn parse_names() {
        assert_eq!("QWERTZ".parse(), Ok(Layout::Qwertz));
        assert_eq!("joystick".parse(), Ok(Layout::Gamepad));
        assert!("workman".parse::<Layout>().is_err());
    }
}

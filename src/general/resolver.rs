use super::instrument::{notes, Instrument};
use super::layout::{self, GamepadControl, Layout, VirtualKey};

/// Look up the key at the position `note` has in `notes`.
///
/// Tables of different lengths fail closed: a note past the end of `keys`
/// has no key.
pub fn lookup<K: Copy>(keys: &[K], notes: &[i32], note: i32) -> Option<K> {
    let index = notes.iter().position(|&n| n == note)?;
    keys.get(index).copied()
}

/// Keyboard key for `note`; `None` for unplayable notes and the gamepad layout.
pub fn try_get_key(layout: Layout, instrument: Instrument, note: i32) -> Option<VirtualKey> {
    lookup(layout::keys(layout)?, notes(instrument), note)
}

/// Gamepad control for `note`; `None` for unplayable notes and keyboard layouts.
pub fn try_get_control(layout: Layout, instrument: Instrument, note: i32) -> Option<GamepadControl> {
    lookup(layout::controls(layout)?, notes(instrument), note)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_note_resolves_to_its_position() {
        for instrument in Instrument::ALL {
            for layout in Layout::ALL {
                for (i, &note) in instrument.notes().iter().enumerate() {
                    if let Some(keys) = layout::keys(layout) {
                        assert_eq!(try_get_key(layout, instrument, note), Some(keys[i]));
                        assert_eq!(try_get_control(layout, instrument, note), None);
                    }
                    if let Some(controls) = layout::controls(layout) {
                        assert_eq!(try_get_control(layout, instrument, note), Some(controls[i]));
                        assert_eq!(try_get_key(layout, instrument, note), None);
                    }
                }
            }
        }
    }

    #[test]
    fn unplayable_notes_have_no_key() {
        // C#4 is not on the Windsong Lyre
        assert_eq!(try_get_key(Layout::Qwerty, Instrument::WindsongLyre, 61), None);
        assert_eq!(try_get_control(Layout::Gamepad, Instrument::WindsongLyre, 61), None);
        assert_eq!(try_get_key(Layout::Qwerty, Instrument::WindsongLyre, 0), None);
    }

    #[test]
    fn known_keys() {
        assert_eq!(try_get_key(Layout::Qwerty, Instrument::WindsongLyre, 48), Some(VirtualKey::Z));
        assert_eq!(try_get_key(Layout::Qwerty, Instrument::WindsongLyre, 60), Some(VirtualKey::A));
        assert_eq!(try_get_key(Layout::Qwertz, Instrument::WindsongLyre, 81), Some(VirtualKey::Z));
        // Eb4 on the Vintage Lyre sits where E4 sits on the Windsong Lyre
        assert_eq!(try_get_key(Layout::Qwerty, Instrument::VintageLyre, 63), Some(VirtualKey::D));
        assert_eq!(
            try_get_control(Layout::Gamepad, Instrument::WindsongLyre, 72),
            Some(GamepadControl::RIGHT_SHOULDER | GamepadControl::DPAD_LEFT)
        );
    }

    #[test]
    fn short_key_table_fails_closed() {
        let notes = [60, 62, 64, 65];
        let keys = [VirtualKey::A, VirtualKey::S];
        assert_eq!(lookup(&keys, &notes, 62), Some(VirtualKey::S));
        assert_eq!(lookup(&keys, &notes, 64), None);
        assert_eq!(lookup(&keys, &notes, 63), None);
    }
}

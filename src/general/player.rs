use log::trace;
use std::thread;
use std::time::Duration;

use super::instrument::Instrument;
use super::layout::{GamepadControl, Layout};
use super::resolver::{try_get_control, try_get_key};
use super::transpose::note_name;
use crate::io::output::InputSimulator;

/// How long a gamepad control is held before it is released again.
pub const GAMEPAD_HOLD: Duration = Duration::from_millis(20);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteAction {
    Down,
    Up,
    Press,
}

/// Turns notes into simulated key or gamepad input.
///
/// The player itself keeps no note state; every call resolves the note
/// against the given layout and instrument and forwards the result to the
/// simulator. Notes without a key are dropped.
pub struct LyrePlayer<S> {
    simulator: S,
    hold: Duration,
}

impl<S: InputSimulator> LyrePlayer<S> {
    pub fn new(simulator: S) -> Self {
        Self { simulator, hold: GAMEPAD_HOLD }
    }

    #[cfg(test)]
    pub fn simulator(&self) -> &S {
        &self.simulator
    }

    pub fn note_down(&mut self, note: i32, layout: Layout, instrument: Instrument) {
        self.interact(note, layout, instrument, NoteAction::Down);
    }

    pub fn note_up(&mut self, note: i32, layout: Layout, instrument: Instrument) {
        self.interact(note, layout, instrument, NoteAction::Up);
    }

    pub fn play_note(&mut self, note: i32, layout: Layout, instrument: Instrument) {
        self.interact(note, layout, instrument, NoteAction::Press);
    }

    pub fn interact(&mut self, note: i32, layout: Layout, instrument: Instrument, action: NoteAction) {
        if layout.is_gamepad() {
            self.interact_gamepad(note, layout, instrument, action);
        } else {
            self.interact_keyboard(note, layout, instrument, action);
        }
    }

    fn interact_keyboard(&mut self, note: i32, layout: Layout, instrument: Instrument, action: NoteAction) {
        let Some(key) = try_get_key(layout, instrument, note) else {
            trace!("{} ({}) has no key on {} / {}", note_name(note), note, instrument, layout);
            return;
        };
        trace!("{:?} {} -> {}", action, note_name(note), key);
        match action {
            NoteAction::Down => self.simulator.key_down(key),
            NoteAction::Up => self.simulator.key_up(key),
            NoteAction::Press => self.simulator.key_press(key),
        }
    }

    fn interact_gamepad(&mut self, note: i32, layout: Layout, instrument: Instrument, action: NoteAction) {
        let Some(control) = try_get_control(layout, instrument, note) else {
            trace!("{} ({}) has no control on {} / {}", note_name(note), note, instrument, layout);
            return;
        };
        trace!("{:?} {} -> {:?}", action, note_name(note), control);
        match action {
            NoteAction::Down => {
                self.simulator.release_control(GamepadControl::SHOULDERS);
                self.simulator.set_control(control);
                thread::sleep(self.hold);
                // The row selector is only needed while the button goes down.
                self.simulator.release_control(GamepadControl::SHOULDERS);
            }
            NoteAction::Up => {
                self.simulator.release_control(control & !GamepadControl::SHOULDERS);
            }
            NoteAction::Press => {
                self.simulator.release_control(GamepadControl::SHOULDERS);
                self.simulator.set_control(control);
                thread::sleep(self.hold);
                self.simulator.release_control(control);
            }
        }
    }
}

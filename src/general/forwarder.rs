use log::{debug, trace};
use std::collections::HashMap;
use std::sync::mpsc::Receiver;
use std::thread;

use super::instrument::Instrument;
use super::layout::Layout;
use super::player::LyrePlayer;
use super::transpose::{apply_key_offset, note_name, transpose_note};
use crate::config::SharedSettings;
use crate::io::output::InputSimulator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteEvent {
    On(i32),
    Off(i32),
}

/// Decode a raw MIDI message into a note event. Note On with velocity 0 is a
/// Note Off. `channel` is 1-based; `None` accepts every channel.
pub fn note_event(msg: &[u8], channel: Option<u8>) -> Option<NoteEvent> {
    let (&status, data) = msg.split_first()?;
    if let Some(channel) = channel {
        if (status & 0x0F) + 1 != channel {
            return None;
        }
    }
    let note = i32::from(*data.first()?);
    match status & 0xF0 {
        0x90 if data.get(1).copied().unwrap_or(0) > 0 => Some(NoteEvent::On(note)),
        0x90 | 0x80 => Some(NoteEvent::Off(note)),
        _ => None,
    }
}

/// What a held note was pressed as, so the release hits the same key even
/// if the settings change in between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct HeldNote {
    note: i32,
    layout: Layout,
    instrument: Instrument,
}

/// Applies the shared settings to note events and plays them, remembering
/// notes held down in hold mode.
pub struct Forwarder<S> {
    player: LyrePlayer<S>,
    settings: SharedSettings,
    held: HashMap<i32, HeldNote>,
}

impl<S: InputSimulator> Forwarder<S> {
    pub fn new(player: LyrePlayer<S>, settings: SharedSettings) -> Self {
        Self { player, settings, held: HashMap::new() }
    }

    pub fn handle_event(&mut self, event: NoteEvent) {
        match event {
            NoteEvent::On(raw) => {
                let current = self.settings.get();
                let shifted = apply_key_offset(raw, current.key_offset);
                let note = transpose_note(current.instrument.notes(), shifted, current.transpose);
                trace!("{:?}: {} -> {}", event, note_name(raw), note_name(note));

                if !current.hold_notes {
                    self.player.play_note(note, current.layout, current.instrument);
                    return;
                }
                // A repeated Note On without Note Off releases the old key first.
                self.release(raw);
                self.player.note_down(note, current.layout, current.instrument);
                self.held.insert(raw, HeldNote { note, layout: current.layout, instrument: current.instrument });
            }
            NoteEvent::Off(raw) => self.release(raw),
        }
    }

    fn release(&mut self, raw: i32) {
        if let Some(held) = self.held.remove(&raw) {
            trace!("release {} -> {}", note_name(raw), note_name(held.note));
            self.player.note_up(held.note, held.layout, held.instrument);
        }
    }

    /// Release every note still held down.
    pub fn release_all(&mut self) {
        let mut raws: Vec<i32> = self.held.keys().copied().collect();
        raws.sort_unstable();
        for raw in raws {
            self.release(raw);
        }
    }
}

/// Spawn a forwarding thread that owns the player and listens on `rx`.
/// Each incoming raw MIDI message is decoded, shifted by the current key
/// offset, transposed and played. The thread ends when every sender is gone,
/// releasing whatever is still held.
pub fn spawn_forwarder<S: InputSimulator + 'static>(
    player: LyrePlayer<S>,
    rx: Receiver<Vec<u8>>,
    settings: SharedSettings,
    channel: Option<u8>,
) -> thread::JoinHandle<()> {
    thread::spawn(move || {
        let mut forwarder = Forwarder::new(player, settings);
        for msg in rx {
            if let Some(event) = note_event(&msg, channel) {
                forwarder.handle_event(event);
            }
        }
        forwarder.release_all();
        debug!("MIDI receiver closed, forwarder exiting");
    })
}

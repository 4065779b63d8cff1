use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

use crate::general::layout::{GamepadControl, VirtualKey};

/// Keyboard side of an input simulation backend.
pub trait KeyboardSimulator {
    fn key_down(&mut self, key: VirtualKey);
    fn key_up(&mut self, key: VirtualKey);
    fn key_press(&mut self, key: VirtualKey);
}

/// Gamepad side of an input simulation backend. Controls are bitmasks; set
/// and release only touch the given bits.
pub trait GamepadSimulator {
    fn set_control(&mut self, control: GamepadControl);
    fn release_control(&mut self, control: GamepadControl);
}

/// A backend able to simulate both modalities, movable to the forwarder thread.
pub trait InputSimulator: KeyboardSimulator + GamepadSimulator + Send {}

impl<T: KeyboardSimulator + GamepadSimulator + Send> InputSimulator for T {}

impl<T: KeyboardSimulator + ?Sized> KeyboardSimulator for Box<T> {
    fn key_down(&mut self, key: VirtualKey) {
        (**self).key_down(key)
    }
    fn key_up(&mut self, key: VirtualKey) {
        (**self).key_up(key)
    }
    fn key_press(&mut self, key: VirtualKey) {
        (**self).key_press(key)
    }
}

impl<T: GamepadSimulator + ?Sized> GamepadSimulator for Box<T> {
    fn set_control(&mut self, control: GamepadControl) {
        (**self).set_control(control)
    }
    fn release_control(&mut self, control: GamepadControl) {
        (**self).release_control(control)
    }
}

/// Dry-run backend: prints every simulated input to the terminal instead of
/// injecting it.
pub struct ConsoleOutput {
    stdout: StandardStream,
    pad_state: GamepadControl,
}

impl ConsoleOutput {
    pub fn new() -> Self {
        Self {
            stdout: StandardStream::stdout(ColorChoice::Auto),
            pad_state: GamepadControl::empty(),
        }
    }

    fn print(&mut self, color: Color, action: &str, what: &str) {
        let _ = self.stdout.set_color(ColorSpec::new().set_fg(Some(color)).set_bold(true));
        let _ = write!(&mut self.stdout, "{:>8}", action);
        let _ = self.stdout.reset();
        let _ = writeln!(&mut self.stdout, " {}", what);
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyboardSimulator for ConsoleOutput {
    fn key_down(&mut self, key: VirtualKey) {
        self.print(Color::Green, "down", &format!("{} (0x{:02X})", key, key.code()));
    }

    fn key_up(&mut self, key: VirtualKey) {
        self.print(Color::Yellow, "up", &format!("{} (0x{:02X})", key, key.code()));
    }

    fn key_press(&mut self, key: VirtualKey) {
        self.print(Color::Cyan, "press", &format!("{} (0x{:02X})", key, key.code()));
    }
}

impl GamepadSimulator for ConsoleOutput {
    fn set_control(&mut self, control: GamepadControl) {
        self.pad_state |= control;
        let line = format!("{:?} -> {:#06x}", control, self.pad_state.bits());
        self.print(Color::Green, "set", &line);
    }

    fn release_control(&mut self, control: GamepadControl) {
        self.pad_state &= !control;
        let line = format!("{:?} -> {:#06x}", control, self.pad_state.bits());
        self.print(Color::Yellow, "release", &line);
    }
}

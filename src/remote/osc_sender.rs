use log::{debug, warn};
use rosc::{encoder, OscMessage, OscPacket, OscType};
use std::error::Error;
use std::net::UdpSocket;

use crate::general::layout::{GamepadControl, VirtualKey};
use crate::io::output::{GamepadSimulator, KeyboardSimulator};

pub const DEFAULT_TARGET: &str = "127.0.0.1:9000";

pub const KEY_DOWN_PATH: &str = "/key/down";
pub const KEY_UP_PATH: &str = "/key/up";
pub const KEY_PRESS_PATH: &str = "/key/press";
pub const GAMEPAD_SET_PATH: &str = "/gamepad/set";
pub const GAMEPAD_RELEASE_PATH: &str = "/gamepad/release";

/// Forwards simulated input as OSC messages to an injector listening on UDP.
///
/// Each key event carries the virtual key code, each gamepad event the
/// control bitmask, as a single int argument.
pub struct OscOutput {
    socket: UdpSocket,
    target_addr: String,
}

impl OscOutput {
    pub fn new(target_addr: &str) -> Result<Self, Box<dyn Error>> {
        let socket = UdpSocket::bind("127.0.0.1:0")?;
        let target = if target_addr.trim().is_empty() {
            DEFAULT_TARGET.to_string()
        } else {
            target_addr.trim().to_string()
        };
        socket.connect(&target)?;
        debug!("OSC output bound on {:?} -> {}", socket.local_addr().ok(), target);

        Ok(OscOutput { socket, target_addr: target })
    }

    pub fn target_addr(&self) -> &str {
        &self.target_addr
    }

    fn send(&self, addr: &str, value: i32) {
        let packet = OscPacket::Message(OscMessage { addr: addr.to_string(), args: vec![OscType::Int(value)] });
        let buf = match encoder::encode(&packet) {
            Ok(buf) => buf,
            Err(e) => {
                warn!("[OSC] failed to encode {}: {}", addr, e);
                return;
            }
        };
        match self.socket.send(&buf) {
            Ok(bytes_sent) => debug!("[OSC] Sent {} bytes to {}: {} {}", bytes_sent, self.target_addr, addr, value),
            Err(e) => warn!("[OSC] Failed to send to {}: {}", self.target_addr, e),
        }
    }
}

impl KeyboardSimulator for OscOutput {
    fn key_down(&mut self, key: VirtualKey) {
        self.send(KEY_DOWN_PATH, key.code() as i32);
    }

    fn key_up(&mut self, key: VirtualKey) {
        self.send(KEY_UP_PATH, key.code() as i32);
    }

    fn key_press(&mut self, key: VirtualKey) {
        self.send(KEY_PRESS_PATH, key.code() as i32);
    }
}

impl GamepadSimulator for OscOutput {
    fn set_control(&mut self, control: GamepadControl) {
        self.send(GAMEPAD_SET_PATH, control.bits() as i32);
    }

    fn release_control(&mut self, control: GamepadControl) {
        self.send(GAMEPAD_RELEASE_PATH, control.bits() as i32);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rosc::decoder;
    use std::time::Duration;

    fn receive(socket: &UdpSocket) -> OscMessage {
        let mut buf = [0u8; decoder::MTU];
        let size = socket.recv(&mut buf).unwrap();
        match decoder::decode_udp(&buf[..size]).unwrap().1 {
            OscPacket::Message(msg) => msg,
            other => panic!("expected a message, got {:?}", other),
        }
    }

    #[test]
    fn sends_key_and_gamepad_events() {
        let listener = UdpSocket::bind("127.0.0.1:0").unwrap();
        listener.set_read_timeout(Some(Duration::from_secs(2))).unwrap();
        let target = listener.local_addr().unwrap().to_string();

        let mut output = OscOutput::new(&target).unwrap();
        assert_eq!(output.target_addr(), target);

        output.key_press(VirtualKey::Z);
        let msg = receive(&listener);
        assert_eq!(msg.addr, KEY_PRESS_PATH);
        assert_eq!(msg.args, vec![OscType::Int(0x5A)]);

        output.release_control(GamepadControl::SHOULDERS);
        let msg = receive(&listener);
        assert_eq!(msg.addr, GAMEPAD_RELEASE_PATH);
        assert_eq!(msg.args, vec![OscType::Int(0x0300)]);
    }
}

//! I/O port numbering and port read strategies.
//!
//! Port numbers `0x00..=0xFF` address external data memory (`MOVX`). The
//! chip's own ports live above that range.

use crate::settings::PortHandling;

pub const P0: u16 = 0x100;
pub const P1: u16 = 0x101;
pub const P2: u16 = 0x102;
pub const P4: u16 = 0x104;
pub const P5: u16 = 0x105;
pub const P6: u16 = 0x106;
pub const P7: u16 = 0x107;
pub const T0: u16 = 0x110;
pub const T1: u16 = 0x111;
pub const BUS: u16 = 0x120;

/// Port number of `Pn`
pub fn port(n: u8) -> u16 {
    P0 + n as u16
}

/// Port number of test input `Tn`
pub fn test_pin(n: u8) -> u16 {
    T0 + (n & 0x01) as u16
}

/// Resolves what the core sees when it reads a port.
pub trait PortAccess {
    /// `input` is the value returned by the bus, `latch` the last value the
    /// program wrote to the same port (0xFF after reset).
    fn read(&self, port: u16, input: u8, latch: u8) -> u8;
}

/// Port reads return whatever the bus drives
pub struct DirectPorts;

impl PortAccess for DirectPorts {
    fn read(&self, _port: u16, input: u8, _latch: u8) -> u8 {
        input
    }
}

/// P1 and P2 are quasi-bidirectional: a pin written low reads low whatever
/// the external device drives
pub struct LatchedPorts;

impl PortAccess for LatchedPorts {
    fn read(&self, port: u16, input: u8, latch: u8) -> u8 {
        match port {
            P1 | P2 => input & latch,
            _ => input,
        }
    }
}

impl PortHandling {
    pub fn strategy(&self) -> Box<dyn PortAccess> {
        match self {
            PortHandling::Direct => Box::new(DirectPorts),
            PortHandling::Latched => Box::new(LatchedPorts),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_port_numbers() {
        assert_eq!(port(1), P1);
        assert_eq!(port(2), P2);
        assert_eq!(port(4), P4);
        assert_eq!(port(7), P7);
        assert_eq!(test_pin(0), T0);
        assert_eq!(test_pin(1), T1);
    }

    #[test]
    fn test_direct_ports() {
        let ports = PortHandling::Direct.strategy();
        assert_eq!(ports.read(P1, 0xF0, 0x0F), 0xF0);
        assert_eq!(ports.read(BUS, 0x12, 0x00), 0x12);
    }

    #[test]
    fn test_latched_ports() {
        let ports = PortHandling::Latched.strategy();
        assert_eq!(ports.read(P1, 0xF0, 0x3C), 0x30);
        assert_eq!(ports.read(P2, 0xFF, 0xFF), 0xFF);
        assert_eq!(ports.read(P4, 0x0F, 0x00), 0x0F);
        assert_eq!(ports.read(0x42, 0x99, 0x00), 0x99);
    }
}

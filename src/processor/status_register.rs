use std::convert::From;

use bincode::{Decode, Encode};

use crate::utils;

/// Bit 3 of the PSW is unused and reads as 1 after reset
pub const PSW_RESET_VALUE: u8 = 0x08;

const STACK_BITS: u8 = 0x07;

/// Program Status Word.
///
/// The upper nibble holds the flags, which are saved together with the PC
/// high nibble on every `CALL` and interrupt. The lower 3 bits mirror the
/// stack level.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq, Encode, Decode)]
pub struct StatusRegister {
    psw: u8,
}

impl StatusRegister {
    pub fn new() -> Self {
        Self {
            psw: PSW_RESET_VALUE,
        }
    }

    pub fn reset(&mut self) {
        self.psw = PSW_RESET_VALUE;
    }

    pub fn get(&self, flag: StatusRegisterFlag) -> bool {
        utils::bv(self.psw, flag as u8) > 0
    }

    pub fn set(&mut self, flag: StatusRegisterFlag) {
        self.psw = utils::set_bit(self.psw, flag as u8);
    }

    pub fn clear(&mut self, flag: StatusRegisterFlag) {
        self.psw = utils::clear_bit(self.psw, flag as u8);
    }

    pub fn toggle(&mut self, flag: StatusRegisterFlag) {
        self.psw ^= 1 << flag as u8;
    }

    pub fn set_value(&mut self, flag: StatusRegisterFlag, condition: bool) {
        match condition {
            true => self.set(flag),
            false => self.clear(flag),
        }
    }

    /// Stack level mirrored in bits 0-2
    pub fn stack_level(&self) -> u8 {
        utils::bvs(self.psw, 2, 0)
    }

    /// Mirror a byte stack pointer (0-15) into bits 0-2
    pub fn mirror_stack_pointer(&mut self, sp: u8) {
        self.psw = (self.psw & !STACK_BITS) | ((sp >> 1) & STACK_BITS);
    }

    /// Flags nibble as it is pushed on the stack
    pub fn flags(&self) -> u8 {
        self.psw & 0xF0
    }

    /// Restore the flags nibble, leaving bits 0-3 untouched
    pub fn restore_flags(&mut self, saved: u8) {
        self.psw = (self.psw & 0x0F) | (saved & 0xF0);
    }
}

impl From<u8> for StatusRegister {
    fn from(value: u8) -> Self {
        Self { psw: value }
    }
}

impl From<StatusRegister> for u8 {
    fn from(value: StatusRegister) -> Self {
        value.psw
    }
}

#[derive(Copy, Clone, Debug)]
pub enum StatusRegisterFlag {
    Carry = 7,
    AuxiliaryCarry = 6,
    Flag0 = 5,
    BankSelect = 4,
}

#[cfg(test)]
mod tests {
    use super::*;
    use StatusRegisterFlag::*;

    #[test]
    fn test_status_register_all() {
        let mut psw = StatusRegister::from(0);

        let flags = vec![Carry, AuxiliaryCarry, Flag0, BankSelect];

        for flag in flags {
            assert!(!psw.get(flag));
            psw.set(flag);
            assert!(psw.get(flag));
            psw.clear(flag);
            assert!(!psw.get(flag));
            psw.toggle(flag);
            assert!(psw.get(flag));
            psw.toggle(flag);
            assert!(!psw.get(flag));
        }
    }

    #[test]
    fn test_status_register_get() {
        let psw = StatusRegister::from(0b1001_0000);

        assert!(psw.get(Carry));
        assert!(psw.get(BankSelect));
        assert!(!psw.get(AuxiliaryCarry));
        assert!(!psw.get(Flag0));
    }

    #[test]
    fn test_status_register_reset() {
        let mut psw = StatusRegister::from(0xFF);
        psw.reset();
        assert_eq!(u8::from(psw), 0x08);
        assert_eq!(u8::from(StatusRegister::new()), 0x08);
    }

    #[test]
    fn test_status_register_stack_mirror() {
        let mut psw = StatusRegister::from(0xF8);

        psw.mirror_stack_pointer(6);
        assert_eq!(psw.stack_level(), 3);
        assert_eq!(u8::from(psw), 0xFB);

        psw.mirror_stack_pointer(15);
        assert_eq!(psw.stack_level(), 7);

        psw.mirror_stack_pointer(0);
        assert_eq!(u8::from(psw), 0xF8);
    }

    #[test]
    fn test_status_register_restore_flags() {
        let mut psw = StatusRegister::from(0x0B);
        assert_eq!(psw.flags(), 0);

        psw.restore_flags(0xA5);
        assert_eq!(u8::from(psw), 0xAB);
        assert_eq!(psw.flags(), 0xA0);
    }
}

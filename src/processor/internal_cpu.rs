use bincode::{Decode, Encode};

use crate::processor::interrupt::{Interrupt, PendingIrq, TIMER_PRESCALER};
use crate::processor::status_register::StatusRegister;
use crate::processor::status_register::StatusRegisterFlag::BankSelect;

pub const INTERNAL_RAM_SIZE: usize = 128;

/// Internal RAM is addressed with 7 bits by indirect instructions
pub const INTERNAL_RAM_MASK: u8 = 0x7F;

/// Program counter wraps inside a 4 kB window
pub const PC_MASK: u16 = 0x0FFF;

/// Selects the upper 2 kB program memory bank
pub const A11: u16 = 0x0800;

const BANK_0_BASE: usize = 0;
const BANK_1_BASE: usize = 24;
const STACK_BASE: usize = 8;

/// Architectural state of one MCS-48 core.
///
/// This is the context copied in and out by save states. Everything here is
/// plain data; the working-register window is derived from the bank flag of
/// the PSW on every access.
#[derive(Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub struct InternalCpu {
    pub pc: u16,       // Program Counter
    pub prev_pc: u16,  // PC of the last fetched opcode
    pub acc: u8,       // Accumulator
    pub sp: u8,        // Stack Pointer, in bytes (0-15)
    pub psw: StatusRegister,
    pub ram: [u8; INTERNAL_RAM_SIZE],

    pub bus: u8, // last value written to BUS
    pub f1: bool,

    // P1/P2 output latches, used by quasi-bidirectional port handling
    pub p1: u8,
    pub p2: u8,

    pub a11: u16,
    pub a11_ff: u16,

    pub timer: u8,
    pub timer_on: bool,
    pub count_on: bool,
    pub master_clock: u8,
    pub t_flag: bool,
    pub old_t1: bool,

    pub xirq_en: bool,
    pub tirq_en: bool,
    pub pending_irq: PendingIrq,
    pub irq_executing: Option<Interrupt>,
    pub irq_state: bool,
}

impl Default for InternalCpu {
    fn default() -> Self {
        Self {
            pc: 0,
            prev_pc: 0,
            acc: 0,
            sp: 0,
            psw: StatusRegister::default(),
            ram: [0; INTERNAL_RAM_SIZE],
            bus: 0,
            f1: false,
            p1: 0xFF,
            p2: 0xFF,
            a11: 0,
            a11_ff: 0,
            timer: 0,
            timer_on: false,
            count_on: false,
            master_clock: 0,
            t_flag: false,
            old_t1: false,
            xirq_en: false,
            tirq_en: false,
            pending_irq: PendingIrq::empty(),
            irq_executing: None,
            irq_state: false,
        }
    }
}

impl InternalCpu {
    /// Power-on state. The timer starts running, some sound programs never
    /// issue `STRT T` themselves.
    pub fn reset(&mut self) {
        *self = Self {
            irq_state: self.irq_state,
            timer_on: true,
            ..Self::default()
        };
        self.psw.reset();
    }

    /// RAM offset of the selected working register bank
    pub fn register_bank(&self) -> usize {
        if self.psw.get(BankSelect) {
            BANK_1_BASE
        } else {
            BANK_0_BASE
        }
    }

    /// Read working register `Rn`
    pub fn r(&self, n: u8) -> u8 {
        self.ram[self.register_bank() + (n & 0x07) as usize]
    }

    /// Write working register `Rn`
    pub fn set_r(&mut self, n: u8, data: u8) {
        let index = self.register_bank() + (n & 0x07) as usize;
        self.ram[index] = data;
    }

    /// RAM index addressed by `@R0`/`@R1`
    pub fn indirect(&self, n: u8) -> usize {
        (self.r(n & 0x01) & INTERNAL_RAM_MASK) as usize
    }

    pub fn push(&mut self, data: u8) {
        self.ram[STACK_BASE + self.sp as usize] = data;
        self.sp = (self.sp + 1) & 0x0F;
        self.psw.mirror_stack_pointer(self.sp);
    }

    pub fn pull(&mut self) -> u8 {
        self.sp = (self.sp + 15) & 0x0F;
        self.psw.mirror_stack_pointer(self.sp);
        self.ram[STACK_BASE + self.sp as usize]
    }

    /// Push PC low byte, then PC high nibble packed with the PSW flags
    pub fn push_return_address(&mut self) {
        let pcl = (self.pc & 0x00FF) as u8;
        let pch = ((self.pc >> 8) & 0x000F) as u8;
        self.push(pcl);
        self.push(pch | self.psw.flags());
    }

    /// Pull a return address pushed by `push_return_address`. Returns the
    /// packed byte so the caller can restore the PSW flags.
    pub fn pull_return_address(&mut self) -> u8 {
        let packed = self.pull();
        let pcl = self.pull() as u16;
        self.pc = (((packed & 0x0F) as u16) << 8) | pcl;
        packed
    }

    /// Recompute the stack pointer from the level mirrored in the PSW
    pub fn derive_stack_pointer(&mut self) {
        self.sp = self.psw.stack_level() << 1;
    }

    /// Clamp externally loaded state to the ranges the core maintains itself,
    /// then rebuild the stack pointer from the PSW
    pub fn normalize(&mut self) {
        self.pc &= PC_MASK;
        self.prev_pc &= PC_MASK;
        self.a11 &= A11;
        self.a11_ff &= A11;
        self.master_clock %= TIMER_PRESCALER;
        self.derive_stack_pointer();
    }

    /// Advance the PC past a fetched byte
    pub fn advance_pc(&mut self) {
        self.pc = self.pc.wrapping_add(1) & PC_MASK;
    }

    /// Replace the low byte of the PC, keeping the current 256 byte page
    pub fn jump_in_page(&mut self, address: u8) {
        self.pc = (self.pc & 0x0F00) | address as u16;
    }

    /// Stack slot `depth` levels below the top as (PC low | packed << 8)
    pub fn stack_slot(&self, depth: u8) -> u16 {
        let offset = self.stack_slot_offset(depth);
        self.ram[offset] as u16 | ((self.ram[offset + 1] as u16) << 8)
    }

    pub fn set_stack_slot(&mut self, depth: u8, value: u16) {
        let offset = self.stack_slot_offset(depth);
        self.ram[offset] = (value & 0x00FF) as u8;
        self.ram[offset + 1] = (value >> 8) as u8;
    }

    fn stack_slot_offset(&self, depth: u8) -> usize {
        let level = ((self.sp >> 1) + 7 - (depth & 0x07)) & 0x07;
        STACK_BASE + 2 * level as usize
    }
}

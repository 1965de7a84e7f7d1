//! Interrupt classes, the pending-interrupt latch and the timer/counter
//! that feeds it.

use bincode::de::Decoder;
use bincode::enc::Encoder;
use bincode::error::{DecodeError, EncodeError};
use bincode::{Decode, Encode};
use bitflags::bitflags;

use crate::processor::internal_cpu::InternalCpu;

/// Vector of the external interrupt
pub const EXTERNAL_VECTOR: u16 = 0x003;

/// Vector shared by timer and counter overflow interrupts
pub const TIMER_VECTOR: u16 = 0x007;

/// Machine cycles spent dispatching an interrupt
pub const DISPATCH_CYCLES: i32 = 2;

/// The timer register counts once every 32 machine cycles
pub const TIMER_PRESCALER: u8 = 32;

/// Interrupt being serviced by the CPU
#[derive(Copy, Clone, Debug, PartialEq, Eq, Encode, Decode)]
pub enum Interrupt {
    External,
    Timer,
    Counter,
}

impl Interrupt {
    pub fn vector(&self) -> u16 {
        match self {
            Interrupt::External => EXTERNAL_VECTOR,
            Interrupt::Timer | Interrupt::Counter => TIMER_VECTOR,
        }
    }
}

/// Level of an input line
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LineState {
    Clear,
    Assert,
}

bitflags! {
    /// Interrupt requests latched and waiting to be dispatched
    #[derive(Default)]
    pub struct PendingIrq: u8 {
        const EXTERNAL = 0b0000_0001;
        const TIMER = 0b0000_0010;
        const COUNTER = 0b0000_0100;

        const TIMER_OR_COUNTER = Self::TIMER.bits | Self::COUNTER.bits;
    }
}

impl Encode for PendingIrq {
    fn encode<E: Encoder>(&self, encoder: &mut E) -> Result<(), EncodeError> {
        Encode::encode(&self.bits(), encoder)
    }
}

impl<Context> Decode<Context> for PendingIrq {
    fn decode<D: Decoder<Context = Context>>(decoder: &mut D) -> Result<Self, DecodeError> {
        let bits: u8 = Decode::decode(decoder)?;
        Ok(PendingIrq::from_bits_truncate(bits))
    }
}

bincode::impl_borrow_decode!(PendingIrq);

impl InternalCpu {
    /// Advance the timer prescaler by `cycles` machine cycles. An overflow
    /// of the timer register latches a timer interrupt and the timer flag.
    pub fn tick_timer(&mut self, cycles: u8) {
        if !self.timer_on {
            return;
        }

        self.master_clock = self.master_clock.wrapping_add(cycles);
        while self.master_clock >= TIMER_PRESCALER {
            self.master_clock -= TIMER_PRESCALER;
            self.increment_timer(PendingIrq::TIMER);
        }
    }

    /// Sample the T1 pin while in event counter mode. Every rising edge
    /// increments the timer register.
    pub fn sample_counter(&mut self, t1: bool) {
        if !self.count_on {
            return;
        }

        if t1 && !self.old_t1 {
            self.increment_timer(PendingIrq::COUNTER);
        }
        self.old_t1 = t1;
    }

    fn increment_timer(&mut self, source: PendingIrq) {
        self.timer = self.timer.wrapping_add(1);
        if self.timer == 0 {
            self.pending_irq.insert(source);
            self.t_flag = true;
        }
    }

    /// Pick the next interrupt to dispatch, consuming its pending request.
    ///
    /// Nothing is dispatched while another interrupt is executing: requests
    /// stay latched until `RETR`. Requests whose class is disabled are
    /// dropped. External interrupts win over timer/counter ones.
    pub fn next_interrupt(&mut self) -> Option<Interrupt> {
        if self.irq_executing.is_some() || self.pending_irq.is_empty() {
            return None;
        }

        if self.pending_irq.contains(PendingIrq::EXTERNAL) {
            self.pending_irq.remove(PendingIrq::EXTERNAL);
            if self.xirq_en {
                return Some(Interrupt::External);
            }
        }

        if self.pending_irq.intersects(PendingIrq::TIMER_OR_COUNTER) {
            let interrupt = if self.pending_irq.contains(PendingIrq::COUNTER) {
                Interrupt::Counter
            } else {
                Interrupt::Timer
            };
            self.pending_irq.remove(PendingIrq::TIMER_OR_COUNTER);
            self.t_flag = true;
            if self.tirq_en {
                return Some(interrupt);
            }
        }

        None
    }

    /// Push the return address, jump to the vector and switch to program
    /// bank 0 for the service routine.
    pub fn enter_interrupt(&mut self, interrupt: Interrupt) {
        self.irq_executing = Some(interrupt);
        self.push_return_address();
        self.pc = interrupt.vector();
        self.a11_ff = self.a11;
        self.a11 = 0;
    }
}

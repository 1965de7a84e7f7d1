use std::cell::RefCell;
use std::rc::Rc;

use crate::interfaces::Bus;
use crate::processor::bus::MemoryBus;

pub type SharedBus = Rc<RefCell<dyn Bus>>;
pub type SharedMemoryBus = Rc<RefCell<MemoryBus>>;

/// Acknowledge hook called with the interrupt line about to be serviced
pub type IrqCallback = Box<dyn FnMut(usize) -> i32>;

/// Hook called with the new program counter after a non-sequential PC load
pub type BankChangeCallback = Box<dyn FnMut(u16)>;

//! Intel MCS-48 (8035/8039/8048) CPU emulator

pub mod errors;
pub mod interfaces;
pub mod processor;
pub mod settings;
pub mod types;
mod utils;

pub use errors::CpuError;
pub use interfaces::{Bus, Memory};
pub use processor::bus::MemoryBus;
pub use processor::cpu::{Cpu, InfoField, Register};
pub use processor::internal_cpu::InternalCpu;
pub use processor::interrupt::LineState;
pub use processor::ports;
pub use settings::{CpuSettings, PortHandling, Variant};

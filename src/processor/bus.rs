use std::collections::HashMap;

use log::debug;

use crate::errors::CpuError;
use crate::interfaces::Bus;
use crate::interfaces::Memory;
use crate::processor::ports::{self, T0, T1};

use super::memory::Ram;
use super::memory::Rom;
use super::memory::EXTERNAL_RAM_SIZE;

/// Stand-alone system for an MCS-48 core: program ROM, `MOVX` data RAM and
/// a set of ports whose inputs are set by the host and whose outputs are
/// recorded.
///
/// Port inputs read 0xFF (pulled up) and test pins read low until set.
pub struct MemoryBus {
    id: &'static str,

    rom: Rom,
    ram: Ram,

    inputs: HashMap<u16, u8>,
    outputs: HashMap<u16, u8>,
}

impl MemoryBus {
    pub fn new(id: &'static str) -> Self {
        Self {
            id,
            rom: Rom::new(),
            ram: Ram::new(EXTERNAL_RAM_SIZE),
            inputs: HashMap::new(),
            outputs: HashMap::new(),
        }
    }

    pub fn load_program(&mut self, image: &[u8]) -> Result<(), CpuError> {
        self.rom.load(image)?;
        debug!("{}: loaded {} bytes program", self.id, image.len());
        Ok(())
    }

    /// Value driven by the outside world on `port`
    pub fn set_port_input(&mut self, port: u16, data: u8) {
        self.inputs.insert(port, data);
    }

    pub fn set_test_pin(&mut self, n: u8, level: bool) {
        self.inputs.insert(ports::test_pin(n), level as u8);
    }

    /// Last value written by the program to `port`, if any
    pub fn port_output(&self, port: u16) -> Option<u8> {
        self.outputs.get(&port).copied()
    }

    pub fn external_ram(&self, address: u8) -> u8 {
        self.ram.read(address as u16)
    }
}

impl Bus for MemoryBus {
    fn read_program(&self, address: u16) -> u8 {
        self.rom.read(address)
    }

    fn read_port(&mut self, port: u16) -> u8 {
        if port < EXTERNAL_RAM_SIZE as u16 {
            return self.ram.read(port);
        }

        let default = match port {
            T0 | T1 => 0,
            _ => 0xFF,
        };
        self.inputs.get(&port).copied().unwrap_or(default)
    }

    fn write_port(&mut self, port: u16, data: u8) {
        if port < EXTERNAL_RAM_SIZE as u16 {
            self.ram.write(port, data);
            return;
        }

        debug!("{}: port {:0>3X} <- {:0>2X}", self.id, port, data);
        self.outputs.insert(port, data);
    }
}

use crate::errors::CpuError;
use crate::interfaces::Memory;

/// Program memory addressable by the 12 bit PC
pub const PROGRAM_MEMORY_SIZE: usize = 4 * 1024;

/// External data memory reachable with `MOVX` (8 bit addresses)
pub const EXTERNAL_RAM_SIZE: usize = 256;

/// Program ROM. Writes are ignored.
pub struct Rom {
    memory: Vec<u8>,
}

impl Rom {
    pub fn new() -> Self {
        Self {
            memory: vec![0; PROGRAM_MEMORY_SIZE],
        }
    }

    /// Load a program image at address 0. Bytes past the image are zeroed.
    pub fn load(&mut self, image: &[u8]) -> Result<(), CpuError> {
        if image.len() > self.memory.len() {
            return Err(CpuError::RomTooLarge {
                size: image.len(),
                capacity: self.memory.len(),
            });
        }

        self.memory.fill(0);
        self.memory[..image.len()].copy_from_slice(image);
        Ok(())
    }
}

impl Default for Rom {
    fn default() -> Self {
        Self::new()
    }
}

impl Memory for Rom {
    fn read(&self, address: u16) -> u8 {
        self.memory[address as usize % self.memory.len()]
    }

    fn write(&mut self, _address: u16, _data: u8) {}

    fn size(&self) -> usize {
        self.memory.len()
    }
}

pub struct Ram {
    memory: Vec<u8>,
}

impl Ram {
    pub fn new(size: usize) -> Self {
        Self {
            memory: vec![0; size],
        }
    }
}

impl Memory for Ram {
    fn read(&self, address: u16) -> u8 {
        self.memory[address as usize % self.memory.len()]
    }

    fn write(&mut self, address: u16, data: u8) {
        let size = self.memory.len();
        self.memory[address as usize % size] = data;
    }

    fn size(&self) -> usize {
        self.memory.len()
    }
}

/// Address space seen by an MCS-48 core.
///
/// Program memory, the opcode stream and the I/O port space are all owned
/// by the host system. The core performs no caching: every access is a call
/// through this trait, so side effects of port accesses (latch handshakes,
/// interrupt acknowledges, ...) are entirely up to the implementor.
pub trait Bus {
    /// Read a data byte from program memory (`MOVP`, `MOVP3`, `JMPP`)
    fn read_program(&self, address: u16) -> u8;

    /// Fetch an opcode byte. Hosts decoding the instruction stream
    /// differently from data reads override this.
    fn read_opcode(&self, address: u16) -> u8 {
        self.read_program(address)
    }

    /// Fetch the immediate argument byte following an opcode
    fn read_opcode_arg(&self, address: u16) -> u8 {
        self.read_program(address)
    }

    /// Read from the port space. See [`crate::ports`] for the numbering
    fn read_port(&mut self, port: u16) -> u8;

    /// Write `data` to the port space
    fn write_port(&mut self, port: u16, data: u8);
}

pub trait Memory {
    /// Read a byte from the specified `address`
    fn read(&self, address: u16) -> u8;

    /// Write a byte of `data` to the specified `address`
    fn write(&mut self, address: u16, data: u8);

    /// Memory size in bytes
    fn size(&self) -> usize;
}

use crate::processor::cpu::Cpu;
use crate::processor::internal_cpu::InternalCpu;

pub type Opcode = u8;

/// One entry of the opcode table.
///
/// `name` is a disassembly template: `{n}` is replaced with `selector`,
/// `{imm}` with the immediate byte, `{addr11}` with the 11 bit jump target
/// and `{addr8}` with the in-page jump target.
#[derive(Clone)]
pub struct Instruction {
    pub opcode: Opcode,
    pub name: &'static str,
    pub instruction: InstructionKind,
    // register, port, page or bit number decoded from the opcode
    pub selector: u8,
    pub cycles: u8,
}

#[derive(Clone, Copy)]
pub enum InstructionKind {
    Implied(fn(&mut InternalCpu)),
    Selected(fn(&mut InternalCpu, u8)),
    Immediate(fn(&mut InternalCpu, u8)),
    SelectedImmediate(fn(&mut InternalCpu, u8, u8)),
    Io(fn(&mut Cpu, u8)),
    ImmediateIo(fn(&mut Cpu, u8, u8)),
    Illegal,
}

impl Instruction {
    pub fn illegal(opcode: Opcode) -> Self {
        Self {
            opcode,
            name: "ILL",
            instruction: InstructionKind::Illegal,
            selector: 0,
            // 1 rather than 0, so that `execute` always makes progress
            cycles: 1,
        }
    }

    /// Instruction length, opcode included
    pub fn bytes(&self) -> u16 {
        match self.instruction {
            InstructionKind::Immediate(_)
            | InstructionKind::SelectedImmediate(_)
            | InstructionKind::ImmediateIo(_) => 2,
            _ => 1,
        }
    }

    pub fn is_illegal(&self) -> bool {
        matches!(self.instruction, InstructionKind::Illegal)
    }
}

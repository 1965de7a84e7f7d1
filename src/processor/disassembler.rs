//! MCS-48 mnemonic disassembler driven by the opcode table templates.

use crate::interfaces::Bus;
use crate::processor::instruction_set::INSTRUCTION_SET;
use crate::processor::internal_cpu::{A11, PC_MASK};

/// Disassemble the instruction at `pc`, returning its text and length
pub fn disassemble(bus: &dyn Bus, pc: u16) -> (String, usize) {
    let opcode = bus.read_opcode(pc);
    let instruction = INSTRUCTION_SET.lookup(opcode);

    if instruction.is_illegal() {
        return (format!("ILL ${:0>2X}", opcode), 1);
    }

    let bytes = instruction.bytes();
    let operand_pc = (pc + 1) & PC_MASK;
    let operand = if bytes > 1 {
        bus.read_opcode_arg(operand_pc)
    } else {
        0
    };

    let addr11 = (pc & A11) | ((instruction.selector as u16) << 8) | operand as u16;
    let addr8 = (operand_pc & 0x0F00) | operand as u16;

    let text = instruction
        .name
        .replace("{n}", &instruction.selector.to_string())
        .replace("{imm}", &format!("#${:0>2X}", operand))
        .replace("{addr11}", &format!("${:0>3X}", addr11))
        .replace("{addr8}", &format!("${:0>3X}", addr8));

    (text, bytes as usize)
}

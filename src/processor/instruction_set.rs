use log::debug;
use once_cell::sync::Lazy;

use crate::processor::cpu::Cpu;
use crate::processor::instruction::{Instruction, InstructionKind, Opcode};
use crate::processor::internal_cpu::{InternalCpu, A11};
use crate::processor::interrupt::PendingIrq;
use crate::processor::ports::{self, BUS};
use crate::processor::status_register::StatusRegisterFlag;

use InstructionKind::*;
use StatusRegisterFlag::*;

pub const NOP: Opcode = 0x00;

/// Opcode table shared by every CPU instance
pub static INSTRUCTION_SET: Lazy<InstructionSet> = Lazy::new(InstructionSet::new);

pub struct InstructionSet {
    instructions: Vec<Instruction>,
}

impl InstructionSet {
    #[rustfmt::skip]
    pub fn new() -> Self {
        let mut instructions: Vec<Instruction> = (0..=0xFF).map(Instruction::illegal).collect();

        let mut insert = |opcode: Opcode, name: &'static str, instruction: InstructionKind, selector: u8, cycles: u8| {
            instructions[opcode as usize] = Instruction { opcode, name, instruction, selector, cycles };
        };

        // Working registers R0-R7
        for r in 0..8 {
            insert(0x18 | r, "INC R{n}",          Selected(inc_r),             r, 1);
            insert(0x28 | r, "XCH A,R{n}",        Selected(xch_a_r),           r, 1);
            insert(0x48 | r, "ORL A,R{n}",        Selected(orl_a_r),           r, 1);
            insert(0x58 | r, "ANL A,R{n}",        Selected(anl_a_r),           r, 1);
            insert(0x68 | r, "ADD A,R{n}",        Selected(add_a_r),           r, 1);
            insert(0x78 | r, "ADDC A,R{n}",       Selected(addc_a_r),          r, 1);
            insert(0xA8 | r, "MOV R{n},A",        Selected(mov_r_a),           r, 1);
            insert(0xB8 | r, "MOV R{n},{imm}",    SelectedImmediate(mov_r_n),  r, 2);
            insert(0xC8 | r, "DEC R{n}",          Selected(dec_r),             r, 1);
            insert(0xD8 | r, "XRL A,R{n}",        Selected(xrl_a_r),           r, 1);
            insert(0xE8 | r, "DJNZ R{n},{addr8}", SelectedImmediate(djnz_r),   r, 2);
            insert(0xF8 | r, "MOV A,R{n}",        Selected(mov_a_r),           r, 1);
        }

        // Indirect internal RAM @R0, @R1
        for i in 0..2 {
            insert(0x10 | i, "INC @R{n}",         Selected(inc_xr),            i, 1);
            insert(0x20 | i, "XCH A,@R{n}",       Selected(xch_a_xr),          i, 1);
            insert(0x30 | i, "XCHD A,@R{n}",      Selected(xchd_a_xr),         i, 1);
            insert(0x40 | i, "ORL A,@R{n}",       Selected(orl_a_xr),          i, 1);
            insert(0x50 | i, "ANL A,@R{n}",       Selected(anl_a_xr),          i, 1);
            insert(0x60 | i, "ADD A,@R{n}",       Selected(add_a_xr),          i, 1);
            insert(0x70 | i, "ADDC A,@R{n}",      Selected(addc_a_xr),         i, 1);
            insert(0x80 | i, "MOVX A,@R{n}",      Io(movx_a_xr),               i, 2);
            insert(0x90 | i, "MOVX @R{n},A",      Io(movx_xr_a),               i, 2);
            insert(0xA0 | i, "MOV @R{n},A",       Selected(mov_xr_a),          i, 1);
            insert(0xB0 | i, "MOV @R{n},{imm}",   SelectedImmediate(mov_xr_n), i, 2);
            insert(0xD0 | i, "XRL A,@R{n}",       Selected(xrl_a_xr),          i, 1);
            insert(0xF0 | i, "MOV A,@R{n}",       Selected(mov_a_xr),          i, 1);
        }

        // Page selected jumps, calls and accumulator bit tests
        for page in 0..8 {
            insert((page << 5) | 0x04, "JMP {addr11}",     ImmediateIo(jmp),     page, 2);
            insert((page << 5) | 0x12, "JB{n} {addr8}",    SelectedImmediate(jb), page, 2);
            insert((page << 5) | 0x14, "CALL {addr11}",    SelectedImmediate(call), page, 2);
        }

        // Ports P1, P2
        for p in 1..3 {
            insert(0x08 | p, "IN A,P{n}",         Io(in_a_p),                  p, 2);
            insert(0x38 | p, "OUTL P{n},A",       Io(outl_p_a),                p, 2);
            insert(0x88 | p, "ORL P{n},{imm}",    ImmediateIo(orl_p_n),        p, 2);
            insert(0x98 | p, "ANL P{n},{imm}",    ImmediateIo(anl_p_n),        p, 2);
        }

        // Expander ports P4-P7
        for p in 4..8 {
            insert(0x08 | p, "MOVD A,P{n}",       Io(movd_a_p),                p, 2);
            insert(0x38 | p, "MOVD P{n},A",       Io(movd_p_a),                p, 2);
            insert(0x88 | p, "ORLD P{n},A",       Io(orld_p_a),                p, 2);
            insert(0x98 | p, "ANLD P{n},A",       Io(anld_p_a),                p, 2);
        }

        // Accumulator
        insert(0x03, "ADD A,{imm}",               Immediate(add),              0, 2);
        insert(0x13, "ADDC A,{imm}",              Immediate(addc),             0, 2);
        insert(0x43, "ORL A,{imm}",               Immediate(orl),              0, 2);
        insert(0x53, "ANL A,{imm}",               Immediate(anl),              0, 2);
        insert(0xD3, "XRL A,{imm}",               Immediate(xrl),              0, 2);
        insert(0x23, "MOV A,{imm}",               Immediate(mov_a_n),          0, 2);
        insert(0x07, "DEC A",                     Implied(dec_a),              0, 1);
        insert(0x17, "INC A",                     Implied(inc_a),              0, 1);
        insert(0x27, "CLR A",                     Implied(clr_a),              0, 1);
        insert(0x37, "CPL A",                     Implied(cpl_a),              0, 1);
        insert(0x47, "SWAP A",                    Implied(swap_a),             0, 1);
        insert(0x57, "DA A",                      Implied(da_a),               0, 1);
        insert(0x67, "RRC A",                     Implied(rrc_a),              0, 1);
        insert(0x77, "RR A",                      Implied(rr_a),               0, 1);
        insert(0xE7, "RL A",                      Implied(rl_a),               0, 1);
        insert(0xF7, "RLC A",                     Implied(rlc_a),              0, 1);

        // Data moves
        insert(0x42, "MOV A,T",                   Implied(mov_a_t),            0, 1);
        insert(0x62, "MOV T,A",                   Implied(mov_t_a),            0, 1);
        insert(0xC7, "MOV A,PSW",                 Implied(mov_a_psw),          0, 1);
        insert(0xD7, "MOV PSW,A",                 Implied(mov_psw_a),          0, 1);
        insert(0xA3, "MOVP A,@A",                 Io(movp_a_xa),               0, 2);
        insert(0xE3, "MOVP3 A,@A",                Io(movp3_a_xa),              0, 2);

        // BUS
        insert(0x02, "OUTL BUS,A",                Io(outl_bus_a),              0, 2);
        insert(0x08, "INS A,BUS",                 Io(ins_a_bus),               0, 2);
        insert(0x88, "ORL BUS,{imm}",             ImmediateIo(orl_bus_n),      0, 2);
        insert(0x98, "ANL BUS,{imm}",             ImmediateIo(anl_bus_n),      0, 2);

        // Flags
        insert(0x97, "CLR C",                     Implied(clr_c),              0, 1);
        insert(0xA7, "CPL C",                     Implied(cpl_c),              0, 1);
        insert(0x85, "CLR F0",                    Implied(clr_f0),             0, 1);
        insert(0x95, "CPL F0",                    Implied(cpl_f0),             0, 1);
        insert(0xA5, "CLR F1",                    Implied(clr_f1),             0, 1);
        insert(0xB5, "CPL F1",                    Implied(cpl_f1),             0, 1);

        // Banks
        insert(0xC5, "SEL RB0",                   Implied(sel_rb0),            0, 1);
        insert(0xD5, "SEL RB1",                   Implied(sel_rb1),            0, 1);
        insert(0xE5, "SEL MB0",                   Implied(sel_mb0),            0, 1);
        insert(0xF5, "SEL MB1",                   Implied(sel_mb1),            0, 1);

        // Conditional jumps
        insert(0x16, "JTF {addr8}",               Immediate(jtf),              0, 2);
        insert(0x26, "JNT0 {addr8}",              ImmediateIo(jnt),            0, 2);
        insert(0x36, "JT0 {addr8}",               ImmediateIo(jt),             0, 2);
        insert(0x46, "JNT1 {addr8}",              ImmediateIo(jnt),            1, 2);
        insert(0x56, "JT1 {addr8}",               ImmediateIo(jt),             1, 2);
        insert(0x76, "JF1 {addr8}",               Immediate(jf1),              0, 2);
        insert(0x86, "JNI {addr8}",               Immediate(jni),              0, 2);
        insert(0x96, "JNZ {addr8}",               Immediate(jnz),              0, 2);
        insert(0xB6, "JF0 {addr8}",               Immediate(jf0),              0, 2);
        insert(0xC6, "JZ {addr8}",                Immediate(jz),               0, 2);
        insert(0xE6, "JNC {addr8}",               Immediate(jnc),              0, 2);
        insert(0xF6, "JC {addr8}",                Immediate(jc),               0, 2);

        // Subroutines
        insert(0x83, "RET",                       Implied(ret),                0, 2);
        insert(0x93, "RETR",                      Io(retr),                    0, 2);
        insert(0xB3, "JMPP @A",                   Io(jmpp_xa),                 0, 2);

        // Interrupts, timer and counter
        insert(0x05, "EN I",                      Implied(en_i),               0, 1);
        insert(0x15, "DIS I",                     Implied(dis_i),              0, 1);
        insert(0x25, "EN TCNTI",                  Implied(en_tcnti),           0, 1);
        insert(0x35, "DIS TCNTI",                 Implied(dis_tcnti),          0, 1);
        insert(0x45, "STRT CNT",                  Io(strt_cnt),                0, 1);
        insert(0x55, "STRT T",                    Implied(strt_t),             0, 1);
        insert(0x65, "STOP TCNT",                 Implied(stop_tcnt),          0, 1);
        insert(0x75, "ENT0 CLK",                  Implied(ent0_clk),           0, 1);

        insert(0x00, "NOP",                       Implied(nop),                0, 1);

        Self { instructions }
    }

    pub fn lookup(&self, opcode: Opcode) -> &Instruction {
        &self.instructions[opcode as usize]
    }
}

impl Default for InstructionSet {
    fn default() -> Self {
        Self::new()
    }
}

// Instruction Set
// ---------------

// Arithmetic

/// ADD A,data - Add to Accumulator
///
/// Operation:
/// A + data -> A
///
/// Carry is set on a 9th bit, auxiliary carry on a carry out of bit 3.
pub fn add(cpu: &mut InternalCpu, operand: u8) {
    let aux = (cpu.acc & 0x0F) + (operand & 0x0F) > 0x0F;
    let res = cpu.acc as u16 + operand as u16;

    cpu.acc = res as u8;
    cpu.psw.set_value(Carry, res > 0xFF);
    cpu.psw.set_value(AuxiliaryCarry, aux);
}

/// ADDC A,data - Add with Carry to Accumulator
///
/// Operation:
/// A + data + C -> A
pub fn addc(cpu: &mut InternalCpu, operand: u8) {
    let carry = cpu.psw.get(Carry) as u8;
    let aux = (cpu.acc & 0x0F) + (operand & 0x0F) + carry > 0x0F;
    let res = cpu.acc as u16 + operand as u16 + carry as u16;

    cpu.acc = res as u8;
    cpu.psw.set_value(Carry, res > 0xFF);
    cpu.psw.set_value(AuxiliaryCarry, aux);
}

pub fn add_a_r(cpu: &mut InternalCpu, r: u8) {
    add(cpu, cpu.r(r));
}

pub fn add_a_xr(cpu: &mut InternalCpu, i: u8) {
    add(cpu, cpu.ram[cpu.indirect(i)]);
}

pub fn addc_a_r(cpu: &mut InternalCpu, r: u8) {
    addc(cpu, cpu.r(r));
}

pub fn addc_a_xr(cpu: &mut InternalCpu, i: u8) {
    addc(cpu, cpu.ram[cpu.indirect(i)]);
}

/// DA A - Decimal Adjust Accumulator
///
/// Operation:
/// A + 0x06 -> A if A3-0 > 9 or AC
/// A + 0x60 -> A, 1 -> C if A7-4 > 9 or C
pub fn da_a(cpu: &mut InternalCpu) {
    if (cpu.acc & 0x0F) > 0x09 || cpu.psw.get(AuxiliaryCarry) {
        cpu.acc = cpu.acc.wrapping_add(0x06);
    }
    if (cpu.acc & 0xF0) > 0x90 || cpu.psw.get(Carry) {
        cpu.acc = cpu.acc.wrapping_add(0x60);
        cpu.psw.set(Carry);
    } else {
        cpu.psw.clear(Carry);
    }
}

pub fn inc_a(cpu: &mut InternalCpu) {
    cpu.acc = cpu.acc.wrapping_add(1);
}

pub fn dec_a(cpu: &mut InternalCpu) {
    cpu.acc = cpu.acc.wrapping_sub(1);
}

pub fn inc_r(cpu: &mut InternalCpu, r: u8) {
    cpu.set_r(r, cpu.r(r).wrapping_add(1));
}

pub fn dec_r(cpu: &mut InternalCpu, r: u8) {
    cpu.set_r(r, cpu.r(r).wrapping_sub(1));
}

pub fn inc_xr(cpu: &mut InternalCpu, i: u8) {
    let address = cpu.indirect(i);
    cpu.ram[address] = cpu.ram[address].wrapping_add(1);
}

// Logic operations

/// ANL A,data - Logical AND with Accumulator
pub fn anl(cpu: &mut InternalCpu, operand: u8) {
    cpu.acc &= operand;
}

/// ORL A,data - Logical OR with Accumulator
pub fn orl(cpu: &mut InternalCpu, operand: u8) {
    cpu.acc |= operand;
}

/// XRL A,data - Logical XOR with Accumulator
pub fn xrl(cpu: &mut InternalCpu, operand: u8) {
    cpu.acc ^= operand;
}

pub fn anl_a_r(cpu: &mut InternalCpu, r: u8) {
    anl(cpu, cpu.r(r));
}

pub fn anl_a_xr(cpu: &mut InternalCpu, i: u8) {
    anl(cpu, cpu.ram[cpu.indirect(i)]);
}

pub fn orl_a_r(cpu: &mut InternalCpu, r: u8) {
    orl(cpu, cpu.r(r));
}

pub fn orl_a_xr(cpu: &mut InternalCpu, i: u8) {
    orl(cpu, cpu.ram[cpu.indirect(i)]);
}

pub fn xrl_a_r(cpu: &mut InternalCpu, r: u8) {
    xrl(cpu, cpu.r(r));
}

pub fn xrl_a_xr(cpu: &mut InternalCpu, i: u8) {
    xrl(cpu, cpu.ram[cpu.indirect(i)]);
}

pub fn clr_a(cpu: &mut InternalCpu) {
    cpu.acc = 0;
}

pub fn cpl_a(cpu: &mut InternalCpu) {
    cpu.acc = !cpu.acc;
}

/// SWAP A - Swap nibbles of Accumulator
pub fn swap_a(cpu: &mut InternalCpu) {
    cpu.acc = cpu.acc.rotate_left(4);
}

// Rotations

/// RL A - Rotate Left without Carry
pub fn rl_a(cpu: &mut InternalCpu) {
    cpu.acc = cpu.acc.rotate_left(1);
}

/// RLC A - Rotate Left through Carry
///
/// Operation:
/// A7 -> C, C -> A0
pub fn rlc_a(cpu: &mut InternalCpu) {
    let carry = cpu.psw.get(Carry) as u8;
    cpu.psw.set_value(Carry, cpu.acc & 0x80 != 0);
    cpu.acc = (cpu.acc << 1) | carry;
}

/// RR A - Rotate Right without Carry
pub fn rr_a(cpu: &mut InternalCpu) {
    cpu.acc = cpu.acc.rotate_right(1);
}

/// RRC A - Rotate Right through Carry
///
/// Operation:
/// A0 -> C, C -> A7
pub fn rrc_a(cpu: &mut InternalCpu) {
    let carry = cpu.psw.get(Carry) as u8;
    cpu.psw.set_value(Carry, cpu.acc & 0x01 != 0);
    cpu.acc = (cpu.acc >> 1) | (carry << 7);
}

// Data moves

pub fn mov_a_n(cpu: &mut InternalCpu, operand: u8) {
    cpu.acc = operand;
}

pub fn mov_a_r(cpu: &mut InternalCpu, r: u8) {
    cpu.acc = cpu.r(r);
}

pub fn mov_a_xr(cpu: &mut InternalCpu, i: u8) {
    cpu.acc = cpu.ram[cpu.indirect(i)];
}

pub fn mov_r_a(cpu: &mut InternalCpu, r: u8) {
    cpu.set_r(r, cpu.acc);
}

pub fn mov_xr_a(cpu: &mut InternalCpu, i: u8) {
    let address = cpu.indirect(i);
    cpu.ram[address] = cpu.acc;
}

pub fn mov_r_n(cpu: &mut InternalCpu, r: u8, operand: u8) {
    cpu.set_r(r, operand);
}

pub fn mov_xr_n(cpu: &mut InternalCpu, i: u8, operand: u8) {
    let address = cpu.indirect(i);
    cpu.ram[address] = operand;
}

pub fn mov_a_psw(cpu: &mut InternalCpu) {
    cpu.acc = cpu.psw.into();
}

/// MOV PSW,A - Move Accumulator to PSW
///
/// Loads bank select and stack level as well, so both the register window
/// and the stack pointer follow the new value.
pub fn mov_psw_a(cpu: &mut InternalCpu) {
    cpu.psw = cpu.acc.into();
    cpu.derive_stack_pointer();
}

pub fn mov_a_t(cpu: &mut InternalCpu) {
    cpu.acc = cpu.timer;
}

pub fn mov_t_a(cpu: &mut InternalCpu) {
    cpu.timer = cpu.acc;
}

pub fn xch_a_r(cpu: &mut InternalCpu, r: u8) {
    let acc = cpu.acc;
    cpu.acc = cpu.r(r);
    cpu.set_r(r, acc);
}

pub fn xch_a_xr(cpu: &mut InternalCpu, i: u8) {
    let address = cpu.indirect(i);
    std::mem::swap(&mut cpu.acc, &mut cpu.ram[address]);
}

/// XCHD A,@Ri - Exchange low nibbles of Accumulator and internal RAM
pub fn xchd_a_xr(cpu: &mut InternalCpu, i: u8) {
    let address = cpu.indirect(i);
    let data = cpu.ram[address];
    cpu.ram[address] = (data & 0xF0) | (cpu.acc & 0x0F);
    cpu.acc = (cpu.acc & 0xF0) | (data & 0x0F);
}

/// MOVP A,@A - Move data from current program memory page
pub fn movp_a_xa(cpu: &mut Cpu, _: u8) {
    let address = (cpu.regs.pc & 0x0F00) | cpu.regs.acc as u16;
    cpu.regs.acc = cpu.read_program(address);
}

/// MOVP3 A,@A - Move data from program memory page 3
pub fn movp3_a_xa(cpu: &mut Cpu, _: u8) {
    let address = 0x0300 | cpu.regs.acc as u16;
    cpu.regs.acc = cpu.read_program(address);
}

/// MOVX A,@Ri - Read external data memory
pub fn movx_a_xr(cpu: &mut Cpu, i: u8) {
    let address = cpu.regs.r(i) as u16;
    cpu.regs.acc = cpu.read_port(address);
}

/// MOVX @Ri,A - Write external data memory
pub fn movx_xr_a(cpu: &mut Cpu, i: u8) {
    let address = cpu.regs.r(i) as u16;
    cpu.write_port(address, cpu.regs.acc);
}

// Flags

pub fn clr_c(cpu: &mut InternalCpu) {
    cpu.psw.clear(Carry);
}

pub fn cpl_c(cpu: &mut InternalCpu) {
    cpu.psw.toggle(Carry);
}

pub fn clr_f0(cpu: &mut InternalCpu) {
    cpu.psw.clear(Flag0);
}

pub fn cpl_f0(cpu: &mut InternalCpu) {
    cpu.psw.toggle(Flag0);
}

pub fn clr_f1(cpu: &mut InternalCpu) {
    cpu.f1 = false;
}

pub fn cpl_f1(cpu: &mut InternalCpu) {
    cpu.f1 = !cpu.f1;
}

// Banks

pub fn sel_rb0(cpu: &mut InternalCpu) {
    cpu.psw.clear(BankSelect);
}

pub fn sel_rb1(cpu: &mut InternalCpu) {
    cpu.psw.set(BankSelect);
}

pub fn sel_mb0(cpu: &mut InternalCpu) {
    cpu.a11 = 0;
    cpu.a11_ff = 0;
}

/// SEL MB1 - Select program memory bank 1
///
/// Inside an interrupt routine only the saved bank is updated, the routine
/// itself keeps running in bank 0.
pub fn sel_mb1(cpu: &mut InternalCpu) {
    cpu.a11_ff = A11;
    if cpu.irq_executing.is_none() {
        cpu.a11 = A11;
    }
}

// Branches

/// Taken branches stay in the page of the operand byte, so a jump whose
/// opcode sits on the last byte of a page lands in the next one.
pub fn branch(cpu: &mut InternalCpu, condition: bool, address: u8) {
    if condition {
        let page = cpu.pc.wrapping_sub(1) & 0x0F00;
        cpu.pc = page | address as u16;
    }
}

/// JC - Jump if Carry is set
pub fn jc(cpu: &mut InternalCpu, address: u8) {
    branch(cpu, cpu.psw.get(Carry), address);
}

/// JNC - Jump if Carry is not set
pub fn jnc(cpu: &mut InternalCpu, address: u8) {
    branch(cpu, !cpu.psw.get(Carry), address);
}

/// JZ - Jump if Accumulator is zero
pub fn jz(cpu: &mut InternalCpu, address: u8) {
    branch(cpu, cpu.acc == 0, address);
}

/// JNZ - Jump if Accumulator is not zero
pub fn jnz(cpu: &mut InternalCpu, address: u8) {
    branch(cpu, cpu.acc != 0, address);
}

/// JF0 - Jump if F0 is set
pub fn jf0(cpu: &mut InternalCpu, address: u8) {
    branch(cpu, cpu.psw.get(Flag0), address);
}

/// JF1 - Jump if F1 is set
pub fn jf1(cpu: &mut InternalCpu, address: u8) {
    branch(cpu, cpu.f1, address);
}

/// JNI - Jump if the interrupt line is asserted
pub fn jni(cpu: &mut InternalCpu, address: u8) {
    branch(cpu, cpu.irq_state, address);
}

/// JTF - Jump if the Timer Flag is set. Testing clears the flag.
pub fn jtf(cpu: &mut InternalCpu, address: u8) {
    let condition = cpu.t_flag;
    cpu.t_flag = false;
    branch(cpu, condition, address);
}

/// JBb - Jump if Accumulator bit `b` is set
pub fn jb(cpu: &mut InternalCpu, bit: u8, address: u8) {
    branch(cpu, cpu.acc & (1 << bit) != 0, address);
}

/// DJNZ Rr - Decrement register and jump if not zero
pub fn djnz_r(cpu: &mut InternalCpu, r: u8, address: u8) {
    let value = cpu.r(r).wrapping_sub(1);
    cpu.set_r(r, value);
    branch(cpu, value != 0, address);
}

/// JTn - Jump if test pin `n` is high
pub fn jt(cpu: &mut Cpu, pin: u8, address: u8) {
    let condition = cpu.test(pin);
    branch(&mut cpu.regs, condition, address);
}

/// JNTn - Jump if test pin `n` is low
pub fn jnt(cpu: &mut Cpu, pin: u8, address: u8) {
    let condition = !cpu.test(pin);
    branch(&mut cpu.regs, condition, address);
}

// Jumps and subroutines

/// JMP - Direct jump within the selected 2 kB bank
///
/// Operation:
/// A11 | page | address -> PC
///
/// A jump to itself, or to a `NOP` right before itself, is the way sound
/// programs wait for the next command. When idle skipping is enabled, the
/// rest of the cycle budget is dropped.
pub fn jmp(cpu: &mut Cpu, page: u8, address: u8) {
    let origin = cpu.regs.prev_pc;
    let target = cpu.regs.a11 | ((page as u16) << 8) | address as u16;
    cpu.regs.pc = target;

    if target == origin || (target.wrapping_add(1) == origin && cpu.read_opcode(target) == NOP) {
        cpu.skip_idle_loop();
    }
}

/// JMPP @A - Indirect jump within the current page
///
/// Operation:
/// (PC page | A) -> PC low byte
pub fn jmpp_xa(cpu: &mut Cpu, _: u8) {
    let address = (cpu.regs.pc & 0x0F00) | cpu.regs.acc as u16;
    let target = cpu.read_program(address);
    cpu.regs.jump_in_page(target);
}

/// CALL - Subroutine call within the selected 2 kB bank
///
/// Operation:
/// push PC low, push PC high | PSW flags
/// A11 | page | address -> PC
pub fn call(cpu: &mut InternalCpu, page: u8, address: u8) {
    cpu.push_return_address();
    cpu.pc = cpu.a11 | ((page as u16) << 8) | address as u16;
}

/// RET - Return from subroutine, PSW is untouched
pub fn ret(cpu: &mut InternalCpu) {
    cpu.pull_return_address();
}

/// RETR - Return and restore PSW flags
///
/// Also ends the interrupt being serviced, if any. `A11` is only reloaded
/// from the saved bank when the CPU is configured to do so.
pub fn retr(cpu: &mut Cpu, _: u8) {
    let packed = cpu.regs.pull_return_address();
    cpu.regs.psw.restore_flags(packed);
    cpu.regs.irq_executing = None;
    if cpu.settings.restore_bank_on_retr {
        cpu.regs.a11 = cpu.regs.a11_ff;
    }
}

// Interrupts, timer and counter

/// EN I - Enable external interrupt
///
/// An interrupt line already asserted raises the request right away.
pub fn en_i(cpu: &mut InternalCpu) {
    cpu.xirq_en = true;
    if cpu.irq_state {
        cpu.pending_irq.insert(PendingIrq::EXTERNAL);
    }
}

pub fn dis_i(cpu: &mut InternalCpu) {
    cpu.xirq_en = false;
}

pub fn en_tcnti(cpu: &mut InternalCpu) {
    cpu.tirq_en = true;
}

pub fn dis_tcnti(cpu: &mut InternalCpu) {
    cpu.tirq_en = false;
}

/// STRT T - Start timer, the prescaler restarts from 0
pub fn strt_t(cpu: &mut InternalCpu) {
    cpu.timer_on = true;
    cpu.count_on = false;
    cpu.master_clock = 0;
}

/// STRT CNT - Start event counter on T1
///
/// The current T1 level is latched so that only later rising edges count.
pub fn strt_cnt(cpu: &mut Cpu, _: u8) {
    cpu.regs.count_on = true;
    cpu.regs.timer_on = false;
    cpu.regs.old_t1 = cpu.test(1);
}

pub fn stop_tcnt(cpu: &mut InternalCpu) {
    cpu.timer_on = false;
    cpu.count_on = false;
}

/// ENT0 CLK - Enable clock output on T0. There's nothing to drive here.
pub fn ent0_clk(cpu: &mut InternalCpu) {
    debug!("PC = {:0>4X}, ENT0 CLK has no effect", cpu.prev_pc);
}

// Ports

/// IN A,Pp - Input port to Accumulator
pub fn in_a_p(cpu: &mut Cpu, p: u8) {
    cpu.regs.acc = cpu.read_port(ports::port(p));
}

/// OUTL Pp,A - Output Accumulator to port
pub fn outl_p_a(cpu: &mut Cpu, p: u8) {
    cpu.write_port(ports::port(p), cpu.regs.acc);
}

/// ORL Pp,data - Logical OR port with immediate data
pub fn orl_p_n(cpu: &mut Cpu, p: u8, operand: u8) {
    let port = ports::port(p);
    let data = cpu.read_port(port) | operand;
    cpu.write_port(port, data);
}

/// ANL Pp,data - Logical AND port with immediate data
pub fn anl_p_n(cpu: &mut Cpu, p: u8, operand: u8) {
    let port = ports::port(p);
    let data = cpu.read_port(port) & operand;
    cpu.write_port(port, data);
}

pub fn ins_a_bus(cpu: &mut Cpu, _: u8) {
    cpu.regs.acc = cpu.read_port(BUS);
}

pub fn outl_bus_a(cpu: &mut Cpu, _: u8) {
    cpu.write_port(BUS, cpu.regs.acc);
}

pub fn orl_bus_n(cpu: &mut Cpu, _: u8, operand: u8) {
    let data = cpu.read_port(BUS) | operand;
    cpu.write_port(BUS, data);
}

pub fn anl_bus_n(cpu: &mut Cpu, _: u8, operand: u8) {
    let data = cpu.read_port(BUS) & operand;
    cpu.write_port(BUS, data);
}

// Expander ports are 4 bits wide

/// MOVD A,Pp - Move expander port to Accumulator, high nibble cleared
pub fn movd_a_p(cpu: &mut Cpu, p: u8) {
    cpu.regs.acc = cpu.read_port(ports::port(p)) & 0x0F;
}

/// MOVD Pp,A - Move Accumulator low nibble to expander port
pub fn movd_p_a(cpu: &mut Cpu, p: u8) {
    cpu.write_port(ports::port(p), cpu.regs.acc & 0x0F);
}

pub fn orld_p_a(cpu: &mut Cpu, p: u8) {
    let port = ports::port(p);
    let data = (cpu.read_port(port) | cpu.regs.acc) & 0x0F;
    cpu.write_port(port, data);
}

pub fn anld_p_a(cpu: &mut Cpu, p: u8) {
    let port = ports::port(p);
    let data = (cpu.read_port(port) & cpu.regs.acc) & 0x0F;
    cpu.write_port(port, data);
}

/// NOP - No Operation
pub fn nop(_: &mut InternalCpu) {}

#![allow(non_snake_case)]

use crate::processor::instruction_set;
use crate::processor::instruction_set::*;
use crate::processor::internal_cpu::*;
use crate::processor::interrupt::{Interrupt, PendingIrq};
use crate::processor::status_register::*;
use StatusRegisterFlag::*;

fn cpu_with_acc(acc: u8) -> InternalCpu {
    InternalCpu {
        acc,
        ..Default::default()
    }
}

#[test]
fn test_arithmetic_instruction_ADD() {
    let mut cpu = cpu_with_acc(0xFF);
    instruction_set::add(&mut cpu, 0x01);
    assert_eq!(cpu.acc, 0x00);
    assert!(cpu.psw.get(Carry));
    assert!(cpu.psw.get(AuxiliaryCarry));

    let mut cpu = cpu_with_acc(0x38);
    instruction_set::add(&mut cpu, 0x08);
    assert_eq!(cpu.acc, 0x40);
    assert!(!cpu.psw.get(Carry));
    assert!(cpu.psw.get(AuxiliaryCarry));

    let mut cpu = cpu_with_acc(0xF0);
    instruction_set::add(&mut cpu, 0x20);
    assert_eq!(cpu.acc, 0x10);
    assert!(cpu.psw.get(Carry));
    assert!(!cpu.psw.get(AuxiliaryCarry));

    // incoming carry is ignored by ADD and cleared when not produced
    let mut cpu = cpu_with_acc(0x01);
    cpu.psw.set(Carry);
    instruction_set::add(&mut cpu, 0x01);
    assert_eq!(cpu.acc, 0x02);
    assert!(!cpu.psw.get(Carry));
}

#[test]
fn test_arithmetic_instruction_ADD_all_operands() {
    for acc in 0..=0xFFu8 {
        for data in (0..=0xFFu8).step_by(7) {
            let mut cpu = cpu_with_acc(acc);
            instruction_set::add(&mut cpu, data);

            assert_eq!(cpu.acc, acc.wrapping_add(data));
            assert_eq!(cpu.psw.get(Carry), acc as u16 + data as u16 > 0xFF);
            assert_eq!(cpu.psw.get(AuxiliaryCarry), (acc & 0xF) + (data & 0xF) > 0xF);
        }
    }
}

#[test]
fn test_arithmetic_instruction_ADDC() {
    let mut cpu = cpu_with_acc(0x0E);
    cpu.psw.set(Carry);
    instruction_set::addc(&mut cpu, 0x01);
    assert_eq!(cpu.acc, 0x10);
    assert!(!cpu.psw.get(Carry));
    assert!(cpu.psw.get(AuxiliaryCarry));

    let mut cpu = cpu_with_acc(0xFF);
    cpu.psw.set(Carry);
    instruction_set::addc(&mut cpu, 0x00);
    assert_eq!(cpu.acc, 0x00);
    assert!(cpu.psw.get(Carry));
}

#[test]
fn test_arithmetic_instruction_ADD_register_operands() {
    let mut cpu = cpu_with_acc(0x10);
    cpu.set_r(3, 0x05);
    instruction_set::add_a_r(&mut cpu, 3);
    assert_eq!(cpu.acc, 0x15);

    cpu.set_r(0, 0xC0);
    cpu.ram[0x40] = 0x20;
    instruction_set::add_a_xr(&mut cpu, 0);
    assert_eq!(cpu.acc, 0x35);
}

#[test]
fn test_decimal_adjust_DA() {
    let mut cpu = cpu_with_acc(0x0F);
    instruction_set::da_a(&mut cpu);
    assert_eq!(cpu.acc, 0x15);
    assert!(!cpu.psw.get(Carry));

    // 0x9A + 0x06 = 0xA0, then 0xA0 + 0x60 overflows into carry
    let mut cpu = cpu_with_acc(0x9A);
    instruction_set::da_a(&mut cpu);
    assert_eq!(cpu.acc, 0x00);
    assert!(cpu.psw.get(Carry));

    // 0x19 + 0x28 = 0x41 with aux carry, BCD 47
    let mut cpu = cpu_with_acc(0x19);
    instruction_set::add(&mut cpu, 0x28);
    instruction_set::da_a(&mut cpu);
    assert_eq!(cpu.acc, 0x47);
    assert!(!cpu.psw.get(Carry));

    // 0x99 + 0x99 = 0x132, BCD 198
    let mut cpu = cpu_with_acc(0x99);
    instruction_set::add(&mut cpu, 0x99);
    instruction_set::da_a(&mut cpu);
    assert_eq!(cpu.acc, 0x98);
    assert!(cpu.psw.get(Carry));
}

#[test]
fn test_increments_and_decrements() {
    let mut cpu = cpu_with_acc(0xFF);
    instruction_set::inc_a(&mut cpu);
    assert_eq!(cpu.acc, 0);
    instruction_set::dec_a(&mut cpu);
    assert_eq!(cpu.acc, 0xFF);
    assert!(!cpu.psw.get(Carry));

    instruction_set::dec_r(&mut cpu, 5);
    assert_eq!(cpu.r(5), 0xFF);
    instruction_set::inc_r(&mut cpu, 5);
    assert_eq!(cpu.r(5), 0);

    cpu.set_r(1, 0x30);
    instruction_set::inc_xr(&mut cpu, 1);
    assert_eq!(cpu.ram[0x30], 1);
}

#[test]
fn test_logic_instructions() {
    let mut cpu = cpu_with_acc(0b1100_1100);
    instruction_set::anl(&mut cpu, 0b1010_1010);
    assert_eq!(cpu.acc, 0b1000_1000);

    instruction_set::orl(&mut cpu, 0b0000_0011);
    assert_eq!(cpu.acc, 0b1000_1011);

    instruction_set::xrl(&mut cpu, 0xFF);
    assert_eq!(cpu.acc, 0b0111_0100);

    instruction_set::cpl_a(&mut cpu);
    assert_eq!(cpu.acc, 0b1000_1011);

    instruction_set::swap_a(&mut cpu);
    assert_eq!(cpu.acc, 0b1011_1000);

    instruction_set::clr_a(&mut cpu);
    assert_eq!(cpu.acc, 0);
}

#[test]
fn test_rotate_instructions() {
    let mut cpu = cpu_with_acc(0x81);

    instruction_set::rl_a(&mut cpu);
    assert_eq!(cpu.acc, 0x03);
    assert!(!cpu.psw.get(Carry));

    instruction_set::rr_a(&mut cpu);
    instruction_set::rr_a(&mut cpu);
    assert_eq!(cpu.acc, 0xC0);

    instruction_set::rlc_a(&mut cpu);
    assert_eq!(cpu.acc, 0x80);
    assert!(cpu.psw.get(Carry));

    instruction_set::rlc_a(&mut cpu);
    assert_eq!(cpu.acc, 0x01);
    assert!(cpu.psw.get(Carry));

    instruction_set::rrc_a(&mut cpu);
    assert_eq!(cpu.acc, 0x80);
    assert!(cpu.psw.get(Carry));

    instruction_set::clr_c(&mut cpu);
    instruction_set::rrc_a(&mut cpu);
    assert_eq!(cpu.acc, 0x40);
    assert!(!cpu.psw.get(Carry));
}

#[test]
fn test_data_moves() {
    let mut cpu = InternalCpu::default();

    instruction_set::mov_a_n(&mut cpu, 0x42);
    instruction_set::mov_r_a(&mut cpu, 7);
    assert_eq!(cpu.ram[7], 0x42);

    instruction_set::mov_r_n(&mut cpu, 0, 0xB0);
    instruction_set::mov_xr_a(&mut cpu, 0);
    // @R0 is masked to the 128 bytes of internal RAM
    assert_eq!(cpu.ram[0x30], 0x42);

    instruction_set::mov_xr_n(&mut cpu, 0, 0x99);
    instruction_set::mov_a_xr(&mut cpu, 0);
    assert_eq!(cpu.acc, 0x99);

    instruction_set::mov_a_r(&mut cpu, 7);
    assert_eq!(cpu.acc, 0x42);

    instruction_set::mov_t_a(&mut cpu);
    instruction_set::clr_a(&mut cpu);
    instruction_set::mov_a_t(&mut cpu);
    assert_eq!(cpu.timer, 0x42);
    assert_eq!(cpu.acc, 0x42);
}

#[test]
fn test_exchange_instructions() {
    let mut cpu = cpu_with_acc(0x12);
    cpu.set_r(2, 0x34);
    instruction_set::xch_a_r(&mut cpu, 2);
    assert_eq!(cpu.acc, 0x34);
    assert_eq!(cpu.r(2), 0x12);

    cpu.set_r(1, 0x40);
    cpu.ram[0x40] = 0xAB;
    instruction_set::xch_a_xr(&mut cpu, 1);
    assert_eq!(cpu.acc, 0xAB);
    assert_eq!(cpu.ram[0x40], 0x34);

    instruction_set::mov_a_n(&mut cpu, 0x9C);
    instruction_set::xchd_a_xr(&mut cpu, 1);
    assert_eq!(cpu.acc, 0x94);
    assert_eq!(cpu.ram[0x40], 0x3C);
}

#[test]
fn test_psw_moves() {
    let mut cpu = cpu_with_acc(0xD3);
    instruction_set::mov_psw_a(&mut cpu);

    assert!(cpu.psw.get(Carry));
    assert!(cpu.psw.get(BankSelect));
    assert_eq!(cpu.sp, 6);
    assert_eq!(cpu.register_bank(), 24);

    instruction_set::clr_a(&mut cpu);
    instruction_set::mov_a_psw(&mut cpu);
    assert_eq!(cpu.acc, 0xD3);
}

#[test]
fn test_flag_instructions() {
    let mut cpu = InternalCpu::default();

    instruction_set::cpl_c(&mut cpu);
    assert!(cpu.psw.get(Carry));
    instruction_set::clr_c(&mut cpu);
    assert!(!cpu.psw.get(Carry));

    instruction_set::cpl_f0(&mut cpu);
    assert!(cpu.psw.get(Flag0));
    instruction_set::clr_f0(&mut cpu);
    assert!(!cpu.psw.get(Flag0));

    instruction_set::cpl_f1(&mut cpu);
    assert!(cpu.f1);
    instruction_set::clr_f1(&mut cpu);
    assert!(!cpu.f1);
}

#[test]
fn test_register_bank_select() {
    let mut cpu = InternalCpu::default();

    instruction_set::sel_rb0(&mut cpu);
    instruction_set::mov_r_n(&mut cpu, 0, 0x11);
    assert_eq!(cpu.ram[0], 0x11);

    instruction_set::sel_rb1(&mut cpu);
    assert_eq!(cpu.r(0), 0);
    instruction_set::mov_r_n(&mut cpu, 0, 0x22);
    instruction_set::mov_r_n(&mut cpu, 7, 0x77);
    assert_eq!(cpu.ram[24], 0x22);
    assert_eq!(cpu.ram[31], 0x77);

    instruction_set::sel_rb0(&mut cpu);
    assert_eq!(cpu.r(0), 0x11);
    assert_eq!(cpu.ram[0], 0x11);
}

#[test]
fn test_memory_bank_select() {
    let mut cpu = InternalCpu::default();

    instruction_set::sel_mb1(&mut cpu);
    assert_eq!(cpu.a11, A11);
    assert_eq!(cpu.a11_ff, A11);

    instruction_set::sel_mb0(&mut cpu);
    assert_eq!(cpu.a11, 0);
    assert_eq!(cpu.a11_ff, 0);
}

#[test]
fn test_memory_bank_select_deferred_during_interrupt() {
    let mut cpu = InternalCpu {
        irq_executing: Some(Interrupt::External),
        ..Default::default()
    };

    instruction_set::sel_mb1(&mut cpu);
    assert_eq!(cpu.a11, 0);
    assert_eq!(cpu.a11_ff, A11);
}

#[test]
fn test_conditional_branches() {
    let mut cpu = InternalCpu {
        pc: 0x0312,
        ..Default::default()
    };

    instruction_set::jc(&mut cpu, 0x80);
    assert_eq!(cpu.pc, 0x0312);
    instruction_set::jnc(&mut cpu, 0x80);
    assert_eq!(cpu.pc, 0x0380);

    instruction_set::jz(&mut cpu, 0x20);
    assert_eq!(cpu.pc, 0x0320);
    instruction_set::jnz(&mut cpu, 0x40);
    assert_eq!(cpu.pc, 0x0320);

    cpu.psw.set(Flag0);
    instruction_set::jf0(&mut cpu, 0x44);
    assert_eq!(cpu.pc, 0x0344);

    instruction_set::jf1(&mut cpu, 0x55);
    assert_eq!(cpu.pc, 0x0344);

    cpu.irq_state = true;
    instruction_set::jni(&mut cpu, 0x66);
    assert_eq!(cpu.pc, 0x0366);
}

#[test]
fn test_branch_page_follows_operand() {
    // operand on the last byte of page 1, PC already moved to page 2
    let mut cpu = InternalCpu {
        pc: 0x0200,
        ..Default::default()
    };
    instruction_set::jz(&mut cpu, 0x10);
    assert_eq!(cpu.pc, 0x0110);

    // operand on the first byte of page 2
    let mut cpu = InternalCpu {
        pc: 0x0201,
        ..Default::default()
    };
    instruction_set::jz(&mut cpu, 0x10);
    assert_eq!(cpu.pc, 0x0210);
}

#[test]
fn test_timer_flag_branch_JTF() {
    let mut cpu = InternalCpu {
        pc: 0x0010,
        t_flag: true,
        ..Default::default()
    };

    instruction_set::jtf(&mut cpu, 0x30);
    assert_eq!(cpu.pc, 0x0030);
    assert!(!cpu.t_flag);

    instruction_set::jtf(&mut cpu, 0x50);
    assert_eq!(cpu.pc, 0x0030);
}

#[test]
fn test_accumulator_bit_branch_JB() {
    let mut cpu = InternalCpu {
        pc: 0x0110,
        acc: 0b0010_0000,
        ..Default::default()
    };

    instruction_set::jb(&mut cpu, 4, 0x80);
    assert_eq!(cpu.pc, 0x0110);
    instruction_set::jb(&mut cpu, 5, 0x80);
    assert_eq!(cpu.pc, 0x0180);
}

#[test]
fn test_decrement_and_jump_DJNZ() {
    let mut cpu = InternalCpu {
        pc: 0x0212,
        ..Default::default()
    };
    cpu.set_r(4, 2);

    instruction_set::djnz_r(&mut cpu, 4, 0x10);
    assert_eq!(cpu.r(4), 1);
    assert_eq!(cpu.pc, 0x0210);

    cpu.pc = 0x0212;
    instruction_set::djnz_r(&mut cpu, 4, 0x10);
    assert_eq!(cpu.r(4), 0);
    assert_eq!(cpu.pc, 0x0212);

    // 0 wraps to 0xFF and jumps
    instruction_set::djnz_r(&mut cpu, 4, 0x10);
    assert_eq!(cpu.r(4), 0xFF);
    assert_eq!(cpu.pc, 0x0210);
}

#[test]
fn test_subroutine_CALL_RET() {
    let mut cpu = InternalCpu {
        pc: 0x0345,
        ..Default::default()
    };
    cpu.psw.set(Carry);

    instruction_set::call(&mut cpu, 5, 0x67);
    assert_eq!(cpu.pc, 0x0567);
    assert_eq!(cpu.sp, 2);
    assert_eq!(cpu.ram[8], 0x45);
    assert_eq!(cpu.ram[9], 0x83);

    cpu.psw.clear(Carry);
    instruction_set::ret(&mut cpu);
    assert_eq!(cpu.pc, 0x0345);
    assert_eq!(cpu.sp, 0);
    // RET leaves the PSW flags alone
    assert!(!cpu.psw.get(Carry));
}

#[test]
fn test_subroutine_CALL_uses_bank() {
    let mut cpu = InternalCpu {
        pc: 0x0002,
        a11: A11,
        ..Default::default()
    };

    instruction_set::call(&mut cpu, 1, 0x00);
    assert_eq!(cpu.pc, 0x0900);
}

#[test]
fn test_nested_subroutines() {
    for depth in 1..=8 {
        let mut cpu = InternalCpu {
            pc: 0x0123,
            ..Default::default()
        };
        cpu.psw.reset();

        for level in 0..depth {
            instruction_set::call(&mut cpu, level as u8, 0x10 + level as u8);
        }
        for _ in 0..depth {
            instruction_set::ret(&mut cpu);
        }

        assert_eq!(cpu.pc, 0x0123);
        assert_eq!(cpu.sp, 0);
        assert_eq!(cpu.psw.stack_level(), 0);
    }
}

#[test]
fn test_interrupt_enables() {
    let mut cpu = InternalCpu::default();

    instruction_set::en_i(&mut cpu);
    assert!(cpu.xirq_en);
    assert!(cpu.pending_irq.is_empty());
    instruction_set::dis_i(&mut cpu);
    assert!(!cpu.xirq_en);

    // the line is already asserted: the request is raised right away
    cpu.irq_state = true;
    instruction_set::en_i(&mut cpu);
    assert!(cpu.pending_irq.contains(PendingIrq::EXTERNAL));

    instruction_set::en_tcnti(&mut cpu);
    assert!(cpu.tirq_en);
    instruction_set::dis_tcnti(&mut cpu);
    assert!(!cpu.tirq_en);
}

#[test]
fn test_timer_control() {
    let mut cpu = InternalCpu {
        master_clock: 17,
        count_on: true,
        ..Default::default()
    };

    instruction_set::strt_t(&mut cpu);
    assert!(cpu.timer_on);
    assert!(!cpu.count_on);
    assert_eq!(cpu.master_clock, 0);

    instruction_set::stop_tcnt(&mut cpu);
    assert!(!cpu.timer_on);
    assert!(!cpu.count_on);

    instruction_set::ent0_clk(&mut cpu);
    instruction_set::nop(&mut cpu);
    assert!(!cpu.timer_on);
}

#[test]
fn test_instruction_set_table() {
    let set = &INSTRUCTION_SET;
    let illegal = [
        0x01, 0x06, 0x0B, 0x22, 0x33, 0x38, 0x3B, 0x63, 0x66, 0x73, 0x82, 0x87, 0x8B, 0x9B, 0xA2,
        0xA6, 0xB7, 0xC0, 0xC1, 0xC2, 0xC3, 0xD6, 0xE0, 0xE1, 0xE2, 0xF3,
    ];

    for opcode in 0..=0xFFu8 {
        let instruction = set.lookup(opcode);
        assert_eq!(instruction.opcode, opcode);
        assert_eq!(instruction.is_illegal(), illegal.contains(&opcode), "{:0>2X}", opcode);
        assert!(instruction.cycles == 1 || instruction.cycles == 2);
    }

    assert_eq!(set.lookup(0x00).name, "NOP");
    assert_eq!(set.lookup(0x04).cycles, 2);
    assert_eq!(set.lookup(0xE4).selector, 7);
    assert_eq!(set.lookup(0xB2).selector, 5);
    assert_eq!(set.lookup(0x68).cycles, 1);
    assert_eq!(set.lookup(0x23).bytes(), 2);
    assert_eq!(set.lookup(0x83).bytes(), 1);
}

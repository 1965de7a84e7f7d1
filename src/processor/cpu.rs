
use log::{debug, info, trace};

use crate::errors::CpuError;
use crate::processor::disassembler;
use crate::processor::instruction::InstructionKind::*;
use crate::processor::instruction_set::INSTRUCTION_SET;
use crate::processor::internal_cpu::{InternalCpu, PC_MASK};
use crate::processor::interrupt::{Interrupt, LineState, PendingIrq, DISPATCH_CYCLES};
use crate::processor::ports::{self, PortAccess, BUS, P1, P2};
use crate::settings::CpuSettings;
use crate::types::{BankChangeCallback, IrqCallback, SharedBus};

pub const FAMILY: &str = "Intel 8039";
pub const VERSION: &str = "1.1";
pub const CREDITS: &str =
    "Copyright (C) 1997 by Mirko Buffoni\nBased on the original work (C) 1997 by Dan Boris";

/// Register addressed by the debugger API
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Register {
    Pc,
    Sp,
    Psw,
    A,
    IrqState,
    /// Working register of the selected bank
    R(u8),
    /// Return address `depth` levels below the top of the stack
    StackSlot(u8),
}

use Register::*;

impl Register {
    /// Classic numeric ids: PC=1, SP=2, PSW=3, A=4, IRQ_STATE=5, R0-R7=6-13.
    /// Negative ids peek the stack, -1 being the most recently pushed level.
    pub fn from_id(id: i32) -> Option<Self> {
        match id {
            1 => Some(Pc),
            2 => Some(Sp),
            3 => Some(Psw),
            4 => Some(A),
            5 => Some(IrqState),
            6..=13 => Some(R((id - 6) as u8)),
            id if id < 0 => Some(StackSlot((-(id + 1)) as u8)),
            _ => None,
        }
    }

    pub fn name(&self) -> String {
        match self {
            Pc => "PC".to_string(),
            Sp => "SP".to_string(),
            Psw => "PSW".to_string(),
            A => "A".to_string(),
            IrqState => "IRQ".to_string(),
            R(n) => format!("R{}", n & 0x07),
            StackSlot(depth) => format!("STK{}", depth & 0x07),
        }
    }
}

/// Identification and state strings returned by [`Cpu::info`]
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum InfoField {
    Name,
    Family,
    Version,
    File,
    Credits,
    Flags,
    Register(Register),
}

/// Intel MCS-48 (8035/8039/8048) processor emulator.
///
/// The CPU owns its register file and talks to the rest of the system
/// through a shared [`crate::interfaces::Bus`]. Time advances only inside
/// [`Cpu::execute`], which runs whole instructions until a cycle budget is
/// spent.
pub struct Cpu {
    pub(crate) regs: InternalCpu,
    bus: SharedBus,
    pub(crate) settings: CpuSettings,
    ports: Box<dyn PortAccess>,

    // cycles left in the current `execute` slice
    pub(crate) icount: i32,

    irq_callback: Option<IrqCallback>,
    bank_change_callback: Option<BankChangeCallback>,
}

impl Cpu {
    pub fn new(bus: SharedBus, settings: CpuSettings) -> Self {
        let mut cpu = Self {
            regs: InternalCpu::default(),
            bus,
            settings,
            ports: settings.port_handling.strategy(),
            icount: 0,
            irq_callback: None,
            bank_change_callback: None,
        };
        cpu.reset();
        cpu
    }

    pub fn reset(&mut self) {
        self.regs.reset();
        self.icount = 0;
        info!("{} reset", self.settings.variant.name());
    }

    pub fn settings(&self) -> &CpuSettings {
        &self.settings
    }

    /// Run instructions until at least `cycles` machine cycles have been
    /// consumed, returning the cycles actually spent. An instruction is never
    /// split, so the result can exceed the budget by one instruction (or one
    /// interrupt dispatch) worth of cycles.
    pub fn execute(&mut self, cycles: i32) -> i32 {
        self.icount = cycles;

        while self.icount > 0 {
            self.service_interrupt();
            self.step();
        }

        cycles - self.icount
    }

    fn service_interrupt(&mut self) {
        if let Some(interrupt) = self.regs.next_interrupt() {
            if interrupt == Interrupt::External {
                if let Some(callback) = self.irq_callback.as_mut() {
                    callback(0);
                }
            }

            match interrupt {
                Interrupt::External => debug!("PC = {:0>4X}, external interrupt", self.regs.pc),
                Interrupt::Timer => debug!("PC = {:0>4X}, timer interrupt", self.regs.pc),
                Interrupt::Counter => debug!("PC = {:0>4X}, counter interrupt", self.regs.pc),
            }

            self.regs.enter_interrupt(interrupt);
            self.icount -= DISPATCH_CYCLES;
            self.regs.tick_timer(DISPATCH_CYCLES as u8);
            self.notify_bank_change();
        }
    }

    /// Fetch, decode and execute a single instruction
    fn step(&mut self) {
        let pc = self.regs.pc;
        self.regs.prev_pc = pc;

        let opcode = self.read_opcode(pc);
        self.regs.advance_pc();

        let instruction = INSTRUCTION_SET.lookup(opcode);
        trace!("PC = {:0>4X}, {:0>2X} {}", pc, opcode, instruction.name);

        self.icount -= instruction.cycles as i32;

        let selector = instruction.selector;
        match instruction.instruction {
            Implied(fun) => fun(&mut self.regs),
            Selected(fun) => fun(&mut self.regs, selector),
            Immediate(fun) => {
                let operand = self.fetch_operand();
                fun(&mut self.regs, operand);
            }
            SelectedImmediate(fun) => {
                let operand = self.fetch_operand();
                fun(&mut self.regs, selector, operand);
            }
            Io(fun) => fun(self, selector),
            ImmediateIo(fun) => {
                let operand = self.fetch_operand();
                fun(self, selector, operand);
            }
            Illegal => debug!("PC = {:0>4X}, illegal opcode {:0>2X}", pc, opcode),
        }

        if self.regs.pc != pc.wrapping_add(instruction.bytes()) & PC_MASK {
            self.notify_bank_change();
        }

        // T1 is sampled once per machine cycle
        if self.regs.count_on {
            for _ in 0..instruction.cycles {
                let t1 = self.test(1);
                self.regs.sample_counter(t1);
            }
        }
        self.regs.tick_timer(instruction.cycles);
    }

    fn fetch_operand(&mut self) -> u8 {
        let operand = self.bus.borrow().read_opcode_arg(self.regs.pc);
        self.regs.advance_pc();
        operand
    }

    fn notify_bank_change(&mut self) {
        if let Some(callback) = self.bank_change_callback.as_mut() {
            callback(self.regs.pc);
        }
    }

    /// Drop the rest of the current cycle budget when idle loop skipping is on
    pub(crate) fn skip_idle_loop(&mut self) {
        if self.settings.busy_loop_skip && self.icount > 0 {
            self.icount = 0;
        }
    }

    pub(crate) fn read_program(&self, address: u16) -> u8 {
        self.bus.borrow().read_program(address)
    }

    pub(crate) fn read_opcode(&self, address: u16) -> u8 {
        self.bus.borrow().read_opcode(address)
    }

    pub(crate) fn read_port(&self, port: u16) -> u8 {
        let input = self.bus.borrow_mut().read_port(port);
        let latch = match port {
            P1 => self.regs.p1,
            P2 => self.regs.p2,
            _ => 0xFF,
        };
        self.ports.read(port, input, latch)
    }

    pub(crate) fn write_port(&mut self, port: u16, data: u8) {
        match port {
            P1 => self.regs.p1 = data,
            P2 => self.regs.p2 = data,
            BUS => self.regs.bus = data,
            _ => (),
        }
        self.bus.borrow_mut().write_port(port, data);
    }

    /// Level of test input `Tn`
    pub(crate) fn test(&self, n: u8) -> bool {
        self.bus.borrow_mut().read_port(ports::test_pin(n)) != 0
    }
}

// Lines and callbacks
impl Cpu {
    /// Drive the external interrupt pin. Only line 0 exists.
    pub fn set_irq_line(&mut self, line: usize, state: LineState) {
        if line != 0 {
            return;
        }

        match state {
            LineState::Assert => {
                self.regs.irq_state = true;
                self.regs.pending_irq.insert(PendingIrq::EXTERNAL);
            }
            LineState::Clear => {
                self.regs.irq_state = false;
                self.regs.pending_irq.remove(PendingIrq::EXTERNAL);
            }
        }
    }

    /// There is no NMI input on this family
    pub fn set_nmi_line(&mut self, _state: LineState) {}

    pub fn set_irq_callback(&mut self, callback: IrqCallback) {
        self.irq_callback = Some(callback);
    }

    pub fn set_bank_change_callback(&mut self, callback: BankChangeCallback) {
        self.bank_change_callback = Some(callback);
    }
}

// Context and snapshots
impl Cpu {
    /// Copy the register file into `dst`. Returns the context size.
    pub fn get_context(&self, dst: Option<&mut InternalCpu>) -> usize {
        if let Some(dst) = dst {
            *dst = self.regs.clone();
        }
        std::mem::size_of::<InternalCpu>()
    }

    /// Load the register file from `src`. Addresses are masked to 12 bits,
    /// the prescaler is reduced modulo 32 and the stack pointer is rebuilt
    /// from the level stored in the PSW.
    pub fn set_context(&mut self, src: Option<&InternalCpu>) {
        if let Some(src) = src {
            self.regs = src.clone();
            self.regs.normalize();
        }
    }

    pub fn save_state(&self) -> Result<Vec<u8>, CpuError> {
        let bytes = bincode::encode_to_vec(&self.regs, bincode::config::standard())?;
        Ok(bytes)
    }

    pub fn load_state(&mut self, bytes: &[u8]) -> Result<(), CpuError> {
        let (regs, read): (InternalCpu, usize) =
            bincode::decode_from_slice(bytes, bincode::config::standard())?;

        if read != bytes.len() {
            return Err(CpuError::SnapshotTrailingBytes {
                expected: read,
                got: bytes.len(),
            });
        }

        self.set_context(Some(&regs));
        Ok(())
    }
}

// Register access
impl Cpu {
    pub fn get_pc(&self) -> u16 {
        self.regs.pc
    }

    pub fn set_pc(&mut self, pc: u16) {
        self.regs.pc = pc & PC_MASK;
    }

    pub fn get_sp(&self) -> u8 {
        self.regs.sp
    }

    /// The stack holds 2 byte levels, odd pointers are rounded down
    pub fn set_sp(&mut self, sp: u8) {
        self.regs.sp = sp & 0x0E;
        self.regs.psw.mirror_stack_pointer(self.regs.sp);
    }

    pub fn get_reg(&self, reg: Register) -> u16 {
        match reg {
            Pc => self.regs.pc,
            Sp => self.regs.sp as u16,
            Psw => u8::from(self.regs.psw) as u16,
            A => self.regs.acc as u16,
            IrqState => self.regs.irq_state as u16,
            R(n) => self.regs.r(n) as u16,
            StackSlot(depth) => self.regs.stack_slot(depth),
        }
    }

    pub fn set_reg(&mut self, reg: Register, value: u16) {
        match reg {
            Pc => self.set_pc(value),
            Sp => self.set_sp(value as u8),
            Psw => {
                self.regs.psw = (value as u8).into();
                self.regs.derive_stack_pointer();
            }
            A => self.regs.acc = value as u8,
            IrqState => {
                let state = if value != 0 {
                    LineState::Assert
                } else {
                    LineState::Clear
                };
                self.set_irq_line(0, state);
            }
            R(n) => self.regs.set_r(n, value as u8),
            StackSlot(depth) => self.regs.set_stack_slot(depth, value),
        }
    }

    /// Unknown ids read as 0
    pub fn get_reg_by_id(&self, id: i32) -> u16 {
        Register::from_id(id).map_or(0, |reg| self.get_reg(reg))
    }

    /// Writes to unknown ids are ignored
    pub fn set_reg_by_id(&mut self, id: i32, value: u16) {
        if let Some(reg) = Register::from_id(id) {
            self.set_reg(reg, value);
        }
    }
}

// Debugger
impl Cpu {
    pub fn info(&self, field: InfoField) -> String {
        match field {
            InfoField::Name => self.settings.variant.name().to_string(),
            InfoField::Family => FAMILY.to_string(),
            InfoField::Version => VERSION.to_string(),
            InfoField::File => file!().to_string(),
            InfoField::Credits => CREDITS.to_string(),
            InfoField::Flags => self.flags_string(),
            InfoField::Register(reg) => match reg {
                Pc | StackSlot(_) => format!("{}:{:0>4X}", reg.name(), self.get_reg(reg)),
                _ => format!("{}:{:0>2X}", reg.name(), self.get_reg(reg)),
            },
        }
    }

    fn flags_string(&self) -> String {
        use crate::processor::status_register::StatusRegisterFlag::*;

        let psw = self.regs.psw;
        let letter = |set: bool, c: char| if set { c } else { '.' };
        format!(
            "{}{}{}{}:{}",
            letter(psw.get(Carry), 'C'),
            letter(psw.get(AuxiliaryCarry), 'A'),
            letter(psw.get(Flag0), 'F'),
            letter(psw.get(BankSelect), 'B'),
            psw.stack_level()
        )
    }

    /// Disassemble the instruction at `pc`. Returns the text and its length
    /// in bytes.
    pub fn dasm(&self, pc: u16) -> (String, usize) {
        disassembler::disassemble(&*self.bus.borrow(), pc)
    }
}

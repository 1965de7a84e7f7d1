use std::cell::RefCell;
use std::rc::Rc;

use anyhow::{bail, Context, Result};
use log::info;

use i8039_emulator::{Cpu, CpuSettings, InfoField, MemoryBus, Register};

const DEFAULT_CYCLES: i32 = 10_000;

fn usage() -> ! {
    eprintln!("usage: i8039-run <rom> [cycles] [--dasm]");
    std::process::exit(2);
}

fn main() -> Result<()> {
    env_logger::init();

    let mut rom_path = None;
    let mut cycles = DEFAULT_CYCLES;
    let mut listing = false;

    for arg in std::env::args().skip(1) {
        if arg == "--dasm" {
            listing = true;
        } else if arg == "-h" || arg == "--help" {
            usage();
        } else if rom_path.is_none() {
            rom_path = Some(arg);
        } else {
            cycles = arg
                .parse()
                .with_context(|| format!("Invalid cycle count '{}'", arg))?;
        }
    }

    let Some(rom_path) = rom_path else { usage() };
    if cycles < 0 {
        bail!("Cycle count must be positive");
    }

    let image = std::fs::read(&rom_path).with_context(|| format!("Unable to read '{}'", rom_path))?;

    let mut bus = MemoryBus::new("i8039");
    bus.load_program(&image)
        .with_context(|| format!("Unable to load '{}'", rom_path))?;
    let bus = Rc::new(RefCell::new(bus));

    let mut cpu = Cpu::new(bus, CpuSettings::default());

    if listing {
        let mut pc = 0;
        while (pc as usize) < image.len() {
            let (text, bytes) = cpu.dasm(pc);
            println!("{:0>3X}  {}", pc, text);
            pc += bytes as u16;
        }
        return Ok(());
    }

    info!("Running {} for {} cycles", cpu.info(InfoField::Name), cycles);
    let spent = cpu.execute(cycles);
    println!("{} cycles executed", spent);

    let registers = [Register::Pc, Register::A, Register::Psw, Register::Sp]
        .into_iter()
        .chain((0..8).map(Register::R))
        .map(|reg| cpu.info(InfoField::Register(reg)))
        .collect::<Vec<String>>();
    println!("{}", registers.join(" "));
    println!("Flags {}", cpu.info(InfoField::Flags));

    Ok(())
}

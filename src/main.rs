//! Command-line driver.
//!
//! Loads a cartridge, disassembles a window of PRG space, runs a number of
//! instructions through the debugger and prints the final registers.
//! Usage: nescore path/to/game.nes [--steps N] [--from ADDR] [--to ADDR]

use std::path::PathBuf;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use clap::Parser;
use log::{LevelFilter, debug, error, info};

use nescore::{
    cartridge::cartridge::Cartridge, cpu::cpu::CPU, debugger::debugger::Debugger, logger,
};

/// NTSC 2A03 clock: 21.477272 MHz master / 12.
const CPU_CLOCK_HZ: f64 = 1_789_773.0;

#[derive(Parser, Debug)]
#[command(name = "nescore", version, about = "NES 6502 interpreter and disassembler")]
struct Args {
    /// iNES image to load.
    rom: PathBuf,

    /// Number of instructions to execute.
    #[arg(long, default_value_t = 0)]
    steps: usize,

    /// First address of the disassembly window (hex).
    #[arg(long, value_name = "ADDR", default_value = "8000", value_parser = parse_address)]
    from: u16,

    /// End of the disassembly window, exclusive (hex). Decoding stops with an
    /// error on the first illegal opcode, so keep data such as the vector table
    /// ($FFFA, mirrored at $BFFA on 16K images) outside the window.
    #[arg(long, value_name = "ADDR", default_value = "FFFF", value_parser = parse_address)]
    to: u16,

    /// Print the decoded window to stdout.
    #[arg(long, default_value_t = false)]
    listing: bool,

    /// Log every executed instruction (same as --log-level trace).
    #[arg(long, default_value_t = false)]
    trace: bool,

    /// Sleep so execution runs at NTSC speed.
    #[arg(long, default_value_t = false)]
    realtime: bool,

    #[arg(long, value_name = "LEVEL", default_value_t = LevelFilter::Info)]
    log_level: LevelFilter,
}

/// Accepts `8000`, `$8000` or `0x8000`.
fn parse_address(raw: &str) -> Result<u16, String> {
    let trimmed = raw.trim();
    let hex = trimmed
        .strip_prefix('$')
        .or_else(|| trimmed.strip_prefix("0x"))
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    u16::from_str_radix(hex, 16).map_err(|e| format!("invalid address '{raw}': {e}"))
}

fn run(args: Args) -> Result<()> {
    let cart = Cartridge::load(&args.rom)
        .with_context(|| format!("failed to load {}", args.rom.display()))?;

    let mut dbg = Debugger::new(CPU::with_cartridge(&cart), args.from, args.to);
    let count = dbg
        .disassemble()
        .with_context(|| format!("disassembly of ${:04X}-${:04X} failed", args.from, args.to))?;
    info!("{count} lines in ${:04X}-${:04X}", args.from, args.to);

    if args.listing {
        for line in dbg.lines().lines() {
            println!("{line}");
        }
    }

    let start = Instant::now();
    for step in 0..args.steps {
        let line = dbg.step().context("execution stopped")?;
        match line {
            Some(index) => debug!("step {step}: line {index}"),
            None => debug!("step {step}: PC ${:04X} outside window", dbg.registers().pc),
        }

        if args.realtime {
            let due = Duration::from_secs_f64(dbg.cpu().total_cycles as f64 / CPU_CLOCK_HZ);
            if let Some(wait) = due.checked_sub(start.elapsed()) {
                std::thread::sleep(wait);
            }
        }
    }

    println!("{}", dbg.registers());
    println!("cycles: {}", dbg.cpu().total_cycles);
    Ok(())
}

fn main() {
    let args = Args::parse();

    let level = if args.trace {
        LevelFilter::Trace
    } else {
        args.log_level
    };
    if let Err(err) = logger::init(level) {
        eprintln!("logger: {err}");
    }

    if let Err(err) = run(args) {
        error!("{err:#}");
        std::process::exit(1);
    }
}

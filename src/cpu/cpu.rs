use std::fmt;

use ansi_term::Colour::Purple;
use log::{Level, debug, log_enabled, trace};

use crate::{
    bus::{Bus, NesBus},
    cartridge::cartridge::{Cartridge, PRG_ROM_ADDR},
    cpu::{
        addressing::{self, Operand},
        flags::{FLAG_BREAK, FLAG_INTERRUPT_DISABLE, FLAG_UNUSED, Flag},
        opcodes::{self, Opcode},
        registers::Registers,
    },
};

pub const NMI_VECTOR: u16 = 0xFFFA;
pub const RESET_VECTOR: u16 = 0xFFFC;
pub const IRQ_VECTOR: u16 = 0xFFFE;

const STACK_PAGE: u16 = 0x0100;

/// Decoding failure. Fatal: the program counter is left on the offending byte.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CpuError {
    IllegalOpcode { opcode: u8, address: u16 },
}

impl fmt::Display for CpuError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            CpuError::IllegalOpcode { opcode, address } => {
                write!(f, "illegal opcode ${opcode:02X} at ${address:04X}")
            }
        }
    }
}

impl std::error::Error for CpuError {}

pub struct CPU<B: Bus> {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub pc: u16,
    pub status: u8,
    /// Cycles owed by the current instruction or interrupt entry; paid to the bus in `step`.
    pub cycles: usize,
    /// Cycles paid since power-on.
    pub total_cycles: u64,
    pub bus: B,
}

impl CPU<NesBus> {
    /// Insert `cart` into a fresh bus and start execution at $8000.
    ///
    /// Test images rarely fill in the reset vector, so the PC is forced to the
    /// start of PRG space after the reset sequence.
    pub fn with_cartridge(cart: &Cartridge) -> Self {
        let mut cpu = CPU::new(NesBus::with_cartridge(cart));
        cpu.pc = PRG_ROM_ADDR;
        cpu
    }
}

impl<B: Bus> CPU<B> {
    /// Power on: registers cleared, then the reset sequence.
    pub fn new(bus: B) -> Self {
        let mut cpu = Self {
            a: 0,
            x: 0,
            y: 0,
            sp: 0,
            pc: 0,
            status: FLAG_UNUSED,
            cycles: 0,
            total_cycles: 0,
            bus,
        };
        cpu.reset();
        cpu
    }

    pub fn reset(&mut self) {
        self.pc = addressing::read_vector(&mut self.bus, RESET_VECTOR);

        self.sp = 0xFF;
        self.status = FLAG_UNUSED;

        self.a = 0;
        self.x = 0;
        self.y = 0;

        self.cycles = 8;
        debug!("reset, PC=${:04X}", self.pc);
    }

    /// Maskable interrupt. Returns false when interrupts are disabled.
    pub fn irq(&mut self) -> bool {
        if self.get_flag(Flag::InterruptDisable) {
            return false;
        }

        self.push_word(self.pc);
        self.push(self.status | FLAG_UNUSED);

        self.pc = addressing::read_vector(&mut self.bus, IRQ_VECTOR);
        self.status |= FLAG_BREAK | FLAG_INTERRUPT_DISABLE;

        self.cycles += 7;
        debug!("IRQ, PC=${:04X}", self.pc);
        true
    }

    pub fn nmi(&mut self) {
        self.push_word(self.pc);
        self.push(self.status | FLAG_UNUSED);

        self.pc = addressing::read_vector(&mut self.bus, NMI_VECTOR);
        self.status |= FLAG_BREAK;

        self.cycles += 8;
        debug!("NMI, PC=${:04X}", self.pc);
    }

    /// Execute exactly one instruction (servicing a pending interrupt first).
    /// Returns the cycles paid to the bus.
    pub fn step(&mut self) -> Result<usize, CpuError> {
        if self.bus.poll_nmi() {
            self.nmi();
        } else if self.bus.poll_irq() {
            self.irq();
        }

        let pc = self.pc;
        let byte = self.bus.read(pc);
        let opcode = *opcodes::decode(byte).ok_or(CpuError::IllegalOpcode {
            opcode: byte,
            address: pc,
        })?;

        let regs = self.registers();
        let operand = addressing::resolve(&mut self.bus, opcode.mode, &regs);

        if log_enabled!(Level::Trace) {
            self.trace(pc, byte, &opcode, &operand);
        }

        self.cycles += opcode.cycles as usize;
        if opcode.page_penalty && operand.page_crossed {
            self.cycles += 1;
        }

        if !self.execute(opcode.mnemonic, &operand) {
            self.pc = pc.wrapping_add(operand.len as u16);
        }

        let paid = std::mem::take(&mut self.cycles);
        self.bus.tick(paid);
        self.total_cycles += paid as u64;
        Ok(paid)
    }

    /// Step until an error or until `max_steps` instructions have run.
    /// Returns the number of instructions executed.
    pub fn run(&mut self, max_steps: Option<usize>) -> Result<usize, CpuError> {
        let mut steps = 0;
        while max_steps.is_none_or(|max| steps < max) {
            self.step()?;
            steps += 1;
        }
        Ok(steps)
    }

    pub fn registers(&self) -> Registers {
        Registers {
            a: self.a,
            x: self.x,
            y: self.y,
            sp: self.sp,
            status: self.status | FLAG_UNUSED,
            pc: self.pc,
        }
    }

    pub fn set_flag(&mut self, flag: Flag, condition: bool) {
        if condition {
            self.status |= flag.mask();
        } else {
            self.status &= !flag.mask();
        }
    }

    pub fn clear_flag(&mut self, flag: Flag) {
        self.status &= !flag.mask();
    }

    pub fn get_flag(&self, flag: Flag) -> bool {
        match flag {
            Flag::Unused => true,
            _ => self.status & flag.mask() != 0,
        }
    }

    pub fn push(&mut self, value: u8) {
        let addr = STACK_PAGE | self.sp as u16;
        self.bus.write(addr, value);
        self.sp = self.sp.wrapping_sub(1);
    }

    pub fn pop(&mut self) -> u8 {
        self.sp = self.sp.wrapping_add(1);
        let addr = STACK_PAGE | self.sp as u16;
        self.bus.read(addr)
    }

    pub(crate) fn push_word(&mut self, value: u16) {
        self.push((value >> 8) as u8);
        self.push(value as u8);
    }

    pub(crate) fn pop_word(&mut self) -> u16 {
        let lo = self.pop() as u16;
        let hi = self.pop() as u16;
        (hi << 8) | lo
    }

    pub(crate) fn update_zero_and_negative_flags(&mut self, value: u8) {
        self.set_flag(Flag::Zero, value == 0);
        self.set_flag(Flag::Negative, value & 0x80 != 0);
    }

    fn trace(&self, pc: u16, byte: u8, opcode: &Opcode, operand: &Operand) {
        let mut raw = format!("{byte:02X}");
        for b in &operand.bytes[..opcode.mode.operand_len() as usize] {
            raw.push_str(&format!(" {b:02X}"));
        }
        let asm = format!(
            "{} {}",
            opcode.mnemonic,
            addressing::operand_text(opcode.mode, operand.bytes)
        );
        trace!(
            "{:04X}  {:<8}  {} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} SP:{:02X} CYC:{}",
            pc,
            raw,
            Purple.paint(format!("{:<14}", asm.trim_end())),
            self.a,
            self.x,
            self.y,
            self.status,
            self.sp,
            self.total_cycles
        );
    }
}

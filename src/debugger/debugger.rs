use log::debug;

use crate::{
    bus::{Bus, NesBus},
    cpu::{
        cpu::{CPU, CpuError},
        registers::Registers,
    },
    debugger::disassembler::{self, DecodedLine, Disassembly},
};

/// Owns a CPU and keeps a disassembly of a fixed address window next to it,
/// so a front end can highlight the line under the program counter.
pub struct Debugger<B: Bus = NesBus> {
    cpu: CPU<B>,
    low: u16,
    high: u16,
    lines: Disassembly,
}

impl<B: Bus> Debugger<B> {
    /// Attach to `cpu` with the window `[low, high)`. No lines until `disassemble`.
    pub fn new(cpu: CPU<B>, low: u16, high: u16) -> Self {
        Self {
            cpu,
            low,
            high,
            lines: Disassembly::new(),
        }
    }

    /// (Re)decode the window, replacing any earlier lines. Returns the line count.
    pub fn disassemble(&mut self) -> Result<usize, CpuError> {
        self.lines = disassembler::disassemble(&self.cpu.bus, self.low, self.high)?;
        debug!(
            "disassembled ${:04X}-${:04X}: {} lines",
            self.low,
            self.high,
            self.lines.count()
        );
        Ok(self.lines.count())
    }

    pub fn line_count(&self) -> usize {
        self.lines.count()
    }

    pub fn get_line(&self, index: usize) -> Option<&DecodedLine> {
        self.lines.line_at(index)
    }

    pub fn lines(&self) -> &Disassembly {
        &self.lines
    }

    pub fn window(&self) -> (u16, u16) {
        (self.low, self.high)
    }

    /// Execute one instruction. Returns the index of the line at the new
    /// program counter, if the window has one.
    pub fn step(&mut self) -> Result<Option<usize>, CpuError> {
        self.cpu.step()?;
        Ok(self.lines.find_line_for_address(self.cpu.pc))
    }

    pub fn registers(&self) -> Registers {
        self.cpu.registers()
    }

    pub fn cpu(&self) -> &CPU<B> {
        &self.cpu
    }

    pub fn cpu_mut(&mut self) -> &mut CPU<B> {
        &mut self.cpu
    }
}

//! Memory bus and address decoding for the NES.
//!
//! Maps CPU addresses onto one flat 64 KiB array: mirrored internal RAM, the
//! (unimplemented) PPU register window, plain storage for $4000–$7FFF and
//! mapper-translated cartridge space.

use log::warn;

use crate::cartridge::{
    cartridge::{Cartridge, PRG_ROM_ADDR, TRAINER_ADDR},
    mapper::{MapperKind, mapper::Mapper},
};

pub const MEMORY_SIZE: usize = 0x10000;
pub const RAM_SIZE: usize = 0x0800;
pub const ZERO_PAGE_SIZE: usize = 0x0100;

/// Trait for memory-mapped I/O and bus access used by the CPU.
pub trait Bus {
    fn read(&mut self, addr: u16) -> u8;
    fn write(&mut self, addr: u16, data: u8);

    /// Read without side effects. Used by the disassembler.
    fn peek(&self, addr: u16) -> u8;

    /// Called after every instruction with the cycles it consumed.
    fn tick(&mut self, _cycles: usize) {}

    /// Consume a pending NMI, if any.
    fn poll_nmi(&mut self) -> bool {
        false
    }

    /// Level of the IRQ line. The CPU ignores it while interrupts are disabled.
    fn poll_irq(&mut self) -> bool {
        false
    }
}

/// Main NES bus: flat address space plus the cartridge's mapper.
pub struct NesBus {
    mem: Vec<u8>,
    mapper: Option<MapperKind>,
    /// Last value driven on the data bus; what the PPU window reads back.
    open_bus: u8,
    cycles: u64,
    nmi_pending: bool,
    irq_line: bool,
}

impl NesBus {
    /// Create an empty bus with no cartridge; $8000–$FFFF is plain storage.
    pub fn new() -> Self {
        Self {
            mem: vec![0; MEMORY_SIZE],
            mapper: None,
            open_bus: 0,
            cycles: 0,
            nmi_pending: false,
            irq_line: false,
        }
    }

    /// Create a bus with `cart` inserted.
    pub fn with_cartridge(cart: &Cartridge) -> Self {
        let mut bus = Self::new();
        bus.insert_cartridge(cart);
        bus
    }

    /// Copy the trainer and PRG ROM into the address space and install the mapper.
    pub fn insert_cartridge(&mut self, cart: &Cartridge) {
        if let Some(trainer) = &cart.trainer {
            self.load(TRAINER_ADDR, trainer);
        }

        let window = MEMORY_SIZE - PRG_ROM_ADDR as usize;
        let prg = if cart.prg_rom.len() > window {
            warn!(
                "PRG-ROM is {} bytes; only the first {} are visible without bank switching",
                cart.prg_rom.len(),
                window
            );
            &cart.prg_rom[..window]
        } else {
            &cart.prg_rom[..]
        };
        self.load(PRG_ROM_ADDR, prg);
        self.mapper = Some(cart.mapper);
    }

    /// Copy `bytes` into the flat array starting at `addr`, bypassing decoding.
    /// Bytes that would run past $FFFF are dropped.
    pub fn load(&mut self, addr: u16, bytes: &[u8]) {
        let start = addr as usize;
        let end = (start + bytes.len()).min(MEMORY_SIZE);
        self.mem[start..end].copy_from_slice(&bytes[..end - start]);
    }

    pub fn mapper(&self) -> Option<&MapperKind> {
        self.mapper.as_ref()
    }

    /// The first 256 bytes.
    pub fn zero_page(&self) -> &[u8] {
        &self.mem[..ZERO_PAGE_SIZE]
    }

    /// The 2 KiB of internal RAM (mirrored through $1FFF).
    pub fn ram(&self) -> &[u8] {
        &self.mem[..RAM_SIZE]
    }

    /// Total cycles reported through `tick`.
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    pub fn request_nmi(&mut self) {
        self.nmi_pending = true;
    }

    pub fn set_irq(&mut self, asserted: bool) {
        self.irq_line = asserted;
    }

    fn map_read(&self, addr: u16) -> Option<usize> {
        match addr {
            // Internal RAM (mirrored 4x in 0x0000-0x1FFF)
            0x0000..=0x1FFF => Some((addr & 0x07FF) as usize),
            // PPU registers $2000-$3FFF: no picture unit behind them
            0x2000..=0x3FFF => None,
            0x4000..=0x7FFF => Some(addr as usize),
            0x8000..=0xFFFF => Some(match &self.mapper {
                Some(m) => m.map_read(addr),
                None => addr as usize,
            }),
        }
    }

    fn map_write(&self, addr: u16) -> Option<usize> {
        match addr {
            0x0000..=0x1FFF => Some((addr & 0x07FF) as usize),
            0x2000..=0x3FFF => None,
            0x4000..=0x7FFF => Some(addr as usize),
            0x8000..=0xFFFF => Some(match &self.mapper {
                Some(m) => m.map_write(addr),
                None => addr as usize,
            }),
        }
    }
}

impl Default for NesBus {
    fn default() -> Self {
        Self::new()
    }
}

impl Bus for NesBus {
    fn read(&mut self, addr: u16) -> u8 {
        let data = self.peek(addr);
        self.open_bus = data;
        data
    }

    fn write(&mut self, addr: u16, data: u8) {
        self.open_bus = data;
        if let Some(offset) = self.map_write(addr) {
            self.mem[offset] = data;
        }
    }

    fn peek(&self, addr: u16) -> u8 {
        match self.map_read(addr) {
            Some(offset) => self.mem[offset],
            None => self.open_bus,
        }
    }

    fn tick(&mut self, cycles: usize) {
        self.cycles += cycles as u64;
    }

    fn poll_nmi(&mut self) -> bool {
        std::mem::take(&mut self.nmi_pending)
    }

    fn poll_irq(&mut self) -> bool {
        self.irq_line
    }
}

//! Mapper 0 (NROM): no bank switching, 16/32KB PRG.

use crate::cartridge::mapper::{Mirroring, mapper::Mapper};

/// Size of one PRG bank; NROM-128 carries a single bank mirrored into $C000–$FFFF.
pub const PRG_BANK_SIZE: usize = 16 * 1024;

/// NROM mapper: fixed PRG, optionally 16KB PRG mirror.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapper0 {
    prg_rom_size: usize,
    mirroring: Mirroring,
}

impl Mapper0 {
    /// Create Mapper0 for a PRG ROM of `prg_rom_size` bytes.
    pub fn new(prg_rom_size: usize, mirroring: Mirroring) -> Self {
        Self {
            prg_rom_size,
            mirroring,
        }
    }

    fn translate(&self, addr: u16) -> usize {
        // PRG ROM: $8000-$FFFF, mirror if 16KB
        if self.prg_rom_size == PRG_BANK_SIZE {
            0x8000 + (addr as usize & (PRG_BANK_SIZE - 1))
        } else {
            addr as usize
        }
    }
}

impl Mapper for Mapper0 {
    fn map_read(&self, addr: u16) -> usize {
        self.translate(addr)
    }

    fn map_write(&self, addr: u16) -> usize {
        self.translate(addr)
    }

    fn mirroring(&self) -> Mirroring {
        self.mirroring
    }
}

//! NES mappers for PRG memory mapping.
//!
//! Only Mapper0 (NROM) is implemented; `MapperKind` holds the supported boards
//! and rejects every other iNES mapper number.

use crate::cartridge::cartridge::LoadError;

/// Nametable mirroring mode for PPU.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mirroring {
    Horizontal,
    Vertical,
    FourScreen,
}

pub mod mapper;

pub mod mapper0;

use mapper::Mapper;
use mapper0::Mapper0;

/// The mapper chosen for a cartridge, fixed for its lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MapperKind {
    Nrom(Mapper0),
}

impl MapperKind {
    /// Select the mapper for iNES mapper number `id`.
    pub fn select(id: u8, prg_rom_size: usize, mirroring: Mirroring) -> Result<Self, LoadError> {
        match id {
            0 => Ok(MapperKind::Nrom(Mapper0::new(prg_rom_size, mirroring))),
            _ => Err(LoadError::UnsupportedMapper(id)),
        }
    }

    /// iNES mapper number.
    pub fn id(&self) -> u8 {
        match self {
            MapperKind::Nrom(_) => 0,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            MapperKind::Nrom(_) => "NROM",
        }
    }
}

impl Mapper for MapperKind {
    fn map_read(&self, addr: u16) -> usize {
        match self {
            MapperKind::Nrom(m) => m.map_read(addr),
        }
    }

    fn map_write(&self, addr: u16) -> usize {
        match self {
            MapperKind::Nrom(m) => m.map_write(addr),
        }
    }

    fn mirroring(&self) -> Mirroring {
        match self {
            MapperKind::Nrom(m) => m.mirroring(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_rejects_unimplemented_boards() {
        assert!(matches!(
            MapperKind::select(1, 0x8000, Mirroring::Horizontal),
            Err(LoadError::UnsupportedMapper(1))
        ));
        assert!(matches!(
            MapperKind::select(4, 0x8000, Mirroring::Horizontal),
            Err(LoadError::UnsupportedMapper(4))
        ));
    }

    #[test]
    fn select_nrom() {
        let m = MapperKind::select(0, 0x4000, Mirroring::Vertical).unwrap();
        assert_eq!(m.id(), 0);
        assert_eq!(m.name(), "NROM");
        assert_eq!(m.map_read(0xC000), 0x8000);
    }
}

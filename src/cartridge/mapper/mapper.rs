//! Mapper trait: CPU address decoding for cartridge space.

use crate::cartridge::mapper::Mirroring;

/// Trait for NES cartridge mappers. The bus asks the mapper where in its flat
/// address space a CPU access to $8000–$FFFF actually lands.
pub trait Mapper {
    /// Physical offset into the bus memory for a CPU read at `addr`.
    fn map_read(&self, addr: u16) -> usize;
    /// Physical offset into the bus memory for a CPU write at `addr`.
    fn map_write(&self, addr: u16) -> usize;
    /// Nametable mirroring declared by the board.
    fn mirroring(&self) -> Mirroring;
}

//! NES cartridge loading and mapper support.
//!
//! - **cartridge**: Loads iNES (.nes) files, holds header metadata, trainer and PRG ROM.
//! - **mapper**: NROM (0); CPU address decoding for $8000–$FFFF.

pub mod cartridge;
pub mod mapper;

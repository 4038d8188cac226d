//! NES cartridge loading from iNES format (.nes files).
//!
//! Implements the [iNES](https://www.nesdev.org/wiki/INES) format: 16-byte header (magic "NES\x1A",
//! PRG size in 16 KiB units, CHR size in 8 KiB units, flags 6–7 for mapper, etc.), an optional
//! 512-byte trainer, then PRG ROM, then CHR ROM. [NES 2.0](https://www.nesdev.org/wiki/NES_2.0)
//! images are recognized and rejected. CHR data is not used by this core; only its size is kept.

use std::fmt;
use std::fs;
use std::io;
use std::path::Path;

use log::{info, warn};

use crate::cartridge::mapper::{MapperKind, Mirroring};

/// "NES" followed by MS-DOS end-of-file.
pub const INES_MAGIC: [u8; 4] = *b"NES\x1A";
pub const HEADER_SIZE: usize = 16;
pub const TRAINER_SIZE: usize = 512;
/// The trainer is placed here in CPU address space.
pub const TRAINER_ADDR: u16 = 0x7000;
/// Start of cartridge PRG space; also where execution begins after a load.
pub const PRG_ROM_ADDR: u16 = 0x8000;

const PRG_UNIT: usize = 16 * 1024;
const CHR_UNIT: usize = 8 * 1024;

/// Reasons a cartridge image cannot be loaded. All are terminal for the run.
#[derive(Debug)]
pub enum LoadError {
    /// The file could not be opened or read.
    Io(io::Error),
    /// Fewer than 16 bytes: no complete header.
    TruncatedHeader,
    /// Magic constant is not `NES\x1A`.
    UnrecognizedFormat,
    /// NES 2.0 header: recognized but not supported.
    UnsupportedFormatVersion,
    /// Mapper number other than 0.
    UnsupportedMapper(u8),
    /// Header declares a trainer but the file ends before 512 bytes of it.
    TruncatedTrainer,
    /// Header declares more PRG ROM than the file holds.
    TruncatedProgramData { expected: usize, available: usize },
}

impl fmt::Display for LoadError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LoadError::Io(e) => write!(f, "failed to read ROM: {e}"),
            LoadError::TruncatedHeader => write!(f, "file is too short for an iNES header"),
            LoadError::UnrecognizedFormat => write!(f, "unknown format (bad iNES magic)"),
            LoadError::UnsupportedFormatVersion => write!(f, "NES 2.0 images are not supported"),
            LoadError::UnsupportedMapper(id) => write!(f, "unimplemented mapper number {id}"),
            LoadError::TruncatedTrainer => write!(f, "file ends inside the 512-byte trainer"),
            LoadError::TruncatedProgramData {
                expected,
                available,
            } => write!(
                f,
                "failed to copy PRG-ROM: expected {expected} bytes, only {available} available"
            ),
        }
    }
}

impl std::error::Error for LoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            LoadError::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<io::Error> for LoadError {
    fn from(e: io::Error) -> Self {
        LoadError::Io(e)
    }
}

/// Header flavor, from flags 7 bits 2–3.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InesFormat {
    Ines,
    Nes20,
}

impl fmt::Display for InesFormat {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            InesFormat::Ines => f.write_str("iNES"),
            InesFormat::Nes20 => f.write_str("NES 2.0"),
        }
    }
}

/// Decoded iNES header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    pub format: InesFormat,
    pub prg_rom_size: usize,
    pub chr_rom_size: usize,
    pub mapper_id: u8,
    pub mirroring: Mirroring,
    pub battery: bool,
    pub has_trainer: bool,
}

impl Header {
    /// Parse and validate the first 16 bytes of an image.
    pub fn parse(data: &[u8]) -> Result<Self, LoadError> {
        let header = data.get(..HEADER_SIZE).ok_or(LoadError::TruncatedHeader)?;

        if header[0..4] != INES_MAGIC {
            return Err(LoadError::UnrecognizedFormat);
        }

        let flags6 = header[6];
        let flags7 = header[7];

        // NES 2.0 if (flags7 & 0x0C) == 0x08
        if flags7 & 0x0C == 0x08 {
            return Err(LoadError::UnsupportedFormatVersion);
        }

        if header[10] & 0xF0 != 0 {
            warn!(
                "high nibble of header byte 10 is ${:02X}; ignoring (padding may hold a ripper tag)",
                header[10] & 0xF0
            );
        }

        // Mapper number: low nibble from flags 6, high nibble from flags 7.
        let mapper_id = (flags7 & 0xF0) | (flags6 >> 4);

        // Mirroring from flags 6 bit 0 (1 = vertical); bit 3 overrides with four-screen VRAM.
        let mirroring = if flags6 & 0b1000 != 0 {
            Mirroring::FourScreen
        } else if flags6 & 0b0001 != 0 {
            Mirroring::Vertical
        } else {
            Mirroring::Horizontal
        };

        Ok(Self {
            format: InesFormat::Ines,
            prg_rom_size: header[4] as usize * PRG_UNIT,
            chr_rom_size: header[5] as usize * CHR_UNIT,
            mapper_id,
            mirroring,
            battery: flags6 & 0b0010 != 0,
            has_trainer: flags6 & 0b0100 != 0,
        })
    }
}

/// A loaded cartridge: header metadata, trainer and PRG ROM, plus the selected mapper.
/// The bus copies `trainer` and `prg_rom` into its address space when the cartridge is inserted.
#[derive(Debug, Clone)]
pub struct Cartridge {
    pub header: Header,
    pub trainer: Option<Vec<u8>>,
    pub prg_rom: Vec<u8>,
    pub mapper: MapperKind,
}

impl Cartridge {
    /// Load cartridge from an iNES file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, LoadError> {
        let path = path.as_ref();
        let data = fs::read(path)?;
        info!("opened ROM {} ({} bytes)", path.display(), data.len());
        Self::from_bytes(&data)
    }

    /// Parse an in-memory iNES image.
    pub fn from_bytes(data: &[u8]) -> Result<Self, LoadError> {
        let header = Header::parse(data)?;
        let mut offset = HEADER_SIZE;

        let trainer = if header.has_trainer {
            let bytes = data
                .get(offset..offset + TRAINER_SIZE)
                .ok_or(LoadError::TruncatedTrainer)?;
            offset += TRAINER_SIZE;
            Some(bytes.to_vec())
        } else {
            None
        };

        let mapper = MapperKind::select(header.mapper_id, header.prg_rom_size, header.mirroring)?;

        let available = data.len().saturating_sub(offset);
        let prg_rom = data
            .get(offset..offset + header.prg_rom_size)
            .ok_or(LoadError::TruncatedProgramData {
                expected: header.prg_rom_size,
                available,
            })?
            .to_vec();

        info!(
            "format: {}, PRG-ROM {} KiB, CHR-ROM {} KiB, mapper {} ({}), {:?} mirroring{}",
            header.format,
            header.prg_rom_size / 1024,
            header.chr_rom_size / 1024,
            mapper.id(),
            mapper.name(),
            header.mirroring,
            if header.has_trainer { ", trainer" } else { "" }
        );

        Ok(Self {
            header,
            trainer,
            prg_rom,
            mapper,
        })
    }

    pub fn prg_rom_size(&self) -> usize {
        self.header.prg_rom_size
    }

    pub fn chr_rom_size(&self) -> usize {
        self.header.chr_rom_size
    }
}

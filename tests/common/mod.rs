//! Helpers for building minimal iNES (v1) images in tests.
//!
//! - bytes[0..4] = b"NES\x1A"
//! - byte 4 = PRG ROM size in 16 KiB units
//! - byte 5 = CHR ROM size in 8 KiB units
//! - byte 6 = Flags 6 (mirroring, battery, trainer, mapper low nibble)
//! - byte 7 = Flags 7 (NES 2.0 indicator, mapper high nibble)

#![allow(dead_code)]

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

pub const PRG_UNIT: usize = 16 * 1024;
pub const CHR_UNIT: usize = 8 * 1024;

/// Header plus optional trainer, PRG filled from `prg` (zero padded) and CHR filled with $CC.
pub fn build_ines(
    prg_16k: usize,
    chr_8k: usize,
    flags6: u8,
    flags7: u8,
    trainer: Option<&[u8; 512]>,
    prg: &[u8],
) -> Vec<u8> {
    let mut bytes = Vec::with_capacity(16 + 512 + prg_16k * PRG_UNIT + chr_8k * CHR_UNIT);

    bytes.extend_from_slice(b"NES\x1A");
    bytes.push(prg_16k as u8);
    bytes.push(chr_8k as u8);
    bytes.push(flags6);
    bytes.push(flags7);
    bytes.extend_from_slice(&[0u8; 8]);

    if let Some(t) = trainer {
        bytes.extend_from_slice(t);
    }

    let mut bank = vec![0u8; prg_16k * PRG_UNIT];
    let n = prg.len().min(bank.len());
    bank[..n].copy_from_slice(&prg[..n]);
    bytes.extend_from_slice(&bank);

    bytes.extend(std::iter::repeat_n(0xCC, chr_8k * CHR_UNIT));
    bytes
}

/// NROM-128 image with `program` at the start of PRG.
pub fn nrom_with_program(program: &[u8]) -> Vec<u8> {
    build_ines(1, 1, 0, 0, None, program)
}

/// PRG bytes that differ at every offset within a bank.
pub fn pattern(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i ^ (i >> 8) ^ (i >> 13)) as u8).collect()
}

/// Write `bytes` to a unique file under the temp dir.
pub fn write_temp_rom(tag: &str, bytes: &[u8]) -> PathBuf {
    let stamp = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_nanos();
    let path = std::env::temp_dir().join(format!(
        "nescore_{tag}_{}_{stamp}.nes",
        std::process::id()
    ));
    std::fs::write(&path, bytes).expect("write temp ROM");
    path
}

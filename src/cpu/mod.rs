//! 6502 CPU emulation for the NES (2A03: no decimal mode).
//!
//! Table-driven: `opcodes` maps each byte to a mnemonic, addressing mode and
//! cycle count, `addressing` resolves the operand, `instructions` applies it.
//! Bus trait used for memory and interrupts.

pub mod addressing;
pub mod cpu;
pub mod flags;
mod instructions;
pub mod opcodes;
pub mod registers;

//! nescore: the processing core of an NES emulator written in Rust.
//!
//! Interprets the Ricoh 2A03's 6502 instruction set (no decimal mode) as
//! documented on the [NESdev Wiki](https://www.nesdev.org/wiki/CPU), with the
//! cartridge and bus plumbing needed to run an iNES image and a disassembler
//! that steps alongside the CPU.
//!
//! ## Modules (NESdev references)
//!
//! - **bus** – [CPU memory map](https://www.nesdev.org/wiki/CPU_memory_map): mirrored RAM,
//!   open-bus PPU window, cartridge space through the mapper
//! - **cartridge** – [iNES](https://www.nesdev.org/wiki/INES) loading; [Mapper](https://www.nesdev.org/wiki/Mapper) NROM (0)
//! - **cpu** – [6502](https://www.nesdev.org/wiki/CPU): 151 official opcodes, reset/[NMI](https://www.nesdev.org/wiki/NMI)/IRQ
//! - **debugger** – disassembly of an address window, PC-to-line lookup while stepping
//! - **logger** – colored `log` backend for the command line

pub mod bus;
pub mod cartridge;
pub mod cpu;
pub mod debugger;
pub mod logger;

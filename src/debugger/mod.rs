//! Disassembly and single-step support for front ends.
//!
//! - **disassembler**: decodes a window of the bus with `peek` into `DecodedLine`s.
//! - **debugger**: owns the CPU, keeps the decoded lines and maps the PC back to a line.

pub mod debugger;
pub mod disassembler;

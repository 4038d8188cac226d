//! Read-only register snapshot handed to debuggers and the addressing resolver.

use std::fmt;

use crate::cpu::flags::{self, Flag};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Registers {
    pub a: u8,
    pub x: u8,
    pub y: u8,
    pub sp: u8,
    pub status: u8,
    pub pc: u16,
}

impl Registers {
    pub fn flag(&self, flag: Flag) -> bool {
        self.status & flag.mask() != 0
    }
}

impl fmt::Display for Registers {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "PC:{:04X} A:{:02X} X:{:02X} Y:{:02X} P:{:02X} [{}] SP:{:02X}",
            self.pc,
            self.a,
            self.x,
            self.y,
            self.status,
            flags::describe(self.status),
            self.sp
        )
    }
}

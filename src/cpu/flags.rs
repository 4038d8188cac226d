//! 6502 processor status register (P) flag bits.

pub const FLAG_CARRY: u8 = 1 << 0;
pub const FLAG_ZERO: u8 = 1 << 1;
pub const FLAG_INTERRUPT_DISABLE: u8 = 1 << 2;
pub const FLAG_DECIMAL: u8 = 1 << 3; // 2A03 has no decimal mode; stored but never honored
pub const FLAG_BREAK: u8 = 1 << 4; // Set by software (BRK, interrupt entry); cleared only by RTI/PLP
pub const FLAG_UNUSED: u8 = 1 << 5; // Always 1 when read
pub const FLAG_OVERFLOW: u8 = 1 << 6;
pub const FLAG_NEGATIVE: u8 = 1 << 7;

/// A single status flag, named for use with `CPU::set_flag` and friends.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Flag {
    Carry = FLAG_CARRY,
    Zero = FLAG_ZERO,
    InterruptDisable = FLAG_INTERRUPT_DISABLE,
    Decimal = FLAG_DECIMAL,
    Break = FLAG_BREAK,
    Unused = FLAG_UNUSED,
    Overflow = FLAG_OVERFLOW,
    Negative = FLAG_NEGATIVE,
}

impl Flag {
    pub const ALL: [Flag; 8] = [
        Flag::Negative,
        Flag::Overflow,
        Flag::Unused,
        Flag::Break,
        Flag::Decimal,
        Flag::InterruptDisable,
        Flag::Zero,
        Flag::Carry,
    ];

    pub const fn mask(self) -> u8 {
        self as u8
    }

    /// Letter used in `NV-BDIZC` style status dumps.
    pub const fn letter(self) -> char {
        match self {
            Flag::Negative => 'N',
            Flag::Overflow => 'V',
            Flag::Unused => '-',
            Flag::Break => 'B',
            Flag::Decimal => 'D',
            Flag::InterruptDisable => 'I',
            Flag::Zero => 'Z',
            Flag::Carry => 'C',
        }
    }
}

/// Render a status byte as `NV-BDIZC`, lowercase for clear bits.
pub fn describe(status: u8) -> String {
    Flag::ALL
        .iter()
        .map(|&flag| {
            let c = flag.letter();
            if status & flag.mask() != 0 {
                c
            } else {
                c.to_ascii_lowercase()
            }
        })
        .collect()
}

//! Addressing-mode resolution.
//!
//! `resolve` is what the interpreter uses: it reads the operand bytes after the
//! opcode, computes the effective address and fetches the operand value.
//! `operand_text` renders the same bytes for humans; the interpreter's trace and
//! the disassembler both go through it, so they cannot disagree on a mode.

use crate::bus::Bus;
use crate::cpu::registers::Registers;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressingMode {
    Implied,
    Accumulator,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    /// JMP only.
    Indirect,
    /// `($nn,X)`
    IndexedIndirect,
    /// `($nn),Y`
    IndirectIndexed,
    /// Branches: signed 8-bit displacement from the next instruction.
    Relative,
}

impl AddressingMode {
    /// Instruction length in bytes, opcode included.
    pub const fn len(self) -> u8 {
        match self {
            AddressingMode::Implied | AddressingMode::Accumulator => 1,
            AddressingMode::Immediate
            | AddressingMode::ZeroPage
            | AddressingMode::ZeroPageX
            | AddressingMode::ZeroPageY
            | AddressingMode::IndexedIndirect
            | AddressingMode::IndirectIndexed
            | AddressingMode::Relative => 2,
            AddressingMode::Absolute
            | AddressingMode::AbsoluteX
            | AddressingMode::AbsoluteY
            | AddressingMode::Indirect => 3,
        }
    }

    /// Number of operand bytes following the opcode.
    pub const fn operand_len(self) -> u8 {
        self.len() - 1
    }
}

/// Result of decoding one addressing mode at the program counter.
///
/// `value` is the byte the instruction operates on (the data bus latch):
/// the accumulator, the immediate byte, the branch displacement, or the byte at
/// `address`. `address` is `None` for modes that do not touch memory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Operand {
    pub mode: AddressingMode,
    pub len: u8,
    pub bytes: [u8; 2],
    pub address: Option<u16>,
    pub value: u8,
    /// Indexing (or a taken branch) lands on a different page than the base.
    pub page_crossed: bool,
}

fn page_differs(a: u16, b: u16) -> bool {
    a & 0xFF00 != b & 0xFF00
}

fn read_word<B: Bus>(bus: &mut B, addr: u16) -> u16 {
    let lo = bus.read(addr) as u16;
    let hi = bus.read(addr.wrapping_add(1)) as u16;
    (hi << 8) | lo
}

/// Read a pointer from the zero page; the high byte wraps within the page.
fn read_zp_word<B: Bus>(bus: &mut B, zp: u8) -> u16 {
    let lo = bus.read(zp as u16) as u16;
    let hi = bus.read(zp.wrapping_add(1) as u16) as u16;
    (hi << 8) | lo
}

/// Decode `mode` for the instruction whose opcode sits at `regs.pc`.
pub fn resolve<B: Bus>(bus: &mut B, mode: AddressingMode, regs: &Registers) -> Operand {
    let pc = regs.pc;
    let mut bytes = [0u8; 2];
    for i in 0..mode.operand_len() {
        bytes[i as usize] = bus.read(pc.wrapping_add(1 + i as u16));
    }
    let word = u16::from_le_bytes(bytes);

    let mut page_crossed = false;
    let address = match mode {
        AddressingMode::Implied
        | AddressingMode::Accumulator
        | AddressingMode::Immediate => None,
        AddressingMode::ZeroPage => Some(bytes[0] as u16),
        AddressingMode::ZeroPageX => Some(bytes[0].wrapping_add(regs.x) as u16),
        AddressingMode::ZeroPageY => Some(bytes[0].wrapping_add(regs.y) as u16),
        AddressingMode::Absolute => Some(word),
        AddressingMode::AbsoluteX | AddressingMode::AbsoluteY => {
            let index = if mode == AddressingMode::AbsoluteX {
                regs.x
            } else {
                regs.y
            };
            let addr = word.wrapping_add(index as u16);
            page_crossed = page_differs(word, addr);
            Some(addr)
        }
        AddressingMode::Indirect => {
            // The pointer's high byte is fetched without carrying into the page.
            let lo = bus.read(word) as u16;
            let hi = bus.read((word & 0xFF00) | (word.wrapping_add(1) & 0x00FF)) as u16;
            Some((hi << 8) | lo)
        }
        AddressingMode::IndexedIndirect => Some(read_zp_word(bus, bytes[0].wrapping_add(regs.x))),
        AddressingMode::IndirectIndexed => {
            let base = read_zp_word(bus, bytes[0]);
            let addr = base.wrapping_add(regs.y as u16);
            page_crossed = page_differs(base, addr);
            Some(addr)
        }
        AddressingMode::Relative => {
            let next = pc.wrapping_add(2);
            let target = next.wrapping_add(bytes[0] as i8 as u16);
            page_crossed = page_differs(next, target);
            Some(target)
        }
    };

    let value = match mode {
        AddressingMode::Implied => 0,
        AddressingMode::Accumulator => regs.a,
        AddressingMode::Immediate | AddressingMode::Relative => bytes[0],
        _ => address.map(|addr| bus.read(addr)).unwrap_or(0),
    };

    Operand {
        mode,
        len: mode.len(),
        bytes,
        address,
        value,
        page_crossed,
    }
}

/// Read the little-endian vector at `addr` (reset, IRQ, NMI).
pub fn read_vector<B: Bus>(bus: &mut B, addr: u16) -> u16 {
    read_word(bus, addr)
}

/// Assembly text for an operand, e.g. `#$05`, `$2000,X`, `($10),Y`, `*-3`.
pub fn operand_text(mode: AddressingMode, bytes: [u8; 2]) -> String {
    let word = u16::from_le_bytes(bytes);
    match mode {
        AddressingMode::Implied => String::new(),
        AddressingMode::Accumulator => "A".to_string(),
        AddressingMode::Immediate => format!("#${:02X}", bytes[0]),
        AddressingMode::ZeroPage => format!("${:02X}", bytes[0]),
        AddressingMode::ZeroPageX => format!("${:02X},X", bytes[0]),
        AddressingMode::ZeroPageY => format!("${:02X},Y", bytes[0]),
        AddressingMode::Absolute => format!("${word:04X}"),
        AddressingMode::AbsoluteX => format!("${word:04X},X"),
        AddressingMode::AbsoluteY => format!("${word:04X},Y"),
        AddressingMode::Indirect => format!("(${word:04X})"),
        AddressingMode::IndexedIndirect => format!("(${:02X},X)", bytes[0]),
        AddressingMode::IndirectIndexed => format!("(${:02X}),Y", bytes[0]),
        AddressingMode::Relative => {
            let offset = bytes[0] as i8;
            if offset < 0 {
                format!("*-{}", offset.unsigned_abs())
            } else {
                format!("*+{offset}")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct FlatBus {
        mem: Vec<u8>,
    }

    impl FlatBus {
        fn with(at: u16, bytes: &[u8]) -> Self {
            let mut mem = vec![0; 0x10000];
            mem[at as usize..at as usize + bytes.len()].copy_from_slice(bytes);
            Self { mem }
        }
    }

    impl Bus for FlatBus {
        fn read(&mut self, addr: u16) -> u8 {
            self.mem[addr as usize]
        }

        fn write(&mut self, addr: u16, data: u8) {
            self.mem[addr as usize] = data;
        }

        fn peek(&self, addr: u16) -> u8 {
            self.mem[addr as usize]
        }
    }

    fn regs(pc: u16, x: u8, y: u8) -> Registers {
        Registers {
            pc,
            x,
            y,
            a: 0x77,
            ..Registers::default()
        }
    }

    #[test]
    fn zero_page_x_wraps_within_page() {
        let mut bus = FlatBus::with(0x8000, &[0xB5, 0xF0]);
        bus.mem[0x0010] = 0xAB;
        let op = resolve(&mut bus, AddressingMode::ZeroPageX, &regs(0x8000, 0x20, 0));
        assert_eq!(op.address, Some(0x0010));
        assert_eq!(op.value, 0xAB);
        assert_eq!(op.len, 2);
    }

    #[test]
    fn absolute_y_detects_page_cross() {
        let mut bus = FlatBus::with(0x8000, &[0xB9, 0xF0, 0x12]);
        let op = resolve(&mut bus, AddressingMode::AbsoluteY, &regs(0x8000, 0, 0x20));
        assert_eq!(op.address, Some(0x1310));
        assert!(op.page_crossed);

        let op = resolve(&mut bus, AddressingMode::AbsoluteY, &regs(0x8000, 0, 0x0F));
        assert_eq!(op.address, Some(0x12FF));
        assert!(!op.page_crossed);
    }

    #[test]
    fn indirect_keeps_page_wrap_quirk() {
        let mut bus = FlatBus::with(0x8000, &[0x6C, 0xFF, 0x30]);
        bus.mem[0x30FF] = 0x80;
        bus.mem[0x3000] = 0x50;
        bus.mem[0x3100] = 0x40;
        let op = resolve(&mut bus, AddressingMode::Indirect, &regs(0x8000, 0, 0));
        assert_eq!(op.address, Some(0x5080));
    }

    #[test]
    fn indexed_indirect_wraps_pointer_in_zero_page() {
        let mut bus = FlatBus::with(0x8000, &[0xA1, 0xFE]);
        bus.mem[0x00FF] = 0x34;
        bus.mem[0x0000] = 0x12;
        bus.mem[0x1234] = 0x99;
        let op = resolve(&mut bus, AddressingMode::IndexedIndirect, &regs(0x8000, 0x01, 0));
        assert_eq!(op.address, Some(0x1234));
        assert_eq!(op.value, 0x99);
    }

    #[test]
    fn indirect_indexed_adds_y_after_dereference() {
        let mut bus = FlatBus::with(0x8000, &[0xB1, 0x40]);
        bus.mem[0x0040] = 0xFF;
        bus.mem[0x0041] = 0x20;
        let op = resolve(&mut bus, AddressingMode::IndirectIndexed, &regs(0x8000, 0, 0x01));
        assert_eq!(op.address, Some(0x2100));
        assert!(op.page_crossed);
    }

    #[test]
    fn relative_targets_are_signed_from_next_instruction() {
        let mut bus = FlatBus::with(0x8000, &[0xD0, 0xFD]);
        let op = resolve(&mut bus, AddressingMode::Relative, &regs(0x8000, 0, 0));
        assert_eq!(op.address, Some(0x7FFF));
        assert_eq!(op.value, 0xFD);
        assert!(op.page_crossed);
    }

    #[test]
    fn accumulator_operand_is_a() {
        let mut bus = FlatBus::with(0x8000, &[0x0A]);
        let op = resolve(&mut bus, AddressingMode::Accumulator, &regs(0x8000, 0, 0));
        assert_eq!(op.value, 0x77);
        assert_eq!(op.address, None);
        assert_eq!(op.len, 1);
    }

    #[test]
    fn operand_text_per_mode() {
        assert_eq!(operand_text(AddressingMode::Implied, [0, 0]), "");
        assert_eq!(operand_text(AddressingMode::Accumulator, [0, 0]), "A");
        assert_eq!(operand_text(AddressingMode::Immediate, [0x05, 0]), "#$05");
        assert_eq!(operand_text(AddressingMode::ZeroPageY, [0x10, 0]), "$10,Y");
        assert_eq!(operand_text(AddressingMode::Absolute, [0x00, 0x20]), "$2000");
        assert_eq!(operand_text(AddressingMode::AbsoluteX, [0x34, 0x12]), "$1234,X");
        assert_eq!(operand_text(AddressingMode::Indirect, [0xFC, 0xFF]), "($FFFC)");
        assert_eq!(operand_text(AddressingMode::IndexedIndirect, [0x40, 0]), "($40,X)");
        assert_eq!(operand_text(AddressingMode::IndirectIndexed, [0x40, 0]), "($40),Y");
        assert_eq!(operand_text(AddressingMode::Relative, [0x02, 0]), "*+2");
        assert_eq!(operand_text(AddressingMode::Relative, [0xFD, 0]), "*-3");
        assert_eq!(operand_text(AddressingMode::Relative, [0x80, 0]), "*-128");
    }
}

//! Side-effect free disassembly over a window of the address space.

use std::fmt;

use crate::{
    bus::Bus,
    cpu::{addressing, cpu::CpuError, opcodes},
};

/// One decoded instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecodedLine {
    /// Address of the opcode byte
    pub address: u16,

    /// Raw instruction bytes; only the first `len` are meaningful
    pub bytes: [u8; 3],

    /// Instruction length (1-3)
    pub len: u8,

    /// Assembly text, e.g. `LDA #$05`
    pub text: String,
}

impl DecodedLine {
    pub fn bytes(&self) -> &[u8] {
        &self.bytes[..self.len as usize]
    }
}

impl fmt::Display for DecodedLine {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let raw = self
            .bytes()
            .iter()
            .map(|b| format!("{b:02X}"))
            .collect::<Vec<_>>()
            .join(" ");
        write!(f, "${:04X}  {:<8}  {}", self.address, raw, self.text)
    }
}

/// Append-only store of decoded lines, in instruction order.
#[derive(Debug, Clone, Default)]
pub struct Disassembly {
    lines: Vec<DecodedLine>,
}

impl Disassembly {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, line: DecodedLine) {
        self.lines.push(line);
    }

    pub fn lines(&self) -> &[DecodedLine] {
        &self.lines
    }

    pub fn line_at(&self, index: usize) -> Option<&DecodedLine> {
        self.lines.get(index)
    }

    pub fn count(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Index of the line starting exactly at `address`.
    pub fn find_line_for_address(&self, address: u16) -> Option<usize> {
        self.lines.iter().position(|line| line.address == address)
    }
}

/// Decode one instruction at `address` using `peek` only.
pub fn decode_at<B: Bus>(bus: &B, address: u16) -> Result<DecodedLine, CpuError> {
    let byte = bus.peek(address);
    let opcode = opcodes::decode(byte).ok_or(CpuError::IllegalOpcode {
        opcode: byte,
        address,
    })?;

    let len = opcode.len();
    let mut bytes = [byte, 0, 0];
    for i in 1..len as usize {
        bytes[i] = bus.peek(address.wrapping_add(i as u16));
    }

    let operand = addressing::operand_text(opcode.mode, [bytes[1], bytes[2]]);
    let text = if operand.is_empty() {
        opcode.mnemonic.to_string()
    } else {
        format!("{} {}", opcode.mnemonic, operand)
    };

    Ok(DecodedLine {
        address,
        bytes,
        len,
        text,
    })
}

/// Disassemble every instruction starting in `[low, high)`.
///
/// Decoding is linear: each line starts where the previous one ended. An
/// illegal opcode stops the pass with an error.
pub fn disassemble<B: Bus>(bus: &B, low: u16, high: u16) -> Result<Disassembly, CpuError> {
    let mut out = Disassembly::new();
    // Wider than u16 so an instruction ending at $FFFF cannot wrap the cursor.
    let mut cursor = low as u32;

    while cursor < high as u32 {
        let line = decode_at(bus, cursor as u16)?;
        cursor += line.len as u32;
        out.push(line);
    }

    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bus::NesBus;

    fn bus_with(at: u16, bytes: &[u8]) -> NesBus {
        let mut bus = NesBus::new();
        bus.load(at, bytes);
        bus
    }

    #[test]
    fn decodes_load_and_store() {
        let bus = bus_with(0x8000, &[0xA9, 0x05, 0x8D, 0x00, 0x20]);
        let dis = disassemble(&bus, 0x8000, 0x8005).unwrap();

        assert_eq!(dis.count(), 2);
        assert_eq!(
            dis.line_at(0),
            Some(&DecodedLine {
                address: 0x8000,
                bytes: [0xA9, 0x05, 0x00],
                len: 2,
                text: "LDA #$05".to_string(),
            })
        );
        let sta = dis.line_at(1).unwrap();
        assert_eq!(sta.address, 0x8002);
        assert_eq!(sta.bytes(), &[0x8D, 0x00, 0x20]);
        assert_eq!(sta.text, "STA $2000");
    }

    #[test]
    fn implied_and_accumulator_text() {
        let bus = bus_with(0x8000, &[0xEA, 0x0A, 0x6C, 0x34, 0x12]);
        let dis = disassemble(&bus, 0x8000, 0x8005).unwrap();
        let text: Vec<_> = dis.lines().iter().map(|l| l.text.as_str()).collect();
        assert_eq!(text, ["NOP", "ASL A", "JMP ($1234)"]);
    }

    #[test]
    fn relative_operands_are_signed_decimal() {
        let bus = bus_with(0x8000, &[0xF0, 0x02, 0xD0, 0xFD]);
        let dis = disassemble(&bus, 0x8000, 0x8004).unwrap();
        assert_eq!(dis.line_at(0).unwrap().text, "BEQ *+2");
        assert_eq!(dis.line_at(1).unwrap().text, "BNE *-3");
    }

    #[test]
    fn illegal_opcode_stops_the_pass() {
        let bus = bus_with(0x8000, &[0xEA, 0x02]);
        assert_eq!(
            disassemble(&bus, 0x8000, 0x8002).unwrap_err(),
            CpuError::IllegalOpcode {
                opcode: 0x02,
                address: 0x8001
            }
        );
    }

    #[test]
    fn window_at_top_of_memory_terminates() {
        let bus = bus_with(0xFFFB, &[0xEA, 0xEA, 0x4C, 0x00, 0x80]);
        let dis = disassemble(&bus, 0xFFFB, 0xFFFF).unwrap();
        assert_eq!(dis.count(), 3);
        assert_eq!(dis.line_at(2).unwrap().text, "JMP $8000");
    }

    #[test]
    fn empty_window_has_no_lines() {
        let bus = NesBus::new();
        assert!(disassemble(&bus, 0x8000, 0x8000).unwrap().is_empty());
    }

    #[test]
    fn find_line_only_matches_instruction_starts() {
        let bus = bus_with(0x8000, &[0xA9, 0x05, 0x8D, 0x00, 0x20]);
        let dis = disassemble(&bus, 0x8000, 0x8005).unwrap();
        assert_eq!(dis.find_line_for_address(0x8002), Some(1));
        assert_eq!(dis.find_line_for_address(0x8001), None);
    }

    #[test]
    fn display_shows_address_bytes_and_text() {
        let bus = bus_with(0x8000, &[0x8D, 0x00, 0x20]);
        let line = decode_at(&bus, 0x8000).unwrap();
        assert_eq!(line.to_string(), "$8000  8D 00 20  STA $2000");
    }
}

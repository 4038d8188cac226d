//! Instruction semantics, one routine per mnemonic.
//!
//! Each routine receives the operand already resolved for its addressing mode
//! and updates registers, flags and memory. Routines that take over the program
//! counter (jumps, calls, returns, BRK, taken branches) report it so `step` does
//! not advance past the instruction.

use crate::{
    bus::Bus,
    cpu::{
        addressing::{self, Operand},
        cpu::{CPU, IRQ_VECTOR},
        flags::{FLAG_BREAK, FLAG_UNUSED, Flag},
        opcodes::Mnemonic,
    },
};

impl<B: Bus> CPU<B> {
    /// Run `mnemonic` against `op`. Returns true when the routine set the PC itself.
    pub(crate) fn execute(&mut self, mnemonic: Mnemonic, op: &Operand) -> bool {
        use Mnemonic::*;

        match mnemonic {
            LDA => self.lda(op),
            LDX => self.ldx(op),
            LDY => self.ldy(op),
            STA => self.store(op, self.a),
            STX => self.store(op, self.x),
            STY => self.store(op, self.y),

            ADC => self.adc(op.value),
            SBC => self.sbc(op.value),
            AND => self.and(op),
            ORA => self.ora(op),
            EOR => self.eor(op),
            BIT => self.bit(op),

            CMP => self.compare(self.a, op.value),
            CPX => self.compare(self.x, op.value),
            CPY => self.compare(self.y, op.value),

            ASL => self.asl(op),
            LSR => self.lsr(op),
            ROL => self.rol(op),
            ROR => self.ror(op),

            INC => self.inc(op),
            DEC => self.dec(op),
            INX => self.inx(),
            INY => self.iny(),
            DEX => self.dex(),
            DEY => self.dey(),

            BCC => return self.branch(!self.get_flag(Flag::Carry), op),
            BCS => return self.branch(self.get_flag(Flag::Carry), op),
            BEQ => return self.branch(self.get_flag(Flag::Zero), op),
            BNE => return self.branch(!self.get_flag(Flag::Zero), op),
            BMI => return self.branch(self.get_flag(Flag::Negative), op),
            BPL => return self.branch(!self.get_flag(Flag::Negative), op),
            BVS => return self.branch(self.get_flag(Flag::Overflow), op),
            BVC => return self.branch(!self.get_flag(Flag::Overflow), op),

            JMP => return self.jmp(op),
            JSR => return self.jsr(op),
            RTS => return self.rts(),
            RTI => return self.rti(),
            BRK => return self.brk(),

            PHA => self.pha(),
            PHP => self.php(),
            PLA => self.pla(),
            PLP => self.plp(),

            CLC => self.clear_flag(Flag::Carry),
            CLD => self.clear_flag(Flag::Decimal),
            CLI => self.clear_flag(Flag::InterruptDisable),
            CLV => self.clear_flag(Flag::Overflow),
            SEC => self.set_flag(Flag::Carry, true),
            SED => self.set_flag(Flag::Decimal, true),
            SEI => self.set_flag(Flag::InterruptDisable, true),

            TAX => self.tax(),
            TAY => self.tay(),
            TSX => self.tsx(),
            TXA => self.txa(),
            TXS => self.txs(),
            TYA => self.tya(),

            NOP => {}
        }

        false
    }

    /// Write a read-modify-write result back to memory, or to A in accumulator mode.
    fn write_back(&mut self, op: &Operand, value: u8) {
        match op.address {
            Some(addr) => self.bus.write(addr, value),
            None => self.a = value,
        }
    }

    fn lda(&mut self, op: &Operand) {
        self.a = op.value;
        self.update_zero_and_negative_flags(self.a);
    }

    fn ldx(&mut self, op: &Operand) {
        self.x = op.value;
        self.update_zero_and_negative_flags(self.x);
    }

    fn ldy(&mut self, op: &Operand) {
        self.y = op.value;
        self.update_zero_and_negative_flags(self.y);
    }

    fn store(&mut self, op: &Operand, value: u8) {
        if let Some(addr) = op.address {
            self.bus.write(addr, value);
        }
    }

    /// Binary add with carry. Overflow is set when both inputs share a sign
    /// that the result does not.
    fn adc(&mut self, value: u8) {
        let carry_in = self.get_flag(Flag::Carry) as u16;
        let sum = self.a as u16 + value as u16 + carry_in;
        let result = sum as u8;

        self.set_flag(Flag::Carry, sum > 0xFF);
        self.set_flag(
            Flag::Overflow,
            (!(self.a ^ value) & (self.a ^ result)) & 0x80 != 0,
        );

        self.a = result;
        self.update_zero_and_negative_flags(self.a);
    }

    /// A - M - !C is A + !M + C.
    fn sbc(&mut self, value: u8) {
        self.adc(!value);
    }

    fn and(&mut self, op: &Operand) {
        self.a &= op.value;
        self.update_zero_and_negative_flags(self.a);
    }

    fn ora(&mut self, op: &Operand) {
        self.a |= op.value;
        self.update_zero_and_negative_flags(self.a);
    }

    fn eor(&mut self, op: &Operand) {
        self.a ^= op.value;
        self.update_zero_and_negative_flags(self.a);
    }

    fn bit(&mut self, op: &Operand) {
        self.set_flag(Flag::Zero, self.a & op.value == 0);
        self.set_flag(Flag::Negative, op.value & 0x80 != 0);
        self.set_flag(Flag::Overflow, op.value & 0x40 != 0);
    }

    fn compare(&mut self, register: u8, value: u8) {
        self.set_flag(Flag::Carry, register >= value);
        self.update_zero_and_negative_flags(register.wrapping_sub(value));
    }

    fn asl(&mut self, op: &Operand) {
        let result = op.value << 1;
        self.set_flag(Flag::Carry, op.value & 0x80 != 0);
        self.update_zero_and_negative_flags(result);
        self.write_back(op, result);
    }

    fn lsr(&mut self, op: &Operand) {
        let result = op.value >> 1;
        self.set_flag(Flag::Carry, op.value & 0x01 != 0);
        self.update_zero_and_negative_flags(result);
        self.write_back(op, result);
    }

    fn rol(&mut self, op: &Operand) {
        let result = (op.value << 1) | self.get_flag(Flag::Carry) as u8;
        self.set_flag(Flag::Carry, op.value & 0x80 != 0);
        self.update_zero_and_negative_flags(result);
        self.write_back(op, result);
    }

    fn ror(&mut self, op: &Operand) {
        let result = (op.value >> 1) | ((self.get_flag(Flag::Carry) as u8) << 7);
        self.set_flag(Flag::Carry, op.value & 0x01 != 0);
        self.update_zero_and_negative_flags(result);
        self.write_back(op, result);
    }

    fn inc(&mut self, op: &Operand) {
        let result = op.value.wrapping_add(1);
        self.update_zero_and_negative_flags(result);
        self.write_back(op, result);
    }

    fn dec(&mut self, op: &Operand) {
        let result = op.value.wrapping_sub(1);
        self.update_zero_and_negative_flags(result);
        self.write_back(op, result);
    }

    fn inx(&mut self) {
        self.x = self.x.wrapping_add(1);
        self.update_zero_and_negative_flags(self.x);
    }

    fn iny(&mut self) {
        self.y = self.y.wrapping_add(1);
        self.update_zero_and_negative_flags(self.y);
    }

    fn dex(&mut self) {
        self.x = self.x.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.x);
    }

    fn dey(&mut self) {
        self.y = self.y.wrapping_sub(1);
        self.update_zero_and_negative_flags(self.y);
    }

    /// Taken branches cost one extra cycle, two if the target is on another page.
    fn branch(&mut self, condition: bool, op: &Operand) -> bool {
        let Some(target) = op.address else {
            return false;
        };
        if !condition {
            return false;
        }

        self.pc = target;
        self.cycles += 1;
        if op.page_crossed {
            self.cycles += 1;
        }
        true
    }

    fn jmp(&mut self, op: &Operand) -> bool {
        match op.address {
            Some(addr) => {
                self.pc = addr;
                true
            }
            None => false,
        }
    }

    fn jsr(&mut self, op: &Operand) -> bool {
        let Some(addr) = op.address else {
            return false;
        };
        // The pushed return address is the last byte of the JSR itself.
        let return_addr = self.pc.wrapping_add(2);
        self.push_word(return_addr);
        self.pc = addr;
        true
    }

    fn rts(&mut self) -> bool {
        self.pc = self.pop_word().wrapping_add(1);
        true
    }

    fn rti(&mut self) -> bool {
        self.status = self.pop() | FLAG_UNUSED;
        self.pc = self.pop_word();
        true
    }

    fn brk(&mut self) -> bool {
        // Skip the padding byte after BRK.
        self.push_word(self.pc.wrapping_add(2));
        self.push(self.status | FLAG_BREAK | FLAG_UNUSED);

        self.status |= FLAG_BREAK;
        self.set_flag(Flag::InterruptDisable, true);

        self.pc = addressing::read_vector(&mut self.bus, IRQ_VECTOR);
        true
    }

    fn pha(&mut self) {
        self.push(self.a);
    }

    fn php(&mut self) {
        self.push(self.status | FLAG_BREAK | FLAG_UNUSED);
    }

    fn pla(&mut self) {
        self.a = self.pop();
        self.update_zero_and_negative_flags(self.a);
    }

    fn plp(&mut self) {
        self.status = self.pop() | FLAG_UNUSED;
    }

    fn tax(&mut self) {
        self.x = self.a;
        self.update_zero_and_negative_flags(self.x);
    }

    fn tay(&mut self) {
        self.y = self.a;
        self.update_zero_and_negative_flags(self.y);
    }

    fn tsx(&mut self) {
        self.x = self.sp;
        self.update_zero_and_negative_flags(self.x);
    }

    fn txa(&mut self) {
        self.a = self.x;
        self.update_zero_and_negative_flags(self.a);
    }

    fn txs(&mut self) {
        self.sp = self.x;
    }

    fn tya(&mut self) {
        self.a = self.y;
        self.update_zero_and_negative_flags(self.a);
    }
}

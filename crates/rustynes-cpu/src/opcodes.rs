//! Opcode metadata: mnemonic, addressing mode, and base cycle count for all
//! 256 opcode bytes.
//!
//! Unofficial/undocumented opcodes are not given distinct semantics; every
//! such slot in [`OPCODE_TABLE`] maps to [`OpName::Nop`], which still
//! consumes the addressing mode's operand bytes and the real hardware's base
//! cycle count so a ROM that stumbles into one keeps valid timing instead of
//! desyncing the rest of the system.

use crate::addressing::AddrMode;

/// Official 6502 mnemonic. Illegal opcodes collapse to [`OpName::Nop`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OpName {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld,
    Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda,
    Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla, Plp, Rol, Ror, Rti, Rts, Sbc, Sec,
    Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
}

impl OpName {
    /// Mnemonic text, for disassembly.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Adc => "ADC",
            Self::And => "AND",
            Self::Asl => "ASL",
            Self::Bcc => "BCC",
            Self::Bcs => "BCS",
            Self::Beq => "BEQ",
            Self::Bit => "BIT",
            Self::Bmi => "BMI",
            Self::Bne => "BNE",
            Self::Bpl => "BPL",
            Self::Brk => "BRK",
            Self::Bvc => "BVC",
            Self::Bvs => "BVS",
            Self::Clc => "CLC",
            Self::Cld => "CLD",
            Self::Cli => "CLI",
            Self::Clv => "CLV",
            Self::Cmp => "CMP",
            Self::Cpx => "CPX",
            Self::Cpy => "CPY",
            Self::Dec => "DEC",
            Self::Dex => "DEX",
            Self::Dey => "DEY",
            Self::Eor => "EOR",
            Self::Inc => "INC",
            Self::Inx => "INX",
            Self::Iny => "INY",
            Self::Jmp => "JMP",
            Self::Jsr => "JSR",
            Self::Lda => "LDA",
            Self::Ldx => "LDX",
            Self::Ldy => "LDY",
            Self::Lsr => "LSR",
            Self::Nop => "NOP",
            Self::Ora => "ORA",
            Self::Pha => "PHA",
            Self::Php => "PHP",
            Self::Pla => "PLA",
            Self::Plp => "PLP",
            Self::Rol => "ROL",
            Self::Ror => "ROR",
            Self::Rti => "RTI",
            Self::Rts => "RTS",
            Self::Sbc => "SBC",
            Self::Sec => "SEC",
            Self::Sed => "SED",
            Self::Sei => "SEI",
            Self::Sta => "STA",
            Self::Stx => "STX",
            Self::Sty => "STY",
            Self::Tax => "TAX",
            Self::Tay => "TAY",
            Self::Tsx => "TSX",
            Self::Txa => "TXA",
            Self::Txs => "TXS",
            Self::Tya => "TYA",
        }
    }
}

/// A decoded opcode: mnemonic, addressing mode, and base cycle count (before
/// any page-cross or branch-taken penalty).
#[derive(Debug, Clone, Copy)]
pub struct Opcode {
    /// Mnemonic (official, or [`OpName::Nop`] for illegal slots).
    pub op: OpName,
    /// Addressing mode used to locate the operand.
    pub mode: AddrMode,
    /// Base cycle count, excluding penalties computed at execution time.
    pub cycles: u8,
}

const fn o(op: OpName, mode: AddrMode, cycles: u8) -> Opcode {
    Opcode { op, mode, cycles }
}

const fn n(mode: AddrMode, cycles: u8) -> Opcode {
    Opcode { op: OpName::Nop, mode, cycles }
}

use AddrMode::{Abs, Abx, Aby, Acc, Imm, Imp, Ind, Indx, Indy, Rel, Zp, Zpx, Zpy};
use OpName::{
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Brk, Bvc, Bvs, Clc, Cld, Cli, Clv, Cmp, Cpx,
    Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny, Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Pla,
    Plp, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Tax, Tay, Tsx, Txa, Txs, Tya,
};

/// Complete 256-entry opcode lookup table, indexed by opcode byte.
#[rustfmt::skip]
pub const OPCODE_TABLE: [Opcode; 256] = [
    // 0x00-0x0F
    o(Brk, Imp, 7),  o(Ora, Indx, 6), n(Imp, 2),  n(Indx, 8), n(Zp, 3),   o(Ora, Zp, 3),  o(Asl, Zp, 5),  n(Zp, 5),
    o(Php, Imp, 3),  o(Ora, Imm, 2),  o(Asl, Acc, 2), n(Imm, 2), n(Abs, 4),  o(Ora, Abs, 4), o(Asl, Abs, 6), n(Abs, 6),
    // 0x10-0x1F
    o(Bpl, Rel, 2),  o(Ora, Indy, 5), n(Imp, 2),  n(Indy, 8), n(Zpx, 4),  o(Ora, Zpx, 4), o(Asl, Zpx, 6), n(Zpx, 6),
    o(Clc, Imp, 2),  o(Ora, Aby, 4),  n(Imp, 2),  n(Aby, 7),  n(Abx, 4),  o(Ora, Abx, 4), o(Asl, Abx, 7), n(Abx, 7),
    // 0x20-0x2F
    o(Jsr, Abs, 6),  o(And, Indx, 6), n(Imp, 2),  n(Indx, 8), o(Bit, Zp, 3), o(And, Zp, 3), o(Rol, Zp, 5), n(Zp, 5),
    o(Plp, Imp, 4),  o(And, Imm, 2),  o(Rol, Acc, 2), n(Imm, 2), o(Bit, Abs, 4), o(And, Abs, 4), o(Rol, Abs, 6), n(Abs, 6),
    // 0x30-0x3F
    o(Bmi, Rel, 2),  o(And, Indy, 5), n(Imp, 2),  n(Indy, 8), n(Zpx, 4),  o(And, Zpx, 4), o(Rol, Zpx, 6), n(Zpx, 6),
    o(Sec, Imp, 2),  o(And, Aby, 4),  n(Imp, 2),  n(Aby, 7),  n(Abx, 4),  o(And, Abx, 4), o(Rol, Abx, 7), n(Abx, 7),
    // 0x40-0x4F
    o(Rti, Imp, 6),  o(Eor, Indx, 6), n(Imp, 2),  n(Indx, 8), n(Zp, 3),   o(Eor, Zp, 3),  o(Lsr, Zp, 5),  n(Zp, 5),
    o(Pha, Imp, 3),  o(Eor, Imm, 2),  o(Lsr, Acc, 2), n(Imm, 2), o(Jmp, Abs, 3), o(Eor, Abs, 4), o(Lsr, Abs, 6), n(Abs, 6),
    // 0x50-0x5F
    o(Bvc, Rel, 2),  o(Eor, Indy, 5), n(Imp, 2),  n(Indy, 8), n(Zpx, 4),  o(Eor, Zpx, 4), o(Lsr, Zpx, 6), n(Zpx, 6),
    o(Cli, Imp, 2),  o(Eor, Aby, 4),  n(Imp, 2),  n(Aby, 7),  n(Abx, 4),  o(Eor, Abx, 4), o(Lsr, Abx, 7), n(Abx, 7),
    // 0x60-0x6F
    o(Rts, Imp, 6),  o(Adc, Indx, 6), n(Imp, 2),  n(Indx, 8), n(Zp, 3),   o(Adc, Zp, 3),  o(Ror, Zp, 5),  n(Zp, 5),
    o(Pla, Imp, 4),  o(Adc, Imm, 2),  o(Ror, Acc, 2), n(Imm, 2), o(Jmp, Ind, 5), o(Adc, Abs, 4), o(Ror, Abs, 6), n(Abs, 6),
    // 0x70-0x7F
    o(Bvs, Rel, 2),  o(Adc, Indy, 5), n(Imp, 2),  n(Indy, 8), n(Zpx, 4),  o(Adc, Zpx, 4), o(Ror, Zpx, 6), n(Zpx, 6),
    o(Sei, Imp, 2),  o(Adc, Aby, 4),  n(Imp, 2),  n(Aby, 7),  n(Abx, 4),  o(Adc, Abx, 4), o(Ror, Abx, 7), n(Abx, 7),
    // 0x80-0x8F
    n(Imm, 2),       o(Sta, Indx, 6), n(Imm, 2), n(Indx, 6), o(Sty, Zp, 3), o(Sta, Zp, 3), o(Stx, Zp, 3), n(Zp, 3),
    o(Dey, Imp, 2),  n(Imm, 2),       o(Txa, Imp, 2), n(Imm, 2), o(Sty, Abs, 4), o(Sta, Abs, 4), o(Stx, Abs, 4), n(Abs, 4),
    // 0x90-0x9F
    o(Bcc, Rel, 2),  o(Sta, Indy, 6), n(Imp, 2), n(Indy, 6), o(Sty, Zpx, 4), o(Sta, Zpx, 4), o(Stx, Zpy, 4), n(Zpy, 4),
    o(Tya, Imp, 2),  o(Sta, Aby, 5),  o(Txs, Imp, 2), n(Aby, 5), n(Abx, 5), o(Sta, Abx, 5), n(Aby, 5), n(Aby, 5),
    // 0xA0-0xAF
    o(Ldy, Imm, 2),  o(Lda, Indx, 6), o(Ldx, Imm, 2), n(Indx, 6), o(Ldy, Zp, 3), o(Lda, Zp, 3), o(Ldx, Zp, 3), n(Zp, 3),
    o(Tay, Imp, 2),  o(Lda, Imm, 2),  o(Tax, Imp, 2), n(Imm, 2), o(Ldy, Abs, 4), o(Lda, Abs, 4), o(Ldx, Abs, 4), n(Abs, 4),
    // 0xB0-0xBF
    o(Bcs, Rel, 2),  o(Lda, Indy, 5), n(Imp, 2), n(Indy, 5), o(Ldy, Zpx, 4), o(Lda, Zpx, 4), o(Ldx, Zpy, 4), n(Zpy, 4),
    o(Clv, Imp, 2),  o(Lda, Aby, 4),  o(Tsx, Imp, 2), n(Aby, 4), o(Ldy, Abx, 4), o(Lda, Abx, 4), o(Ldx, Aby, 4), n(Aby, 4),
    // 0xC0-0xCF
    o(Cpy, Imm, 2),  o(Cmp, Indx, 6), n(Imm, 2), n(Indx, 8), o(Cpy, Zp, 3), o(Cmp, Zp, 3), o(Dec, Zp, 5), n(Zp, 5),
    o(Iny, Imp, 2),  o(Cmp, Imm, 2),  o(Dex, Imp, 2), n(Imm, 2), o(Cpy, Abs, 4), o(Cmp, Abs, 4), o(Dec, Abs, 6), n(Abs, 6),
    // 0xD0-0xDF
    o(Bne, Rel, 2),  o(Cmp, Indy, 5), n(Imp, 2), n(Indy, 8), n(Zpx, 4), o(Cmp, Zpx, 4), o(Dec, Zpx, 6), n(Zpx, 6),
    o(Cld, Imp, 2),  o(Cmp, Aby, 4),  n(Imp, 2), n(Aby, 7), n(Abx, 4), o(Cmp, Abx, 4), o(Dec, Abx, 7), n(Abx, 7),
    // 0xE0-0xEF
    o(Cpx, Imm, 2),  o(Sbc, Indx, 6), n(Imm, 2), n(Indx, 8), o(Cpx, Zp, 3), o(Sbc, Zp, 3), o(Inc, Zp, 5), n(Zp, 5),
    o(Inx, Imp, 2),  o(Sbc, Imm, 2),  o(Nop, Imp, 2), n(Imm, 2), o(Cpx, Abs, 4), o(Sbc, Abs, 4), o(Inc, Abs, 6), n(Abs, 6),
    // 0xF0-0xFF
    o(Beq, Rel, 2),  o(Sbc, Indy, 5), n(Imp, 2), n(Indy, 8), n(Zpx, 4), o(Sbc, Zpx, 4), o(Inc, Zpx, 6), n(Zpx, 6),
    o(Sed, Imp, 2),  o(Sbc, Aby, 4),  n(Imp, 2), n(Aby, 7), n(Abx, 4), o(Sbc, Abx, 4), o(Inc, Abx, 7), n(Abx, 7),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn brk_is_seven_cycles_implied() {
        let entry = OPCODE_TABLE[0x00];
        assert_eq!(entry.op, Brk);
        assert_eq!(entry.mode, Imp);
        assert_eq!(entry.cycles, 7);
    }

    #[test]
    fn lda_immediate_is_two_cycles() {
        let entry = OPCODE_TABLE[0xA9];
        assert_eq!(entry.op, Lda);
        assert_eq!(entry.mode, Imm);
        assert_eq!(entry.cycles, 2);
    }

    #[test]
    fn illegal_opcode_maps_to_nop_with_correct_length() {
        // 0x04 is an unofficial zero-page NOP; real hardware still consumes
        // the operand byte and takes 3 cycles.
        let entry = OPCODE_TABLE[0x04];
        assert_eq!(entry.op, Nop);
        assert_eq!(entry.mode, Zp);
        assert_eq!(entry.cycles, 3);
    }

    #[test]
    fn ea_is_the_official_nop() {
        let entry = OPCODE_TABLE[0xEA];
        assert_eq!(entry.op, Nop);
        assert_eq!(entry.mode, Imp);
        assert_eq!(entry.cycles, 2);
    }

    #[test]
    fn every_mnemonic_is_nonempty() {
        for entry in OPCODE_TABLE {
            assert!(!entry.op.mnemonic().is_empty());
        }
    }
}

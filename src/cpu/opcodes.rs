//! Opcode decode tables: parallel 256-entry lookups mapping an opcode byte to
//! its operation, addressing mode and base cycle count. Undefined opcodes
//! carry the `ILLEGAL_CYCLES` sentinel in the cycle table; the op/mode slots
//! for those entries are placeholders and must never be dispatched.

/// Cycle-table sentinel marking an opcode with no defined behavior.
pub const ILLEGAL_CYCLES: u8 = 0xFF;

/// Addressing modes of the 65C02. `Implied` doubles as the placeholder for
/// undefined opcodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Implied,
    Accumulator,
    Immediate,
    Relative,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    IndexedIndirect,  // (d,X)
    IndirectIndexed,  // (d),Y
    ZeroPageIndirect, // (d)
    AbsoluteIndirect, // (a)
    AbsoluteIndirectX, // (a,X)
}

impl Mode {
    /// Operand bytes following the opcode. The dispatcher advances `pc` by
    /// one (the opcode) plus this.
    pub const fn operand_len(self) -> u16 {
        match self {
            Mode::Implied | Mode::Accumulator => 0,
            Mode::Immediate
            | Mode::Relative
            | Mode::ZeroPage
            | Mode::ZeroPageX
            | Mode::ZeroPageY
            | Mode::IndexedIndirect
            | Mode::IndirectIndexed
            | Mode::ZeroPageIndirect => 1,
            Mode::Absolute
            | Mode::AbsoluteX
            | Mode::AbsoluteY
            | Mode::AbsoluteIndirect
            | Mode::AbsoluteIndirectX => 2,
        }
    }
}

/// The documented 65C02 operation set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Op {
    Adc, And, Asl, Bcc, Bcs, Beq, Bit, Bmi, Bne, Bpl, Bra, Brk, Bvc, Bvs,
    Clc, Cld, Cli, Clv, Cmp, Cpx, Cpy, Dec, Dex, Dey, Eor, Inc, Inx, Iny,
    Jmp, Jsr, Lda, Ldx, Ldy, Lsr, Nop, Ora, Pha, Php, Phx, Phy, Pla, Plp,
    Plx, Ply, Rol, Ror, Rti, Rts, Sbc, Sec, Sed, Sei, Sta, Stx, Sty, Stz,
    Tax, Tay, Trb, Tsb, Tsx, Txa, Txs, Tya,
}

impl Op {
    /// Read-class operations pay one extra cycle when an indexed address
    /// crosses a page boundary. Stores and read-modify-writes have the
    /// penalty folded into their base cycle count.
    pub const fn page_penalty(self) -> bool {
        matches!(
            self,
            Op::Adc
                | Op::And
                | Op::Bit
                | Op::Cmp
                | Op::Eor
                | Op::Lda
                | Op::Ldx
                | Op::Ldy
                | Op::Ora
                | Op::Sbc
        )
    }
}

const IMP: Mode = Mode::Implied;
const ACC: Mode = Mode::Accumulator;
const IMM: Mode = Mode::Immediate;
const REL: Mode = Mode::Relative;
const ZPG: Mode = Mode::ZeroPage;
const ZPX: Mode = Mode::ZeroPageX;
const ZPY: Mode = Mode::ZeroPageY;
const ABS: Mode = Mode::Absolute;
const ABX: Mode = Mode::AbsoluteX;
const ABY: Mode = Mode::AbsoluteY;
const IZX: Mode = Mode::IndexedIndirect;
const IZY: Mode = Mode::IndirectIndexed;
const IZP: Mode = Mode::ZeroPageIndirect;
const IND: Mode = Mode::AbsoluteIndirect;
const IAX: Mode = Mode::AbsoluteIndirectX;

const ILL: u8 = ILLEGAL_CYCLES;

use Op::*;

#[rustfmt::skip]
pub const OPCODE_OPS: [Op; 256] = [
//  x0   x1   x2   x3   x4   x5   x6   x7   x8   x9   xA   xB   xC   xD   xE   xF
    Brk, Ora, Nop, Nop, Tsb, Ora, Asl, Nop, Php, Ora, Asl, Nop, Tsb, Ora, Asl, Nop, // 0x
    Bpl, Ora, Ora, Nop, Trb, Ora, Asl, Nop, Clc, Ora, Inc, Nop, Trb, Ora, Asl, Nop, // 1x
    Jsr, And, Nop, Nop, Bit, And, Rol, Nop, Plp, And, Rol, Nop, Bit, And, Rol, Nop, // 2x
    Bmi, And, And, Nop, Bit, And, Rol, Nop, Sec, And, Dec, Nop, Bit, And, Rol, Nop, // 3x
    Rti, Eor, Nop, Nop, Nop, Eor, Lsr, Nop, Pha, Eor, Lsr, Nop, Jmp, Eor, Lsr, Nop, // 4x
    Bvc, Eor, Eor, Nop, Nop, Eor, Lsr, Nop, Cli, Eor, Phy, Nop, Nop, Eor, Lsr, Nop, // 5x
    Rts, Adc, Nop, Nop, Stz, Adc, Ror, Nop, Pla, Adc, Ror, Nop, Jmp, Adc, Ror, Nop, // 6x
    Bvs, Adc, Adc, Nop, Stz, Adc, Ror, Nop, Sei, Adc, Ply, Nop, Jmp, Adc, Ror, Nop, // 7x
    Bra, Sta, Nop, Nop, Sty, Sta, Stx, Nop, Dey, Bit, Txa, Nop, Sty, Sta, Stx, Nop, // 8x
    Bcc, Sta, Sta, Nop, Sty, Sta, Stx, Nop, Tya, Sta, Txs, Nop, Stz, Sta, Stz, Nop, // 9x
    Ldy, Lda, Ldx, Nop, Ldy, Lda, Ldx, Nop, Tay, Lda, Tax, Nop, Ldy, Lda, Ldx, Nop, // Ax
    Bcs, Lda, Lda, Nop, Ldy, Lda, Ldx, Nop, Clv, Lda, Tsx, Nop, Ldy, Lda, Ldx, Nop, // Bx
    Cpy, Cmp, Nop, Nop, Cpy, Cmp, Dec, Nop, Iny, Cmp, Dex, Nop, Cpy, Cmp, Dec, Nop, // Cx
    Bne, Cmp, Cmp, Nop, Nop, Cmp, Dec, Nop, Cld, Cmp, Phx, Nop, Nop, Cmp, Dec, Nop, // Dx
    Cpx, Sbc, Nop, Nop, Cpx, Sbc, Inc, Nop, Inx, Sbc, Nop, Nop, Cpx, Sbc, Inc, Nop, // Ex
    Beq, Sbc, Sbc, Nop, Nop, Sbc, Inc, Nop, Sed, Sbc, Plx, Nop, Nop, Sbc, Inc, Nop, // Fx
];

#[rustfmt::skip]
pub const OPCODE_MODES: [Mode; 256] = [
//  x0   x1   x2   x3   x4   x5   x6   x7   x8   x9   xA   xB   xC   xD   xE   xF
    IMP, IZX, IMP, IMP, ZPG, ZPG, ZPG, IMP, IMP, IMM, ACC, IMP, ABS, ABS, ABS, IMP, // 0x
    REL, IZY, IZP, IMP, ZPG, ZPX, ZPX, IMP, IMP, ABY, ACC, IMP, ABS, ABX, ABX, IMP, // 1x
    ABS, IZX, IMP, IMP, ZPG, ZPG, ZPG, IMP, IMP, IMM, ACC, IMP, ABS, ABS, ABS, IMP, // 2x
    REL, IZY, IZP, IMP, ZPX, ZPX, ZPX, IMP, IMP, ABY, ACC, IMP, ABX, ABX, ABX, IMP, // 3x
    IMP, IZX, IMP, IMP, IMP, ZPG, ZPG, IMP, IMP, IMM, ACC, IMP, ABS, ABS, ABS, IMP, // 4x
    REL, IZY, IZP, IMP, IMP, ZPX, ZPX, IMP, IMP, ABY, IMP, IMP, IMP, ABX, ABX, IMP, // 5x
    IMP, IZX, IMP, IMP, ZPG, ZPG, ZPG, IMP, IMP, IMM, ACC, IMP, IND, ABS, ABS, IMP, // 6x
    REL, IZY, IZP, IMP, ZPX, ZPX, ZPX, IMP, IMP, ABY, IMP, IMP, IAX, ABX, ABX, IMP, // 7x
    REL, IZX, IMP, IMP, ZPG, ZPG, ZPG, IMP, IMP, IMM, IMP, IMP, ABS, ABS, ABS, IMP, // 8x
    REL, IZY, IZP, IMP, ZPX, ZPX, ZPY, IMP, IMP, ABY, IMP, IMP, ABS, ABX, ABX, IMP, // 9x
    IMM, IZX, IMM, IMP, ZPG, ZPG, ZPG, IMP, IMP, IMM, IMP, IMP, ABS, ABS, ABS, IMP, // Ax
    REL, IZY, IZP, IMP, ZPX, ZPX, ZPY, IMP, IMP, ABY, IMP, IMP, ABX, ABX, ABY, IMP, // Bx
    IMM, IZX, IMP, IMP, ZPG, ZPG, ZPG, IMP, IMP, IMM, IMP, IMP, ABS, ABS, ABS, IMP, // Cx
    REL, IZY, IZP, IMP, IMP, ZPX, ZPX, IMP, IMP, ABY, IMP, IMP, IMP, ABX, ABX, IMP, // Dx
    IMM, IZX, IMP, IMP, ZPG, ZPG, ZPG, IMP, IMP, IMM, IMP, IMP, ABS, ABS, ABS, IMP, // Ex
    REL, IZY, IZP, IMP, IMP, ZPX, ZPX, IMP, IMP, ABY, IMP, IMP, IMP, ABX, ABX, IMP, // Fx
];

#[rustfmt::skip]
pub const OPCODE_CYCLES: [u8; 256] = [
//  x0   x1   x2   x3   x4   x5   x6   x7   x8   x9   xA   xB   xC   xD   xE   xF
      7,   6, ILL, ILL,   5,   3,   5, ILL,   3,   2,   2, ILL,   6,   4,   6, ILL, // 0x
      2,   5,   5, ILL,   5,   4,   6, ILL,   2,   4,   2, ILL,   6,   4,   7, ILL, // 1x
      6,   6, ILL, ILL,   3,   3,   5, ILL,   4,   2,   2, ILL,   4,   4,   6, ILL, // 2x
      2,   5,   5, ILL,   4,   4,   6, ILL,   2,   4,   2, ILL,   4,   4,   7, ILL, // 3x
      6,   6, ILL, ILL, ILL,   3,   5, ILL,   3,   2,   2, ILL,   3,   4,   6, ILL, // 4x
      2,   5,   5, ILL, ILL,   4,   6, ILL,   2,   4,   3, ILL, ILL,   4,   7, ILL, // 5x
      6,   6, ILL, ILL,   3,   3,   5, ILL,   4,   2,   2, ILL,   6,   4,   6, ILL, // 6x
      2,   5,   5, ILL,   4,   4,   6, ILL,   2,   4,   4, ILL,   6,   4,   7, ILL, // 7x
      2,   6, ILL, ILL,   3,   3,   3, ILL,   2,   2,   2, ILL,   4,   4,   4, ILL, // 8x
      2,   6,   5, ILL,   4,   4,   4, ILL,   2,   5,   2, ILL,   4,   5,   5, ILL, // 9x
      2,   6,   2, ILL,   3,   3,   3, ILL,   2,   2,   2, ILL,   4,   4,   4, ILL, // Ax
      2,   5,   5, ILL,   4,   4,   4, ILL,   2,   4,   2, ILL,   4,   4,   4, ILL, // Bx
      2,   6, ILL, ILL,   3,   3,   5, ILL,   2,   2,   2, ILL,   4,   4,   6, ILL, // Cx
      2,   5,   5, ILL, ILL,   4,   6, ILL,   2,   4,   3, ILL, ILL,   4,   7, ILL, // Dx
      2,   6, ILL, ILL,   3,   3,   5, ILL,   2,   2,   2, ILL,   4,   4,   6, ILL, // Ex
      2,   5,   5, ILL, ILL,   4,   6, ILL,   2,   4,   4, ILL, ILL,   4,   7, ILL, // Fx
];

/// Total instruction size in bytes, derived from the mode table so the two
/// can never disagree. Undefined opcodes report 1.
pub const OPCODE_SIZES: [u8; 256] = build_sizes();

const fn build_sizes() -> [u8; 256] {
    let mut sizes = [1u8; 256];
    let mut i = 0;
    while i < 256 {
        if OPCODE_CYCLES[i] != ILLEGAL_CYCLES {
            sizes[i] = 1 + OPCODE_MODES[i].operand_len() as u8;
        }
        i += 1;
    }
    sizes
}

/// Looks up the instruction descriptor for an opcode byte. Total over the
/// full 0..=255 space; callers detect undefined opcodes by the cycle
/// sentinel.
pub fn decode(opcode: u8) -> (Op, Mode, u8) {
    let i = opcode as usize;
    (OPCODE_OPS[i], OPCODE_MODES[i], OPCODE_CYCLES[i])
}

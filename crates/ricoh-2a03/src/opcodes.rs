//! Static opcode descriptor table.
//!
//! A 256-entry lookup from the raw opcode byte to its instruction
//! descriptor: operation kind, addressing mode, base cycle count and the
//! timing quirks of the indexed modes. Built once at compile time, never
//! mutated, so no synchronization is needed.

/// Operation kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Op {
    Nop,
    Hlt,
    Lda,
    Ldx,
    Ldy,
    Sta,
    Stx,
    Sty,
    Tax,
    Tay,
    Tsx,
    Txa,
    Txs,
    Tya,
    Pha,
    Pla,
    Php,
    Plp,
    Dec,
    Dex,
    Dey,
    Inc,
    Inx,
    Iny,
    Adc,
    Sbc,
    And,
    Eor,
    Ora,
    Asl,
    Lsr,
    Rol,
    Ror,
    Clc,
    Cld,
    Cli,
    Clv,
    Sec,
    Sed,
    Sei,
}

/// Addressing mode. Implied covers the accumulator forms of the shifts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Mode {
    Implied,
    Immediate,
    ZeroPage,
    ZeroPageX,
    ZeroPageY,
    Absolute,
    AbsoluteX,
    AbsoluteY,
    IndirectX,
    IndirectY,
}

/// Extra-cycle behavior of an indexed addressing mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Stall {
    /// No stall cycle.
    None,
    /// One extra cycle when the index addition crosses a page.
    PageCross,
    /// The extra cycle is taken regardless of page crossing; writes must
    /// not speculatively access the wrong page. Already in the base count.
    Always,
}

/// A static instruction descriptor. Shared by value for every execution of
/// its opcode; per-instance state lives in the in-flight instruction.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Opcode {
    pub op: Op,
    pub mode: Mode,
    /// Base cycle count; a page-cross stall can add one at run time.
    pub cycles: u8,
    pub stall: Stall,
}

/// Look up the descriptor for an opcode byte.
///
/// The host established the program before execution; fetching a byte
/// outside the implemented set means a wrong program and is fatal.
pub(crate) fn decode(byte: u8) -> Opcode {
    match TABLE[usize::from(byte)] {
        Some(descriptor) => descriptor,
        None => panic!("undefined opcode ${byte:02X}"),
    }
}

const fn def(op: Op, mode: Mode, cycles: u8) -> Option<Opcode> {
    Some(Opcode {
        op,
        mode,
        cycles,
        stall: Stall::None,
    })
}

const fn def_stall(op: Op, mode: Mode, cycles: u8, stall: Stall) -> Option<Opcode> {
    Some(Opcode {
        op,
        mode,
        cycles,
        stall,
    })
}

static TABLE: [Option<Opcode>; 256] = build();

const fn build() -> [Option<Opcode>; 256] {
    let mut t: [Option<Opcode>; 256] = [None; 256];

    t[0xEA] = def(Op::Nop, Mode::Implied, 2);

    // Illegal/jam opcodes: one cycle, then the core is wedged.
    t[0x02] = def(Op::Hlt, Mode::Implied, 1);
    t[0x12] = def(Op::Hlt, Mode::Implied, 1);
    t[0x22] = def(Op::Hlt, Mode::Implied, 1);
    t[0x32] = def(Op::Hlt, Mode::Implied, 1);
    t[0x42] = def(Op::Hlt, Mode::Implied, 1);
    t[0x52] = def(Op::Hlt, Mode::Implied, 1);
    t[0x62] = def(Op::Hlt, Mode::Implied, 1);
    t[0x72] = def(Op::Hlt, Mode::Implied, 1);
    t[0x92] = def(Op::Hlt, Mode::Implied, 1);
    t[0xB2] = def(Op::Hlt, Mode::Implied, 1);
    t[0xD2] = def(Op::Hlt, Mode::Implied, 1);
    t[0xF2] = def(Op::Hlt, Mode::Implied, 1);

    t[0xA9] = def(Op::Lda, Mode::Immediate, 2);
    t[0xA5] = def(Op::Lda, Mode::ZeroPage, 3);
    t[0xB5] = def(Op::Lda, Mode::ZeroPageX, 4);
    t[0xAD] = def(Op::Lda, Mode::Absolute, 4);
    t[0xBD] = def_stall(Op::Lda, Mode::AbsoluteX, 4, Stall::PageCross);
    t[0xB9] = def_stall(Op::Lda, Mode::AbsoluteY, 4, Stall::PageCross);
    t[0xA1] = def(Op::Lda, Mode::IndirectX, 6);
    t[0xB1] = def_stall(Op::Lda, Mode::IndirectY, 5, Stall::PageCross);

    t[0xA2] = def(Op::Ldx, Mode::Immediate, 2);
    t[0xA6] = def(Op::Ldx, Mode::ZeroPage, 3);
    t[0xB6] = def(Op::Ldx, Mode::ZeroPageY, 4);
    t[0xAE] = def(Op::Ldx, Mode::Absolute, 4);
    t[0xBE] = def_stall(Op::Ldx, Mode::AbsoluteY, 4, Stall::PageCross);

    t[0xA0] = def(Op::Ldy, Mode::Immediate, 2);
    t[0xA4] = def(Op::Ldy, Mode::ZeroPage, 3);
    t[0xB4] = def(Op::Ldy, Mode::ZeroPageX, 4);
    t[0xAC] = def(Op::Ldy, Mode::Absolute, 4);
    t[0xBC] = def_stall(Op::Ldy, Mode::AbsoluteX, 4, Stall::PageCross);

    t[0x85] = def(Op::Sta, Mode::ZeroPage, 3);
    t[0x95] = def(Op::Sta, Mode::ZeroPageX, 4);
    t[0x8D] = def(Op::Sta, Mode::Absolute, 4);
    t[0x9D] = def_stall(Op::Sta, Mode::AbsoluteX, 5, Stall::Always);
    t[0x99] = def_stall(Op::Sta, Mode::AbsoluteY, 5, Stall::Always);
    t[0x81] = def(Op::Sta, Mode::IndirectX, 6);
    t[0x91] = def_stall(Op::Sta, Mode::IndirectY, 6, Stall::Always);

    t[0x86] = def(Op::Stx, Mode::ZeroPage, 3);
    t[0x96] = def(Op::Stx, Mode::ZeroPageY, 4);
    t[0x8E] = def(Op::Stx, Mode::Absolute, 4);

    t[0x84] = def(Op::Sty, Mode::ZeroPage, 3);
    t[0x94] = def(Op::Sty, Mode::ZeroPageX, 4);
    t[0x8C] = def(Op::Sty, Mode::Absolute, 4);

    t[0xAA] = def(Op::Tax, Mode::Implied, 2);
    t[0xA8] = def(Op::Tay, Mode::Implied, 2);
    t[0xBA] = def(Op::Tsx, Mode::Implied, 2);
    t[0x8A] = def(Op::Txa, Mode::Implied, 2);
    t[0x9A] = def(Op::Txs, Mode::Implied, 2);
    t[0x98] = def(Op::Tya, Mode::Implied, 2);

    t[0x48] = def(Op::Pha, Mode::Implied, 3);
    t[0x68] = def(Op::Pla, Mode::Implied, 4);
    t[0x08] = def(Op::Php, Mode::Implied, 3);
    t[0x28] = def(Op::Plp, Mode::Implied, 4);

    t[0xC6] = def(Op::Dec, Mode::ZeroPage, 5);
    t[0xD6] = def(Op::Dec, Mode::ZeroPageX, 6);
    t[0xCE] = def(Op::Dec, Mode::Absolute, 6);
    t[0xDE] = def_stall(Op::Dec, Mode::AbsoluteX, 7, Stall::Always);
    t[0xCA] = def(Op::Dex, Mode::Implied, 2);
    t[0x88] = def(Op::Dey, Mode::Implied, 2);

    t[0xE6] = def(Op::Inc, Mode::ZeroPage, 5);
    t[0xF6] = def(Op::Inc, Mode::ZeroPageX, 6);
    t[0xEE] = def(Op::Inc, Mode::Absolute, 6);
    t[0xFE] = def_stall(Op::Inc, Mode::AbsoluteX, 7, Stall::Always);
    t[0xE8] = def(Op::Inx, Mode::Implied, 2);
    t[0xC8] = def(Op::Iny, Mode::Implied, 2);

    t[0x69] = def(Op::Adc, Mode::Immediate, 2);
    t[0x65] = def(Op::Adc, Mode::ZeroPage, 3);
    t[0x75] = def(Op::Adc, Mode::ZeroPageX, 4);
    t[0x6D] = def(Op::Adc, Mode::Absolute, 4);
    t[0x7D] = def_stall(Op::Adc, Mode::AbsoluteX, 4, Stall::PageCross);
    t[0x79] = def_stall(Op::Adc, Mode::AbsoluteY, 4, Stall::PageCross);
    t[0x61] = def(Op::Adc, Mode::IndirectX, 6);
    t[0x71] = def_stall(Op::Adc, Mode::IndirectY, 5, Stall::PageCross);

    t[0xE9] = def(Op::Sbc, Mode::Immediate, 2);
    t[0xE5] = def(Op::Sbc, Mode::ZeroPage, 3);
    t[0xF5] = def(Op::Sbc, Mode::ZeroPageX, 4);
    t[0xED] = def(Op::Sbc, Mode::Absolute, 4);
    t[0xFD] = def_stall(Op::Sbc, Mode::AbsoluteX, 4, Stall::PageCross);
    t[0xF9] = def_stall(Op::Sbc, Mode::AbsoluteY, 4, Stall::PageCross);
    t[0xE1] = def(Op::Sbc, Mode::IndirectX, 6);
    t[0xF1] = def_stall(Op::Sbc, Mode::IndirectY, 5, Stall::PageCross);

    t[0x29] = def(Op::And, Mode::Immediate, 2);
    t[0x25] = def(Op::And, Mode::ZeroPage, 3);
    t[0x35] = def(Op::And, Mode::ZeroPageX, 4);
    t[0x2D] = def(Op::And, Mode::Absolute, 4);
    t[0x3D] = def_stall(Op::And, Mode::AbsoluteX, 4, Stall::PageCross);
    t[0x39] = def_stall(Op::And, Mode::AbsoluteY, 4, Stall::PageCross);
    t[0x21] = def(Op::And, Mode::IndirectX, 6);
    t[0x31] = def_stall(Op::And, Mode::IndirectY, 5, Stall::PageCross);

    t[0x49] = def(Op::Eor, Mode::Immediate, 2);
    t[0x45] = def(Op::Eor, Mode::ZeroPage, 3);
    t[0x55] = def(Op::Eor, Mode::ZeroPageX, 4);
    t[0x4D] = def(Op::Eor, Mode::Absolute, 4);
    t[0x5D] = def_stall(Op::Eor, Mode::AbsoluteX, 4, Stall::PageCross);
    t[0x59] = def_stall(Op::Eor, Mode::AbsoluteY, 4, Stall::PageCross);
    t[0x41] = def(Op::Eor, Mode::IndirectX, 6);
    t[0x51] = def_stall(Op::Eor, Mode::IndirectY, 5, Stall::PageCross);

    t[0x09] = def(Op::Ora, Mode::Immediate, 2);
    t[0x05] = def(Op::Ora, Mode::ZeroPage, 3);
    t[0x15] = def(Op::Ora, Mode::ZeroPageX, 4);
    t[0x0D] = def(Op::Ora, Mode::Absolute, 4);
    t[0x1D] = def_stall(Op::Ora, Mode::AbsoluteX, 4, Stall::PageCross);
    t[0x19] = def_stall(Op::Ora, Mode::AbsoluteY, 4, Stall::PageCross);
    t[0x01] = def(Op::Ora, Mode::IndirectX, 6);
    t[0x11] = def_stall(Op::Ora, Mode::IndirectY, 5, Stall::PageCross);

    t[0x0A] = def(Op::Asl, Mode::Implied, 2);
    t[0x06] = def(Op::Asl, Mode::ZeroPage, 5);
    t[0x16] = def(Op::Asl, Mode::ZeroPageX, 6);
    t[0x0E] = def(Op::Asl, Mode::Absolute, 6);
    t[0x1E] = def_stall(Op::Asl, Mode::AbsoluteX, 7, Stall::Always);

    t[0x4A] = def(Op::Lsr, Mode::Implied, 2);
    t[0x46] = def(Op::Lsr, Mode::ZeroPage, 5);
    t[0x56] = def(Op::Lsr, Mode::ZeroPageX, 6);
    t[0x4E] = def(Op::Lsr, Mode::Absolute, 6);
    t[0x5E] = def_stall(Op::Lsr, Mode::AbsoluteX, 7, Stall::Always);

    t[0x2A] = def(Op::Rol, Mode::Implied, 2);
    t[0x26] = def(Op::Rol, Mode::ZeroPage, 5);
    t[0x36] = def(Op::Rol, Mode::ZeroPageX, 6);
    t[0x2E] = def(Op::Rol, Mode::Absolute, 6);
    t[0x3E] = def_stall(Op::Rol, Mode::AbsoluteX, 7, Stall::Always);

    t[0x6A] = def(Op::Ror, Mode::Implied, 2);
    t[0x66] = def(Op::Ror, Mode::ZeroPage, 5);
    t[0x76] = def(Op::Ror, Mode::ZeroPageX, 6);
    t[0x6E] = def(Op::Ror, Mode::Absolute, 6);
    t[0x7E] = def_stall(Op::Ror, Mode::AbsoluteX, 7, Stall::Always);

    t[0x18] = def(Op::Clc, Mode::Implied, 2);
    t[0xD8] = def(Op::Cld, Mode::Implied, 2);
    t[0x58] = def(Op::Cli, Mode::Implied, 2);
    t[0xB8] = def(Op::Clv, Mode::Implied, 2);
    t[0x38] = def(Op::Sec, Mode::Implied, 2);
    t[0xF8] = def(Op::Sed, Mode::Implied, 2);
    t[0x78] = def(Op::Sei, Mode::Implied, 2);

    t
}

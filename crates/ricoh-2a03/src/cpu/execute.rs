//! Instruction semantics once the effective address is latched.
//!
//! Register-only operations finish in a single executor step. Stack and
//! memory read-modify-write operations spread their work over several
//! steps, keyed off the in-flight instruction's cycle position so the bus
//! traffic lands on the same cycles as the silicon.

use crate::flags::{C, I, Status, V};
use crate::opcodes::{Mode, Op};

use super::Ricoh2A03;

impl Ricoh2A03<'_> {
    /// Run one executor step for the in-flight instruction.
    pub(super) fn execute(&mut self) {
        match self.instr.op {
            Op::Nop => {}
            Op::Hlt => self.halted = true,

            Op::Lda => {
                let value = self.load(self.addr);
                self.regs.a = value;
                self.regs.p.update_nz(value);
            }
            Op::Ldx => {
                let value = self.load(self.addr);
                self.regs.x = value;
                self.regs.p.update_nz(value);
            }
            Op::Ldy => {
                let value = self.load(self.addr);
                self.regs.y = value;
                self.regs.p.update_nz(value);
            }

            Op::Sta => self.store(self.addr, self.regs.a),
            Op::Stx => self.store(self.addr, self.regs.x),
            Op::Sty => self.store(self.addr, self.regs.y),

            Op::Tax => {
                self.regs.x = self.regs.a;
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Tay => {
                self.regs.y = self.regs.a;
                self.regs.p.update_nz(self.regs.y);
            }
            Op::Tsx => {
                self.regs.x = self.regs.s;
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Txa => {
                self.regs.a = self.regs.x;
                self.regs.p.update_nz(self.regs.a);
            }
            // Transfers into S leave the flags alone; only TSX reads them
            // back out through N/Z.
            Op::Txs => self.regs.s = self.regs.x,
            Op::Tya => {
                self.regs.a = self.regs.y;
                self.regs.p.update_nz(self.regs.a);
            }

            Op::Pha => self.push_cycle(|cpu| cpu.regs.a),
            Op::Php => self.push_cycle(|cpu| cpu.regs.p.to_pushed()),
            Op::Pla => self.pull_cycle(|cpu, value| {
                cpu.regs.a = value;
                cpu.regs.p.update_nz(value);
            }),
            Op::Plp => self.pull_cycle(|cpu, value| cpu.regs.p.set_pulled(value)),

            Op::Dec => self.rmw_value_cycle(|value| value.wrapping_sub(1)),
            Op::Inc => self.rmw_value_cycle(|value| value.wrapping_add(1)),
            Op::Dex => {
                self.regs.x = self.regs.x.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Inx => {
                self.regs.x = self.regs.x.wrapping_add(1);
                self.regs.p.update_nz(self.regs.x);
            }
            Op::Dey => {
                self.regs.y = self.regs.y.wrapping_sub(1);
                self.regs.p.update_nz(self.regs.y);
            }
            Op::Iny => {
                self.regs.y = self.regs.y.wrapping_add(1);
                self.regs.p.update_nz(self.regs.y);
            }

            Op::Adc => {
                let operand = self.load(self.addr);
                self.add_with_carry(operand);
            }
            // Subtraction is addition of the complement; borrow folds into
            // the existing carry convention.
            Op::Sbc => {
                let operand = self.load(self.addr);
                self.add_with_carry(!operand);
            }

            Op::And => {
                let operand = self.load(self.addr);
                self.regs.a &= operand;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Eor => {
                let operand = self.load(self.addr);
                self.regs.a ^= operand;
                self.regs.p.update_nz(self.regs.a);
            }
            Op::Ora => {
                let operand = self.load(self.addr);
                self.regs.a |= operand;
                self.regs.p.update_nz(self.regs.a);
            }

            Op::Asl => self.shift_cycle(asl),
            Op::Lsr => self.shift_cycle(lsr),
            Op::Rol => self.shift_cycle(rol),
            Op::Ror => self.shift_cycle(ror),

            Op::Clc => self.regs.p.clear(C),
            Op::Cli => self.regs.p.clear(I),
            Op::Clv => self.regs.p.clear(V),
            Op::Sec => self.regs.p.set(C),
            Op::Sei => self.regs.p.set(I),
            // No BCD unit on this part; a program touching decimal mode is
            // broken, not slow.
            Op::Cld | Op::Sed => panic!("decimal mode is unsupported ({:?})", self.instr.op),
        }
    }

    /// Accumulator form on its single cycle, otherwise the memory-operand
    /// read/modify/write-back window.
    fn shift_cycle(&mut self, shift: fn(&mut Status, u8) -> u8) {
        if self.instr.mode == Mode::Implied {
            self.regs.a = shift(&mut self.regs.p, self.regs.a);
            return;
        }
        match self.instr.remaining() {
            3 => self.data = self.load(self.addr),
            // carry and N/Z land with the modify step
            2 => self.data = shift(&mut self.regs.p, self.data),
            1 => self.store(self.addr, self.data),
            _ => unreachable!("shift ran outside its read/modify/write window"),
        }
    }

    /// Memory-operand increment/decrement: read, modify, write-back on the
    /// last three cycles before the next fetch. N/Z land with the
    /// write-back.
    fn rmw_value_cycle(&mut self, modify: fn(u8) -> u8) {
        match self.instr.remaining() {
            3 => self.data = self.load(self.addr),
            2 => self.data = modify(self.data),
            1 => {
                self.store(self.addr, self.data);
                self.regs.p.update_nz(self.data);
            }
            _ => unreachable!("increment/decrement ran outside its read/modify/write window"),
        }
    }

    fn push_cycle(&mut self, value: fn(&Self) -> u8) {
        match self.instr.cycle {
            0 => self.addr = self.regs.stack_addr(),
            1 => {
                self.store(self.addr, value(self));
                self.regs.s = self.regs.s.wrapping_sub(1);
            }
            _ => unreachable!("push ran past cycle 1"),
        }
    }

    fn pull_cycle(&mut self, apply: fn(&mut Self, u8)) {
        match self.instr.cycle {
            0 => self.regs.s = self.regs.s.wrapping_add(1),
            1 => self.addr = self.regs.stack_addr(),
            2 => {
                let value = self.load(self.addr);
                apply(self, value);
            }
            _ => unreachable!("pull ran past cycle 2"),
        }
    }

    /// Binary add with carry-in; the only arithmetic this part has.
    fn add_with_carry(&mut self, operand: u8) {
        let a = self.regs.a;
        let carry = u16::from(self.regs.p.is_set(C));
        let sum = u16::from(a) + u16::from(operand) + carry;
        let result = sum as u8;

        self.regs.p.set_if(C, sum > 0xFF);
        // Signed overflow: both inputs agree in sign and the result differs.
        self.regs
            .p
            .set_if(V, (a ^ result) & (operand ^ result) & 0x80 != 0);
        self.regs.a = result;
        self.regs.p.update_nz(result);
    }
}

fn asl(p: &mut Status, value: u8) -> u8 {
    p.set_if(C, value & 0x80 != 0);
    let result = value << 1;
    p.update_nz(result);
    result
}

fn lsr(p: &mut Status, value: u8) -> u8 {
    p.set_if(C, value & 0x01 != 0);
    let result = value >> 1;
    p.update_nz(result);
    result
}

fn rol(p: &mut Status, value: u8) -> u8 {
    let carry = p.is_set(C);
    p.set_if(C, value & 0x80 != 0);
    let result = (value << 1) | u8::from(carry);
    p.update_nz(result);
    result
}

fn ror(p: &mut Status, value: u8) -> u8 {
    let carry = p.is_set(C);
    p.set_if(C, value & 0x01 != 0);
    let result = (value >> 1) | (u8::from(carry) << 7);
    p.update_nz(result);
    result
}

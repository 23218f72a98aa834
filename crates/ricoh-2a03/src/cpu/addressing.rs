//! Effective-address resolution, one cycle at a time.
//!
//! Each addressing mode is a small state machine stepped once per cycle
//! until the effective address latches. Implied and immediate operands are
//! free: they latch without consuming the cycle, and the executor runs in
//! the same tick.

use crate::opcodes::{Mode, Stall};

use super::Ricoh2A03;

impl Ricoh2A03<'_> {
    /// Run one resolver step. Returns true when the step was free.
    pub(super) fn resolve(&mut self) -> bool {
        match self.instr.mode {
            Mode::Implied => {
                assert_eq!(self.instr.cycle, 0, "implied operand resolved past cycle 0");
                self.instr.latched = true;
                true
            }
            Mode::Immediate => {
                assert_eq!(self.instr.cycle, 0, "immediate operand resolved past cycle 0");
                let operand = self.regs.pc;
                self.regs.pc = self.regs.pc.wrapping_add(1);
                self.latch(operand);
                true
            }
            Mode::ZeroPage => {
                assert_eq!(self.instr.cycle, 0, "zero-page operand resolved past cycle 0");
                let pointer = self.fetch();
                self.latch(u16::from(pointer));
                false
            }
            Mode::ZeroPageX => {
                self.zero_page_indexed(self.regs.x);
                false
            }
            Mode::ZeroPageY => {
                self.zero_page_indexed(self.regs.y);
                false
            }
            Mode::Absolute => {
                match self.instr.cycle {
                    0 => self.addr = u16::from(self.fetch()),
                    1 => {
                        let hi = self.fetch();
                        self.latch((u16::from(hi) << 8) | self.addr);
                    }
                    _ => unreachable!("absolute operand resolved past cycle 1"),
                }
                false
            }
            Mode::AbsoluteX => {
                self.absolute_indexed(self.regs.x);
                false
            }
            Mode::AbsoluteY => {
                self.absolute_indexed(self.regs.y);
                false
            }
            Mode::IndirectX => {
                self.indirect_x();
                false
            }
            Mode::IndirectY => {
                self.indirect_y();
                false
            }
        }
    }

    fn zero_page_indexed(&mut self, index: u8) {
        match self.instr.cycle {
            0 => self.data = self.fetch(),
            // the index addition wraps within the zero page
            1 => self.latch(u16::from(self.data.wrapping_add(index))),
            _ => unreachable!("zero-page indexed operand resolved past cycle 1"),
        }
    }

    fn absolute_indexed(&mut self, index: u8) {
        match self.instr.cycle {
            0 => self.addr = u16::from(self.fetch()),
            1 => {
                self.addr = (u16::from(self.fetch()) << 8) | self.addr;
                if !self.stall_for_index(index) {
                    self.latch(self.addr.wrapping_add(u16::from(index)));
                }
            }
            // stall cycle: the sum latches one cycle late
            2 => self.latch(self.addr.wrapping_add(u16::from(index))),
            _ => unreachable!("absolute indexed operand resolved past cycle 2"),
        }
    }

    fn indirect_x(&mut self) {
        match self.instr.cycle {
            0 => self.data = self.fetch(),
            // internal cycle: the pointer addition wraps within the zero page
            1 => self.data = self.data.wrapping_add(self.regs.x),
            2 => {
                self.addr = u16::from(self.load(u16::from(self.data)));
                self.data = self.data.wrapping_add(1);
            }
            3 => {
                let hi = self.load(u16::from(self.data));
                self.latch((u16::from(hi) << 8) | self.addr);
            }
            _ => unreachable!("(indirect,X) operand resolved past cycle 3"),
        }
    }

    fn indirect_y(&mut self) {
        match self.instr.cycle {
            0 => self.data = self.fetch(),
            1 => {
                self.addr = u16::from(self.load(u16::from(self.data)));
                self.data = self.data.wrapping_add(1);
            }
            2 => {
                let hi = self.load(u16::from(self.data));
                self.addr = (u16::from(hi) << 8) | self.addr;
                let index = self.regs.y;
                if !self.stall_for_index(index) {
                    self.latch(self.addr.wrapping_add(u16::from(index)));
                }
            }
            3 => self.latch(self.addr.wrapping_add(u16::from(self.regs.y))),
            _ => unreachable!("(indirect),Y operand resolved past cycle 3"),
        }
    }

    /// Whether resolution holds for one more cycle before latching. A
    /// page-cross stall grows this instance's cycle count exactly once; the
    /// unconditional stall is already in the base count.
    fn stall_for_index(&mut self, index: u8) -> bool {
        match self.instr.stall {
            Stall::Always => true,
            Stall::PageCross if (self.addr as u8).checked_add(index).is_none() => {
                self.instr.total += 1;
                true
            }
            _ => false,
        }
    }
}

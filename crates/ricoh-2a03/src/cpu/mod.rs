//! Processor state and the cycle driver.
//!
//! One `tick()` call is one clock cycle. A cycle goes to exactly one of: a
//! resolver step that computes the effective address, an executor step that
//! performs the operation's effect, or the final fetch of the next opcode.
//! Implied and immediate operands latch for free, so their executor work
//! starts on the same cycle the instruction began resolving.

mod addressing;
mod execute;

use emu_core::{Bus, Cpu, MmioHandler, Observable, Value};

use crate::flags::{self, Status};
use crate::opcodes::{self, Mode, Op, Opcode, Stall};
use crate::registers::Registers;
use crate::space::{AddressSpace, MapError};

/// Cycles the reset sequence consumes before the first instruction.
const RESET_CYCLES: u64 = 8;

/// Reset vector: the last two bytes of the address space.
const RESET_VECTOR: u16 = 0xFFFC;

/// The instruction currently in flight.
#[derive(Debug, Clone, Copy)]
struct Instr {
    op: Op,
    mode: Mode,
    stall: Stall,
    /// Current cycle within the instruction, 0-based. Strictly less than
    /// `total` while the core is running.
    cycle: u8,
    /// Total cycles this instance takes. Grows by exactly one when a
    /// page-cross stall is discovered during address resolution.
    total: u8,
    /// The effective address has been latched.
    latched: bool,
}

impl Instr {
    const fn idle() -> Self {
        Self {
            op: Op::Nop,
            mode: Mode::Implied,
            stall: Stall::None,
            cycle: 0,
            total: 0,
            latched: false,
        }
    }

    fn start(descriptor: Opcode) -> Self {
        Self {
            op: descriptor.op,
            mode: descriptor.mode,
            stall: descriptor.stall,
            cycle: 0,
            total: descriptor.cycles,
            latched: false,
        }
    }

    /// Cycles left after the current one.
    fn remaining(&self) -> u8 {
        self.total - self.cycle - 1
    }

    /// Whether this cycle ends with the next opcode fetch. HLT wedges the
    /// core from its execute step and never reaches a fetch.
    fn is_final_cycle(&self) -> bool {
        self.op != Op::Hlt && self.cycle + 1 == self.total
    }
}

/// The Ricoh 2A03/2A07 instruction core.
///
/// A 6502 with the BCD unit cut: decimal mode never computes, and the
/// decimal-mode opcodes are fatal. The core owns the address space; map RAM
/// and peripherals into it, reset, then drive the clock one `tick()` at a
/// time.
pub struct Ricoh2A03<'a> {
    /// Architectural registers.
    pub regs: Registers,
    /// Internal address-bus latch.
    addr: u16,
    /// Internal data-bus scratch register.
    data: u8,
    halted: bool,
    instr: Instr,
    cycles: u64,
    retired: u64,
    space: AddressSpace<'a>,
}

impl Default for Ricoh2A03<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> Ricoh2A03<'a> {
    /// Create a core with zeroed state and an empty address space.
    ///
    /// Map the address space and call [`Cpu::reset`] before ticking.
    #[must_use]
    pub fn new() -> Self {
        Self {
            regs: Registers::new(),
            addr: 0,
            data: 0,
            halted: false,
            instr: Instr::idle(),
            cycles: 0,
            retired: 0,
            space: AddressSpace::new(),
        }
    }

    /// Register a RAM-backed range.
    pub fn map_ram(&mut self, base: u16, ram: &'a mut [u8]) -> Result<(), MapError> {
        self.space.map_ram(base, ram)
    }

    /// Register a memory-mapped peripheral range.
    pub fn map_mmio(
        &mut self,
        base: u16,
        size: u32,
        handler: &'a mut dyn MmioHandler,
    ) -> Result<(), MapError> {
        self.space.map_mmio(base, size, handler)
    }

    /// Raw bus read, for host-side inspection.
    pub fn load(&mut self, address: u16) -> u8 {
        self.space.read(address)
    }

    /// Raw bus write, for host-side injection.
    pub fn store(&mut self, address: u16, value: u8) {
        self.space.write(address, value);
    }

    /// Clock cycles consumed so far.
    #[must_use]
    pub fn cycles(&self) -> u64 {
        self.cycles
    }

    /// Instructions retired so far.
    #[must_use]
    pub fn retired(&self) -> u64 {
        self.retired
    }

    /// Fetch the byte at PC and advance PC.
    fn fetch(&mut self) -> u8 {
        let value = self.load(self.regs.pc);
        self.regs.pc = self.regs.pc.wrapping_add(1);
        value
    }

    fn fetch_instr(&mut self) -> Instr {
        let byte = self.fetch();
        Instr::start(opcodes::decode(byte))
    }

    /// Latch the effective address for the current instruction.
    fn latch(&mut self, address: u16) {
        self.addr = address;
        self.instr.latched = true;
    }

    /// The work of one cycle. Returns true if the instruction retired.
    fn step(&mut self) -> bool {
        if !self.instr.latched && !self.resolve() {
            return false;
        }
        debug_assert!(self.instr.latched);

        if !self.instr.is_final_cycle() {
            self.execute();
            // A halt retires on the spot; there is no fetch to run.
            return self.halted;
        }

        self.instr = self.fetch_instr();
        true
    }
}

impl Cpu for Ricoh2A03<'_> {
    type Registers = Registers;

    fn tick(&mut self) -> bool {
        if self.halted {
            return false;
        }

        let retired = self.step();
        self.cycles += 1;
        if retired {
            self.retired += 1;
        } else {
            self.instr.cycle += 1;
        }
        retired
    }

    fn registers(&self) -> Registers {
        self.regs
    }

    fn is_halted(&self) -> bool {
        self.halted
    }

    /// A, X and Y survive reset. The interrupt-disable and always-set bits
    /// come up set, and the first opcode is fetched at the end of the fixed
    /// reset latency.
    fn reset(&mut self) {
        let lo = self.load(RESET_VECTOR);
        let hi = self.load(RESET_VECTOR + 1);
        self.regs.pc = u16::from_le_bytes([lo, hi]);
        self.regs.s = 0xFD;
        self.regs.p = Status(flags::I | flags::U);
        self.halted = false;
        self.cycles = RESET_CYCLES;
        self.retired = 0;
        self.instr = self.fetch_instr();
    }
}

impl Observable for Ricoh2A03<'_> {
    fn query(&self, path: &str) -> Option<Value> {
        let value = match path {
            "a" => Value::U8(self.regs.a),
            "x" => Value::U8(self.regs.x),
            "y" => Value::U8(self.regs.y),
            "s" => Value::U8(self.regs.s),
            "pc" => Value::U16(self.regs.pc),
            "p" => Value::U8(self.regs.p.0),
            "flags.n" => Value::Bool(self.regs.p.is_set(flags::N)),
            "flags.v" => Value::Bool(self.regs.p.is_set(flags::V)),
            "flags.z" => Value::Bool(self.regs.p.is_set(flags::Z)),
            "flags.c" => Value::Bool(self.regs.p.is_set(flags::C)),
            "flags.i" => Value::Bool(self.regs.p.is_set(flags::I)),
            "halted" => Value::Bool(self.halted),
            "cycles" => Value::U64(self.cycles),
            "retired" => Value::U64(self.retired),
            _ => return None,
        };
        Some(value)
    }

    fn query_paths(&self) -> &'static [&'static str] {
        &[
            "a", "x", "y", "s", "pc", "p", "flags.n", "flags.v", "flags.z", "flags.c", "flags.i",
            "halted", "cycles", "retired",
        ]
    }
}

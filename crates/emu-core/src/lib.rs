//! Core traits and types for cycle-accurate emulation.
//!
//! Components advance one clock cycle at a time and the caller drives the
//! clock. All component timing derives from this. No exceptions.

mod bus;
mod cpu;
mod observable;

pub use bus::{Bus, MmioHandler, Span};
pub use cpu::Cpu;
pub use observable::{Observable, Value};

//! The address space: ordered, non-overlapping ranges of RAM or MMIO.

use emu_core::{Bus, MmioHandler, Span};
use thiserror::Error;

/// Upper bound on registered ranges. Real device populations are tiny.
pub(crate) const MAX_RANGES: usize = 8;

/// One past the top of the 16-bit address space.
const SPACE_TOP: u32 = 0x1_0000;

/// A failed range registration.
///
/// Registration is the only fallible operation in the core. Once the
/// mapping is in place it is treated as ground truth; everything downstream
/// fails hard instead of returning errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MapError {
    /// The range covers no bytes.
    #[error("cannot map a zero-sized range at ${base:04X}")]
    ZeroSize { base: u16 },

    /// The range runs past the top of the address space.
    #[error("range ${base:04X}+${size:X} runs past the top of the address space")]
    OutOfSpace { base: u16, size: u32 },

    /// The range overlaps one registered earlier.
    #[error("range ${base:04X}+${size:X} overlaps the range at ${existing:04X}")]
    Overlap {
        base: u16,
        size: u32,
        existing: u16,
    },

    /// The fixed range capacity is exhausted.
    #[error("no more than {} ranges can be registered", MAX_RANGES)]
    TooManyRanges,
}

enum Backing<'a> {
    /// Directly mapped byte buffer.
    Ram(&'a mut [u8]),
    /// Dispatched to a peripheral handler.
    Mmio(&'a mut dyn MmioHandler),
}

struct Range<'a> {
    span: Span,
    backing: Backing<'a>,
}

/// Ordered, non-overlapping set of address ranges.
///
/// Lookup is a linear scan; the range count is small. A larger device
/// population would justify binary search over the sorted list.
pub(crate) struct AddressSpace<'a> {
    ranges: Vec<Range<'a>>,
}

impl<'a> AddressSpace<'a> {
    pub(crate) fn new() -> Self {
        Self { ranges: Vec::new() }
    }

    /// Register a RAM-backed range. The slice fixes the size, so the
    /// backing always covers the whole span.
    pub(crate) fn map_ram(&mut self, base: u16, ram: &'a mut [u8]) -> Result<(), MapError> {
        if ram.is_empty() {
            return Err(MapError::ZeroSize { base });
        }
        if ram.len() > (SPACE_TOP - u32::from(base)) as usize {
            return Err(MapError::OutOfSpace {
                base,
                size: ram.len() as u32,
            });
        }
        self.insert(Span::new(base, ram.len() as u32), Backing::Ram(ram))
    }

    /// Register a memory-mapped peripheral range.
    pub(crate) fn map_mmio(
        &mut self,
        base: u16,
        size: u32,
        handler: &'a mut dyn MmioHandler,
    ) -> Result<(), MapError> {
        if size == 0 {
            return Err(MapError::ZeroSize { base });
        }
        if size > SPACE_TOP - u32::from(base) {
            return Err(MapError::OutOfSpace { base, size });
        }
        self.insert(Span::new(base, size), Backing::Mmio(handler))
    }

    /// Keep the list sorted by base; reject any overlap with a neighbour.
    fn insert(&mut self, span: Span, backing: Backing<'a>) -> Result<(), MapError> {
        if self.ranges.len() == MAX_RANGES {
            return Err(MapError::TooManyRanges);
        }

        let pos = self.ranges.partition_point(|r| r.span.base < span.base);
        if let Some(next) = self.ranges.get(pos) {
            if next.span.base <= span.last() {
                return Err(MapError::Overlap {
                    base: span.base,
                    size: span.size,
                    existing: next.span.base,
                });
            }
        }
        if pos > 0 {
            let prev = &self.ranges[pos - 1];
            if span.base <= prev.span.last() {
                return Err(MapError::Overlap {
                    base: span.base,
                    size: span.size,
                    existing: prev.span.base,
                });
            }
        }

        self.ranges.insert(pos, Range { span, backing });
        Ok(())
    }

    /// Resolve an address to its range. The host established the mapping
    /// before execution; touching unmapped space is a wrong program, not
    /// open bus.
    fn lookup(&mut self, address: u16) -> &mut Range<'a> {
        match self.ranges.iter_mut().find(|r| r.span.contains(address)) {
            Some(range) => range,
            None => panic!("access to unmapped address ${address:04X}"),
        }
    }
}

impl Bus for AddressSpace<'_> {
    fn read(&mut self, address: u16) -> u8 {
        let range = self.lookup(address);
        let offset = address - range.span.base;
        match &mut range.backing {
            Backing::Ram(buffer) => buffer[usize::from(offset)],
            Backing::Mmio(handler) => {
                let mut data = 0;
                handler.access(range.span, false, offset, &mut data);
                data
            }
        }
    }

    fn write(&mut self, address: u16, value: u8) {
        let range = self.lookup(address);
        let offset = address - range.span.base;
        match &mut range.backing {
            Backing::Ram(buffer) => buffer[usize::from(offset)] = value,
            Backing::Mmio(handler) => {
                let mut data = value;
                handler.access(range.span, true, offset, &mut data);
            }
        }
    }
}

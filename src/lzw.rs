// lzw.rs
//
// Copyright (c) 2025-2026  gifstream developers
//
//! Lempel-Ziv-Welch decompression for GIF
use crate::canvas::Canvas;
use crate::error::{Error, Result};

/// Maximum number of dictionary entries (12-bit codes)
const MAX_ENTRIES: usize = 4096;

/// Initial capacity for the entry byte heap
const HEAP_CAPACITY: usize = 16 * 1024;

/// One dictionary entry: a byte run within the heap
#[derive(Clone, Copy, Debug, Default)]
struct Entry {
    /// Heap offset of the first byte
    offset: u32,
    /// Run length in bytes
    len: u16,
}

/// Variable-width LZW decode table.
///
/// Codes below the clear code are primitive: they stand for the single
/// byte equal to their own value and are never stored.  The clear code
/// and stop code follow, and every code after those is a derived entry
/// recorded as a run in a single backing heap.  The table and heap are
/// allocated once and reused for every frame of an animation.
#[derive(Debug)]
pub(crate) struct Dictionary {
    /// Entry table with `MAX_ENTRIES` slots
    entries: Vec<Entry>,
    /// Backing storage for derived entries
    heap: Vec<u8>,
    /// Minimum code size from the image data block
    min_code_size: u8,
    /// Code which resets the table
    clear_code: u16,
    /// Code which terminates image data
    stop_code: u16,
    /// Number of codes currently defined
    size: u16,
    /// Width of the next code to read, in bits
    code_width: u8,
    /// Table size at which the width grows; 0 once capped
    next_growth: u16,
    /// No more entries may be created
    full: bool,
}

impl Dictionary {
    pub fn new() -> Self {
        Dictionary {
            entries: vec![Entry::default(); MAX_ENTRIES],
            heap: Vec::with_capacity(HEAP_CAPACITY),
            min_code_size: 0,
            clear_code: 0,
            stop_code: 0,
            size: 0,
            code_width: 0,
            next_growth: 0,
            full: false,
        }
    }

    /// Prepare for a new image data block
    pub fn init(&mut self, min_code_size: u8) -> Result<()> {
        let min = min_code_size.max(2);
        if min > 11 {
            return Err(Error::InvalidCodeSize);
        }
        if min != self.min_code_size {
            self.min_code_size = min;
            self.clear_code = 1 << min;
            self.stop_code = self.clear_code + 1;
        }
        self.clear();
        Ok(())
    }

    /// Truncate the table back to its initial state
    pub fn clear(&mut self) {
        self.size = self.stop_code + 1;
        self.code_width = self.min_code_size + 1;
        self.next_growth = 1 << self.code_width;
        self.heap.clear();
        self.full = false;
    }

    pub fn code_width(&self) -> u8 {
        self.code_width
    }

    pub fn contains(&self, code: u16) -> bool {
        code < self.size
    }

    /// The next code index to be assigned
    pub fn next_code(&self) -> u16 {
        self.size
    }

    pub fn is_clear_code(&self, code: u16) -> bool {
        code == self.clear_code
    }

    pub fn is_stop_code(&self, code: u16) -> bool {
        code == self.stop_code
    }

    /// First byte of the run a code stands for.
    ///
    /// Control codes never appear as operands in well-formed data.
    fn first_byte(&self, code: u16) -> Result<u8> {
        if code < self.clear_code {
            Ok(code as u8)
        } else if code > self.stop_code && self.contains(code) {
            let e = self.entries[code as usize];
            Ok(self.heap[e.offset as usize])
        } else {
            Err(Error::InvalidLzwData)
        }
    }

    /// Emit the byte run of a code to the canvas
    pub fn output(&self, code: u16, canvas: &mut Canvas) -> Result<()> {
        if code < self.clear_code {
            canvas.output_pixel(code as u8)
        } else if code > self.stop_code && self.contains(code) {
            let e = self.entries[code as usize];
            let start = e.offset as usize;
            for i in start..start + e.len as usize {
                canvas.output_pixel(self.heap[i])?;
            }
            Ok(())
        } else {
            Err(Error::InvalidLzwData)
        }
    }

    /// Append the entry `base` + first byte of `derive`.
    ///
    /// Returns the new code, or `None` once the table is full — the
    /// width is capped at 12 bits and creation is then suppressed.
    pub fn create_new_code(
        &mut self,
        base: u16,
        derive: u16,
    ) -> Result<Option<u16>> {
        if self.full {
            return Ok(None);
        }
        let offset = self.heap.len();
        let base_len = if base < self.clear_code {
            self.heap.push(base as u8);
            1
        } else if base > self.stop_code && self.contains(base) {
            let e = self.entries[base as usize];
            let start = e.offset as usize;
            self.heap.extend_from_within(start..start + e.len as usize);
            e.len as usize
        } else {
            return Err(Error::InvalidLzwData);
        };
        let first = self.first_byte(derive)?;
        self.heap.push(first);
        let code = self.size;
        self.entries[code as usize] = Entry {
            offset: offset as u32,
            len: (base_len + 1) as u16,
        };
        self.size += 1;
        if self.size as usize == MAX_ENTRIES {
            self.full = true;
        } else if self.size == self.next_growth {
            self.code_width += 1;
            self.next_growth = if self.code_width < 12 {
                1 << self.code_width
            } else {
                0
            };
        }
        Ok(Some(code))
    }
}

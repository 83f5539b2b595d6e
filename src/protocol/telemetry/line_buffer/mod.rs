//! Fixed-capacity line assembler for the serial byte stream.
//!
//! Bytes arrive in arbitrary chunks; complete `\n`-terminated lines are
//! handed out as they close, and a partial line waits for the next chunk.

/// Default capacity: comfortably above the longest monitor line.
pub const DEFAULT_LINE_CAPACITY: usize = 128;

/// Reason a line never reached the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum LineDiscard {
    /// The line did not fit in the assembler buffer.
    Oversized,
}

/// Accumulates bytes into lines of at most `N` bytes.
#[derive(Debug, Clone)]
pub struct LineAssembler<const N: usize = DEFAULT_LINE_CAPACITY> {
    buffer: [u8; N],
    len: usize,
    /// Set once the current line overflowed; cleared at its newline.
    discarding: bool,
    /// A `\r` arrived with the buffer full; only a `\n` may follow it.
    held_cr: bool,
}

impl<const N: usize> Default for LineAssembler<N> {
    fn default() -> Self {
        Self::new()
    }
}

impl<const N: usize> LineAssembler<N> {
    pub const fn new() -> Self {
        Self {
            buffer: [0; N],
            len: 0,
            discarding: false,
            held_cr: false,
        }
    }

    /// Bytes of the current, not yet terminated line.
    pub fn pending(&self) -> usize {
        self.len
    }

    /// Drop any partial line.
    pub fn clear(&mut self) {
        self.len = 0;
        self.discarding = false;
        self.held_cr = false;
    }

    /// Consume `bytes`, calling `on_line` for every line closed by a `\n`.
    ///
    /// Lines are passed without their terminator (a trailing `\r` is
    /// stripped too, and does not count against the capacity). Overflowing
    /// lines are reported once, at their newline.
    pub fn feed<F>(&mut self, bytes: &[u8], mut on_line: F)
    where
        F: FnMut(Result<&[u8], LineDiscard>),
    {
        for &byte in bytes {
            if byte == b'\n' {
                if self.discarding {
                    on_line(Err(LineDiscard::Oversized));
                } else {
                    let mut end = self.len;
                    if !self.held_cr && end > 0 && self.buffer[end - 1] == b'\r' {
                        end -= 1;
                    }
                    on_line(Ok(&self.buffer[..end]));
                }
                self.clear();
            } else if self.discarding {
                continue;
            } else if self.len == N && byte == b'\r' && !self.held_cr {
                self.held_cr = true;
            } else if self.len == N {
                self.discarding = true;
                self.held_cr = false;
                self.len = 0;
            } else {
                self.buffer[self.len] = byte;
                self.len += 1;
            }
        }
    }
}

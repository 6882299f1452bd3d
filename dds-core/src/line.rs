//! Line assembly from a raw character stream

use heapless::Vec;

/// Buffer length of the command line, terminator slot included
pub const COMMAND_BUFFER_LEN: usize = 1024;

/// Characters a command line can hold
pub const MAX_COMMAND_LEN: usize = COMMAND_BUFFER_LEN - 1;

/// Completed command line
pub type Line<const N: usize> = Vec<u8, N>;

/// Outcome of feeding one character
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Feed<const N: usize> {
    /// Character stored; echo it back
    Echo(u8),
    /// End of line; echo a newline. Carries the line when it was non-empty.
    Terminated(Option<Line<N>>),
    /// Nothing to echo: unprintable, LF of a CRLF pair, or buffer full
    Ignored,
}

/// Turns characters into command lines, one character per call.
///
/// CR and LF both end a line; the LF of a CRLF pair is swallowed. Printable
/// characters past the capacity are dropped without notice.
#[derive(Debug, Default)]
pub struct LineAssembler<const N: usize> {
    buffer: Vec<u8, N>,
    after_cr: bool,
}

impl<const N: usize> LineAssembler<N> {
    pub const fn new() -> Self {
        Self {
            buffer: Vec::new(),
            after_cr: false,
        }
    }

    pub fn feed(&mut self, character: u8) -> Feed<N> {
        if character == b'\n' && self.after_cr {
            self.after_cr = false;
            return Feed::Ignored;
        }
        self.after_cr = character == b'\r';

        if matches!(character, b'\r' | b'\n') {
            let line = if self.buffer.is_empty() {
                None
            } else {
                Some(core::mem::take(&mut self.buffer))
            };
            return Feed::Terminated(line);
        }

        if !is_printable(character) {
            return Feed::Ignored;
        }

        if self.buffer.push(character).is_err() {
            #[cfg(feature = "defmt")]
            defmt::trace!("Line full, dropping {=u8:#x}", character);
            return Feed::Ignored;
        }

        Feed::Echo(character)
    }

    /// Characters buffered so far
    pub fn as_bytes(&self) -> &[u8] {
        &self.buffer
    }

    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    pub const fn capacity(&self) -> usize {
        N
    }

    /// Abandon the partial line
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.after_cr = false;
    }
}

/// Space through 0x80, the range accepted on the command line
pub const fn is_printable(character: u8) -> bool {
    character >= 32 && character <= 128
}

//! Byte cursor over preprocessed XML text

/// Cursor for navigating the bytes of a `str`.
///
/// Every position the scanner stops at sits next to an ASCII byte, so
/// slices between two cursor positions are always valid `str` slices.
#[derive(Clone, Debug)]
pub struct Cursor<'a> {
    input: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    pub const fn new(input: &'a str) -> Self {
        Self { input, pos: 0 }
    }

    pub const fn at(input: &'a str, pos: usize) -> Self {
        Self { input, pos }
    }

    /// Get current byte without consuming
    pub fn current(&self) -> Option<u8> {
        self.input.as_bytes().get(self.pos).copied()
    }

    /// Advance cursor by one byte
    pub fn advance(&mut self) {
        if self.pos < self.input.len() {
            self.pos += 1;
        }
    }

    /// Consume byte if it matches
    pub fn consume(&mut self, expected: u8) -> bool {
        if self.current() == Some(expected) {
            self.advance();
            true
        } else {
            false
        }
    }

    /// Consume `expected` if the remaining input starts with it
    pub fn consume_str(&mut self, expected: &str) -> bool {
        if self.rest_bytes().starts_with(expected.as_bytes()) {
            self.pos += expected.len();
            true
        } else {
            false
        }
    }

    /// Advance while `pred` holds
    pub fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.current().is_some_and(&pred) {
            self.advance();
        }
    }

    /// Move to the next occurrence of `byte`, or to the end
    pub fn skip_to(&mut self, byte: u8) -> bool {
        match self.rest_bytes().iter().position(|&b| b == byte) {
            Some(offset) => {
                self.pos += offset;
                true
            }
            None => {
                self.pos = self.input.len();
                false
            }
        }
    }

    pub const fn is_eof(&self) -> bool {
        self.pos >= self.input.len()
    }

    pub fn remaining(&self) -> &'a str {
        self.input.get(self.pos..).unwrap_or_default()
    }

    fn rest_bytes(&self) -> &'a [u8] {
        self.input.as_bytes().get(self.pos..).unwrap_or_default()
    }

    pub const fn pos(&self) -> usize {
        self.pos
    }

    /// Text from `start` to the current position
    pub fn slice_from(&self, start: usize) -> &'a str {
        self.input.get(start..self.pos).unwrap_or_default()
    }
}

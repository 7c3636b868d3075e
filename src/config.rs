//! Parse and stringify options

use crate::error::{Error, ErrorKind, Result};

/// Options shared by the parser and the serializer
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Config {
    /// Decode nested tags recursively. When off, parsing stops at the raw
    /// top-level matches.
    pub parse_children: bool,
    /// Collect attributes from opening tags
    pub get_attributes: bool,
    /// Escape `& < > "` when stringifying and decode entities when parsing
    pub escape_entities: bool,
    /// Maximum nesting depth (0 means unlimited)
    pub max_depth: u16,
    /// Maximum input size in bytes (0 means unlimited)
    pub max_size: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            parse_children: true,
            get_attributes: true,
            escape_entities: false,
            max_depth: 128,
            max_size: 10 * 1024 * 1024, // 10 MB default
        }
    }
}

impl Config {
    /// Default options without depth and size limits
    pub fn unlimited() -> Self {
        Self {
            max_depth: 0,
            max_size: 0,
            ..Self::default()
        }
    }

    pub const fn with_parse_children(mut self, parse_children: bool) -> Self {
        self.parse_children = parse_children;
        self
    }

    pub const fn with_attributes(mut self, get_attributes: bool) -> Self {
        self.get_attributes = get_attributes;
        self
    }

    pub const fn with_escape_entities(mut self, escape_entities: bool) -> Self {
        self.escape_entities = escape_entities;
        self
    }

    pub const fn with_limits(mut self, max_depth: u16, max_size: usize) -> Self {
        self.max_depth = max_depth;
        self.max_size = max_size;
        self
    }

    pub(crate) fn check_size(&self, len: usize) -> Result<()> {
        if self.max_size > 0 && len > self.max_size {
            return Err(Error::new(ErrorKind::MaxSizeExceeded { max: self.max_size }));
        }
        Ok(())
    }

    pub(crate) fn check_depth(&self, depth: u16) -> Result<()> {
        if self.max_depth > 0 && depth > self.max_depth {
            return Err(Error::new(ErrorKind::MaxDepthExceeded {
                max: self.max_depth,
            }));
        }
        Ok(())
    }
}

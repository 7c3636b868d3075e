//! xmlobj: a minimal XML dialect parser and serializer
//!
//! This crate provides functionality to:
//! - Parse XML text into a tree of leaf values and nested elements
//! - Serialize any `serde` object back into XML
//! - Validate XML without caring about the failure cause
//! - Convert between XML and JSON
//!
//! The dialect is small on purpose: every element holds either a single
//! text value or nested elements, plus optional flat attributes. There are
//! no namespaces, comments, CDATA sections or self-closing tags, and
//! sibling elements with the same name collapse to the last one.
//!
//! # Examples
//! ```
//! use xmlobj::{parse, stringify, Result};
//!
//! fn example() -> Result<()> {
//!     let tree = parse("<name lang=\"en\">John</name><age>30</age>")?;
//!     assert_eq!(tree["name"].value(), Some("John"));
//!
//!     let xml = stringify(&serde_json::json!({"age": 30}))?;
//!     assert_eq!(xml, "<age>30</age>");
//!     Ok(())
//! }
//! # example().unwrap();
//! ```

#![forbid(unsafe_code)]

use serde::Serialize;
use tracing::instrument;

pub mod config;
pub mod convert;
pub mod error;
pub mod value;
pub mod xml;

// Re-exports
pub use config::Config;
pub use convert::{
    json_to_xml, json_to_xml_with_config, xml_to_json, xml_to_json_pretty,
    xml_to_json_with_config,
};
pub use error::{Error, ErrorKind, Result};
pub use value::{Attributes, Composite, Leaf, Node, Parsed, RawMatch, Tree};
pub use xml::Parser;

/// Parse XML into a tree using the default options
pub fn parse(text: &str) -> Result<Tree> {
    Parser::default().parse_tree(text)
}

/// Parse XML with custom options
pub fn parse_with_config(text: &str, config: Config) -> Result<Parsed> {
    Parser::new(config).parse(text)
}

/// Parse only the top level, returning each tag with its untouched inner text
pub fn parse_raw(text: &str) -> Result<Vec<RawMatch>> {
    Parser::default().parse_raw(text)
}

/// Parse XML from bytes, which must be UTF-8
#[instrument(level = "debug", skip_all, fields(len = bytes.len()))]
pub fn parse_bytes(bytes: &[u8]) -> Result<Tree> {
    let text = std::str::from_utf8(bytes)
        .map_err(|e| Error::invalid_argument(format!("text is not valid utf-8: {e}")))?;
    parse(text)
}

/// Parse with the default options, returning `None` on any failure
pub fn validate(text: &str) -> Option<Parsed> {
    Parser::default().validate(text)
}

/// Whether `text` parses with the default options
pub fn is_valid(text: &str) -> bool {
    validate(text).is_some()
}

/// Serialize an object into XML
pub fn stringify<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    stringify_with_config(value, Config::default())
}

/// Serialize an object into XML with custom options. Only
/// `escape_entities` affects the output.
#[instrument(level = "debug", skip_all)]
pub fn stringify_with_config<T: Serialize + ?Sized>(value: &T, config: Config) -> Result<String> {
    let value = serde_json::to_value(value)?;
    xml::serialize(&value, &config)
}

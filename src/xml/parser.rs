//! Recursive XML decoding
//!
//! Each level is scanned into top-level tags. A tag's trimmed inner text is
//! parsed again as a level of its own: if that succeeds the tag becomes a
//! composite, otherwise its text becomes a leaf value.

use std::borrow::Cow;

use tracing::{debug, instrument, trace};

use crate::config::Config;
use crate::error::{Error, ErrorKind, Result};
use crate::value::{Attributes, Composite, Leaf, Node, Parsed, RawMatch, Tree};
use crate::xml::entities::unescape;
use crate::xml::scanner::{preprocess, scan, Scan, Tag};

/// XML parser
#[derive(Clone, Copy, Debug, Default)]
pub struct Parser {
    config: Config,
}

impl Parser {
    pub const fn new(config: Config) -> Self {
        Self { config }
    }

    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Parse according to the configuration: a decoded tree, or the raw
    /// top-level matches when `parse_children` is off
    #[instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn parse(&self, text: &str) -> Result<Parsed> {
        if self.config.parse_children {
            self.parse_tree(text).map(Parsed::Tree)
        } else {
            self.parse_raw(text).map(Parsed::Raw)
        }
    }

    /// Parse and decode every level
    #[instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn parse_tree(&self, text: &str) -> Result<Tree> {
        self.config.check_size(text.len())?;
        let tree = self.parse_level(text, 0)?;
        debug!(keys = tree.len(), "parsed tree");
        Ok(tree)
    }

    /// Parse the top level only, keeping each inner text as captured
    #[instrument(level = "debug", skip_all, fields(len = text.len()))]
    pub fn parse_raw(&self, text: &str) -> Result<Vec<RawMatch>> {
        self.config.check_size(text.len())?;
        let source = preprocess(text);
        let tags = checked_scan(&source)?;
        debug!(matches = tags.len(), "parsed raw matches");

        Ok(tags
            .into_iter()
            .map(|tag| RawMatch {
                tag: tag.name.to_string(),
                inner: tag.inner.to_string(),
            })
            .collect())
    }

    /// Like [`Parser::parse`], with every failure folded into `None`
    pub fn validate(&self, text: &str) -> Option<Parsed> {
        match self.parse(text) {
            Ok(parsed) => Some(parsed),
            Err(err) => {
                debug!(%err, "validation failed");
                None
            }
        }
    }

    /// `depth` counts the elements enclosing `text`
    fn parse_level(&self, text: &str, depth: u16) -> Result<Tree> {
        let source = preprocess(text);
        let tags = checked_scan(&source)?;
        let level = depth.saturating_add(1);
        self.config.check_depth(level)?;
        trace!(level, tags = tags.len(), "scanned level");

        let mut tree = Tree::new();
        for tag in &tags {
            let inner = tag.inner.trim();
            let node = match self.parse_level(inner, level) {
                Ok(children) => Node::Composite(Composite {
                    children,
                    attributes: self.composite_attributes(tag)?,
                }),
                Err(err) if err.is_limit() => return Err(err),
                Err(err) => {
                    trace!(tag = tag.name, %err, "decoding as leaf");
                    Node::Leaf(Leaf {
                        value: self.decode(inner)?.into_owned(),
                        attributes: self.attributes(tag)?,
                    })
                }
            };

            if tree.insert(tag.name, node).is_some() {
                trace!(tag = tag.name, "duplicate sibling replaced");
            }
        }

        Ok(tree)
    }

    fn attributes(&self, tag: &Tag<'_>) -> Result<Attributes> {
        let mut attributes = Attributes::new();
        if !self.config.get_attributes {
            return Ok(attributes);
        }

        for &(name, value) in &tag.attributes {
            attributes.insert(name.to_string(), self.decode(value)?.into_owned());
        }
        Ok(attributes)
    }

    /// Composites only carry attributes the tag actually declared
    fn composite_attributes(&self, tag: &Tag<'_>) -> Result<Option<Attributes>> {
        if !self.config.get_attributes || tag.attributes.is_empty() {
            return Ok(None);
        }
        self.attributes(tag).map(Some)
    }

    fn decode<'t>(&self, text: &'t str) -> Result<Cow<'t, str>> {
        if self.config.escape_entities {
            unescape(text)
        } else {
            Ok(Cow::Borrowed(text))
        }
    }
}

/// Scan a level and reject it when nothing matched or text is left over
fn checked_scan(source: &str) -> Result<Vec<Tag<'_>>> {
    let Scan { tags, leftover } = scan(source);

    if tags.is_empty() {
        return Err(Error::new(ErrorKind::NoKeys));
    }
    if !leftover.is_empty() {
        return Err(Error::new(ErrorKind::UnexpectedTokens { tokens: leftover }));
    }
    Ok(tags)
}

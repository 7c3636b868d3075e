//! Value tree produced by the XML parser

use indexmap::map::{IntoIter, Iter, Keys};
use indexmap::IndexMap;
use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;
use std::ops::Index;

/// Flat attribute list of an opening tag, in declaration order
pub type Attributes = IndexMap<String, String>;

/// A parsed element: either a scalar leaf or a level of child elements
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Node {
    Leaf(Leaf),
    Composite(Composite),
}

impl Node {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Self::Leaf(_))
    }

    pub fn is_composite(&self) -> bool {
        matches!(self, Self::Composite(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Self::Leaf(leaf) => Some(leaf),
            Self::Composite(_) => None,
        }
    }

    pub fn as_composite(&self) -> Option<&Composite> {
        match self {
            Self::Composite(composite) => Some(composite),
            Self::Leaf(_) => None,
        }
    }

    /// Text of a leaf, None for composites
    pub fn value(&self) -> Option<&str> {
        self.as_leaf().map(|leaf| leaf.value.as_str())
    }

    /// Attributes of the element. Composites only carry them when the
    /// opening tag declared at least one.
    pub fn attributes(&self) -> Option<&Attributes> {
        match self {
            Self::Leaf(leaf) => Some(&leaf.attributes),
            Self::Composite(composite) => composite.attributes.as_ref(),
        }
    }

    /// Child element by tag name
    pub fn get(&self, name: &str) -> Option<&Self> {
        self.as_composite().and_then(|c| c.children.get(name))
    }

    /// The node with attributes dropped: leaves become strings, composites
    /// become objects
    pub fn to_plain_json(&self) -> serde_json::Value {
        match self {
            Self::Leaf(leaf) => serde_json::Value::String(leaf.value.clone()),
            Self::Composite(composite) => composite.children.to_plain_json(),
        }
    }
}

/// Element holding a single text value
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
pub struct Leaf {
    pub value: String,
    pub attributes: Attributes,
}

impl Leaf {
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            attributes: Attributes::new(),
        }
    }

    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.insert(name.into(), value.into());
        self
    }
}

/// Element whose content is itself a sequence of elements
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Composite {
    pub children: Tree,
    pub attributes: Option<Attributes>,
}

impl Serialize for Composite {
    /// Attributes render as an `attributes` key among the children. A
    /// child of that name is replaced where it stands.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = self.children.len()
            + usize::from(self.attributes.is_some() && !self.children.contains_key("attributes"));
        let mut map = serializer.serialize_map(Some(len))?;
        let mut attributes_written = false;

        for (name, child) in &self.children {
            match &self.attributes {
                Some(attributes) if name == "attributes" => {
                    map.serialize_entry(name, attributes)?;
                    attributes_written = true;
                }
                _ => map.serialize_entry(name, child)?,
            }
        }

        if let (Some(attributes), false) = (&self.attributes, attributes_written) {
            map.serialize_entry("attributes", attributes)?;
        }
        map.end()
    }
}

/// One level of parsed elements keyed by tag name.
///
/// A later sibling with an already seen name replaces the earlier one and
/// keeps its position.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Tree(IndexMap<String, Node>);

impl Tree {
    pub fn new() -> Self {
        Self(IndexMap::new())
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, name: &str) -> Option<&Node> {
        self.0.get(name)
    }

    /// Inserts a node, returning the one it replaced
    pub fn insert(&mut self, name: impl Into<String>, node: Node) -> Option<Node> {
        self.0.insert(name.into(), node)
    }

    pub fn contains_key(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn keys(&self) -> Keys<'_, String, Node> {
        self.0.keys()
    }

    pub fn iter(&self) -> Iter<'_, String, Node> {
        self.0.iter()
    }

    pub fn to_plain_json(&self) -> serde_json::Value {
        self.0
            .iter()
            .map(|(name, node)| (name.clone(), node.to_plain_json()))
            .collect::<serde_json::Map<_, _>>()
            .into()
    }
}

impl Index<&str> for Tree {
    type Output = Node;

    #[allow(clippy::indexing_slicing)]
    fn index(&self, name: &str) -> &Self::Output {
        &self.0[name]
    }
}

impl<'a> IntoIterator for &'a Tree {
    type Item = (&'a String, &'a Node);
    type IntoIter = Iter<'a, String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl IntoIterator for Tree {
    type Item = (String, Node);
    type IntoIter = IntoIter<String, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<(String, Node)> for Tree {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        Self(IndexMap::from_iter(iter))
    }
}

/// A top-level tag capture that was not decoded any further
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawMatch {
    pub tag: String,
    /// Inner text exactly as captured, untrimmed
    pub inner: String,
}

impl Serialize for RawMatch {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(1))?;
        map.serialize_entry(&self.tag, &self.inner)?;
        map.end()
    }
}

/// Result of a configurable parse
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Parsed {
    Tree(Tree),
    Raw(Vec<RawMatch>),
}

impl Parsed {
    pub fn as_tree(&self) -> Option<&Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Raw(_) => None,
        }
    }

    pub fn as_raw(&self) -> Option<&[RawMatch]> {
        match self {
            Self::Raw(raw) => Some(raw),
            Self::Tree(_) => None,
        }
    }

    pub fn into_tree(self) -> Option<Tree> {
        match self {
            Self::Tree(tree) => Some(tree),
            Self::Raw(_) => None,
        }
    }
}

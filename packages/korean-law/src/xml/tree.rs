//! Generic attribute tree built from Open API XML responses.
//!
//! The API does not distinguish "one item" from "a list of one": a repeated
//! element becomes a list, a single occurrence stays a plain value. Callers
//! iterate through [`one_or_many`] so both shapes look the same.

use std::collections::BTreeMap;

use roxmltree::{Document, Node};

use crate::error::Result;

/// Key under which mixed text content of an element is stored.
pub const TEXT_KEY: &str = "#text";

/// Map of child element (or `@attribute`) names to values.
pub type AttrMap = BTreeMap<String, AttrValue>;

/// One node of the attribute tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttrValue {
    /// Leaf element text (trimmed).
    Text(String),
    /// Element with attributes or child elements.
    Map(AttrMap),
    /// Repeated sibling elements sharing one name, in document order.
    List(Vec<AttrValue>),
}

impl AttrValue {
    /// Look up a direct child by name.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        match self {
            Self::Map(map) => map.get(key),
            _ => None,
        }
    }

    /// Look up a descendant by a slash-separated path (e.g., `"기본정보/법령명_한글"`).
    ///
    /// # Examples
    /// ```
    /// use korean_law::xml::parse_xml;
    ///
    /// let tree = parse_xml("<법령><기본정보><법령명_한글>민법</법령명_한글></기본정보></법령>").unwrap();
    /// let name = tree.path("법령/기본정보/법령명_한글").map(|v| v.text());
    /// assert_eq!(name.as_deref(), Some("민법"));
    /// ```
    pub fn path(&self, path: &str) -> Option<&AttrValue> {
        path.split('/')
            .try_fold(self, |current, part| current.get(part))
    }

    /// Text content of this node.
    ///
    /// Maps yield their `#text` entry; lists join the text of their items
    /// with newlines.
    pub fn text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::Map(map) => map.get(TEXT_KEY).map(Self::text).unwrap_or_default(),
            Self::List(items) => items
                .iter()
                .map(Self::text)
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// Text of a direct child, or an empty string when absent.
    pub fn field(&self, key: &str) -> String {
        self.get(key).map(Self::text).unwrap_or_default()
    }

    /// Text of the first present, non-empty child among `keys`.
    pub fn first_field(&self, keys: &[&str]) -> String {
        keys.iter()
            .map(|key| self.field(key))
            .find(|text| !text.is_empty())
            .unwrap_or_default()
    }

    /// All text below this node, depth first, one entry per line.
    pub fn flatten_text(&self) -> String {
        let mut parts = Vec::new();
        collect_text(self, &mut parts);
        parts.join("\n")
    }

    /// Whether this node is a map (element with children or attributes).
    pub fn is_map(&self) -> bool {
        matches!(self, Self::Map(_))
    }
}

fn collect_text(value: &AttrValue, parts: &mut Vec<String>) {
    match value {
        AttrValue::Text(text) => {
            if !text.is_empty() {
                parts.push(text.clone());
            }
        }
        AttrValue::Map(map) => {
            for (key, child) in map {
                if !key.starts_with('@') {
                    collect_text(child, parts);
                }
            }
        }
        AttrValue::List(items) => {
            for item in items {
                collect_text(item, parts);
            }
        }
    }
}

/// Coerce an optional value to a sequence of exactly its cardinality.
///
/// `None` yields nothing, a list yields its items, anything else yields itself.
///
/// # Examples
/// ```
/// use korean_law::xml::{one_or_many, parse_xml};
///
/// let single = parse_xml("<r><항><항내용>a</항내용></항></r>").unwrap();
/// let many = parse_xml("<r><항/><항/></r>").unwrap();
/// assert_eq!(one_or_many(single.path("r/항")).len(), 1);
/// assert_eq!(one_or_many(many.path("r/항")).len(), 2);
/// assert_eq!(one_or_many(many.path("r/호")).len(), 0);
/// ```
pub fn one_or_many(value: Option<&AttrValue>) -> Vec<&AttrValue> {
    match value {
        None => Vec::new(),
        Some(AttrValue::List(items)) => items.iter().collect(),
        Some(other) => vec![other],
    }
}

/// Parse an XML document into an attribute tree.
///
/// The returned value is a map with a single entry: the root element name.
pub fn parse_xml(xml: &str) -> Result<AttrValue> {
    let doc = Document::parse(xml)?;
    let root = doc.root_element();
    let mut map = AttrMap::new();
    map.insert(tag_name(root).to_string(), convert_element(root));
    Ok(AttrValue::Map(map))
}

/// Get the tag name without namespace prefix.
fn tag_name<'a>(node: Node<'a, '_>) -> &'a str {
    node.tag_name().name()
}

fn convert_element(node: Node<'_, '_>) -> AttrValue {
    let mut map = AttrMap::new();

    for attr in node.attributes() {
        map.insert(
            format!("@{}", attr.name()),
            AttrValue::Text(attr.value().to_string()),
        );
    }

    let mut text = String::new();
    for child in node.children() {
        if child.is_element() {
            insert_child(&mut map, tag_name(child), convert_element(child));
        } else if child.is_text() {
            if let Some(t) = child.text() {
                text.push_str(t);
            }
        }
    }

    let text = text.trim();
    if map.is_empty() {
        return AttrValue::Text(text.to_string());
    }
    if !text.is_empty() {
        map.insert(TEXT_KEY.to_string(), AttrValue::Text(text.to_string()));
    }
    AttrValue::Map(map)
}

fn insert_child(map: &mut AttrMap, key: &str, value: AttrValue) {
    match map.remove(key) {
        None => {
            map.insert(key.to_string(), value);
        }
        Some(AttrValue::List(mut items)) => {
            items.push(value);
            map.insert(key.to_string(), AttrValue::List(items));
        }
        Some(existing) => {
            map.insert(key.to_string(), AttrValue::List(vec![existing, value]));
        }
    }
}

//! XML parsing into a generic attribute tree.

mod tree;

pub use tree::{one_or_many, parse_xml, AttrMap, AttrValue, TEXT_KEY};

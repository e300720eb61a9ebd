//! Import of legacy XML preference files
//!
//! Older preference files were XML documents where each element's attributes
//! held values and child elements held nested groups:
//!
//! ```xml
//! <preferences name="test">
//!     <geometry type="QRect" width="640"/>
//! </preferences>
//! ```
//!
//! The root element's content becomes the document itself (it is not wrapped
//! in a key named after the root tag). Attribute text goes through
//! [`parse_literal`], and children are stored under their tag name, with the
//! last of several same-named siblings winning.

use super::document::{is_reserved, Document};
use super::literal::parse_literal;

/// An element of a legacy file, detached from the XML parser
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LegacyNode {
    /// Tag name without namespace prefix
    pub tag: String,
    /// Attributes in document order
    pub attributes: Vec<(String, String)>,
    /// Child elements in document order
    pub children: Vec<LegacyNode>,
}

impl LegacyNode {
    /// Parse XML text and return its root element.
    ///
    /// Text, comments and processing instructions are ignored.
    pub fn parse(text: &str) -> Result<Self, roxmltree::Error> {
        let options = roxmltree::ParsingOptions {
            allow_dtd: true,
            ..Default::default()
        };
        let xml = roxmltree::Document::parse_with_options(text, options)?;
        Ok(Self::from_element(xml.root_element()))
    }

    fn from_element(node: roxmltree::Node<'_, '_>) -> Self {
        Self {
            tag: node.tag_name().name().to_string(),
            attributes: node
                .attributes()
                .map(|attr| (attr.name().to_string(), attr.value().to_string()))
                .collect(),
            children: node
                .children()
                .filter(|child| child.is_element())
                .map(Self::from_element)
                .collect(),
        }
    }

    /// Convert this node's content into a document
    pub fn to_document(&self) -> Document {
        let mut doc = Document::new();

        for (name, raw) in &self.attributes {
            if is_reserved(name) {
                tracing::warn!(
                    "Attribute '{}' on <{}> uses a reserved name and will not be saved",
                    name,
                    self.tag
                );
            }
            if let Err(err) = doc.insert(name.as_str(), parse_literal(raw)) {
                tracing::warn!("Skipping attribute '{}' on <{}>: {}", name, self.tag, err);
            }
        }

        for child in &self.children {
            if is_reserved(&child.tag) {
                tracing::warn!(
                    "Element <{}> in <{}> uses a reserved name and will not be saved",
                    child.tag,
                    self.tag
                );
            }
            if let Err(err) = doc.insert(child.tag.as_str(), child.to_document()) {
                tracing::warn!("Skipping element <{}> in <{}>: {}", child.tag, self.tag, err);
            }
        }

        doc
    }
}

/// Parse legacy XML text straight into a document
pub fn import_str(text: &str) -> Result<Document, roxmltree::Error> {
    let root = LegacyNode::parse(text)?;
    tracing::debug!(
        "Importing legacy preferences rooted at <{}> ({} attributes, {} children)",
        root.tag,
        root.attributes.len(),
        root.children.len()
    );
    Ok(root.to_document())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::value::Value;

    #[test]
    fn test_import_basic() {
        let doc = import_str(r#"<preferences name="test"><geometry type="QRect"/></preferences>"#).unwrap();
        assert_eq!(doc.get_str("name"), Some("test"));
        assert_eq!(doc.get_str("geometry.type"), Some("QRect"));
        assert!(doc.item("preferences").is_none());
    }

    #[test]
    fn test_attribute_literals() {
        let doc = import_str(
            r#"<prefs count="3" ratio="0.5" enabled="True" label="'quoted'" kind="int"/>"#,
        )
        .unwrap();
        assert_eq!(doc.get_i64("count"), Some(3));
        assert_eq!(doc.get_f64("ratio"), Some(0.5));
        assert_eq!(doc.get_bool("enabled"), Some(true));
        assert_eq!(doc.get_str("label"), Some("quoted"));
        assert_eq!(doc.get_str("kind"), Some("int"));
    }

    #[test]
    fn test_empty_root() {
        let doc = import_str("<preferences/>").unwrap();
        assert!(doc.is_empty());

        let doc = import_str("<preferences><empty/></preferences>").unwrap();
        assert!(doc.get_doc("empty").unwrap().is_empty());
    }

    #[test]
    fn test_last_sibling_wins() {
        let doc = import_str(r#"<p><item v="1"/><item v="2"/></p>"#).unwrap();
        assert_eq!(doc.get_i64("item.v"), Some(2));
        assert_eq!(doc.len(), 1);
    }

    #[test]
    fn test_child_overrides_attribute_of_same_name() {
        let doc = import_str(r#"<p window="1"><window w="5"/></p>"#).unwrap();
        assert_eq!(doc.get_i64("window.w"), Some(5));
    }

    #[test]
    fn test_deep_nesting_and_noise() {
        let xml = r#"<?xml version="1.0"?>
            <!-- saved by an old version -->
            <root>
                some text
                <a><b><c><d leaf="'x'"/></c></b></a>
            </root>"#;
        let doc = import_str(xml).unwrap();
        assert_eq!(doc.get("a.b.c.d.leaf"), Some(&Value::from("x")));
    }

    #[test]
    fn test_parse_node_tree() {
        let node = LegacyNode::parse(r#"<root a="1"><child/></root>"#).unwrap();
        assert_eq!(node.tag, "root");
        assert_eq!(node.attributes, vec![("a".to_string(), "1".to_string())]);
        assert_eq!(node.children.len(), 1);
        assert_eq!(node.children[0].tag, "child");
    }

    #[test]
    fn test_dotted_attribute_names_are_literal_keys() {
        let doc = import_str(r#"<preferences ui.theme="'dark'"/>"#).unwrap();
        assert_eq!(doc.keys().collect::<Vec<_>>(), vec!["ui.theme"]);
        assert_eq!(doc.item_or("ui.theme", &Value::Null), "dark");
    }

    #[test]
    fn test_reserved_names_are_kept_in_memory_only() {
        let doc = import_str(r#"<preferences _id="7" name="n"><_cache/></preferences>"#).unwrap();
        assert_eq!(doc.item("_id"), Some(&Value::Int(7)));
        assert!(doc.item("_cache").is_some());
        assert_eq!(doc.to_json_string().unwrap(), "{\n    \"name\": \"n\"\n}");
    }

    #[test]
    fn test_malformed_xml() {
        assert!(import_str("<root><unclosed></root>").is_err());
        assert!(import_str("not xml at all").is_err());
    }
}

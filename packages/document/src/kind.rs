//! # Component Kinds
//!
//! The catalog of node types the builder knows about. Every kind has a
//! total mapping to its default props and styles, so creating a node never
//! goes through an unchecked string lookup. Tags the catalog doesn't know
//! are preserved as [`ComponentKind::Custom`] with an empty default bag.

use crate::node::{Props, StyleValue, Styles};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fmt;

/// Kind of a node in the page tree
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ComponentKind {
    Body,
    Section,
    Div,
    Text,
    Image,
    Button,
    Container,
    Grid,
    List,
    Link,
    Form,
    /// Unknown tag carried through untouched
    Custom(String),
}

impl ComponentKind {
    /// Every built-in kind, in palette order
    pub const BUILTIN: [ComponentKind; 11] = [
        ComponentKind::Body,
        ComponentKind::Section,
        ComponentKind::Div,
        ComponentKind::Text,
        ComponentKind::Image,
        ComponentKind::Button,
        ComponentKind::Container,
        ComponentKind::Grid,
        ComponentKind::List,
        ComponentKind::Link,
        ComponentKind::Form,
    ];

    pub fn as_str(&self) -> &str {
        match self {
            ComponentKind::Body => "Body",
            ComponentKind::Section => "Section",
            ComponentKind::Div => "Div",
            ComponentKind::Text => "Text",
            ComponentKind::Image => "Image",
            ComponentKind::Button => "Button",
            ComponentKind::Container => "Container",
            ComponentKind::Grid => "Grid",
            ComponentKind::List => "List",
            ComponentKind::Link => "Link",
            ComponentKind::Form => "Form",
            ComponentKind::Custom(tag) => tag,
        }
    }

    pub fn is_body(&self) -> bool {
        matches!(self, ComponentKind::Body)
    }

    /// Default props for a freshly created node of this kind
    pub fn default_props(&self) -> Props {
        let value = match self {
            ComponentKind::Body | ComponentKind::Section | ComponentKind::Div => json!({}),
            ComponentKind::Container => json!({ "fluid": false }),
            ComponentKind::Text => json!({ "text": "Edit this text", "tag": "p" }),
            ComponentKind::Image => json!({ "src": "", "alt": "Image" }),
            ComponentKind::Button => json!({ "text": "Click me", "variant": "primary" }),
            ComponentKind::Grid => json!({ "columns": 2, "rows": 1 }),
            ComponentKind::List => json!({ "items": ["Item 1", "Item 2", "Item 3"], "ordered": false }),
            ComponentKind::Link => json!({ "text": "Link", "href": "#", "target": "_self" }),
            ComponentKind::Form => json!({
                "fields": [
                    { "name": "name", "label": "Name", "type": "text", "required": true },
                    { "name": "email", "label": "Email", "type": "email", "required": true },
                ],
                "submitText": "Submit",
                "action": "",
            }),
            ComponentKind::Custom(_) => json!({}),
        };

        match value {
            serde_json::Value::Object(map) => map,
            _ => Props::new(),
        }
    }

    /// Default styles for a freshly created node of this kind
    pub fn default_styles(&self) -> Styles {
        let pairs: Vec<(&str, StyleValue)> = match self {
            ComponentKind::Body => vec![
                ("margin", StyleValue::from(0_i64)),
                ("minHeight", StyleValue::text("100vh")),
                ("fontFamily", StyleValue::text("system-ui, sans-serif")),
            ],
            ComponentKind::Section => vec![
                ("padding", StyleValue::text("48px 24px")),
                ("width", StyleValue::text("100%")),
            ],
            ComponentKind::Div => vec![("padding", StyleValue::text("16px"))],
            ComponentKind::Container => vec![
                ("maxWidth", StyleValue::text("1200px")),
                ("margin", StyleValue::text("0 auto")),
                ("padding", StyleValue::text("0 16px")),
            ],
            ComponentKind::Text => vec![
                ("fontSize", StyleValue::text("16px")),
                ("lineHeight", StyleValue::from(1.5_f64)),
            ],
            ComponentKind::Image => vec![
                ("maxWidth", StyleValue::text("100%")),
                ("height", StyleValue::text("auto")),
            ],
            ComponentKind::Button => vec![
                ("padding", StyleValue::text("8px 16px")),
                ("borderRadius", StyleValue::text("4px")),
                ("cursor", StyleValue::text("pointer")),
            ],
            ComponentKind::Grid => vec![
                ("display", StyleValue::text("grid")),
                ("gridTemplateColumns", StyleValue::text("repeat(2, 1fr)")),
                ("gap", StyleValue::text("16px")),
            ],
            ComponentKind::List => vec![("paddingLeft", StyleValue::text("24px"))],
            ComponentKind::Link => vec![
                ("color", StyleValue::text("#3366ff")),
                ("textDecoration", StyleValue::text("underline")),
            ],
            ComponentKind::Form => vec![
                ("display", StyleValue::text("flex")),
                ("flexDirection", StyleValue::text("column")),
                ("gap", StyleValue::text("12px")),
            ],
            ComponentKind::Custom(_) => vec![],
        };

        pairs
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect()
    }
}

impl From<String> for ComponentKind {
    fn from(tag: String) -> Self {
        match tag.as_str() {
            "Body" => ComponentKind::Body,
            "Section" => ComponentKind::Section,
            "Div" => ComponentKind::Div,
            "Text" => ComponentKind::Text,
            "Image" => ComponentKind::Image,
            "Button" => ComponentKind::Button,
            "Container" => ComponentKind::Container,
            "Grid" => ComponentKind::Grid,
            "List" => ComponentKind::List,
            "Link" => ComponentKind::Link,
            "Form" => ComponentKind::Form,
            _ => ComponentKind::Custom(tag),
        }
    }
}

impl From<&str> for ComponentKind {
    fn from(tag: &str) -> Self {
        ComponentKind::from(tag.to_string())
    }
}

impl From<ComponentKind> for String {
    fn from(kind: ComponentKind) -> Self {
        match kind {
            ComponentKind::Custom(tag) => tag,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_round_trip_for_builtins() {
        for kind in ComponentKind::BUILTIN {
            assert_eq!(ComponentKind::from(kind.as_str()), kind);
        }
    }

    #[test]
    fn test_unknown_tag_is_custom() {
        let kind = ComponentKind::from("Carousel");
        assert_eq!(kind, ComponentKind::Custom("Carousel".to_string()));
        assert!(kind.default_props().is_empty());
        assert!(kind.default_styles().is_empty());
    }

    #[test]
    fn test_serializes_as_bare_tag() {
        let json = serde_json::to_string(&ComponentKind::Button).unwrap();
        assert_eq!(json, "\"Button\"");

        let kind: ComponentKind = serde_json::from_str("\"Hero\"").unwrap();
        assert_eq!(kind.as_str(), "Hero");
    }

    #[test]
    fn test_defaults_are_kind_specific() {
        assert_eq!(
            ComponentKind::Text.default_props().get("text"),
            Some(&json!("Edit this text"))
        );
        assert!(ComponentKind::Form.default_props().contains_key("fields"));
        assert_eq!(
            ComponentKind::Grid.default_styles().get("display"),
            Some(&StyleValue::text("grid"))
        );
    }
}

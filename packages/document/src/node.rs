use crate::kind::ComponentKind;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Component-specific configuration (text, src, href, form fields, ...)
pub type Props = serde_json::Map<String, serde_json::Value>;

/// Style properties keyed by CSS-ish property name
pub type Styles = BTreeMap<String, StyleValue>;

/// A style value is either a bare number or a string.
///
/// Numbers keep their JSON form, so `0` exports as `0` and `1.5` as `1.5`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StyleValue {
    Number(serde_json::Number),
    Text(String),
}

impl StyleValue {
    pub fn text(value: impl Into<String>) -> Self {
        StyleValue::Text(value.into())
    }
}

impl From<&str> for StyleValue {
    fn from(value: &str) -> Self {
        StyleValue::Text(value.to_string())
    }
}

impl From<i64> for StyleValue {
    fn from(value: i64) -> Self {
        StyleValue::Number(value.into())
    }
}

/// Non-finite floats have no JSON number form and fall back to text
impl From<f64> for StyleValue {
    fn from(value: f64) -> Self {
        serde_json::Number::from_f64(value)
            .map(StyleValue::Number)
            .unwrap_or_else(|| StyleValue::Text(value.to_string()))
    }
}

/// Editor-side annotations on a node.
///
/// Every field is optional so the same shape doubles as a partial update:
/// fields that are `Some` overwrite, `None` leaves the current value alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,

    /// Tree-view hint
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collapsed: Option<bool>,

    /// Inline editor toggle
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub edit_mode: Option<bool>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i64>,
}

impl NodeMetadata {
    /// Shallow-merge `patch` into `self`
    pub fn merge(&mut self, patch: &NodeMetadata) {
        if let Some(name) = &patch.name {
            self.name = Some(name.clone());
        }
        if let Some(locked) = patch.locked {
            self.locked = Some(locked);
        }
        if let Some(collapsed) = patch.collapsed {
            self.collapsed = Some(collapsed);
        }
        if let Some(edit_mode) = patch.edit_mode {
            self.edit_mode = Some(edit_mode);
        }
        if let Some(z_index) = patch.z_index {
            self.z_index = Some(z_index);
        }
    }

    /// True when the patch only touches tree-view / inline-editor hints
    pub fn is_cosmetic(&self) -> bool {
        self.name.is_none() && self.locked.is_none() && self.z_index.is_none()
    }

    /// True when the patch touches nothing except `locked` and cosmetic hints
    pub fn only_lock_or_cosmetic(&self) -> bool {
        self.name.is_none() && self.z_index.is_none()
    }

    pub fn is_empty(&self) -> bool {
        self == &NodeMetadata::default()
    }
}

/// One element of a page's component tree
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    pub id: String,

    #[serde(rename = "type")]
    pub kind: ComponentKind,

    #[serde(default)]
    pub props: Props,

    #[serde(default)]
    pub styles: Styles,

    /// Ordered children; siblings render first to last
    #[serde(default)]
    pub children: Vec<Arc<Node>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<NodeMetadata>,
}

impl Node {
    /// Create a node of `kind` with that kind's default props and styles
    pub fn new(id: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            id: id.into(),
            props: kind.default_props(),
            styles: kind.default_styles(),
            kind,
            children: Vec::new(),
            metadata: None,
        }
    }

    /// Builder-style child append
    pub fn with_child(mut self, child: Node) -> Self {
        self.children.push(Arc::new(child));
        self
    }

    pub fn with_metadata(mut self, metadata: NodeMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_body(&self) -> bool {
        self.kind.is_body()
    }

    /// The Body is never locked, whatever its metadata says
    pub fn is_locked(&self) -> bool {
        !self.is_body()
            && self
                .metadata
                .as_ref()
                .and_then(|m| m.locked)
                .unwrap_or(false)
    }

    /// User-facing label: explicit name, falling back to the kind tag
    pub fn display_name(&self) -> &str {
        self.metadata
            .as_ref()
            .and_then(|m| m.name.as_deref())
            .unwrap_or_else(|| self.kind.as_str())
    }

    /// Merge `patch` into this node's metadata, creating it on first use
    pub fn merge_metadata(&mut self, patch: &NodeMetadata) {
        self.metadata
            .get_or_insert_with(NodeMetadata::default)
            .merge(patch);
    }
}

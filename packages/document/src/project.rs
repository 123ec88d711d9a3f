use crate::id_generator::IdGenerator;
use crate::kind::ComponentKind;
use crate::node::Node;
use crate::page::Page;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Deployment bookkeeping and anything else other tools attach.
    /// Carried verbatim, never interpreted here.
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Ordered collection of pages; the unit of save, load and undo
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: String,
    pub name: String,
    pub pages: Vec<Page>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ProjectMetadata>,
}

impl Project {
    /// Project with a single empty "Home" page
    pub fn blank(name: impl Into<String>, ids: &mut IdGenerator) -> Self {
        let mut home = Page::new(ids.new_id("page"), "Home", "home");
        home.set_order(0);

        Self::with_pages(ids.new_id("project"), name, vec![home])
    }

    /// Starter project: a Home page with a hero section
    pub fn from_template(name: impl Into<String>, ids: &mut IdGenerator) -> Self {
        let mut heading = Node::new(ids.new_id("text"), ComponentKind::Text);
        heading.props.insert("text".to_string(), json!("Welcome to your new site"));
        heading.props.insert("tag".to_string(), json!("h1"));

        let cta = Node::new(ids.new_id("button"), ComponentKind::Button);

        let hero = Node::new(ids.new_id("section"), ComponentKind::Section)
            .with_child(heading)
            .with_child(cta);
        let body = Node::new(ids.new_id("body"), ComponentKind::Body).with_child(hero);

        let mut home = Page::new(ids.new_id("page"), "Home", "home").with_root(body);
        home.set_order(0);

        Self::with_pages(ids.new_id("project"), name, vec![home])
    }

    fn with_pages(id: String, name: impl Into<String>, pages: Vec<Page>) -> Self {
        let now = Utc::now();
        Self {
            id,
            name: name.into(),
            pages,
            metadata: Some(ProjectMetadata {
                created_at: Some(now),
                updated_at: Some(now),
                ..Default::default()
            }),
        }
    }

    pub fn page(&self, id: &str) -> Option<&Page> {
        self.pages.iter().find(|p| p.id == id)
    }

    pub fn page_mut(&mut self, id: &str) -> Option<&mut Page> {
        self.pages.iter_mut().find(|p| p.id == id)
    }

    pub fn page_index(&self, id: &str) -> Option<usize> {
        self.pages.iter().position(|p| p.id == id)
    }

    pub fn page_by_slug(&self, slug: &str) -> Option<&Page> {
        let slug = slug.trim_start_matches('/');
        self.pages.iter().find(|p| p.slug == slug)
    }

    /// Slugs of every page except `except_id`
    pub fn slugs_except<'a>(&'a self, except_id: Option<&'a str>) -> impl Iterator<Item = &'a str> + 'a {
        self.pages
            .iter()
            .filter(move |p| Some(p.id.as_str()) != except_id)
            .map(|p| p.slug.as_str())
    }

    /// Stamp `updatedAt`
    pub fn touch(&mut self) {
        self.metadata
            .get_or_insert_with(ProjectMetadata::default)
            .updated_at = Some(Utc::now());
    }
}

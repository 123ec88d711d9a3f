//! # Page Management
//!
//! Add, delete, duplicate, reorder and rename pages. Like tree mutations,
//! each operation reads a project and returns a new one; the caller decides
//! whether to commit it.
//!
//! Every operation leaves `metadata.order` equal to the page's position
//! and keeps slugs unique within the project.

use pagecraft_document::{slugify, tree, unique_slug, IdGenerator, Page, PageMetadata, Project};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum PageError {
    #[error("Page not found: {0}")]
    PageNotFound(String),

    #[error("Cannot delete the last page")]
    LastPage,

    #[error("Page index out of range: {from} -> {to} (have {len})")]
    IndexOutOfRange { from: usize, to: usize, len: usize },
}

/// Outcome of a page operation
#[derive(Debug, Clone)]
pub struct PageEdit {
    pub project: Project,

    /// Page that should become active, if any
    pub activate: Option<String>,
}

/// Append a page with an empty tree.
///
/// The slug is derived from `name` when not given; either way it is
/// disambiguated against every existing slug.
pub fn add_page(
    project: &Project,
    name: &str,
    slug: Option<&str>,
    ids: &mut IdGenerator,
) -> Result<PageEdit, PageError> {
    let base = slugify(slug.unwrap_or(name));
    let slug = unique_slug(&base, project.slugs_except(None));

    let page = Page::new(ids.new_id("page"), name, slug);
    let page_id = page.id.clone();

    let mut next = project.clone();
    next.pages.push(page);
    renumber(&mut next.pages);

    Ok(PageEdit {
        project: next,
        activate: Some(page_id),
    })
}

/// Remove a page; the last remaining page can't be deleted
pub fn delete_page(project: &Project, page_id: &str) -> Result<PageEdit, PageError> {
    let index = project
        .page_index(page_id)
        .ok_or_else(|| PageError::PageNotFound(page_id.to_string()))?;
    if project.pages.len() == 1 {
        return Err(PageError::LastPage);
    }

    let mut next = project.clone();
    next.pages.remove(index);
    renumber(&mut next.pages);

    Ok(PageEdit {
        project: next,
        activate: None,
    })
}

/// Copy a page right after the original, with fresh ids throughout and a
/// `-copy` slug
pub fn duplicate_page(
    project: &Project,
    page_id: &str,
    ids: &mut IdGenerator,
) -> Result<PageEdit, PageError> {
    let index = project
        .page_index(page_id)
        .ok_or_else(|| PageError::PageNotFound(page_id.to_string()))?;
    let source = &project.pages[index];

    let slug = unique_slug(&format!("{}-copy", source.slug), project.slugs_except(None));
    let copy = Page {
        id: ids.new_id("page"),
        name: format!("{} (Copy)", source.name),
        slug,
        tree: source
            .tree
            .iter()
            .map(|root| Arc::new(tree::regenerate_ids(root, ids)))
            .collect(),
        metadata: source.metadata.clone(),
    };

    let mut next = project.clone();
    next.pages.insert(index + 1, copy);
    renumber(&mut next.pages);

    Ok(PageEdit {
        project: next,
        activate: None,
    })
}

/// Move the page at `from` to position `to`
pub fn reorder_pages(project: &Project, from: usize, to: usize) -> Result<PageEdit, PageError> {
    let len = project.pages.len();
    if from >= len || to >= len {
        return Err(PageError::IndexOutOfRange { from, to, len });
    }

    let mut next = project.clone();
    let page = next.pages.remove(from);
    next.pages.insert(to, page);
    renumber(&mut next.pages);

    Ok(PageEdit {
        project: next,
        activate: None,
    })
}

/// Rename a page and optionally give it a new slug.
///
/// A new slug only has to be unique among the *other* pages, so a page may
/// keep its current slug.
pub fn rename_page(
    project: &Project,
    page_id: &str,
    name: &str,
    slug: Option<&str>,
) -> Result<PageEdit, PageError> {
    let index = project
        .page_index(page_id)
        .ok_or_else(|| PageError::PageNotFound(page_id.to_string()))?;

    let new_slug = slug.map(|s| unique_slug(&slugify(s), project.slugs_except(Some(page_id))));

    let mut next = project.clone();
    let page = &mut next.pages[index];
    page.name = name.to_string();
    if let Some(new_slug) = new_slug {
        page.slug = new_slug;
    }

    Ok(PageEdit {
        project: next,
        activate: None,
    })
}

/// Merge description / thumbnail; `order` is owned by the page list
pub fn update_page_metadata(
    project: &Project,
    page_id: &str,
    patch: &PageMetadata,
) -> Result<PageEdit, PageError> {
    let mut next = project.clone();
    let page = next
        .page_mut(page_id)
        .ok_or_else(|| PageError::PageNotFound(page_id.to_string()))?;

    let metadata = page.metadata.get_or_insert_with(PageMetadata::default);
    if let Some(description) = &patch.description {
        metadata.description = Some(description.clone());
    }
    if let Some(thumbnail) = &patch.thumbnail {
        metadata.thumbnail = Some(thumbnail.clone());
    }

    Ok(PageEdit {
        project: next,
        activate: None,
    })
}

fn renumber(pages: &mut [Page]) {
    for (order, page) in pages.iter_mut().enumerate() {
        page.set_order(order);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    fn project() -> Project {
        let mut ids = IdGenerator::sequential("p");
        Project::from_template("Site", &mut ids)
    }

    fn slugs(project: &Project) -> Vec<&str> {
        project.pages.iter().map(|p| p.slug.as_str()).collect()
    }

    fn assert_unique_slugs(project: &Project) {
        let set: HashSet<&str> = project.pages.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(set.len(), project.pages.len());
    }

    #[test]
    fn test_add_page_derives_slug() {
        let mut ids = IdGenerator::sequential("a");
        let edit = add_page(&project(), "About Us", None, &mut ids).unwrap();

        assert_eq!(slugs(&edit.project), vec!["home", "about-us"]);
        assert!(edit.project.pages[1].tree.is_empty());
        assert_eq!(edit.activate.as_deref(), Some(edit.project.pages[1].id.as_str()));
    }

    #[test]
    fn test_add_page_disambiguates() {
        let mut ids = IdGenerator::sequential("a");
        let first = add_page(&project(), "Home", None, &mut ids).unwrap();
        let second = add_page(&first.project, "Home", None, &mut ids).unwrap();

        assert_eq!(slugs(&second.project), vec!["home", "home-1", "home-2"]);
        assert_unique_slugs(&second.project);
    }

    #[test]
    fn test_add_page_with_explicit_slug() {
        let mut ids = IdGenerator::sequential("a");
        let edit = add_page(&project(), "Contact", Some("/Get In Touch"), &mut ids).unwrap();
        assert_eq!(edit.project.pages[1].slug, "get-in-touch");
        assert_eq!(edit.project.pages[1].route(), "/get-in-touch");
    }

    #[test]
    fn test_delete_last_page_rejected() {
        let project = project();
        let id = project.pages[0].id.clone();
        assert_eq!(delete_page(&project, &id).unwrap_err(), PageError::LastPage);
    }

    #[test]
    fn test_delete_page_renumbers() {
        let mut ids = IdGenerator::sequential("a");
        let edit = add_page(&project(), "A", None, &mut ids).unwrap();
        let edit = add_page(&edit.project, "B", None, &mut ids).unwrap();
        let a_id = edit.project.pages[1].id.clone();

        let edit = delete_page(&edit.project, &a_id).unwrap();

        assert_eq!(slugs(&edit.project), vec!["home", "b"]);
        assert_eq!(edit.project.pages[1].order(), Some(1));
    }

    #[test]
    fn test_duplicate_page() {
        let mut ids = IdGenerator::sequential("d");
        let source = project();
        let home_id = source.pages[0].id.clone();

        let once = duplicate_page(&source, &home_id, &mut ids).unwrap();
        let twice = duplicate_page(&once.project, &home_id, &mut ids).unwrap();

        assert_eq!(slugs(&twice.project), vec!["home", "home-copy-1", "home-copy"]);
        assert_eq!(twice.project.pages[1].name, "Home (Copy)");
        assert_unique_slugs(&twice.project);

        let original = twice.project.pages[0].body().unwrap();
        let copy = twice.project.pages[1].body().unwrap();
        assert_ne!(original.id, copy.id);
        assert!(tree::same_shape(original, copy));

        let mut original_ids = HashSet::new();
        tree::walk(&twice.project.pages[0].tree, &mut |n, _| {
            original_ids.insert(n.id.clone());
        });
        tree::walk(&twice.project.pages[1].tree, &mut |n, _| {
            assert!(!original_ids.contains(&n.id));
        });
    }

    #[test]
    fn test_reorder_pages() {
        let mut ids = IdGenerator::sequential("a");
        let edit = add_page(&project(), "A", None, &mut ids).unwrap();
        let edit = add_page(&edit.project, "B", None, &mut ids).unwrap();

        let edit = reorder_pages(&edit.project, 2, 0).unwrap();

        assert_eq!(slugs(&edit.project), vec!["b", "home", "a"]);
        for (i, page) in edit.project.pages.iter().enumerate() {
            assert_eq!(page.order(), Some(i));
        }
    }

    #[test]
    fn test_reorder_out_of_range() {
        assert!(matches!(
            reorder_pages(&project(), 0, 3),
            Err(PageError::IndexOutOfRange { .. })
        ));
    }

    #[test]
    fn test_rename_page_may_keep_own_slug() {
        let project = project();
        let id = project.pages[0].id.clone();

        let edit = rename_page(&project, &id, "Start", Some("home")).unwrap();

        assert_eq!(edit.project.pages[0].name, "Start");
        assert_eq!(edit.project.pages[0].slug, "home");
    }

    #[test]
    fn test_rename_page_slug_collision() {
        let mut ids = IdGenerator::sequential("a");
        let edit = add_page(&project(), "About", None, &mut ids).unwrap();
        let about_id = edit.project.pages[1].id.clone();

        let edit = rename_page(&edit.project, &about_id, "Home 2", Some("home")).unwrap();

        assert_eq!(edit.project.pages[1].slug, "home-1");
        assert_unique_slugs(&edit.project);
    }

    #[test]
    fn test_update_page_metadata_keeps_order() {
        let project = project();
        let id = project.pages[0].id.clone();
        let patch = PageMetadata {
            description: Some("Landing".to_string()),
            order: Some(9),
            ..Default::default()
        };

        let edit = update_page_metadata(&project, &id, &patch).unwrap();
        let metadata = edit.project.pages[0].metadata.as_ref().unwrap();

        assert_eq!(metadata.description.as_deref(), Some("Landing"));
        assert_eq!(metadata.order, Some(0));
    }

    #[test]
    fn test_duplicate_page_with_empty_tree() {
        let mut ids = IdGenerator::sequential("a");
        let edit = add_page(&project(), "Blank", None, &mut ids).unwrap();
        let blank_id = edit.project.pages[1].id.clone();

        let edit = duplicate_page(&edit.project, &blank_id, &mut ids).unwrap();

        assert!(edit.project.pages[2].tree.is_empty());
        assert_eq!(edit.project.pages[2].slug, "blank-copy");
    }
}

//! Import / export of whole project documents

use pagecraft_document::{ComponentKind, ImportError, Project, StyleValue};
use serde_json::json;

fn document(pages: serde_json::Value) -> String {
    json!({
        "id": "project-1",
        "name": "Site",
        "pages": pages,
        "metadata": {
            "createdAt": "2024-01-01T00:00:00Z",
            "deployment": { "url": "https://example.test", "status": "live" }
        }
    })
    .to_string()
}

fn body(id: &str, children: serde_json::Value) -> serde_json::Value {
    json!({ "id": id, "type": "Body", "props": {}, "styles": {}, "children": children })
}

#[test]
fn test_multi_page_import() -> anyhow::Result<()> {
    let source = document(json!([
        { "id": "p1", "name": "Home", "slug": "home", "tree": [body("b1", json!([
            { "id": "t1", "type": "Text", "props": { "text": "Hello" }, "styles": { "fontSize": 24, "color": "#333" } }
        ]))] },
        { "id": "p2", "name": "About", "slug": "about", "tree": [] }
    ]));

    let project = Project::from_json(&source)?;

    assert_eq!(project.pages.len(), 2);
    assert!(project.pages[1].tree.is_empty());

    let text = project.pages[0].find_node("t1").unwrap();
    assert!(text.children.is_empty());
    assert_eq!(text.styles["fontSize"], StyleValue::from(24_i64));
    assert_eq!(text.styles["color"], StyleValue::text("#333"));
    Ok(())
}

#[test]
fn test_missing_node_fields_default_to_empty() -> anyhow::Result<()> {
    let source = document(json!([
        { "id": "p1", "name": "Home", "slug": "home", "tree": [{ "id": "b1", "type": "Body" }] }
    ]));

    let project = Project::from_json(&source)?;
    let root = project.pages[0].body().unwrap();

    assert!(root.props.is_empty());
    assert!(root.styles.is_empty());
    assert!(root.children.is_empty());
    Ok(())
}

#[test]
fn test_custom_kinds_survive_round_trip() -> anyhow::Result<()> {
    let source = document(json!([
        { "id": "p1", "name": "Home", "slug": "home", "tree": [body("b1", json!([
            { "id": "c1", "type": "PricingTable", "props": { "tiers": 3 } }
        ]))] }
    ]));

    let project = Project::from_json(&source)?;
    let node = project.pages[0].find_node("c1").unwrap();
    assert_eq!(node.kind, ComponentKind::Custom("PricingTable".to_string()));

    let reloaded = Project::from_json(&project.to_json()?)?;
    assert_eq!(reloaded, project);
    Ok(())
}

#[test]
fn test_unknown_metadata_is_carried() -> anyhow::Result<()> {
    let source = document(json!([{ "id": "p1", "name": "Home", "slug": "home", "tree": [] }]));

    let project = Project::from_json(&source)?;
    let exported: serde_json::Value = serde_json::from_str(&project.to_json_pretty()?)?;

    assert_eq!(exported["metadata"]["deployment"]["status"], "live");
    assert_eq!(exported["pages"][0]["slug"], "home");
    Ok(())
}

#[test]
fn test_structural_violations() {
    let cases = vec![
        (
            "two roots",
            json!([{ "id": "p1", "name": "Home", "slug": "home", "tree": [body("b1", json!([])), body("b2", json!([]))] }]),
        ),
        (
            "nested body",
            json!([{ "id": "p1", "name": "Home", "slug": "home", "tree": [body("b1", json!([body("b2", json!([]))]))] }]),
        ),
        (
            "duplicate slug",
            json!([
                { "id": "p1", "name": "Home", "slug": "home", "tree": [] },
                { "id": "p2", "name": "Home", "slug": "home", "tree": [] }
            ]),
        ),
        (
            "node id shared across pages",
            json!([
                { "id": "p1", "name": "A", "slug": "a", "tree": [body("b1", json!([]))] },
                { "id": "p2", "name": "B", "slug": "b", "tree": [body("b1", json!([]))] }
            ]),
        ),
        ("no pages", json!([])),
        ("page without name", json!([{ "id": "p1", "slug": "home", "tree": [] }])),
    ];

    for (label, pages) in cases {
        let err = Project::from_json(&document(pages)).unwrap_err();
        assert!(
            matches!(err, ImportError::Structure(_)),
            "{}: expected a structure error, got {:?}",
            label,
            err
        );
    }
}

#[test]
fn test_missing_slugs_are_unique() -> anyhow::Result<()> {
    let source = document(json!([
        { "id": "p1", "name": "Home", "tree": [] },
        { "id": "p2", "name": "Home", "tree": [] },
        { "id": "p3", "name": "Home", "slug": "home", "tree": [] }
    ]));

    let project = Project::from_json(&source)?;
    let slugs: Vec<&str> = project.pages.iter().map(|p| p.slug.as_str()).collect();

    assert_eq!(slugs, vec!["home-1", "home-2", "home"]);
    Ok(())
}

#[test]
fn test_not_json_at_all() {
    assert!(matches!(
        Project::from_json("<html></html>"),
        Err(ImportError::Malformed(_))
    ));
}

use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_document::{tree as nodes, Page};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct TreeArgs {
    /// Project file
    pub input: PathBuf,

    /// Page slug (defaults to the first page)
    #[arg(short, long)]
    pub page: Option<String>,
}

pub fn tree(args: TreeArgs, cwd: &Path) -> Result<()> {
    let path = super::resolve(cwd, &args.input);
    let project = super::load_project(&path)?;

    let page = match &args.page {
        Some(slug) => project
            .page_by_slug(slug)
            .ok_or_else(|| anyhow!("No page with slug {}", slug))?,
        None => project
            .pages
            .first()
            .ok_or_else(|| anyhow!("Project has no pages"))?,
    };

    println!("{} {}", page.name.bold(), page.route().dimmed());
    for line in render(page) {
        println!("{}", line);
    }

    Ok(())
}

/// One line per node, indented by depth
fn render(page: &Page) -> Vec<String> {
    if page.tree.is_empty() {
        return vec!["  (empty)".to_string()];
    }

    let mut lines = Vec::new();
    nodes::walk(&page.tree, &mut |node, depth| {
        let mut line = format!("{}{} ({})", "  ".repeat(depth + 1), node.display_name(), node.id);
        if node.display_name() != node.kind.as_str() {
            line.push_str(&format!(" <{}>", node.kind));
        }
        if node.is_locked() {
            line.push_str(" [locked]");
        }
        lines.push(line);
    });
    lines
}

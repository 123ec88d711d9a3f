use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_document::{tree, Project};
use serde::Serialize;
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct PagesArgs {
    /// Project file
    pub input: PathBuf,

    /// Output format (text, json)
    #[arg(short, long, default_value = "text")]
    pub format: String,
}

#[derive(Debug, Serialize, PartialEq)]
struct PageSummary<'a> {
    id: &'a str,
    name: &'a str,
    route: String,
    nodes: usize,
}

pub fn pages(args: PagesArgs, cwd: &Path) -> Result<()> {
    let path = super::resolve(cwd, &args.input);
    let project = super::load_project(&path)?;
    let summaries = summarize(&project);

    match args.format.as_str() {
        "json" => println!("{}", serde_json::to_string_pretty(&summaries)?),
        "text" => {
            println!("{} {}", "📄".bold(), project.name.bold());
            for (index, page) in summaries.iter().enumerate() {
                println!(
                    "   {}. {} {} {}",
                    index + 1,
                    page.name,
                    page.route.cyan(),
                    format!("({} nodes)", page.nodes).dimmed()
                );
            }
        }
        other => return Err(anyhow::anyhow!("Unknown format: {}. Use: text or json", other)),
    }

    Ok(())
}

fn summarize(project: &Project) -> Vec<PageSummary<'_>> {
    project
        .pages
        .iter()
        .map(|page| PageSummary {
            id: &page.id,
            name: &page.name,
            route: page.route(),
            nodes: tree::count_nodes(&page.tree),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_document::{IdGenerator, Page};

    #[test]
    fn test_summarize_in_page_order() {
        let mut ids = IdGenerator::sequential("p");
        let mut project = Project::from_template("Site", &mut ids);
        project.pages.push(Page::new("about", "About", "about"));

        let summaries = summarize(&project);

        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].route, "/home");
        assert_eq!(summaries[0].nodes, 4);
        assert_eq!(
            summaries[1],
            PageSummary {
                id: "about",
                name: "About",
                route: "/about".to_string(),
                nodes: 0,
            }
        );
    }
}

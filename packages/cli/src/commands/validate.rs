use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_document::{tree, ImportError, Project};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct ValidateArgs {
    /// Project file to check
    pub input: PathBuf,
}

pub fn validate(args: ValidateArgs, cwd: &Path) -> Result<()> {
    let path = super::resolve(cwd, &args.input);
    println!("🔍 {} {}", "Validating".green().bold(), path.display());

    let source = std::fs::read_to_string(&path)?;
    match Project::from_json(&source) {
        Ok(project) => {
            println!("   {} {}", "✓".green(), summary(&project));
            Ok(())
        }
        Err(err) => {
            let kind = match &err {
                ImportError::Malformed(_) => "Not a JSON document",
                ImportError::Structure(_) => "Not a valid project",
            };
            println!("   {} {}", "✗".red(), kind);
            Err(err.into())
        }
    }
}

fn summary(project: &Project) -> String {
    let nodes: usize = project
        .pages
        .iter()
        .map(|page| tree::count_nodes(&page.tree))
        .sum();

    format!(
        "{}: {} page(s), {} node(s)",
        project.name,
        project.pages.len(),
        nodes
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use pagecraft_document::IdGenerator;

    #[test]
    fn test_summary_counts_all_pages() {
        let mut ids = IdGenerator::sequential("v");
        let mut project = Project::from_template("Site", &mut ids);
        let copy = project.pages[0].clone();
        project.pages.push(copy);

        assert_eq!(summary(&project), "Site: 2 page(s), 8 node(s)");
    }

    #[test]
    fn test_invalid_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("bad.json"), r#"{ "id": "p", "name": "x", "pages": [] }"#)
            .unwrap();

        let args = ValidateArgs {
            input: PathBuf::from("bad.json"),
        };

        assert!(validate(args, dir.path()).is_err());
    }
}

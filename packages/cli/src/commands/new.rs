use anyhow::Result;
use clap::Args;
use colored::Colorize;
use pagecraft_document::slugify;
use pagecraft_editor::{BuilderStore, EditorConfig, JsonFileSink, DEFAULT_CONFIG_NAME};
use std::path::{Path, PathBuf};

#[derive(Debug, Args)]
pub struct NewArgs {
    /// Project name
    pub name: String,

    /// Output file (defaults to <name>.json)
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Start with an empty page instead of the starter template
    #[arg(short, long)]
    pub blank: bool,

    /// Force overwrite an existing file
    #[arg(short, long)]
    pub force: bool,
}

pub fn new(args: NewArgs, cwd: &Path) -> Result<()> {
    let config = EditorConfig::load(cwd)?;
    let output = match &args.output {
        Some(path) => super::resolve(cwd, path),
        None => cwd.join(format!("{}.json", slugify(&args.name))),
    };

    if output.exists() && !args.force {
        println!(
            "{} {} already exists",
            "⚠️".yellow(),
            output.display().to_string().bright_white()
        );
        println!("Use --force to overwrite");
        return Ok(());
    }

    println!(
        "{}",
        format!("📝 Creating project {}...", args.name).bright_blue().bold()
    );
    if cwd.join(DEFAULT_CONFIG_NAME).exists() {
        println!("  {} Using {}", "✓".green(), DEFAULT_CONFIG_NAME);
    }

    let store = if args.blank {
        BuilderStore::blank(&args.name, config)
    } else {
        BuilderStore::with_template(&args.name, config)
    };

    let result = store.save_with(&JsonFileSink::new(&output));
    if !result.success {
        return Err(anyhow::anyhow!(
            "Failed to write {}: {}",
            output.display(),
            result.message.unwrap_or_default()
        ));
    }

    let project = store.project();
    println!("  {} Created {}", "✓".green(), output.display());
    println!();
    println!("{}", "✅ Project created!".green().bold());
    println!();
    println!("   Pages: {}", project.pages.len());
    println!("   Next: pagecraft tree {}", output.display());

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_uses_configured_page_name() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(DEFAULT_CONFIG_NAME),
            r#"{ "defaultPageName": "Landing Page" }"#,
        )
        .unwrap();
        let args = NewArgs {
            name: "Site".to_string(),
            output: Some(PathBuf::from("out/site.json")),
            blank: true,
            force: false,
        };

        new(args, dir.path()).unwrap();

        let project = JsonFileSink::load(dir.path().join("out/site.json")).unwrap();
        assert_eq!(project.pages[0].name, "Landing Page");
        assert_eq!(project.pages[0].slug, "landing-page");
        assert!(project.pages[0].tree.is_empty());
    }

    #[test]
    fn test_new_writes_loadable_project() {
        let dir = tempfile::tempdir().unwrap();
        let args = NewArgs {
            name: "My Site".to_string(),
            output: None,
            blank: false,
            force: false,
        };

        new(args, dir.path()).unwrap();

        let project = JsonFileSink::load(dir.path().join("my-site.json")).unwrap();
        assert_eq!(project.name, "My Site");
        assert!(project.pages[0].body().is_some());
    }
}

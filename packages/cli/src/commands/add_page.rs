use anyhow::{anyhow, Result};
use clap::Args;
use colored::Colorize;
use pagecraft_editor::{BuilderStore, EditorConfig, JsonFileSink};
use std::path::{Path, PathBuf};

#[derive(Args, Debug)]
pub struct AddPageArgs {
    /// Project file to update in place
    pub input: PathBuf,

    /// Page name
    pub name: String,

    /// Page slug (derived from the name when omitted)
    #[arg(short, long)]
    pub slug: Option<String>,
}

pub fn add_page(args: AddPageArgs, cwd: &Path) -> Result<()> {
    let path = super::resolve(cwd, &args.input);
    let project = super::load_project(&path)?;

    let mut store = BuilderStore::new(project, EditorConfig::load(cwd)?);
    let page_id = store.add_page(&args.name, args.slug.as_deref())?;

    let result = store.save_with(&JsonFileSink::new(&path));
    if !result.success {
        return Err(anyhow!(
            "Failed to write {}: {}",
            path.display(),
            result.message.unwrap_or_default()
        ));
    }

    let route = store
        .project()
        .page(&page_id)
        .map(|page| page.route())
        .unwrap_or_default();
    println!("  {} Added {} at {}", "✓".green(), args.name.bold(), route.cyan());

    Ok(())
}

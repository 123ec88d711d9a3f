mod commands;

use clap::{Parser, Subcommand};
use colored::Colorize;
use commands::{
    add_page, new, pages, tree, validate, AddPageArgs, NewArgs, PagesArgs, TreeArgs, ValidateArgs,
};
use std::path::Path;

/// Pagecraft CLI - inspect and edit page builder projects
#[derive(Parser, Debug)]
#[command(name = "pagecraft")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Create a new project file
    New(NewArgs),

    /// Check a project file against the document rules
    Validate(ValidateArgs),

    /// Print the node tree of a page
    Tree(TreeArgs),

    /// List the pages of a project
    Pages(PagesArgs),

    /// Add a page to a project file
    AddPage(AddPageArgs),
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("PAGECRAFT_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(anyhow::Error::from)
        .and_then(|cwd| run(cli.command, &cwd));

    if let Err(err) = result {
        eprintln!();
        eprintln!("{} {}", "Error:".red().bold(), err);
        eprintln!();
        std::process::exit(1);
    }
}

fn run(command: Command, cwd: &Path) -> anyhow::Result<()> {
    match command {
        Command::New(args) => new(args, cwd),
        Command::Validate(args) => validate(args, cwd),
        Command::Tree(args) => tree(args, cwd),
        Command::Pages(args) => pages(args, cwd),
        Command::AddPage(args) => add_page(args, cwd),
    }
}

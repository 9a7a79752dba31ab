//! Anchorage CLI - build and package autotools libraries

use anyhow::Result;
use clap::Parser;
use miette::Diagnostic;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;

use anchorage::ops::SessionOptions;
use anchorage::RecipeError;
use anchorage::util::Shell;
use cli::{Cli, Commands};

/// Options shared by every command.
pub struct GlobalOptions {
    pub shell: Shell,
    pub session: SessionOptions,
}

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {:#}", e);
        if let Some(err) = e.chain().find_map(|cause| cause.downcast_ref::<RecipeError>()) {
            if let Some(stderr) = err.stderr().filter(|s| !s.trim().is_empty()) {
                eprintln!("\n{}", stderr.trim_end());
            }
            if let Some(help) = err.help() {
                eprintln!("help: {}", help);
            }
        }
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    // Parse CLI
    let cli = Cli::parse();

    // Set up logging
    let filter = if cli.verbose {
        EnvFilter::new("anchorage=debug")
    } else {
        EnvFilter::new("anchorage=info")
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let global = GlobalOptions {
        shell: Shell::from_flags(cli.quiet, cli.verbose, cli.no_color),
        session: SessionOptions {
            recipe_path: cli.recipe,
            work_dir: cli.work_dir,
            settings: cli.settings,
            options: cli.options,
        },
    };

    // Execute command
    match cli.command {
        Commands::Source(args) => commands::source::execute(args, &global),
        Commands::Requirements => commands::requirements::execute(&global),
        Commands::BuildRequirements(args) => commands::build_requirements::execute(args, &global),
        Commands::Build => commands::build::execute(&global),
        Commands::Package => commands::package::execute(&global),
        Commands::Info(args) => commands::info::execute(args, &global),
        Commands::Create(args) => commands::create::execute(args, &global),
        Commands::Inspect(args) => commands::inspect::execute(args, &global),
        Commands::Export(args) => commands::export::execute(args, &global),
        Commands::Completions(args) => commands::completions::execute(args),
    }
}

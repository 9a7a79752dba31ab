//! CLI definitions using clap.

use std::path::PathBuf;

use anchorage::ops::session::parse_key_value;
use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;

/// Anchorage - build and package autotools libraries from declarative recipes
#[derive(Parser)]
#[command(name = "anchorage")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Only print errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Recipe file (defaults to the built-in libostree recipe)
    #[arg(long, global = true, env = "ANCHORAGE_RECIPE")]
    pub recipe: Option<PathBuf>,

    /// Root of source checkouts and staged packages
    #[arg(long, global = true, env = "ANCHORAGE_WORK_DIR")]
    pub work_dir: Option<PathBuf>,

    /// Override a build setting (os, arch, compiler, build_type)
    #[arg(short = 's', long = "setting", global = true, value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub settings: Vec<(String, String)>,

    /// Override a package option (e.g. shared=False)
    #[arg(short = 'o', long = "option", global = true, value_name = "NAME=VALUE", value_parser = parse_key_value)]
    pub options: Vec<(String, String)>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Fetch the upstream source at the release tag
    Source(SourceArgs),

    /// List the pinned runtime requirements
    Requirements,

    /// Declare and install build requirements on this machine
    BuildRequirements(BuildRequirementsArgs),

    /// Bootstrap, configure and compile the checked-out source
    Build,

    /// Stage the package (install, or headers only)
    Package,

    /// Export consumer info into the staged package
    Info(InfoArgs),

    /// Run every lifecycle hook in order
    Create(CreateArgs),

    /// Show the recipe as resolved for the current settings
    Inspect(InspectArgs),

    /// Archive the staged package
    Export(ExportArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args)]
pub struct SourceArgs {
    /// Fetch depth (0 = full history)
    #[arg(long)]
    pub depth: Option<u32>,
}

#[derive(Args)]
pub struct BuildRequirementsArgs {
    /// Only list the packages, do not install
    #[arg(long)]
    pub dry_run: bool,
}

#[derive(Args)]
pub struct InfoArgs {
    /// Print compiler and linker flags instead of JSON
    #[arg(long)]
    pub flags: bool,
}

#[derive(Args)]
pub struct CreateArgs {
    /// Fetch depth (0 = full history)
    #[arg(long)]
    pub depth: Option<u32>,

    /// Reuse an existing checkout
    #[arg(long)]
    pub keep_source: bool,
}

#[derive(Args)]
pub struct InspectArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Args)]
pub struct ExportArgs {
    /// Output directory (defaults to <work-dir>/export)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,
}

#[derive(Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

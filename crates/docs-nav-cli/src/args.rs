use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};

#[derive(Parser)]
#[command(name = "docs-nav")]
#[command(about = "Generate MkDocs root .pages navigation from subfolder categories")]
#[command(version)]
pub struct Cli {
    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Quiet output (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Project directory containing docs-nav.toml (default: current directory)
    #[arg(long, global = true)]
    pub project_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
#[allow(clippy::enum_variant_names)]
pub enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[derive(Clone, Copy, Debug, Default, ValueEnum)]
pub enum PrintFormat {
    /// awesome-pages `.pages` text
    #[default]
    Pages,
    /// Nested JSON list
    Json,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the root .pages from subfolder categories
    Generate {
        /// Docs directory (default: docs_dir from config)
        docs_dir: Option<PathBuf>,

        /// Print the navigation instead of writing the file
        #[arg(short, long)]
        print: bool,

        /// Output format for --print
        #[arg(short, long, value_enum, default_value_t = PrintFormat::Pages)]
        format: PrintFormat,
    },

    /// Show discovered categories and skipped folders
    Categories {
        /// Docs directory (default: docs_dir from config)
        docs_dir: Option<PathBuf>,
    },

    /// Run a build command with generated navigation, then restore the original .pages
    Build {
        /// Docs directory (default: docs_dir from config)
        #[arg(long)]
        docs_dir: Option<PathBuf>,

        /// Build command and arguments (e.g., -- mkdocs build --strict)
        #[arg(trailing_var_arg = true, required = true, num_args = 1..)]
        command: Vec<String>,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

#[derive(Subcommand)]
pub enum ConfigAction {
    /// Get a config value
    Get {
        /// Config key (e.g., nav.separator)
        key: String,
    },

    /// List all config values
    List,

    /// Print the effective config as TOML
    Show,

    /// Show config file path
    Path,

    /// Initialize config file with defaults
    Init,
}

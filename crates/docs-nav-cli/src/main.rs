use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitCode};

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use colored::Colorize;
use tracing_subscriber::EnvFilter;

use docs_nav_core::{
    generate_navigation, with_generated_nav, write_root_pages, NavConfig, NavError, Result,
};

mod args;
use args::{Cli, Commands, ConfigAction, PrintFormat, Shell};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let project_dir = resolve_project_dir(cli.project_dir);

    let result = match cli.command {
        Commands::Generate {
            docs_dir,
            print,
            format,
        } => handle_generate(&project_dir, docs_dir, print, format),
        Commands::Categories { docs_dir } => handle_categories(&project_dir, docs_dir),
        Commands::Build { docs_dir, command } => handle_build(&project_dir, docs_dir, &command),
        Commands::Config { action } => handle_config(action, &project_dir),
        Commands::Completions { shell } => {
            handle_completions(shell);
            Ok(())
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", "[ERROR]".red().bold(), e);
            ExitCode::from(e.exit_code() as u8)
        }
    }
}

/// `RUST_LOG` wins; otherwise --verbose/--quiet pick the level
fn init_tracing(verbose: bool, quiet: bool) {
    let default_level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .init();
}

fn resolve_project_dir(cli_dir: Option<PathBuf>) -> PathBuf {
    if let Some(dir) = cli_dir {
        return dir;
    }

    if let Ok(dir) = std::env::var("DOCS_NAV_PROJECT") {
        return PathBuf::from(dir);
    }

    PathBuf::from(".")
}

/// Load config and resolve the docs directory (CLI argument > config)
fn load_context(project_dir: &Path, docs_dir: Option<PathBuf>) -> Result<(NavConfig, PathBuf)> {
    let config = NavConfig::load(project_dir)?;
    let docs_dir = docs_dir.unwrap_or_else(|| config.docs_dir_in(project_dir));

    if !docs_dir.is_dir() {
        return Err(NavError::ContentRootNotFound { path: docs_dir });
    }

    Ok((config, docs_dir))
}

fn handle_completions(shell: Shell) {
    let mut cmd = Cli::command();
    let shell = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
        Shell::Elvish => clap_complete::Shell::Elvish,
    };
    generate(shell, &mut cmd, "docs-nav", &mut io::stdout());
}

fn handle_generate(
    project_dir: &Path,
    docs_dir: Option<PathBuf>,
    print: bool,
    format: PrintFormat,
) -> Result<()> {
    let (config, docs_dir) = load_context(project_dir, docs_dir)?;
    let generated = generate_navigation(&docs_dir, &config)?;

    if print {
        match format {
            PrintFormat::Pages => print!("{}", generated.tree.render_pages()),
            PrintFormat::Json => println!("{}", generated.tree.render_json()?),
        }
        return Ok(());
    }

    let path = write_root_pages(&docs_dir, &config, &generated.tree)?;
    println!(
        "{} {} with {} categories.",
        "Updated".green(),
        path.display(),
        generated.tree.group_count()
    );
    Ok(())
}

fn handle_categories(project_dir: &Path, docs_dir: Option<PathBuf>) -> Result<()> {
    let (config, docs_dir) = load_context(project_dir, docs_dir)?;
    let generated = generate_navigation(&docs_dir, &config)?;
    let scan = &generated.scan;

    if generated.order.is_empty() {
        println!("No categories found in {}.", docs_dir.display());
        println!();
        println!(
            "Add `title: <Category>{}<period>` to a subfolder's {}",
            config.nav.separator, config.nav.pages_file
        );
    } else {
        println!();
        println!("{}", "Categories:".cyan().bold());
        for category in &generated.order {
            let members = scan.mapping.members(category).unwrap_or_default();
            println!("  {} ({})", category.bold(), members.len());
            for member in members {
                println!("    {}", member);
            }
        }
    }

    let unresolved: Vec<_> = scan.unresolved().collect();
    if !unresolved.is_empty() {
        println!();
        println!("{}", "Skipped:".yellow().bold());
        for diagnostic in unresolved {
            println!("  {} {}", diagnostic.dir, diagnostic.reason.to_string().dimmed());
        }
    }
    println!();

    Ok(())
}

fn handle_build(project_dir: &Path, docs_dir: Option<PathBuf>, command: &[String]) -> Result<()> {
    let (config, docs_dir) = load_context(project_dir, docs_dir)?;

    with_generated_nav(&docs_dir, &config, |session| {
        println!(
            "{} {} ({} categories)",
            "Generated".green(),
            session.pages_path().display(),
            session.tree().group_count()
        );
        run_build_command(project_dir, command)
    })?;

    println!("{} original navigation file", "Restored".green());
    Ok(())
}

fn run_build_command(project_dir: &Path, command: &[String]) -> Result<()> {
    let Some((program, args)) = command.split_first() else {
        return Ok(());
    };

    let status = Command::new(program)
        .args(args)
        .current_dir(project_dir)
        .status()?;

    if !status.success() {
        return Err(NavError::BuildCommandFailed {
            command: command.join(" "),
            status: status.to_string(),
        });
    }
    Ok(())
}

fn handle_config(action: ConfigAction, project_dir: &Path) -> Result<()> {
    match action {
        ConfigAction::Get { key } => {
            let config = NavConfig::load(project_dir)?;
            println!("{}", config.get(&key)?);
        }
        ConfigAction::List => {
            let config = NavConfig::load(project_dir)?;
            println!();
            for (key, value) in config.list() {
                println!("{} = {}", key.cyan(), value);
            }
            println!();
        }
        ConfigAction::Show => {
            let config = NavConfig::load(project_dir)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = NavConfig::path(project_dir);
            println!("{}", path.display());
        }
        ConfigAction::Init => {
            let path = NavConfig::init(project_dir)?;
            println!("{} {}", "Initialized:".green(), path.display());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_build_requires_command() {
        assert!(Cli::try_parse_from(["docs-nav", "build"]).is_err());

        let cli = Cli::try_parse_from(["docs-nav", "build", "--", "mkdocs", "build", "--strict"])
            .unwrap();
        match cli.command {
            Commands::Build { command, .. } => assert_eq!(command, ["mkdocs", "build", "--strict"]),
            _ => panic!("expected build command"),
        }
    }

    #[test]
    fn test_load_context_missing_docs_dir() {
        let temp = TempDir::new().unwrap();
        let err = load_context(temp.path(), None).unwrap_err();
        assert!(matches!(err, NavError::ContentRootNotFound { .. }));
        assert_ne!(err.exit_code(), 0);
    }

    #[test]
    fn test_load_context_uses_config_docs_dir() {
        let temp = TempDir::new().unwrap();
        std::fs::create_dir_all(temp.path().join("site")).unwrap();
        std::fs::write(NavConfig::path(temp.path()), "docs_dir = \"site\"\n").unwrap();

        let (_, docs_dir) = load_context(temp.path(), None).unwrap();
        assert_eq!(docs_dir, temp.path().join("site"));
    }

    #[cfg(unix)]
    #[test]
    fn test_run_build_command_reports_failure() {
        let temp = TempDir::new().unwrap();
        let command = vec!["sh".to_string(), "-c".to_string(), "exit 3".to_string()];
        let err = run_build_command(temp.path(), &command).unwrap_err();
        assert!(matches!(err, NavError::BuildCommandFailed { .. }));
    }
}

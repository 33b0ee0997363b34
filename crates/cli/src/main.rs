use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use owo_colors::OwoColorize;
use std::path::{Path, PathBuf};

use skillman_core::logging::{self, LoggingConfig};
use skillman_core::{Config, ConfigSource, ConfigStore, HttpSource, Paths};
use skillman_skills::{InstallReport, RepoFetcher, SkillManager, SkillRepository, UnlinkReport};

/// Overrides the URL the default config is downloaded from
const CONFIG_URL_ENV: &str = "SKILLMAN_CONFIG_URL";

/// Skillman - download agent skills and link them into agent tools
#[derive(Parser, Debug)]
#[command(name = "skillman")]
#[command(about = "Download, install, and manage agent skills from GitHub repositories", long_about = None)]
#[command(version)]
struct Cli {
    /// Path to config.toml (default: ~/.config/skillman/config.toml)
    #[arg(short, long, value_name = "PATH", global = true)]
    config: Option<PathBuf>,

    /// Verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Download a skill from a GitHub repository (e.g., tsubasaogawa/semantic-commit-helper)
    Download {
        /// Repository as owner/repo or github.com/owner/repo
        #[arg(value_name = "REPOSITORY")]
        repo: String,
    },
    /// Install all downloaded skills to an agent's skill directory
    Install {
        /// Agent name from config.toml
        #[arg(value_name = "AGENT", required_unless_present = "all", conflicts_with = "all")]
        agent: Option<String>,

        /// Install into every configured agent
        #[arg(long)]
        all: bool,
    },
    /// Delete a skill and its symlinks from all configured agent directories
    Delete {
        #[arg(value_name = "SKILL")]
        skill: String,
    },
    /// List all downloaded skills
    List,
    /// Show or edit configured agents
    Agents {
        #[command(subcommand)]
        command: AgentCommands,
    },
}

#[derive(Subcommand, Debug)]
enum AgentCommands {
    /// List configured agents and their skill directories
    List,
    /// Add an agent, or change its skill directory
    Add {
        #[arg(value_name = "NAME")]
        name: String,
        /// Skill directory, "~/" is expanded to your home directory
        #[arg(value_name = "PATH")]
        path: String,
    },
    /// Remove an agent from the config
    Remove {
        #[arg(value_name = "NAME")]
        name: String,
    },
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{} {:#}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    let paths = Paths::from_env()?;
    let config_path = cli.config.clone().unwrap_or_else(|| paths.config_file());

    let _log_guard = logging::init_logging(Some(logging_settings(&config_path, &paths, cli.verbose)))?;

    let manager = SkillManager::new(paths);

    if cli.verbose {
        println!("{} Using config: {}", "Info:".blue().bold(), config_path.display());
        println!(
            "{} Skills cache: {}",
            "Info:".blue().bold(),
            manager.repository().root().display()
        );
    }

    tracing::debug!(command = ?cli.command, config = %config_path.display(), "running command");

    match cli.command {
        Commands::Download { repo } => cmd_download(&manager, &repo)?,
        Commands::Install { agent, all } => {
            cmd_install(&manager, &config_store(&config_path), agent.as_deref(), all)?
        }
        Commands::Delete { skill } => cmd_delete(&manager, &config_store(&config_path), &skill)?,
        Commands::List => cmd_list(&manager)?,
        Commands::Agents { command } => cmd_agents(&config_store(&config_path), command)?,
    }

    Ok(())
}

/// Config store for commands that read the agent mapping
fn config_store(config_path: &Path) -> ConfigStore {
    match std::env::var(CONFIG_URL_ENV) {
        Ok(url) => ConfigStore::with_source(config_path, url, HttpSource::new()),
        Err(_) => ConfigStore::new(config_path),
    }
}

/// Build logging settings from the `[logging]` section of an existing config file.
///
/// The file is only peeked at here: a missing or broken config must not
/// trigger a download or fail commands that never need it.
fn logging_settings(config_path: &Path, paths: &Paths, verbose: bool) -> LoggingConfig {
    let section = std::fs::read_to_string(config_path)
        .ok()
        .and_then(|content| Config::from_toml_str(&content).ok())
        .map(|config| config.logging)
        .unwrap_or_default();

    let file_logging = section.file;
    let mut settings = LoggingConfig::from(section);
    if verbose {
        settings = settings.with_level("debug");
    }
    if file_logging {
        settings = settings.with_file_dir(paths.log_dir());
    }
    settings
}

/// Clone a repository into the skills cache
fn cmd_download<R: SkillRepository, F: RepoFetcher>(manager: &SkillManager<R, F>, repo: &str) -> Result<()> {
    let skill = manager.download(repo).context("failed to download skill")?;

    println!(
        "{} Downloaded skill '{}' from {}",
        "Success:".green().bold(),
        skill.name.cyan(),
        repo
    );
    Ok(())
}

/// Link all cached skills into one agent, or every agent with `--all`
fn cmd_install<R, F, S>(
    manager: &SkillManager<R, F>, store: &ConfigStore<S>, agent: Option<&str>, all: bool,
) -> Result<()>
where
    R: SkillRepository,
    F: RepoFetcher,
    S: ConfigSource,
{
    let config = store.load().context("failed to load config")?;

    let targets = if all {
        config.agent_names()
    } else {
        vec![agent.context("an agent name is required")?.to_string()]
    };

    if targets.is_empty() {
        println!("{} No agents configured", "Info:".yellow().bold());
        return Ok(());
    }

    for name in targets {
        let dir = config.agent_dir(&name)?;
        let report = manager.install(dir).context("failed to install skills")?;
        print_install_report(&report);
        println!(
            "{} Installed skills to agent '{}'",
            "Success:".green().bold(),
            name.cyan()
        );
    }

    Ok(())
}

fn print_install_report(report: &InstallReport) {
    for name in &report.skipped {
        println!("  Skipping {} (already exists)", name);
    }
    for name in &report.installed {
        println!("  Installed {}", name.green());
    }
    for (name, failure) in &report.failed {
        println!(
            "  {} failed to create symlink for {}: {}",
            "Warning:".yellow().bold(),
            name,
            failure.reason
        );
    }
    if report.is_noop() {
        println!("  No new skills to install");
    }
}

/// Delete a skill and its links from every configured agent
fn cmd_delete<R, F, S>(manager: &SkillManager<R, F>, store: &ConfigStore<S>, skill: &str) -> Result<()>
where
    R: SkillRepository,
    F: RepoFetcher,
    S: ConfigSource,
{
    let config = store.load().context("failed to load config")?;

    let report = manager
        .delete(skill, config.agent_dirs())
        .context("failed to delete skill")?;
    print_unlink_report(&report);

    println!("{} Deleted skill '{}'", "Success:".green().bold(), skill.cyan());
    Ok(())
}

fn print_unlink_report(report: &UnlinkReport) {
    for path in &report.removed {
        println!("  Removed link {}", path.display());
    }
    for path in &report.preserved {
        println!("  Kept {} (not a symlink)", path.display());
    }
    for failure in &report.failed {
        println!(
            "  {} failed to remove symlink {}: {}",
            "Warning:".yellow().bold(),
            failure.path.display(),
            failure.reason
        );
    }
}

/// Print downloaded skills
fn cmd_list<R: SkillRepository, F: RepoFetcher>(manager: &SkillManager<R, F>) -> Result<()> {
    let skills = manager.list().context("failed to list skills")?;

    if skills.is_empty() {
        println!("No skills downloaded yet");
        return Ok(());
    }

    println!("Downloaded skills:");
    for skill in skills {
        println!("  - {}", skill.name.cyan());
    }
    Ok(())
}

/// Inspect or edit the agent mapping
fn cmd_agents<S: ConfigSource>(store: &ConfigStore<S>, command: AgentCommands) -> Result<()> {
    let mut config = store.load().context("failed to load config")?;

    match command {
        AgentCommands::List => {
            if config.agents.is_empty() {
                println!("No agents configured");
                return Ok(());
            }
            println!("Configured agents:");
            for (name, dir) in &config.agents {
                println!("  - {} -> {}", name.cyan(), dir);
            }
        }
        AgentCommands::Add { name, path } => {
            if name.trim().is_empty() {
                anyhow::bail!("agent name must not be empty");
            }
            let previous = config.set_agent(name.clone(), path.clone());
            store.save(&config).context("failed to save config")?;
            match previous {
                Some(old) => println!(
                    "{} Agent '{}' now uses {} (was {})",
                    "Success:".green().bold(),
                    name.cyan(),
                    path,
                    old
                ),
                None => println!("{} Added agent '{}' -> {}", "Success:".green().bold(), name.cyan(), path),
            }
        }
        AgentCommands::Remove { name } => {
            let dir = config.remove_agent(&name)?;
            store.save(&config).context("failed to save config")?;
            println!(
                "{} Removed agent '{}' ({} was left as is)",
                "Success:".green().bold(),
                name.cyan(),
                dir
            );
        }
    }

    Ok(())
}

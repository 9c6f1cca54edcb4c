// ABOUTME: CLI entry point wiring the parse, merge, filter, select, dispatch pipeline
// ABOUTME: Resolves the ssh username once from flag, environment, or the invoking user

mod config;
mod error;
mod fuzzy;
mod registry;
mod selector;
mod ssh;
mod ui;

use std::io::{self, IsTerminal, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;

use config::Settings;
use fuzzy::SearchEngine;
use registry::HostRecord;
use ssh::{SshConfig, SshLauncher, parse_known_hosts};

#[derive(Parser, Debug)]
#[command(
    name = "tiller",
    version,
    about = "Pick a known SSH host interactively and connect to it"
)]
struct Cli {
    /// SSH username (falls back to $TILLER_SSH_USER, then the current user)
    #[arg(short, long, env = "TILLER_SSH_USER")]
    user: Option<String>,

    /// Alternate settings file
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    init_logging();
    let cli = Cli::parse();

    let settings_path = match cli.config {
        Some(path) => path,
        None => Settings::default_path()?,
    };
    let mut settings = Settings::load_or_default(&settings_path)?;
    settings.validate()?;
    settings.expand_paths()?;

    // Flag, environment, and OS-user fallback collapse into one value
    // here; nothing downstream looks at the environment again.
    let ssh_user = cli.user.unwrap_or_else(whoami::username);
    println!("Using SSH user: {ssh_user}");

    let known_ports = parse_known_hosts(Path::new(&settings.ssh.known_hosts_path))?;
    let ssh_config = SshConfig::load(Path::new(&settings.ssh.config_path));
    tracing::debug!(
        "{} known_hosts names, {} config hosts",
        known_ports.len(),
        ssh_config.hosts().len()
    );

    let records = registry::merge(&ssh_config, &known_ports, &ssh_user);
    if records.is_empty() {
        println!("No hosts found in known_hosts or ssh config.");
        return Ok(());
    }

    let term = prompt_search_term()?;
    let candidates = apply_filter(records, &term, settings.ui.case_sensitive);
    if candidates.is_empty() {
        println!("No hosts match '{term}'.");
        return Ok(());
    }

    let launcher = SshLauncher::new(&settings.ssh.ssh_binary);
    if launcher.locate().is_none() {
        anyhow::bail!("ssh client '{}' not found", settings.ssh.ssh_binary);
    }

    match ui::pick_host(candidates)? {
        Some(record) => {
            launcher.connect(&record)?;
            Ok(())
        }
        None => Ok(()),
    }
}

fn init_logging() {
    use tracing_subscriber::EnvFilter;

    // stdout belongs to the prompt and the picker; diagnostics go to
    // stderr.
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_env("TILLER_LOG").unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .init();
}

/// One optional narrowing question before the list is shown. Skipped when
/// stdin is not a terminal so piped invocations do not hang.
fn prompt_search_term() -> Result<String> {
    if !io::stdin().is_terminal() {
        return Ok(String::new());
    }

    print!("Search (leave empty to show all): ");
    io::stdout().flush().context("flush prompt")?;
    let mut input = String::new();
    io::stdin()
        .read_line(&mut input)
        .context("read search term")?;
    Ok(input.trim().to_string())
}

/// Narrows the registry by hostname, then maps the surviving names back
/// to their records in rank order.
fn apply_filter(records: Vec<HostRecord>, term: &str, case_sensitive: bool) -> Vec<HostRecord> {
    if term.is_empty() {
        return records;
    }

    let engine = SearchEngine::new(records.iter().map(|r| r.name.clone()).collect());
    let ranked: Vec<String> = engine
        .search(term, case_sensitive)
        .into_iter()
        .map(str::to_string)
        .collect();

    ranked
        .into_iter()
        .filter_map(|name| records.iter().find(|record| record.name == name).cloned())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::HostSource;

    fn record(name: &str) -> HostRecord {
        HostRecord {
            name: name.to_string(),
            address: name.to_string(),
            username: "deploy".to_string(),
            port: "22".to_string(),
            source: HostSource::KnownHosts,
        }
    }

    #[test]
    fn test_apply_filter_empty_term_is_identity() {
        let records = vec![record("beta"), record("alpha")];

        let filtered = apply_filter(records.clone(), "", false);

        assert_eq!(filtered, records);
    }

    #[test]
    fn test_apply_filter_remaps_names_to_records_in_rank_order() {
        let records = vec![
            record("gitlab.company.com"),
            record("git.internal"),
            record("db.internal"),
        ];

        let filtered = apply_filter(records, "git", false);

        let names: Vec<&str> = filtered.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, ["git.internal", "gitlab.company.com"]);
    }

    #[test]
    fn test_apply_filter_can_empty_the_list() {
        let filtered = apply_filter(vec![record("alpha")], "zzz", false);

        assert!(filtered.is_empty());
    }
}

//! Command implementations
//!
//! Each command returns the process exit code; only setup failures
//! (bad config file, unwritable path) come back as errors.

use crate::cli::{Cli, Commands};
use crate::display;
use crate::errors::{EXIT_ADVISOR_UNAVAILABLE, EXIT_INVALID_ISSUE, EXIT_SUCCESS};
use anyhow::{Context, Result};
use owo_colors::OwoColorize;
use serde::Serialize;
use std::io;
use std::path::{Path, PathBuf};
use sysfix_common::advisor::OllamaBackend;
use sysfix_common::confirm::StdinConfirmer;
use sysfix_common::probes::Scanner;
use sysfix_common::remedies::{DryRunActions, HostActions};
use sysfix_common::{
    AdvisorPolicy, Backend, Confirmer, Issue, RemediationEngine, SysfixConfig, SystemActions,
};
use tracing::{debug, info};

/// Engine wired for the terminal
pub type CliEngine =
    RemediationEngine<Box<dyn Backend>, Box<dyn SystemActions>, Box<dyn Confirmer>>;

/// Flags shared by `check --fix` and `fix`
#[derive(Debug, Clone, Copy, Default)]
pub struct FixOptions {
    pub ai: bool,
    pub dry_run: bool,
    pub json: bool,
}

/// Resolve the config file path: `--config` wins over the default lookup
pub fn resolve_config_path(explicit: Option<&Path>) -> PathBuf {
    explicit
        .map(Path::to_path_buf)
        .unwrap_or_else(sysfix_common::config::config_path)
}

/// Load configuration; an explicit `--config` file must parse, and must
/// exist unless `allow_missing` (used by `config --init`)
pub fn load_config(explicit: Option<&Path>, allow_missing: bool) -> Result<SysfixConfig> {
    match explicit {
        Some(path) if allow_missing && !path.exists() => Ok(SysfixConfig::default()),
        Some(path) => SysfixConfig::load_from(path)
            .with_context(|| format!("could not load config from {}", path.display())),
        None => Ok(SysfixConfig::load()),
    }
}

/// Dispatch a parsed command line
pub fn run(cli: &Cli, config: &SysfixConfig) -> Result<i32> {
    match &cli.command {
        Commands::Check {
            fix,
            ai,
            dry_run,
            json,
        } => {
            let options = FixOptions {
                ai: *ai,
                dry_run: *dry_run,
                json: *json,
            };
            check(config, *fix, options)
        }
        Commands::Fix {
            issue_number,
            ai,
            dry_run,
        } => {
            let options = FixOptions {
                ai: *ai,
                dry_run: *dry_run,
                json: false,
            };
            fix(config, *issue_number, options)
        }
        Commands::Advisor => advisor(config),
        Commands::Config { init } => show_config(config, cli.config.as_deref(), *init),
    }
}

/// Build the engine for one session
pub fn build_engine(config: &SysfixConfig, options: FixOptions) -> CliEngine {
    let backend: Box<dyn Backend> = Box::new(
        OllamaBackend::new(&config.advisor.endpoint, &config.advisor.model)
            .with_health_timeout(config.advisor.health_timeout()),
    );

    let actions: Box<dyn SystemActions> = if options.dry_run {
        Box::new(DryRunActions::new())
    } else {
        Box::new(HostActions::new(&config.cleanup.extra_dirs))
    };

    // Keep stdout clean for JSON; prompts go to stderr
    let confirmer: Box<dyn Confirmer> = if options.json {
        Box::new(StdinConfirmer::with_io(io::stdin().lock(), io::stderr()))
    } else {
        Box::new(StdinConfirmer::new())
    };

    let engine = RemediationEngine::from_config(config, backend, actions, confirmer);
    if options.ai {
        engine.with_policy(AdvisorPolicy::Always)
    } else {
        engine
    }
}

fn scan(config: &SysfixConfig) -> Vec<Issue> {
    let scanner = Scanner::with_default_probes(&config.thresholds);
    debug!("running probes: {:?}", scanner.probe_names());
    let issues = scanner.scan();
    info!("scan found {} issue(s)", issues.len());
    issues
}

#[derive(Serialize)]
struct ScanOutput<'a> {
    issues: &'a [Issue],
}

/// `check`: list issues, optionally remediate all of them
pub fn check(config: &SysfixConfig, fix: bool, options: FixOptions) -> Result<i32> {
    let issues = scan(config);

    if options.json {
        let output = if fix {
            let mut engine = build_engine(config, options);
            serde_json::to_string_pretty(&engine.run(issues))?
        } else {
            serde_json::to_string_pretty(&ScanOutput { issues: &issues })?
        };
        println!("{}", output);
        return Ok(EXIT_SUCCESS);
    }

    println!("{}", display::format_issue_list(&issues));
    if fix && !issues.is_empty() {
        println!();
        remediate(config, &issues, options);
    }
    Ok(EXIT_SUCCESS)
}

/// `fix N`: remediate the N-th issue of a fresh scan
pub fn fix(config: &SysfixConfig, issue_number: usize, options: FixOptions) -> Result<i32> {
    if issue_number == 0 {
        eprintln!("{} Invalid issue number.", "[ERROR]".bright_red());
        return Ok(EXIT_INVALID_ISSUE);
    }

    let issues = scan(config);
    let Some(issue) = issues.get(issue_number - 1) else {
        eprintln!(
            "{} Invalid issue number. The last scan found {} issue(s).",
            "[ERROR]".bright_red(),
            issues.len()
        );
        return Ok(EXIT_INVALID_ISSUE);
    };

    remediate(config, std::slice::from_ref(issue), options);
    Ok(EXIT_SUCCESS)
}

fn remediate(config: &SysfixConfig, issues: &[Issue], options: FixOptions) {
    let mut engine = build_engine(config, options);
    debug!("remediation session {}", engine.session_id());

    let mut outcomes = Vec::with_capacity(issues.len());
    for (i, issue) in issues.iter().enumerate() {
        let outcome = engine.remediate_one(issue);
        println!("{}", display::format_outcome(i + 1, &outcome));
        outcomes.push(outcome);
    }
    println!("{}", display::format_summary(&outcomes, options.dry_run));
}

/// `advisor`: report backend liveness and installed models
pub fn advisor(config: &SysfixConfig) -> Result<i32> {
    let backend = OllamaBackend::new(&config.advisor.endpoint, &config.advisor.model)
        .with_health_timeout(config.advisor.health_timeout());

    if !config.advisor.enabled {
        println!(
            "{} AI advisor is disabled in configuration",
            "[WARNING]".yellow()
        );
    }

    let alive = backend.is_alive();
    let models = if alive {
        backend.list_models().unwrap_or_default()
    } else {
        Vec::new()
    };
    let has_model = alive && backend.has_model().unwrap_or(false);

    print!(
        "{}",
        display::format_advisor_status(
            backend.base_url(),
            backend.model(),
            alive,
            &models,
            has_model
        )
    );
    println!();

    Ok(if alive {
        EXIT_SUCCESS
    } else {
        EXIT_ADVISOR_UNAVAILABLE
    })
}

/// `config`: print the effective configuration, or write defaults with `--init`
pub fn show_config(config: &SysfixConfig, explicit: Option<&Path>, init: bool) -> Result<i32> {
    let path = resolve_config_path(explicit);

    if init {
        if path.exists() {
            println!(
                "{} Config already exists at {}",
                "[OK]".bright_green(),
                path.display()
            );
        } else {
            SysfixConfig::default()
                .save_to(&path)
                .with_context(|| format!("could not write {}", path.display()))?;
            println!(
                "{} Wrote default config to {}",
                "[OK]".bright_green(),
                path.display()
            );
        }
        return Ok(EXIT_SUCCESS);
    }

    let status = if path.exists() { "" } else { " (not present, using defaults)" };
    println!("# {}{}", path.display(), status);
    println!("{}", toml::to_string_pretty(config)?);
    Ok(EXIT_SUCCESS)
}

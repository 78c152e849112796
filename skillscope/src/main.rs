//! skillscope - CLI to analyze AI assistant capability usage
//!
//! Detects missed opportunities (capabilities that should have run but
//! didn't) and overlapping triggers across installed skills, agents,
//! and slash commands.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use skillscope_core::analysis::{
    classify_entry, compute_overlaps, detect_missed_opportunities, UsageClass,
};
use skillscope_core::config::AnalysisConfig;
use skillscope_core::discovery::discover_catalog;
use skillscope_core::discovery::quality::{check_descriptions, check_stale_cache};
use skillscope_core::ingest::{load_sessions, resolve_project_dir, IngestReport};
use skillscope_core::report;
use skillscope_core::Config;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "skillscope")]
#[command(about = "Analyze AI assistant capability usage")]
#[command(version)]
struct Cli {
    /// Output format: table (default) or json
    #[arg(short, long, default_value = "table", global = true)]
    format: String,

    /// Project root to scan for project-level capabilities
    /// (defaults to the current directory)
    #[arg(long, global = true)]
    project_root: Option<PathBuf>,

    /// Verbose output (include warnings)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Detect capabilities that matched prompts but were never invoked
    Missed {
        /// Project name or path whose sessions to analyze
        project: String,

        /// Most recent sessions to analyze
        #[arg(short, long)]
        sessions: Option<usize>,

        /// Minimum match confidence in [0, 1]
        #[arg(long)]
        min_confidence: Option<f64>,

        /// Distinct triggers required for a match
        #[arg(long)]
        min_triggers: Option<usize>,

        /// Recency window in days for impact scoring
        #[arg(long)]
        days: Option<u32>,
    },

    /// Detect overlapping triggers across the catalog
    Overlaps {
        /// Skip the semantic near-duplicate pass
        #[arg(long)]
        no_semantic: bool,

        /// Jaccard similarity threshold for semantic overlap
        #[arg(long)]
        semantic_threshold: Option<f64>,
    },

    /// List discovered skills, agents, and commands
    Catalog {
        /// Classify each entry (active/dormant/unused) against this
        /// project's recent sessions
        #[arg(long)]
        project: Option<String>,
    },

    /// Check the setup for quality issues: stale plugin cache state and
    /// skills or agents with empty or very short descriptions
    Doctor,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load().context("failed to load configuration")?;

    let _log_guard =
        skillscope_core::logging::init(&config.logging).context("failed to initialize logging")?;

    tracing::info!("skillscope starting up");

    let project_root = match cli.project_root.clone() {
        Some(root) => Some(root),
        None => std::env::current_dir().ok(),
    };
    let catalog = discover_catalog(project_root.as_deref(), &config.paths);
    if cli.verbose {
        for warning in &catalog.warnings {
            eprintln!("warning: {}", warning);
        }
    }

    match &cli.command {
        Command::Missed {
            project,
            sessions,
            min_confidence,
            min_triggers,
            days,
        } => {
            let mut analysis = config.analysis.clone();
            if let Some(v) = *sessions {
                analysis.max_sessions = v;
            }
            if let Some(v) = *min_confidence {
                analysis.min_confidence = v;
            }
            if let Some(v) = *min_triggers {
                analysis.min_triggers = v;
            }
            if let Some(v) = *days {
                analysis.analysis_period_days = v;
            }
            analysis.validate().context("invalid analysis options")?;

            run_missed(project, &catalog.entries, &analysis, &config, &cli)
        }
        Command::Overlaps {
            no_semantic,
            semantic_threshold,
        } => {
            let mut analysis = config.analysis.clone();
            if *no_semantic {
                analysis.semantic_enabled = false;
            }
            if let Some(v) = *semantic_threshold {
                analysis.semantic_threshold = v;
            }
            analysis.validate().context("invalid analysis options")?;

            let findings = compute_overlaps(&catalog.entries, &analysis);
            if cli.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report::overlaps_to_json(&findings))?
                );
            } else {
                print!("{}", report::render_overlaps_text(&findings));
            }
            Ok(())
        }
        Command::Catalog { project } => {
            let usage = match project {
                Some(name) => {
                    let ingested = load_project_sessions(name, &config.analysis, &config, &cli)?;
                    Some(
                        catalog
                            .entries
                            .iter()
                            .map(|entry| classify_entry(entry, &ingested.sessions, &config.analysis))
                            .collect::<Vec<UsageClass>>(),
                    )
                }
                None => None,
            };
            if cli.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report::catalog_to_json(
                        &catalog.entries,
                        usage.as_deref()
                    ))?
                );
            } else {
                print!(
                    "{}",
                    report::render_catalog_text(&catalog.entries, usage.as_deref())
                );
            }
            Ok(())
        }
        Command::Doctor => {
            let cache_issues =
                check_stale_cache(&config.paths.plugin_cache(), &config.paths.settings_path());
            let description_issues = check_descriptions(&catalog.entries);
            if cli.format == "json" {
                println!(
                    "{}",
                    serde_json::to_string_pretty(&report::doctor_to_json(
                        &cache_issues,
                        &description_issues
                    ))?
                );
            } else {
                print!(
                    "{}",
                    report::render_doctor_text(&cache_issues, &description_issues)
                );
            }
            Ok(())
        }
    }
}

fn load_project_sessions(
    project: &str,
    analysis: &AnalysisConfig,
    config: &Config,
    cli: &Cli,
) -> Result<IngestReport> {
    let projects_dir = config.paths.projects_dir();
    let project_dir = resolve_project_dir(&projects_dir, project)
        .with_context(|| format!("failed to resolve project '{}'", project))?;

    let ingested = load_sessions(&project_dir, analysis)
        .with_context(|| format!("failed to load sessions from {}", project_dir.display()))?;
    if cli.verbose {
        for warning in &ingested.warnings {
            eprintln!("warning: {}", warning);
        }
    }
    Ok(ingested)
}

fn run_missed(
    project: &str,
    catalog: &[skillscope_core::CatalogEntry],
    analysis: &AnalysisConfig,
    config: &Config,
    cli: &Cli,
) -> Result<()> {
    let ingested = load_project_sessions(project, analysis, config, cli)?;

    let summary = report::SessionSummary::from_sessions(&ingested.sessions);
    let missed = detect_missed_opportunities(&ingested.sessions, catalog, analysis);

    if cli.format == "json" {
        println!(
            "{}",
            serde_json::to_string_pretty(&report::missed_to_json(&missed, &summary))?
        );
    } else {
        print!("{}", report::render_missed_text(&missed, &summary));
    }
    Ok(())
}

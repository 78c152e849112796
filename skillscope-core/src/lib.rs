//! # skillscope-core
//!
//! Core library for skillscope - an analyzer for AI assistant capability usage.
//!
//! This library provides:
//! - Catalog discovery for skills, agents, and slash commands
//! - Session log ingestion (JSONL conversation transcripts)
//! - Missed-opportunity detection with confidence and impact scoring
//! - Overlap detection across declared triggers
//! - Configuration management and logging infrastructure
//!
//! ## Architecture
//!
//! Data flows through three layers:
//! - **Discovery:** Catalog entries read from skill/agent/command definitions
//! - **Ingestion:** Session records parsed from conversation logs
//! - **Analysis:** Pure functions over catalog + sessions producing findings
//!
//! ## Example
//!
//! ```rust,no_run
//! use skillscope_core::{analysis, discovery, Config};
//!
//! let config = Config::load().expect("failed to load config");
//! let catalog = discovery::discover_catalog(None, &config.paths);
//! let findings = analysis::compute_overlaps(&catalog.entries, &config.analysis);
//! ```

// Re-export commonly used items at the crate root
pub use config::Config;
pub use error::{Error, Result};
pub use types::*;

// Public modules
pub mod analysis;
pub mod config;
pub mod discovery;
pub mod error;
pub mod ingest;
pub mod logging;
pub mod report;
pub mod types;

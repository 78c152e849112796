//! Configuration quality checks
//!
//! Flags the setup problems that make capability routing worse over
//! time: leftover `temp_*` clone directories in the plugin cache,
//! plugins hoarding superseded version directories, cached marketplaces
//! no longer referenced by settings, and skills or agents whose
//! descriptions are too thin to route on.

use crate::types::{CatalogEntry, CatalogKind};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

use super::subdirectories;

/// Descriptions shorter than this (after trimming) carry almost no
/// routing signal.
pub const SHORT_DESCRIPTION_LIMIT: usize = 20;

/// One problem found in the plugin cache.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CacheIssue {
    /// Leftover `temp_*` clone directory in the cache root
    TempLeftover { path: String },
    /// A plugin keeping more than one superseded version directory
    OldVersions {
        marketplace: String,
        plugin: String,
        active_version: String,
        old_versions: Vec<String>,
        old_count: usize,
    },
    /// Cached marketplace not referenced by settings.json
    OrphanedMarketplace { name: String },
}

/// Why a description was flagged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DescriptionIssue {
    Empty,
    Short,
}

impl DescriptionIssue {
    pub fn as_str(&self) -> &'static str {
        match self {
            DescriptionIssue::Empty => "empty description",
            DescriptionIssue::Short => "very short description",
        }
    }
}

/// A catalog entry with a low-quality description.
#[derive(Debug, Clone, Serialize)]
pub struct DescriptionFinding {
    /// `kind:name` identifier of the flagged entry
    pub item: String,
    pub issue: DescriptionIssue,
}

#[derive(Debug, Default, Deserialize)]
struct Settings {
    #[serde(default, rename = "extraKnownMarketplaces")]
    extra_known_marketplaces: BTreeMap<String, serde_json::Value>,
}

/// Scan the plugin cache for stale state.
///
/// A missing or empty cache yields no issues. The orphaned-marketplace
/// check only runs when `settings_path` exists and parses; without it
/// there is no ground truth for which marketplaces are wanted.
pub fn check_stale_cache(cache: &Path, settings_path: &Path) -> Vec<CacheIssue> {
    let mut issues = Vec::new();
    let known_marketplaces = load_known_marketplaces(settings_path);

    for marketplace_dir in subdirectories(cache) {
        let Some(marketplace) = dir_name(&marketplace_dir) else {
            continue;
        };
        if marketplace.starts_with('.') {
            continue;
        }
        if marketplace.starts_with("temp_") {
            issues.push(CacheIssue::TempLeftover { path: marketplace });
            continue;
        }
        if let Some(known) = &known_marketplaces {
            if !known.contains(&marketplace) {
                issues.push(CacheIssue::OrphanedMarketplace {
                    name: marketplace.clone(),
                });
            }
        }
        for plugin_dir in subdirectories(&marketplace_dir) {
            check_plugin_versions(&marketplace, &plugin_dir, &mut issues);
        }
    }
    issues
}

/// Flag a plugin only when more than one superseded semver directory is
/// left behind; a single old version is normal update churn. Version
/// directories that are not `x.y.z` (commit hashes) are ignored.
fn check_plugin_versions(marketplace: &str, plugin_dir: &Path, issues: &mut Vec<CacheIssue>) {
    let mut versions: Vec<(String, (u64, u64, u64))> = subdirectories(plugin_dir)
        .into_iter()
        .filter_map(|d| dir_name(&d))
        .filter(|n| !n.starts_with('.'))
        .filter_map(|n| semver_key(&n).map(|key| (n, key)))
        .collect();
    if versions.len() < 3 {
        return;
    }
    versions.sort_by_key(|(_, key)| *key);
    let Some((active_version, _)) = versions.pop() else {
        return;
    };
    let old_versions: Vec<String> = versions.into_iter().map(|(name, _)| name).collect();
    let Some(plugin) = dir_name(plugin_dir) else {
        return;
    };
    issues.push(CacheIssue::OldVersions {
        marketplace: marketplace.to_string(),
        plugin,
        active_version,
        old_count: old_versions.len(),
        old_versions,
    });
}

/// Flag skills and agents with empty or very short descriptions.
/// Commands always carry their `/name` trigger, so they are exempt.
pub fn check_descriptions(entries: &[CatalogEntry]) -> Vec<DescriptionFinding> {
    entries
        .iter()
        .filter(|e| e.kind != CatalogKind::Command)
        .filter_map(|e| {
            let trimmed = e.description.trim();
            let issue = if trimmed.is_empty() {
                DescriptionIssue::Empty
            } else if trimmed.chars().count() < SHORT_DESCRIPTION_LIMIT {
                DescriptionIssue::Short
            } else {
                return None;
            };
            Some(DescriptionFinding {
                item: e.ident(),
                issue,
            })
        })
        .collect()
}

fn load_known_marketplaces(settings_path: &Path) -> Option<BTreeSet<String>> {
    let content = fs::read_to_string(settings_path).ok()?;
    let settings: Settings = serde_json::from_str(&content).ok()?;
    Some(settings.extra_known_marketplaces.into_keys().collect())
}

fn dir_name(path: &Path) -> Option<String> {
    path.file_name().map(|n| n.to_string_lossy().into_owned())
}

fn semver_key(name: &str) -> Option<(u64, u64, u64)> {
    let mut parts = name.split('.');
    let major = parts.next()?.parse().ok()?;
    let minor = parts.next()?.parse().ok()?;
    let patch = parts.next()?.parse().ok()?;
    if parts.next().is_some() {
        return None;
    }
    Some((major, minor, patch))
}

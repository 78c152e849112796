//! Catalog discovery from the filesystem
//!
//! Walks project-level and user-level capability directories plus the
//! plugin cache and builds the [`CatalogEntry`] list the analysis layer
//! consumes. Unreadable or unparseable files become warnings on the
//! returned [`DiscoveryReport`]; discovery never aborts on one bad file.

pub mod frontmatter;
pub mod quality;
pub mod triggers;

use crate::config::PathOverrides;
use crate::types::{CatalogEntry, CatalogKind, SourceOrigin};
use frontmatter::{extract_front_matter, first_body_line, FrontMatter};
use std::fs;
use std::path::{Path, PathBuf};
use triggers::extract_triggers;

const DESCRIPTION_LIMIT: usize = 200;

/// Everything discovery produced for one run.
#[derive(Debug, Default)]
pub struct DiscoveryReport {
    pub entries: Vec<CatalogEntry>,
    /// Files that could not be read or parsed, with the reason
    pub warnings: Vec<String>,
}

impl DiscoveryReport {
    pub fn skills(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.kind == CatalogKind::Skill)
    }

    pub fn agents(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries.iter().filter(|e| e.kind == CatalogKind::Agent)
    }

    pub fn commands(&self) -> impl Iterator<Item = &CatalogEntry> {
        self.entries
            .iter()
            .filter(|e| e.kind == CatalogKind::Command)
    }

    fn warn(&mut self, path: &Path, reason: impl std::fmt::Display) {
        tracing::warn!(path = %path.display(), %reason, "Skipping capability file");
        self.warnings.push(format!("{}: {}", path.display(), reason));
    }
}

/// Discover the full catalog: project directories (when a project root is
/// given), the user-level assistant directory, and installed plugins.
pub fn discover_catalog(project_root: Option<&Path>, paths: &PathOverrides) -> DiscoveryReport {
    let mut report = DiscoveryReport::default();

    if let Some(root) = project_root {
        let base = root.join(".claude");
        discover_skills(&base.join("skills"), &SourceOrigin::Project, &mut report);
        discover_agents(&base.join("agents"), &SourceOrigin::Project, &mut report);
        discover_commands(&base.join("commands"), &SourceOrigin::Project, &mut report);
    }

    let home = paths.assistant_home();
    discover_skills(&home.join("skills"), &SourceOrigin::User, &mut report);
    discover_agents(&home.join("agents"), &SourceOrigin::User, &mut report);
    discover_commands(&home.join("commands"), &SourceOrigin::User, &mut report);

    discover_plugins(&paths.plugin_cache(), &mut report);

    tracing::info!(
        entries = report.entries.len(),
        warnings = report.warnings.len(),
        "Catalog discovery complete"
    );

    report
}

/// Skills live one per subdirectory, defined by a `SKILL.md` file.
pub fn discover_skills(dir: &Path, origin: &SourceOrigin, report: &mut DiscoveryReport) {
    for skill_dir in subdirectories(dir) {
        let skill_md = skill_dir.join("SKILL.md");
        if !skill_md.exists() {
            continue;
        }
        match fs::read_to_string(&skill_md) {
            Ok(content) => {
                let fm = extract_front_matter(&content).unwrap_or_default();
                let fallback = skill_dir
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_default();
                report.entries.push(build_entry(
                    CatalogKind::Skill,
                    fm,
                    fallback,
                    origin.clone(),
                    skill_md,
                    None,
                ));
            }
            Err(e) => report.warn(&skill_md, e),
        }
    }
}

/// Agents are single markdown files.
pub fn discover_agents(dir: &Path, origin: &SourceOrigin, report: &mut DiscoveryReport) {
    for agent_file in markdown_files(dir) {
        match fs::read_to_string(&agent_file) {
            Ok(content) => {
                let fm = extract_front_matter(&content).unwrap_or_default();
                let body_description = first_body_line(&content);
                let fallback = file_stem(&agent_file);
                report.entries.push(build_entry(
                    CatalogKind::Agent,
                    fm,
                    fallback,
                    origin.clone(),
                    agent_file,
                    body_description,
                ));
            }
            Err(e) => report.warn(&agent_file, e),
        }
    }
}

/// Commands are single markdown files; `/name` is always a trigger.
pub fn discover_commands(dir: &Path, origin: &SourceOrigin, report: &mut DiscoveryReport) {
    for cmd_file in markdown_files(dir) {
        match fs::read_to_string(&cmd_file) {
            Ok(content) => {
                let fm = extract_front_matter(&content).unwrap_or_default();
                let fallback = file_stem(&cmd_file);
                let mut entry = build_entry(
                    CatalogKind::Command,
                    fm,
                    fallback,
                    origin.clone(),
                    cmd_file,
                    None,
                );
                let slash = format!("/{}", entry.name.to_lowercase());
                if !entry.triggers.contains(&slash) {
                    entry.triggers.push(slash);
                }
                report.entries.push(entry);
            }
            Err(e) => report.warn(&cmd_file, e),
        }
    }
}

/// Plugin cache layout: `<cache>/<marketplace>/<plugin>/<version>/...`
/// with `skills/`, `agents/`, and `commands/` under the version directory.
/// Only the most recently modified version of each plugin is scanned.
fn discover_plugins(cache: &Path, report: &mut DiscoveryReport) {
    for marketplace in subdirectories(cache) {
        let is_temp = marketplace
            .file_name()
            .map(|n| n.to_string_lossy().starts_with("temp_"))
            .unwrap_or(true);
        if is_temp {
            continue;
        }

        for plugin_dir in subdirectories(&marketplace) {
            let Some(version) = latest_version_dir(&plugin_dir) else {
                continue;
            };
            let plugin_name = plugin_dir
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_default();
            let origin = SourceOrigin::Plugin { name: plugin_name };

            discover_skills(&version.join("skills"), &origin, report);
            discover_agents(&version.join("agents"), &origin, report);
            discover_commands(&version.join("commands"), &origin, report);
        }
    }
}

fn build_entry(
    kind: CatalogKind,
    fm: FrontMatter,
    fallback_name: String,
    origin: SourceOrigin,
    source_path: PathBuf,
    body_description: Option<String>,
) -> CatalogEntry {
    let name = fm.name.unwrap_or(fallback_name);
    let mut description = fm
        .description
        .or(body_description)
        .unwrap_or_default();
    description.truncate(floor_char_boundary(&description, DESCRIPTION_LIMIT));

    let mut triggers = extract_triggers(&description);
    let name_lower = name.to_lowercase();
    if !triggers.contains(&name_lower) {
        triggers.push(name_lower);
    }

    CatalogEntry {
        name,
        kind,
        description,
        triggers,
        origin,
        source_path,
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

pub(crate) fn subdirectories(dir: &Path) -> Vec<PathBuf> {
    let mut dirs: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_dir())
                .collect()
        })
        .unwrap_or_default();
    dirs.sort();
    dirs
}

fn markdown_files(dir: &Path) -> Vec<PathBuf> {
    let mut files: Vec<PathBuf> = fs::read_dir(dir)
        .map(|entries| {
            entries
                .filter_map(|e| e.ok())
                .map(|e| e.path())
                .filter(|p| p.is_file() && p.extension().map(|e| e == "md").unwrap_or(false))
                .collect()
        })
        .unwrap_or_default();
    files.sort();
    files
}

fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn latest_version_dir(plugin_dir: &Path) -> Option<PathBuf> {
    subdirectories(plugin_dir)
        .into_iter()
        .filter(|d| {
            d.file_name()
                .map(|n| !n.to_string_lossy().starts_with('.'))
                .unwrap_or(false)
        })
        .max_by_key(|d| {
            fs::metadata(d)
                .and_then(|m| m.modified())
                .unwrap_or(std::time::SystemTime::UNIX_EPOCH)
        })
}

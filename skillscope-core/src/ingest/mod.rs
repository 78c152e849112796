//! Session log ingestion
//!
//! Resolves a project name to its session directory under
//! `~/.claude/projects/`, finds the most recent session JSONL files,
//! and parses them into [`SessionRecord`]s.

pub mod outcome;
pub mod session;

pub use outcome::{detect_outcome, ToolOutcome};
pub use session::{parse_session_file, SessionParseResult};

use crate::config::{AnalysisConfig, PathOverrides};
use crate::error::{Error, Result};
use crate::types::SessionRecord;
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Sessions loaded for a project, plus non-fatal parse warnings.
#[derive(Debug)]
pub struct IngestReport {
    pub sessions: Vec<SessionRecord>,
    pub warnings: Vec<String>,
}

/// Resolve a project name to its session directory.
///
/// Session directories are named after the project's absolute path with
/// slashes replaced by dashes (`/home/ada/web-app` becomes
/// `-home-ada-web-app`). An exact match on the munged name wins;
/// otherwise any directory ending in `-<project>` is a candidate, and
/// resolution fails if there are zero or several.
pub fn resolve_project_dir(projects_dir: &Path, project: &str) -> Result<PathBuf> {
    let munged = project.replace('/', "-");
    let exact = projects_dir.join(&munged);
    if exact.is_dir() {
        return Ok(exact);
    }

    let suffix = format!("-{}", project);
    let mut candidates: Vec<PathBuf> = Vec::new();
    if let Ok(entries) = std::fs::read_dir(projects_dir) {
        for entry in entries.flatten() {
            let path = entry.path();
            if !path.is_dir() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.ends_with(&suffix) {
                candidates.push(path);
            }
        }
    }
    candidates.sort();

    match candidates.len() {
        1 => Ok(candidates.remove(0)),
        0 => Err(Error::ProjectNotFound(project.to_string())),
        _ => Err(Error::AmbiguousProject {
            name: project.to_string(),
            candidates: candidates
                .iter()
                .filter_map(|p| p.file_name())
                .map(|n| n.to_string_lossy().into_owned())
                .collect(),
        }),
    }
}

/// Find session files in a project directory, newest first.
///
/// Capped at `max_sessions`; pass `usize::MAX` for no cap.
pub fn find_session_files(project_dir: &Path, max_sessions: usize) -> Result<Vec<PathBuf>> {
    let pattern = project_dir.join("*.jsonl");
    let pattern = pattern.to_string_lossy();

    let mut files: Vec<(PathBuf, SystemTime)> = Vec::new();
    for entry in glob::glob(&pattern)
        .map_err(|e| Error::Config(format!("bad session glob {}: {}", pattern, e)))?
    {
        let path = match entry {
            Ok(p) => p,
            Err(e) => {
                tracing::warn!("skipping unreadable session path: {}", e);
                continue;
            }
        };
        let mtime = std::fs::metadata(&path)
            .and_then(|m| m.modified())
            .unwrap_or(SystemTime::UNIX_EPOCH);
        files.push((path, mtime));
    }

    files.sort_by(|a, b| b.1.cmp(&a.1));
    files.truncate(max_sessions);
    Ok(files.into_iter().map(|(path, _)| path).collect())
}

/// Load the most recent sessions for a resolved project directory.
///
/// Individual files that fail to parse are skipped with a warning
/// rather than failing the whole run.
pub fn load_sessions(project_dir: &Path, analysis: &AnalysisConfig) -> Result<IngestReport> {
    let files = find_session_files(project_dir, analysis.max_sessions)?;
    tracing::info!(
        "loading {} session file(s) from {}",
        files.len(),
        project_dir.display()
    );

    let mut sessions = Vec::with_capacity(files.len());
    let mut warnings = Vec::new();
    for path in &files {
        match parse_session_file(path) {
            Ok(result) => {
                for warning in result.warnings {
                    warnings.push(format!("{}: {}", path.display(), warning));
                }
                sessions.push(result.session);
            }
            Err(e) => {
                let message = format!("{}: {}", path.display(), e);
                tracing::warn!("skipping session file: {}", message);
                warnings.push(message);
            }
        }
    }

    Ok(IngestReport { sessions, warnings })
}

//! Tool-result outcome classification
//!
//! Shared by session parsing and reporting so success/failure tallies
//! always follow one behavioral contract.

/// Whether a tool invocation appears to have succeeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolOutcome {
    Success,
    Failure,
}

const BASH_FAILURE_MARKERS: &[&str] = &["error:", "failed", "traceback", "permission denied"];

const EDIT_FAILURE_MARKERS: &[&str] = &[
    "permission denied",
    "file not found",
    "no such file",
    "old_string not found",
    "not unique",
    "error",
];

/// Classify a tool result from its text content.
///
/// Bash results are judged on exit codes first; edit-family tools on
/// file errors; everything else falls back to generic error markers.
pub fn detect_outcome(tool_name: &str, result: &str) -> ToolOutcome {
    let result_lower = result.to_lowercase();

    match tool_name {
        "Bash" => {
            if result_lower.contains("exit code: 0") || result_lower.contains("succeeded") {
                ToolOutcome::Success
            } else if result_lower.contains("exit code:")
                || result_lower.contains("timeout")
                || BASH_FAILURE_MARKERS.iter().any(|m| result_lower.contains(m))
            {
                ToolOutcome::Failure
            } else {
                ToolOutcome::Success
            }
        }
        "Edit" | "Write" | "NotebookEdit" => {
            if EDIT_FAILURE_MARKERS.iter().any(|m| result_lower.contains(m)) {
                ToolOutcome::Failure
            } else {
                ToolOutcome::Success
            }
        }
        _ => {
            if result_lower.contains("error") || result_lower.contains("failed") {
                ToolOutcome::Failure
            } else {
                ToolOutcome::Success
            }
        }
    }
}

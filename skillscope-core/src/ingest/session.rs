//! Claude Code session JSONL parser
//!
//! Parses one session log into a [`SessionRecord`]: human prompts with
//! system-generated text filtered out, invoked skills/agents, tool
//! outcomes, interruptions, and compaction counts.
//!
//! The parser is resilient: malformed JSON lines are recorded as
//! warnings and skipped, and missing fields fall back to defaults via
//! `#[serde(default)]`.

use crate::error::{Error, Result};
use crate::ingest::outcome::{detect_outcome, ToolOutcome};
use crate::types::{SessionRecord, ToolInvocation};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

const INTERRUPTION_MARKER: &str = "[Request interrupted by user]";
const FOLLOWUP_LIMIT: usize = 500;

// ============================================
// Raw JSONL record types (serde deserialization)
// ============================================

#[derive(Debug, Deserialize, Default)]
#[serde(rename_all = "camelCase", default)]
struct RawRecord {
    #[serde(rename = "type")]
    record_type: Option<String>,
    subtype: Option<String>,
    timestamp: Option<String>,
    cwd: Option<String>,
    message: Option<RawMessage>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(default)]
struct RawMessage {
    role: Option<String>,
    content: Option<RawContent>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawContent {
    Text(String),
    Blocks(Vec<ContentBlock>),
}

#[derive(Debug, Deserialize)]
#[serde(tag = "type")]
enum ContentBlock {
    #[serde(rename = "text")]
    Text { text: String },
    #[serde(rename = "tool_use")]
    ToolUse {
        id: String,
        name: String,
        input: serde_json::Value,
    },
    #[serde(rename = "tool_result")]
    ToolResult {
        tool_use_id: String,
        content: serde_json::Value,
    },
    // Catch-all for unknown block types
    #[serde(other)]
    Unknown,
}

/// Parsed session plus non-fatal parse warnings.
#[derive(Debug)]
pub struct SessionParseResult {
    pub session: SessionRecord,
    pub warnings: Vec<String>,
}

/// Text the assistant injects into user messages; never a human prompt.
fn is_system_prompt(content: &str) -> bool {
    content.starts_with("Base directory for this skill:")
        || content.starts_with("[TRACE-ID:")
        || content.contains("<command-message>")
        || content.contains("<command-name>")
}

/// Parse a session JSONL file with outcome and compaction tracking.
pub fn parse_session_file(path: &Path) -> Result<SessionParseResult> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::Io(std::io::Error::new(
            e.kind(),
            format!("failed to open {}: {}", path.display(), e),
        ))
    })?;

    let mut session = SessionRecord {
        session_id: path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default(),
        ..Default::default()
    };
    let mut warnings = Vec::new();

    // tool_use_id -> invocation, until its result (or an interruption) lands
    let mut pending_tools: HashMap<String, (String, serde_json::Value)> = HashMap::new();
    // Interrupted invocations waiting for the next human message
    let mut awaiting_followup: Vec<(String, serde_json::Value)> = Vec::new();

    for (line_number, line) in content.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let record: RawRecord = match serde_json::from_str(line) {
            Ok(r) => r,
            Err(e) => {
                warnings.push(format!("line {}: {}", line_number + 1, e));
                continue;
            }
        };

        if session.session_date.is_none() {
            if let Some(ts) = record.timestamp.as_deref() {
                session.session_date = DateTime::parse_from_rfc3339(ts)
                    .ok()
                    .map(|dt| dt.with_timezone(&Utc));
            }
        }
        if session.project_path.is_none() {
            session.project_path = record.cwd.clone();
        }

        match record.record_type.as_deref() {
            Some("system") if record.subtype.as_deref() == Some("compact_boundary") => {
                session.compaction_count += 1;
            }
            Some("user") => handle_user_record(
                &record,
                &mut session,
                &mut pending_tools,
                &mut awaiting_followup,
            ),
            Some("assistant") => handle_assistant_record(&record, &mut session, &mut pending_tools),
            _ => {}
        }
    }

    // Tools still pending at EOF were interrupted with no followup
    for (_, (tool_name, input)) in pending_tools {
        session.interrupted_count += 1;
        session.interrupted_tools.push(ToolInvocation {
            tool_name,
            input,
            followup: None,
        });
    }

    if session.session_date.is_none() {
        session.session_date = std::fs::metadata(path)
            .and_then(|m| m.modified())
            .ok()
            .map(DateTime::<Utc>::from);
    }

    Ok(SessionParseResult { session, warnings })
}

fn handle_user_record(
    record: &RawRecord,
    session: &mut SessionRecord,
    pending_tools: &mut HashMap<String, (String, serde_json::Value)>,
    awaiting_followup: &mut Vec<(String, serde_json::Value)>,
) {
    let Some(content) = record.message.as_ref().and_then(|m| m.content.as_ref()) else {
        return;
    };

    let mut user_text: Option<String> = None;
    let mut is_interruption = false;

    match content {
        RawContent::Text(text) => {
            if text.contains(INTERRUPTION_MARKER) {
                is_interruption = true;
            } else if !text.trim().is_empty() && !is_system_prompt(text) {
                user_text = Some(text.clone());
                session.prompts.push(text.clone());
            }
        }
        RawContent::Blocks(blocks) => {
            for block in blocks {
                match block {
                    ContentBlock::Text { text } => {
                        if text.contains(INTERRUPTION_MARKER) {
                            is_interruption = true;
                        } else if !text.trim().is_empty() && !is_system_prompt(text) {
                            if user_text.is_none() {
                                user_text = Some(text.clone());
                            }
                            session.prompts.push(text.clone());
                        }
                    }
                    ContentBlock::ToolResult {
                        tool_use_id,
                        content,
                    } => {
                        let (tool_name, _) = pending_tools
                            .remove(tool_use_id)
                            .unwrap_or_else(|| ("unknown".to_string(), serde_json::Value::Null));
                        if let serde_json::Value::String(result) = content {
                            match detect_outcome(&tool_name, result) {
                                ToolOutcome::Success => session.success_count += 1,
                                ToolOutcome::Failure => session.failure_count += 1,
                            }
                        }
                    }
                    _ => {}
                }
            }
        }
    }

    if is_interruption {
        session.interrupted_count += 1;
        awaiting_followup.extend(pending_tools.drain().map(|(_, v)| v));
    } else if let Some(text) = user_text {
        if !awaiting_followup.is_empty() {
            let mut followup = text;
            followup.truncate(floor_char_boundary(&followup, FOLLOWUP_LIMIT));
            for (tool_name, input) in awaiting_followup.drain(..) {
                session.interrupted_tools.push(ToolInvocation {
                    tool_name,
                    input,
                    followup: Some(followup.clone()),
                });
            }
        }
    }
}

fn handle_assistant_record(
    record: &RawRecord,
    session: &mut SessionRecord,
    pending_tools: &mut HashMap<String, (String, serde_json::Value)>,
) {
    let Some(RawContent::Blocks(blocks)) =
        record.message.as_ref().and_then(|m| m.content.as_ref())
    else {
        return;
    };

    for block in blocks {
        if let ContentBlock::ToolUse { id, name, input } = block {
            if !id.is_empty() {
                pending_tools.insert(id.clone(), (name.clone(), input.clone()));
            }

            match name.as_str() {
                "Skill" => {
                    if let Some(skill) = input.get("skill").and_then(|v| v.as_str()) {
                        if !skill.is_empty() {
                            session.invoked_skills.insert(skill.to_string());
                        }
                    }
                }
                "Task" => {
                    if let Some(agent) = input.get("subagent_type").and_then(|v| v.as_str()) {
                        if !agent.is_empty() {
                            session.invoked_agents.insert(agent.to_string());
                        }
                    }
                }
                _ => {
                    session.tools_used.insert(name.clone());
                }
            }
        }
    }
}

fn floor_char_boundary(s: &str, max: usize) -> usize {
    if s.len() <= max {
        return s.len();
    }
    (0..=max).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

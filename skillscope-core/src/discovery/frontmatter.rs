//! YAML front-matter extraction for capability definition files
//!
//! Skills, agents, and commands are markdown files with an optional
//! `---` fenced YAML header carrying `name` and `description`.

use serde::Deserialize;

/// Parsed front-matter fields. Unknown keys are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

/// Extract YAML front-matter from markdown content.
///
/// Returns `None` when there is no front-matter block or the YAML does
/// not parse; callers fall back to filename-derived defaults.
pub fn extract_front_matter(content: &str) -> Option<FrontMatter> {
    let rest = content.strip_prefix("---")?;
    let end = rest.find("\n---")?;
    serde_yaml::from_str(&rest[..end]).ok()
}

/// First paragraph line after the first heading, used when an agent file
/// has no front-matter description.
pub fn first_body_line(content: &str) -> Option<String> {
    let mut lines = content.lines();
    for line in lines.by_ref() {
        if line.starts_with('#') {
            break;
        }
    }
    lines
        .find(|l| !l.trim().is_empty() && !l.starts_with('#'))
        .map(|l| l.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_name_and_description() {
        let content = "---\nname: deploy-helper\ndescription: Use for deployments\n---\n# Body\n";
        let fm = extract_front_matter(content).unwrap();
        assert_eq!(fm.name.as_deref(), Some("deploy-helper"));
        assert_eq!(fm.description.as_deref(), Some("Use for deployments"));
    }

    #[test]
    fn test_missing_front_matter() {
        assert!(extract_front_matter("# Just a heading\nbody\n").is_none());
    }

    #[test]
    fn test_unterminated_block() {
        assert!(extract_front_matter("---\nname: x\n").is_none());
    }

    #[test]
    fn test_malformed_yaml_degrades() {
        let content = "---\nname: [unclosed\n---\nbody\n";
        assert!(extract_front_matter(content).is_none());
    }

    #[test]
    fn test_extra_keys_ignored() {
        let content = "---\nname: x\nallowed-tools: [Bash]\n---\n";
        let fm = extract_front_matter(content).unwrap();
        assert_eq!(fm.name.as_deref(), Some("x"));
    }

    #[test]
    fn test_first_body_line() {
        let content = "# Agent\n\nReviews code for style issues.\n\nMore text.\n";
        assert_eq!(
            first_body_line(content).as_deref(),
            Some("Reviews code for style issues.")
        );
        assert!(first_body_line("# Heading only\n").is_none());
    }
}

use std::path::Path;

use crate::config::NamingPolicy;
use crate::error::{Result, ScaffoldError};

/// Verdict of a project-name check.
#[derive(Debug, Clone)]
pub struct NameCheck {
    pub valid: bool,
    /// One entry per independent violation; empty when valid.
    pub problems: Vec<String>,
}

/// Check a project name against the package-naming rules of the target
/// ecosystem. Pure; collects every violation rather than stopping at the
/// first.
pub fn validate_project_name(name: &str, policy: &NamingPolicy) -> NameCheck {
    let mut problems = Vec::new();

    if name.is_empty() {
        problems.push("name cannot be empty".to_string());
        return NameCheck {
            valid: false,
            problems,
        };
    }

    if name.trim() != name {
        problems.push("name cannot contain leading or trailing spaces".to_string());
    }
    if name.starts_with('.') {
        problems.push("name cannot start with a period".to_string());
    }
    if name.starts_with('_') {
        problems.push("name cannot start with an underscore".to_string());
    }
    if name.len() > policy.max_length {
        problems.push(format!(
            "name cannot contain more than {} characters",
            policy.max_length
        ));
    }
    if policy.reserved.iter().any(|r| r == &name.to_lowercase()) {
        problems.push(format!("{} is a reserved name", name));
    }
    if name.chars().any(|c| c.is_ascii_uppercase()) {
        problems.push("name cannot contain capital letters".to_string());
    }
    if name.chars().any(|c| "~'!()*".contains(c)) {
        problems.push("name cannot contain special characters (\"~'!()*\")".to_string());
    }
    if !name
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.' | '~' | '\'' | '!' | '(' | ')' | '*'))
    {
        problems.push("name can only contain URL-friendly characters".to_string());
    }

    NameCheck {
        valid: problems.is_empty(),
        problems,
    }
}

/// Verify that `dir` accepts new files by creating and removing a probe
/// file. The target directory itself is never touched.
pub async fn ensure_writable(dir: &Path) -> Result<()> {
    let probe = dir.join(format!(".stencil-write-test-{}", std::process::id()));
    match tokio::fs::write(&probe, b"").await {
        Ok(()) => {
            let _ = tokio::fs::remove_file(&probe).await;
            Ok(())
        }
        Err(_) => Err(ScaffoldError::PathNotWritable(dir.to_path_buf())),
    }
}

use std::path::Path;

use dialoguer::theme::ColorfulTheme;
use dialoguer::{Confirm, Input};
use indicatif::ProgressBar;
use stencil_core::config::NamingPolicy;
use stencil_core::validate::validate_project_name;
use stencil_core::{Prompter, ScaffoldError};

/// Ask for the project directory when the positional argument is missing.
/// Returns `None` when the answer trims to nothing.
pub fn project_path(policy: &NamingPolicy) -> anyhow::Result<Option<String>> {
    let policy = policy.clone();
    let answer: String = Input::with_theme(&ColorfulTheme::default())
        .with_prompt("What is your project named?")
        .default("my-app".to_string())
        .validate_with(move |value: &String| -> Result<(), String> {
            let check = validate_project_name(basename(value), &policy);
            if check.valid {
                Ok(())
            } else {
                let first = check
                    .problems
                    .first()
                    .cloned()
                    .unwrap_or_else(|| "name is not allowed".to_string());
                Err(format!("Invalid project name: {}", first))
            }
        })
        .interact_text()?;

    let answer = answer.trim().to_string();
    Ok(if answer.is_empty() { None } else { Some(answer) })
}

fn basename(value: &str) -> &str {
    Path::new(value)
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or(value)
}

/// Terminal-backed prompter. Suspends the progress spinner while the
/// question is on screen.
pub struct TerminalPrompter {
    progress: Option<ProgressBar>,
}

impl TerminalPrompter {
    pub fn new(progress: Option<ProgressBar>) -> Self {
        Self { progress }
    }
}

impl Prompter for TerminalPrompter {
    fn confirm_fallback(&self) -> stencil_core::Result<bool> {
        let ask = || {
            Confirm::with_theme(&ColorfulTheme::default())
                .with_prompt(
                    "Could not download the template because of a connectivity issue.\n\
                     Do you want to use the bundled template instead?",
                )
                .default(true)
                .interact()
                .map_err(|e| ScaffoldError::Prompt(e.to_string()))
        };
        match &self.progress {
            Some(pb) => pb.suspend(ask),
            None => ask(),
        }
    }
}

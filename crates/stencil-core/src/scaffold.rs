use std::path::{Path, PathBuf};

use tracing::{info, warn};

use crate::config::ScaffoldConfig;
use crate::error::{Result, ScaffoldError};
use crate::install::{install_packages, CommandRunner, InstallOptions};
use crate::manifest::ProjectManifest;
use crate::pkgman::{resolve_online, PackageManager, RegistryProbe};
use crate::template::{materialize, TemplateFetcher, TemplateSource};
use crate::validate::{ensure_writable, validate_project_name};
use crate::{vcs, workspace};

/// A validated scaffolding request. Immutable once built.
#[derive(Debug, Clone)]
pub struct ScaffoldRequest {
    /// Absolute destination path.
    pub target: PathBuf,
    pub package_manager: PackageManager,
}

/// What a successful run produced.
#[derive(Debug, Clone)]
pub struct ScaffoldReport {
    pub app_name: String,
    pub root: PathBuf,
    pub package_manager: PackageManager,
    pub is_online: bool,
    pub git_initialized: bool,
}

/// External collaborators of the pipeline, injected so tests can swap in
/// the in-memory implementations from [`crate::testing`].
pub struct Capabilities<'a> {
    pub runner: &'a dyn CommandRunner,
    pub fetcher: &'a dyn TemplateFetcher,
    pub probe: &'a dyn RegistryProbe,
}

/// Interactive decisions the pipeline may need mid-run.
pub trait Prompter: Send + Sync {
    /// Ask whether to retry with the builtin template after a download
    /// failure. Errors abort the run.
    fn confirm_fallback(&self) -> Result<bool>;
}

/// Run the scaffolding pipeline once, start to finish.
///
/// Steps are awaited strictly in sequence; the first failure aborts the
/// attempt. Nothing is written before path validation passes, and no
/// install or template step runs against a directory that failed the
/// emptiness check.
pub async fn create_app(
    req: &ScaffoldRequest,
    source: &TemplateSource,
    caps: &Capabilities<'_>,
    config: &ScaffoldConfig,
) -> Result<ScaffoldReport> {
    let root = &req.target;
    let app_name = match root.file_name().and_then(|n| n.to_str()) {
        Some(name) => name.to_string(),
        None => {
            return Err(ScaffoldError::NameInvalid {
                name: root.display().to_string(),
                problems: vec!["path has no usable directory name".to_string()],
            })
        }
    };

    // The manifest's name field reuses this exact check.
    let check = validate_project_name(&app_name, &config.naming);
    if !check.valid {
        return Err(ScaffoldError::NameInvalid {
            name: app_name,
            problems: check.problems,
        });
    }

    let parent = root.parent().unwrap_or_else(|| Path::new("/"));
    ensure_writable(parent).await?;

    workspace::create_root(root).await?;
    workspace::ensure_empty(root, &config.emptiness, req.package_manager).await?;
    let frontend = workspace::create_frontend_dir(root).await?;

    // Decided once per attempt and reused by every install call below.
    let is_online = resolve_online(req.package_manager, caps.probe).await;
    if !is_online {
        warn!("registry unreachable; installs will use the local cache");
    }

    let manifest = ProjectManifest::for_app(&app_name);
    manifest.write_to(&frontend).await?;

    let opts = InstallOptions {
        package_manager: req.package_manager,
        is_online,
        dev_dependencies: false,
    };
    install_packages(caps.runner, &frontend, manifest.dependencies, opts).await?;
    install_packages(
        caps.runner,
        &frontend,
        manifest.dev_dependencies,
        InstallOptions {
            dev_dependencies: true,
            ..opts
        },
    )
    .await?;

    materialize(source, root, caps.fetcher).await?;

    let git_initialized = vcs::try_git_init(root);
    if git_initialized {
        info!("initialized a git repository at {}", root.display());
    }

    Ok(ScaffoldReport {
        app_name,
        root: root.clone(),
        package_manager: req.package_manager,
        is_online,
        git_initialized,
    })
}

/// Which template source an attempt runs against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Remote,
    Builtin,
}

/// States of the retry controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunState {
    Running { attempt: Attempt },
    PromptFallback,
    Terminal,
    Aborted,
}

/// Events fed into the retry controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunEvent {
    Succeeded,
    Failed { download: bool },
    FallbackAccepted,
    FallbackDeclined,
}

/// Pure transition function of the fallback controller.
///
/// A download failure on the first attempt is the only path into the
/// prompt; everything else terminates. The builtin attempt never retries.
pub fn step(state: RunState, event: RunEvent) -> RunState {
    match (state, event) {
        (
            RunState::Running {
                attempt: Attempt::Remote,
            },
            RunEvent::Failed { download: true },
        ) => RunState::PromptFallback,
        (RunState::Running { .. }, RunEvent::Failed { .. }) => RunState::Terminal,
        (RunState::Running { .. }, RunEvent::Succeeded) => RunState::Terminal,
        (RunState::PromptFallback, RunEvent::FallbackAccepted) => RunState::Running {
            attempt: Attempt::Builtin,
        },
        (RunState::PromptFallback, RunEvent::FallbackDeclined) => RunState::Aborted,
        (state, _) => state,
    }
}

fn source_for(attempt: Attempt, config: &ScaffoldConfig) -> TemplateSource {
    match attempt {
        Attempt::Remote => TemplateSource::Remote {
            url: config.template.remote_url.clone(),
        },
        Attempt::Builtin => TemplateSource::Builtin,
    }
}

/// Drive the full pipeline under the fallback controller.
///
/// Each attempt re-runs the pipeline from the top; the destination's state
/// after a partial remote failure is re-validated, never resumed.
pub async fn scaffold_with_fallback(
    req: &ScaffoldRequest,
    caps: &Capabilities<'_>,
    prompter: &dyn Prompter,
    config: &ScaffoldConfig,
) -> Result<ScaffoldReport> {
    let mut state = RunState::Running {
        attempt: Attempt::Remote,
    };
    let mut failure: Option<ScaffoldError> = None;

    loop {
        state = match state {
            RunState::Running { attempt } => {
                let source = source_for(attempt, config);
                match create_app(req, &source, caps, config).await {
                    Ok(report) => return Ok(report),
                    Err(err) => {
                        let event = RunEvent::Failed {
                            download: err.is_download(),
                        };
                        failure = Some(err);
                        step(RunState::Running { attempt }, event)
                    }
                }
            }
            RunState::PromptFallback => {
                warn!("template download failed; offering the bundled template");
                let event = if prompter.confirm_fallback()? {
                    RunEvent::FallbackAccepted
                } else {
                    RunEvent::FallbackDeclined
                };
                step(RunState::PromptFallback, event)
            }
            RunState::Terminal | RunState::Aborted => {
                return Err(failure.take().unwrap_or_else(|| {
                    ScaffoldError::Internal("scaffolding ended without an outcome".to_string())
                }))
            }
        };
    }
}

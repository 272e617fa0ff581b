use std::future::Future;
use std::path::Path;
use std::pin::Pin;
use std::process::Stdio;

use tracing::{info, warn};

use crate::error::{Result, ScaffoldError};
use crate::pkgman::PackageManager;

/// Classification of a failed child process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// No failure recorded.
    None,
    /// A remote asset could not be fetched; retryable with the builtin
    /// template.
    Download,
    /// Any other failure; fatal.
    Other,
}

/// Result of a child-process invocation.
#[derive(Debug, Clone)]
pub struct CommandOutcome {
    pub exit_code: i32,
    pub failure: FailureKind,
}

impl CommandOutcome {
    pub fn success() -> Self {
        Self {
            exit_code: 0,
            failure: FailureKind::None,
        }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Capability for running package-manager commands.
pub trait CommandRunner: Send + Sync {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>>;
}

/// Runner backed by real child processes.
pub struct ProcessRunner;

/// Stderr fragments that indicate a connectivity failure rather than a
/// broken install.
const DOWNLOAD_MARKERS: &[&str] = &[
    "enotfound",
    "etimedout",
    "econnrefused",
    "econnreset",
    "eai_again",
    "fetch failed",
    "network request failed",
    "getaddrinfo",
];

impl CommandRunner for ProcessRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>> {
        Box::pin(async move {
            let output = tokio::process::Command::new(program)
                .args(args)
                .current_dir(cwd)
                .stdin(Stdio::null())
                .output()
                .await?;

            if output.status.success() {
                return Ok(CommandOutcome::success());
            }

            let stderr = String::from_utf8_lossy(&output.stderr);
            let lowered = stderr.to_lowercase();
            let failure = if DOWNLOAD_MARKERS.iter().any(|m| lowered.contains(m)) {
                FailureKind::Download
            } else {
                FailureKind::Other
            };
            warn!(
                "{} exited with {:?}: {}",
                program,
                output.status.code(),
                stderr.trim()
            );

            Ok(CommandOutcome {
                exit_code: output.status.code().unwrap_or(-1),
                failure,
            })
        })
    }
}

/// Install flags derived once per scaffolding attempt.
#[derive(Debug, Clone, Copy)]
pub struct InstallOptions {
    pub package_manager: PackageManager,
    pub is_online: bool,
    pub dev_dependencies: bool,
}

/// Invoke the package manager's install command for `packages`, scoped to
/// `dir`. An empty package list is a no-op, not an error.
pub async fn install_packages(
    runner: &dyn CommandRunner,
    dir: &Path,
    packages: &[&str],
    opts: InstallOptions,
) -> Result<()> {
    if packages.is_empty() {
        return Ok(());
    }

    let pm = opts.package_manager;
    let args = install_args(dir, packages, opts);
    info!("{} {}", pm.program(), args.join(" "));

    let outcome = runner.run(pm.program(), &args, dir).await?;
    if outcome.is_success() {
        return Ok(());
    }

    match outcome.failure {
        FailureKind::Download => Err(ScaffoldError::Download(format!(
            "{} could not reach the package registry",
            pm.program()
        ))),
        _ => Err(ScaffoldError::Install {
            command: format!("{} {}", pm.program(), args.join(" ")),
            code: outcome.exit_code,
        }),
    }
}

/// Argument shape per manager. Yarn pins exact versions with `add --exact`
/// and can fall back to its offline mirror; npm and pnpm use
/// `install --save-exact` and rely on `cwd` alone for scoping.
fn install_args(dir: &Path, packages: &[&str], opts: InstallOptions) -> Vec<String> {
    let mut args: Vec<String> = Vec::new();
    match opts.package_manager {
        PackageManager::Yarn => {
            args.push("add".to_string());
            args.push("--exact".to_string());
            if !opts.is_online {
                args.push("--offline".to_string());
            }
            args.push("--cwd".to_string());
            args.push(dir.display().to_string());
            if opts.dev_dependencies {
                args.push("--dev".to_string());
            }
        }
        PackageManager::Npm | PackageManager::Pnpm => {
            args.push("install".to_string());
            args.push("--save-exact".to_string());
            if opts.dev_dependencies {
                args.push("--save-dev".to_string());
            }
        }
    }
    args.extend(packages.iter().map(|p| p.to_string()));
    args
}

use std::path::{Path, PathBuf};

use tracing::info;

use crate::config::EmptinessPolicy;
use crate::error::{Result, ScaffoldError};
use crate::pkgman::PackageManager;

/// Create the target directory. Already-existing intermediate directories
/// are fine.
pub async fn create_root(root: &Path) -> Result<()> {
    tokio::fs::create_dir_all(root).await?;
    Ok(())
}

/// Check that the target directory holds nothing that would conflict with
/// the generated project.
///
/// A directory counts as empty when it contains only allow-listed entries:
/// editor and VCS metadata, a license file, and the lockfile of the chosen
/// package manager. Anything else is fatal and reported in full.
pub async fn ensure_empty(
    root: &Path,
    policy: &EmptinessPolicy,
    pm: PackageManager,
) -> Result<()> {
    let mut conflicts = Vec::new();

    let mut entries = tokio::fs::read_dir(root).await?;
    while let Some(entry) = entries.next_entry().await? {
        let name = entry.file_name().to_string_lossy().into_owned();
        if policy.allowed_files.iter().any(|f| f == &name) {
            continue;
        }
        if name == pm.lockfile() {
            continue;
        }
        let extension_allowed = Path::new(&name)
            .extension()
            .and_then(|e| e.to_str())
            .map(|e| policy.allowed_extensions.iter().any(|a| a == e))
            .unwrap_or(false);
        if extension_allowed {
            continue;
        }
        conflicts.push(name);
    }

    if conflicts.is_empty() {
        Ok(())
    } else {
        conflicts.sort();
        Err(ScaffoldError::DirectoryNotEmpty {
            dir: root.to_path_buf(),
            conflicts,
        })
    }
}

/// Create the `frontend` subdirectory that hosts the generated manifest and
/// app tree.
pub async fn create_frontend_dir(root: &Path) -> Result<PathBuf> {
    let frontend = root.join("frontend");
    tokio::fs::create_dir_all(&frontend).await?;
    info!("created {}", frontend.display());
    Ok(frontend)
}

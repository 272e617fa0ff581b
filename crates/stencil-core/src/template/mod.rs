mod builtin;
mod fetch;
mod rename;

pub use builtin::{files as builtin_files, TemplateFile};
pub use fetch::{HttpFetcher, TemplateFetcher};
pub use rename::{materialized_name, RenameRule, RENAME_RULES};

use std::path::{Component, Path, PathBuf};

use flate2::read::GzDecoder;
use tar::Archive;
use tracing::info;

use crate::error::{Result, ScaffoldError};

/// Where template files come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TemplateSource {
    /// The template bundled into this binary.
    Builtin,
    /// A gzipped tarball fetched over HTTP.
    Remote { url: String },
}

/// Copy every template file into `root`, applying rename rules. Files are
/// never skipped; a remote fetch or extraction problem surfaces as a
/// download failure.
pub async fn materialize(
    source: &TemplateSource,
    root: &Path,
    fetcher: &dyn TemplateFetcher,
) -> Result<()> {
    match source {
        TemplateSource::Builtin => {
            info!("copying bundled template into {}", root.display());
            write_builtin(root).await
        }
        TemplateSource::Remote { url } => {
            info!("downloading template from {}", url);
            let bytes = fetcher.fetch(url).await?;
            extract_archive(&bytes, root)
        }
    }
}

async fn write_builtin(root: &Path) -> Result<()> {
    for file in builtin::files() {
        let dest = root.join(materialized_path(Path::new(file.path))?);
        if let Some(parent) = dest.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }
        tokio::fs::write(&dest, file.contents).await?;
    }
    Ok(())
}

/// Unpack a gzipped tarball into `root`, stripping the archive's single
/// leading directory so contents land directly inside the destination.
fn extract_archive(bytes: &[u8], root: &Path) -> Result<()> {
    let decoder = GzDecoder::new(bytes);
    let mut archive = Archive::new(decoder);

    for entry in archive
        .entries()
        .map_err(|e| ScaffoldError::Download(format!("unreadable archive: {}", e)))?
    {
        let mut entry =
            entry.map_err(|e| ScaffoldError::Download(format!("unreadable archive entry: {}", e)))?;
        let path = entry
            .path()
            .map_err(|e| ScaffoldError::Download(format!("bad entry path: {}", e)))?
            .into_owned();

        // Drop the archive's root folder ("template-main/...").
        let mut components = path.components();
        components.next();
        let stripped = components.as_path();
        if stripped.as_os_str().is_empty() {
            continue;
        }

        let dest = root.join(materialized_path(stripped)?);
        if entry.header().entry_type().is_dir() {
            std::fs::create_dir_all(&dest)?;
            continue;
        }
        if let Some(parent) = dest.parent() {
            std::fs::create_dir_all(parent)?;
        }
        entry
            .unpack(&dest)
            .map_err(|e| ScaffoldError::Download(format!("failed to extract {}: {}", dest.display(), e)))?;
    }

    Ok(())
}

/// Validate a template-relative path and rewrite its final component
/// through the rename table.
fn materialized_path(relative: &Path) -> Result<PathBuf> {
    let mut out = PathBuf::new();
    for component in relative.components() {
        match component {
            Component::Normal(part) => out.push(part),
            Component::CurDir => {}
            _ => {
                return Err(ScaffoldError::Download(format!(
                    "archive entry escapes the destination: {}",
                    relative.display()
                )))
            }
        }
    }

    if let Some(name) = out.file_name().and_then(|n| n.to_str()) {
        let renamed = materialized_name(name).to_string();
        if renamed != name {
            out.set_file_name(renamed);
        }
    }
    Ok(out)
}

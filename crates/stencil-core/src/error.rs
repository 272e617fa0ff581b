use std::path::PathBuf;

use thiserror::Error;

/// Core error type for scaffolding operations.
#[derive(Error, Debug)]
pub enum ScaffoldError {
    #[error("the application path is not writable: {0}")]
    PathNotWritable(PathBuf),

    #[error("cannot create a project named {name:?}")]
    NameInvalid { name: String, problems: Vec<String> },

    #[error("the directory {dir} contains files that could conflict")]
    DirectoryNotEmpty { dir: PathBuf, conflicts: Vec<String> },

    #[error("download failed: {0}")]
    Download(String),

    #[error("`{command}` exited with code {code}")]
    Install { command: String, code: i32 },

    #[error("configuration error: {0}")]
    Config(String),

    #[error("prompt error: {0}")]
    Prompt(String),

    #[error("internal error: {0}")]
    Internal(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ScaffoldError {
    /// Whether this failure came from fetching a remote asset and may be
    /// retried with the builtin template.
    pub fn is_download(&self) -> bool {
        matches!(self, ScaffoldError::Download(_))
    }
}

/// Result type alias using ScaffoldError.
pub type Result<T> = std::result::Result<T, ScaffoldError>;

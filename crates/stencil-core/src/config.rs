use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Result, ScaffoldError};

/// Scaffolding policy configuration.
///
/// Every field has a default matching the conventions of the npm ecosystem
/// the generated frontend lives in; a TOML file can override any of them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScaffoldConfig {
    /// Project naming rules.
    #[serde(default)]
    pub naming: NamingPolicy,

    /// Which pre-existing entries a target directory may contain.
    #[serde(default)]
    pub emptiness: EmptinessPolicy,

    /// Template source configuration.
    #[serde(default)]
    pub template: TemplateConfig,
}

impl ScaffoldConfig {
    /// Load configuration from a TOML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ScaffoldError::Config(format!("failed to read config file: {}", e)))?;

        Self::parse_toml(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse_toml(content: &str) -> Result<Self> {
        toml::from_str(content)
            .map_err(|e| ScaffoldError::Config(format!("failed to parse config: {}", e)))
    }

    /// Load from an optional file path, falling back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(p) => Self::from_file(p),
            None => Ok(Self::default()),
        }
    }
}

impl Default for ScaffoldConfig {
    fn default() -> Self {
        Self {
            naming: NamingPolicy::default(),
            emptiness: EmptinessPolicy::default(),
            template: TemplateConfig::default(),
        }
    }
}

/// Naming rules applied to the project directory's basename.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingPolicy {
    /// Maximum name length.
    #[serde(default = "default_max_name_length")]
    pub max_length: usize,

    /// Names that cannot be used because the package registry reserves them.
    #[serde(default = "default_reserved_names")]
    pub reserved: Vec<String>,
}

impl Default for NamingPolicy {
    fn default() -> Self {
        Self {
            max_length: default_max_name_length(),
            reserved: default_reserved_names(),
        }
    }
}

fn default_max_name_length() -> usize {
    214
}

fn default_reserved_names() -> Vec<String> {
    [
        "node_modules",
        "favicon.ico",
        "assert",
        "buffer",
        "child_process",
        "cluster",
        "console",
        "constants",
        "crypto",
        "dgram",
        "dns",
        "domain",
        "events",
        "fs",
        "http",
        "https",
        "module",
        "net",
        "os",
        "path",
        "punycode",
        "querystring",
        "readline",
        "repl",
        "stream",
        "string_decoder",
        "sys",
        "timers",
        "tls",
        "tty",
        "url",
        "util",
        "vm",
        "zlib",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

/// Entries a target directory may already contain without counting as
/// non-empty.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmptinessPolicy {
    /// Exact filenames that are tolerated.
    #[serde(default = "default_allowed_files")]
    pub allowed_files: Vec<String>,

    /// File extensions (without the dot) that are tolerated.
    #[serde(default = "default_allowed_extensions")]
    pub allowed_extensions: Vec<String>,
}

impl Default for EmptinessPolicy {
    fn default() -> Self {
        Self {
            allowed_files: default_allowed_files(),
            allowed_extensions: default_allowed_extensions(),
        }
    }
}

fn default_allowed_files() -> Vec<String> {
    [
        ".DS_Store",
        ".git",
        ".gitattributes",
        ".gitignore",
        ".gitlab-ci.yml",
        ".hg",
        ".hgcheck",
        ".hgignore",
        ".idea",
        ".npmignore",
        ".travis.yml",
        "LICENSE",
        "Thumbs.db",
        "docs",
        "mkdocs.yml",
        "npm-debug.log",
        "yarn-debug.log",
        "yarn-error.log",
        // Produced by an earlier attempt of the scaffolder itself; the
        // fallback retry re-runs the whole pipeline against it.
        "frontend",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_allowed_extensions() -> Vec<String> {
    // IntelliJ project files
    vec!["iml".to_string()]
}

/// Template source configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemplateConfig {
    /// URL of the remote template archive (gzipped tarball).
    #[serde(default = "default_remote_url")]
    pub remote_url: String,
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            remote_url: default_remote_url(),
        }
    }
}

fn default_remote_url() -> String {
    "https://codeload.github.com/stencil-dev/dapp-template/tar.gz/refs/heads/main".to_string()
}

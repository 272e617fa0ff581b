use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::info;

use crate::error::Result;

/// Runtime packages every generated app starts with.
pub const DEPENDENCIES: &[&str] = &[
    "react@^18",
    "react-dom@^18",
    "react-scripts@^5",
    "typescript@^4",
    "web-vitals@^2",
    "fuels@0.28.0",
    "@testing-library/jest-dom",
    "@testing-library/react",
    "@testing-library/user-event",
    "@types/jest",
    "@types/node",
    "@types/react",
    "@types/react-dom",
];

/// Development-only packages. Currently none; the installer skips the call
/// when the list is empty.
pub const DEV_DEPENDENCIES: &[&str] = &[];

/// The generated project's package descriptor.
///
/// Field order is the serialization order, so output is byte-stable for a
/// given project name. The dependency lists drive the installer and are
/// recorded in the on-disk manifest by the package manager itself.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectManifest {
    pub name: String,
    pub version: String,
    pub private: bool,
    pub scripts: Scripts,
    pub eslint_config: EslintConfig,
    pub browserslist: Browserslist,

    #[serde(skip)]
    pub dependencies: &'static [&'static str],
    #[serde(skip)]
    pub dev_dependencies: &'static [&'static str],
}

/// Build-tool entry points of the generated app.
#[derive(Debug, Clone, Serialize)]
pub struct Scripts {
    pub start: String,
    pub build: String,
    pub test: String,
    pub eject: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct EslintConfig {
    pub extends: Vec<String>,
}

/// Browser targets for production and development builds.
#[derive(Debug, Clone, Serialize)]
pub struct Browserslist {
    pub production: Vec<String>,
    pub development: Vec<String>,
}

impl ProjectManifest {
    /// The fixed manifest for a new app with the given name.
    pub fn for_app(name: &str) -> Self {
        Self {
            name: name.to_string(),
            version: "0.1.0".to_string(),
            private: true,
            scripts: Scripts {
                start: "react-scripts start".to_string(),
                build: "react-scripts build".to_string(),
                test: "react-scripts test".to_string(),
                eject: "react-scripts eject".to_string(),
            },
            eslint_config: EslintConfig {
                extends: vec!["react-app".to_string(), "react-app/jest".to_string()],
            },
            browserslist: Browserslist {
                production: vec![
                    ">0.2%".to_string(),
                    "not dead".to_string(),
                    "not op_mini all".to_string(),
                ],
                development: vec![
                    "last 1 chrome version".to_string(),
                    "last 1 firefox version".to_string(),
                    "last 1 safari version".to_string(),
                ],
            },
            dependencies: DEPENDENCIES,
            dev_dependencies: DEV_DEPENDENCIES,
        }
    }

    /// Serialize with two-space indentation and a trailing newline.
    pub fn render(&self) -> String {
        let mut out = serde_json::to_string_pretty(self).unwrap_or_default();
        out.push('\n');
        out
    }

    /// Persist to `package.json` inside `dir`. Installers read the manifest
    /// from disk, so this must complete before any install call.
    pub async fn write_to(&self, dir: &Path) -> Result<PathBuf> {
        let path = dir.join("package.json");
        tokio::fs::write(&path, self.render()).await?;
        info!("wrote {}", path.display());
        Ok(path)
    }
}

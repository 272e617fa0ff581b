use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::debug;

/// Package manager used to install the generated frontend's dependencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PackageManager {
    Npm,
    Pnpm,
    Yarn,
}

impl PackageManager {
    /// Resolve from explicit CLI flags, defaulting to yarn.
    pub fn from_flags(use_npm: bool, use_pnpm: bool) -> Self {
        if use_npm {
            PackageManager::Npm
        } else if use_pnpm {
            PackageManager::Pnpm
        } else {
            PackageManager::Yarn
        }
    }

    /// Program name to invoke.
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Pnpm => "pnpm",
            PackageManager::Yarn => "yarn",
        }
    }

    /// Lockfile this manager writes; tolerated by the emptiness check.
    pub fn lockfile(&self) -> &'static str {
        match self {
            PackageManager::Npm => "package-lock.json",
            PackageManager::Pnpm => "pnpm-lock.yaml",
            PackageManager::Yarn => "yarn.lock",
        }
    }

    /// Registry endpoint probed for reachability.
    pub fn registry_url(&self) -> &'static str {
        match self {
            PackageManager::Yarn => "https://registry.yarnpkg.com",
            _ => "https://registry.npmjs.org",
        }
    }

    /// Whether this manager can install from a local cache when offline.
    /// Only then is the online/offline distinction worth probing for.
    pub fn has_offline_cache(&self) -> bool {
        matches!(self, PackageManager::Yarn)
    }

    /// How a script is invoked in the generated project, for user-facing
    /// hints ("yarn start" vs "npm run start").
    pub fn run_command(&self, script: &str) -> String {
        match self {
            PackageManager::Yarn => format!("yarn {}", script),
            _ => format!("{} run {}", self.program(), script),
        }
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// Reachability probe against a package registry.
pub trait RegistryProbe: Send + Sync {
    /// True when the host answered within the probe deadline. Timeouts and
    /// resolution failures mean unreachable, never an error.
    fn is_reachable<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>>;
}

/// Probe backed by a short-deadline HTTP request.
pub struct HttpProbe {
    timeout: Duration,
}

impl HttpProbe {
    pub fn new() -> Self {
        Self {
            timeout: Duration::from_secs(5),
        }
    }
}

impl Default for HttpProbe {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistryProbe for HttpProbe {
    fn is_reachable<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            let client = match reqwest::Client::builder().timeout(self.timeout).build() {
                Ok(client) => client,
                Err(_) => return false,
            };
            // Any response at all counts as reachable; only transport-level
            // failures (DNS, connect, timeout) mean offline.
            match client.head(url).send().await {
                Ok(_) => true,
                Err(e) => {
                    debug!("registry probe failed: {}", e);
                    false
                }
            }
        })
    }
}

/// Determine whether installation should assume network access.
///
/// Managers without offline-cache semantics skip the probe entirely and
/// assume online. The result is computed once per scaffolding attempt and
/// reused by every install call in it.
pub async fn resolve_online(pm: PackageManager, probe: &dyn RegistryProbe) -> bool {
    if !pm.has_offline_cache() {
        return true;
    }
    probe.is_reachable(pm.registry_url()).await
}

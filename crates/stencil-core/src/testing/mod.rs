//! In-memory capability implementations.
//!
//! Every external collaborator of the scaffolding pipeline (child-process
//! runner, template fetch, registry probe, interactive prompt) has a fake
//! here so the whole flow can be exercised without network, registry, or
//! terminal access.

use std::collections::VecDeque;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use crate::error::{Result, ScaffoldError};
use crate::install::{CommandOutcome, CommandRunner};
use crate::pkgman::RegistryProbe;
use crate::scaffold::Prompter;
use crate::template::TemplateFetcher;

/// A recorded child-process invocation.
#[derive(Debug, Clone)]
pub struct RecordedCall {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: PathBuf,
}

/// Command runner that replays scripted outcomes and records every call.
pub struct ScriptedRunner {
    outcomes: Mutex<VecDeque<CommandOutcome>>,
    calls: Mutex<Vec<RecordedCall>>,
}

impl ScriptedRunner {
    /// Every invocation succeeds.
    pub fn always_ok() -> Self {
        Self::with_outcomes(Vec::new())
    }

    /// Replay `outcomes` in order; once exhausted, succeed.
    pub fn with_outcomes(outcomes: Vec<CommandOutcome>) -> Self {
        Self {
            outcomes: Mutex::new(outcomes.into()),
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Invocations recorded so far.
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().map(|c| c.clone()).unwrap_or_default()
    }
}

impl CommandRunner for ScriptedRunner {
    fn run<'a>(
        &'a self,
        program: &'a str,
        args: &'a [String],
        cwd: &'a Path,
    ) -> Pin<Box<dyn Future<Output = Result<CommandOutcome>> + Send + 'a>> {
        Box::pin(async move {
            if let Ok(mut calls) = self.calls.lock() {
                calls.push(RecordedCall {
                    program: program.to_string(),
                    args: args.to_vec(),
                    cwd: cwd.to_path_buf(),
                });
            }
            let next = self.outcomes.lock().ok().and_then(|mut q| q.pop_front());
            Ok(next.unwrap_or_else(CommandOutcome::success))
        })
    }
}

/// Template fetcher that serves fixed bytes, or always fails.
pub struct StaticFetcher {
    bytes: Option<Vec<u8>>,
    fetches: AtomicUsize,
}

impl StaticFetcher {
    /// Serve the given archive bytes.
    pub fn ok(bytes: Vec<u8>) -> Self {
        Self {
            bytes: Some(bytes),
            fetches: AtomicUsize::new(0),
        }
    }

    /// Fail every fetch with a download error.
    pub fn unreachable() -> Self {
        Self {
            bytes: None,
            fetches: AtomicUsize::new(0),
        }
    }

    /// Number of fetch attempts seen.
    pub fn fetches(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

impl TemplateFetcher for StaticFetcher {
    fn fetch<'a>(&'a self, url: &'a str) -> Pin<Box<dyn Future<Output = Result<Vec<u8>>> + Send + 'a>> {
        Box::pin(async move {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match &self.bytes {
                Some(bytes) => Ok(bytes.clone()),
                None => Err(ScaffoldError::Download(format!("cannot reach {}", url))),
            }
        })
    }
}

/// Registry probe with a fixed answer.
pub struct FixedProbe {
    reachable: bool,
    calls: AtomicUsize,
}

impl FixedProbe {
    pub fn new(reachable: bool) -> Self {
        Self {
            reachable,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl RegistryProbe for FixedProbe {
    fn is_reachable<'a>(&'a self, _url: &'a str) -> Pin<Box<dyn Future<Output = bool> + Send + 'a>> {
        Box::pin(async move {
            self.calls.fetch_add(1, Ordering::SeqCst);
            self.reachable
        })
    }
}

/// Prompter with a scripted fallback answer.
pub struct ScriptedPrompter {
    accept_fallback: bool,
    prompts: AtomicUsize,
}

impl ScriptedPrompter {
    pub fn accepting() -> Self {
        Self {
            accept_fallback: true,
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn declining() -> Self {
        Self {
            accept_fallback: false,
            prompts: AtomicUsize::new(0),
        }
    }

    /// How many times the fallback question was asked.
    pub fn prompts(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

impl Prompter for ScriptedPrompter {
    fn confirm_fallback(&self) -> Result<bool> {
        self.prompts.fetch_add(1, Ordering::SeqCst);
        Ok(self.accept_fallback)
    }
}

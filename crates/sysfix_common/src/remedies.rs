//! Remedies - the system calls behind each action
//!
//! Best effort only. The executor decides whether to call these; this module
//! just performs the call and reports what happened.

use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;
use crate::probes::memory::is_thread;
use sysinfo::{Pid, Process, System};
use tracing::{debug, info, warn};
use walkdir::WalkDir;

/// Command used to drop kernel page caches (needs passwordless sudo)
const DROP_CACHES_SCRIPT: &str = "sync; echo 3 > /proc/sys/vm/drop_caches";

/// Remedy errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemedyError {
    #[error("no running process matches '{0}'")]
    NoMatchingProcess(String),

    #[error("could not terminate {failed} process(es) matching '{pattern}'")]
    TerminateFailed { pattern: String, failed: usize },

    #[error("command failed: {0}")]
    CommandFailed(String),

    #[error("nothing could be cleaned: {0}")]
    NothingCleaned(String),

    #[error("I/O error: {0}")]
    Io(String),
}

/// Side-effect collaborators used by the executor
pub trait SystemActions {
    /// Terminate processes matching `pattern`; returns how many were killed
    fn terminate_process(&self, pattern: &str) -> Result<usize, RemedyError>;

    /// Clear caches; returns bytes reclaimed
    fn reclaim_disk_space(&self) -> Result<u64, RemedyError>;

    /// Relieve memory pressure
    fn optimize_memory(&self) -> Result<(), RemedyError>;
}

impl<A: SystemActions + ?Sized> SystemActions for Box<A> {
    fn terminate_process(&self, pattern: &str) -> Result<usize, RemedyError> {
        (**self).terminate_process(pattern)
    }

    fn reclaim_disk_space(&self) -> Result<u64, RemedyError> {
        (**self).reclaim_disk_space()
    }

    fn optimize_memory(&self) -> Result<(), RemedyError> {
        (**self).optimize_memory()
    }
}

/// Real remedies acting on this host
#[derive(Debug, Clone, Default)]
pub struct HostActions {
    cache_dirs: Vec<PathBuf>,
}

impl HostActions {
    /// Clean the user cache directory plus `extra_dirs`
    pub fn new(extra_dirs: &[PathBuf]) -> Self {
        let mut cache_dirs: Vec<PathBuf> = dirs::cache_dir().into_iter().collect();
        cache_dirs.extend(extra_dirs.iter().cloned());
        Self { cache_dirs }
    }

    /// Clean exactly these directories
    pub fn with_cache_dirs(cache_dirs: Vec<PathBuf>) -> Self {
        Self { cache_dirs }
    }

    pub fn cache_dirs(&self) -> &[PathBuf] {
        &self.cache_dirs
    }
}

/// Whether a process name matches a termination pattern.
///
/// Exact match, or the pattern followed by a non-alphanumeric separator
/// (`chrome_crashpad`, `firefox-bin`); `chromedriver` does not match `chrome`.
pub fn process_matches(name: &str, pattern: &str) -> bool {
    let name = name.to_lowercase();
    let pattern = pattern.to_lowercase();
    if pattern.is_empty() {
        return false;
    }
    match name.strip_prefix(&pattern) {
        Some(rest) => rest.chars().next().map_or(true, |c| !c.is_alphanumeric()),
        None => false,
    }
}

/// Processes (not threads) matching `pattern`, excluding `own_pid`
pub fn termination_targets<'a>(
    system: &'a System,
    pattern: &str,
    own_pid: u32,
) -> Vec<(&'a Pid, &'a Process)> {
    system
        .processes()
        .iter()
        .filter(|(pid, process)| {
            pid.as_u32() != own_pid && !is_thread(process) && process_matches(process.name(), pattern)
        })
        .collect()
}

/// Total size of regular files under `path`
pub fn dir_size(path: &Path) -> u64 {
    WalkDir::new(path)
        .follow_links(false)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter_map(|e| e.metadata().ok())
        .filter(|m| m.is_file())
        .map(|m| m.len())
        .sum()
}

/// Remove every entry inside `dir`, keeping `dir` itself
pub fn clear_dir(dir: &Path) -> Result<u64, RemedyError> {
    let entries = std::fs::read_dir(dir).map_err(|e| RemedyError::Io(e.to_string()))?;
    let mut freed = 0u64;

    for entry in entries.flatten() {
        let path = entry.path();
        let size = dir_size(&path);
        let is_dir = entry.file_type().map(|t| t.is_dir()).unwrap_or(false);
        let removed = if is_dir {
            std::fs::remove_dir_all(&path)
        } else {
            std::fs::remove_file(&path)
        };
        match removed {
            Ok(()) => freed += size,
            Err(e) => debug!("could not remove {}: {}", path.display(), e),
        }
    }

    Ok(freed)
}

impl SystemActions for HostActions {
    fn terminate_process(&self, pattern: &str) -> Result<usize, RemedyError> {
        let system = System::new_all();
        let own_pid = std::process::id();

        let mut killed = 0;
        let mut failed = 0;
        for (pid, process) in termination_targets(&system, pattern, own_pid) {
            if process.kill() {
                info!("terminated {} (PID {})", process.name(), pid);
                killed += 1;
            } else {
                warn!("failed to terminate {} (PID {})", process.name(), pid);
                failed += 1;
            }
        }

        match (killed, failed) {
            (0, 0) => Err(RemedyError::NoMatchingProcess(pattern.to_string())),
            (0, failed) => Err(RemedyError::TerminateFailed {
                pattern: pattern.to_string(),
                failed,
            }),
            (killed, _) => Ok(killed),
        }
    }

    fn reclaim_disk_space(&self) -> Result<u64, RemedyError> {
        let mut freed = 0u64;
        let mut cleaned_any = false;
        let mut errors = Vec::new();

        for dir in &self.cache_dirs {
            if !dir.is_dir() {
                debug!("cache dir {} not present, skipping", dir.display());
                continue;
            }
            match clear_dir(dir) {
                Ok(bytes) => {
                    info!("cleaned {} ({} bytes)", dir.display(), bytes);
                    freed += bytes;
                    cleaned_any = true;
                }
                Err(e) => {
                    warn!("failed to clean {}: {}", dir.display(), e);
                    errors.push(format!("{}: {}", dir.display(), e));
                }
            }
        }

        if !cleaned_any && !errors.is_empty() {
            return Err(RemedyError::NothingCleaned(errors.join("; ")));
        }
        Ok(freed)
    }

    fn optimize_memory(&self) -> Result<(), RemedyError> {
        // -n: fail instead of prompting for a password
        let output = Command::new("sudo")
            .args(["-n", "sh", "-c", DROP_CACHES_SCRIPT])
            .output()
            .map_err(|e| RemedyError::CommandFailed(format!("sudo: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RemedyError::CommandFailed(format!(
                "failed to drop caches (make sure you have sudo permissions): {}",
                stderr.trim()
            )));
        }
        info!("dropped kernel page caches");
        Ok(())
    }
}

/// Records what would be done without touching the system
#[derive(Debug, Default)]
pub struct DryRunActions {
    calls: Mutex<Vec<String>>,
    failure: Option<RemedyError>,
}

impl DryRunActions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record calls but fail each of them with `error`
    pub fn failing(error: RemedyError) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            failure: Some(error),
        }
    }

    /// Calls made so far, e.g. `terminate:chrome`
    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, call: String) -> Result<(), RemedyError> {
        info!("dry run: {}", call);
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        match &self.failure {
            Some(e) => Err(e.clone()),
            None => Ok(()),
        }
    }
}

impl SystemActions for DryRunActions {
    fn terminate_process(&self, pattern: &str) -> Result<usize, RemedyError> {
        self.record(format!("terminate:{}", pattern)).map(|_| 0)
    }

    fn reclaim_disk_space(&self) -> Result<u64, RemedyError> {
        self.record("reclaim_disk_space".to_string()).map(|_| 0)
    }

    fn optimize_memory(&self) -> Result<(), RemedyError> {
        self.record("optimize_memory".to_string())
    }
}

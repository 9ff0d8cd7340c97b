//! Memory hog probe

use super::{issue, Probe, ProbeError};
use crate::issue::Issue;
use sysinfo::{Process, System};

const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// A process over the memory threshold
#[derive(Debug, Clone, PartialEq)]
pub struct MemoryHog {
    pub name: String,
    pub pid: u32,
    pub rss_mb: f64,
}

pub struct MemoryProbe {
    threshold_mb: u64,
}

impl MemoryProbe {
    pub fn new(threshold_mb: u64) -> Self {
        Self { threshold_mb }
    }

    /// Processes at or above the threshold, largest first
    pub fn hogs(&self) -> Vec<MemoryHog> {
        let system = System::new_all();
        let threshold = self.threshold_mb as f64;
        let mut hogs: Vec<MemoryHog> = system
            .processes()
            .iter()
            .filter(|(_, process)| !is_thread(process))
            .map(|(pid, process)| MemoryHog {
                name: process.name().to_string(),
                pid: pid.as_u32(),
                rss_mb: process.memory() as f64 / BYTES_PER_MB,
            })
            .filter(|h| h.rss_mb >= threshold)
            .collect();
        hogs.sort_by(|a, b| b.rss_mb.total_cmp(&a.rss_mb).then(a.pid.cmp(&b.pid)));
        hogs
    }
}

/// Whether a process-table entry is a thread of another process.
///
/// On Linux every task shows up in the table and reports the RSS of the
/// whole process.
pub fn is_thread(process: &Process) -> bool {
    process.thread_kind().is_some()
}

/// Render the single memory issue text for a set of hogs
pub fn describe_hogs(hogs: &[MemoryHog]) -> Option<String> {
    if hogs.is_empty() {
        return None;
    }
    let listed = hogs
        .iter()
        .map(|h| format!("{} (PID {}) using {:.1} MB RAM", h.name, h.pid, h.rss_mb))
        .collect::<Vec<_>>()
        .join(", ");
    Some(format!("High memory usage by processes: {}...", listed))
}

impl Probe for MemoryProbe {
    fn name(&self) -> &'static str {
        "memory"
    }

    fn scan(&self) -> Result<Vec<Issue>, ProbeError> {
        match describe_hogs(&self.hogs()) {
            Some(text) => Ok(vec![issue(self.name(), text)?]),
            None => Ok(Vec::new()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Category;

    #[test]
    fn test_describe_hogs() {
        let hogs = vec![
            MemoryHog { name: "firefox".into(), pid: 42, rss_mb: 812.34 },
            MemoryHog { name: "code".into(), pid: 7, rss_mb: 640.0 },
        ];
        let text = describe_hogs(&hogs).unwrap();
        assert_eq!(
            text,
            "High memory usage by processes: firefox (PID 42) using 812.3 MB RAM, code (PID 7) using 640.0 MB RAM..."
        );
        assert_eq!(Issue::new(text).unwrap().category(), Category::Memory);
    }

    #[test]
    fn test_no_hogs_no_issue() {
        assert_eq!(describe_hogs(&[]), None);
    }

    #[test]
    fn test_threads_not_listed_as_hogs() {
        let (tx, rx) = std::sync::mpsc::channel::<()>();
        let rx = std::sync::Arc::new(std::sync::Mutex::new(rx));
        let workers: Vec<_> = (0..4)
            .map(|_| {
                let rx = rx.clone();
                std::thread::Builder::new()
                    .name("sysfix_mem_th".into())
                    .spawn(move || {
                        let _ = rx.lock().unwrap().recv();
                    })
                    .unwrap()
            })
            .collect();

        let hogs = MemoryProbe::new(0).hogs();
        let own_pid = std::process::id();

        drop(tx);
        for worker in workers {
            worker.join().unwrap();
        }

        assert_eq!(hogs.iter().filter(|h| h.pid == own_pid).count(), 1);
        assert!(hogs.iter().all(|h| h.name != "sysfix_mem_th"));
    }

    #[test]
    fn test_huge_threshold_finds_nothing() {
        let probe = MemoryProbe::new(u64::MAX / (1024 * 1024 * 1024));
        assert!(probe.scan().unwrap().is_empty());
    }
}

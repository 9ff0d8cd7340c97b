//! Storage capacity probe

use super::{issue, Probe, ProbeError};
use crate::issue::Issue;
use sysinfo::Disks;

pub struct StorageProbe {
    threshold_percent: f64,
}

impl StorageProbe {
    pub fn new(threshold_percent: f64) -> Self {
        Self { threshold_percent }
    }

    /// Mount points at or above the threshold, with their usage
    pub fn full_mounts(&self) -> Vec<(String, f64)> {
        let disks = Disks::new_with_refreshed_list();
        let mut mounts: Vec<(String, f64)> = disks
            .list()
            .iter()
            .filter_map(|disk| {
                usage_percent(disk.total_space(), disk.available_space())
                    .map(|pct| (disk.mount_point().display().to_string(), pct))
            })
            .filter(|(_, pct)| *pct >= self.threshold_percent)
            .collect();
        // Bind mounts show up more than once
        mounts.sort_by(|a, b| a.0.cmp(&b.0));
        mounts.dedup_by(|a, b| a.0 == b.0);
        mounts
    }
}

/// Used capacity in percent; None for zero-sized pseudo filesystems
pub fn usage_percent(total: u64, available: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(used as f64 / total as f64 * 100.0)
}

pub fn describe_mount(mount: &str, percent: f64) -> String {
    format!("High storage usage: {} at {:.1}% capacity.", mount, percent)
}

impl Probe for StorageProbe {
    fn name(&self) -> &'static str {
        "storage"
    }

    fn scan(&self) -> Result<Vec<Issue>, ProbeError> {
        self.full_mounts()
            .into_iter()
            .map(|(mount, pct)| issue(self.name(), describe_mount(&mount, pct)))
            .collect()
    }
}

//! Temperature probe

use super::{issue, Probe, ProbeError};
use crate::issue::Issue;
use sysinfo::Components;

pub struct TemperatureProbe {
    threshold_c: f32,
}

impl TemperatureProbe {
    pub fn new(threshold_c: f32) -> Self {
        Self { threshold_c }
    }
}

/// Split a sysinfo label like "coretemp Package id 0" into chip and sensor
pub fn split_label(label: &str) -> (&str, &str) {
    match label.split_once(' ') {
        Some((chip, sensor)) => (chip, sensor.trim()),
        None => (label, label),
    }
}

pub fn describe_reading(label: &str, celsius: f32) -> String {
    let (chip, sensor) = split_label(label);
    format!(
        "High temperature alert: {} sensor '{}' at {:.1}°C.",
        chip, sensor, celsius
    )
}

impl Probe for TemperatureProbe {
    fn name(&self) -> &'static str {
        "temperature"
    }

    fn scan(&self) -> Result<Vec<Issue>, ProbeError> {
        let components = Components::new_with_refreshed_list();
        if components.list().is_empty() {
            return Err(ProbeError::Unavailable {
                probe: self.name(),
                reason: "no temperature sensors found".to_string(),
            });
        }

        components
            .list()
            .iter()
            .filter(|c| c.temperature().is_finite() && c.temperature() >= self.threshold_c)
            .map(|c| issue(self.name(), describe_reading(c.label(), c.temperature())))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issue::Category;

    #[test]
    fn test_split_label() {
        assert_eq!(split_label("coretemp Package id 0"), ("coretemp", "Package id 0"));
        assert_eq!(split_label("acpitz"), ("acpitz", "acpitz"));
    }

    #[test]
    fn test_describe_reading() {
        let text = describe_reading("coretemp Core 0", 91.0);
        assert_eq!(text, "High temperature alert: coretemp sensor 'Core 0' at 91.0°C.");
        assert_eq!(Issue::new(text).unwrap().category(), Category::Temperature);
    }
}

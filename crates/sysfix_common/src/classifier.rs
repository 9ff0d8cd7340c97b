//! Intent Classifier - recommendation text to a closed-vocabulary action
//!
//! Keyword rules are checked in a fixed priority order; earlier rules win.
//! Termination is only ever produced for allow-listed application names.

use crate::action::Action;
use tracing::debug;

/// Applications the advisor may ask us to terminate
pub const DEFAULT_TERMINATE_ALLOWLIST: &[&str] = &[
    "chrome",
    "google-chrome",
    "chromium",
    "firefox",
    "brave",
    "opera",
    "vivaldi",
    "microsoft-edge",
    "plasmashell",
    "nautilus",
];

const TERMINATE_KEYWORDS: &[&str] = &["terminate", "kill"];
const DISK_KEYWORDS: &[&str] = &["free up space", "disk space", "storage"];
const OPTIMIZE_KEYWORDS: &[&str] = &["optimize"];
const SKIP_KEYWORDS: &[&str] = &["skip"];
const REVIEW_KEYWORDS: &[&str] = &["consult", "technician", "professional"];

/// Maps advisor recommendations to actions
#[derive(Debug, Clone)]
pub struct IntentClassifier {
    terminate_allowlist: Vec<String>,
}

impl Default for IntentClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_TERMINATE_ALLOWLIST.iter().copied())
    }
}

impl IntentClassifier {
    /// Build a classifier; entries are lower-cased and blanks dropped
    pub fn new<I, S>(allowlist: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terminate_allowlist = allowlist
            .into_iter()
            .map(|s| s.as_ref().trim().to_lowercase())
            .filter(|s| !s.is_empty())
            .collect();
        Self {
            terminate_allowlist,
        }
    }

    pub fn allowlist(&self) -> &[String] {
        &self.terminate_allowlist
    }

    /// Classify one recommendation
    pub fn classify(&self, recommendation: &str) -> Action {
        let lower = recommendation.to_lowercase();
        let action = self.classify_lower(&lower);
        debug!("classify: {:?} -> {}", recommendation, action.label());
        action
    }

    fn classify_lower(&self, lower: &str) -> Action {
        if lower.contains("bios") {
            return Action::bios_refusal();
        }

        if contains_any(lower, TERMINATE_KEYWORDS) {
            return match self.allowlisted_target(lower) {
                Some(target) => Action::terminate(target),
                // Never kill something we have not vetted
                None => Action::ManualReview,
            };
        }

        if contains_any(lower, DISK_KEYWORDS) {
            return Action::FreeDiskSpace;
        }

        if contains_any(lower, OPTIMIZE_KEYWORDS) {
            return Action::OptimizeMemory;
        }

        if contains_any(lower, SKIP_KEYWORDS) {
            return Action::Skip;
        }

        if contains_any(lower, REVIEW_KEYWORDS) {
            return Action::ManualReview;
        }

        Action::ManualReview
    }

    /// First allow-listed application named in the text, in text order
    fn allowlisted_target(&self, lower: &str) -> Option<String> {
        lower
            .split(|c: char| !(c.is_alphanumeric() || c == '-' || c == '_' || c == '.'))
            .map(|word| word.trim_matches('.'))
            .find(|word| self.terminate_allowlist.iter().any(|a| a == word))
            .map(str::to_string)
    }
}

/// Classify with the default allow-list
pub fn classify(recommendation: &str) -> Action {
    IntentClassifier::default().classify(recommendation)
}

fn contains_any(text: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|k| text.contains(k))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bios_refused_first() {
        assert_eq!(
            classify("Kill chrome and then update the BIOS"),
            Action::bios_refusal()
        );
    }

    #[test]
    fn test_terminate_allowlisted() {
        assert_eq!(
            classify("You should terminate chrome to free memory."),
            Action::terminate("chrome")
        );
        assert_eq!(
            classify("Kill Firefox, it is using too much RAM."),
            Action::terminate("firefox")
        );
    }

    #[test]
    fn test_terminate_not_allowlisted_is_manual() {
        assert_eq!(
            classify("You should kill the xterm process"),
            Action::ManualReview
        );
        // Unsafe kill intent does not fall through to later rules
        assert_eq!(
            classify("Kill sshd to free up space"),
            Action::ManualReview
        );
    }

    #[test]
    fn test_terminate_requires_whole_word() {
        assert_eq!(
            classify("kill the chromebook-helper"),
            Action::ManualReview
        );
    }

    #[test]
    fn test_first_target_in_text_order() {
        assert_eq!(
            classify("Terminate firefox or chrome, whichever is idle."),
            Action::terminate("firefox")
        );
    }

    #[test]
    fn test_disk_rules() {
        assert_eq!(classify("Free up space in your home directory"), Action::FreeDiskSpace);
        assert_eq!(classify("Low disk space: remove old logs"), Action::FreeDiskSpace);
        assert_eq!(classify("Clean up storage"), Action::FreeDiskSpace);
    }

    #[test]
    fn test_optimize_skip_consult() {
        assert_eq!(classify("Optimize memory by dropping caches"), Action::OptimizeMemory);
        assert_eq!(classify("Skip this, it is harmless."), Action::Skip);
        assert_eq!(classify("Consult a technician"), Action::ManualReview);
    }

    #[test]
    fn test_priority_disk_over_optimize() {
        assert_eq!(
            classify("Optimize storage by removing caches"),
            Action::FreeDiskSpace
        );
    }

    #[test]
    fn test_unrecognized_is_manual_review() {
        assert_eq!(
            classify("Close unused browser tabs to free memory."),
            Action::ManualReview
        );
        assert_eq!(classify("Reboot when convenient."), Action::ManualReview);
        assert_eq!(classify(""), Action::ManualReview);
    }

    #[test]
    fn test_custom_allowlist() {
        let classifier = IntentClassifier::new([" Slack ", "", "discord"]);
        assert_eq!(classifier.allowlist(), &["slack".to_string(), "discord".to_string()]);
        assert_eq!(classifier.classify("kill slack"), Action::terminate("slack"));
        assert_eq!(classifier.classify("kill firefox"), Action::ManualReview);
    }

    #[test]
    fn test_deterministic() {
        let text = "Please terminate chromium and then skip the rest";
        let first = classify(text);
        for _ in 0..5 {
            assert_eq!(classify(text), first);
        }
        assert_eq!(first, Action::terminate("chromium"));
    }
}

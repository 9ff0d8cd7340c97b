//! Automation state - whether destructive actions still need confirmation
//!
//! `Manual` -> `Automated` is the only transition. There is no way back
//! within a session.

use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum AutomationMode {
    #[default]
    Manual,
    Automated,
}

/// Session-scoped automation flag
#[derive(Debug, Clone, Default)]
pub struct AutomationState {
    mode: AutomationMode,
}

impl AutomationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mode(&self) -> AutomationMode {
        self.mode
    }

    /// True once the operator chose to automate all remaining fixes
    pub fn automate_all(&self) -> bool {
        self.mode == AutomationMode::Automated
    }

    /// Switch to automated mode for the rest of the session
    pub fn enable(&mut self) {
        self.mode = AutomationMode::Automated;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_manual() {
        let state = AutomationState::new();
        assert_eq!(state.mode(), AutomationMode::Manual);
        assert!(!state.automate_all());
    }

    #[test]
    fn test_enable_is_one_way() {
        let mut state = AutomationState::new();
        state.enable();
        assert!(state.automate_all());
        state.enable();
        assert_eq!(state.mode(), AutomationMode::Automated);
    }
}

//! Advisor prompt construction

use crate::issue::Issue;

/// Safety rules prepended to every advisory request
pub const SAFETY_PREAMBLE: &str = "\
Do NOT recommend closing browsers or actively used programs unless you first ask the user for confirmation, \
or unless the program is clearly idle or unresponsive. \
If recommending to close a browser or other program, always warn the user and suggest saving work first. \
Never suggest updating, flashing or modifying the BIOS or firmware settings.";

/// Build the full prompt for one issue
pub fn build_prompt(issue: &Issue) -> String {
    format!(
        "You are a Linux systems expert AI. The following issue was detected:\n\n\
         {}\n\n\
         Provide a concise and practical recommendation on how to fix this issue, or what steps to take next. \
         {}\n\n\
         End your answer with a single line that starts with \"Recommendation:\".",
        issue.text(),
        SAFETY_PREAMBLE
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_issue_and_preamble() {
        let issue = Issue::new("Wi-Fi keeps dropping every hour").unwrap();
        let prompt = build_prompt(&issue);
        assert!(prompt.contains("Wi-Fi keeps dropping every hour"));
        assert!(prompt.contains(SAFETY_PREAMBLE));
        assert!(prompt.contains("Recommendation:"));
    }

    #[test]
    fn test_preamble_forbids_bios_changes() {
        assert!(SAFETY_PREAMBLE.to_lowercase().contains("never suggest"));
        assert!(SAFETY_PREAMBLE.contains("BIOS"));
    }
}

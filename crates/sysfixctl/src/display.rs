//! Terminal output - ASCII tags, no emojis
//!
//! Everything here returns a String so callers decide where it goes.

use owo_colors::OwoColorize;
use sysfix_common::action::{Action, FixOutcome, DETAIL_DECLINED, DETAIL_SKIPPED};
use sysfix_common::advisor::OllamaModel;
use sysfix_common::executor::format_bytes;
use sysfix_common::Issue;

/// Numbered issue list, as printed by `check`
pub fn format_issue_list(issues: &[Issue]) -> String {
    if issues.is_empty() {
        return format!("{} No issues detected.", "[OK]".bright_green());
    }

    let mut out = String::from("Diagnostics results:\n");
    for (i, issue) in issues.iter().enumerate() {
        out.push_str(&format!("  {}. {}\n", i + 1, issue));
    }
    out.push_str(&format!(
        "\nRun {} to fix one issue, or {} to work through all of them.",
        "sysfixctl fix <N>".cyan(),
        "sysfixctl check --fix".cyan()
    ));
    out
}

/// Status tag for one outcome
pub fn status_tag(outcome: &FixOutcome) -> String {
    if outcome.succeeded {
        return "[OK]".bright_green().to_string();
    }
    match &outcome.action {
        Action::Refuse { .. } => "[REFUSED]".bright_red().to_string(),
        Action::ManualReview => "[MANUAL]".yellow().to_string(),
        Action::Skip => "[SKIPPED]".dimmed().to_string(),
        _ if outcome.detail.starts_with(DETAIL_DECLINED) => "[DECLINED]".yellow().to_string(),
        _ if outcome.detail.starts_with(DETAIL_SKIPPED) => "[SKIPPED]".dimmed().to_string(),
        _ => "[FAILED]".bright_red().to_string(),
    }
}

/// One outcome block: tag, issue, action taken, guidance
pub fn format_outcome(index: usize, outcome: &FixOutcome) -> String {
    let mut out = format!("{} {}. {}\n", status_tag(outcome), index, outcome.issue);
    out.push_str(&format!("     action: {} ({})\n", outcome.action, outcome.detail));
    if let Some(guidance) = &outcome.guidance {
        for line in guidance.lines().filter(|l| !l.trim().is_empty()) {
            out.push_str(&format!("     {}\n", line.trim_end()));
        }
    }
    out
}

/// Closing line after a remediation round
pub fn format_summary(outcomes: &[FixOutcome], dry_run: bool) -> String {
    let fixed = outcomes.iter().filter(|o| o.succeeded).count();
    let manual = outcomes.iter().filter(|o| o.is_manual()).count();
    let mut line = format!(
        "{} issue(s): {} fixed, {} need manual review, {} not fixed",
        outcomes.len(),
        fixed,
        manual,
        outcomes.len() - fixed - manual
    );
    if dry_run {
        line.push_str(&format!(" {}", "(dry run, nothing was changed)".dimmed()));
    }
    line
}

/// Report for the `advisor` command
pub fn format_advisor_status(
    endpoint: &str,
    model: &str,
    alive: bool,
    models: &[OllamaModel],
    has_model: bool,
) -> String {
    if !alive {
        return format!(
            "{} AI advisor not reachable at {}\n     Start it with: ollama serve",
            "[ERROR]".bright_red(),
            endpoint
        );
    }

    let mut out = format!("{} AI advisor reachable at {}\n", "[OK]".bright_green(), endpoint);
    if has_model {
        out.push_str(&format!("{} Model {} is available\n", "[OK]".bright_green(), model));
    } else {
        out.push_str(&format!(
            "{} Model {} not found. Pull it with: ollama pull {}\n",
            "[WARNING]".yellow(),
            model,
            model
        ));
    }
    if !models.is_empty() {
        out.push_str("Installed models:\n");
        for m in models {
            out.push_str(&format!("  * {} ({})\n", m.name, format_bytes(m.size)));
        }
    }
    out
}

//! End-to-end tests for the issue-to-action decision engine.
//!
//! Covers:
//! - extraction + classification scenarios on literal advisor text
//! - BIOS issues never reach the advisor and never run anything
//! - automation is one-way and stops all further prompts
//! - unreachable backend degrades to manual review
//! - failed remedies do not abort the remaining queue

use std::time::Duration;
use sysfix_common::advisor::{extract_recommendation, AdvisoryBridge, BackendError, FakeBackend};
use sysfix_common::classifier::{classify, IntentClassifier};
use sysfix_common::confirm::{Choice, ScriptedConfirmer};
use sysfix_common::executor::Executor;
use sysfix_common::remedies::{DryRunActions, RemedyError};
use sysfix_common::router::{route, Decision, HandlerId};
use sysfix_common::{Action, Issue, RemediationEngine};

type Engine = RemediationEngine<FakeBackend, DryRunActions, ScriptedConfirmer>;

fn engine_with(backend: FakeBackend, actions: DryRunActions, answers: Vec<Choice>) -> Engine {
    RemediationEngine::new(
        AdvisoryBridge::new(backend, Duration::from_secs(30)),
        IntentClassifier::default(),
        Executor::new(actions),
        ScriptedConfirmer::new(answers),
    )
}

fn engine(backend: FakeBackend, answers: Vec<Choice>) -> Engine {
    engine_with(backend, DryRunActions::new(), answers)
}

fn issue(text: &str) -> Issue {
    Issue::new(text).unwrap()
}

// ============================================================================
// Literal-text scenarios
// ============================================================================

#[test]
fn test_thinking_text_with_marker() {
    let raw = "Okay let me think.\nWait, that's not right.\nRecommendation: Close unused browser tabs to free memory.";
    let extracted = extract_recommendation(raw);
    assert_eq!(extracted, "Close unused browser tabs to free memory.");
    assert_eq!(classify(&extracted), Action::ManualReview);
}

#[test]
fn test_thinking_text_without_marker() {
    let raw = "Okay, memory is high.\nFirst, check what is running.\nThe browser is the largest consumer.\nYou should terminate chrome to free memory.";
    let extracted = extract_recommendation(raw);
    assert_eq!(extracted, "You should terminate chrome to free memory.");
    assert_eq!(classify(&extracted), Action::terminate("chrome"));
}

#[test]
fn test_kill_outside_allowlist_is_manual_review() {
    assert_eq!(classify("You should kill the xterm process"), Action::ManualReview);
}

#[test]
fn test_ambiguous_advice_is_never_destructive() {
    for text in [
        "Reboot your machine.",
        "Have you tried turning it off and on again?",
        "Update your packages regularly.",
        "",
    ] {
        let action = classify(text);
        assert_eq!(action, Action::ManualReview, "text: {:?}", text);
        assert!(!action.is_destructive());
    }
}

#[test]
fn test_extract_and_classify_deterministic() {
    let raw = "Hmm.\nLet me think about disk usage.\n**Recommendation:** free up space in /var/cache";
    let first = classify(&extract_recommendation(raw));
    for _ in 0..10 {
        assert_eq!(classify(&extract_recommendation(raw)), first);
    }
    assert_eq!(first, Action::FreeDiskSpace);
}

#[test]
fn test_storage_issue_is_deterministic_without_advisor() {
    let storage = issue("High storage usage: / at 95.0% capacity.");
    assert_eq!(route(&storage), Decision::Deterministic(HandlerId::Storage));

    let mut engine = engine(FakeBackend::answering("kill firefox"), vec![Choice::Yes]);
    let outcome = engine.remediate_one(&storage);
    assert_eq!(outcome.action, Action::FreeDiskSpace);
    assert!(outcome.succeeded);
    assert_eq!(engine.bridge().backend().call_count(), 0);
}

// ============================================================================
// BIOS invariant
// ============================================================================

#[test]
fn test_bios_issues_always_refused() {
    let texts = [
        "WARNING: BIOS info detected. DO NOT attempt automated BIOS updates or changes.",
        "bios flashing is dangerous and can brick your computer if done incorrectly.",
        "Unknown Bios setting drift",
    ];
    // The advisor would happily suggest something destructive
    let mut engine = engine(
        FakeBackend::answering("Recommendation: free up disk space"),
        vec![Choice::AutomateAll, Choice::Yes, Choice::Yes],
    );

    for text in texts {
        let bios = issue(text);
        assert_eq!(route(&bios), Decision::Deterministic(HandlerId::Bios));
        let outcome = engine.remediate_one(&bios);
        assert_eq!(outcome.action, Action::bios_refusal());
        assert!(!outcome.succeeded);
        assert_eq!(outcome.detail, "manual");
    }

    assert_eq!(engine.bridge().backend().call_count(), 0);
    assert!(engine.executor().actions().calls().is_empty());
    assert_eq!(engine.confirmer().prompt_count(), 0);
    assert!(!engine.state().automate_all());
}

#[test]
fn test_bios_advice_for_unknown_issue_refused() {
    let mut engine = engine(
        FakeBackend::answering("Recommendation: update the BIOS and kill chrome"),
        vec![Choice::Yes],
    );
    let outcome = engine.remediate_one(&issue("Fan makes a grinding noise"));
    assert_eq!(outcome.action, Action::bios_refusal());
    assert!(engine.executor().actions().calls().is_empty());
}

// ============================================================================
// Automation monotonicity
// ============================================================================

#[test]
fn test_automate_all_suppresses_later_prompts() {
    let mut engine = engine(
        FakeBackend::answering("Recommendation: optimize memory usage"),
        vec![Choice::No, Choice::AutomateAll, Choice::No, Choice::No],
    );
    let issues = vec![
        issue("High storage usage: /home at 97.2% capacity."),
        issue("High memory usage by processes: code (PID 7) using 900.0 MB RAM..."),
        issue("High storage usage: / at 91.0% capacity."),
        issue("Swap thrashing observed"),
        issue("Audio system check failed (PulseAudio may not be running)."),
    ];

    let outcomes = engine.remediate(&issues);
    assert_eq!(outcomes.len(), issues.len());

    // Declined first, automated from the second on
    assert_eq!(outcomes[0].detail, "declined");
    assert!(outcomes[1].succeeded);
    assert!(outcomes[2].succeeded);
    assert_eq!(outcomes[3].action, Action::OptimizeMemory);
    assert!(outcomes[3].succeeded);
    assert_eq!(outcomes[4].action, Action::ManualReview);

    assert_eq!(engine.confirmer().prompt_count(), 2);
    assert!(engine.state().automate_all());
    assert_eq!(
        engine.executor().actions().calls(),
        vec!["optimize_memory", "reclaim_disk_space", "optimize_memory"]
    );
}

#[test]
fn test_end_of_input_never_acts() {
    // No scripted answers: every prompt resolves to the safe default
    let mut engine = engine(FakeBackend::unreachable(), vec![]);
    let outcomes = engine.remediate(&[
        issue("High storage usage: / at 95.0% capacity."),
        issue("High memory usage by processes: chrome (PID 1) using 2048.0 MB RAM..."),
    ]);
    assert!(outcomes.iter().all(|o| !o.succeeded && o.detail == "declined"));
    assert!(engine.executor().actions().calls().is_empty());
    assert!(!engine.state().automate_all());
}

// ============================================================================
// Backend failures
// ============================================================================

#[test]
fn test_unreachable_backend_is_manual_review() {
    let mut engine = engine(FakeBackend::unreachable(), vec![Choice::Yes]);
    let outcome = engine.remediate_one(&issue("Bluetooth adapter missing"));
    assert_eq!(outcome.action, Action::ManualReview);
    assert!(!outcome.succeeded);
    assert!(outcome.detail.contains("backend unavailable"));
    assert_eq!(engine.bridge().backend().call_count(), 0);
    assert_eq!(engine.confirmer().prompt_count(), 0);
}

#[test]
fn test_backend_errors_do_not_stop_queue() {
    let backend = FakeBackend::new(vec![
        Err(BackendError::Http("status 500".to_string())),
        Ok("Recommendation: skip, this is harmless".to_string()),
    ]);
    let mut engine = engine(backend, vec![]);
    let outcomes = engine.remediate(&[
        issue("Wi-Fi keeps dropping"),
        issue("Clock drifts by a second a day"),
    ]);
    assert!(outcomes[0].detail.contains("backend failed"));
    assert_eq!(outcomes[1].action, Action::Skip);
    assert_eq!(outcomes[1].detail, "skipped");
}

#[test]
fn test_failed_remedy_reported_and_queue_continues() {
    let actions = DryRunActions::failing(RemedyError::NoMatchingProcess("chrome".to_string()));
    let mut engine = engine_with(
        FakeBackend::answering("You should terminate chrome to free memory."),
        actions,
        vec![Choice::AutomateAll],
    );
    let outcomes = engine.remediate(&[
        issue("Desktop is unresponsive"),
        issue("High storage usage: / at 95.0% capacity."),
    ]);
    assert_eq!(outcomes.len(), 2);
    assert!(outcomes.iter().all(|o| !o.succeeded));
    assert!(outcomes[0].detail.contains("no running process matches 'chrome'"));
    assert_eq!(engine.executor().actions().calls().len(), 2);
}

//! End-to-end classifier behavior.

use atelier_support::{
    assess, classify, is_unsafe_response_text, EscalationLevel, ResponseGuard, SupportNote,
};

#[test]
fn test_absent_and_empty_notes_are_none() {
    let absent = classify(None);
    assert_eq!(absent.level, EscalationLevel::None);
    assert!(absent.reason.is_none());

    let empty = classify(Some(""));
    assert_eq!(empty.level, EscalationLevel::None);
    assert!(empty.reason.is_none());
}

#[test]
fn test_english_crisis_phrase_is_urgent() {
    let e = classify(Some("I want to kill myself"));
    assert_eq!(e.level, EscalationLevel::UrgentHelp);
    assert_eq!(e.reason.as_deref(), Some("Crisis-related language detected"));
}

#[test]
fn test_russian_distress_phrase_is_soft() {
    let e = classify(Some("очень тревожно, не могу спать"));
    assert_eq!(e.level, EscalationLevel::SoftAlert);
    assert_eq!(e.reason.as_deref(), Some("Distress-related language detected"));
}

#[test]
fn test_urgent_wins_when_both_tiers_match() {
    for note in [
        "I can't sleep and I want to die",
        "паника, не могу спать, хочу умереть",
    ] {
        assert_eq!(
            classify(Some(note)).level,
            EscalationLevel::UrgentHelp,
            "{}",
            note
        );
    }
}

#[test]
fn test_unsafe_response_examples() {
    assert!(is_unsafe_response_text("You definitely have depression"));
    assert!(!is_unsafe_response_text("Try a short walk today"));
}

#[test]
fn test_classifier_is_stateless_across_calls() {
    let first = classify(Some("I hate myself"));
    let _ = classify(Some("I want to kill myself"));
    assert_eq!(classify(Some("I hate myself")), first);
}

#[test]
fn test_assessment_tracks_escalation_between_turns() {
    let turn1 = assess(&SupportNote::new("rough mix is done"));
    let turn2 =
        assess(&SupportNote::new("panic before the show").with_prior(turn1.escalation.level));
    let turn3 = assess(&SupportNote::new("panic again").with_prior(turn2.escalation.level));

    assert!(!turn1.escalated);
    assert!(turn2.escalated);
    assert!(!turn3.escalated);
}

#[test]
fn test_guard_attaches_soft_resources() {
    let reply = ResponseGuard::new()
        .review(Some("I'm so anxious about the release"), "Try a short walk today")
        .unwrap();
    assert_eq!(reply.escalation.level, EscalationLevel::SoftAlert);
    assert!(!reply.resources.is_empty());
}

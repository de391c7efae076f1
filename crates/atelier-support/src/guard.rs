//! Response guard: the last check before a generated reply reaches the user.

use serde::Serialize;
use tracing::{info, warn};

use atelier_core::{Error, Result};

use crate::escalation::{classify, Escalation, EscalationLevel};
use crate::resources::{resources_for, tone_for, ResponseTone, SafetyResource};
use crate::response_safety::unsafe_response_reason;

/// A reply cleared for display, with what the user note called for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GuardedReply {
    pub text: String,
    pub escalation: Escalation,
    pub tone: ResponseTone,
    pub resources: Vec<SafetyResource>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResponseGuard;

impl ResponseGuard {
    pub fn new() -> Self {
        Self
    }

    /// Check `draft` against the unsafe-response rules and attach resources
    /// for `note`.
    ///
    /// Fails with [`Error::UnsafeResponse`] when the draft must be
    /// regenerated; the error carries the matching rule label.
    pub fn review(&self, note: Option<&str>, draft: &str) -> Result<GuardedReply> {
        if let Some(rule) = unsafe_response_reason(draft) {
            warn!(
                subsystem = "support",
                component = "guard",
                op = "review",
                rule,
                text_len = draft.chars().count(),
                "Draft reply rejected"
            );
            return Err(Error::UnsafeResponse(rule.to_string()));
        }

        let escalation = classify(note);
        let level = escalation.level;
        if level != EscalationLevel::None {
            info!(
                subsystem = "support",
                component = "guard",
                op = "review",
                escalation_level = %level,
                "Safety resources attached to reply"
            );
        }
        Ok(GuardedReply {
            text: draft.to_string(),
            tone: tone_for(level),
            resources: resources_for(level).to_vec(),
            escalation,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsafe_draft_rejected_with_rule() {
        let err = ResponseGuard::new()
            .review(Some("I feel low"), "You clearly have depression.")
            .unwrap_err();
        assert!(matches!(err, Error::UnsafeResponse(ref rule) if rule == "diagnostic_claim"));
        assert_eq!(err.status_code(), 422);
    }

    #[test]
    fn test_urgent_note_gets_crisis_tone() {
        let reply = ResponseGuard::new()
            .review(Some("I want to kill myself"), "I'm really glad you told me.")
            .unwrap();
        assert_eq!(reply.escalation.level, EscalationLevel::UrgentHelp);
        assert_eq!(reply.tone, ResponseTone::Crisis);
        assert!(!reply.resources.is_empty());
    }

    #[test]
    fn test_plain_note_passes_through() {
        let reply = ResponseGuard::new()
            .review(Some("How do I sidechain the kick?"), "Try a short walk today")
            .unwrap();
        assert_eq!(reply.text, "Try a short walk today");
        assert_eq!(reply.tone, ResponseTone::Standard);
        assert!(reply.resources.is_empty());
    }
}

//! Detection of forbidden phrasings in generated replies.
//!
//! A reply that claims a diagnosis or directs the user's medication must be
//! discarded and regenerated, never shown.

use once_cell::sync::Lazy;

use crate::escalation::{compile, CompiledRule, PatternRule};

/// Diagnostic claims and medical directives, English and Russian.
pub const UNSAFE_RESPONSE_RULES: &[PatternRule] = &[
    PatternRule {
        label: "diagnostic_claim",
        pattern: r"\byou\s+(definitely\s+|clearly\s+|probably\s+|likely\s+|obviously\s+|must\s+)?(have|suffer\s+from)\s+(clinical\s+|severe\s+|major\s+)?(depression|bipolar|ptsd|adhd|ocd|schizophrenia|an?\s+(anxiety\s+|mental\s+|personality\s+)?disorder)\b",
    },
    PatternRule {
        label: "diagnostic_label",
        pattern: r"\byou\s+are\s+(clinically\s+)?(depressed|bipolar|schizophrenic|psychotic)\b",
    },
    PatternRule {
        label: "self_diagnosis",
        pattern: r"\b(i\s+(can\s+)?diagnose|my\s+diagnosis)\b",
    },
    PatternRule {
        label: "medication_directive",
        pattern: r"\b(take|start|stop|quit)\s+(taking\s+)?(your\s+|some\s+)?(medication|meds|pills|antidepressants|sedatives|sleeping\s+pills)\b",
    },
    PatternRule {
        label: "dosage_directive",
        pattern: r"\b(increase|decrease|double|halve|change|skip)\s+(your\s+)?(dose|dosage)\b",
    },
    PatternRule {
        label: "diagnostic_claim_ru",
        pattern: r"у\s+(тебя|вас)\s+(точно\s+|явно\s+|определ[её]нно\s+)?(депресси|биполярн|птср|тревожное\s+расстройство|шизофрени)",
    },
    PatternRule {
        label: "medication_directive_ru",
        pattern: r"(прими|принимай|примите|бросай|бросьте|перестань\s+принимать)\s+(таблетки|антидепрессанты|лекарства|снотворное)",
    },
];

static UNSAFE: Lazy<Vec<CompiledRule>> = Lazy::new(|| compile(UNSAFE_RESPONSE_RULES));

/// Label of the first forbidden rule the text matches.
pub fn unsafe_response_reason(text: &str) -> Option<&'static str> {
    UNSAFE
        .iter()
        .find(|rule| rule.regex.is_match(text))
        .map(|rule| rule.label)
}

/// True when a generated reply must be discarded.
pub fn is_unsafe_response_text(text: &str) -> bool {
    unsafe_response_reason(text).is_some()
}

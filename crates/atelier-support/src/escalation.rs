//! Support escalation classifier.
//!
//! Maps free-form user notes to an [`EscalationLevel`] by testing them against
//! two ordered, tagged pattern tables. Urgent rules are always tested before
//! soft rules and the first match wins. The tables are a conservative
//! allow-list: extend them rather than loosening matches, since a false
//! positive is preferred to a missed crisis.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use tracing::debug;

use atelier_core::defaults::{SOFT_REASON, URGENT_REASON};

/// Urgency of the safety intervention suggested by a note.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EscalationLevel {
    #[default]
    None,
    SoftAlert,
    UrgentHelp,
}

impl EscalationLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            EscalationLevel::None => "NONE",
            EscalationLevel::SoftAlert => "SOFT_ALERT",
            EscalationLevel::UrgentHelp => "URGENT_HELP",
        }
    }
}

impl fmt::Display for EscalationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Classifier output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Escalation {
    pub level: EscalationLevel,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

impl Escalation {
    pub fn none() -> Self {
        Self::default()
    }

    fn matched(level: EscalationLevel) -> Self {
        let reason = match level {
            EscalationLevel::UrgentHelp => Some(URGENT_REASON.to_string()),
            EscalationLevel::SoftAlert => Some(SOFT_REASON.to_string()),
            EscalationLevel::None => None,
        };
        Self { level, reason }
    }
}

/// A tagged, case-insensitive pattern.
#[derive(Debug, Clone, Copy)]
pub struct PatternRule {
    pub label: &'static str,
    pub pattern: &'static str,
}

/// Self-harm and suicidal ideation phrases.
pub const URGENT_RULES: &[PatternRule] = &[
    PatternRule {
        label: "self_harm",
        pattern: r"\b(kill|hurt|harm|cut)\s+myself\b",
    },
    PatternRule {
        label: "suicide",
        pattern: r"\bsuicid(e|al)\b",
    },
    PatternRule {
        label: "end_my_life",
        pattern: r"\bend(ing)?\s+(my\s+life|it\s+all)\b",
    },
    PatternRule {
        label: "want_to_die",
        pattern: r"\b(want|wish|going)\s+to\s+die\b",
    },
    PatternRule {
        label: "no_will_to_live",
        pattern: r"\b(don['’]?t|do\s+not)\s+want\s+to\s+(live|be\s+alive|exist)\b",
    },
    PatternRule {
        label: "better_off_dead",
        pattern: r"\bbetter\s+off\s+dead\b",
    },
    PatternRule {
        label: "self_harm_ru",
        pattern: r"(покончить\s+с\s+собой|убить\s+себя|причинить\s+себе\s+вред)",
    },
    PatternRule {
        label: "suicide_ru",
        pattern: r"суицид",
    },
    PatternRule {
        label: "want_to_die_ru",
        pattern: r"(не\s+хочу\s+жить|хочу\s+умереть|свести\s+сч[её]ты\s+с\s+жизнью)",
    },
];

/// Panic, insomnia, and severe self-deprecation phrases.
pub const SOFT_RULES: &[PatternRule] = &[
    PatternRule {
        label: "panic",
        pattern: r"\bpanic",
    },
    PatternRule {
        label: "anxiety",
        pattern: r"\banxi(ous|ety)\b",
    },
    PatternRule {
        label: "insomnia",
        pattern: r"\binsomnia\b|\b(can['’]?t|cannot|couldn['’]?t)\s+sleep\b",
    },
    PatternRule {
        label: "self_loathing",
        pattern: r"\bhate\s+myself\b",
    },
    PatternRule {
        label: "worthless",
        pattern: r"\b(i['’]?m|i\s+am)\s+(worthless|useless|a\s+failure|a\s+burden|pathetic)\b",
    },
    PatternRule {
        label: "panic_ru",
        pattern: r"(паник|тревож)",
    },
    PatternRule {
        label: "insomnia_ru",
        pattern: r"(не\s+могу\s+(спать|уснуть|заснуть)|бессонниц)",
    },
    PatternRule {
        label: "self_loathing_ru",
        pattern: r"(ненавижу\s+себя|я\s+(ничтожество|никч[её]мн|неудачни))",
    },
];

pub(crate) struct CompiledRule {
    pub label: &'static str,
    pub regex: Regex,
}

/// Compile a rule table. The tables are constant data, so a pattern that
/// does not compile is a programming error and must never shrink the table.
pub(crate) fn compile(rules: &[PatternRule]) -> Vec<CompiledRule> {
    rules
        .iter()
        .map(|rule| CompiledRule {
            label: rule.label,
            regex: Regex::new(&format!("(?i){}", rule.pattern)).unwrap_or_else(|e| {
                panic!("pattern rule '{}' does not compile: {}", rule.label, e)
            }),
        })
        .collect()
}

static URGENT: Lazy<Vec<CompiledRule>> = Lazy::new(|| compile(URGENT_RULES));
static SOFT: Lazy<Vec<CompiledRule>> = Lazy::new(|| compile(SOFT_RULES));

/// First matching rule as `(level, label)`, urgent rules first.
pub fn matched_rule(note: &str) -> Option<(EscalationLevel, &'static str)> {
    let tiers: [(&[CompiledRule], EscalationLevel); 2] = [
        (URGENT.as_slice(), EscalationLevel::UrgentHelp),
        (SOFT.as_slice(), EscalationLevel::SoftAlert),
    ];
    tiers.into_iter().find_map(|(rules, level)| {
        rules
            .iter()
            .find(|rule| rule.regex.is_match(note))
            .map(|rule| (level, rule.label))
    })
}

/// Classify a note. Absent or blank input is [`EscalationLevel::None`].
pub fn classify(note: Option<&str>) -> Escalation {
    let Some(text) = note.map(str::trim).filter(|t| !t.is_empty()) else {
        return Escalation::none();
    };

    match matched_rule(text) {
        Some((level, rule)) => {
            // The note text itself is never logged.
            debug!(
                subsystem = "support",
                component = "escalation",
                op = "classify",
                escalation_level = %level,
                rule,
                text_len = text.chars().count(),
                "Escalation rule matched"
            );
            Escalation::matched(level)
        }
        None => Escalation::none(),
    }
}

/// Free text plus the level a previous turn was classified at.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportNote {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub prior: Option<EscalationLevel>,
}

impl SupportNote {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            prior: None,
        }
    }

    pub fn with_prior(mut self, prior: EscalationLevel) -> Self {
        self.prior = Some(prior);
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SupportAssessment {
    pub escalation: Escalation,
    pub prior: Option<EscalationLevel>,
    /// Current level is strictly above the prior one (absent prior = `None`).
    pub escalated: bool,
}

/// Classify a note and compare against its prior level.
///
/// The prior never raises or lowers the current level; classification stays
/// a pure function of the text.
pub fn assess(note: &SupportNote) -> SupportAssessment {
    let escalation = classify(note.text.as_deref());
    let escalated = escalation.level > note.prior.unwrap_or_default();
    SupportAssessment {
        escalation,
        prior: note.prior,
        escalated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_rule_compiles() {
        assert_eq!(URGENT.len(), URGENT_RULES.len());
        assert_eq!(SOFT.len(), SOFT_RULES.len());
    }

    #[test]
    #[should_panic(expected = "broken")]
    fn test_malformed_rule_fails_loudly() {
        let _ = compile(&[PatternRule {
            label: "broken",
            pattern: r"(unclosed",
        }]);
    }

    #[test]
    fn test_rule_labels_unique() {
        let mut labels: Vec<_> = URGENT_RULES
            .iter()
            .chain(SOFT_RULES)
            .map(|r| r.label)
            .collect();
        let total = labels.len();
        labels.sort_unstable();
        labels.dedup();
        assert_eq!(labels.len(), total);
    }

    #[test]
    fn test_blank_is_none() {
        assert_eq!(classify(None), Escalation::none());
        assert_eq!(classify(Some("")), Escalation::none());
        assert_eq!(classify(Some("   \n\t")), Escalation::none());
    }

    #[test]
    fn test_urgent_reason() {
        let e = classify(Some("Sometimes I want to end my life"));
        assert_eq!(e.level, EscalationLevel::UrgentHelp);
        assert_eq!(e.reason.as_deref(), Some(URGENT_REASON));
    }

    #[test]
    fn test_soft_reason() {
        let e = classify(Some("I've had insomnia all week"));
        assert_eq!(e.level, EscalationLevel::SoftAlert);
        assert_eq!(e.reason.as_deref(), Some(SOFT_REASON));
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            classify(Some("I WANT TO DIE")).level,
            EscalationLevel::UrgentHelp
        );
        assert_eq!(
            classify(Some("Хочу Умереть")).level,
            EscalationLevel::UrgentHelp
        );
    }

    #[test]
    fn test_curly_apostrophe() {
        assert_eq!(
            classify(Some("I can’t sleep before the gig")).level,
            EscalationLevel::SoftAlert
        );
    }

    #[test]
    fn test_everyday_music_talk_is_none() {
        for note in [
            "This bassline is killer",
            "The drop should hit harder after the bridge",
            "Let's end the song on the chorus",
            "I'm dying to hear the final master",
        ] {
            assert_eq!(classify(Some(note)).level, EscalationLevel::None, "{}", note);
        }
    }

    #[test]
    fn test_matched_rule_label() {
        assert_eq!(
            matched_rule("I keep having panic attacks"),
            Some((EscalationLevel::SoftAlert, "panic"))
        );
        assert_eq!(matched_rule("all good"), None);
    }

    #[test]
    fn test_level_ordering_and_serde() {
        assert!(EscalationLevel::None < EscalationLevel::SoftAlert);
        assert!(EscalationLevel::SoftAlert < EscalationLevel::UrgentHelp);
        assert_eq!(
            serde_json::to_string(&EscalationLevel::SoftAlert).unwrap(),
            "\"SOFT_ALERT\""
        );
        let parsed: EscalationLevel = serde_json::from_str("\"URGENT_HELP\"").unwrap();
        assert_eq!(parsed, EscalationLevel::UrgentHelp);
        assert_eq!(EscalationLevel::None.to_string(), "NONE");
    }

    #[test]
    fn test_escalation_serializes_without_empty_reason() {
        let json = serde_json::to_value(Escalation::none()).unwrap();
        assert_eq!(json, serde_json::json!({ "level": "NONE" }));
    }

    #[test]
    fn test_assess_escalated() {
        let a = assess(&SupportNote::new("I can't sleep").with_prior(EscalationLevel::None));
        assert_eq!(a.escalation.level, EscalationLevel::SoftAlert);
        assert!(a.escalated);

        let b = assess(
            &SupportNote::new("still can't sleep").with_prior(EscalationLevel::UrgentHelp),
        );
        assert_eq!(b.escalation.level, EscalationLevel::SoftAlert);
        assert!(!b.escalated);
    }

    #[test]
    fn test_assess_without_prior_or_text() {
        let a = assess(&SupportNote::default());
        assert_eq!(a.escalation.level, EscalationLevel::None);
        assert!(!a.escalated);
        assert_eq!(a.prior, None);
    }
}

//! Safety resources attached to replies by escalation level.

use serde::Serialize;

use crate::escalation::EscalationLevel;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SafetyResource {
    pub title: &'static str,
    pub detail: &'static str,
}

const URGENT_RESOURCES: &[SafetyResource] = &[
    SafetyResource {
        title: "Emergency services",
        detail: "If you are in immediate danger, call your local emergency number (112 or 911).",
    },
    SafetyResource {
        title: "Crisis line",
        detail: "Reach a crisis line such as 988 (US) or find one at findahelpline.com.",
    },
    SafetyResource {
        title: "Someone you trust",
        detail: "Tell a friend, family member, or bandmate what you are going through right now.",
    },
];

const SOFT_RESOURCES: &[SafetyResource] = &[
    SafetyResource {
        title: "Grounding break",
        detail: "Step away from the session for a few minutes and slow your breathing.",
    },
    SafetyResource {
        title: "Professional support",
        detail: "If this keeps happening, consider talking to a counselor or doctor.",
    },
];

/// Resources a reply must carry at `level`. Empty for [`EscalationLevel::None`].
pub fn resources_for(level: EscalationLevel) -> &'static [SafetyResource] {
    match level {
        EscalationLevel::UrgentHelp => URGENT_RESOURCES,
        EscalationLevel::SoftAlert => SOFT_RESOURCES,
        EscalationLevel::None => &[],
    }
}

/// Register a reply generator should use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseTone {
    Standard,
    Supportive,
    Crisis,
}

pub fn tone_for(level: EscalationLevel) -> ResponseTone {
    match level {
        EscalationLevel::None => ResponseTone::Standard,
        EscalationLevel::SoftAlert => ResponseTone::Supportive,
        EscalationLevel::UrgentHelp => ResponseTone::Crisis,
    }
}

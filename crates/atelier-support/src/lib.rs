//! # atelier-support
//!
//! Rule-based safety layer for the atelier assistant.
//!
//! - [`escalation`]: maps free-form user notes to an [`EscalationLevel`]
//! - [`response_safety`]: flags generated replies that make diagnostic
//!   claims or give medical directives
//! - [`resources`] and [`guard`]: attach safety resources to replies
//!
//! Everything here is a pure function over immutable pattern tables.

pub mod escalation;
pub mod guard;
pub mod resources;
pub mod response_safety;

pub use escalation::{
    assess, classify, Escalation, EscalationLevel, SupportAssessment, SupportNote,
};
pub use guard::{GuardedReply, ResponseGuard};
pub use resources::{resources_for, tone_for, ResponseTone, SafetyResource};
pub use response_safety::{is_unsafe_response_text, unsafe_response_reason};

//! Structured logging schema and field name constants for atelier.
//!
//! All crates use these names for structured `tracing` fields so log
//! aggregation can query every subsystem the same way.
//!
//! ## Log Level Contract
//!
//! | Level | Usage |
//! |-------|-------|
//! | ERROR | Degraded service, requires operator attention |
//! | WARN  | Rejected operation (cycle, forbidden parent, unsafe response) |
//! | INFO  | Lifecycle events (startup, config loaded), plan completions |
//! | DEBUG | Decision points, intermediate values, config choices |
//! | TRACE | Per-item iteration (tree nodes, pattern checks) |

// ─── Identity fields ───────────────────────────────────────────────────────

/// Subsystem originating the log event.
/// Values: "workspace", "support", "cli"
pub const SUBSYSTEM: &str = "subsystem";

/// Component within a subsystem.
/// Examples: "tree", "delete_plan", "deletion_flow", "escalation"
pub const COMPONENT: &str = "component";

/// Logical operation name.
/// Examples: "build", "assert_move", "plan_delete", "classify"
pub const OPERATION: &str = "op";

// ─── Entity fields ─────────────────────────────────────────────────────────

/// Owning user UUID.
pub const OWNER_ID: &str = "owner_id";

/// Folder UUID being operated on.
pub const FOLDER_ID: &str = "folder_id";

/// Parent (or target parent) folder UUID.
pub const PARENT_ID: &str = "parent_id";

/// Cascade mode chosen for a delete.
pub const CASCADE_MODE: &str = "cascade_mode";

// ─── Measurement fields ────────────────────────────────────────────────────

/// Number of folders in a built tree.
pub const FOLDER_COUNT: &str = "folder_count";

/// Number of reparent operations in a plan.
pub const REPARENT_COUNT: &str = "reparent_count";

/// Number of delete operations in a plan.
pub const DELETE_COUNT: &str = "delete_count";

/// Number of results returned by a listing.
pub const RESULT_COUNT: &str = "result_count";

/// Byte length of a note or response being classified.
pub const TEXT_LEN: &str = "text_len";

// ─── Support fields ────────────────────────────────────────────────────────

/// Escalation level assigned to a note.
pub const ESCALATION_LEVEL: &str = "escalation_level";

/// Label of the pattern rule that matched.
pub const RULE: &str = "rule";

// ─── Outcome fields ────────────────────────────────────────────────────────

/// Boolean success/failure indicator.
pub const SUCCESS: &str = "success";

/// Error message when an operation fails.
pub const ERROR_MSG: &str = "error";

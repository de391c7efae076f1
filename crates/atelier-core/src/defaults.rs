//! Centralized default constants for atelier.
//!
//! **This module is the single source of truth** for shared default values.
//! Crates reference these constants instead of defining their own magic
//! numbers.

// =============================================================================
// FOLDERS
// =============================================================================

/// Maximum folder title length in characters (after trimming).
pub const FOLDER_TITLE_MAX_CHARS: usize = 80;

/// Maximum folder nesting depth. `None` leaves nesting unbounded; a root
/// folder sits at depth 1.
pub const MAX_FOLDER_DEPTH: Option<usize> = None;

/// Sort index assigned to the first child under a parent.
pub const FIRST_SORT_INDEX: i64 = 0;

// =============================================================================
// LISTING
// =============================================================================

/// Number of immediate children shown in a workspace node preview.
pub const NODE_PREVIEW_LIMIT: usize = 3;

// =============================================================================
// SUPPORT
// =============================================================================

/// Reason attached to an URGENT_HELP escalation.
pub const URGENT_REASON: &str = "Crisis-related language detected";

/// Reason attached to a SOFT_ALERT escalation.
pub const SOFT_REASON: &str = "Distress-related language detected";

// =============================================================================
// ENVIRONMENT
// =============================================================================

/// Environment variable naming a TOML config file.
pub const ENV_CONFIG_PATH: &str = "ATELIER_CONFIG";

/// Environment variable overriding the maximum folder depth.
pub const ENV_MAX_FOLDER_DEPTH: &str = "ATELIER_MAX_FOLDER_DEPTH";

/// Environment variable overriding the node preview limit.
pub const ENV_NODE_PREVIEW_LIMIT: &str = "ATELIER_NODE_PREVIEW_LIMIT";

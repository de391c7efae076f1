//! # atelier-workspace
//!
//! Workspace tree manager for atelier.
//!
//! Maintains the structural integrity of a user's folder hierarchy
//! independent of the storage engine. Every operation works on a request-scoped
//! snapshot supplied by the caller and never touches storage itself: delete
//! operations produce a [`DeletePlan`] for the storage layer to apply.

pub mod config;
pub mod delete_plan;
pub mod deletion_flow;
pub mod listing;
pub mod rules;
pub mod store;
pub mod tree;
pub mod workspace;

pub use config::{ConfigError, ConfigResult, WorkspaceConfig};
pub use delete_plan::{plan_delete, CascadeMode, DeletePlan, ReparentOp};
pub use deletion_flow::{DeletionFlow, DeletionState};
pub use listing::{folder_node, list_nodes};
pub use rules::{
    assert_create_allowed, assert_create_allowed_with, assert_move_allowed,
    assert_move_allowed_with, move_sort_index, next_sibling_sort_index, TreeLimits,
};
pub use store::{apply_plan, apply_plan_atomic, WorkspaceStore};
pub use tree::{build_folder_tree, FolderTree};
pub use workspace::Workspace;

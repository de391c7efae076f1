//! Folder deletion confirmation flow.
//!
//! ```text
//! Idle ──request (empty)──────────────────────────► Deleted
//! Idle ──request (has content)──► AwaitingChoice ──choose(mode)──► Deleted
//!                                 AwaitingChoice ──cancel──► Idle
//! ```
//!
//! `Deleted` is terminal: the plan has been handed to the caller and every
//! further operation on the folder fails with [`Error::FolderNotFound`].

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use atelier_core::{Error, Result};

use crate::delete_plan::{plan_delete, CascadeMode, DeletePlan};
use crate::workspace::Workspace;

/// State of one folder's deletion flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeletionState {
    Idle,
    /// Folder has content; caller must pick EMPTY or DELETE_ALL.
    AwaitingChoice { item_count: usize },
    Deleted,
}

/// Drives the confirmation flow for deleting a single folder.
#[derive(Debug, Clone)]
pub struct DeletionFlow {
    folder_id: Uuid,
    state: DeletionState,
}

impl DeletionFlow {
    pub fn new(folder_id: Uuid) -> Self {
        Self {
            folder_id,
            state: DeletionState::Idle,
        }
    }

    pub fn folder_id(&self) -> Uuid {
        self.folder_id
    }

    pub fn state(&self) -> DeletionState {
        self.state
    }

    /// User asked to delete the folder.
    ///
    /// Returns the plan straight away for an empty folder (moving to
    /// `Deleted`), or `None` after moving to `AwaitingChoice`.
    pub fn request(&mut self, workspace: &Workspace) -> Result<Option<DeletePlan>> {
        match self.state {
            DeletionState::Deleted => Err(Error::FolderNotFound(self.folder_id)),
            DeletionState::AwaitingChoice { .. } => Err(Error::InvalidTransition(format!(
                "deletion of folder {} is already awaiting a choice",
                self.folder_id
            ))),
            DeletionState::Idle => match plan_delete(workspace, self.folder_id, None) {
                Ok(plan) => {
                    self.finish(&plan);
                    Ok(Some(plan))
                }
                Err(Error::CascadeModeRequired { item_count, .. }) => {
                    self.state = DeletionState::AwaitingChoice { item_count };
                    debug!(
                        subsystem = "workspace",
                        component = "deletion_flow",
                        op = "request",
                        folder_id = %self.folder_id,
                        item_count,
                        "Folder has content, awaiting cascade choice"
                    );
                    Ok(None)
                }
                Err(e) => Err(e),
            },
        }
    }

    /// Caller picked a cascade mode.
    pub fn choose(&mut self, workspace: &Workspace, mode: CascadeMode) -> Result<DeletePlan> {
        match self.state {
            DeletionState::Deleted => Err(Error::FolderNotFound(self.folder_id)),
            DeletionState::Idle => Err(Error::InvalidTransition(format!(
                "no pending deletion for folder {}",
                self.folder_id
            ))),
            DeletionState::AwaitingChoice { .. } => {
                let plan = plan_delete(workspace, self.folder_id, Some(mode))?;
                self.finish(&plan);
                Ok(plan)
            }
        }
    }

    /// Caller backed out; nothing is mutated.
    pub fn cancel(&mut self) -> Result<()> {
        match self.state {
            DeletionState::Deleted => Err(Error::FolderNotFound(self.folder_id)),
            DeletionState::Idle => Err(Error::InvalidTransition(format!(
                "no pending deletion for folder {}",
                self.folder_id
            ))),
            DeletionState::AwaitingChoice { .. } => {
                self.state = DeletionState::Idle;
                Ok(())
            }
        }
    }

    fn finish(&mut self, plan: &DeletePlan) {
        self.state = DeletionState::Deleted;
        info!(
            subsystem = "workspace",
            component = "deletion_flow",
            op = "finish",
            folder_id = %self.folder_id,
            cascade_mode = ?plan.mode,
            reparent_count = plan.reparent_ops.len(),
            delete_count = plan.delete_ops.len(),
            "Folder deletion planned"
        );
    }
}

//! Cascade-delete planning for folders.
//!
//! The planner never touches storage. It returns the operations the storage
//! layer must apply in one atomic unit of work: every reparent op first, then
//! every delete op in the order given (leaves before their ancestors).

use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use atelier_core::{EntityRef, Error, Result};

use crate::rules::next_sibling_sort_index;
use crate::workspace::Workspace;

/// How to handle the content of a non-empty folder being deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CascadeMode {
    /// Move all direct children to the folder's parent, then delete the folder.
    Empty,
    /// Delete the folder and everything it transitively contains.
    DeleteAll,
}

impl FromStr for CascadeMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().replace('-', "_").as_str() {
            "empty" => Ok(Self::Empty),
            "delete_all" => Ok(Self::DeleteAll),
            _ => Err(Error::InvalidInput(format!(
                "unknown cascade mode '{}', expected EMPTY or DELETE_ALL",
                s
            ))),
        }
    }
}

impl fmt::Display for CascadeMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "EMPTY"),
            Self::DeleteAll => write!(f, "DELETE_ALL"),
        }
    }
}

/// Move one entity under a new parent folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReparentOp {
    pub entity: EntityRef,
    /// New containing folder (None = workspace root)
    pub new_parent_folder_id: Option<Uuid>,
    /// Position under the new parent; set for folders and projects
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort_index: Option<i64>,
}

/// Ordered operations that delete one folder.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletePlan {
    pub folder_id: Uuid,
    /// Mode used; None when the folder was empty
    pub mode: Option<CascadeMode>,
    /// Applied first
    pub reparent_ops: Vec<ReparentOp>,
    /// Applied after reparenting, in order
    pub delete_ops: Vec<EntityRef>,
}

impl DeletePlan {
    /// Total number of operations in the plan.
    pub fn len(&self) -> usize {
        self.reparent_ops.len() + self.delete_ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Plan the deletion of `folder_id`.
///
/// An empty folder is deleted directly whatever `mode` says. A folder with
/// content needs a mode, otherwise this fails with
/// [`Error::CascadeModeRequired`] carrying the number of direct children.
pub fn plan_delete(
    workspace: &Workspace,
    folder_id: Uuid,
    mode: Option<CascadeMode>,
) -> Result<DeletePlan> {
    let folder = workspace.tree().folder(folder_id)?;
    let item_count = workspace.direct_item_count(folder_id);

    let plan = if item_count == 0 {
        DeletePlan {
            folder_id,
            mode: None,
            reparent_ops: Vec::new(),
            delete_ops: vec![EntityRef::folder(folder_id)],
        }
    } else {
        match mode {
            None => {
                return Err(Error::CascadeModeRequired {
                    folder_id,
                    item_count,
                })
            }
            Some(CascadeMode::Empty) => DeletePlan {
                folder_id,
                mode,
                reparent_ops: reparent_children(workspace, folder_id, folder.parent_folder_id),
                delete_ops: vec![EntityRef::folder(folder_id)],
            },
            Some(CascadeMode::DeleteAll) => {
                let (reparent_ops, delete_ops) = purge_subtree(workspace, folder_id);
                DeletePlan {
                    folder_id,
                    mode,
                    reparent_ops,
                    delete_ops,
                }
            }
        }
    };

    debug!(
        subsystem = "workspace",
        component = "delete_plan",
        op = "plan_delete",
        folder_id = %folder_id,
        cascade_mode = ?plan.mode,
        reparent_count = plan.reparent_ops.len(),
        delete_count = plan.delete_ops.len(),
        "Delete plan computed"
    );
    Ok(plan)
}

/// Reparent every direct child to `target`, appending after the target's
/// current siblings and keeping the children's relative order.
fn reparent_children(
    workspace: &Workspace,
    folder_id: Uuid,
    target: Option<Uuid>,
) -> Vec<ReparentOp> {
    let source = Some(folder_id);
    let mut ops = Vec::new();

    let first_folder_index = next_sibling_sort_index(workspace.tree(), target);
    for (offset, child) in workspace.tree().children(source).enumerate() {
        ops.push(ReparentOp {
            entity: EntityRef::folder(child.id),
            new_parent_folder_id: target,
            sort_index: Some(first_folder_index.saturating_add(offset as i64)),
        });
    }

    let first_project_index = workspace.next_project_sort_index(target);
    for (offset, project) in workspace.projects_in(source).enumerate() {
        ops.push(ReparentOp {
            entity: EntityRef::project(project.id),
            new_parent_folder_id: target,
            sort_index: Some(first_project_index.saturating_add(offset as i64)),
        });
    }

    for track in workspace.loose_tracks_in(source) {
        ops.push(ReparentOp {
            entity: EntityRef::track(track.id),
            new_parent_folder_id: target,
            sort_index: None,
        });
    }

    // Project tracks filed under the folder follow their project's new home.
    for track in workspace.project_tracks_filed_in(folder_id) {
        let project_folder = track
            .project_id
            .and_then(|id| workspace.project(id))
            .and_then(|p| p.folder_id);
        let new_parent = if project_folder == source {
            target
        } else {
            project_folder
        };
        ops.push(ReparentOp {
            entity: EntityRef::track(track.id),
            new_parent_folder_id: new_parent,
            sort_index: None,
        });
    }
    ops
}

/// Delete ops for every entity in the subtree: all tracks, then all
/// projects, then folders children-first. Project tracks outside the subtree
/// that are filed under one of its folders are moved to their project's
/// folder first.
fn purge_subtree(workspace: &Workspace, folder_id: Uuid) -> (Vec<ReparentOp>, Vec<EntityRef>) {
    let folders = workspace.tree().post_order(folder_id);
    let doomed: HashSet<Uuid> = folders.iter().map(|f| f.id).collect();

    let mut tracks = Vec::new();
    let mut projects = Vec::new();
    let mut reparent_ops = Vec::new();
    for folder in &folders {
        let here = Some(folder.id);
        for project in workspace.projects_in(here) {
            tracks.extend(
                workspace
                    .tracks_in_project(project.id)
                    .map(|t| EntityRef::track(t.id)),
            );
            projects.push(EntityRef::project(project.id));
        }
        tracks.extend(workspace.loose_tracks_in(here).map(|t| EntityRef::track(t.id)));

        for track in workspace.project_tracks_filed_in(folder.id) {
            let project_folder = track
                .project_id
                .and_then(|id| workspace.project(id))
                .and_then(|p| p.folder_id);
            if project_folder.map_or(false, |id| doomed.contains(&id)) {
                continue;
            }
            reparent_ops.push(ReparentOp {
                entity: EntityRef::track(track.id),
                new_parent_folder_id: project_folder,
                sort_index: None,
            });
        }
    }

    let mut delete_ops = tracks;
    delete_ops.extend(projects);
    delete_ops.extend(folders.iter().map(|f| EntityRef::folder(f.id)));
    (reparent_ops, delete_ops)
}

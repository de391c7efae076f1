//! Storage seam for applying delete plans.
//!
//! A [`WorkspaceStore`] is whatever the caller persists workspace records in.
//! [`apply_plan`] drives a store through a plan in the required order; it is
//! the store's job to make the whole run a single atomic unit of work.
//! [`WorkspaceSnapshot`] is itself a store: [`apply_plan_atomic`] applies a
//! plan to a copy and only swaps it in when every operation succeeded.

use tracing::{info, warn};

use atelier_core::{EntityKind, EntityRef, Error, Result, WorkspaceSnapshot};

use crate::delete_plan::{DeletePlan, ReparentOp};

/// Persistence operations a delete plan needs.
pub trait WorkspaceStore {
    /// Move an entity under a new parent folder.
    fn reparent(&mut self, op: &ReparentOp) -> Result<()>;

    /// Delete a single entity. Fails if anything still references it.
    fn delete(&mut self, entity: &EntityRef) -> Result<()>;
}

/// Apply a plan: every reparent op, then every delete op in plan order.
pub fn apply_plan<S: WorkspaceStore + ?Sized>(store: &mut S, plan: &DeletePlan) -> Result<()> {
    for op in &plan.reparent_ops {
        store.reparent(op)?;
    }
    for entity in &plan.delete_ops {
        store.delete(entity)?;
    }
    info!(
        subsystem = "workspace",
        component = "store",
        op = "apply_plan",
        folder_id = %plan.folder_id,
        reparent_count = plan.reparent_ops.len(),
        delete_count = plan.delete_ops.len(),
        "Delete plan applied"
    );
    Ok(())
}

/// Apply a plan to an in-memory snapshot, all or nothing.
pub fn apply_plan_atomic(snapshot: &mut WorkspaceSnapshot, plan: &DeletePlan) -> Result<()> {
    let mut staged = snapshot.clone();
    match apply_plan(&mut staged, plan) {
        Ok(()) => {
            *snapshot = staged;
            Ok(())
        }
        Err(e) => {
            warn!(
                subsystem = "workspace",
                component = "store",
                op = "apply_plan",
                folder_id = %plan.folder_id,
                error = %e,
                "Delete plan rolled back"
            );
            Err(e)
        }
    }
}

impl WorkspaceStore for WorkspaceSnapshot {
    fn reparent(&mut self, op: &ReparentOp) -> Result<()> {
        let id = op.entity.id;
        match op.entity.kind {
            EntityKind::Folder => {
                let folder = self
                    .folders
                    .iter_mut()
                    .find(|f| f.id == id)
                    .ok_or(Error::FolderNotFound(id))?;
                folder.parent_folder_id = op.new_parent_folder_id;
                if let Some(sort_index) = op.sort_index {
                    folder.sort_index = sort_index;
                }
            }
            EntityKind::Project => {
                let project = self
                    .projects
                    .iter_mut()
                    .find(|p| p.id == id)
                    .ok_or_else(|| Error::NotFound(op.entity.to_string()))?;
                project.folder_id = op.new_parent_folder_id;
                if let Some(sort_index) = op.sort_index {
                    project.sort_index = sort_index;
                }
            }
            EntityKind::Track => {
                let track = self
                    .tracks
                    .iter_mut()
                    .find(|t| t.id == id)
                    .ok_or_else(|| Error::NotFound(op.entity.to_string()))?;
                track.folder_id = op.new_parent_folder_id;
            }
        }
        Ok(())
    }

    fn delete(&mut self, entity: &EntityRef) -> Result<()> {
        let id = entity.id;
        let still_referenced = match entity.kind {
            EntityKind::Folder => {
                self.folders.iter().any(|f| f.parent_folder_id == Some(id))
                    || self.projects.iter().any(|p| p.folder_id == Some(id))
                    || self.tracks.iter().any(|t| t.folder_id == Some(id))
            }
            EntityKind::Project => self.tracks.iter().any(|t| t.project_id == Some(id)),
            EntityKind::Track => false,
        };
        if still_referenced {
            return Err(Error::Integrity(format!(
                "{} is still referenced by other records",
                entity
            )));
        }

        let removed = match entity.kind {
            EntityKind::Folder => remove_by(&mut self.folders, |f| f.id == id),
            EntityKind::Project => remove_by(&mut self.projects, |p| p.id == id),
            EntityKind::Track => remove_by(&mut self.tracks, |t| t.id == id),
        };
        match (removed, entity.kind) {
            (true, _) => Ok(()),
            (false, EntityKind::Folder) => Err(Error::FolderNotFound(id)),
            (false, _) => Err(Error::NotFound(entity.to_string())),
        }
    }
}

fn remove_by<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> bool {
    let before = items.len();
    items.retain(|item| !pred(item));
    items.len() != before
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::delete_plan::{plan_delete, CascadeMode};
    use crate::workspace::Workspace;
    use atelier_core::{Folder, Project, Track};
    use chrono::Utc;
    use uuid::Uuid;

    fn snapshot() -> (WorkspaceSnapshot, Uuid, Uuid) {
        let owner = Uuid::new_v4();
        let now = Utc::now();
        let top = Folder {
            id: Uuid::new_v4(),
            owner_id: owner,
            title: "top".to_string(),
            parent_folder_id: None,
            sort_index: 0,
            created_at_utc: now,
        };
        let doomed = Folder {
            id: Uuid::new_v4(),
            owner_id: owner,
            title: "doomed".to_string(),
            parent_folder_id: Some(top.id),
            sort_index: 0,
            created_at_utc: now,
        };
        let project = Project {
            id: Uuid::new_v4(),
            owner_id: owner,
            title: "song".to_string(),
            folder_id: Some(doomed.id),
            sort_index: 0,
            created_at_utc: now,
        };
        let track = Track {
            id: Uuid::new_v4(),
            owner_id: owner,
            title: "vox".to_string(),
            folder_id: None,
            project_id: Some(project.id),
            created_at_utc: now,
        };
        let (top_id, doomed_id) = (top.id, doomed.id);
        (
            WorkspaceSnapshot {
                folders: vec![top, doomed],
                projects: vec![project],
                tracks: vec![track],
            },
            top_id,
            doomed_id,
        )
    }

    #[test]
    fn test_delete_all_empties_subtree() {
        let (mut snap, top_id, doomed_id) = snapshot();
        let ws = Workspace::build(snap.clone()).unwrap();
        let plan = plan_delete(&ws, doomed_id, Some(CascadeMode::DeleteAll)).unwrap();

        apply_plan_atomic(&mut snap, &plan).unwrap();
        assert_eq!(snap.folders.len(), 1);
        assert_eq!(snap.folders[0].id, top_id);
        assert!(snap.projects.is_empty());
        assert!(snap.tracks.is_empty());
    }

    #[test]
    fn test_empty_mode_moves_project_up() {
        let (mut snap, top_id, doomed_id) = snapshot();
        let ws = Workspace::build(snap.clone()).unwrap();
        let plan = plan_delete(&ws, doomed_id, Some(CascadeMode::Empty)).unwrap();

        apply_plan_atomic(&mut snap, &plan).unwrap();
        assert_eq!(snap.folders.len(), 1);
        assert_eq!(snap.projects[0].folder_id, Some(top_id));
        assert_eq!(snap.tracks.len(), 1);
    }

    #[test]
    fn test_out_of_order_delete_rolls_back() {
        let (mut snap, _, doomed_id) = snapshot();
        let original = snap.clone();
        let plan = DeletePlan {
            folder_id: doomed_id,
            mode: Some(CascadeMode::DeleteAll),
            reparent_ops: Vec::new(),
            // parent before its project: violates leaf-first ordering
            delete_ops: vec![EntityRef::folder(doomed_id)],
        };

        let err = apply_plan_atomic(&mut snap, &plan).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));
        assert_eq!(snap, original);
    }

    #[test]
    fn test_project_track_filed_under_folder_blocks_delete() {
        let (mut snap, _, doomed_id) = snapshot();
        snap.tracks[0].folder_id = Some(doomed_id);
        snap.projects[0].folder_id = None;
        let original = snap.clone();
        let plan = DeletePlan {
            folder_id: doomed_id,
            mode: None,
            reparent_ops: Vec::new(),
            delete_ops: vec![EntityRef::folder(doomed_id)],
        };

        let err = apply_plan_atomic(&mut snap, &plan).unwrap_err();
        assert!(matches!(err, Error::Integrity(_)));
        assert_eq!(snap, original);
    }

    #[test]
    fn test_deleting_missing_folder_is_not_found() {
        let mut snap = WorkspaceSnapshot::default();
        let ghost = Uuid::new_v4();
        assert!(matches!(
            snap.delete(&EntityRef::folder(ghost)),
            Err(Error::FolderNotFound(id)) if id == ghost
        ));
        assert!(matches!(
            snap.delete(&EntityRef::track(ghost)),
            Err(Error::NotFound(_))
        ));
    }
}

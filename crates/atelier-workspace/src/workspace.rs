//! Workspace aggregate: the folder tree plus the projects and tracks it holds.

use std::collections::HashMap;

use tracing::debug;
use uuid::Uuid;

use atelier_core::{sibling_order, Error, Folder, Project, Result, Track, WorkspaceSnapshot};

use crate::rules::next_sort_index;
use crate::tree::{build_folder_tree, FolderTree};

/// A validated, indexed view over one owner's workspace snapshot.
#[derive(Debug, Clone, Default)]
pub struct Workspace {
    tree: FolderTree,
    projects: Vec<Project>,
    tracks: Vec<Track>,
    project_index: HashMap<Uuid, usize>,
    projects_by_folder: HashMap<Option<Uuid>, Vec<usize>>,
    loose_tracks_by_folder: HashMap<Option<Uuid>, Vec<usize>>,
    tracks_by_project: HashMap<Uuid, Vec<usize>>,
    /// Project tracks that also carry a `folder_id`, keyed by that folder.
    filed_tracks_by_folder: HashMap<Uuid, Vec<usize>>,
}

impl Workspace {
    /// Build a workspace from a snapshot.
    ///
    /// Folder rules are those of [`build_folder_tree`]. Projects and tracks
    /// must reference folders/projects in the snapshot with the same owner,
    /// otherwise the build fails with [`Error::Integrity`]. A track's
    /// `folder_id` is checked even when it belongs to a project.
    pub fn build(snapshot: WorkspaceSnapshot) -> Result<Self> {
        let WorkspaceSnapshot {
            folders,
            projects,
            tracks,
        } = snapshot;
        let tree = build_folder_tree(folders)?;

        let mut project_index = HashMap::new();
        let mut projects_by_folder: HashMap<Option<Uuid>, Vec<usize>> = HashMap::new();
        for (slot, project) in projects.iter().enumerate() {
            if project_index.insert(project.id, slot).is_some() {
                return Err(Error::Integrity(format!(
                    "project {} appears more than once",
                    project.id
                )));
            }
            if let Some(folder_id) = project.folder_id {
                check_folder_ref(&tree, "project", project.id, project.owner_id, folder_id)?;
            }
            projects_by_folder
                .entry(project.folder_id)
                .or_default()
                .push(slot);
        }
        for slots in projects_by_folder.values_mut() {
            slots.sort_by(|&a, &b| {
                let (pa, pb) = (&projects[a], &projects[b]);
                sibling_order(
                    (pa.sort_index, &pa.created_at_utc, &pa.id),
                    (pb.sort_index, &pb.created_at_utc, &pb.id),
                )
            });
        }

        let mut seen_tracks = HashMap::new();
        let mut loose_tracks_by_folder: HashMap<Option<Uuid>, Vec<usize>> = HashMap::new();
        let mut tracks_by_project: HashMap<Uuid, Vec<usize>> = HashMap::new();
        let mut filed_tracks_by_folder: HashMap<Uuid, Vec<usize>> = HashMap::new();
        for (slot, track) in tracks.iter().enumerate() {
            if seen_tracks.insert(track.id, slot).is_some() {
                return Err(Error::Integrity(format!(
                    "track {} appears more than once",
                    track.id
                )));
            }
            if let Some(folder_id) = track.folder_id {
                check_folder_ref(&tree, "track", track.id, track.owner_id, folder_id)?;
            }
            match track.project_id {
                Some(project_id) => {
                    let owner = project_index
                        .get(&project_id)
                        .map(|&p| projects[p].owner_id)
                        .ok_or_else(|| {
                            Error::Integrity(format!(
                                "track {} references missing project {}",
                                track.id, project_id
                            ))
                        })?;
                    if owner != track.owner_id {
                        return Err(Error::Integrity(format!(
                            "track {} belongs to a project owned by another user",
                            track.id
                        )));
                    }
                    tracks_by_project.entry(project_id).or_default().push(slot);
                    if let Some(folder_id) = track.folder_id {
                        filed_tracks_by_folder
                            .entry(folder_id)
                            .or_default()
                            .push(slot);
                    }
                }
                None => {
                    loose_tracks_by_folder
                        .entry(track.folder_id)
                        .or_default()
                        .push(slot);
                }
            }
        }
        let track_order = |a: &usize, b: &usize| {
            let (ta, tb) = (&tracks[*a], &tracks[*b]);
            ta.created_at_utc
                .cmp(&tb.created_at_utc)
                .then_with(|| ta.id.cmp(&tb.id))
        };
        for slots in loose_tracks_by_folder.values_mut() {
            slots.sort_by(track_order);
        }
        for slots in tracks_by_project.values_mut() {
            slots.sort_by(track_order);
        }
        for slots in filed_tracks_by_folder.values_mut() {
            slots.sort_by(track_order);
        }

        debug!(
            subsystem = "workspace",
            component = "workspace",
            op = "build",
            folder_count = tree.len(),
            project_count = projects.len(),
            track_count = tracks.len(),
            "Workspace built"
        );

        Ok(Self {
            tree,
            projects,
            tracks,
            project_index,
            projects_by_folder,
            loose_tracks_by_folder,
            tracks_by_project,
            filed_tracks_by_folder,
        })
    }

    /// Build a workspace that only has folders.
    pub fn from_folders(folders: Vec<Folder>) -> Result<Self> {
        Self::build(WorkspaceSnapshot {
            folders,
            ..Default::default()
        })
    }

    pub fn tree(&self) -> &FolderTree {
        &self.tree
    }

    pub fn project(&self, id: Uuid) -> Option<&Project> {
        self.project_index.get(&id).map(|&slot| &self.projects[slot])
    }

    /// Projects directly in `folder` (None = root), in sibling order.
    pub fn projects_in(&self, folder: Option<Uuid>) -> impl Iterator<Item = &Project> + '_ {
        self.projects_by_folder
            .get(&folder)
            .into_iter()
            .flatten()
            .map(move |&slot| &self.projects[slot])
    }

    /// Tracks sitting directly in `folder` without a project.
    pub fn loose_tracks_in(&self, folder: Option<Uuid>) -> impl Iterator<Item = &Track> + '_ {
        self.loose_tracks_by_folder
            .get(&folder)
            .into_iter()
            .flatten()
            .map(move |&slot| &self.tracks[slot])
    }

    /// Tracks belonging to a project, oldest first.
    pub fn tracks_in_project(&self, project_id: Uuid) -> impl Iterator<Item = &Track> + '_ {
        self.tracks_by_project
            .get(&project_id)
            .into_iter()
            .flatten()
            .map(move |&slot| &self.tracks[slot])
    }

    /// Project tracks whose `folder_id` still names `folder_id`.
    ///
    /// They are not direct children, but the folder cannot be removed while
    /// they reference it.
    pub fn project_tracks_filed_in(&self, folder_id: Uuid) -> impl Iterator<Item = &Track> + '_ {
        self.filed_tracks_by_folder
            .get(&folder_id)
            .into_iter()
            .flatten()
            .map(move |&slot| &self.tracks[slot])
    }

    /// Direct children of a folder: subfolders + projects + loose tracks.
    pub fn direct_item_count(&self, folder_id: Uuid) -> usize {
        let folder = Some(folder_id);
        self.tree.child_count(folder)
            + self.projects_in(folder).count()
            + self.loose_tracks_in(folder).count()
    }

    /// Sort index for a new project under `folder`.
    pub fn next_project_sort_index(&self, folder: Option<Uuid>) -> i64 {
        next_sort_index(self.projects_in(folder).map(|p| p.sort_index))
    }
}

fn check_folder_ref(
    tree: &FolderTree,
    kind: &str,
    id: Uuid,
    owner_id: Uuid,
    folder_id: Uuid,
) -> Result<()> {
    match tree.get(folder_id) {
        None => Err(Error::Integrity(format!(
            "{} {} references missing folder {}",
            kind, id, folder_id
        ))),
        Some(folder) if folder.owner_id != owner_id => Err(Error::Integrity(format!(
            "{} {} sits in folder {} owned by another user",
            kind, id, folder_id
        ))),
        Some(_) => Ok(()),
    }
}

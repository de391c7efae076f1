//! Workspace node listings: summaries with item counts and child previews.

use tracing::trace;
use uuid::Uuid;

use atelier_core::{
    EntityKind, Error, Folder, NodeKind, NodePreview, Project, Result, WorkspaceNode,
};

use crate::workspace::Workspace;

/// List the folders and projects directly under `parent` (None = root).
///
/// Folders come first in sibling order, then projects in sibling order.
/// Fails with [`Error::FolderNotFound`] for an unknown parent.
pub fn list_nodes(
    workspace: &Workspace,
    parent: Option<Uuid>,
    preview_limit: usize,
) -> Result<Vec<WorkspaceNode>> {
    if let Some(id) = parent {
        workspace.tree().folder(id)?;
    }

    let mut nodes: Vec<WorkspaceNode> = workspace
        .tree()
        .children(parent)
        .map(|f| build_folder_node(workspace, f, preview_limit))
        .collect();
    nodes.extend(
        workspace
            .projects_in(parent)
            .map(|p| build_project_node(workspace, p, preview_limit)),
    );

    trace!(
        subsystem = "workspace",
        component = "listing",
        op = "list_nodes",
        parent_id = ?parent,
        result_count = nodes.len(),
        "Listed workspace nodes"
    );
    Ok(nodes)
}

/// Summary node for a single folder.
pub fn folder_node(
    workspace: &Workspace,
    folder_id: Uuid,
    preview_limit: usize,
) -> Result<WorkspaceNode> {
    let folder = workspace
        .tree()
        .get(folder_id)
        .ok_or(Error::FolderNotFound(folder_id))?;
    Ok(build_folder_node(workspace, folder, preview_limit))
}

fn build_folder_node(
    workspace: &Workspace,
    folder: &Folder,
    preview_limit: usize,
) -> WorkspaceNode {
    let here = Some(folder.id);
    let subfolders = workspace.tree().children(here).map(|f| NodePreview {
        kind: EntityKind::Folder,
        id: f.id,
        title: f.title.clone(),
    });
    let projects = workspace.projects_in(here).map(|p| NodePreview {
        kind: EntityKind::Project,
        id: p.id,
        title: p.title.clone(),
    });
    let tracks = workspace.loose_tracks_in(here).map(|t| NodePreview {
        kind: EntityKind::Track,
        id: t.id,
        title: t.title.clone(),
    });

    WorkspaceNode {
        kind: NodeKind::Folder,
        id: folder.id,
        title: folder.title.clone(),
        parent_folder_id: folder.parent_folder_id,
        sort_index: folder.sort_index,
        item_count: workspace.direct_item_count(folder.id),
        preview: subfolders
            .chain(projects)
            .chain(tracks)
            .take(preview_limit)
            .collect(),
    }
}

fn build_project_node(
    workspace: &Workspace,
    project: &Project,
    preview_limit: usize,
) -> WorkspaceNode {
    let tracks: Vec<NodePreview> = workspace
        .tracks_in_project(project.id)
        .map(|t| NodePreview {
            kind: EntityKind::Track,
            id: t.id,
            title: t.title.clone(),
        })
        .collect();

    WorkspaceNode {
        kind: NodeKind::Project,
        id: project.id,
        title: project.title.clone(),
        parent_folder_id: project.folder_id,
        sort_index: project.sort_index,
        item_count: tracks.len(),
        preview: tracks.into_iter().take(preview_limit).collect(),
    }
}

//! Subcommand bodies. Each returns a JSON value for `main` to print.

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;
use uuid::Uuid;

use atelier_core::WorkspaceSnapshot;
use atelier_support::{assess, ResponseGuard, SupportNote};
use atelier_workspace::{
    apply_plan_atomic, assert_move_allowed_with, list_nodes, move_sort_index, plan_delete,
    CascadeMode, TreeLimits, Workspace,
};

/// Read a snapshot from a JSON file, or from stdin when `path` is `-`.
pub fn load_snapshot(path: &Path) -> Result<WorkspaceSnapshot> {
    let raw = if path == Path::new("-") {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .context("Failed to read snapshot from stdin")?;
        buf
    } else {
        fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?
    };
    let snapshot: WorkspaceSnapshot =
        serde_json::from_str(&raw).context("Snapshot is not valid workspace JSON")?;
    info!(
        subsystem = "cli",
        component = "snapshot",
        folder_count = snapshot.folders.len(),
        "Snapshot loaded"
    );
    Ok(snapshot)
}

#[derive(Debug, Serialize)]
struct TreeEntry<'a> {
    id: Uuid,
    title: &'a str,
    parent_folder_id: Option<Uuid>,
    sort_index: i64,
    depth: usize,
}

/// Folders in display order with their depth.
pub fn tree(workspace: &Workspace) -> Result<Value> {
    let tree = workspace.tree();
    let entries: Vec<TreeEntry> = tree
        .flatten()
        .into_iter()
        .map(|f| TreeEntry {
            id: f.id,
            title: &f.title,
            parent_folder_id: f.parent_folder_id,
            sort_index: f.sort_index,
            depth: tree.depth(f.id).unwrap_or(1),
        })
        .collect();
    Ok(serde_json::to_value(entries)?)
}

/// Validate a move and report the sort index the folder would receive.
pub fn check_move(
    workspace: &Workspace,
    folder_id: Uuid,
    target: Option<Uuid>,
    limits: &TreeLimits,
) -> Result<Value> {
    let tree = workspace.tree();
    assert_move_allowed_with(tree, folder_id, target, limits)?;
    Ok(json!({
        "allowed": true,
        "folder_id": folder_id,
        "new_parent_folder_id": target,
        "sort_index": move_sort_index(tree, folder_id, target),
    }))
}

/// Plan a delete; with `apply`, return the snapshot after the plan ran.
pub fn delete(
    snapshot: WorkspaceSnapshot,
    folder_id: Uuid,
    mode: Option<CascadeMode>,
    apply: bool,
) -> Result<Value> {
    let workspace = Workspace::build(snapshot.clone())?;
    let plan = plan_delete(&workspace, folder_id, mode)?;
    if !apply {
        return Ok(serde_json::to_value(plan)?);
    }
    let mut snapshot = snapshot;
    apply_plan_atomic(&mut snapshot, &plan)?;
    Ok(serde_json::to_value(snapshot)?)
}

pub fn list(workspace: &Workspace, parent: Option<Uuid>, preview_limit: usize) -> Result<Value> {
    let nodes = list_nodes(workspace, parent, preview_limit)?;
    Ok(serde_json::to_value(nodes)?)
}

pub fn classify(note: SupportNote) -> Result<Value> {
    Ok(serde_json::to_value(assess(&note))?)
}

pub fn check_response(note: Option<&str>, draft: &str) -> Result<Value> {
    let reply = ResponseGuard::new().review(note, draft)?;
    Ok(serde_json::to_value(reply)?)
}

//! Workspace records shared by the tree manager, the CLI, and HTTP callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use uuid::Uuid;

use crate::uuid_utils::{extract_timestamp, new_v7};
use crate::{validate_title, Result};

// =============================================================================
// FOLDER / PROJECT / TRACK
// =============================================================================

/// A named node in a user's workspace hierarchy.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Folder {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    /// Parent folder ID (None = root)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<Uuid>,
    /// Position among siblings under the same parent
    #[serde(default)]
    pub sort_index: i64,
    pub created_at_utc: DateTime<Utc>,
}

impl Folder {
    /// Create a folder with a fresh UUIDv7 and a validated title.
    pub fn new(
        owner_id: Uuid,
        title: &str,
        parent_folder_id: Option<Uuid>,
        sort_index: i64,
    ) -> Result<Self> {
        let title = validate_title(title)?;
        let id = new_v7();
        Ok(Self {
            id,
            owner_id,
            title,
            parent_folder_id,
            sort_index,
            // keep id order and creation order in agreement
            created_at_utc: extract_timestamp(&id).unwrap_or_else(Utc::now),
        })
    }

    /// Rename the folder, validating the new title.
    pub fn rename(&mut self, title: &str) -> Result<()> {
        self.title = validate_title(title)?;
        Ok(())
    }
}

/// A project (song/idea workspace) that lives in a folder or at the root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    #[serde(default)]
    pub sort_index: i64,
    pub created_at_utc: DateTime<Utc>,
}

/// An audio track, either inside a project or loose in a folder.
///
/// When `project_id` is set the track belongs to that project and
/// `folder_id` is ignored for containment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub id: Uuid,
    pub owner_id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_id: Option<Uuid>,
    pub created_at_utc: DateTime<Utc>,
}

/// Sibling ordering: sort index, then creation time, then id.
///
/// Duplicate sort indices are tolerated; the secondary keys keep the
/// order stable.
pub fn sibling_order(
    a: (i64, &DateTime<Utc>, &Uuid),
    b: (i64, &DateTime<Utc>, &Uuid),
) -> Ordering {
    a.0.cmp(&b.0).then_with(|| a.1.cmp(b.1)).then_with(|| a.2.cmp(b.2))
}

// =============================================================================
// ENTITY REFERENCES
// =============================================================================

/// Kind of workspace entity referenced by a plan operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    Folder,
    Project,
    Track,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Folder => write!(f, "folder"),
            Self::Project => write!(f, "project"),
            Self::Track => write!(f, "track"),
        }
    }
}

/// Typed reference to a workspace entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct EntityRef {
    pub kind: EntityKind,
    pub id: Uuid,
}

impl EntityRef {
    pub fn folder(id: Uuid) -> Self {
        Self {
            kind: EntityKind::Folder,
            id,
        }
    }

    pub fn project(id: Uuid) -> Self {
        Self {
            kind: EntityKind::Project,
            id,
        }
    }

    pub fn track(id: Uuid) -> Self {
        Self {
            kind: EntityKind::Track,
            id,
        }
    }
}

impl fmt::Display for EntityRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

// =============================================================================
// LISTING VIEWS
// =============================================================================

/// Kind of a listed workspace node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Folder,
    Project,
}

/// One immediate child shown in a node preview.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodePreview {
    pub kind: EntityKind,
    pub id: Uuid,
    pub title: String,
}

/// Read-only summary of a folder or project for listings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceNode {
    pub kind: NodeKind,
    pub id: Uuid,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_folder_id: Option<Uuid>,
    pub sort_index: i64,
    /// Direct children: subfolders + projects + tracks
    pub item_count: usize,
    /// First few immediate children, in display order
    #[serde(default)]
    pub preview: Vec<NodePreview>,
}

// =============================================================================
// SNAPSHOT
// =============================================================================

/// A coherent read of one user's workspace records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkspaceSnapshot {
    #[serde(default)]
    pub folders: Vec<Folder>,
    #[serde(default)]
    pub projects: Vec<Project>,
    #[serde(default)]
    pub tracks: Vec<Track>,
}

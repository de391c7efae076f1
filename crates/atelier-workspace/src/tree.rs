//! Arena-backed folder tree built from a flat list of folder records.
//!
//! The tree is an owned, request-scoped value: nodes live in a `Vec` and are
//! addressed by slot, with a `HashMap` from folder id to slot. Children are
//! kept in sibling order (sort index, then creation time, then id).

use std::collections::{HashMap, VecDeque};

use tracing::{debug, warn};
use uuid::Uuid;

use atelier_core::{sibling_order, Error, Folder, Result};

#[derive(Debug, Clone)]
struct TreeNode {
    folder: Folder,
    parent: Option<usize>,
    children: Vec<usize>,
    depth: usize,
}

/// Parent → children adjacency over one owner's folders.
#[derive(Debug, Clone, Default)]
pub struct FolderTree {
    nodes: Vec<TreeNode>,
    index: HashMap<Uuid, usize>,
    roots: Vec<usize>,
}

/// Build the folder tree for a flat list of folders.
///
/// Fails with [`Error::Integrity`] when a parent reference does not resolve
/// within the list, when a parent belongs to another owner, when an id
/// appears twice, or when the parent chain contains a cycle.
pub fn build_folder_tree(folders: impl IntoIterator<Item = Folder>) -> Result<FolderTree> {
    let mut nodes: Vec<TreeNode> = Vec::new();
    let mut index = HashMap::new();

    for folder in folders {
        if index.insert(folder.id, nodes.len()).is_some() {
            return Err(Error::Integrity(format!(
                "folder {} appears more than once",
                folder.id
            )));
        }
        nodes.push(TreeNode {
            folder,
            parent: None,
            children: Vec::new(),
            depth: 0,
        });
    }

    let mut roots = Vec::new();
    for slot in 0..nodes.len() {
        let Some(parent_id) = nodes[slot].folder.parent_folder_id else {
            roots.push(slot);
            continue;
        };
        let folder_id = nodes[slot].folder.id;
        let Some(&parent_slot) = index.get(&parent_id) else {
            warn!(
                subsystem = "workspace",
                component = "tree",
                op = "build",
                folder_id = %folder_id,
                parent_id = %parent_id,
                "Dangling parent reference"
            );
            return Err(Error::Integrity(format!(
                "folder {} references missing parent {}",
                folder_id, parent_id
            )));
        };
        if nodes[parent_slot].folder.owner_id != nodes[slot].folder.owner_id {
            return Err(Error::Integrity(format!(
                "folder {} has parent {} owned by another user",
                folder_id, parent_id
            )));
        }
        nodes[slot].parent = Some(parent_slot);
        nodes[parent_slot].children.push(slot);
    }

    let order = |nodes: &[TreeNode], a: usize, b: usize| {
        let (fa, fb) = (&nodes[a].folder, &nodes[b].folder);
        sibling_order(
            (fa.sort_index, &fa.created_at_utc, &fa.id),
            (fb.sort_index, &fb.created_at_utc, &fb.id),
        )
    };
    roots.sort_by(|&a, &b| order(&nodes, a, b));
    for slot in 0..nodes.len() {
        let mut children = std::mem::take(&mut nodes[slot].children);
        children.sort_by(|&a, &b| order(&nodes, a, b));
        nodes[slot].children = children;
    }

    // Anything not reachable from a root sits on a parent cycle.
    let mut visited = 0usize;
    let mut queue: VecDeque<usize> = roots.iter().copied().collect();
    for &root in &roots {
        nodes[root].depth = 1;
    }
    while let Some(slot) = queue.pop_front() {
        visited += 1;
        let depth = nodes[slot].depth + 1;
        for child in nodes[slot].children.clone() {
            nodes[child].depth = depth;
            queue.push_back(child);
        }
    }
    if visited != nodes.len() {
        let stuck = nodes
            .iter()
            .find(|n| n.depth == 0)
            .map(|n| n.folder.id)
            .unwrap_or_default();
        return Err(Error::Integrity(format!(
            "folder {} is part of a parent cycle",
            stuck
        )));
    }

    debug!(
        subsystem = "workspace",
        component = "tree",
        op = "build",
        folder_count = nodes.len(),
        root_count = roots.len(),
        "Folder tree built"
    );

    Ok(FolderTree {
        nodes,
        index,
        roots,
    })
}

impl FolderTree {
    /// Number of folders in the tree.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn contains(&self, id: Uuid) -> bool {
        self.index.contains_key(&id)
    }

    pub fn get(&self, id: Uuid) -> Option<&Folder> {
        self.index.get(&id).map(|&slot| &self.nodes[slot].folder)
    }

    /// Look up a folder, failing with [`Error::FolderNotFound`].
    pub fn folder(&self, id: Uuid) -> Result<&Folder> {
        self.get(id).ok_or(Error::FolderNotFound(id))
    }

    /// Immediate child folders of `parent` (None = roots), in sibling order.
    ///
    /// An unknown parent yields nothing.
    pub fn children(&self, parent: Option<Uuid>) -> impl Iterator<Item = &Folder> + '_ {
        let slots: &[usize] = match parent {
            None => &self.roots,
            Some(id) => self
                .index
                .get(&id)
                .map(|&slot| self.nodes[slot].children.as_slice())
                .unwrap_or(&[]),
        };
        slots.iter().map(move |&slot| &self.nodes[slot].folder)
    }

    /// Number of immediate child folders of `parent`.
    pub fn child_count(&self, parent: Option<Uuid>) -> usize {
        self.children(parent).count()
    }

    /// Depth of a folder; roots are at depth 1.
    pub fn depth(&self, id: Uuid) -> Option<usize> {
        self.index.get(&id).map(|&slot| self.nodes[slot].depth)
    }

    /// Ancestors of a folder, nearest first.
    pub fn ancestors(&self, id: Uuid) -> Vec<&Folder> {
        let mut out = Vec::new();
        let mut cursor = self.index.get(&id).and_then(|&slot| self.nodes[slot].parent);
        while let Some(slot) = cursor {
            out.push(&self.nodes[slot].folder);
            cursor = self.nodes[slot].parent;
        }
        out
    }

    /// Whether `candidate` is a strict descendant of `ancestor`.
    pub fn is_descendant(&self, candidate: Uuid, ancestor: Uuid) -> bool {
        self.ancestors(candidate).iter().any(|f| f.id == ancestor)
    }

    /// All folders below `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: Uuid) -> Vec<&Folder> {
        let Some(&slot) = self.index.get(&id) else {
            return Vec::new();
        };
        self.pre_order(&self.nodes[slot].children)
    }

    /// Folders of the subtree rooted at `id` with children before parents.
    /// The last element is `id` itself.
    pub fn post_order(&self, id: Uuid) -> Vec<&Folder> {
        match self.index.get(&id) {
            Some(&slot) => self.post_order_from(slot),
            None => Vec::new(),
        }
    }

    /// Height of the subtree rooted at `id` (a leaf has height 1).
    pub fn subtree_height(&self, id: Uuid) -> usize {
        let Some(&slot) = self.index.get(&id) else {
            return 0;
        };
        let base = self.nodes[slot].depth;
        self.descendants(id)
            .iter()
            .filter_map(|f| self.depth(f.id))
            .map(|d| d - base + 1)
            .max()
            .unwrap_or(1)
    }

    /// Every folder exactly once, in pre-order from the roots.
    pub fn flatten(&self) -> Vec<&Folder> {
        self.pre_order(&self.roots)
    }

    // Walks use an explicit stack; nesting depth is unbounded by default.

    /// Pre-order over the subtrees rooted at `starts`, in the given order.
    fn pre_order(&self, starts: &[usize]) -> Vec<&Folder> {
        let mut out = Vec::new();
        let mut stack: Vec<usize> = starts.iter().rev().copied().collect();
        while let Some(slot) = stack.pop() {
            out.push(&self.nodes[slot].folder);
            stack.extend(self.nodes[slot].children.iter().rev());
        }
        out
    }

    /// Post-order over the subtree at `slot`, children in sibling order.
    fn post_order_from(&self, slot: usize) -> Vec<&Folder> {
        // Root-first walk visiting the last child first, then reversed.
        let mut out = Vec::new();
        let mut stack = vec![slot];
        while let Some(slot) = stack.pop() {
            out.push(&self.nodes[slot].folder);
            stack.extend(self.nodes[slot].children.iter());
        }
        out.reverse();
        out
    }
}

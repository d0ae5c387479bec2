//! The per-session directory tree.
//!
//! Every lookup is a linear scan of a directory's children, so resolution
//! costs O(depth × branching). Trees hold tens of nodes and listings must keep
//! insertion order, so no name index is kept.
//!
//! All paths given to [`Tree`] are expected to be sanitized absolute paths
//! (see [`super::path::sanitize_path`]); `.` and `..` are not interpreted here.

use super::error::{VfsError, VfsResult};
use super::path::{segments, split_parent};
use super::types::{Node, NodeBody, NodeKind, Permissions};

/// A rooted tree of [`Node`]s.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tree {
    root: Node,
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}

impl Tree {
    /// Create a tree with an empty, read-only root directory.
    pub fn new() -> Self {
        Self {
            root: Node::directory("", Permissions::ReadOnly),
        }
    }

    /// Create a tree whose root holds `nodes`.
    pub fn with_root_children(nodes: impl IntoIterator<Item = Node>) -> Self {
        Self {
            root: Node::directory("", Permissions::ReadOnly).with_children(nodes),
        }
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    // ========================================================================
    // Resolution
    // ========================================================================

    /// Walk to the directory at `path`.
    fn dir(&self, path: &str) -> VfsResult<&Node> {
        let mut current = &self.root;
        for segment in segments(path) {
            current = match current.child(segment) {
                Some(node) if node.is_dir() => node,
                Some(_) => return Err(VfsError::not_a_directory(path)),
                None => return Err(VfsError::not_found(path)),
            };
        }
        Ok(current)
    }

    fn dir_mut(&mut self, path: &str) -> VfsResult<&mut Node> {
        let mut current = &mut self.root;
        for segment in segments(path) {
            current = match current.child_mut(segment) {
                Some(node) if node.is_dir() => node,
                Some(_) => return Err(VfsError::not_a_directory(path)),
                None => return Err(VfsError::not_found(path)),
            };
        }
        Ok(current)
    }

    /// Children of the directory at `path`.
    ///
    /// Unresolvable paths yield an empty slice, same as an empty directory;
    /// use [`Tree::path_exists`] to tell the two apart.
    pub fn list_children(&self, path: &str) -> &[Node] {
        self.dir(path)
            .ok()
            .and_then(Node::children)
            .unwrap_or_default()
    }

    /// True iff `path` denotes a directory. The root always exists.
    pub fn path_exists(&self, path: &str) -> bool {
        self.dir(path).is_ok()
    }

    /// The node at `path`, whatever its kind. The root has no parent and is
    /// never returned.
    pub fn get_node(&self, path: &str) -> Option<&Node> {
        let (parent, name) = split_parent(path)?;
        self.dir(&parent).ok()?.child(name)
    }

    fn has_kind(&self, path: &str, kind: NodeKind) -> bool {
        self.get_node(path).is_some_and(|node| node.kind() == kind)
    }

    /// True iff a regular file exists at `path`.
    pub fn file_exists(&self, path: &str) -> bool {
        self.has_kind(path, NodeKind::File)
    }

    /// True iff a binary exists at `path`.
    pub fn binary_exists(&self, path: &str) -> bool {
        self.has_kind(path, NodeKind::Binary)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    /// Create a file, or overwrite the content of an existing one.
    ///
    /// The parent directory must exist. New files are always read-write;
    /// an existing file keeps its permissions.
    pub fn create_file(&mut self, path: &str, content: &str) -> VfsResult<()> {
        let (parent, name) = split_parent(path).ok_or_else(|| VfsError::invalid_path(path))?;
        let dir = self.dir_mut(&parent)?;

        if let Some(existing) = dir.child_mut(name) {
            return match &mut existing.body {
                NodeBody::File { content: current } => {
                    *current = content.to_string();
                    Ok(())
                }
                NodeBody::Directory { .. } => Err(VfsError::is_a_directory(path)),
                NodeBody::Binary => Err(VfsError::already_exists(path)),
            };
        }

        let children = dir
            .children_mut()
            .ok_or_else(|| VfsError::not_a_directory(parent.as_str()))?;
        children.push(Node::file(name, content, Permissions::ReadWrite));
        Ok(())
    }

    /// Create an empty directory. Fails if anything already has that name.
    pub fn create_dir(&mut self, path: &str, permissions: Permissions) -> VfsResult<()> {
        let (parent, name) = split_parent(path).ok_or_else(|| VfsError::invalid_path(path))?;
        let dir = self.dir_mut(&parent)?;
        if dir.child(name).is_some() {
            return Err(VfsError::already_exists(path));
        }
        let children = dir
            .children_mut()
            .ok_or_else(|| VfsError::not_a_directory(parent.as_str()))?;
        children.push(Node::directory(name, permissions));
        Ok(())
    }

    /// Overwrite the content of an existing regular file.
    pub fn update_file_content(&mut self, path: &str, content: &str) -> VfsResult<()> {
        let (parent, name) = split_parent(path).ok_or_else(|| VfsError::invalid_path(path))?;
        let node = self
            .dir_mut(&parent)?
            .child_mut(name)
            .ok_or_else(|| VfsError::not_found(path))?;

        match &mut node.body {
            NodeBody::File { content: current } => {
                *current = content.to_string();
                Ok(())
            }
            NodeBody::Directory { .. } => Err(VfsError::is_a_directory(path)),
            NodeBody::Binary => Err(VfsError::not_a_file(path)),
        }
    }

    /// Detach the node at `path` and return it. Directories go with their
    /// whole subtree. No permission or kind checks happen here.
    pub fn remove_node(&mut self, path: &str) -> VfsResult<Node> {
        let (parent, name) = split_parent(path).ok_or_else(|| VfsError::invalid_path(path))?;
        let children = self
            .dir_mut(&parent)?
            .children_mut()
            .ok_or_else(|| VfsError::not_a_directory(parent.as_str()))?;
        let idx = children
            .iter()
            .position(|c| c.name == name)
            .ok_or_else(|| VfsError::not_found(path))?;
        Ok(children.remove(idx))
    }

    // ========================================================================
    // Rendering
    // ========================================================================

    /// Render the directory at `path` with box-drawing connectors.
    ///
    /// Only directories are descended into. Trailing whitespace is trimmed,
    /// so an empty directory renders as an empty string.
    pub fn render(&self, path: &str) -> String {
        let mut out = String::new();
        render_level(self.list_children(path), "", &mut out);
        out.trim_end().to_string()
    }
}

fn render_level(nodes: &[Node], prefix: &str, out: &mut String) {
    let last = nodes.len().saturating_sub(1);
    for (i, node) in nodes.iter().enumerate() {
        let (connector, extension) = if i == last {
            ("└── ", "    ")
        } else {
            ("├── ", "│   ")
        };
        out.push_str(prefix);
        out.push_str(connector);
        out.push_str(&node.name);
        out.push('\n');
        if let Some(children) = node.children() {
            render_level(children, &format!("{prefix}{extension}"), out);
        }
    }
}

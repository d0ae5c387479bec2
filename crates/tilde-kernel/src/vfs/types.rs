//! Core VFS types.
//!
//! A tree is built from [`Node`]s. Each node carries its name and permission
//! bits plus a tagged body, so "a file with children" cannot be expressed.

use serde::{Deserialize, Serialize};

/// Node kind, without the payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NodeKind {
    /// Directory.
    Directory,
    /// Regular file.
    File,
    /// Placeholder for a built-in command.
    Binary,
}

impl NodeKind {
    /// Returns true if this is a directory.
    pub fn is_dir(&self) -> bool {
        matches!(self, NodeKind::Directory)
    }

    /// Returns true if this is a regular file.
    pub fn is_file(&self) -> bool {
        matches!(self, NodeKind::File)
    }

    /// Returns true if this is a binary.
    pub fn is_binary(&self) -> bool {
        matches!(self, NodeKind::Binary)
    }
}

/// Permission level of a node.
///
/// Serialized as the integers `1` and `2`. Ordered, so `>= ReadWrite`
/// reads the same as the numeric check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum Permissions {
    /// Visible, never mutated or removed by a session.
    ReadOnly = 1,
    /// Owned by the session.
    ReadWrite = 2,
}

impl Permissions {
    pub fn is_writable(&self) -> bool {
        *self >= Permissions::ReadWrite
    }
}

impl From<Permissions> for u8 {
    fn from(p: Permissions) -> Self {
        p as u8
    }
}

impl TryFrom<u8> for Permissions {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            1 => Ok(Permissions::ReadOnly),
            2 => Ok(Permissions::ReadWrite),
            other => Err(format!("invalid permission level: {other}")),
        }
    }
}

/// Payload of a node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum NodeBody {
    Directory { children: Vec<Node> },
    File { content: String },
    Binary,
}

/// One element of the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    /// Entry name (not full path).
    pub name: String,
    pub permissions: Permissions,
    #[serde(flatten)]
    pub body: NodeBody,
}

impl Node {
    /// Create an empty directory.
    pub fn directory(name: impl Into<String>, permissions: Permissions) -> Self {
        Self {
            name: name.into(),
            permissions,
            body: NodeBody::Directory {
                children: Vec::new(),
            },
        }
    }

    /// Create a regular file.
    pub fn file(
        name: impl Into<String>,
        content: impl Into<String>,
        permissions: Permissions,
    ) -> Self {
        Self {
            name: name.into(),
            permissions,
            body: NodeBody::File {
                content: content.into(),
            },
        }
    }

    /// Create a binary placeholder. Binaries are always read-only.
    pub fn binary(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            permissions: Permissions::ReadOnly,
            body: NodeBody::Binary,
        }
    }

    /// Builder: attach children to a directory. No-op on other kinds.
    pub fn with_children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        if let NodeBody::Directory { children } = &mut self.body {
            children.extend(nodes);
        }
        self
    }

    pub fn kind(&self) -> NodeKind {
        match self.body {
            NodeBody::Directory { .. } => NodeKind::Directory,
            NodeBody::File { .. } => NodeKind::File,
            NodeBody::Binary => NodeKind::Binary,
        }
    }

    /// Children of a directory, `None` for leaves.
    pub fn children(&self) -> Option<&[Node]> {
        match &self.body {
            NodeBody::Directory { children } => Some(children),
            NodeBody::File { .. } | NodeBody::Binary => None,
        }
    }

    pub fn children_mut(&mut self) -> Option<&mut Vec<Node>> {
        match &mut self.body {
            NodeBody::Directory { children } => Some(children),
            NodeBody::File { .. } | NodeBody::Binary => None,
        }
    }

    /// File content, `None` for directories and binaries.
    pub fn content(&self) -> Option<&str> {
        match &self.body {
            NodeBody::File { content } => Some(content),
            NodeBody::Directory { .. } | NodeBody::Binary => None,
        }
    }

    /// Find a direct child by name (linear scan, insertion order).
    pub fn child(&self, name: &str) -> Option<&Node> {
        self.children()?.iter().find(|c| c.name == name)
    }

    pub fn child_mut(&mut self, name: &str) -> Option<&mut Node> {
        self.children_mut()?.iter_mut().find(|c| c.name == name)
    }

    pub fn is_dir(&self) -> bool {
        self.kind().is_dir()
    }

    pub fn is_file(&self) -> bool {
        self.kind().is_file()
    }

    pub fn is_binary(&self) -> bool {
        self.kind().is_binary()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_node_kind() {
        assert!(NodeKind::Directory.is_dir());
        assert!(!NodeKind::Directory.is_file());
        assert!(NodeKind::File.is_file());
        assert!(NodeKind::Binary.is_binary());
    }

    #[test]
    fn test_permissions_ordering() {
        assert!(Permissions::ReadWrite.is_writable());
        assert!(!Permissions::ReadOnly.is_writable());
        assert!(Permissions::ReadOnly < Permissions::ReadWrite);
        assert_eq!(u8::from(Permissions::ReadWrite), 2);
        assert!(Permissions::try_from(3).is_err());
    }

    #[test]
    fn test_leaves_have_no_children() {
        let file = Node::file("a.txt", "hi", Permissions::ReadWrite);
        assert!(file.children().is_none());
        assert_eq!(file.content(), Some("hi"));

        let bin = Node::binary("ls").with_children([Node::binary("x")]);
        assert!(bin.children().is_none());
        assert_eq!(bin.permissions, Permissions::ReadOnly);
    }

    #[test]
    fn test_child_lookup_keeps_insertion_order() {
        let dir = Node::directory("d", Permissions::ReadWrite).with_children([
            Node::file("b", "", Permissions::ReadWrite),
            Node::file("a", "", Permissions::ReadWrite),
        ]);
        let names: Vec<_> = dir.children().unwrap().iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names, ["b", "a"]);
        assert!(dir.child("a").is_some());
        assert!(dir.child("c").is_none());
    }

    #[test]
    fn test_node_json_shape() {
        let node = Node::file("Readme.txt", "hello", Permissions::ReadWrite);
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(json["type"], "file");
        assert_eq!(json["permissions"], 2);
        assert_eq!(json["content"], "hello");

        let parsed: Node = serde_json::from_value(json).unwrap();
        assert_eq!(parsed, node);
    }
}

//! Default layout for a fresh session.

use super::tree::Tree;
use super::types::{Node, Permissions};

/// Empty read-only directories under `/`, after `home` and `bin`.
pub const SYSTEM_DIRS: &[&str] = &[
    "boot", "dev", "etc", "lib", "lib64", "mnt", "nix", "opt", "proc", "root", "run", "sbin",
    "srv", "sys", "tmp", "usr", "var",
];

/// Name of the placeholder file in every home directory.
pub const README_NAME: &str = "Readme.txt";

/// Build the default tree for `identity`.
///
/// `/home/<identity>/Readme.txt` holds `readme`; `/bin` holds one binary per
/// entry of `binaries`, in order.
pub fn default_tree<'a>(
    identity: &str,
    readme: &str,
    binaries: impl IntoIterator<Item = &'a str>,
) -> Tree {
    let home = Node::directory("home", Permissions::ReadOnly).with_children([Node::directory(
        identity,
        Permissions::ReadWrite,
    )
    .with_children([Node::file(README_NAME, readme, Permissions::ReadWrite)])]);

    let bin = Node::directory("bin", Permissions::ReadOnly)
        .with_children(binaries.into_iter().map(Node::binary));

    let system = SYSTEM_DIRS
        .iter()
        .map(|name| Node::directory(*name, Permissions::ReadOnly));

    Tree::with_root_children([home, bin].into_iter().chain(system))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_layout() {
        let tree = default_tree("1.2.3.4", "hello", ["ls", "cat"]);
        let names: Vec<_> = tree.list_children("/").iter().map(|n| n.name.as_str()).collect();
        assert_eq!(names[..2], ["home", "bin"]);
        assert_eq!(names[2..], *SYSTEM_DIRS);

        let readme = tree.get_node("/home/1.2.3.4/Readme.txt").unwrap();
        assert_eq!(readme.content(), Some("hello"));
        assert_eq!(readme.permissions, Permissions::ReadWrite);
        assert_eq!(
            tree.get_node("/home/1.2.3.4").unwrap().permissions,
            Permissions::ReadWrite
        );
        assert_eq!(tree.get_node("/home").unwrap().permissions, Permissions::ReadOnly);

        assert!(tree.binary_exists("/bin/ls"));
        assert!(tree.binary_exists("/bin/cat"));
        assert!(tree.list_children("/etc").is_empty());
        assert_eq!(tree.get_node("/etc").unwrap().permissions, Permissions::ReadOnly);
    }
}

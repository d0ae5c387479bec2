//! Filesystem commands: `ls`, `cd`, `cat`, `touch`, `nano`, `rm`, `tree`.
//!
//! Mutating commands check, in order: the home-directory sandbox, the node's
//! permission bits, then the node kind. The first failing check decides the
//! message, and no check ever mutates the tree.

use super::error::{CommandResult, ShellError};
use crate::session::Session;
use crate::vfs::NodeKind;

/// Delimiter between path and content in `nano` arguments.
const NANO_DELIMITER: &str = " CONTENT ";

fn first_operand(args: &str) -> Option<&str> {
    args.split_whitespace().next()
}

/// `ls [-a|--all] [path]`
pub(super) fn ls(session: &Session, args: &str) -> CommandResult {
    let mut show_all = false;
    let mut operand = None;
    for arg in args.split_whitespace() {
        match arg {
            "-a" | "--all" => show_all = true,
            other if operand.is_none() => operand = Some(other),
            _ => {}
        }
    }

    let path = match operand {
        Some(p) => session.resolve(p),
        None => session.cwd().to_string(),
    };
    let tree = session.tree();
    if !tree.path_exists(&path) {
        return Err(ShellError::CannotAccess { command: "ls", path });
    }

    let names = tree.list_children(&path).iter().map(|n| n.name.as_str());
    let listing: Vec<&str> = if show_all {
        [".", ".."].into_iter().chain(names).collect()
    } else {
        names.filter(|name| !name.starts_with('.')).collect()
    };
    Ok(listing.join(" "))
}

/// `cd [path]`; no operand goes home.
pub(super) fn cd(session: &mut Session, args: &str) -> CommandResult {
    let Some(operand) = first_operand(args) else {
        session.go_home();
        return Ok(String::new());
    };

    let path = session.resolve(operand);
    if session.tree().path_exists(&path) {
        session.set_cwd(path);
        Ok(String::new())
    } else {
        Err(ShellError::NoSuchDirectory(path))
    }
}

/// `cat <file>`
pub(super) fn cat(session: &Session, args: &str) -> CommandResult {
    let operand = first_operand(args).ok_or(ShellError::MissingFileOperand("cat"))?;
    let path = session.resolve(operand);

    match session.tree().get_node(&path) {
        Some(node) => match node.kind() {
            NodeKind::File => Ok(node.content().unwrap_or_default().to_string()),
            NodeKind::Binary => Err(ShellError::BinaryFile { command: "cat", path }),
            NodeKind::Directory => Err(ShellError::NoSuchFile { command: "cat", path }),
        },
        None => Err(ShellError::NoSuchFile { command: "cat", path }),
    }
}

/// `touch <file>`: create an empty file, refusing to clobber one.
pub(super) fn touch(session: &mut Session, args: &str) -> CommandResult {
    let operand = first_operand(args).ok_or(ShellError::MissingFileOperand("touch"))?;
    let path = session.resolve(operand);

    if !session.can_write(&path) {
        return Err(ShellError::PermissionDenied {
            command: "touch",
            action: "touch",
            path,
        });
    }
    if session.tree().file_exists(&path) {
        return Err(ShellError::AlreadyExists { command: "touch", path });
    }

    match session.tree_mut().create_file(&path, "") {
        Ok(()) => Ok(String::new()),
        Err(e) => {
            tracing::debug!(%path, error = %e, "touch failed");
            Err(ShellError::CannotCreate { command: "touch", path })
        }
    }
}

/// `nano <file> CONTENT <text>`: replace a file's content, creating it if
/// needed. Only the first delimiter splits; the rest is content.
pub(super) fn nano(session: &mut Session, args: &str) -> CommandResult {
    let (target, content) = args.split_once(NANO_DELIMITER).ok_or(ShellError::NanoUsage)?;
    let target = target.trim();
    if target.is_empty() {
        return Err(ShellError::NanoUsage);
    }
    let path = session.resolve(target);

    let denied = |path: String| ShellError::PermissionDenied {
        command: "nano",
        action: "write to",
        path,
    };
    if !session.can_write(&path) {
        return Err(denied(path));
    }

    if let Some(node) = session.tree().get_node(&path).filter(|n| n.is_file()) {
        if !node.permissions.is_writable() {
            return Err(denied(path));
        }
        return match session.tree_mut().update_file_content(&path, content) {
            Ok(()) => Ok(String::new()),
            Err(e) => {
                tracing::debug!(%path, error = %e, "nano update failed");
                Err(ShellError::UpdateFailed { command: "nano", path })
            }
        };
    }

    match session.tree_mut().create_file(&path, content) {
        Ok(()) => Ok(format!("File '{path}' created successfully")),
        Err(e) => {
            tracing::debug!(%path, error = %e, "nano create failed");
            Err(ShellError::CannotCreate { command: "nano", path })
        }
    }
}

/// `rm <file>`: files only, never directories.
pub(super) fn rm(session: &mut Session, args: &str) -> CommandResult {
    let operand = first_operand(args).ok_or(ShellError::MissingOperand("rm"))?;
    let path = session.resolve(operand);

    let denied = |path: String| ShellError::PermissionDenied {
        command: "rm",
        action: "remove",
        path,
    };
    if !session.can_write(&path) {
        return Err(denied(path));
    }

    let kind = match session.tree().get_node(&path) {
        Some(node) if !node.permissions.is_writable() => return Err(denied(path)),
        Some(node) => node.kind(),
        None => return Err(ShellError::NothingToRemove(path)),
    };
    match kind {
        NodeKind::Directory => return Err(ShellError::IsADirectory(path)),
        // Binaries are read-only when seeded; a writable one is still not ours to remove.
        NodeKind::Binary => return Err(denied(path)),
        NodeKind::File => {}
    }

    match session.tree_mut().remove_node(&path) {
        Ok(_) => Ok(format!("Removed '{path}'")),
        Err(e) => {
            tracing::debug!(%path, error = %e, "rm failed");
            Err(ShellError::RemoveFailed(path))
        }
    }
}

/// `tree [path]`
pub(super) fn tree(session: &Session, args: &str) -> CommandResult {
    let path = match first_operand(args) {
        Some(p) => session.resolve(p),
        None => session.cwd().to_string(),
    };
    let tree = session.tree();
    if !tree.path_exists(&path) {
        return Err(ShellError::CannotAccess { command: "tree", path });
    }
    Ok(tree.render(&path))
}

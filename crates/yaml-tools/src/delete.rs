use commented_yaml::{Comment, MappingEntry, Node, SequenceItem};
use tracing::debug;

use crate::error::Error;
use crate::path::{NodePath, position, resolve_mut};

/// A child taken out of its container, with every comment the container
/// kept for it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detached {
    /// Path of the container the child was removed from.
    pub parent: NodePath,
    /// Where the child was. After removal this is the position of the
    /// sibling that followed it, or the container's length if it was last.
    pub position: usize,
    pub child: DetachedChild,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DetachedChild {
    Entry { key: String, entry: MappingEntry },
    Item(SequenceItem),
}

impl DetachedChild {
    pub fn value(&self) -> &Node {
        match self {
            Self::Entry { entry, .. } => &entry.value,
            Self::Item(item) => &item.value,
        }
    }

    pub fn leading(&self) -> &Comment {
        match self {
            Self::Entry { entry, .. } => &entry.leading,
            Self::Item(item) => &item.leading,
        }
    }

    pub fn take_leading(&mut self) -> Comment {
        match self {
            Self::Entry { entry, .. } => core::mem::take(&mut entry.leading),
            Self::Item(item) => core::mem::take(&mut item.leading),
        }
    }
}

/// Remove the node at `path` and hand it back together with its comments.
///
/// The tree is only changed once the whole path has been resolved and the
/// last segment validated against its container. Removing from a sequence
/// shifts the later items down by one, each keeping its own comments.
///
/// # Errors
///
/// `Structural` for the empty path or a parent that is not a container,
/// otherwise the resolution errors of [`resolve_mut`].
pub fn detach(root: &mut Node, path: &NodePath) -> Result<Detached, Error> {
    detach_from(root, path).map(|(_, detached)| detached)
}

/// [`detach`], also returning the container the child was removed from.
pub(crate) fn detach_from<'a>(
    root: &'a mut Node,
    path: &NodePath,
) -> Result<(&'a mut Node, Detached), Error> {
    let Some((last, parent_path)) = path.split_last() else {
        return Err(Error::Structural {
            path: path.clone(),
            reason: "cannot remove the document root".into(),
        });
    };
    let parent = resolve_mut(root, &parent_path)?;
    if !matches!(parent, Node::Mapping(_) | Node::Sequence(_)) {
        return Err(Error::Structural {
            path: path.clone(),
            reason: format!("cannot remove a child of a {}", parent.kind()),
        });
    }
    let found = position(parent, last, &parent_path)?;
    let child = match &mut *parent {
        Node::Mapping(mapping) => mapping
            .remove_index(found)
            .map(|(key, entry)| DetachedChild::Entry { key, entry }),
        Node::Sequence(sequence) => {
            (found < sequence.items.len()).then(|| DetachedChild::Item(sequence.items.remove(found)))
        }
        Node::Scalar(_) | Node::Absent => None,
    };
    let child = child.ok_or_else(|| Error::Structural {
        path: path.clone(),
        reason: "node could not be removed".into(),
    })?;
    debug!(%path, position = found, "detached");
    Ok((
        parent,
        Detached {
            parent: parent_path,
            position: found,
            child,
        },
    ))
}

/// Remove the node at `path` and return the comment that led it. The comment
/// is not put back anywhere; see [`relocate_comment`].
///
/// # Errors
///
/// Same as [`detach`].
#[tracing::instrument(skip(root), fields(path = %path))]
pub fn delete(root: &mut Node, path: &NodePath) -> Result<Comment, Error> {
    let mut detached = detach(root, path)?;
    Ok(detached.child.take_leading())
}

/// Remove the node at `path`, moving the comment that led it to where the
/// node used to be.
///
/// # Errors
///
/// Same as [`detach`].
#[tracing::instrument(skip(root), fields(path = %path))]
pub fn delete_keeping_comments(root: &mut Node, path: &NodePath) -> Result<(), Error> {
    let (parent, mut detached) = detach_from(root, path)?;
    relocate_comment(parent, detached.position, detached.child.take_leading());
    Ok(())
}

/// Put `comment` where a removed child used to be: ahead of the leading
/// comment of the sibling now at `position`, or ahead of the container's end
/// comment when the child was last.
pub fn relocate_comment(parent: &mut Node, position: usize, comment: Comment) {
    if comment.is_empty() {
        return;
    }
    let kind = parent.kind();
    let target = match parent {
        Node::Mapping(mapping) => {
            if position < mapping.len() {
                mapping
                    .get_index_mut(position)
                    .map(|(_, entry)| &mut entry.leading)
            } else {
                Some(&mut mapping.end_comment)
            }
        }
        Node::Sequence(sequence) => match sequence.items.get_mut(position) {
            Some(item) => Some(&mut item.leading),
            None => Some(&mut sequence.end_comment),
        },
        Node::Scalar(_) | Node::Absent => None,
    };
    match target {
        Some(target) => {
            debug!(position, lines = comment.lines.len(), "relocating comment");
            target.prepend(comment);
        }
        None => debug!(%kind, "comment dropped, parent is not a container"),
    }
}

use commented_yaml::{Comment, Node, PrintOptions, render_mapping_entry, render_sequence_item};
use tracing::debug;

use crate::delete::{DetachedChild, detach_from, relocate_comment};
use crate::error::Error;
use crate::path::NodePath;

/// Marker put in front of every line of a commented-out node.
pub const COMMENT_MARKER: char = '#';

/// Remove the node at `path` from the data and put it back as comment lines
/// in the same place.
///
/// The node is rendered with `options` exactly as it would print, including
/// its nested and inline comments, and each line gets a `#` in front. The
/// comment that already led the node comes first, then the rendered lines,
/// then whatever led the following sibling. If the node was the last child,
/// the lines go ahead of the container's end comment instead.
///
/// # Errors
///
/// Same as [`crate::detach`]; on error the tree is unchanged.
#[tracing::instrument(skip(root, options), fields(path = %path))]
pub fn comment_out(root: &mut Node, path: &NodePath, options: &PrintOptions) -> Result<(), Error> {
    let (parent, mut detached) = detach_from(root, path)?;
    let mut block = detached.child.take_leading();
    block.append(commented_lines(&detached.child, options));
    debug!(lines = block.lines.len(), "commented out");
    relocate_comment(parent, detached.position, block);
    Ok(())
}

/// Render a detached child and turn every line into a comment line.
pub fn commented_lines(child: &DetachedChild, options: &PrintOptions) -> Comment {
    let rendered = match child {
        DetachedChild::Entry { key, entry } => render_mapping_entry(key, entry, options),
        DetachedChild::Item(item) => render_sequence_item(item, options),
    };
    Comment::from_lines(
        rendered
            .lines()
            .map(|line| format!("{COMMENT_MARKER}{}", line.trim_end())),
    )
}

use commented_yaml::{Comment, Document, Mapping, MappingEntry, Node, Sequence, SequenceItem};
use tracing::{debug, trace};

use crate::error::Error;
use crate::path::{NodePath, Segment};

/// Merge `src` into `dest` and return the result.
///
/// Mappings merge key by key, with `src` winning on overlapping scalars.
/// Sequences concatenate, and a scalar merged with a sequence lands at its
/// end whichever side it came from. An absent side leaves the other one
/// unchanged.
///
/// # Errors
///
/// Returns [`Error::TypeMismatch`] when a mapping meets a sequence or a
/// scalar. Nothing is returned in that case; both inputs are consumed.
#[tracing::instrument(level = "debug", skip_all, fields(path = %path))]
pub fn merge(dest: Node, src: Node, path: &NodePath) -> Result<Node, Error> {
    merge_node(dest, src, path)
}

fn merge_node(dest: Node, src: Node, path: &NodePath) -> Result<Node, Error> {
    trace!(%path, dest = %dest.kind(), src = %src.kind(), "merging");
    match (dest, src) {
        (dest, Node::Absent) => Ok(dest),
        (Node::Absent, src) => Ok(src),
        (Node::Mapping(dest), Node::Mapping(src)) => {
            merge_mappings(dest, src, path).map(Node::Mapping)
        }
        (Node::Sequence(dest), Node::Sequence(src)) => {
            Ok(Node::Sequence(concat_sequences(dest, src)))
        }
        (Node::Sequence(mut dest), Node::Scalar(src)) => {
            dest.items.push(SequenceItem::new(src));
            Ok(Node::Sequence(dest))
        }
        (Node::Scalar(dest), Node::Sequence(mut src)) => {
            debug!(%path, "appending scalar to the incoming sequence");
            src.items.push(SequenceItem::new(dest));
            Ok(Node::Sequence(src))
        }
        (Node::Scalar(_), Node::Scalar(src)) => Ok(Node::Scalar(src)),
        (dest, src) => Err(Error::TypeMismatch {
            path: path.clone(),
            src: src.kind(),
            dest: dest.kind(),
        }),
    }
}

fn merge_mappings(mut dest: Mapping, src: Mapping, path: &NodePath) -> Result<Mapping, Error> {
    let (entries, block_comment, end_comment) = src.into_parts();
    for (key, src_entry) in entries {
        let Some(dest_entry) = dest.entry_mut(&key) else {
            debug!(%path, key = key.as_str(), "adopting key");
            dest.insert(key, src_entry);
            continue;
        };
        let child_path = path.child(Segment::Key(key));
        let MappingEntry {
            value,
            leading,
            inline,
            ..
        } = src_entry;
        let current = core::mem::take(&mut dest_entry.value);
        dest_entry.value = merge_node(current, value, &child_path)?;
        overwrite_comment(&mut dest_entry.leading, leading);
        if inline.as_deref().is_some_and(|text| !text.trim().is_empty()) {
            dest_entry.inline = inline;
        }
    }
    overwrite_comment(&mut dest.block_comment, block_comment);
    overwrite_comment(&mut dest.end_comment, end_comment);
    Ok(dest)
}

fn concat_sequences(mut dest: Sequence, src: Sequence) -> Sequence {
    let Sequence {
        mut items,
        block_comment,
        end_comment,
        ..
    } = src;
    // The block comment of a sequence sits right above its first item, so it
    // travels with that item.
    match items.first_mut() {
        Some(first) if !block_comment.is_blank() => first.leading.prepend(block_comment),
        Some(_) => {}
        None => overwrite_comment(&mut dest.end_comment, block_comment),
    }
    dest.items.append(&mut items);
    overwrite_comment(&mut dest.end_comment, end_comment);
    dest
}

/// Replace `dest` with `src` when `src` has any comment text. A blank or
/// missing comment never erases an existing one.
fn overwrite_comment(dest: &mut Comment, src: Comment) {
    if !src.is_blank() {
        *dest = src;
    }
}

/// Merge two whole documents: the roots as in [`merge`], and the head and
/// foot comments with the same "non-blank `src` wins" rule as keys.
///
/// # Errors
///
/// Same as [`merge`].
pub fn merge_documents(dest: Document, src: Document) -> Result<Document, Error> {
    let Document {
        root,
        mut head,
        mut foot,
        explicit_start,
    } = dest;
    let root = merge(root, src.root, &NodePath::root())?;
    overwrite_comment(&mut head, src.head);
    overwrite_comment(&mut foot, src.foot);
    Ok(Document {
        root,
        head,
        foot,
        explicit_start: explicit_start || src.explicit_start,
    })
}

/// Fold documents from the last to the first: the last one is merged into
/// the one before it, the result into the one before that, and so on.
///
/// The first document supplies the base structure, key order and comments;
/// later documents win on overlapping values and sequences accumulate in
/// file order.
///
/// # Errors
///
/// [`Error::NoDocuments`] for an empty list, otherwise the first merge error.
#[tracing::instrument(skip_all, fields(documents = documents.len()))]
pub fn successive_merge(documents: Vec<Document>) -> Result<Document, Error> {
    let mut documents = documents.into_iter().rev();
    let mut merged = documents.next().ok_or(Error::NoDocuments)?;
    for dest in documents {
        merged = merge_documents(dest, merged)?;
    }
    Ok(merged)
}

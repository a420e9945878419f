#![doc = include_str!("../README.md")]
#![allow(unused_assignments)] // thiserror/miette derive macros trigger false positives

extern crate alloc;

mod comment_out;
mod delete;
mod error;
mod merge;
mod path;

pub use comment_out::{COMMENT_MARKER, comment_out, commented_lines};
pub use delete::{
    Detached, DetachedChild, delete, delete_keeping_comments, detach, relocate_comment,
};
pub use error::Error;
pub use merge::{merge, merge_documents, successive_merge};
pub use path::{NodePath, Segment, resolve, resolve_mut};

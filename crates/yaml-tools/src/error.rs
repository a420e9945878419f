use commented_yaml::NodeKind;
use miette::Diagnostic;
use thiserror::Error;

use crate::path::NodePath;

/// Everything that can go wrong while merging, resolving or removing nodes.
///
/// Every variant that is tied to a place in the tree carries the path at
/// which it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Error, Diagnostic)]
pub enum Error {
    #[error("cannot merge a {src} into a {dest} at {path}")]
    #[diagnostic(
        code(yaml_tools::type_mismatch),
        help("mappings only merge with mappings; sequences absorb sequences and scalars")
    )]
    TypeMismatch {
        path: NodePath,
        src: NodeKind,
        dest: NodeKind,
    },

    #[error("key '{key}' not found in {path}")]
    #[diagnostic(code(yaml_tools::key_not_found))]
    KeyNotFound { path: NodePath, key: String },

    #[error("index {index} is out of range in {path}, which has {length} items")]
    #[diagnostic(code(yaml_tools::index_out_of_range))]
    IndexOutOfRange {
        path: NodePath,
        index: usize,
        length: usize,
    },

    #[error("'{segment}' is not a valid index into the sequence at {path}")]
    #[diagnostic(
        code(yaml_tools::invalid_index),
        help("sequence items are addressed by position, e.g. `list[0]` or `list.0`")
    )]
    InvalidIndex { path: NodePath, segment: String },

    #[error("cannot look inside the {kind} at {path}")]
    #[diagnostic(code(yaml_tools::not_indexable))]
    NotIndexable { path: NodePath, kind: NodeKind },

    #[error("{reason} at {path}")]
    #[diagnostic(code(yaml_tools::structural))]
    Structural { path: NodePath, reason: String },

    #[error("no documents to merge")]
    #[diagnostic(code(yaml_tools::no_documents))]
    NoDocuments,
}

impl Error {
    /// The path the error is about, if it is tied to one.
    pub fn path(&self) -> Option<&NodePath> {
        match self {
            Self::TypeMismatch { path, .. }
            | Self::KeyNotFound { path, .. }
            | Self::IndexOutOfRange { path, .. }
            | Self::InvalidIndex { path, .. }
            | Self::NotIndexable { path, .. }
            | Self::Structural { path, .. } => Some(path),
            Self::NoDocuments => None,
        }
    }
}

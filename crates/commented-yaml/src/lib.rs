#![doc = include_str!("../README.md")]

extern crate alloc;

mod comments;
mod error;
mod model;
mod parser;
mod print;
mod printer;
mod utilities;

pub use error::Error;
pub use model::{
    Comment, Document, Mapping, MappingEntry, Node, NodeKind, Scalar, ScalarKind, ScalarStyle,
    Sequence, SequenceItem,
};
pub use printer::{PrintOptions, print_document, render_mapping_entry, render_sequence_item};

/// Parse a single YAML document, attaching every comment to the model.
///
/// # Errors
///
/// Returns an error if the content is not valid YAML, uses a feature the
/// model cannot represent, or repeats a key within one mapping.
pub fn parse_document(content: &str) -> Result<Document, Error> {
    let events = parser::collect_events(content)?;
    let comments = comments::extract_comments(content);
    let mut builder = parser::AstBuilder::new(content, &events, &comments);
    builder.build_document()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_an_absent_root() {
        let document = parse_document("").expect("parse");
        assert_eq!(document, Document::default());
    }

    #[test]
    fn rejects_unsupported_features() {
        assert!(matches!(
            parse_document("a: &x 1\nb: *x\n"),
            Err(Error::Unsupported {
                feature: "anchors",
                line: 1
            })
        ));
        assert!(matches!(
            parse_document("a: !custom 1\n"),
            Err(Error::Unsupported { feature: "tags", .. })
        ));
        assert!(matches!(
            parse_document("a: 1\n---\nb: 2\n"),
            Err(Error::Unsupported {
                feature: "multiple documents",
                ..
            })
        ));
    }

    #[test]
    fn rejects_same_line_comments_inside_flow_collections() {
        assert!(matches!(
            parse_document("m: {\n  a: 1, # c\n  b: 2\n}\n"),
            Err(Error::Unsupported {
                feature: "comments inside flow collections",
                line: 2
            })
        ));
        assert!(matches!(
            parse_document("l: [\n  x, # c\n  y]\n"),
            Err(Error::Unsupported { line: 2, .. })
        ));
        let document = parse_document("m: {a: 1} # after\n").expect("parse");
        let root = document.root.as_mapping().expect("root");
        assert_eq!(
            root.entry("m").and_then(|e| e.inline.as_deref()),
            Some("# after")
        );
    }

    #[test]
    fn rejects_duplicate_keys() {
        let error = parse_document("a: 1\nb: 2\na: 3\n").expect_err("duplicate");
        assert_eq!(error.to_string(), "duplicate key 'a' on line 3");
    }

    #[test]
    fn reports_syntax_errors() {
        assert!(matches!(
            parse_document("a: [1, 2\n"),
            Err(Error::Syntax(_))
        ));
    }
}

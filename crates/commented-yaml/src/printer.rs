use alloc::string::String;

use crate::model::{Document, Mapping, MappingEntry, Node, Scalar, Sequence, SequenceItem};
use crate::print::flow::{format_flow_node, is_flow_printable};
use crate::print::misc::{indent_str, write_comment, write_inline};
use crate::print::scalar::{block_indicator, format_block_scalar, format_key, format_scalar};

/// Layout of printed documents.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PrintOptions {
    /// Spaces per nesting level of block mappings.
    pub indent: usize,
    /// Extra columns before the `-` of a block sequence that is the value of
    /// a mapping key. `0` puts the dash under the key.
    pub sequence_indent: usize,
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            sequence_indent: 0,
        }
    }
}

/// Columns for the children of a value.
#[derive(Debug, Clone, Copy)]
struct Nesting {
    mapping: usize,
    sequence: usize,
    /// The value follows `- ` and may start on the same line.
    compact: bool,
}

/// Print a document in the canonical layout.
pub fn print_document(document: &Document, options: &PrintOptions) -> String {
    let mut output = String::new();
    write_comment(&document.head, &mut output, 0);
    if document.explicit_start {
        output.push_str("---\n");
    }
    format_root(&document.root, &mut output, options);
    write_comment(&document.foot, &mut output, 0);
    output
}

/// Render one mapping entry (`key: value` and everything under it) at
/// column 0, without its leading comment.
pub fn render_mapping_entry(key: &str, entry: &MappingEntry, options: &PrintOptions) -> String {
    let mut output = String::new();
    format_entry(key, entry, &mut output, 0, options);
    output
}

/// Render one sequence item (`- value`) at column 0, without its leading
/// comment.
pub fn render_sequence_item(item: &SequenceItem, options: &PrintOptions) -> String {
    let mut output = String::new();
    format_item(item, &mut output, 0, options);
    output
}

fn prints_as_flow(node: &Node) -> bool {
    match node {
        Node::Mapping(mapping) => {
            mapping.is_empty() || (mapping.flow && is_flow_printable(node))
        }
        Node::Sequence(sequence) => {
            sequence.is_empty() || (sequence.flow && is_flow_printable(node))
        }
        Node::Scalar(_) | Node::Absent => false,
    }
}

/// Comments kept by a container printed on one line go below it.
fn write_container_comments(node: &Node, output: &mut String, column: usize) {
    let (block, end) = match node {
        Node::Mapping(mapping) => (&mapping.block_comment, &mapping.end_comment),
        Node::Sequence(sequence) => (&sequence.block_comment, &sequence.end_comment),
        Node::Scalar(_) | Node::Absent => return,
    };
    write_comment(block, output, column);
    write_comment(end, output, column);
}

fn format_root(node: &Node, output: &mut String, options: &PrintOptions) {
    match node {
        Node::Absent => {}
        Node::Scalar(scalar) => format_scalar_value(scalar, None, output, options.indent),
        _ if prints_as_flow(node) => {
            format_flow_node(node, output);
            output.push('\n');
            write_container_comments(node, output, 0);
        }
        Node::Mapping(mapping) => format_block_mapping(mapping, output, 0, false, options),
        Node::Sequence(sequence) => format_block_sequence(sequence, output, 0, false, options),
    }
}

fn format_scalar_value(
    scalar: &Scalar,
    inline: Option<&str>,
    output: &mut String,
    body_column: usize,
) {
    if let Some(indicator) = block_indicator(scalar) {
        format_block_scalar(scalar, indicator, output, body_column, |output| {
            write_inline(inline, output);
        });
    } else {
        output.push_str(&format_scalar(scalar.value(), scalar.style(), false));
        write_inline(inline, output);
        output.push('\n');
    }
}

/// Write a value after `key:` or `-`, starting on the indicator's line.
fn format_value(
    node: &Node,
    inline: Option<&str>,
    output: &mut String,
    nesting: Nesting,
    options: &PrintOptions,
) {
    match node {
        Node::Absent => {
            write_inline(inline, output);
            output.push('\n');
        }
        Node::Scalar(scalar) => {
            output.push(' ');
            format_scalar_value(scalar, inline, output, nesting.mapping);
        }
        _ if prints_as_flow(node) => {
            output.push(' ');
            format_flow_node(node, output);
            write_inline(inline, output);
            output.push('\n');
            // Deeper than the key so that they read back as this value's.
            write_container_comments(node, output, nesting.mapping);
        }
        Node::Mapping(mapping) => {
            let compact = nesting.compact
                && inline.is_none()
                && mapping.block_comment.is_empty()
                && mapping
                    .get_index(0)
                    .is_some_and(|(_, entry)| entry.leading.is_empty());
            if compact {
                output.push(' ');
            } else {
                write_inline(inline, output);
                output.push('\n');
            }
            format_block_mapping(mapping, output, nesting.mapping, compact, options);
        }
        Node::Sequence(sequence) => {
            let compact = nesting.compact
                && inline.is_none()
                && sequence.block_comment.is_empty()
                && sequence
                    .items
                    .first()
                    .is_some_and(|item| item.leading.is_empty());
            if compact {
                output.push(' ');
            } else {
                write_inline(inline, output);
                output.push('\n');
            }
            format_block_sequence(sequence, output, nesting.sequence, compact, options);
        }
    }
}

/// Write a block mapping whose keys sit at `column`. With `compact_first`
/// the cursor is already placed for the first key.
fn format_block_mapping(
    mapping: &Mapping,
    output: &mut String,
    column: usize,
    compact_first: bool,
    options: &PrintOptions,
) {
    if !compact_first {
        write_comment(&mapping.block_comment, output, column);
    }
    let indent = indent_str(column);
    for (index, (key, entry)) in mapping.iter().enumerate() {
        if index > 0 || !compact_first {
            write_comment(&entry.leading, output, column);
            output.push_str(&indent);
        }
        format_entry(key, entry, output, column, options);
    }
    write_comment(&mapping.end_comment, output, column);
}

fn format_block_sequence(
    sequence: &Sequence,
    output: &mut String,
    column: usize,
    compact_first: bool,
    options: &PrintOptions,
) {
    if !compact_first {
        write_comment(&sequence.block_comment, output, column);
    }
    let indent = indent_str(column);
    for (index, item) in sequence.items.iter().enumerate() {
        if index > 0 || !compact_first {
            write_comment(&item.leading, output, column);
            output.push_str(&indent);
        }
        format_item(item, output, column, options);
    }
    write_comment(&sequence.end_comment, output, column);
}

fn format_entry(
    key: &str,
    entry: &MappingEntry,
    output: &mut String,
    column: usize,
    options: &PrintOptions,
) {
    output.push_str(&format_key(key, entry.key_style, false));
    output.push(':');
    let nesting = Nesting {
        mapping: column + options.indent,
        sequence: column + options.sequence_indent,
        compact: false,
    };
    format_value(&entry.value, entry.inline.as_deref(), output, nesting, options);
}

fn format_item(item: &SequenceItem, output: &mut String, column: usize, options: &PrintOptions) {
    output.push('-');
    let nesting = Nesting {
        mapping: column + 2,
        sequence: column + 2,
        compact: true,
    };
    format_value(&item.value, item.inline.as_deref(), output, nesting, options);
}

use alloc::string::String;

use crate::model::{Mapping, Node, Sequence};
use crate::print::scalar::{format_key, format_scalar};

/// Whether a container can be written in flow style without losing
/// anything: it and all its descendants carry no comments, nested
/// containers are flow (or empty), and no sequence item is absent.
pub(crate) fn is_flow_printable(node: &Node) -> bool {
    match node {
        Node::Scalar(_) | Node::Absent => true,
        Node::Mapping(mapping) => {
            (mapping.flow || mapping.is_empty())
                && mapping.block_comment.is_empty()
                && mapping.end_comment.is_empty()
                && mapping.iter().all(|(_, entry)| {
                    entry.leading.is_empty()
                        && entry.inline.is_none()
                        && is_flow_printable(&entry.value)
                })
        }
        Node::Sequence(sequence) => {
            (sequence.flow || sequence.is_empty())
                && sequence.block_comment.is_empty()
                && sequence.end_comment.is_empty()
                && sequence.items.iter().all(|item| {
                    item.leading.is_empty()
                        && item.inline.is_none()
                        && !item.value.is_absent()
                        && is_flow_printable(&item.value)
                })
        }
    }
}

pub(crate) fn format_flow_node(node: &Node, output: &mut String) {
    match node {
        Node::Mapping(mapping) => format_flow_mapping(mapping, output),
        Node::Sequence(sequence) => format_flow_sequence(sequence, output),
        Node::Scalar(scalar) => output.push_str(&format_scalar(scalar.value(), scalar.style(), true)),
        Node::Absent => {}
    }
}

fn format_flow_mapping(mapping: &Mapping, output: &mut String) {
    output.push('{');
    for (index, (key, entry)) in mapping.iter().enumerate() {
        if index > 0 {
            output.push_str(", ");
        }
        output.push_str(&format_key(key, entry.key_style, true));
        // `{a}` reads back as a key without a value
        if !entry.value.is_absent() {
            output.push_str(": ");
            format_flow_node(&entry.value, output);
        }
    }
    output.push('}');
}

fn format_flow_sequence(sequence: &Sequence, output: &mut String) {
    output.push('[');
    for (index, item) in sequence.items.iter().enumerate() {
        if index > 0 {
            output.push_str(", ");
        }
        format_flow_node(&item.value, output);
    }
    output.push(']');
}

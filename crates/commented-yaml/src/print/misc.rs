use alloc::string::String;

use crate::model::Comment;

/// Create an indentation string of `indent` spaces.
pub(crate) fn indent_str(indent: usize) -> String {
    " ".repeat(indent)
}

/// Write comment lines, each on its own line, at the comment's pinned
/// column or at `column`. Blank entries become empty lines.
pub(crate) fn write_comment(comment: &Comment, output: &mut String, column: usize) {
    let indent = indent_str(comment.indent.unwrap_or(column));
    for line in &comment.lines {
        let line = line.trim_end();
        if !line.is_empty() {
            output.push_str(&indent);
            output.push_str(line);
        }
        output.push('\n');
    }
}

/// Append ` # text` to the current line when there is an inline comment.
pub(crate) fn write_inline(inline: Option<&str>, output: &mut String) {
    let Some(text) = inline.map(str::trim).filter(|text| !text.is_empty()) else {
        return;
    };
    output.push(' ');
    if !text.starts_with('#') {
        output.push_str("# ");
    }
    output.push_str(text);
}

use alloc::string::String;
use alloc::vec::Vec;

use crate::model::{Scalar, ScalarStyle};
use crate::print::misc::indent_str;
use crate::utilities::{double_quoted, is_plain_safe, single_quoted};

/// Format a scalar on a single line, keeping its quote style where the text
/// allows it.
pub(crate) fn format_scalar(value: &str, style: ScalarStyle, in_flow: bool) -> String {
    match style {
        ScalarStyle::Plain if is_plain_safe(value, in_flow) => value.into(),
        ScalarStyle::SingleQuoted if !value.contains(['\n', '\r']) => single_quoted(value),
        _ => double_quoted(value),
    }
}

/// Format a mapping key.
pub(crate) fn format_key(key: &str, style: ScalarStyle, in_flow: bool) -> String {
    format_scalar(key, style, in_flow)
}

/// Which block indicator a scalar can be printed with, if any.
///
/// Text that needs an indentation indicator (leading spaces or leading
/// empty lines) or is empty falls back to a quoted scalar. Folded text whose
/// lines start with whitespace is printed literally, which keeps its value.
pub(crate) fn block_indicator(scalar: &Scalar) -> Option<char> {
    let content = scalar.value().trim_end_matches('\n');
    if content.is_empty()
        || content.starts_with([' ', '\t', '\n'])
        || content.contains('\r')
    {
        return None;
    }
    match scalar.style() {
        ScalarStyle::Literal => Some('|'),
        ScalarStyle::Folded if !content.split('\n').any(|line| line.starts_with([' ', '\t'])) => {
            Some('>')
        }
        ScalarStyle::Folded => Some('|'),
        _ => None,
    }
}

/// Write a block scalar: header (with chomping indicator) then the body at
/// `column`. The caller writes the inline comment between the two through
/// `after_header`.
pub(crate) fn format_block_scalar(
    scalar: &Scalar,
    indicator: char,
    output: &mut String,
    column: usize,
    after_header: impl FnOnce(&mut String),
) {
    let value = scalar.value();
    let content = value.trim_end_matches('\n');
    let trailing = value.len() - content.len();

    output.push(indicator);
    match trailing {
        0 => output.push('-'),
        1 => {}
        _ => output.push('+'),
    }
    after_header(output);
    output.push('\n');

    let mut lines: Vec<&str> = Vec::new();
    if indicator == '>' {
        // A single line break folds to a space, so every newline in the value
        // needs one more empty line in the source.
        let mut empties = 0;
        for part in content.split('\n') {
            if part.is_empty() {
                empties += 1;
                continue;
            }
            if !lines.is_empty() {
                lines.extend(core::iter::repeat_n("", empties + 1));
            }
            empties = 0;
            lines.push(part);
        }
    } else {
        lines.extend(content.split('\n'));
    }
    lines.extend(core::iter::repeat_n("", trailing.saturating_sub(1)));

    let indent = indent_str(column);
    for line in lines {
        if !line.is_empty() {
            output.push_str(&indent);
            output.push_str(line);
        }
        output.push('\n');
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn block(value: &str, style: ScalarStyle) -> String {
        let scalar = Scalar::new(value, style);
        let mut output = String::new();
        let Some(indicator) = block_indicator(&scalar) else {
            return format_scalar(value, style, false);
        };
        format_block_scalar(&scalar, indicator, &mut output, 2, |_| {});
        output
    }

    #[test]
    fn keeps_quote_style() {
        assert_eq!(format_scalar("a b", ScalarStyle::Plain, false), "a b");
        assert_eq!(format_scalar("a b", ScalarStyle::SingleQuoted, false), "'a b'");
        assert_eq!(format_scalar("a b", ScalarStyle::DoubleQuoted, false), "\"a b\"");
        assert_eq!(format_scalar("x: y", ScalarStyle::Plain, false), "\"x: y\"");
        assert_eq!(format_scalar("a,b", ScalarStyle::Plain, true), "\"a,b\"");
    }

    #[test]
    fn literal_chomping() {
        assert_eq!(block("a\nb\n", ScalarStyle::Literal), "|\n  a\n  b\n");
        assert_eq!(block("a\nb", ScalarStyle::Literal), "|-\n  a\n  b\n");
        assert_eq!(block("a\n\n", ScalarStyle::Literal), "|+\n  a\n\n");
    }

    #[test]
    fn folded_newlines_become_empty_lines() {
        assert_eq!(block("one two\nthree\n", ScalarStyle::Folded), ">\n  one two\n\n  three\n");
        assert_eq!(block("a\n\nb\n", ScalarStyle::Folded), ">\n  a\n\n\n  b\n");
    }

    #[test]
    fn unprintable_block_falls_back_to_quotes() {
        assert_eq!(block("  indented\n", ScalarStyle::Literal), "\"  indented\\n\"");
        assert_eq!(block("", ScalarStyle::Literal), "\"\"");
    }
}

use alloc::string::String;
use alloc::vec::Vec;

/// A comment found in the raw source text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct SourceComment {
    pub line: usize,      // 1-indexed line number
    pub col: usize,       // 0-indexed character column of the `#`
    pub text: String,     // including the `#`
    pub whole_line: bool, // nothing but whitespace before the `#`
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Quote {
    None,
    Single,
    Double,
}

/// Extract all comments from source text.
///
/// A `#` starts a comment when it is at the start of a line or preceded by
/// whitespace, and is not inside a quoted scalar. Quoted scalars may span
/// lines, so the quote state is carried from one line to the next. A quote
/// character only opens a scalar where a scalar can start, which keeps
/// apostrophes inside plain text (`don't`) from swallowing later comments.
pub(crate) fn extract_comments(content: &str) -> Vec<SourceComment> {
    let mut comments = Vec::new();
    let mut quote = Quote::None;
    for (line_idx, line) in content.lines().enumerate() {
        let (found, next) = scan_line(line, quote);
        quote = next;
        if let Some(byte_col) = found {
            let prefix = &line[..byte_col];
            comments.push(SourceComment {
                line: line_idx + 1,
                col: prefix.chars().count(),
                text: line[byte_col..].trim_end().to_string(),
                whole_line: prefix.trim().is_empty(),
            });
        }
    }
    comments
}

/// Scan one line starting in `quote` state. Returns the byte offset of a
/// comment, if any, and the quote state at the end of the line.
fn scan_line(line: &str, mut quote: Quote) -> (Option<usize>, Quote) {
    let bytes = line.as_bytes();
    let mut i = 0;
    while i < bytes.len() {
        let b = bytes[i];
        match quote {
            Quote::Single => {
                if b == b'\'' {
                    if bytes.get(i + 1) == Some(&b'\'') {
                        i += 1;
                    } else {
                        quote = Quote::None;
                    }
                }
            }
            Quote::Double => match b {
                b'\\' => i += 1,
                b'"' => quote = Quote::None,
                _ => {}
            },
            Quote::None => match b {
                b'#' if i == 0 || matches!(bytes[i - 1], b' ' | b'\t') => {
                    return (Some(i), Quote::None);
                }
                b'\'' if opens_scalar(bytes, i) => quote = Quote::Single,
                b'"' if opens_scalar(bytes, i) => quote = Quote::Double,
                _ => {}
            },
        }
        i += 1;
    }
    (None, quote)
}

/// Whether the quote at `i` begins a quoted scalar rather than sitting in the
/// middle of plain text.
fn opens_scalar(bytes: &[u8], i: usize) -> bool {
    let before = bytes[..i]
        .iter()
        .rev()
        .copied()
        .find(|&b| b != b' ' && b != b'\t');
    match before {
        None => true,
        Some(b) => matches!(b, b':' | b'-' | b'?' | b'[' | b'{' | b',')
            && (i == 0 || matches!(bytes[i - 1], b' ' | b'\t' | b'[' | b'{' | b',')),
    }
}

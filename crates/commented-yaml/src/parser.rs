use alloc::string::{String, ToString};
use alloc::vec;
use alloc::vec::Vec;
use core::mem;

use saphyr_parser::{Event, Parser, Span};
use tracing::trace;

use crate::comments::SourceComment;
use crate::error::Error;
use crate::model::{
    Comment, Document, Mapping, MappingEntry, Node, Scalar, ScalarStyle, Sequence, SequenceItem,
};

type Spanned<'a> = (Event<'a>, Span);

pub(crate) fn collect_events(content: &str) -> Result<Vec<Spanned<'_>>, Error> {
    Parser::new_from_str(content)
        .map(|result| result.map_err(|e| Error::Syntax(e.to_string())))
        .collect()
}

fn check_properties(anchor_id: usize, has_tag: bool, span: &Span) -> Result<(), Error> {
    let line = span.start.line();
    if anchor_id > 0 {
        return Err(Error::Unsupported {
            feature: "anchors",
            line,
        });
    }
    if has_tag {
        return Err(Error::Unsupported {
            feature: "tags",
            line,
        });
    }
    Ok(())
}

/// Walks the parser events and attaches every source comment to the model.
pub(crate) struct AstBuilder<'a> {
    source: &'a str,
    source_lines: Vec<&'a str>,
    events: &'a [Spanned<'a>],
    comments: &'a [SourceComment],
    pos: usize,
    /// Index into `comments` of the comment on each 1-based line
    comment_on_line: Vec<Option<usize>>,
    used_comments: Vec<bool>,
    used_blank_lines: Vec<bool>,
    /// Last source line of an event, where the span does not say it
    /// (block scalar bodies, empty scalars)
    end_line_overrides: Vec<Option<usize>>,
    /// Mapping from char index to byte index for safe slicing
    char_to_byte: Vec<usize>,
    in_flow_context: usize,
}

impl<'a> AstBuilder<'a> {
    pub fn new(
        source: &'a str,
        events: &'a [Spanned<'a>],
        comments: &'a [SourceComment],
    ) -> Self {
        let source_lines: Vec<&str> = source.lines().collect();
        let mut comment_on_line = vec![None; source_lines.len() + 2];
        for (index, comment) in comments.iter().enumerate() {
            if let Some(slot) = comment_on_line.get_mut(comment.line) {
                *slot = Some(index);
            }
        }
        let mut char_to_byte: Vec<usize> = source.char_indices().map(|(b, _)| b).collect();
        char_to_byte.push(source.len());
        AstBuilder {
            source,
            used_blank_lines: vec![false; source_lines.len() + 2],
            source_lines,
            events,
            comments,
            pos: 0,
            comment_on_line,
            used_comments: vec![false; comments.len()],
            end_line_overrides: vec![None; events.len()],
            char_to_byte,
            in_flow_context: 0,
        }
    }

    fn to_byte(&self, char_idx: usize) -> usize {
        self.char_to_byte
            .get(char_idx)
            .copied()
            .unwrap_or(self.source.len())
    }

    fn peek(&self) -> Option<&'a Spanned<'a>> {
        self.events.get(self.pos)
    }

    fn next_event(&mut self) -> Option<&'a Spanned<'a>> {
        let item = self.events.get(self.pos);
        if item.is_some() {
            self.pos += 1;
        }
        item
    }

    pub fn build_document(&mut self) -> Result<Document, Error> {
        if matches!(self.peek(), Some((Event::StreamStart, _))) {
            self.pos += 1;
        }

        let mut document: Option<Document> = None;
        while let Some((event, span)) = self.peek() {
            match event {
                Event::DocumentStart(_) => {
                    if document.is_some() {
                        return Err(Error::Unsupported {
                            feature: "multiple documents",
                            line: span.start.line(),
                        });
                    }
                    document = Some(self.build_body()?);
                }
                Event::StreamEnd => {
                    self.pos += 1;
                    break;
                }
                _ => break,
            }
        }

        let mut document = document.unwrap_or_default();
        let remaining = self.collect_remaining();
        document.foot.append(remaining);
        Ok(document)
    }

    fn build_body(&mut self) -> Result<Document, Error> {
        let Some((event, span)) = self.next_event() else {
            return Ok(Document::default());
        };
        let explicit_start = matches!(event, Event::DocumentStart(true));
        let doc_line = span.start.line();
        let root_line = self.peek().map_or(doc_line, |(_, s)| s.start.line());

        let (mut head, before_root) = if explicit_start {
            let mut head = self.collect_between(0, doc_line);
            if let Some(text) = self.take_trailing(doc_line) {
                head.push(text);
            }
            (head, self.collect_between(doc_line, root_line))
        } else {
            (Comment::new(), self.collect_between(0, root_line))
        };

        let mut root = self.build_node()?;
        let mut foot = Comment::new();
        match &mut root {
            Node::Mapping(mapping) => mapping.block_comment.prepend(before_root),
            Node::Sequence(sequence) => sequence.block_comment.prepend(before_root),
            Node::Scalar(_) => {
                head.append(before_root);
                if let Some(text) = self.take_trailing(self.last_content_end_line()) {
                    foot.push(text);
                }
            }
            Node::Absent => foot = before_root,
        }

        if matches!(self.peek(), Some((Event::DocumentEnd, _))) {
            self.pos += 1;
        }

        Ok(Document {
            root,
            head,
            foot,
            explicit_start,
        })
    }

    fn build_node(&mut self) -> Result<Node, Error> {
        let Some((event, span)) = self.peek() else {
            return Ok(Node::Absent);
        };
        match event {
            Event::Scalar(..) => self.build_scalar(),
            Event::SequenceStart(..) => self.build_sequence().map(Node::Sequence),
            Event::MappingStart(..) => self.build_mapping().map(Node::Mapping),
            Event::Alias(_) => Err(Error::Unsupported {
                feature: "aliases",
                line: span.start.line(),
            }),
            _ => Ok(Node::Absent),
        }
    }

    fn build_scalar(&mut self) -> Result<Node, Error> {
        let Some((Event::Scalar(value, style, anchor_id, tag), span)) = self.next_event() else {
            return Ok(Node::Absent);
        };
        check_properties(*anchor_id, tag.is_some(), span)?;
        let index = self.pos - 1;
        let style = ScalarStyle::from(*style);

        if self.is_implicit_null(span, value, style) {
            // An empty value is positioned at the following token; it ends
            // where the preceding event did.
            let end = self.event_end_line(index.saturating_sub(1));
            self.end_line_overrides[index] = Some(end);
            return Ok(Node::Absent);
        }

        if style.is_block() {
            let (header_line, end) = self.block_scalar_extent(span);
            self.claim_lines(header_line, end);
            self.end_line_overrides[index] = Some(end);
        }

        Ok(Node::Scalar(Scalar::new(value.to_string(), style)))
    }

    fn build_key(&mut self) -> Result<(String, ScalarStyle), Error> {
        let Some((event, span)) = self.next_event() else {
            return Err(Error::Syntax("mapping ended before its key".to_string()));
        };
        match event {
            Event::Scalar(value, style, anchor_id, tag) => {
                check_properties(*anchor_id, tag.is_some(), span)?;
                Ok((value.to_string(), ScalarStyle::from(*style)))
            }
            Event::Alias(_) => Err(Error::Unsupported {
                feature: "aliases",
                line: span.start.line(),
            }),
            _ => Err(Error::Unsupported {
                feature: "complex mapping keys",
                line: span.start.line(),
            }),
        }
    }

    fn build_mapping(&mut self) -> Result<Mapping, Error> {
        let Some((Event::MappingStart(anchor_id, tag), span)) = self.next_event() else {
            return Ok(Mapping::new());
        };
        check_properties(*anchor_id, tag.is_some(), span)?;

        let flow = self.in_flow_context > 0 || self.source_byte_at(span) == Some(b'{');
        if flow {
            self.in_flow_context += 1;
        }

        let mut mapping = Mapping::new();
        mapping.flow = flow;
        let mut prev_end_line = span.start.line();
        let mut child_col: Option<usize> = None;

        while let Some((event, key_span)) = self.peek() {
            if matches!(event, Event::MappingEnd) {
                break;
            }
            let key_line = key_span.start.line();
            child_col.get_or_insert(key_span.start.col());

            let leading = self.collect_between(prev_end_line, key_line);
            let (key, key_style) = self.build_key()?;
            if mapping.contains_key(&key) {
                return Err(Error::DuplicateKey {
                    key,
                    line: key_line,
                });
            }

            let between = self.collect_before_value(self.last_event_end_line());
            let mut value = self.build_node()?;
            let content_end = self.last_content_end_line();
            let inline = self.take_inline(key_line, content_end);
            self.collect_after_empty_flow(&mut value, content_end, key_span.start.col());

            let mut entry = MappingEntry {
                key_style,
                value,
                leading,
                inline,
            };
            attach_between(&mut entry.value, &mut entry.leading, between);
            if mapping.is_empty() {
                mapping.block_comment.append(mem::take(&mut entry.leading));
            }
            trace!(key = %key, line = key_line, "mapping entry");
            mapping.insert(key, entry);
            prev_end_line = content_end;
        }

        let end_line = self.peek().map_or(prev_end_line, |(_, s)| s.start.line());
        mapping.end_comment = self.collect_end(prev_end_line, end_line + 1, child_col, flow);

        if let Some((Event::MappingEnd, end_span)) = self.peek() {
            if flow && self.in_flow_context == 1 {
                self.reject_flow_comments(span, end_span)?;
            }
            self.pos += 1;
        }
        if flow {
            self.in_flow_context -= 1;
        }
        Ok(mapping)
    }

    fn build_sequence(&mut self) -> Result<Sequence, Error> {
        let Some((Event::SequenceStart(anchor_id, tag), span)) = self.next_event() else {
            return Ok(Sequence::new());
        };
        check_properties(*anchor_id, tag.is_some(), span)?;

        let flow = self.in_flow_context > 0 || self.source_byte_at(span) == Some(b'[');
        if flow {
            self.in_flow_context += 1;
        }

        let mut sequence = Sequence {
            flow,
            ..Sequence::default()
        };
        let mut prev_end_line = span.start.line();
        let child_col = Some(span.start.col());

        while let Some((event, item_span)) = self.peek() {
            if matches!(event, Event::SequenceEnd) {
                break;
            }
            let item_line = item_span.start.line();

            let dash_line = if matches!(event, Event::MappingStart(..) | Event::SequenceStart(..)) {
                self.bare_dash_line(prev_end_line, item_line)
            } else {
                None
            };
            let mut leading = self.collect_between(prev_end_line, dash_line.unwrap_or(item_line));
            let between =
                dash_line.map_or_else(Comment::new, |line| self.collect_between(line, item_line));
            let dash_comment = self.take_dash_comment(prev_end_line, item_line);
            let mut value = self.build_node()?;
            attach_between(&mut value, &mut leading, between);
            let content_end = self.last_content_end_line();
            let inline = dash_comment.or_else(|| self.take_inline(item_line, content_end));
            if let Some(col) = child_col {
                self.collect_after_empty_flow(&mut value, content_end, col);
            }

            if sequence.is_empty() {
                sequence.block_comment.append(mem::take(&mut leading));
            }
            sequence.items.push(SequenceItem {
                value,
                leading,
                inline,
            });
            prev_end_line = content_end;
        }

        let end_line = self.peek().map_or(prev_end_line, |(_, s)| s.start.line());
        sequence.end_comment = self.collect_end(prev_end_line, end_line + 1, child_col, flow);

        if let Some((Event::SequenceEnd, end_span)) = self.peek() {
            if flow && self.in_flow_context == 1 {
                self.reject_flow_comments(span, end_span)?;
            }
            self.pos += 1;
        }
        if flow {
            self.in_flow_context -= 1;
        }
        Ok(sequence)
    }

    // ─── Line bookkeeping ───────────────────────────────────────────────────

    fn event_end_line(&self, index: usize) -> usize {
        if let Some(Some(line)) = self.end_line_overrides.get(index) {
            return *line;
        }
        self.events.get(index).map_or(1, |(_, span)| span.end.line())
    }

    fn last_event_end_line(&self) -> usize {
        self.event_end_line(self.pos.saturating_sub(1))
    }

    /// Last line holding content of the node just built. Block collection
    /// ends are reported at the next token, so they are skipped.
    fn last_content_end_line(&self) -> usize {
        let mut index = self.pos.saturating_sub(1);
        while index > 0 {
            match self.events.get(index) {
                Some((Event::MappingEnd | Event::SequenceEnd, span))
                    if !matches!(self.source_byte_at(span), Some(b']' | b'}')) =>
                {
                    index -= 1;
                }
                _ => break,
            }
        }
        self.event_end_line(index)
    }

    fn source_byte_at(&self, span: &Span) -> Option<u8> {
        let byte_idx = self.to_byte(span.start.index());
        self.source.as_bytes().get(byte_idx).copied()
    }

    fn is_blank_line(&self, line: usize) -> bool {
        line >= 1
            && self
                .source_lines
                .get(line - 1)
                .is_some_and(|text| text.trim().is_empty())
    }

    fn is_implicit_null(&self, span: &Span, value: &str, style: ScalarStyle) -> bool {
        if style != ScalarStyle::Plain || !(value.is_empty() || value == "~") {
            return false;
        }
        if span.is_empty() {
            return true;
        }
        let start = self.to_byte(span.start.index());
        let end = self.to_byte(span.end.index());
        self.source
            .get(start..end)
            .is_none_or(|text| !text.contains('~'))
    }

    fn peek_is_implicit_null(&self) -> bool {
        match self.peek() {
            Some((Event::Scalar(value, style, _, _), span)) => {
                self.is_implicit_null(span, value, ScalarStyle::from(*style))
            }
            _ => false,
        }
    }

    /// Header line and last body line of a block scalar whose header is on
    /// or just before `span`'s start line.
    fn block_scalar_extent(&self, span: &Span) -> (usize, usize) {
        let start = span.start.line();
        let Some((header_line, keep)) = (start.saturating_sub(2).max(1)..=start)
            .rev()
            .find_map(|line| self.block_header_at(line).map(|keep| (line, keep)))
        else {
            return (start, span.end.line());
        };

        // The body runs until the next token, and only while lines are blank
        // or indented at least as deep as its first line.
        let next_token_line = self
            .events
            .get(self.pos)
            .map_or(usize::MAX, |(_, s)| s.start.line());
        let mut content_indent: Option<usize> = None;
        let mut last_content = header_line;
        let mut last_candidate = header_line;
        for line in (header_line + 1)..next_token_line {
            let Some(text) = self.source_lines.get(line - 1) else {
                break;
            };
            if text.trim().is_empty() {
                last_candidate = line;
                continue;
            }
            let indent = text.len() - text.trim_start().len();
            let required = *content_indent.get_or_insert(indent);
            if indent < required {
                break;
            }
            last_content = line;
            last_candidate = line;
        }
        (header_line, if keep { last_candidate } else { last_content })
    }

    /// If `line` ends with a block scalar header (`|`, `>-`, `|+2`, ...),
    /// whether it uses keep chomping.
    fn block_header_at(&self, line: usize) -> Option<bool> {
        let content = self.line_content(line)?;
        let token = content.trim_end().rsplit([' ', '\t']).next()?;
        let mut chars = token.chars();
        let indicator = chars.next()?;
        let rest = chars.as_str();
        if matches!(indicator, '|' | '>')
            && rest.chars().all(|c| c == '+' || c == '-' || c.is_ascii_digit())
        {
            Some(rest.contains('+'))
        } else {
            None
        }
    }

    /// Source text of a 1-based line without its trailing comment.
    fn line_content(&self, line: usize) -> Option<&'a str> {
        let text = *self.source_lines.get(line.checked_sub(1)?)?;
        match self.comment_on_line.get(line).copied().flatten() {
            Some(index) if !self.comments[index].whole_line => {
                let byte_col = text
                    .char_indices()
                    .nth(self.comments[index].col)
                    .map_or(text.len(), |(b, _)| b);
                text.get(..byte_col)
            }
            Some(_) => None,
            None => Some(text),
        }
    }

    /// The line of a `-` standing alone, when an item starts below its dash.
    fn bare_dash_line(&self, prev_end_line: usize, item_line: usize) -> Option<usize> {
        (prev_end_line..item_line)
            .rev()
            .find(|&line| self.line_content(line).is_some_and(|text| text.trim() == "-"))
    }

    /// Mark every comment and blank line after `header_line` up to `end_line`
    /// as scalar content.
    fn claim_lines(&mut self, header_line: usize, end_line: usize) {
        for line in (header_line + 1)..=end_line {
            if let Some(Some(index)) = self.comment_on_line.get(line) {
                self.used_comments[*index] = true;
            }
            if let Some(used) = self.used_blank_lines.get_mut(line) {
                *used = true;
            }
        }
    }

    // ─── Comment collection ─────────────────────────────────────────────────

    /// Whole-line comments and blank lines strictly between two lines.
    fn collect_between(&mut self, start_line: usize, end_line: usize) -> Comment {
        self.collect_lines(start_line, end_line, 0, true)
    }

    /// Comments closing a container: only lines at or right of the
    /// container's child column, stopping at the first shallower one.
    fn collect_end(
        &mut self,
        start_line: usize,
        end_line: usize,
        child_col: Option<usize>,
        flow: bool,
    ) -> Comment {
        let min_col = if flow { 0 } else { child_col.unwrap_or(0) };
        self.collect_lines(start_line, end_line, min_col, false)
    }

    fn collect_lines(
        &mut self,
        start_line: usize,
        end_line: usize,
        min_col: usize,
        keep_trailing_blank: bool,
    ) -> Comment {
        let comments = self.comments;
        let mut comment = Comment::new();
        let mut pending_blanks: Vec<usize> = Vec::new();
        let last_line = end_line.min(self.source_lines.len() + 1);
        for line in (start_line + 1)..last_line {
            if let Some(Some(index)) = self.comment_on_line.get(line).copied() {
                let source = &comments[index];
                if !source.whole_line {
                    pending_blanks.clear();
                    continue;
                }
                if self.used_comments[index] {
                    continue;
                }
                if source.col < min_col {
                    break;
                }
                self.flush_blanks(&mut pending_blanks, &mut comment);
                comment.push(source.text.clone());
                self.used_comments[index] = true;
            } else if self.is_blank_line(line) {
                if self.in_flow_context == 0 && !self.used_blank_lines[line] {
                    pending_blanks.push(line);
                }
            } else {
                pending_blanks.clear();
            }
        }
        if keep_trailing_blank {
            self.flush_blanks(&mut pending_blanks, &mut comment);
        }
        comment
    }

    /// A run of blank lines collapses to one empty comment line.
    fn flush_blanks(&mut self, pending: &mut Vec<usize>, comment: &mut Comment) {
        if pending.is_empty() {
            return;
        }
        for line in pending.drain(..) {
            self.used_blank_lines[line] = true;
        }
        comment.push(String::new());
    }

    /// An empty flow value (`key: {}`) owns the comment lines indented past
    /// its key that follow it.
    fn collect_after_empty_flow(
        &mut self,
        value: &mut Node,
        after_line: usize,
        owner_col: usize,
    ) {
        if self.in_flow_context > 0 {
            return;
        }
        let end_comment = match value {
            Node::Mapping(mapping) if mapping.flow && mapping.is_empty() => {
                &mut mapping.end_comment
            }
            Node::Sequence(sequence) if sequence.flow && sequence.is_empty() => {
                &mut sequence.end_comment
            }
            _ => return,
        };
        let next_line = self.peek().map_or(usize::MAX, |(_, span)| span.start.line());
        end_comment.append(self.collect_lines(after_line, next_line, owner_col + 1, false));
    }

    /// Same-line comments between the brackets of a flow collection have no
    /// place in the model.
    fn reject_flow_comments(&self, start: &Span, end: &Span) -> Result<(), Error> {
        let (first, last, close_col) = (start.start.line(), end.start.line(), end.start.col());
        let inside = self.comments.iter().enumerate().find(|(index, comment)| {
            !self.used_comments[*index]
                && comment.line >= first
                && (comment.line < last || (comment.line == last && comment.col < close_col))
        });
        match inside {
            Some((_, comment)) => Err(Error::Unsupported {
                feature: "comments inside flow collections",
                line: comment.line,
            }),
            None => Ok(()),
        }
    }

    /// Everything nobody claimed, for the document foot.
    fn collect_remaining(&mut self) -> Comment {
        let comments = self.comments;
        let mut comment = Comment::new();
        let mut prev_line: Option<usize> = None;
        for (index, source) in comments.iter().enumerate() {
            if self.used_comments[index] || !source.whole_line {
                continue;
            }
            if let Some(prev) = prev_line
                && ((prev + 1)..source.line).any(|line| self.is_blank_line(line))
            {
                comment.push(String::new());
            }
            comment.push(source.text.clone());
            self.used_comments[index] = true;
            prev_line = Some(source.line);
        }
        comment
    }

    /// Comments between a key and a value that starts on a later line.
    fn collect_before_value(&mut self, key_end_line: usize) -> Comment {
        let Some((_, span)) = self.peek() else {
            return Comment::new();
        };
        let value_line = span.start.line();
        if value_line <= key_end_line || self.peek_is_implicit_null() {
            return Comment::new();
        }
        self.collect_between(key_end_line, value_line)
    }

    fn take_trailing(&mut self, line: usize) -> Option<String> {
        let index = self.comment_on_line.get(line).copied().flatten()?;
        if self.used_comments[index] || self.comments[index].whole_line {
            return None;
        }
        self.used_comments[index] = true;
        Some(self.comments[index].text.clone())
    }

    /// Same-line comment of an entry or item: on its first line (`key: # c`
    /// or a block scalar header), otherwise on its last content line.
    fn take_inline(&mut self, first_line: usize, content_end: usize) -> Option<String> {
        if self.in_flow_context > 0 {
            return None;
        }
        self.take_trailing(first_line)
            .or_else(|| self.take_trailing(content_end))
    }

    /// Comment after a bare `-` whose item starts on a later line.
    fn take_dash_comment(&mut self, prev_end_line: usize, item_line: usize) -> Option<String> {
        if self.in_flow_context > 0 {
            return None;
        }
        (prev_end_line..item_line).find_map(|line| self.take_trailing(line))
    }
}

/// Comments between `key:` and its value belong to the value when it is a
/// container, otherwise they join the entry's leading comment.
fn attach_between(value: &mut Node, leading: &mut Comment, between: Comment) {
    if between.is_empty() {
        return;
    }
    match value {
        Node::Mapping(mapping) => mapping.block_comment.prepend(between),
        Node::Sequence(sequence) => sequence.block_comment.prepend(between),
        Node::Scalar(_) | Node::Absent => leading.append(between),
    }
}

use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

use indexmap::IndexMap;

/// Presentation style of a scalar value or a mapping key.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum ScalarStyle {
    #[default]
    Plain,
    SingleQuoted,
    DoubleQuoted,
    Literal,
    Folded,
}

impl ScalarStyle {
    pub fn is_block(self) -> bool {
        matches!(self, Self::Literal | Self::Folded)
    }
}

impl From<saphyr_parser::ScalarStyle> for ScalarStyle {
    fn from(style: saphyr_parser::ScalarStyle) -> Self {
        match style {
            saphyr_parser::ScalarStyle::SingleQuoted => Self::SingleQuoted,
            saphyr_parser::ScalarStyle::DoubleQuoted => Self::DoubleQuoted,
            saphyr_parser::ScalarStyle::Literal => Self::Literal,
            saphyr_parser::ScalarStyle::Folded => Self::Folded,
            _ => Self::Plain,
        }
    }
}

/// Type of a scalar under the YAML 1.2 core schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScalarKind {
    Null,
    Bool,
    Int,
    Float,
    Str,
}

/// An atomic value: its source text and the style it was written in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scalar {
    value: String,
    style: ScalarStyle,
}

impl Scalar {
    pub fn new(value: impl Into<String>, style: ScalarStyle) -> Self {
        Self {
            value: value.into(),
            style,
        }
    }

    /// A plain scalar. Values that cannot be written unquoted are still
    /// quoted by the printer.
    pub fn plain(value: impl Into<String>) -> Self {
        Self::new(value, ScalarStyle::Plain)
    }

    /// The `null` literal.
    pub fn null() -> Self {
        Self::plain("null")
    }

    pub fn value(&self) -> &str {
        &self.value
    }

    pub fn style(&self) -> ScalarStyle {
        self.style
    }

    /// Resolve the scalar's type. Quoted and block scalars are always strings.
    pub fn kind(&self) -> ScalarKind {
        if self.style != ScalarStyle::Plain {
            return ScalarKind::Str;
        }
        crate::utilities::resolve_plain(&self.value)
    }

    pub fn is_null_literal(&self) -> bool {
        self.kind() == ScalarKind::Null
    }
}

/// Comment lines owned by a container on behalf of one position.
///
/// Each line is the raw comment text starting with `#`; an empty string
/// stands for a preserved blank line. `indent` pins the column the lines are
/// printed at; `None` prints them at the column of their owner.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Comment {
    pub lines: Vec<String>,
    pub indent: Option<usize>,
}

impl Comment {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            lines: lines.into_iter().map(Into::into).collect(),
            indent: None,
        }
    }

    #[must_use]
    pub fn with_indent(mut self, indent: usize) -> Self {
        self.indent = Some(indent);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// True when there is no comment text, only blank lines or nothing.
    pub fn is_blank(&self) -> bool {
        self.lines.iter().all(|line| line.trim().is_empty())
    }

    pub fn push(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Put `other`'s lines in front of ours.
    pub fn prepend(&mut self, other: Comment) {
        let Comment { mut lines, indent } = other;
        lines.append(&mut self.lines);
        self.lines = lines;
        self.indent = self.indent.or(indent);
    }

    /// Put `other`'s lines after ours.
    pub fn append(&mut self, other: Comment) {
        let Comment { mut lines, indent } = other;
        self.lines.append(&mut lines);
        self.indent = self.indent.or(indent);
    }
}

/// One key of a mapping together with the comments the mapping keeps for it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappingEntry {
    pub key_style: ScalarStyle,
    pub value: Node,
    pub leading: Comment,
    pub inline: Option<String>,
}

impl MappingEntry {
    pub fn new(value: impl Into<Node>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_leading(mut self, leading: Comment) -> Self {
        self.leading = leading;
        self
    }

    #[must_use]
    pub fn with_inline(mut self, inline: impl Into<String>) -> Self {
        self.inline = Some(inline.into());
        self
    }
}

/// One element of a sequence together with its comments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SequenceItem {
    pub value: Node,
    pub leading: Comment,
    pub inline: Option<String>,
}

impl SequenceItem {
    pub fn new(value: impl Into<Node>) -> Self {
        Self {
            value: value.into(),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn with_leading(mut self, leading: Comment) -> Self {
        self.leading = leading;
        self
    }

    #[must_use]
    pub fn with_inline(mut self, inline: impl Into<String>) -> Self {
        self.inline = Some(inline.into());
        self
    }
}

/// Insertion-ordered mapping with unique keys.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Mapping {
    entries: IndexMap<String, MappingEntry>,
    pub flow: bool,
    pub block_comment: Comment,
    pub end_comment: Comment,
}

impl Mapping {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.get(key).map(|entry| &entry.value)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries.get_mut(key).map(|entry| &mut entry.value)
    }

    pub fn entry(&self, key: &str) -> Option<&MappingEntry> {
        self.entries.get(key)
    }

    pub fn entry_mut(&mut self, key: &str) -> Option<&mut MappingEntry> {
        self.entries.get_mut(key)
    }

    pub fn get_index_of(&self, key: &str) -> Option<usize> {
        self.entries.get_index_of(key)
    }

    pub fn get_index(&self, index: usize) -> Option<(&str, &MappingEntry)> {
        self.entries
            .get_index(index)
            .map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn get_index_mut(&mut self, index: usize) -> Option<(&str, &mut MappingEntry)> {
        self.entries
            .get_index_mut(index)
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Insert an entry. An existing key keeps its position and gets the new
    /// entry; the previous one is returned.
    pub fn insert(&mut self, key: impl Into<String>, entry: MappingEntry) -> Option<MappingEntry> {
        self.entries.insert(key.into(), entry)
    }

    /// Insert a bare value with no comments.
    pub fn insert_value(&mut self, key: impl Into<String>, value: impl Into<Node>) {
        self.insert(key, MappingEntry::new(value));
    }

    /// Remove the entry at `index`, shifting later entries up.
    pub fn remove_index(&mut self, index: usize) -> Option<(String, MappingEntry)> {
        self.entries.shift_remove_index(index)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &MappingEntry)> {
        self.entries.iter().map(|(key, entry)| (key.as_str(), entry))
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = (&str, &mut MappingEntry)> {
        self.entries
            .iter_mut()
            .map(|(key, entry)| (key.as_str(), entry))
    }

    /// Split into entries and the container's own comments.
    pub fn into_parts(self) -> (IndexMap<String, MappingEntry>, Comment, Comment) {
        (self.entries, self.block_comment, self.end_comment)
    }
}

impl<K: Into<String>> FromIterator<(K, Node)> for Mapping {
    fn from_iter<T: IntoIterator<Item = (K, Node)>>(iter: T) -> Self {
        let mut mapping = Mapping::new();
        for (key, value) in iter {
            mapping.insert_value(key, value);
        }
        mapping
    }
}

/// Ordered list of items.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Sequence {
    pub items: Vec<SequenceItem>,
    pub flow: bool,
    pub block_comment: Comment,
    pub end_comment: Comment,
}

impl Sequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Node> {
        self.items.get(index).map(|item| &item.value)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Node> {
        self.items.get_mut(index).map(|item| &mut item.value)
    }

    pub fn push(&mut self, value: impl Into<Node>) {
        self.items.push(SequenceItem::new(value));
    }

    pub fn values(&self) -> impl Iterator<Item = &Node> {
        self.items.iter().map(|item| &item.value)
    }
}

impl FromIterator<Node> for Sequence {
    fn from_iter<T: IntoIterator<Item = Node>>(iter: T) -> Self {
        Self {
            items: iter.into_iter().map(SequenceItem::new).collect(),
            ..Self::default()
        }
    }
}

/// A value in the document tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Node {
    Mapping(Mapping),
    Sequence(Sequence),
    Scalar(Scalar),
    /// No value at all, as in `key:` with nothing after it.
    #[default]
    Absent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Mapping,
    Sequence,
    Scalar,
    Absent,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Mapping => "mapping",
            Self::Sequence => "sequence",
            Self::Scalar => "scalar",
            Self::Absent => "absent value",
        })
    }
}

impl Node {
    pub fn kind(&self) -> NodeKind {
        match self {
            Self::Mapping(_) => NodeKind::Mapping,
            Self::Sequence(_) => NodeKind::Sequence,
            Self::Scalar(_) => NodeKind::Scalar,
            Self::Absent => NodeKind::Absent,
        }
    }

    pub fn is_absent(&self) -> bool {
        matches!(self, Self::Absent)
    }

    pub fn as_mapping(&self) -> Option<&Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Mapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&Sequence> {
        match self {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Sequence> {
        match self {
            Self::Sequence(sequence) => Some(sequence),
            _ => None,
        }
    }

    pub fn as_scalar(&self) -> Option<&Scalar> {
        match self {
            Self::Scalar(scalar) => Some(scalar),
            _ => None,
        }
    }

    /// Shorthand for a plain scalar node.
    pub fn plain(value: impl Into<String>) -> Self {
        Self::Scalar(Scalar::plain(value))
    }
}

impl From<Mapping> for Node {
    fn from(mapping: Mapping) -> Self {
        Self::Mapping(mapping)
    }
}

impl From<Sequence> for Node {
    fn from(sequence: Sequence) -> Self {
        Self::Sequence(sequence)
    }
}

impl From<Scalar> for Node {
    fn from(scalar: Scalar) -> Self {
        Self::Scalar(scalar)
    }
}

/// A parsed YAML document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    pub root: Node,
    /// Comments before an explicit `---`, or before a scalar root.
    pub head: Comment,
    /// Comments after the root that no container claimed.
    pub foot: Comment,
    pub explicit_start: bool,
}

impl Document {
    pub fn new(root: impl Into<Node>) -> Self {
        Self {
            root: root.into(),
            ..Self::default()
        }
    }
}

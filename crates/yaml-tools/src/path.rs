use alloc::borrow::Cow;
use core::fmt;

use commented_yaml::Node;

use crate::error::Error;

/// One step of a [`NodePath`].
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    Key(String),
    Index(usize),
}

impl Segment {
    /// Read a single segment: all-digit text is an index, anything else a key.
    pub fn from_text(text: &str) -> Self {
        match parse_index(text) {
            Some(index) if index.to_string() == text => Self::Index(index),
            _ => Self::Key(text.to_owned()),
        }
    }

    /// The key this segment names when it is applied to a mapping. An index
    /// names the key with the same text.
    pub fn key(&self) -> Cow<'_, str> {
        match self {
            Self::Key(key) => Cow::Borrowed(key),
            Self::Index(index) => Cow::Owned(index.to_string()),
        }
    }

    /// The position this segment names when it is applied to a sequence.
    pub fn index(&self) -> Option<usize> {
        match self {
            Self::Key(key) => parse_index(key),
            Self::Index(index) => Some(*index),
        }
    }
}

fn parse_index(text: &str) -> Option<usize> {
    if text.is_empty() || !text.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// The location of a node, as the keys and positions leading to it from the
/// document root.
///
/// Paths are written `key1.list[0].key2`; a bare number between dots is an
/// index as well, so `list.0` and `list[0]` are the same path. The empty
/// path is the root and displays as `<root>`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct NodePath {
    segments: Vec<Segment>,
}

impl NodePath {
    pub fn root() -> Self {
        Self::default()
    }

    /// Parse the dotted form, e.g. `key1.list[0].key2` or `m[0][1]`.
    ///
    /// Brackets that do not hold a number are taken literally, as part of
    /// the key.
    pub fn parse(text: &str) -> Self {
        if text.is_empty() {
            return Self::root();
        }
        let mut segments = Vec::new();
        for part in text.split('.') {
            let (key, indexes) = split_brackets(part);
            if !key.is_empty() || indexes.is_empty() {
                segments.push(Segment::from_text(key));
            }
            segments.extend(indexes.into_iter().map(Segment::Index));
        }
        Self { segments }
    }

    /// Build a path from already split segments, such as the positional
    /// arguments `test foo h 2 check`. Each item is exactly one segment, so
    /// keys may contain dots and brackets.
    pub fn from_segments<I, S>(segments: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            segments: segments
                .into_iter()
                .map(|segment| Segment::from_text(segment.as_ref()))
                .collect(),
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn len(&self) -> usize {
        self.segments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// This path extended by one segment.
    #[must_use]
    pub fn child(&self, segment: Segment) -> Self {
        let mut segments = self.segments.clone();
        segments.push(segment);
        Self { segments }
    }

    /// Split off the last segment, returning it together with the parent path.
    pub fn split_last(&self) -> Option<(&Segment, NodePath)> {
        let (last, parent) = self.segments.split_last()?;
        Some((
            last,
            Self {
                segments: parent.to_vec(),
            },
        ))
    }

    fn prefix(&self, len: usize) -> Self {
        Self {
            segments: self.segments[..len].to_vec(),
        }
    }
}

/// `name[1][2]` → (`name`, [1, 2]). Anything that is not a run of numeric
/// brackets at the end stays in the name.
fn split_brackets(part: &str) -> (&str, Vec<usize>) {
    let mut indexes = Vec::new();
    let mut rest = part;
    while let Some(inner) = rest.strip_suffix(']') {
        let Some(open) = inner.rfind('[') else {
            break;
        };
        let Some(index) = parse_index(&inner[open + 1..]) else {
            break;
        };
        indexes.push(index);
        rest = &inner[..open];
    }
    indexes.reverse();
    (rest, indexes)
}

impl fmt::Display for NodePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.segments.is_empty() {
            return f.write_str("<root>");
        }
        for (position, segment) in self.segments.iter().enumerate() {
            match segment {
                Segment::Key(key) => {
                    if position > 0 {
                        f.write_str(".")?;
                    }
                    f.write_str(key)?;
                }
                Segment::Index(index) => write!(f, "[{index}]")?,
            }
        }
        Ok(())
    }
}

impl FromIterator<Segment> for NodePath {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().collect(),
        }
    }
}

impl Extend<Segment> for NodePath {
    fn extend<I: IntoIterator<Item = Segment>>(&mut self, iter: I) {
        self.segments.extend(iter);
    }
}

/// Where `segment` points inside `container`, validated against its keys or
/// length. `at` is the path of `container`, used for errors.
///
/// # Errors
///
/// `KeyNotFound` for a missing mapping key, `InvalidIndex` or
/// `IndexOutOfRange` for a bad sequence position and `NotIndexable` when
/// `container` is a scalar or absent.
pub(crate) fn position(container: &Node, segment: &Segment, at: &NodePath) -> Result<usize, Error> {
    match container {
        Node::Mapping(mapping) => {
            let key = segment.key();
            mapping
                .get_index_of(&key)
                .ok_or_else(|| Error::KeyNotFound {
                    path: at.clone(),
                    key: key.into_owned(),
                })
        }
        Node::Sequence(sequence) => {
            let index = segment.index().ok_or_else(|| Error::InvalidIndex {
                path: at.clone(),
                segment: segment.to_string(),
            })?;
            if index < sequence.len() {
                Ok(index)
            } else {
                Err(Error::IndexOutOfRange {
                    path: at.clone(),
                    index,
                    length: sequence.len(),
                })
            }
        }
        Node::Scalar(_) | Node::Absent => Err(Error::NotIndexable {
            path: at.clone(),
            kind: container.kind(),
        }),
    }
}

fn child_at(container: &Node, position: usize) -> Option<&Node> {
    match container {
        Node::Mapping(mapping) => mapping.get_index(position).map(|(_, entry)| &entry.value),
        Node::Sequence(sequence) => sequence.get(position),
        Node::Scalar(_) | Node::Absent => None,
    }
}

fn child_at_mut(container: &mut Node, position: usize) -> Option<&mut Node> {
    match container {
        Node::Mapping(mapping) => mapping
            .get_index_mut(position)
            .map(|(_, entry)| &mut entry.value),
        Node::Sequence(sequence) => sequence.get_mut(position),
        Node::Scalar(_) | Node::Absent => None,
    }
}

fn lost_child(at: &NodePath) -> Error {
    Error::Structural {
        path: at.clone(),
        reason: "child disappeared while descending".into(),
    }
}

/// Follow `path` from `root`.
///
/// # Errors
///
/// Fails with the error of the first segment that cannot be followed:
/// `KeyNotFound`, `InvalidIndex`, `IndexOutOfRange` or `NotIndexable`.
pub fn resolve<'a>(root: &'a Node, path: &NodePath) -> Result<&'a Node, Error> {
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        let at = path.prefix(depth);
        let found = position(node, segment, &at)?;
        node = child_at(node, found).ok_or_else(|| lost_child(&at))?;
    }
    Ok(node)
}

/// Follow `path` from `root`, for editing.
///
/// # Errors
///
/// Same as [`resolve`].
pub fn resolve_mut<'a>(root: &'a mut Node, path: &NodePath) -> Result<&'a mut Node, Error> {
    let mut node = root;
    for (depth, segment) in path.segments().iter().enumerate() {
        let at = path.prefix(depth);
        let found = position(node, segment, &at)?;
        node = child_at_mut(node, found).ok_or_else(|| lost_child(&at))?;
    }
    Ok(node)
}

#[cfg(test)]
mod tests {
    use super::*;
    use commented_yaml::parse_document;

    fn key(text: &str) -> Segment {
        Segment::Key(text.into())
    }

    #[test]
    fn parses_dotted_paths() {
        assert_eq!(
            NodePath::parse("key1.list[0].key2").segments(),
            [key("key1"), key("list"), Segment::Index(0), key("key2")]
        );
        assert_eq!(
            NodePath::parse("m[0][1]").segments(),
            [key("m"), Segment::Index(0), Segment::Index(1)]
        );
        assert_eq!(
            NodePath::parse("test.foo.h.2").segments(),
            [key("test"), key("foo"), key("h"), Segment::Index(2)]
        );
        assert_eq!(NodePath::parse("[3]").segments(), [Segment::Index(3)]);
        assert!(NodePath::parse("").is_empty());
    }

    #[test]
    fn non_numeric_brackets_stay_in_the_key() {
        assert_eq!(NodePath::parse("a[b]").segments(), [key("a[b]")]);
        assert_eq!(NodePath::parse("a[1").segments(), [key("a[1")]);
        assert_eq!(NodePath::parse("007").segments(), [key("007")]);
    }

    #[test]
    fn split_and_dotted_forms_agree() {
        assert_eq!(
            NodePath::from_segments(["test", "foo", "h", "2", "check"]),
            NodePath::parse("test.foo.h[2].check")
        );
        assert_eq!(
            NodePath::from_segments(["a.b"]).segments(),
            [key("a.b")]
        );
    }

    #[test]
    fn display() {
        assert_eq!(NodePath::root().to_string(), "<root>");
        assert_eq!(
            NodePath::parse("test.foo.h.2.check").to_string(),
            "test.foo.h[2].check"
        );
        assert_eq!(NodePath::parse("[0].a").to_string(), "[0].a");
    }

    #[test]
    fn resolves_keys_and_indexes() {
        let document =
            parse_document("test:\n  list:\n  - a\n  - b: deep\n  8080: port\n").expect("parse");
        let root = &document.root;
        assert_eq!(resolve(root, &NodePath::root()), Ok(root));
        assert_eq!(
            resolve(root, &NodePath::parse("test.list[1].b")),
            Ok(&Node::plain("deep"))
        );
        assert_eq!(
            resolve(root, &NodePath::parse("test.list.0")),
            Ok(&Node::plain("a"))
        );
        assert_eq!(
            resolve(root, &NodePath::parse("test.8080")),
            Ok(&Node::plain("port"))
        );
    }

    #[test]
    fn resolution_errors_name_the_path() {
        let document = parse_document("test:\n  list:\n  - a\n  name: x\n").expect("parse");
        let root = &document.root;
        assert_eq!(
            resolve(root, &NodePath::parse("test.missing.deeper")),
            Err(Error::KeyNotFound {
                path: NodePath::parse("test"),
                key: "missing".into(),
            })
        );
        assert_eq!(
            resolve(root, &NodePath::parse("test.list[5]")),
            Err(Error::IndexOutOfRange {
                path: NodePath::parse("test.list"),
                index: 5,
                length: 1,
            })
        );
        assert_eq!(
            resolve(root, &NodePath::parse("test.list.first")),
            Err(Error::InvalidIndex {
                path: NodePath::parse("test.list"),
                segment: "first".into(),
            })
        );
        assert_eq!(
            resolve(root, &NodePath::parse("test.name.x")),
            Err(Error::NotIndexable {
                path: NodePath::parse("test.name"),
                kind: commented_yaml::NodeKind::Scalar,
            })
        );
    }

    #[test]
    fn resolve_mut_edits_in_place() {
        let mut document = parse_document("a:\n  b: 1\n").expect("parse");
        *resolve_mut(&mut document.root, &NodePath::parse("a.b")).expect("resolve") =
            Node::plain("2");
        assert_eq!(
            resolve(&document.root, &NodePath::parse("a.b")),
            Ok(&Node::plain("2"))
        );
    }
}

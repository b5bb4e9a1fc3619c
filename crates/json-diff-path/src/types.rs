//! Path representation.
//!
//! A [`Path`] is a sequence of [`PathSegment`]s. Key segments navigate into
//! objects and arrays; tag and shape segments only assert something about the
//! value reached so far and never descend.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::util::{escape_component, is_valid_index, unescape_component};

/// An object property name or an array index.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Key {
    Index(usize),
    Field(String),
}

impl Key {
    /// Array index addressed by this key, if any.
    ///
    /// Fields holding a canonical index (`"3"`) count as indices so that
    /// paths parsed from JSON Pointers work against arrays.
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Key::Index(i) => Some(*i),
            Key::Field(s) if is_valid_index(s) => s.parse().ok(),
            Key::Field(_) => None,
        }
    }

    /// Property name addressed by this key when the container is an object.
    pub fn as_field(&self) -> Cow<'_, str> {
        match self {
            Key::Index(i) => Cow::Owned(i.to_string()),
            Key::Field(s) => Cow::Borrowed(s),
        }
    }

    /// `true` for the `-` end-of-array marker.
    pub fn is_append(&self) -> bool {
        matches!(self, Key::Field(s) if s == "-")
    }

    /// `true` if both keys address the same slot, so `Index(0)` and
    /// `Field("0")` match.
    pub fn same_slot(&self, other: &Key) -> bool {
        match (self.as_index(), other.as_index()) {
            (Some(a), Some(b)) => a == b,
            _ => self.as_field() == other.as_field(),
        }
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Key::Index(i) => write!(f, "{i}"),
            Key::Field(s) => f.write_str(s),
        }
    }
}

impl From<&str> for Key {
    fn from(s: &str) -> Self {
        Key::Field(s.to_owned())
    }
}

impl From<String> for Key {
    fn from(s: String) -> Self {
        Key::Field(s)
    }
}

impl From<usize> for Key {
    fn from(i: usize) -> Self {
        Key::Index(i)
    }
}

/// One step of a [`Path`].
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PathSegment {
    /// Descend into an object property or array element.
    Key(Key),
    /// Assert the value here is a tagged union whose `name` field equals `value`.
    Tag { name: String, value: String },
    /// Assert the value here is (`true`) or is not (`false`) a single item
    /// rather than an array.
    Single(bool),
}

impl PathSegment {
    pub fn as_key(&self) -> Option<&Key> {
        match self {
            PathSegment::Key(k) => Some(k),
            _ => None,
        }
    }

    /// `true` for segments that assert without navigating.
    pub fn is_refinement(&self) -> bool {
        !matches!(self, PathSegment::Key(_))
    }
}

impl fmt::Display for PathSegment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PathSegment::Key(k) => write!(f, "/{}", escape_component(&k.as_field())),
            PathSegment::Tag { name, value } => write!(f, "[{name}={value}]"),
            PathSegment::Single(true) => f.write_str("[single]"),
            PathSegment::Single(false) => f.write_str("[many]"),
        }
    }
}

impl From<Key> for PathSegment {
    fn from(k: Key) -> Self {
        PathSegment::Key(k)
    }
}

/// An ordered list of segments; the empty path addresses the root.
///
/// # Examples
///
/// ```
/// use json_diff_path::Path;
///
/// let path = Path::root().key("shapes").index(0).tag("type", "circle").key("radius");
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.to_string(), "/shapes/0[type=circle]/radius");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Path(Vec<PathSegment>);

impl Path {
    /// The empty path.
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    #[inline]
    pub fn from_segments(segments: Vec<PathSegment>) -> Self {
        Self(segments)
    }

    /// Append a key segment and return self (builder pattern).
    pub fn key(mut self, k: impl Into<Key>) -> Self {
        self.0.push(PathSegment::Key(k.into()));
        self
    }

    /// Append an index segment and return self (builder pattern).
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(PathSegment::Key(Key::Index(i)));
        self
    }

    /// Append a tagged-union refinement and return self.
    pub fn tag(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.push(PathSegment::Tag {
            name: name.into(),
            value: value.into(),
        });
        self
    }

    /// Append a single-vs-array shape assertion and return self.
    pub fn single(mut self, is_single: bool) -> Self {
        self.0.push(PathSegment::Single(is_single));
        self
    }

    pub fn push(&mut self, seg: PathSegment) {
        self.0.push(seg);
    }

    #[inline]
    pub fn segments(&self) -> &[PathSegment] {
        &self.0
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// `prefix ++ self`: re-roots a relative path under `prefix`.
    pub fn rebase(&self, prefix: &Path) -> Path {
        let mut segments = Vec::with_capacity(prefix.len() + self.len());
        segments.extend_from_slice(&prefix.0);
        segments.extend_from_slice(&self.0);
        Path(segments)
    }

    /// `self ++ suffix`.
    pub fn join(&self, suffix: &Path) -> Path {
        suffix.rebase(self)
    }

    /// Path with `n` leading segments; clamps to the full path.
    pub fn prefix(&self, n: usize) -> Path {
        Path(self.0[..n.min(self.0.len())].to_vec())
    }

    /// Splits around the last key segment.
    ///
    /// Returns the segments before it, the key, and any trailing refinement
    /// segments. `None` when the path contains no key at all.
    pub fn split_last_key(&self) -> Option<(&[PathSegment], &Key, &[PathSegment])> {
        let pos = self.0.iter().rposition(|s| !s.is_refinement())?;
        let key = self.0[pos].as_key()?;
        Some((&self.0[..pos], key, &self.0[pos + 1..]))
    }

    /// Returns `true` if `prefix` is equal to or an ancestor of this path.
    ///
    /// Keys are compared by the slot they address, so a pointer-parsed
    /// `/0` is a prefix of `Path::root().index(0)`.
    pub fn starts_with(&self, prefix: &Path) -> bool {
        self.0.len() >= prefix.0.len()
            && self.0.iter().zip(&prefix.0).all(|(seg, pre)| match (seg, pre) {
                (PathSegment::Key(a), PathSegment::Key(b)) => a.same_slot(b),
                _ => seg == pre,
            })
    }

    /// Key-only view of the path, or `None` if it carries refinements.
    pub fn keys(&self) -> Option<Vec<&Key>> {
        self.0.iter().map(PathSegment::as_key).collect()
    }

    /// Parses an RFC 6901 pointer; every component becomes a field key.
    ///
    /// ```
    /// use json_diff_path::{Key, Path};
    ///
    /// let p = Path::from_pointer("/a~1b/0");
    /// assert_eq!(p, Path::root().key("a/b").key("0"));
    /// assert_eq!(Path::from_pointer(""), Path::root());
    /// ```
    pub fn from_pointer(pointer: &str) -> Path {
        if pointer.is_empty() {
            return Path::root();
        }
        let body = pointer.strip_prefix('/').unwrap_or(pointer);
        Path(
            body.split('/')
                .map(|c| PathSegment::Key(Key::Field(unescape_component(c))))
                .collect(),
        )
    }

    /// Formats as an RFC 6901 pointer, or `None` if the path has refinements.
    pub fn to_pointer(&self) -> Option<String> {
        let keys = self.keys()?;
        let mut out = String::new();
        for key in keys {
            out.push('/');
            out.push_str(&escape_component(&key.as_field()));
        }
        Some(out)
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for seg in &self.0 {
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl From<Vec<PathSegment>> for Path {
    fn from(segments: Vec<PathSegment>) -> Self {
        Path(segments)
    }
}

impl FromIterator<PathSegment> for Path {
    fn from_iter<I: IntoIterator<Item = PathSegment>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Path {
    type Item = &'a PathSegment;
    type IntoIter = std::slice::Iter<'a, PathSegment>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_index_interop() {
        assert_eq!(Key::from("3").as_index(), Some(3));
        assert_eq!(Key::from("03").as_index(), None);
        assert_eq!(Key::from("x").as_index(), None);
        assert_eq!(Key::Index(7).as_field(), "7");
        assert!(Key::from("-").is_append());
    }

    #[test]
    fn split_last_key_skips_trailing_refinements() {
        let p = Path::root().key("a").index(2).tag("type", "circle").single(true);
        let (prefix, key, trailing) = p.split_last_key().unwrap();
        assert_eq!(prefix.len(), 1);
        assert_eq!(key, &Key::Index(2));
        assert_eq!(trailing.len(), 2);
        assert!(Path::root().tag("type", "x").split_last_key().is_none());
        assert!(Path::root().split_last_key().is_none());
    }

    #[test]
    fn rebase_prepends() {
        let parent = Path::root().key("meta");
        let child = Path::root().key("tags").index(0);
        assert_eq!(child.rebase(&parent), Path::root().key("meta").key("tags").index(0));
        assert_eq!(parent.join(&child), child.rebase(&parent));
    }

    #[test]
    fn starts_with() {
        let p = Path::root().key("a").key("b");
        assert!(p.starts_with(&Path::root()));
        assert!(p.starts_with(&Path::root().key("a")));
        assert!(!p.starts_with(&Path::root().key("b")));
        assert!(!Path::root().key("a").starts_with(&p));
    }

    #[test]
    fn starts_with_matches_index_and_numeric_field() {
        let indexed = Path::root().key("list").index(0);
        let parsed = Path::from_pointer("/list/0/name");
        assert!(parsed.starts_with(&indexed));
        assert!(indexed.starts_with(&Path::from_pointer("/list/0")));
        assert!(!parsed.starts_with(&Path::root().key("list").index(1)));
        assert!(!Path::from_pointer("/list/00").starts_with(&indexed));
        assert!(Key::Index(7).same_slot(&Key::from("7")));
        assert!(!Key::from("-").same_slot(&Key::Index(0)));
    }

    #[test]
    fn pointer_roundtrip() {
        for pointer in ["", "/", "/foo", "/foo/bar", "/a~0b/c~1d/1", "/foo///"] {
            let path = Path::from_pointer(pointer);
            assert_eq!(path.to_pointer().as_deref(), Some(pointer), "{pointer}");
        }
        assert_eq!(Path::root().key("a").tag("t", "v").to_pointer(), None);
    }

    #[test]
    fn display() {
        let p = Path::root().key("items").single(false).index(1);
        assert_eq!(p.to_string(), "/items[many]/1");
        assert_eq!(Path::root().to_string(), "");
    }

    #[test]
    fn serde_shape() {
        let p = Path::root().key("a").index(0).tag("type", "circle").single(true);
        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(
            json,
            serde_json::json!([
                {"key": "a"},
                {"key": 0},
                {"tag": {"name": "type", "value": "circle"}},
                {"single": true}
            ])
        );
        let back: Path = serde_json::from_value(json).unwrap();
        assert_eq!(back, p);
    }
}

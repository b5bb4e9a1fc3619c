//! Path builder: ergonomic construction of [`PendingOp`]s.
//!
//! A [`PathBuilder`] is an immutable path under construction. Navigation
//! methods return a new builder; terminal methods return plain
//! [`PendingOp`] data carrying the accumulated path.
//!
//! # Example
//!
//! ```
//! use json_diff::builder::PathBuilder;
//! use json_diff::pending::PendingOp;
//! use json_diff_path::Path;
//! use json_diff_util::Value;
//!
//! let doc = PathBuilder::new();
//! let radius = doc.key("shapes").index(0).variant("circle").key("r");
//! assert_eq!(
//!     radius.path(),
//!     &Path::root().key("shapes").index(0).tag("type", "circle").key("r")
//! );
//! assert!(matches!(radius.replace(2), PendingOp::Replace { .. }));
//! ```

use std::cell::RefCell;
use std::collections::HashMap;
use std::sync::Arc;

use json_diff_path::{Key, Path};
use json_diff_util::Value;

use crate::pending::PendingOp;

/// Field a tagged union is discriminated by unless told otherwise.
pub const DEFAULT_DISCRIMINANT: &str = "type";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PathBuilder {
    path: Path,
    discriminant: String,
}

impl Default for PathBuilder {
    fn default() -> Self {
        Self::at(Path::root())
    }
}

impl PathBuilder {
    /// Builder at the document root.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder starting from an existing path.
    pub fn at(path: Path) -> Self {
        Self {
            path,
            discriminant: DEFAULT_DISCRIMINANT.to_string(),
        }
    }

    fn with(&self, path: Path) -> Self {
        Self {
            path,
            discriminant: self.discriminant.clone(),
        }
    }

    pub fn key(&self, key: impl Into<Key>) -> Self {
        self.with(self.path.clone().key(key))
    }

    pub fn index(&self, index: usize) -> Self {
        self.with(self.path.clone().index(index))
    }

    /// Field name used by subsequent [`variant`](Self::variant) calls.
    pub fn discriminant(&self, name: impl Into<String>) -> Self {
        Self {
            path: self.path.clone(),
            discriminant: name.into(),
        }
    }

    /// Refines into the arm of a tagged union whose discriminant equals `tag`.
    pub fn variant(&self, tag: impl Into<String>) -> Self {
        self.with(self.path.clone().tag(self.discriminant.clone(), tag))
    }

    /// Asserts the value here is (`true`) or is not (`false`) a single item.
    pub fn single(&self, is_single: bool) -> Self {
        self.with(self.path.clone().single(is_single))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn into_path(self) -> Path {
        self.path
    }

    // ── Terminals ─────────────────────────────────────────────────────────

    pub fn add(&self, value: impl Into<Value>) -> PendingOp {
        PendingOp::Add {
            path: self.path.clone(),
            value: value.into(),
        }
    }

    pub fn replace(&self, value: impl Into<Value>) -> PendingOp {
        PendingOp::Replace {
            path: self.path.clone(),
            value: value.into(),
        }
    }

    pub fn remove(&self) -> PendingOp {
        PendingOp::Remove {
            path: self.path.clone(),
        }
    }

    pub fn push(&self, value: impl Into<Value>) -> PendingOp {
        PendingOp::Push {
            path: self.path.clone(),
            value: value.into(),
        }
    }

    /// Defers building sub-intents until the value here is known. Paths of
    /// the returned intents are relative to this builder's path.
    pub fn nested<F>(&self, make: F) -> PendingOp
    where
        F: Fn(Option<&Value>) -> Vec<PendingOp> + Send + Sync + 'static,
    {
        PendingOp::nested(self.path.clone(), make)
    }

    /// Moves the value here to `dest`.
    pub fn move_to(&self, dest: &PathBuilder) -> PendingOp {
        PendingOp::Move {
            from: self.path.clone(),
            path: dest.path.clone(),
        }
    }
}

/// Value-taking terminal kinds an [`Editor`] can hand out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OpKind {
    Add,
    Replace,
    Push,
}

/// Reusable operation callback.
pub type OpHandle = Arc<dyn Fn(Value) -> PendingOp + Send + Sync>;

/// Hands out operation callbacks, one per distinct `(path, kind)`.
///
/// Asking twice for the same path and kind returns the same handle, so UI
/// bindings can compare callbacks by pointer.
#[derive(Default)]
pub struct Editor {
    cache: RefCell<HashMap<(Path, OpKind), OpHandle>>,
}

impl Editor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn handle(&self, at: &PathBuilder, kind: OpKind) -> OpHandle {
        let key = (at.path().clone(), kind);
        let mut cache = self.cache.borrow_mut();
        let handle = cache
            .entry(key)
            .or_insert_with(|| make_handle(at.path().clone(), kind));
        Arc::clone(handle)
    }

    pub fn len(&self) -> usize {
        self.cache.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.borrow().is_empty()
    }

    /// Drops every cached handle.
    pub fn clear(&self) {
        self.cache.borrow_mut().clear();
    }
}

fn make_handle(path: Path, kind: OpKind) -> OpHandle {
    match kind {
        OpKind::Add => Arc::new(move |value: Value| PendingOp::Add {
            path: path.clone(),
            value,
        }),
        OpKind::Replace => Arc::new(move |value: Value| PendingOp::Replace {
            path: path.clone(),
            value,
        }),
        OpKind::Push => Arc::new(move |value: Value| PendingOp::Push {
            path: path.clone(),
            value,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn navigation_does_not_mutate() {
        let root = PathBuilder::new();
        let meta = root.key("meta");
        let tags = meta.key("tags");
        assert!(root.path().is_empty());
        assert_eq!(meta.path(), &Path::root().key("meta"));
        assert_eq!(tags.path(), &Path::root().key("meta").key("tags"));
    }

    #[test]
    fn custom_discriminant() {
        let b = PathBuilder::new().key("node").discriminant("kind").variant("leaf");
        assert_eq!(b.path(), &Path::root().key("node").tag("kind", "leaf"));
    }

    #[test]
    fn single_appends_shape_assertion() {
        let b = PathBuilder::new().key("items").single(false).index(0);
        assert_eq!(b.path().to_string(), "/items[many]/0");
    }

    #[test]
    fn terminals_carry_path() {
        let tags = PathBuilder::new().key("meta").key("tags");
        match tags.push("published") {
            PendingOp::Push { path, value } => {
                assert_eq!(path, Path::root().key("meta").key("tags"));
                assert_eq!(value, Value::from("published"));
            }
            other => panic!("unexpected {other:?}"),
        }
        assert!(matches!(tags.index(0).remove(), PendingOp::Remove { .. }));
        assert!(matches!(tags.add(Value::Null), PendingOp::Add { .. }));
        assert!(matches!(tags.nested(|_| vec![]), PendingOp::Nested { .. }));
        match tags.index(0).move_to(&tags.index(1)) {
            PendingOp::Move { from, path } => {
                assert_eq!(from, Path::root().key("meta").key("tags").index(0));
                assert_eq!(path, Path::root().key("meta").key("tags").index(1));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn editor_caches_handles_per_path_and_kind() {
        let editor = Editor::new();
        let title = PathBuilder::new().key("title");
        let first = editor.handle(&title, OpKind::Replace);
        let again = editor.handle(&PathBuilder::new().key("title"), OpKind::Replace);
        assert!(Arc::ptr_eq(&first, &again));

        let other_kind = editor.handle(&title, OpKind::Add);
        assert!(!Arc::ptr_eq(&first, &other_kind));
        assert_eq!(editor.len(), 2);

        match first(Value::from("x")) {
            PendingOp::Replace { path, value } => {
                assert_eq!(path, Path::root().key("title"));
                assert_eq!(value, Value::from("x"));
            }
            other => panic!("unexpected {other:?}"),
        }

        editor.clear();
        let fresh = editor.handle(&title, OpKind::Replace);
        assert!(!Arc::ptr_eq(&first, &fresh));
    }
}

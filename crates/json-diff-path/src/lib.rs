//! Typed paths over persistent JSON values.
//!
//! A [`Path`] extends an RFC 6901 pointer with two kinds of refinement
//! segments: a tagged-union assertion (`[type=circle]`) and a single-vs-array
//! shape assertion. Refinements never navigate; they only check the value
//! reached so far.
//!
//! Reads go through [`get`]. Writes ([`set_at_end`], [`insert_at_end`],
//! [`delete_at_end`]) never touch their input: they return a new root that
//! shares every untouched subtree with the old one.
//!
//! # Example
//!
//! ```
//! use json_diff_path::{get, set_at_end, Path};
//! use json_diff_util::Value;
//! use serde_json::json;
//!
//! let doc = Value::from(json!({"meta": {"tags": ["draft"]}, "title": "First Draft"}));
//! let title = Path::root().key("title");
//!
//! let (next, old) = set_at_end(&doc, &title, Value::from("Final")).unwrap();
//! assert_eq!(old, Some(Value::from("First Draft")));
//! assert_eq!(get(&next, &title).unwrap(), Some(&Value::from("Final")));
//! // the untouched branch is shared, not copied
//! assert!(doc.get("meta").unwrap().same(next.get("meta").unwrap()));
//! ```

use thiserror::Error;

mod find;
mod mutate;
pub mod types;
pub mod util;

pub use find::{get, get_existing};
pub use json_diff_util::Value;
pub use mutate::{delete_at_end, get_cloned, insert_at_end, set_at_end};
pub use types::{Key, Path, PathSegment};
pub use util::{escape_component, is_valid_index, unescape_component};

/// Failure to address a location inside a document.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AddressError {
    #[error("MISSING_BASE: nothing to descend into at {path}")]
    MissingBase { path: Path },
    #[error("INVALID_INDEX: key {key:?} cannot index an array at {path}")]
    InvalidArrayKey { key: String, path: Path },
    #[error("NOT_A_CONTAINER: expected object or array at {path}, found {found}")]
    NotAnObject { path: Path, found: &'static str },
    #[error("NOT_TAGGED: value at {path} has no string field {name:?}")]
    NotTaggedUnion { path: Path, name: String },
    #[error("WRONG_TAG: expected {expected:?} at {path}, found {found:?}")]
    WrongTag {
        path: Path,
        expected: String,
        found: String,
    },
    #[error("WRONG_SHAPE: expected single={expected_single} at {path}")]
    WrongShape { path: Path, expected_single: bool },
    #[error("NOT_FOUND: {path}")]
    NotFound { path: Path },
    #[error("KEY_EXISTS: {path}")]
    KeyExists { path: Path },
    #[error("INVALID_INDEX: index {index} out of bounds (len {len}) at {path}")]
    IndexOutOfBounds { path: Path, index: usize, len: usize },
    #[error("ROOT_TARGET: the document root cannot be inserted or deleted")]
    RootTarget,
}

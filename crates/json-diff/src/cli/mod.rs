//! Core logic of the command-line tools:
//!
//! - `json-diff`:  infer the patch turning one document into another
//! - `json-patch`: apply a patch to a document

use thiserror::Error;

use json_diff_util::Value;

use crate::json_patch::{apply_ops, from_json_patch, to_json_patch, PatchError};
use crate::json_patch_diff::infer_patch;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Patch(#[from] PatchError),
}

fn parse(json: &str) -> Result<Value, CliError> {
    let value: serde_json::Value = serde_json::from_str(json)?;
    Ok(Value::from(value))
}

/// Infers the patch from `before` to `after` and returns it as a JSON array.
pub fn infer_json_patch(before: &str, after: &str) -> Result<String, CliError> {
    let ops = infer_patch(&parse(before)?, &parse(after)?);
    Ok(serde_json::to_string(&to_json_patch(&ops))?)
}

/// Applies the patch array `patch` to `doc` and returns the result.
pub fn apply_json_patch(doc: &str, patch: &str) -> Result<String, CliError> {
    let patch: serde_json::Value = serde_json::from_str(patch)?;
    let ops = from_json_patch(&patch)?;
    let next = apply_ops(&parse(doc)?, &ops)?;
    Ok(serde_json::to_string(&next.to_json())?)
}

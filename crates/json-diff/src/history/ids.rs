//! Node identifiers and their generators.

use std::fmt;

use rand::{rngs::OsRng, RngCore, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;
use serde::{Deserialize, Serialize};

/// Identifier of a history node.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for NodeId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for NodeId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Source of fresh node ids for `dispatch`.
///
/// Any `FnMut() -> NodeId` closure is a generator.
pub trait IdGenerator {
    fn next_id(&mut self) -> NodeId;
}

impl<F: FnMut() -> NodeId> IdGenerator for F {
    fn next_id(&mut self) -> NodeId {
        self()
    }
}

/// Deterministic ids `n0`, `n1`, … (or with a custom prefix).
#[derive(Debug, Clone)]
pub struct SequentialIds {
    prefix: String,
    next: u64,
}

impl Default for SequentialIds {
    fn default() -> Self {
        Self::with_prefix("n")
    }
}

impl SequentialIds {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prefix(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            next: 0,
        }
    }

    /// Skips ahead so the next id is `{prefix}{n}`.
    pub fn starting_at(mut self, n: u64) -> Self {
        self.next = n;
        self
    }
}

impl IdGenerator for SequentialIds {
    fn next_id(&mut self) -> NodeId {
        let id = NodeId(format!("{}{}", self.prefix, self.next));
        self.next += 1;
        id
    }
}

/// Random 64-bit ids rendered as 16 hex digits.
///
/// Uses the xoshiro256** PRNG; seed it for reproducible sequences.
///
/// # Examples
///
/// ```
/// use json_diff::history::{IdGenerator, RandomIds};
///
/// let mut a = RandomIds::from_seed([7; 32]);
/// let mut b = RandomIds::from_seed([7; 32]);
/// let id = a.next_id();
/// assert_eq!(id.as_str().len(), 16);
/// assert_eq!(id, b.next_id());
/// ```
#[derive(Debug, Clone)]
pub struct RandomIds {
    rng: Xoshiro256StarStar,
}

impl Default for RandomIds {
    fn default() -> Self {
        Self::new()
    }
}

impl RandomIds {
    /// Seeded from the operating system.
    pub fn new() -> Self {
        let mut seed = [0u8; 32];
        OsRng.fill_bytes(&mut seed);
        Self::from_seed(seed)
    }

    pub fn from_seed(seed: [u8; 32]) -> Self {
        Self {
            rng: Xoshiro256StarStar::from_seed(seed),
        }
    }

    pub fn seed_from_u64(seed: u64) -> Self {
        Self {
            rng: Xoshiro256StarStar::seed_from_u64(seed),
        }
    }
}

impl IdGenerator for RandomIds {
    fn next_id(&mut self) -> NodeId {
        NodeId(format!("{:016x}", self.rng.next_u64()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sequential_ids_count_up() {
        let mut ids = SequentialIds::new();
        assert_eq!(ids.next_id(), NodeId::from("n0"));
        assert_eq!(ids.next_id(), NodeId::from("n1"));
        let mut ids = SequentialIds::with_prefix("edit-").starting_at(5);
        assert_eq!(ids.next_id().as_str(), "edit-5");
    }

    #[test]
    fn closures_are_generators() {
        let mut n = 0;
        let mut next = || {
            n += 1;
            NodeId::new(format!("c{n}"))
        };
        assert_eq!(next.next_id().as_str(), "c1");
        assert_eq!(next.next_id().as_str(), "c2");
    }

    #[test]
    fn random_ids_are_hex_and_distinct() {
        let mut ids = RandomIds::seed_from_u64(42);
        let a = ids.next_id();
        let b = ids.next_id();
        assert_ne!(a, b);
        assert!(a.as_str().chars().all(|c| c.is_ascii_hexdigit()));
        assert_eq!(a.as_str().len(), 16);
    }

    #[test]
    fn node_id_serializes_as_string() {
        let id = NodeId::from("n3");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"n3\"");
    }
}

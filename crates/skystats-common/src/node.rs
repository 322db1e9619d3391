use std::borrow::Borrow;
use std::fmt;

use serde::{Deserialize, Serialize};

/// Minimum length of a node public key. Shorter CSV fields are not keys.
pub const MIN_NODE_ID_LEN: usize = 65;

/// Public key of a mesh node.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(transparent)]
pub struct NodeId(String);

impl NodeId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Accepts a raw CSV field as a node id only if it is long enough to be a key.
    pub fn from_field(field: &str) -> Option<Self> {
        Self::is_key_length(field).then(|| Self(field.to_string()))
    }

    /// Length is counted in characters, not bytes.
    pub fn is_key_length(field: &str) -> bool {
        field.chars().count() >= MIN_NODE_ID_LEN
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

impl Borrow<str> for NodeId {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl From<String> for NodeId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for NodeId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

/// Uptime statistics the feed reports for a single node.
///
/// The numeric fields are nullable in the feed; `None` means the feed sent `null`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct NodeStatRecord {
    pub uptime: Option<f64>,
    pub downtime: Option<f64>,
    pub percentage: Option<f64>,
    pub online: bool,
}

impl fmt::Display for NodeStatRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "uptime={} downtime={} percentage={} online={}",
            Nullable(self.uptime),
            Nullable(self.downtime),
            Nullable(self.percentage),
            self.online
        )
    }
}

struct Nullable(Option<f64>);

impl fmt::Display for Nullable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(v) => write!(f, "{v}"),
            None => f.write_str("null"),
        }
    }
}

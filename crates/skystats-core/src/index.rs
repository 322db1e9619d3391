use std::collections::HashMap;

use serde::{Deserialize, Deserializer};
use skystats_common::{NodeId, NodeStatRecord};

use crate::error::{Result, StatsError};

/// Latest stat record per node, as reported by one fetch of the feed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StatsIndex {
    records: HashMap<NodeId, NodeStatRecord>,
}

impl StatsIndex {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&NodeStatRecord> {
        self.records.get(id)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.records.contains_key(id)
    }

    /// Largest non-null uptime in the index, or 0 if there is none.
    pub fn highest_uptime(&self) -> f64 {
        self.records
            .values()
            .filter_map(|rec| rec.uptime)
            .fold(0.0, f64::max)
    }
}

impl FromIterator<(NodeId, NodeStatRecord)> for StatsIndex {
    /// Later entries for the same node replace earlier ones.
    fn from_iter<I: IntoIterator<Item = (NodeId, NodeStatRecord)>>(iter: I) -> Self {
        Self {
            records: iter.into_iter().collect(),
        }
    }
}

/// One element of the feed's top-level array.
///
/// Every field must be present; the numeric ones may be `null`.
#[derive(Debug, Deserialize)]
struct FeedRecord {
    key: String,
    #[serde(deserialize_with = "present_or_null")]
    uptime: Option<f64>,
    #[serde(deserialize_with = "present_or_null")]
    downtime: Option<f64>,
    #[serde(deserialize_with = "present_or_null")]
    percentage: Option<f64>,
    online: bool,
}

// With `deserialize_with` serde no longer treats an absent Option field as None.
fn present_or_null<'de, D>(deserializer: D) -> std::result::Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer)
}

/// Build a fresh index from a feed body. Nothing is returned unless every record parses.
pub fn parse_stats(source: &str, body: &str) -> Result<StatsIndex> {
    let records: Vec<FeedRecord> =
        serde_json::from_str(body).map_err(|e| StatsError::DataFormat {
            url: source.to_string(),
            reason: e.to_string(),
        })?;

    tracing::info!(records = records.len(), "restructuring data");

    let index: StatsIndex = records
        .into_iter()
        .map(|r| {
            (
                NodeId::new(r.key),
                NodeStatRecord {
                    uptime: r.uptime,
                    downtime: r.downtime,
                    percentage: r.percentage,
                    online: r.online,
                },
            )
        })
        .collect();
    Ok(index)
}

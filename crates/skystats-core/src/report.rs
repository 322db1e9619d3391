use serde::Serialize;
use skystats_common::{NodeId, NodeStatRecord};

use crate::error::{Result, StatsError};
use crate::index::StatsIndex;
use crate::node_list::NodeList;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FoundNode {
    pub key: NodeId,
    #[serde(flatten)]
    pub record: NodeStatRecord,
}

/// Cross-reference of the local node list against one snapshot of the feed.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    /// Listed nodes the feed knows about, in node list order.
    pub found: Vec<FoundNode>,
    /// Listed nodes absent from the feed, in node list order.
    pub missing: Vec<NodeId>,
    pub total_nodes: usize,
    pub total_online: usize,
    pub found_percent: f64,
    /// Sum of found uptimes divided by the size of the whole node list.
    pub average_uptime: f64,
    /// Highest uptime anywhere in the feed, not only among listed nodes.
    pub highest_uptime: f64,
}

impl Report {
    pub fn build(nodes: &NodeList, index: &StatsIndex) -> Result<Self> {
        if nodes.is_empty() {
            return Err(StatsError::EmptyNodeList);
        }

        let mut found = Vec::new();
        let mut missing = Vec::new();
        let mut uptime_sum = 0.0;

        for id in nodes {
            match index.get(id.as_str()) {
                Some(record) => {
                    if let Some(uptime) = record.uptime {
                        uptime_sum += uptime;
                    }
                    found.push(FoundNode {
                        key: id.clone(),
                        record: *record,
                    });
                }
                None => missing.push(id.clone()),
            }
        }

        let total_nodes = nodes.len();
        let total_online = total_nodes - missing.len();

        Ok(Self {
            found,
            missing,
            total_nodes,
            total_online,
            found_percent: total_online as f64 / total_nodes as f64 * 100.0,
            average_uptime: uptime_sum / total_nodes as f64,
            highest_uptime: index.highest_uptime(),
        })
    }
}

//! Cross-references a local list of mesh node keys against a remote uptime feed.

pub mod error;
pub mod feed;
pub mod index;
pub mod memory;
pub mod node_list;
pub mod reconciler;
pub mod report;

pub use error::StatsError;
pub use feed::{FeedOptions, HttpStatsFeed, RetryPolicy, StatsFeed};
pub use index::{parse_stats, StatsIndex};
pub use memory::MemoryStatsFeed;
pub use node_list::{load_node_list, NodeList};
pub use reconciler::StatsReconciler;
pub use report::{FoundNode, Report};

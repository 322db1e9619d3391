pub mod node;

pub use node::{NodeId, NodeStatRecord, MIN_NODE_ID_LEN};

pub mod telemetry;

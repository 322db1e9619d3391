use std::fs::File;
use std::io::Read;
use std::path::Path;

use skystats_common::NodeId;

use crate::error::{Result, StatsError};

/// Node keys read from the local CSV, in file order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeList(Vec<NodeId>);

impl NodeList {
    pub fn new(ids: Vec<NodeId>) -> Self {
        Self(ids)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, NodeId> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a NodeList {
    type Item = &'a NodeId;
    type IntoIter = std::slice::Iter<'a, NodeId>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

/// Read every node key from the CSV at `path`.
///
/// Rows may have any number of columns and there is no header row. Any field
/// shorter than a node key is skipped without complaint.
pub fn load_node_list(path: &Path) -> Result<NodeList> {
    let file = File::open(path).map_err(|source| StatsError::FileAccess {
        path: path.to_path_buf(),
        source,
    })?;
    let list = parse_node_list(file).map_err(|source| StatsError::MalformedRow {
        path: path.to_path_buf(),
        source,
    })?;

    tracing::info!(path = %path.display(), nodes = list.len(), "loaded node list");
    Ok(list)
}

pub(crate) fn parse_node_list<R: Read>(reader: R) -> Result<NodeList, csv::Error> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(b',')
        .has_headers(false)
        .flexible(true)
        .from_reader(reader);

    let mut ids = Vec::new();
    for row in reader.records() {
        let row = row?;
        ids.extend(row.iter().filter_map(NodeId::from_field));
    }
    Ok(NodeList(ids))
}

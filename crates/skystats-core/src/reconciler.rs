use std::path::PathBuf;

use skystats_common::NodeId;

use crate::error::Result;
use crate::feed::{FeedOptions, HttpStatsFeed, StatsFeed};
use crate::index::{parse_stats, StatsIndex};
use crate::node_list::{load_node_list, NodeList};
use crate::report::Report;

/// Joins the local node list against the stats feed.
///
/// Holds the current snapshot of each input. Reloads build a complete new
/// snapshot first and only then replace the held one, so a failed reload
/// leaves the previous snapshot in place.
#[derive(Debug)]
pub struct StatsReconciler<F> {
    feed: F,
    csv_path: PathBuf,
    nodes: NodeList,
    index: StatsIndex,
    missing: Vec<NodeId>,
}

impl StatsReconciler<HttpStatsFeed> {
    pub fn from_url(
        url: impl Into<String>,
        csv_path: impl Into<PathBuf>,
        opts: FeedOptions,
    ) -> Result<Self> {
        Self::new(HttpStatsFeed::new(url, opts)?, csv_path)
    }
}

impl<F: StatsFeed> StatsReconciler<F> {
    /// Reads the node list right away. The feed is not contacted until the first fetch.
    pub fn new(feed: F, csv_path: impl Into<PathBuf>) -> Result<Self> {
        let csv_path = csv_path.into();
        let nodes = load_node_list(&csv_path)?;
        Ok(Self {
            feed,
            csv_path,
            nodes,
            index: StatsIndex::default(),
            missing: Vec::new(),
        })
    }

    pub fn load_node_list(&mut self) -> Result<&NodeList> {
        self.nodes = load_node_list(&self.csv_path)?;
        Ok(&self.nodes)
    }

    pub async fn fetch_stats(&mut self) -> Result<&StatsIndex> {
        let body = self.feed.fetch_body().await?;
        self.index = parse_stats(self.feed.source(), &body)?;
        Ok(&self.index)
    }

    /// Clears the missing nodes, then reloads the feed followed by the node list.
    pub async fn reconcile(&mut self) -> Result<()> {
        self.missing.clear();
        self.fetch_stats().await?;
        self.load_node_list()?;
        Ok(())
    }

    pub fn highest_uptime(&self) -> f64 {
        self.index.highest_uptime()
    }

    /// Cross-references the current snapshots and remembers which nodes were missing.
    pub fn report(&mut self) -> Result<Report> {
        let report = Report::build(&self.nodes, &self.index)?;
        self.missing.clone_from(&report.missing);
        Ok(report)
    }

    pub fn node_list(&self) -> &NodeList {
        &self.nodes
    }

    pub fn stats_index(&self) -> &StatsIndex {
        &self.index
    }

    pub fn missing_nodes(&self) -> &[NodeId] {
        &self.missing
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use httpmock::prelude::*;
    use tempfile::NamedTempFile;

    use super::*;
    use crate::error::StatsError;
    use crate::memory::MemoryStatsFeed;

    fn key(c: char) -> String {
        std::iter::repeat(c).take(65).collect()
    }

    fn stat(key: &str, uptime: u32) -> String {
        format!(
            r#"{{"key":"{key}","uptime":{uptime},"downtime":5,"percentage":94,"online":true}}"#
        )
    }

    fn csv_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[tokio::test]
    async fn test_new_loads_nodes_without_fetching() {
        let file = csv_file(&format!("{}\n", key('1')));
        let rec = StatsReconciler::new(MemoryStatsFeed::default(), file.path()).unwrap();

        assert_eq!(rec.node_list().len(), 1);
        assert!(rec.stats_index().is_empty());
        assert_eq!(rec.highest_uptime(), 0.0);
    }

    #[tokio::test]
    async fn test_new_fails_for_missing_csv() {
        let dir = tempfile::tempdir().unwrap();
        let err = StatsReconciler::new(MemoryStatsFeed::default(), dir.path().join("keys.csv"))
            .unwrap_err();
        assert!(matches!(err, StatsError::FileAccess { .. }));
    }

    #[tokio::test]
    async fn test_reconcile_and_report() {
        let (k1, k2) = (key('1'), key('2'));
        let file = csv_file(&format!("{k1},{k2}\n"));
        let feed = MemoryStatsFeed::new(format!("[{}]", stat(&k1, 50)));
        let mut rec = StatsReconciler::new(feed, file.path()).unwrap();

        rec.reconcile().await.unwrap();
        let report = rec.report().unwrap();

        assert_eq!(report.total_online, 1);
        assert_eq!(report.total_nodes, 2);
        assert_eq!(report.average_uptime, 25.0);
        assert_eq!(report.highest_uptime, 50.0);
        assert_eq!(rec.missing_nodes(), &[NodeId::new(k2)]);
    }

    #[tokio::test]
    async fn test_reconcile_clears_missing_nodes() {
        let (k1, k2) = (key('1'), key('2'));
        let file = csv_file(&format!("{k1}\n{k2}\n"));
        let feed = MemoryStatsFeed::new(format!("[{}]", stat(&k1, 10)));
        let mut rec = StatsReconciler::new(feed.clone(), file.path()).unwrap();

        rec.reconcile().await.unwrap();
        rec.report().unwrap();
        assert_eq!(rec.missing_nodes().len(), 1);

        feed.set_body(format!("[{},{}]", stat(&k1, 10), stat(&k2, 20)))
            .await;
        rec.reconcile().await.unwrap();
        assert!(rec.missing_nodes().is_empty());
        assert!(rec.report().unwrap().missing.is_empty());
    }

    #[tokio::test]
    async fn test_reconcile_reloads_csv() {
        let (k1, k2) = (key('1'), key('2'));
        let mut file = csv_file(&format!("{k1}\n"));
        let feed = MemoryStatsFeed::new("[]");
        let mut rec = StatsReconciler::new(feed, file.path()).unwrap();
        assert_eq!(rec.node_list().len(), 1);

        writeln!(file, "{k2}").unwrap();
        file.flush().unwrap();
        rec.reconcile().await.unwrap();
        assert_eq!(rec.node_list().len(), 2);
    }

    #[tokio::test]
    async fn test_failed_fetch_skips_csv_reload() {
        let (k1, k2) = (key('1'), key('2'));
        let mut file = csv_file(&format!("{k1}\n"));
        let feed = MemoryStatsFeed::new("[]");
        let mut rec = StatsReconciler::new(feed.clone(), file.path()).unwrap();
        rec.reconcile().await.unwrap();
        rec.report().unwrap();
        assert_eq!(rec.missing_nodes().len(), 1);

        writeln!(file, "{k2}").unwrap();
        file.flush().unwrap();
        feed.set_body("not json").await;

        let err = rec.reconcile().await.unwrap_err();
        assert!(matches!(err, StatsError::DataFormat { .. }));
        assert_eq!(rec.node_list(), &NodeList::new(vec![NodeId::new(k1)]));
        assert!(rec.missing_nodes().is_empty());
    }

    #[tokio::test]
    async fn test_bad_feed_keeps_previous_index() {
        let k1 = key('1');
        let file = csv_file(&format!("{k1}\n"));
        let feed = MemoryStatsFeed::new(format!("[{}]", stat(&k1, 70)));
        let mut rec = StatsReconciler::new(feed.clone(), file.path()).unwrap();
        rec.fetch_stats().await.unwrap();

        feed.set_body(r#"[{"key":"x","uptime":1}]"#).await;
        let err = rec.fetch_stats().await.unwrap_err();
        assert!(matches!(err, StatsError::DataFormat { .. }));
        assert_eq!(rec.stats_index().len(), 1);
        assert_eq!(rec.highest_uptime(), 70.0);
    }

    #[tokio::test]
    async fn test_network_failure_keeps_previous_index() {
        let k1 = key('1');
        let file = csv_file(&format!("{k1}\n"));
        let server = MockServer::start_async().await;
        let ok = server
            .mock_async(|when, then| {
                when.method(GET).path("/uptimes");
                then.status(200).body(format!("[{}]", stat(&k1, 42)));
            })
            .await;

        let mut rec =
            StatsReconciler::from_url(server.url("/uptimes"), file.path(), FeedOptions::default())
                .unwrap();
        rec.fetch_stats().await.unwrap();
        ok.delete_async().await;

        server
            .mock_async(|when, then| {
                when.method(GET).path("/uptimes");
                then.status(502);
            })
            .await;

        let err = rec.reconcile().await.unwrap_err();
        assert!(matches!(err, StatsError::Network { .. }));
        assert_eq!(rec.stats_index().get(&k1).and_then(|r| r.uptime), Some(42.0));
    }

    #[tokio::test]
    async fn test_report_on_empty_node_list() {
        let file = csv_file("short,fields,only\n");
        let mut rec = StatsReconciler::new(MemoryStatsFeed::default(), file.path()).unwrap();
        rec.reconcile().await.unwrap();
        assert!(matches!(rec.report(), Err(StatsError::EmptyNodeList)));
    }
}

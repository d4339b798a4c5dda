//! Concurrent status fetch for all monitored locations
//!
//! Every unique location key gets its own request. A failing key degrades to
//! an empty charger list and raises `had_any_error`; it never aborts the rest
//! of the aggregation.

use std::collections::HashSet;
use std::sync::Arc;
use tokio::task::JoinSet;

use crate::error::{ChargeboardError, Result};
use crate::logging::{StructuredLogger, get_logger};
use crate::model::{ChargerRecord, Location, MergedDataset};

pub mod body;
pub mod source;

pub use body::{parse_chargers_body, parse_chargers_bytes};
pub use source::{HttpStatusSource, StatusSource};

/// A key whose fetch degraded to an empty list
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchFailure {
    pub key: String,
    pub message: String,
}

/// Result of one aggregation pass
#[derive(Debug, Clone, Default)]
pub struct Aggregate {
    pub dataset: MergedDataset,
    pub had_any_error: bool,
    pub failures: Vec<FetchFailure>,
}

/// Fans out one request per location key and joins the results
#[derive(Clone)]
pub struct FetchAggregator {
    source: Arc<dyn StatusSource>,
    logger: StructuredLogger,
}

impl FetchAggregator {
    pub fn new(source: Arc<dyn StatusSource>) -> Self {
        Self {
            source,
            logger: get_logger("fetch"),
        }
    }

    /// Unique keys in first-seen order
    pub fn unique_keys(locations: &[Location]) -> Vec<String> {
        let mut seen = HashSet::new();
        locations
            .iter()
            .map(|loc| loc.key.clone())
            .filter(|key| seen.insert(key.clone()))
            .collect()
    }

    /// Fetch every location concurrently and merge the results.
    ///
    /// Returns only after all requests have settled. An `Err` means something
    /// outside per-request handling broke (a fetch task panicked or was
    /// cancelled); per-key failures are folded into the returned [`Aggregate`].
    pub async fn refresh(&self, locations: &[Location]) -> Result<Aggregate> {
        let keys = Self::unique_keys(locations);
        self.logger
            .debug(&format!("Fetching {} location(s)", keys.len()));

        let mut tasks: JoinSet<(String, Result<Vec<ChargerRecord>>)> = JoinSet::new();
        for key in keys {
            let source = Arc::clone(&self.source);
            tasks.spawn(async move {
                let result = source.fetch_chargers(&key).await;
                (key, result)
            });
        }

        let mut aggregate = Aggregate::default();
        while let Some(joined) = tasks.join_next().await {
            let (key, result) = joined.map_err(|e| {
                ChargeboardError::generic(format!("Fetch task failed: {}", e))
            })?;
            match result {
                Ok(chargers) => {
                    self.logger.trace(&format!(
                        "Fetched {} charger(s) for {}",
                        chargers.len(),
                        key
                    ));
                    aggregate.dataset.insert(key, chargers);
                }
                Err(e) => {
                    self.logger
                        .warn(&format!("Failed to fetch status for {}: {}", key, e));
                    aggregate.had_any_error = true;
                    aggregate.failures.push(FetchFailure {
                        key: key.clone(),
                        message: e.to_string(),
                    });
                    aggregate.dataset.insert(key, Vec::new());
                }
            }
        }

        aggregate.failures.sort_by(|a, b| a.key.cmp(&b.key));
        Ok(aggregate)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::collections::HashMap;
    use std::sync::Mutex;

    struct MapSource {
        responses: HashMap<String, Result<Vec<ChargerRecord>>>,
        calls: Mutex<Vec<String>>,
    }

    impl MapSource {
        fn new(entries: Vec<(&str, Result<Vec<ChargerRecord>>)>) -> Self {
            Self {
                responses: entries
                    .into_iter()
                    .map(|(k, v)| (k.to_string(), v))
                    .collect(),
                calls: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl StatusSource for MapSource {
        async fn fetch_chargers(&self, key: &str) -> Result<Vec<ChargerRecord>> {
            self.calls.lock().unwrap().push(key.to_string());
            match self.responses.get(key) {
                Some(Ok(v)) => Ok(v.clone()),
                Some(Err(e)) => Err(ChargeboardError::generic(e.to_string())),
                None => Err(ChargeboardError::http(404)),
            }
        }
    }

    struct PanickingSource;

    #[async_trait]
    impl StatusSource for PanickingSource {
        async fn fetch_chargers(&self, _key: &str) -> Result<Vec<ChargerRecord>> {
            panic!("boom");
        }
    }

    fn loc(key: &str) -> Location {
        Location::new(key.to_uppercase(), key)
    }

    #[tokio::test]
    async fn failing_key_degrades_to_empty() {
        let source = Arc::new(MapSource::new(vec![
            ("bad", Err(ChargeboardError::http(500))),
            (
                "good",
                Ok(vec![
                    ChargerRecord::new("1", "available", 1),
                    ChargerRecord::new("2", "charging", 1),
                ]),
            ),
        ]));
        let agg = FetchAggregator::new(source);

        let out = agg.refresh(&[loc("bad"), loc("good")]).await.unwrap();
        assert!(out.had_any_error);
        assert_eq!(out.dataset.get("bad").map(Vec::len), Some(0));
        assert_eq!(out.dataset.get("good").map(Vec::len), Some(2));
        assert_eq!(out.failures.len(), 1);
        assert_eq!(out.failures[0].key, "bad");
    }

    #[tokio::test]
    async fn duplicate_keys_fetched_once() {
        let source = Arc::new(MapSource::new(vec![
            ("a", Ok(vec![])),
            ("b", Ok(vec![ChargerRecord::new("1", "available", 1)])),
        ]));
        let agg = FetchAggregator::new(source.clone());

        let out = agg
            .refresh(&[loc("a"), loc("b"), loc("a"), loc("b")])
            .await
            .unwrap();
        assert!(!out.had_any_error);
        assert_eq!(out.dataset.len(), 2);

        let mut calls = source.calls.lock().unwrap().clone();
        calls.sort();
        assert_eq!(calls, vec!["a", "b"]);
    }

    #[tokio::test]
    async fn empty_location_list_is_clean() {
        let agg = FetchAggregator::new(Arc::new(MapSource::new(vec![])));
        let out = agg.refresh(&[]).await.unwrap();
        assert!(!out.had_any_error);
        assert!(out.dataset.is_empty());
    }

    #[tokio::test]
    async fn panicking_fetch_is_fatal() {
        let agg = FetchAggregator::new(Arc::new(PanickingSource));
        let err = agg.refresh(&[loc("x")]).await.unwrap_err();
        assert!(err.to_string().contains("Fetch task failed"));
    }

    #[test]
    fn unique_keys_keep_first_seen_order() {
        let keys = FetchAggregator::unique_keys(&[loc("c"), loc("a"), loc("c"), loc("b")]);
        assert_eq!(keys, vec!["c", "a", "b"]);
    }
}

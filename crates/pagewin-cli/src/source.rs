use async_trait::async_trait;
use pagewin_core::{ItemSource, PagewinError, PagewinResult};
use serde::Serialize;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub id: Uuid,
    pub position: usize,
    pub title: String,
}

/// In-memory stand-in for a remote backend.
///
/// Identifiers are stable across runs (`Uuid::from_u128(position + 1)`).
pub struct SyntheticSource {
    ids: Vec<Uuid>,
    latency: Duration,
    fail_every: Option<usize>,
    fetches: AtomicUsize,
}

impl SyntheticSource {
    pub fn new(total: usize, latency: Duration, fail_every: Option<usize>) -> Self {
        Self {
            ids: (0..total).map(|i| Uuid::from_u128(i as u128 + 1)).collect(),
            latency,
            fail_every: fail_every.filter(|&n| n > 0),
            fetches: AtomicUsize::new(0),
        }
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::Acquire)
    }
}

#[async_trait]
impl ItemSource<Uuid, Record> for SyntheticSource {
    async fn order(&self) -> PagewinResult<Vec<Uuid>> {
        Ok(self.ids.clone())
    }

    async fn fetch(&self, start: usize, length: usize) -> PagewinResult<Vec<(Uuid, Record)>> {
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }

        let attempt = self.fetches.fetch_add(1, Ordering::AcqRel) + 1;
        if let Some(every) = self.fail_every {
            if attempt % every == 0 {
                return Err(PagewinError::Source(format!(
                    "injected failure on fetch {}",
                    attempt
                )));
            }
        }

        let end = start.saturating_add(length).min(self.ids.len());
        let start = start.min(end);
        Ok(self.ids[start..end]
            .iter()
            .enumerate()
            .map(|(offset, &id)| {
                let position = start + offset;
                let record = Record {
                    id,
                    position,
                    title: format!("Record {}", position + 1),
                };
                (id, record)
            })
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_returns_requested_range() {
        let source = SyntheticSource::new(23, Duration::ZERO, None);
        let rows = source.fetch(20, 10).await.unwrap();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0].1.position, 20);
        assert_eq!(rows[0].1.title, "Record 21");
        assert_eq!(rows[0].0, Uuid::from_u128(21));
    }

    #[tokio::test]
    async fn test_fetch_past_end_is_empty() {
        let source = SyntheticSource::new(5, Duration::ZERO, None);
        assert!(source.fetch(50, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_fail_every_nth_fetch() {
        let source = SyntheticSource::new(5, Duration::ZERO, Some(2));
        assert!(source.fetch(0, 5).await.is_ok());
        assert!(source.fetch(0, 5).await.is_err());
        assert!(source.fetch(0, 5).await.is_ok());
        assert_eq!(source.fetch_count(), 3);
    }

    #[tokio::test]
    async fn test_order_is_stable() {
        let a = SyntheticSource::new(3, Duration::ZERO, None);
        let b = SyntheticSource::new(3, Duration::ZERO, Some(0));
        assert_eq!(a.order().await.unwrap(), b.order().await.unwrap());
    }
}

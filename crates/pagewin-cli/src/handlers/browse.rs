use crate::cli::{BrowseArgs, Step};
use crate::output;
use crate::source::{Record, SyntheticSource};
use anyhow::{anyhow, bail};
use pagewin_cache::{channel_loader, CacheEvent, CacheStore, PendingLoads, SourceDriver};
use pagewin_core::{AppConfig, IndexPolicy, LoadRequest, PageControl};
use pagewin_view::{AsyncPageView, RenderMode};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::broadcast::{self, error::RecvError};
use tokio::time::Instant;
use uuid::Uuid;

/// One settled page.
#[derive(Debug, Serialize)]
pub struct PageReport {
    pub step: String,
    pub control: PageControl,
    pub mode: RenderMode,
    pub rows: Vec<Option<Record>>,
    /// Loads dispatched while this step settled.
    pub requests: Vec<LoadRequest>,
    /// Fetches the source has served so far, failed ones included.
    pub fetches: usize,
}

struct BrowseSession {
    store: CacheStore<Uuid, Record>,
    source: Arc<SyntheticSource>,
    view: AsyncPageView,
    events: broadcast::Receiver<CacheEvent>,
    pending: PendingLoads,
    page_size: usize,
    settle_timeout: Duration,
}

impl BrowseSession {
    fn apply(&mut self, step: Step) {
        match step {
            Step::Next => self.view.next(),
            Step::Previous => self.view.previous(),
            Step::Goto(index) => self.view.goto(index),
            Step::PageSize(size) => self.page_size = size,
            Step::Dirty => self.store.set_dirty(true),
        }
    }

    /// Re-run the pass on every store change until nothing is in flight and
    /// the pass itself dispatched nothing.
    async fn settle(&mut self, step: String) -> anyhow::Result<PageReport> {
        let deadline = Instant::now() + self.settle_timeout;
        let mut requests = Vec::new();

        loop {
            let report = {
                let cache = self.store.read();
                let render = self.view.render(&cache, self.page_size);
                let dispatched = render.trigger.request();
                requests.extend(dispatched);

                let settled =
                    dispatched.is_none() && self.pending.is_idle() && !cache.is_updating();
                settled.then(|| PageReport {
                    step: step.clone(),
                    control: render.control,
                    mode: render.mode,
                    rows: render.slice.iter().map(|row| row.cloned()).collect(),
                    requests: std::mem::take(&mut requests),
                    fetches: self.source.fetch_count(),
                })
            };
            if let Some(report) = report {
                return Ok(report);
            }

            match tokio::time::timeout_at(deadline, self.events.recv()).await {
                Err(_) => bail!(
                    "page did not settle within {} ms after step '{}'",
                    self.settle_timeout.as_millis(),
                    step
                ),
                Ok(Ok(_)) => {}
                Ok(Err(RecvError::Lagged(skipped))) => {
                    tracing::debug!("Skipped {} cache events", skipped);
                }
                Ok(Err(RecvError::Closed)) => bail!("cache store closed"),
            }
        }
    }
}

pub async fn handle(config: &AppConfig, args: BrowseArgs) -> anyhow::Result<()> {
    let page_size = args.page_size.unwrap_or(config.page_size);
    if page_size == 0 {
        bail!("--page-size must be greater than zero");
    }
    let policy = if args.clamp {
        IndexPolicy::Clamped
    } else {
        config.index_policy()
    };

    let store: CacheStore<Uuid, Record> = CacheStore::default();
    let source = Arc::new(SyntheticSource::new(
        args.total,
        Duration::from_millis(args.latency_ms),
        args.fail_every,
    ));
    let (loader, rx) = channel_loader();
    let pending = loader.pending();

    let driver = SourceDriver::new(store.clone(), Arc::clone(&source), loader.pending());
    driver
        .prime_order()
        .await
        .map_err(|e| anyhow!("failed to load order: {}", e))?;
    let driver_task = tokio::spawn(driver.run(rx));

    let view = AsyncPageView::new(Arc::new(loader), policy)
        .with_log_capacity(config.load_log_capacity);
    let mut session = BrowseSession {
        events: store.subscribe(),
        store,
        source,
        view,
        pending,
        page_size,
        settle_timeout: Duration::from_millis(args.settle_timeout_ms),
    };

    output::output_success(session.settle("initial".to_string()).await?)?;
    for step in args.steps {
        session.apply(step);
        let report = session.settle(step.to_string()).await?;
        output::output_success(report)?;
    }

    for entry in session.view.load_log() {
        tracing::debug!(
            "Issued load {}+{} generation {} at {}",
            entry.request.start,
            entry.request.length,
            entry.request.generation,
            entry.timestamp
        );
    }

    // Dropping the view drops the loader, which closes the channel.
    drop(session);
    driver_task.await?;
    Ok(())
}

//! In-memory doubles for the dashboard gateway and renderer.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use cleango_dashboard::{
    CleanReceipt, CleanRun, ConnectionStatus, DashboardView, GatewayError, GatewayResult, Page,
    PageQuery, RemoteGateway, Renderer, Stats, TorrentRecord,
};

/// Scripted reply: the value, or a message surfaced as a service rejection.
pub type Reply<T> = Result<T, String>;

#[derive(Clone)]
struct Script {
    version: Reply<String>,
    connection: Reply<ConnectionStatus>,
    clean_status: Reply<CleanRun>,
    stats: Reply<Stats>,
    records: Vec<TorrentRecord>,
    total_pages: u32,
    page_failure: Option<String>,
    clean: Reply<CleanReceipt>,
    clean_delay: Duration,
    page_delay: Duration,
}

/// Number of calls received per gateway operation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    /// `version` calls.
    pub version: usize,
    /// `connection_status` calls.
    pub connection_status: usize,
    /// `clean_status` calls.
    pub clean_status: usize,
    /// `stats` calls.
    pub stats: usize,
    /// `deleted_page` calls.
    pub deleted_page: usize,
    /// `trigger_clean` calls.
    pub trigger_clean: usize,
}

#[derive(Default)]
struct Log {
    counts: CallCounts,
    queries: Vec<PageQuery>,
}

/// [`RemoteGateway`] answering from a mutable script.
///
/// `deleted_page` echoes the requested page as the real service does, even
/// past the scripted page count.
pub struct ScriptedGateway {
    script: Mutex<Script>,
    log: Mutex<Log>,
}

impl Default for ScriptedGateway {
    fn default() -> Self {
        Self::connected()
    }
}

impl ScriptedGateway {
    /// A healthy, connected service with an empty log.
    #[must_use]
    pub fn connected() -> Self {
        Self {
            script: Mutex::new(Script {
                version: Ok("2.0.0".to_string()),
                connection: Ok(ConnectionStatus::Connected),
                clean_status: Ok(CleanRun::default()),
                stats: Ok(Stats::default()),
                records: Vec::new(),
                total_pages: 1,
                page_failure: None,
                clean: Ok(CleanReceipt::default()),
                clean_delay: Duration::ZERO,
                page_delay: Duration::ZERO,
            }),
            log: Mutex::new(Log::default()),
        }
    }

    /// Share the gateway with a controller.
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }

    /// Set the connection status reply.
    pub fn set_connection(&self, reply: Reply<ConnectionStatus>) {
        self.script().connection = reply;
    }

    /// Set the clean status reply.
    pub fn set_clean_status(&self, reply: Reply<CleanRun>) {
        self.script().clean_status = reply;
    }

    /// Set the statistics reply.
    pub fn set_stats(&self, reply: Reply<Stats>) {
        self.script().stats = reply;
    }

    /// Rows returned for every page and the page count reported.
    pub fn set_pages(&self, records: Vec<TorrentRecord>, total_pages: u32) {
        let mut script = self.script();
        script.records = records;
        script.total_pages = total_pages.max(1);
    }

    /// Make `deleted_page` fail with the given message, or succeed again with `None`.
    pub fn set_page_failure(&self, message: Option<&str>) {
        self.script().page_failure = message.map(str::to_string);
    }

    /// Set the clean trigger reply.
    pub fn set_clean(&self, reply: Reply<CleanReceipt>) {
        self.script().clean = reply;
    }

    /// Hold `trigger_clean` for `delay` before answering.
    pub fn set_clean_delay(&self, delay: Duration) {
        self.script().clean_delay = delay;
    }

    /// Hold `deleted_page` for `delay` before answering.
    pub fn set_page_delay(&self, delay: Duration) {
        self.script().page_delay = delay;
    }

    /// Calls received so far.
    #[must_use]
    pub fn calls(&self) -> CallCounts {
        self.log().counts
    }

    /// Page queries received so far, in order.
    #[must_use]
    pub fn page_queries(&self) -> Vec<PageQuery> {
        self.log().queries.clone()
    }

    fn script(&self) -> MutexGuard<'_, Script> {
        self.script.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn log(&self) -> MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn snapshot(&self) -> Script {
        self.script().clone()
    }
}

fn answer<T>(endpoint: &'static str, reply: Reply<T>) -> GatewayResult<T> {
    reply.map_err(|message| GatewayError::Rejected { endpoint, message })
}

#[async_trait]
impl RemoteGateway for ScriptedGateway {
    async fn version(&self) -> GatewayResult<String> {
        self.log().counts.version += 1;
        answer("/api/version", self.snapshot().version)
    }

    async fn connection_status(&self) -> GatewayResult<ConnectionStatus> {
        self.log().counts.connection_status += 1;
        answer("/api/status", self.snapshot().connection)
    }

    async fn clean_status(&self) -> GatewayResult<CleanRun> {
        self.log().counts.clean_status += 1;
        answer("/api/clean-status", self.snapshot().clean_status)
    }

    async fn stats(&self) -> GatewayResult<Stats> {
        self.log().counts.stats += 1;
        answer("/api/stats", self.snapshot().stats)
    }

    async fn deleted_page(&self, query: &PageQuery) -> GatewayResult<Page> {
        {
            let mut log = self.log();
            log.counts.deleted_page += 1;
            log.queries.push(query.clone());
        }
        let script = self.snapshot();
        if !script.page_delay.is_zero() {
            tokio::time::sleep(script.page_delay).await;
        }
        if let Some(message) = script.page_failure {
            return answer("/api/deleted", Err(message));
        }
        Ok(Page {
            items: script.records,
            page_number: query.page.max(1),
            total_pages: script.total_pages,
        })
    }

    async fn trigger_clean(&self) -> GatewayResult<CleanReceipt> {
        self.log().counts.trigger_clean += 1;
        let script = self.snapshot();
        if !script.clean_delay.is_zero() {
            tokio::time::sleep(script.clean_delay).await;
        }
        answer("/api/clean", script.clean)
    }
}

/// [`Renderer`] that keeps every view it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    views: Arc<Mutex<Vec<DashboardView>>>,
}

impl RecordingRenderer {
    /// Empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every view rendered so far.
    #[must_use]
    pub fn views(&self) -> Vec<DashboardView> {
        self.lock().clone()
    }

    /// Most recent view, if any.
    #[must_use]
    pub fn last(&self) -> Option<DashboardView> {
        self.lock().last().cloned()
    }

    fn lock(&self) -> MutexGuard<'_, Vec<DashboardView>> {
        self.views.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Renderer for RecordingRenderer {
    fn render(&mut self, view: &DashboardView) {
        self.lock().push(view.clone());
    }
}

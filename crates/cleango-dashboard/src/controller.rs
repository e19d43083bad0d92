//! Synchronization controller: the single owner of dashboard state.
//!
//! # Design
//! - One tokio task runs [`SyncController::run`] and is the only code that
//!   mutates state. Requests and timers run as spawned tasks that report back
//!   over a completion channel.
//! - Each poll task is coalesced through [`PollScheduler`]; a failed poll keeps
//!   the previous value (the connection indicator excepted).
//! - Page responses are applied only when their query still matches the
//!   current pagination query.
//! - The clean action walks `Idle -> Requesting -> AwaitingSettle -> Idle` on
//!   success and `Idle -> Requesting -> Error -> Idle` on failure.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use cleango_config::{DashboardConfig, PAGE_SIZE_OPTIONS, PollingConfig};
use cleango_telemetry::Metrics;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::debounce::Debouncer;
use crate::error::{ControllerClosed, GatewayResult};
use crate::gateway::RemoteGateway;
use crate::model::{CleanPhase, CleanReceipt, CleanRun, ConnectionStatus, Page, PageQuery, Stats};
use crate::render::{DashboardView, Renderer};
use crate::scheduler::{PollScheduler, PollTask};
use crate::state::DashboardState;

const COMMAND_BUFFER: usize = 32;

/// Operator input accepted by the controller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlCommand {
    /// Advance one page.
    NextPage,
    /// Go back one page.
    PreviousPage,
    /// Jump to a page.
    GoToPage(u32),
    /// Change rows per page; only the configured options are accepted.
    SetPageSize(u32),
    /// Raw search box input; debounced before it applies.
    Search(String),
    /// Run a clean pass now.
    TriggerClean,
    /// Fire every poll task immediately.
    Refresh,
    /// Stop the controller loop.
    Shutdown,
}

/// Cloneable sender for [`ControlCommand`]s.
#[derive(Debug, Clone)]
pub struct ControllerHandle {
    commands: mpsc::Sender<ControlCommand>,
}

impl ControllerHandle {
    /// Deliver a command to the controller.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerClosed`] once the controller loop has exited.
    pub async fn send(&self, command: ControlCommand) -> Result<(), ControllerClosed> {
        self.commands.send(command).await.map_err(|_| ControllerClosed)
    }

    /// Request a clean pass.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerClosed`] once the controller loop has exited.
    pub async fn trigger_clean(&self) -> Result<(), ControllerClosed> {
        self.send(ControlCommand::TriggerClean).await
    }

    /// Submit search box input.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerClosed`] once the controller loop has exited.
    pub async fn search(&self, term: impl Into<String>) -> Result<(), ControllerClosed> {
        self.send(ControlCommand::Search(term.into())).await
    }

    /// Stop the controller.
    ///
    /// # Errors
    ///
    /// Returns [`ControllerClosed`] when the controller already stopped.
    pub async fn shutdown(&self) -> Result<(), ControllerClosed> {
        self.send(ControlCommand::Shutdown).await
    }
}

enum Completion {
    Version(GatewayResult<String>),
    Connection(GatewayResult<ConnectionStatus>),
    CleanStatus(GatewayResult<CleanRun>),
    Listing {
        stats: GatewayResult<Stats>,
        page: GatewayResult<Page>,
        query: PageQuery,
    },
    PageLoaded {
        page: GatewayResult<Page>,
        query: PageQuery,
    },
    CleanTriggered(GatewayResult<CleanReceipt>),
    SettleRefreshed {
        stats: GatewayResult<Stats>,
        page: GatewayResult<Page>,
        query: PageQuery,
        clean: GatewayResult<CleanRun>,
    },
    CooldownElapsed,
    SearchSettled(String),
}

#[derive(Debug, Clone, Copy)]
struct Timing {
    polling: PollingConfig,
    settle_delay: Duration,
    cooldown: Duration,
    search_debounce: Duration,
}

/// Reconciles local dashboard state with the remote service.
pub struct SyncController {
    gateway: Arc<dyn RemoteGateway>,
    renderer: Box<dyn Renderer>,
    metrics: Option<Metrics>,
    timing: Timing,
    state: DashboardState,
    debouncer: Debouncer,
    commands: mpsc::Receiver<ControlCommand>,
    completion_tx: mpsc::UnboundedSender<Completion>,
    completions: mpsc::UnboundedReceiver<Completion>,
}

impl SyncController {
    /// Wire a controller to its gateway and renderer.
    ///
    /// The returned handle is the first command sender; clone it for more.
    /// The loop stops once every handle is dropped.
    #[must_use]
    pub fn new(
        gateway: Arc<dyn RemoteGateway>,
        renderer: Box<dyn Renderer>,
        config: &DashboardConfig,
    ) -> (Self, ControllerHandle) {
        let (command_tx, commands) = mpsc::channel(COMMAND_BUFFER);
        let (completion_tx, completions) = mpsc::unbounded_channel();
        let controller = Self {
            gateway,
            renderer,
            metrics: None,
            timing: Timing {
                polling: config.polling,
                settle_delay: config.clean.settle_delay,
                cooldown: config.clean.cooldown,
                search_debounce: config.listing.search_debounce,
            },
            state: DashboardState::new(config.listing.page_size),
            debouncer: Debouncer::new(),
            commands,
            completion_tx,
            completions,
        };
        (
            controller,
            ControllerHandle {
                commands: command_tx,
            },
        )
    }

    /// Record poll and clean outcomes into `metrics`.
    #[must_use]
    pub fn with_metrics(mut self, metrics: Metrics) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Drive the controller until [`ControlCommand::Shutdown`] arrives or every
    /// handle is dropped.
    pub async fn run(mut self) {
        let mut scheduler = PollScheduler::new(&self.timing.polling);
        info!(page_size = self.state.pagination.page_size(), "dashboard controller started");

        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move { Completion::Version(gateway.version().await) });
        self.render();

        loop {
            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(ControlCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command, &mut scheduler),
                },
                Some(completion) = self.completions.recv() => {
                    self.apply(completion, &mut scheduler);
                }
                task = scheduler.next_due() => self.fire(task, &mut scheduler),
            }
        }

        self.debouncer.cancel();
        info!("dashboard controller stopped");
    }

    fn handle_command(&mut self, command: ControlCommand, scheduler: &mut PollScheduler) {
        match command {
            ControlCommand::NextPage => {
                if self.state.pagination.next_page() {
                    self.reload_page();
                }
            }
            ControlCommand::PreviousPage => {
                if self.state.pagination.previous_page() {
                    self.reload_page();
                }
            }
            ControlCommand::GoToPage(page) => {
                if self.state.pagination.set_page(page) {
                    self.reload_page();
                } else {
                    debug!(page, "page change ignored");
                }
            }
            ControlCommand::SetPageSize(size) => {
                if !PAGE_SIZE_OPTIONS.contains(&size) {
                    warn!(size, "unsupported page size ignored");
                    return;
                }
                if self.state.pagination.set_page_size(size) {
                    self.reload_page();
                }
            }
            ControlCommand::Search(term) => {
                let completions = self.completion_tx.clone();
                self.debouncer.trigger(
                    move || {
                        let _ = completions.send(Completion::SearchSettled(term));
                    },
                    self.timing.search_debounce,
                );
            }
            ControlCommand::TriggerClean => self.start_clean(),
            ControlCommand::Refresh => {
                for task in PollTask::ALL {
                    self.fire(task, scheduler);
                }
            }
            ControlCommand::Shutdown => {}
        }
        self.render();
    }

    fn fire(&mut self, task: PollTask, scheduler: &mut PollScheduler) {
        if !scheduler.try_begin(task) {
            debug!(task = task.name(), "previous poll still in flight; skipping");
            if let Some(metrics) = &self.metrics {
                metrics.record_poll_skipped(task.name());
            }
            return;
        }

        let gateway = Arc::clone(&self.gateway);
        match task {
            PollTask::ConnectionStatus => {
                self.spawn(async move { Completion::Connection(gateway.connection_status().await) });
            }
            PollTask::CleanStatus => {
                self.spawn(async move { Completion::CleanStatus(gateway.clean_status().await) });
            }
            PollTask::StatsAndPage => {
                let query = self.state.pagination.query();
                self.spawn(async move {
                    let (stats, page) = tokio::join!(gateway.stats(), gateway.deleted_page(&query));
                    Completion::Listing { stats, page, query }
                });
            }
        }
    }

    fn reload_page(&self) {
        let gateway = Arc::clone(&self.gateway);
        let query = self.state.pagination.query();
        self.spawn(async move {
            let page = gateway.deleted_page(&query).await;
            Completion::PageLoaded { page, query }
        });
    }

    fn start_clean(&mut self) {
        if !self.state.clean_available() {
            info!(
                phase = ?self.state.clean_phase,
                connected = self.state.connection.is_connected(),
                "clean request ignored; action unavailable"
            );
            return;
        }
        self.state.clean_phase = CleanPhase::Requesting;
        let gateway = Arc::clone(&self.gateway);
        self.spawn(async move { Completion::CleanTriggered(gateway.trigger_clean().await) });
    }

    fn apply(&mut self, completion: Completion, scheduler: &mut PollScheduler) {
        match completion {
            Completion::Version(result) => match result {
                Ok(version) => self.state.version = Some(version),
                Err(err) => warn!(error = %err, "failed to fetch service version"),
            },
            Completion::Connection(result) => {
                scheduler.finish(PollTask::ConnectionStatus);
                self.record_poll(PollTask::ConnectionStatus, result.is_ok());
                self.state.connection = result.unwrap_or_else(|err| {
                    warn!(task = PollTask::ConnectionStatus.name(), error = %err, "poll failed");
                    ConnectionStatus::Disconnected
                });
                if let Some(metrics) = &self.metrics {
                    metrics.set_service_connected(self.state.connection.is_connected());
                }
            }
            Completion::CleanStatus(result) => {
                scheduler.finish(PollTask::CleanStatus);
                self.record_poll(PollTask::CleanStatus, result.is_ok());
                self.apply_clean_run(PollTask::CleanStatus.name(), result);
            }
            Completion::Listing { stats, page, query } => {
                scheduler.finish(PollTask::StatsAndPage);
                self.record_poll(PollTask::StatsAndPage, stats.is_ok() && page.is_ok());
                self.apply_stats(PollTask::StatsAndPage.name(), stats);
                self.apply_page(PollTask::StatsAndPage.name(), page, &query);
            }
            Completion::PageLoaded { page, query } => self.apply_page("page_reload", page, &query),
            Completion::CleanTriggered(result) => self.finish_clean_request(result),
            Completion::SettleRefreshed {
                stats,
                page,
                query,
                clean,
            } => {
                self.apply_stats("settle_refresh", stats);
                self.apply_page("settle_refresh", page, &query);
                self.apply_clean_run("settle_refresh", clean);
                self.state.clean_phase = CleanPhase::Idle;
            }
            Completion::CooldownElapsed => self.state.clean_phase = CleanPhase::Idle,
            Completion::SearchSettled(term) => {
                if self.state.pagination.set_search_term(&term) {
                    self.reload_page();
                }
            }
        }
        self.render();
    }

    fn finish_clean_request(&mut self, result: GatewayResult<CleanReceipt>) {
        if let Some(metrics) = &self.metrics {
            metrics.record_clean(result.is_ok());
        }
        match result {
            Ok(receipt) => {
                info!(removed = receipt.removed_count(), "clean request accepted");
                self.state.clean_phase = CleanPhase::AwaitingSettle;
                let gateway = Arc::clone(&self.gateway);
                let query = self.state.pagination.query();
                let settle = self.timing.settle_delay;
                self.spawn(async move {
                    tokio::time::sleep(settle).await;
                    let (stats, page, clean) = tokio::join!(
                        gateway.stats(),
                        gateway.deleted_page(&query),
                        gateway.clean_status()
                    );
                    Completion::SettleRefreshed {
                        stats,
                        page,
                        query,
                        clean,
                    }
                });
            }
            Err(err) => {
                warn!(error = %err, domain = err.is_domain(), "clean request failed");
                self.state.clean_phase = CleanPhase::Error;
                let cooldown = self.timing.cooldown;
                self.spawn(async move {
                    tokio::time::sleep(cooldown).await;
                    Completion::CooldownElapsed
                });
            }
        }
    }

    fn apply_stats(&mut self, source: &'static str, result: GatewayResult<Stats>) {
        match result {
            Ok(stats) => self.state.stats = Some(stats),
            Err(err) => warn!(task = source, error = %err, "stats fetch failed"),
        }
    }

    fn apply_clean_run(&mut self, source: &'static str, result: GatewayResult<CleanRun>) {
        match result {
            Ok(run) => self.state.last_clean = run,
            Err(err) => warn!(task = source, error = %err, "clean status fetch failed"),
        }
    }

    fn apply_page(&mut self, source: &'static str, result: GatewayResult<Page>, query: &PageQuery) {
        let page = match result {
            Ok(page) => page,
            Err(err) => {
                warn!(task = source, error = %err, "page fetch failed");
                return;
            }
        };
        if *query != self.state.pagination.query() {
            debug!(task = source, requested = query.page, "discarding page for stale query");
            return;
        }
        let clamped = self
            .state
            .pagination
            .apply_server_page(page.page_number, page.total_pages);
        if clamped {
            // Rows of an out-of-range page are never shown.
            debug!(task = source, served = page.page_number, "page out of range; reloading");
            self.reload_page();
            return;
        }
        self.state.page = Some(page);
    }

    fn record_poll(&self, task: PollTask, success: bool) {
        if let Some(metrics) = &self.metrics {
            metrics.record_poll(task.name(), success);
        }
    }

    fn spawn<F>(&self, work: F)
    where
        F: Future<Output = Completion> + Send + 'static,
    {
        let completions = self.completion_tx.clone();
        tokio::spawn(async move {
            let _ = completions.send(work.await);
        });
    }

    fn render(&mut self) {
        let view = DashboardView::from_state(&self.state, Utc::now());
        self.renderer.render(&view);
    }
}

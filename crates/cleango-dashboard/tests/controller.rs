use std::sync::Arc;
use std::time::Duration;

use cleango_config::DashboardConfig;
use cleango_dashboard::render::CleanResultView;
use cleango_dashboard::{
    CleanOutcome, CleanPhase, CleanReceipt, CleanRun, CleanTrigger, ConnectionStatus,
    ControlCommand, ControllerHandle, DashboardView, RemovedTorrent, Stats, SyncController,
    TorrentRecord,
};
use cleango_telemetry::Metrics;
use cleango_test_support::fixtures::{reference_instant, sample_records};
use cleango_test_support::mocks::{RecordingRenderer, ScriptedGateway};
use tokio::task::JoinHandle;
use tokio::time::sleep;

struct Harness {
    gateway: Arc<ScriptedGateway>,
    renderer: RecordingRenderer,
    handle: ControllerHandle,
    task: JoinHandle<()>,
}

impl Harness {
    fn start(gateway: ScriptedGateway) -> Self {
        Self::start_with(gateway, None)
    }

    fn start_with(gateway: ScriptedGateway, metrics: Option<Metrics>) -> Self {
        let gateway = gateway.shared();
        let renderer = RecordingRenderer::new();
        let (mut controller, handle) = SyncController::new(
            gateway.clone(),
            Box::new(renderer.clone()),
            &DashboardConfig::default(),
        );
        if let Some(metrics) = metrics {
            controller = controller.with_metrics(metrics);
        }
        let task = tokio::spawn(controller.run());
        Self {
            gateway,
            renderer,
            handle,
            task,
        }
    }

    fn view(&self) -> DashboardView {
        self.renderer.last().expect("controller should have rendered")
    }

    async fn send(&self, command: ControlCommand) {
        self.handle.send(command).await.expect("controller running");
    }
}

async fn advance(millis: u64) {
    sleep(Duration::from_millis(millis)).await;
}

#[tokio::test(start_paused = true)]
async fn first_load_shows_page_one_of_three() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(sample_records(20), 3);
    gateway.set_stats(Ok(Stats {
        total_deleted: 41,
        total_size_freed_bytes: 1536,
    }));
    let harness = Harness::start(gateway);
    advance(10).await;

    let view = harness.view();
    assert_eq!(view.version.as_deref(), Some("2.0.0"));
    assert_eq!(view.connection, ConnectionStatus::Connected);
    assert_eq!(view.pagination.label, "Page 1 of 3");
    assert!(!view.pagination.previous_enabled);
    assert!(view.pagination.next_enabled);
    assert_eq!(view.rows.len(), 20);
    assert_eq!(view.rows[0].size, "1 GB");
    assert_eq!(view.stats.expect("stats").total_freed, "1.5 KB");
    assert!(view.clean_control.enabled);
    assert_eq!(view.clean_control.label, "Clean Torrents");

    let calls = harness.gateway.calls();
    assert_eq!(calls.version, 1);
    assert_eq!(calls.connection_status, 1);
    assert_eq!(calls.clean_status, 1);
    assert_eq!(calls.stats, 1);
    assert_eq!(calls.deleted_page, 1);
}

#[tokio::test(start_paused = true)]
async fn navigation_reloads_immediately() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(sample_records(20), 3);
    let harness = Harness::start(gateway);
    advance(10).await;

    harness.send(ControlCommand::NextPage).await;
    advance(10).await;
    let view = harness.view();
    assert_eq!(view.pagination.label, "Page 2 of 3");
    assert!(view.pagination.previous_enabled);
    assert!(view.pagination.next_enabled);

    harness.send(ControlCommand::GoToPage(3)).await;
    harness.send(ControlCommand::NextPage).await;
    advance(10).await;
    let view = harness.view();
    assert_eq!(view.pagination.label, "Page 3 of 3");
    assert!(!view.pagination.next_enabled);

    let pages: Vec<u32> = harness
        .gateway
        .page_queries()
        .iter()
        .map(|query| query.page)
        .collect();
    assert_eq!(pages, vec![1, 2, 3]);
}

fn named_record(name: &str) -> TorrentRecord {
    TorrentRecord {
        name: name.to_string(),
        size_bytes: 2048,
        tracker_message: "Unregistered torrent".to_string(),
        deleted_at: reference_instant(),
    }
}

#[tokio::test(start_paused = true)]
async fn rows_follow_server_order_on_first_page() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(
        vec![named_record("Ubuntu.24.04"), named_record("Debian.12")],
        3,
    );
    let harness = Harness::start(gateway);
    advance(10).await;

    let view = harness.view();
    let names: Vec<&str> = view.rows.iter().map(|row| row.name.as_str()).collect();
    assert_eq!(names, vec!["Ubuntu.24.04", "Debian.12"]);
    assert_eq!(view.pagination.label, "Page 1 of 3");
    assert!(!view.pagination.previous_enabled);
    assert!(view.pagination.next_enabled);
}

#[tokio::test(start_paused = true)]
async fn shrunk_log_reloads_last_valid_page() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(sample_records(2), 3);
    let harness = Harness::start(gateway);
    advance(10).await;
    harness.send(ControlCommand::GoToPage(3)).await;
    advance(10).await;
    assert_eq!(harness.view().pagination.label, "Page 3 of 3");

    harness.gateway.set_pages(sample_records(2), 2);
    harness.send(ControlCommand::Refresh).await;
    advance(10).await;

    let view = harness.view();
    assert_eq!(view.pagination.label, "Page 2 of 2");
    assert_eq!(view.rows.len(), 2);
    let pages: Vec<u32> = harness
        .gateway
        .page_queries()
        .iter()
        .map(|query| query.page)
        .collect();
    assert_eq!(pages, vec![1, 3, 3, 2]);
}

#[tokio::test(start_paused = true)]
async fn page_size_change_resets_to_first_page() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(sample_records(20), 3);
    let harness = Harness::start(gateway);
    advance(10).await;

    harness.send(ControlCommand::GoToPage(3)).await;
    harness.send(ControlCommand::SetPageSize(100)).await;
    harness.send(ControlCommand::SetPageSize(35)).await;
    advance(10).await;

    let view = harness.view();
    assert_eq!(view.pagination.label, "Page 1 of 3");
    assert_eq!(view.pagination.page_size, 100);
    let last = harness.gateway.page_queries().pop().expect("queries");
    assert_eq!((last.page, last.per_page), (1, 100));
}

#[tokio::test(start_paused = true)]
async fn stale_page_responses_are_discarded() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(sample_records(5), 3);
    let harness = Harness::start(gateway);
    advance(10).await;

    harness.gateway.set_page_delay(Duration::from_millis(100));
    harness.send(ControlCommand::NextPage).await;
    harness.send(ControlCommand::SetPageSize(100)).await;
    advance(200).await;

    let view = harness.view();
    assert_eq!(view.pagination.label, "Page 1 of 3");
    assert_eq!(view.pagination.page_size, 100);
}

#[tokio::test(start_paused = true)]
async fn failed_clean_reenables_after_cooldown_without_refresh() {
    let gateway = ScriptedGateway::connected();
    gateway.set_clean(Err("disk full".into()));
    let metrics = Metrics::new().expect("metrics");
    let harness = Harness::start_with(gateway, Some(metrics.clone()));
    advance(10).await;

    harness.handle.trigger_clean().await.expect("controller running");
    advance(10).await;
    let view = harness.view();
    assert!(!view.clean_control.enabled);
    assert_eq!(view.clean_control.label, "Cleaning...");
    assert_eq!(view.clean_control.phase, CleanPhase::Error);

    advance(900).await;
    assert!(!harness.view().clean_control.enabled);

    advance(100).await;
    let view = harness.view();
    assert!(view.clean_control.enabled);
    assert_eq!(view.clean_control.label, "Clean Torrents");

    let calls = harness.gateway.calls();
    assert_eq!(calls.trigger_clean, 1);
    assert_eq!(calls.stats, 1);
    assert_eq!(calls.deleted_page, 1);
    assert_eq!(calls.clean_status, 1);
    assert_eq!(metrics.clean_count(false), 1);
}

#[tokio::test(start_paused = true)]
async fn successful_clean_refreshes_exactly_once_after_settle() {
    let gateway = ScriptedGateway::connected();
    gateway.set_clean(Ok(CleanReceipt {
        removed: vec![RemovedTorrent {
            name: "Old.Release".into(),
            size_bytes: 2048,
            tracker_message: "Torrent not found".into(),
        }],
    }));
    let harness = Harness::start(gateway);
    advance(10).await;

    harness.gateway.set_clean_status(Ok(CleanRun {
        timestamp: Some(reference_instant()),
        trigger: Some(CleanTrigger::Manual),
        outcome: Some(CleanOutcome::Success { removed_count: 1 }),
    }));
    harness.handle.trigger_clean().await.expect("controller running");
    advance(10).await;
    assert_eq!(harness.view().clean_control.phase, CleanPhase::AwaitingSettle);
    assert_eq!(harness.gateway.calls().stats, 1);

    advance(1_000).await;
    let view = harness.view();
    assert_eq!(view.clean_control.phase, CleanPhase::Idle);
    assert!(view.clean_control.enabled);
    assert_eq!(view.last_clean.trigger.as_deref(), Some("(manual)"));
    assert_eq!(
        view.last_clean.result,
        Some(CleanResultView::Success("Removed 1 torrents".into()))
    );

    advance(2_000).await;
    let calls = harness.gateway.calls();
    assert_eq!(calls.stats, 2);
    assert_eq!(calls.deleted_page, 2);
    assert_eq!(calls.clean_status, 2);
}

#[tokio::test(start_paused = true)]
async fn triggers_while_busy_are_ignored() {
    let gateway = ScriptedGateway::connected();
    gateway.set_clean_delay(Duration::from_millis(500));
    let harness = Harness::start(gateway);
    advance(10).await;

    harness.handle.trigger_clean().await.expect("controller running");
    harness.handle.trigger_clean().await.expect("controller running");
    advance(10).await;
    assert_eq!(harness.view().clean_control.phase, CleanPhase::Requesting);
    harness.handle.trigger_clean().await.expect("controller running");
    advance(2_000).await;

    assert_eq!(harness.gateway.calls().trigger_clean, 1);
    assert!(harness.view().clean_control.enabled);
}

#[tokio::test(start_paused = true)]
async fn clean_is_unavailable_while_disconnected() {
    let gateway = ScriptedGateway::connected();
    gateway.set_connection(Ok(ConnectionStatus::Disconnected));
    let harness = Harness::start(gateway);
    advance(10).await;

    harness.handle.trigger_clean().await.expect("controller running");
    advance(10).await;

    assert_eq!(harness.gateway.calls().trigger_clean, 0);
    let view = harness.view();
    assert!(!view.clean_control.enabled);
    assert_eq!(view.clean_control.phase, CleanPhase::Idle);
}

#[tokio::test(start_paused = true)]
async fn search_is_debounced_and_forwarded() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(sample_records(3), 2);
    let harness = Harness::start(gateway);
    advance(10).await;
    harness.send(ControlCommand::NextPage).await;
    advance(10).await;

    harness.handle.search("Un").await.expect("controller running");
    advance(100).await;
    harness.handle.search("Unreg").await.expect("controller running");
    advance(100).await;
    harness.handle.search(" Unregistered ").await.expect("controller running");
    advance(299).await;

    let searched = |harness: &Harness| {
        harness
            .gateway
            .page_queries()
            .into_iter()
            .filter(|query| query.search.is_some())
            .collect::<Vec<_>>()
    };
    assert!(searched(&harness).is_empty());

    advance(2).await;
    let queries = searched(&harness);
    assert_eq!(queries.len(), 1);
    assert_eq!(queries[0].search.as_deref(), Some("unregistered"));
    assert_eq!(queries[0].page, 1);
    assert_eq!(harness.view().pagination.search_term, "unregistered");
}

#[tokio::test(start_paused = true)]
async fn failed_polls_keep_stale_data_but_drop_connection() {
    let gateway = ScriptedGateway::connected();
    gateway.set_pages(sample_records(4), 1);
    gateway.set_stats(Ok(Stats {
        total_deleted: 4,
        total_size_freed_bytes: 4096,
    }));
    let harness = Harness::start(gateway);
    advance(10).await;
    assert_eq!(harness.view().connection, ConnectionStatus::Connected);

    harness.gateway.set_connection(Err("service unavailable".into()));
    harness.gateway.set_stats(Err("service unavailable".into()));
    harness.gateway.set_page_failure(Some("service unavailable"));
    advance(5_000).await;

    let view = harness.view();
    assert_eq!(view.connection, ConnectionStatus::Disconnected);
    assert!(!view.clean_control.enabled);
    assert_eq!(view.stats.expect("stale stats").total_deleted, 4);
    assert_eq!(view.rows.len(), 4);
    assert_eq!(harness.gateway.calls().connection_status, 2);
}

#[tokio::test(start_paused = true)]
async fn overlapping_polls_are_coalesced() {
    let gateway = ScriptedGateway::connected();
    gateway.set_page_delay(Duration::from_secs(7));
    let metrics = Metrics::new().expect("metrics");
    let harness = Harness::start_with(gateway, Some(metrics.clone()));

    advance(5_010).await;
    assert_eq!(harness.gateway.calls().deleted_page, 1);
    assert_eq!(metrics.skipped_count("stats_and_page"), 1);
    assert_eq!(metrics.poll_count("connection_status", true), 2);
    assert!(metrics.service_connected());

    advance(5_000).await;
    assert_eq!(harness.gateway.calls().deleted_page, 2);
}

#[tokio::test(start_paused = true)]
async fn shutdown_stops_the_loop() {
    let harness = Harness::start(ScriptedGateway::connected());
    advance(10).await;

    harness.handle.shutdown().await.expect("controller running");
    harness.task.await.expect("controller task should finish cleanly");
}

#[tokio::test(start_paused = true)]
async fn dropping_every_handle_stops_the_loop() {
    let Harness { handle, task, .. } = Harness::start(ScriptedGateway::connected());
    drop(handle);
    task.await.expect("controller task should finish cleanly");
}

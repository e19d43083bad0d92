#![forbid(unsafe_code)]
#![deny(
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]
#![allow(clippy::module_name_repetitions)]

//! Synchronization controller for the cleango monitoring dashboard.
//!
//! Layout: leaves first. `format.rs` and `pagination.rs` are pure state,
//! `debounce.rs` and `scheduler.rs` own timers, `gateway.rs` issues every
//! request, and `controller.rs` reconciles it all into a [`DashboardView`]
//! handed to a [`Renderer`].

pub mod controller;
mod convert;
pub mod debounce;
pub mod error;
pub mod format;
pub mod gateway;
pub mod model;
pub mod pagination;
pub mod render;
pub mod scheduler;
mod state;

pub use controller::{ControlCommand, ControllerHandle, SyncController};
pub use convert::parse_instant;
pub use debounce::Debouncer;
pub use error::{ControllerClosed, GatewayError, GatewayResult};
pub use format::{RelativeBucket, format_relative_time, format_relative_time_at, format_size};
pub use gateway::{HttpGateway, RemoteGateway};
pub use model::{
    CleanOutcome, CleanPhase, CleanReceipt, CleanRun, CleanTrigger, ConnectionStatus, Page,
    PageQuery, RemovedTorrent, Stats, TorrentRecord,
};
pub use pagination::PaginationState;
pub use render::{DashboardView, Renderer};
pub use scheduler::{PollScheduler, PollTask};

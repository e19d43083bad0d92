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

//! Telemetry primitives shared across the cleango workspace.
//!
//! Centralises logging setup and the Prometheus counters the dashboard
//! controller records, so the CLI and any future front end share one
//! observability story.

pub mod error;
pub mod init;
pub mod metrics;

pub use error::{Result, TelemetryError};
pub use init::{
    DEFAULT_LOG_LEVEL, LogFormat, LogTarget, LoggingConfig, build_sha, init_logging,
};
pub use metrics::Metrics;

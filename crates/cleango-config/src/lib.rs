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

//! Configuration for the cleango dashboard controller.
//!
//! Layout: `model.rs` (typed config sections), `defaults.rs` (default values and
//! the environment variable names), `loader.rs` (environment loading),
//! `validate.rs` (cross-field validation), `error.rs` (error type).

pub mod defaults;
pub mod error;
pub mod loader;
pub mod model;
pub mod validate;

pub use defaults::{DEFAULT_PAGE_SIZE, PAGE_SIZE_OPTIONS};
pub use error::{ConfigError, ConfigResult};
pub use loader::{load_from_env, load_with};
pub use model::{CleanConfig, DashboardConfig, ListingConfig, PollingConfig, ServiceConfig};
pub use validate::validate;

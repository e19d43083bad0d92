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
#![allow(clippy::redundant_pub_crate)]

//! Terminal client for the cleango torrent cleanup service.
//!
//! Layout:
//! - `cli.rs`: argument parsing, configuration resolution, and dispatch
//! - `commands/`: command handlers grouped by concern
//! - `client.rs`: HTTP client construction and error classification
//! - `output.rs`: table and JSON renderers
//! - `terminal.rs`: live dashboard renderer used by `watch`
//! - `main.rs`: thin entrypoint delegating to `run()`

pub(crate) mod cli;
pub(crate) mod client;
pub(crate) mod commands;
pub(crate) mod output;
pub(crate) mod terminal;

pub use cli::run;

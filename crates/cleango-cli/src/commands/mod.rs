pub(crate) mod clean;
pub(crate) mod config;
pub(crate) mod listing;
pub(crate) mod status;
pub(crate) mod watch;

pub mod api;
pub mod config;
pub mod errors;
pub mod host;
pub mod materialize;
pub mod vfs;

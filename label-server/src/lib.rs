//! # label-server
//!
//! HTTP service around the return-label pipeline:
//! - Return-order search proxied from the upstream warehouse API
//! - Label preview (PDF) and command-text (ZPL) routes
//! - Raw TCP and OS-spooler print dispatch

pub mod core;
pub mod routes;
pub mod spool;
pub mod storage;
pub mod utils;
pub mod warehouse;

pub use core::{AppState, Config};
pub use routes::{build_app, build_router};

/// Load .env and initialize logging from the environment.
pub fn setup_environment() {
    dotenv::dotenv().ok();

    let level = std::env::var("LOG_LEVEL").ok();
    let dir = std::env::var("LOG_DIR").ok();
    utils::init_logger_with_file(level.as_deref(), dir.as_deref());
}

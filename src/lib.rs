// The binary in main.rs drives the terminal; everything else lives here so
// benches and integration tests can reach it as `wordfall::*`.

pub mod app;
pub mod config;
pub mod engine;
pub mod event;
pub mod logging;
#[cfg(feature = "network")]
pub mod server;
pub mod session;
pub mod sink;
pub mod source;
pub mod speech;
pub mod store;
pub mod ui;

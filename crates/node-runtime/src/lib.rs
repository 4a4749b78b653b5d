//! # Node Runtime Library
//!
//! This library exposes the internal modules of the node runtime for testing.
//! The main entry point is the `main.rs` binary.
//!
//! ## Modules
//!
//! - `config` - Environment-driven configuration
//! - `logging` - Global `tracing` subscriber setup
//! - `commands` - JSON-lines request protocol and dispatch
//! - `server` - Request loop over any async reader and writer

pub mod commands;
pub mod config;
pub mod logging;
pub mod server;

pub use commands::{dispatch, handle_line, handle_raw_line, Command, Response};
pub use config::{ConfigError, LoggingConfig, NodeConfig};
pub use logging::init_logging;
pub use server::serve;

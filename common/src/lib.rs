//! Shared models, address arithmetic, configuration and error types for the
//! netbelt reconnaissance engine.

pub mod config;
pub mod error;
pub mod log;
pub mod network;

pub use tracing;

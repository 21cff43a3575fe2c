//! End-to-end checks for the discovery and scanning engines.

mod discovery;
mod scan;

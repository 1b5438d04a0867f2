//! Cache Worker - A cache-first offline proxy for a single web page
//!
//! Pre-caches a manifest on install, evicts stale cache generations on
//! activate, and answers page requests cache-first while populating the
//! cache from the network.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod models;
pub mod network;
pub mod tasks;
pub mod worker;

pub use api::AppState;
pub use config::Config;
pub use error::{Result, WorkerError};
pub use worker::Registration;

//! Background Tasks Module
//!
//! Contains work the fetch interceptor detaches from the response path.
//!
//! # Tasks
//! - Cache write: copies a qualifying network response into the current store

mod background;

pub use background::spawn_cache_write;

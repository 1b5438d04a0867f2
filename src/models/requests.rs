//! Request DTOs for the worker admin API
//!
//! Defines the structure of incoming HTTP request bodies.

use serde::Deserialize;

/// Request body for registering a new version (POST /__worker/update)
///
/// # Fields
/// - `version`: The new cache version number
/// - `manifest`: Optional replacement manifest (keeps the current one if absent)
#[derive(Debug, Clone, Deserialize)]
pub struct UpdateRequest {
    /// The new cache version
    pub version: u32,
    /// Optional replacement manifest
    #[serde(default)]
    pub manifest: Option<Vec<String>>,
}

impl UpdateRequest {
    /// Validates the request data
    ///
    /// Returns an error message if validation fails, None if valid.
    pub fn validate(&self) -> Option<String> {
        if self.version == 0 {
            return Some("Version must be greater than zero".to_string());
        }
        if let Some(manifest) = &self.manifest {
            if manifest.iter().any(|path| path.trim().is_empty()) {
                return Some("Manifest entries cannot be empty".to_string());
            }
        }
        None
    }
}

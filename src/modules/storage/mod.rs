//! Storage module for uploaded report photos
//!
//! Photos are written under a single upload directory and served back as
//! static files. Handlers only see the [`PhotoStore`] trait.

mod local;

use async_trait::async_trait;

use crate::core::error::AppError;

pub use local::LocalStorage;

/// Backend for persisting uploaded photos
#[async_trait]
pub trait PhotoStore: Send + Sync {
    /// Store a photo under a collision-resistant name derived from
    /// `filename` and return the stored name.
    ///
    /// `filename` must already be sanitized.
    async fn save(&self, filename: &str, data: &[u8]) -> Result<String, AppError>;

    /// Remove a stored photo. Missing files are not an error.
    async fn remove(&self, stored_name: &str) -> Result<(), AppError>;
}

//! Core type definitions for tamperguard.
//!
//! This crate defines the small, host-agnostic types shared by the model and
//! the change-detection core:
//! - Stable identifiers carried by identity markers (UUID v4)
//! - Process-local object handles assigned by the hosting document
//! - Lock timestamps persisted alongside a watcher's state
//!
//! Field values, scene graph contracts and the fingerprinting engine live in
//! `tamperguard-model` and `tamperguard-core`.

mod ids;
mod timestamp;

pub use ids::{Handle, StableId};
pub use timestamp::LockTimestamp;

/// Result type alias using the crate's error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in type operations.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid UUID: {0}")]
    InvalidUuid(#[from] uuid::Error),

    #[error("invalid handle: {0}")]
    InvalidHandle(String),

    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

//! Error types for the change-detection core.

use thiserror::Error;

/// Result type for fingerprint codec operations.
pub type CodecResult<T> = Result<T, CodecError>;

/// Errors from encoding or decoding a serialized fingerprint map.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CodecError {
    /// A record has no `;` between name and value.
    #[error("record {index} has no field separator: {record:?}")]
    MissingFieldSeparator { index: usize, record: String },

    /// A record has more than one `;`.
    #[error("record {index} has more than one field separator: {record:?}")]
    ExtraFieldSeparator { index: usize, record: String },

    /// A record has nothing before the `;`.
    #[error("record {index} has an empty field name")]
    EmptyFieldName { index: usize },

    /// The value is not a 32-bit signed integer.
    #[error("field {name:?} has an invalid fingerprint {value:?}")]
    InvalidFingerprint { name: String, value: String },

    /// The same field name appears twice.
    #[error("field {0:?} appears more than once")]
    DuplicateField(String),

    /// A field name contains `;` or `§` and cannot be encoded.
    #[error("field name {0:?} contains a reserved separator")]
    ReservedCharacter(String),
}

/// Result type for watcher operations.
pub type WatchResult<T> = Result<T, WatchError>;

/// Errors surfaced by [`TamperWatcher`](crate::TamperWatcher) operations.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Lock was requested with no target assigned.
    #[error("no target to watch")]
    MissingTarget,

    /// The watcher was called while one of its own operations was running.
    #[error("watcher is busy with another operation")]
    Reentrant,

    /// Persisted fingerprint state could not be decoded.
    #[error("fingerprint codec error: {0}")]
    Codec(#[from] CodecError),
}

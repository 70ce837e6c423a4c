//! Device store - the single persistence primitive of a device
//!
//! # Module structure
//!
//! - [`keys`] - the fixed key space
//! - [`storage`] - redb-backed [`DeviceStore`] and its write transaction handle

pub mod keys;
pub mod storage;

pub use keys::{SESSION_KEYS, StoreKey};
pub use storage::{DeviceStore, StoreError, StoreResult, StoreTxn};

use shared::{AppError, ErrorCode};

/// Map a store error to an error code
fn classify_store_error(e: &StoreError) -> ErrorCode {
    if let StoreError::Serialization(_) = e {
        return ErrorCode::StorageCorrupted;
    }

    // redb errors are classified by message
    let err_str = e.to_string().to_lowercase();

    if err_str.contains("no space") || err_str.contains("disk full") || err_str.contains("enospc")
    {
        return ErrorCode::StorageFull;
    }

    if err_str.contains("corrupt") || err_str.contains("invalid database") {
        return ErrorCode::StorageCorrupted;
    }

    // Database/Transaction/Table/Storage/Commit
    ErrorCode::SystemBusy
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        let code = classify_store_error(&err);
        tracing::error!(
            error = %err,
            error_code = code.code(),
            category = code.category().name(),
            "Device store error"
        );
        AppError::with_message(code, err.to_string())
    }
}

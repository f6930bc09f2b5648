//! SQLite Error Classification
//!
//! SQLiteのエラーをストアエラーに分類する

use rusqlite::ffi;
use rusqlite::ErrorCode;

use crate::domain::repositories::catalog_repository::StoreError;

/// Check if a SQLite error code means the store cannot be reached
pub fn is_unavailable_code(code: ErrorCode) -> bool {
    matches!(
        code,
        ErrorCode::DatabaseBusy
            | ErrorCode::DatabaseLocked
            | ErrorCode::CannotOpen
            | ErrorCode::SystemIoFailure
            | ErrorCode::NotADatabase
            | ErrorCode::DatabaseCorrupt
            | ErrorCode::PermissionDenied
            | ErrorCode::DiskFull
            | ErrorCode::ReadOnly
            | ErrorCode::FileLockingProtocolFailed
    )
}

/// Check if an extended code is a uniqueness violation (UNIQUE or PRIMARY KEY)
pub fn is_uniqueness_violation(extended_code: i32) -> bool {
    extended_code == ffi::SQLITE_CONSTRAINT_UNIQUE
        || extended_code == ffi::SQLITE_CONSTRAINT_PRIMARYKEY
}

/// Convert a rusqlite error into a store error
pub fn classify(error: rusqlite::Error) -> StoreError {
    match &error {
        rusqlite::Error::SqliteFailure(failure, message) => {
            let detail = message.clone().unwrap_or_else(|| error.to_string());

            if failure.code == ErrorCode::ConstraintViolation
                && is_uniqueness_violation(failure.extended_code)
            {
                StoreError::Conflict(detail)
            } else if is_unavailable_code(failure.code) {
                StoreError::Unavailable(detail)
            } else {
                StoreError::Other(detail)
            }
        }
        _ => StoreError::Other(error.to_string()),
    }
}

/// Error for a poisoned connection lock
pub fn poisoned_lock() -> StoreError {
    StoreError::Unavailable("catalog connection lock poisoned".to_string())
}

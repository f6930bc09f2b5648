//! Repository Implementations
//!
//! Domain層のRepositoryトレイトの実装

pub mod sqlite_catalog_repository;
pub mod sqlite_errors;
pub mod sqlite_history_repository;

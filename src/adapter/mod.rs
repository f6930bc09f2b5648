//! Adapter Layer
//!
//! 外部システム（SQLite, ファイルシステム）との統合

pub mod config;
pub mod csv;
pub mod repositories;

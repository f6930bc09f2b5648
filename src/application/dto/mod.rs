//! # Data Transfer Objects
//!
//! ユースケースの入出力

pub mod import_config;
pub mod import_report;
pub mod import_request;

//! CSV Adapter
//!
//! 区切りテキストの読み込み

pub mod csv_row_reader;

//! # Domain Entities
//!
//! ビジネスエンティティとバリューオブジェクトを定義するモジュール
//!
//! ## エンティティ
//!
//! - **catalog**: ディシプリン・オファリング・講義などカタログのレコード
//! - **CandidateRow**: CSVから読み取った検証前の行
//! - **RowResult**: 行ごとの処理結果
//! - **ImportHistoryEntry**: インポート実行の監査履歴
//! - **ImportKind**: インポート種別

pub mod candidate_row;
pub mod catalog;
pub mod import_history;
pub mod import_kind;
pub mod row_result;

//! # Lecturesync
//!
//! 講義カタログのCSV一括インポートと、インポート履歴の監査を行うツール
//!
//! このプロジェクトはクリーンアーキテクチャを採用しており、以下の4層で構成されています：
//!
//! - **Domain層**: エンティティ、リポジトリのトレイト、検証などの純粋なルール（外部依存なし）
//! - **Application層**: インポートのパイプライン（ユースケース）
//! - **Adapter層**: CSV読み込み、SQLiteのカタログ、JSONの履歴、設定
//! - **Driver層**: CLI、依存性注入

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

// Domain層（純粋なビジネスロジック）
pub mod domain;

// Application層（ユースケース）
pub mod application;

// Adapter層（Infrastructure）
pub mod adapter;

// Driver層（Presentation）
pub mod driver;

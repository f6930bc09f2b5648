//! # Use Cases
//!
//! アプリケーションのビジネスフロー（ユースケース）
//!
//! ## ユースケース
//!
//! - **ImportCatalogUseCase**: CSVインポートの実行と履歴の記録
//! - **RowReconciler**: 1行分の自然キー解決と作成・更新
//! - **ListHistoryUseCase**: インポート履歴の一覧
//! - **TemplateGenerator**: 種別ごとのCSVテンプレート

pub mod generate_template;
pub mod import_catalog;
pub mod list_history;
pub mod reconcile_row;

#[cfg(test)]
pub(crate) mod in_memory_catalog;

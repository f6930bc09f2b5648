//! # History Repository Trait
//!
//! インポート履歴の永続化を抽象化（追記のみ）

use anyhow::Result;
use async_trait::async_trait;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::import_history::{ImportHistoryEntry, NewImportHistoryEntry};

/// 履歴リポジトリ
///
/// 記録済みのエントリを更新・削除する操作は持たない
#[cfg_attr(test, automock)]
#[async_trait]
pub trait HistoryRepository: Send + Sync {
    /// 履歴エントリを追記する
    ///
    /// # Arguments
    ///
    /// * `entry` - 記録するエントリ
    ///
    /// # Returns
    ///
    /// 識別子とタイムスタンプが付与されたエントリ
    ///
    /// # Errors
    ///
    /// 書き込みに失敗した場合にエラーを返す
    async fn append(&self, entry: NewImportHistoryEntry) -> Result<ImportHistoryEntry>;

    /// 履歴を新しい順に返す
    ///
    /// # Errors
    ///
    /// 読み込みに失敗した場合にエラーを返す
    async fn list_newest_first(&self) -> Result<Vec<ImportHistoryEntry>>;
}

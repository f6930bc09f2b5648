//! # List History Use Case
//!
//! インポート履歴の一覧（新しい順）

use anyhow::Result;
use std::sync::Arc;

use crate::domain::entities::import_history::ImportHistoryEntry;
use crate::domain::repositories::history_repository::HistoryRepository;

/// 履歴一覧ユースケース
pub struct ListHistoryUseCase<H: HistoryRepository> {
    history_repository: Arc<H>,
}

impl<H: HistoryRepository> ListHistoryUseCase<H> {
    pub fn new(history_repository: Arc<H>) -> Self {
        Self { history_repository }
    }

    /// 履歴を新しい順に返す
    ///
    /// # Arguments
    ///
    /// * `limit` - 最大件数（`None` の場合はすべて）
    ///
    /// # Errors
    ///
    /// 履歴の読み込みに失敗した場合にエラーを返す
    pub async fn execute(&self, limit: Option<usize>) -> Result<Vec<ImportHistoryEntry>> {
        let mut entries = self.history_repository.list_newest_first().await?;

        if let Some(limit) = limit {
            entries.truncate(limit);
        }

        Ok(entries)
    }
}

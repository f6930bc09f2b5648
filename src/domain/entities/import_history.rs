//! # ImportHistoryEntry Entity
//!
//! インポート実行ごとの監査履歴

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::import_kind::ImportKind;

/// 記録前の履歴エントリ
///
/// `success_count + error_count == total_rows` を満たすものだけが作成できる
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewImportHistoryEntry {
    pub kind: ImportKind,
    pub source_filename: String,
    pub actor: String,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
}

impl NewImportHistoryEntry {
    /// 新しい履歴エントリを作成
    ///
    /// # Arguments
    ///
    /// * `kind` - インポート種別
    /// * `source_filename` - 元ファイル名
    /// * `actor` - 実行ユーザー
    /// * `success_count` - 成功行数
    /// * `error_count` - エラー行数
    /// * `total_rows` - 検証に到達した行数
    ///
    /// # Errors
    ///
    /// 件数が一致しない場合にエラーを返す
    pub fn new(
        kind: ImportKind,
        source_filename: String,
        actor: String,
        total_rows: usize,
        success_count: usize,
        error_count: usize,
    ) -> anyhow::Result<Self> {
        if success_count + error_count != total_rows {
            anyhow::bail!(
                "History counts do not add up: {} + {} != {}",
                success_count,
                error_count,
                total_rows
            );
        }

        Ok(Self {
            kind,
            source_filename,
            actor,
            total_rows,
            success_count,
            error_count,
        })
    }
}

/// 記録済みの履歴エントリ（作成後は変更しない）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportHistoryEntry {
    pub id: String,
    pub kind: ImportKind,
    pub source_filename: String,
    pub actor: String,
    pub total_rows: usize,
    pub success_count: usize,
    pub error_count: usize,
    pub created_at: DateTime<Utc>,
}

impl ImportHistoryEntry {
    /// 記録前のエントリに識別子とタイムスタンプを付与する
    pub fn record(entry: NewImportHistoryEntry, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            kind: entry.kind,
            source_filename: entry.source_filename,
            actor: entry.actor,
            total_rows: entry.total_rows,
            success_count: entry.success_count,
            error_count: entry.error_count,
            created_at,
        }
    }

    /// 成功率（0.0〜1.0）
    ///
    /// 行数が0の場合は `0.0`
    pub fn success_rate(&self) -> f64 {
        if self.total_rows == 0 {
            return 0.0;
        }
        self.success_count as f64 / self.total_rows as f64
    }

    pub fn has_errors(&self) -> bool {
        self.error_count > 0
    }
}

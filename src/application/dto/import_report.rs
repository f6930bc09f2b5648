//! # Import Report DTO
//!
//! インポート実行の結果（呼び出し元に返す）

use serde::Serialize;

use crate::domain::entities::import_history::ImportHistoryEntry;
use crate::domain::entities::import_kind::ImportKind;
use crate::domain::entities::row_result::RowResult;
use crate::domain::services::result_collector::ImportTally;

/// インポートレポート
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportReport {
    pub kind: ImportKind,
    pub source_filename: String,
    pub actor: String,
    /// 入力順の行結果
    pub results: Vec<RowResult>,
    pub tally: ImportTally,
    /// キーが空で結果に含まれなかった行数
    pub dropped_without_key: usize,
    /// 記録された履歴エントリ（記録に失敗した場合は `None`）
    pub history_entry: Option<ImportHistoryEntry>,
    /// 履歴の記録に失敗した場合の警告
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audit_warning: Option<String>,
    /// ストアに到達できず途中で処理を打ち切った場合の理由
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aborted: Option<String>,
}

impl ImportReport {
    pub fn is_aborted(&self) -> bool {
        self.aborted.is_some()
    }

    pub fn has_errors(&self) -> bool {
        self.tally.error > 0
    }
}

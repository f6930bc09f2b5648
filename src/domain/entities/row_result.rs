//! # RowResult Value Object
//!
//! 1行ごとのインポート結果（永続化しない）

use serde::{Deserialize, Serialize};

/// 行の処理結果ステータス
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowStatus {
    Success,
    Error,
}

/// 行ごとのインポート結果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowResult {
    /// 入力ファイル上の行番号
    pub line: u64,
    /// 行の照合キー（外部カタログIDやディシプリンコード）
    pub natural_key: String,
    pub status: RowStatus,
    pub message: String,
}

impl RowResult {
    pub fn success(line: u64, natural_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line,
            natural_key: natural_key.into(),
            status: RowStatus::Success,
            message: message.into(),
        }
    }

    pub fn error(line: u64, natural_key: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            line,
            natural_key: natural_key.into(),
            status: RowStatus::Error,
            message: message.into(),
        }
    }

    #[inline]
    pub fn is_success(&self) -> bool {
        self.status == RowStatus::Success
    }
}

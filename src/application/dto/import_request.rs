//! # Import Request DTO
//!
//! 1回のインポート実行の入力

use crate::domain::entities::import_kind::ImportKind;

/// インポート要求
#[derive(Debug, Clone)]
pub struct ImportRequest {
    pub kind: ImportKind,
    /// 履歴に記録する元ファイル名
    pub source_filename: String,
    /// 実行ユーザー（`None` の場合は設定の既定値）
    pub actor: Option<String>,
    /// ファイルの内容（UTF-8の区切りテキスト）
    pub content: Vec<u8>,
}

impl ImportRequest {
    pub fn new(kind: ImportKind, source_filename: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            kind,
            source_filename: source_filename.into(),
            actor: None,
            content,
        }
    }

    pub fn with_actor(mut self, actor: impl Into<String>) -> Self {
        self.actor = Some(actor.into());
        self
    }
}

//! # Row Reader Trait
//!
//! 表形式テキストから候補行への変換を抽象化

use thiserror::Error;

use crate::domain::entities::candidate_row::CandidateRow;
use crate::domain::entities::import_kind::ImportKind;

/// 実行全体を中断するエラー
///
/// 行の処理が始まる前に発生し、履歴は記録されない
#[derive(Debug, Error)]
pub enum ImportError {
    #[error("input is not readable as delimited text: {0}")]
    UnreadableInput(String),

    #[error("input has no header row")]
    MissingHeader,
}

/// 読み取り結果
#[derive(Debug, Clone, Default)]
pub struct ParsedRows {
    /// 照合キーを持つ行（入力順）
    pub rows: Vec<CandidateRow>,
    /// 照合キーが空のため除外した行数
    pub dropped_without_key: usize,
    /// どの論理フィールドにも対応しなかったヘッダー
    pub unrecognized_headers: Vec<String>,
}

/// 行リーダー
///
/// メモリ上の純粋な変換で、副作用を持たない
pub trait RowReader: Send + Sync {
    /// 入力全体を候補行に変換する
    ///
    /// # Arguments
    ///
    /// * `kind` - インポート種別（対応するヘッダーを決める）
    /// * `content` - UTF-8の区切りテキスト
    ///
    /// # Errors
    ///
    /// 入力が区切りテキストとして読めない場合に `ImportError` を返す
    fn read_rows(&self, kind: ImportKind, content: &[u8]) -> Result<ParsedRows, ImportError>;
}

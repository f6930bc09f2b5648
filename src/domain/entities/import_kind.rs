//! # ImportKind Value Object
//!
//! インポート種別

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// インポート種別
///
/// 種別ごとに受け付けるCSVの形と、行の照合キーが決まる
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportKind {
    /// 既存講義のアクセシビリティ項目を更新
    Accessibility,
    /// ディシプリンを新規作成
    Disciplines,
    /// 講義を新規作成（オファリングは必要に応じて自動生成）
    Lectures,
}

impl ImportKind {
    pub const ALL: [ImportKind; 3] = [
        ImportKind::Accessibility,
        ImportKind::Disciplines,
        ImportKind::Lectures,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ImportKind::Accessibility => "accessibility",
            ImportKind::Disciplines => "disciplines",
            ImportKind::Lectures => "lectures",
        }
    }

    /// 一覧表示用のラベル
    pub fn label(&self) -> &'static str {
        match self {
            ImportKind::Accessibility => "Accessibility links",
            ImportKind::Disciplines => "Disciplines",
            ImportKind::Lectures => "Lectures",
        }
    }
}

impl fmt::Display for ImportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ImportKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "accessibility" | "acessibilidade" => Ok(ImportKind::Accessibility),
            "disciplines" | "disciplinas" => Ok(ImportKind::Disciplines),
            "lectures" | "videoaulas" => Ok(ImportKind::Lectures),
            other => Err(format!(
                "Unsupported import kind: '{}'. Supported: accessibility, disciplines, lectures",
                other
            )),
        }
    }
}

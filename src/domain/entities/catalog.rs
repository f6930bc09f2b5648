//! # Catalog Entities
//!
//! インポートパイプラインが読み書きするカタログのエンティティ
//!
//! これらのレコードの保存先はパイプラインの外側（`CatalogRepository`）にあり、
//! パイプラインはその形状にのみ依存する。

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// コース
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
    pub axis: String,
}

/// ディシプリン（自然キー: `code`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Discipline {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub credit_hours: i64,
}

/// 新規ディシプリン
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewDiscipline {
    pub code: String,
    pub name: String,
    pub credit_hours: i64,
}

/// 講師 / インストラクショナルデザイナー（自然キー: `name`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Instructor {
    pub id: i64,
    pub name: String,
}

/// オファリングの種別
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OfferingKind {
    #[default]
    Original,
    Reoffering,
}

impl OfferingKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            OfferingKind::Original => "ORIGINAL",
            OfferingKind::Reoffering => "REOFFERING",
        }
    }
}

impl fmt::Display for OfferingKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OfferingKind {
    type Err = String;

    /// 英語名と旧システムのポルトガル語名（`OFERTA` / `REOFERTA`）の両方を受け付ける
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ORIGINAL" | "OFERTA" => Ok(OfferingKind::Original),
            "REOFFERING" | "REOFERTA" => Ok(OfferingKind::Reoffering),
            other => Err(format!("unknown offering kind '{}'", other)),
        }
    }
}

/// オファリング（自然キー: `(discipline_id, year, operational_term)`）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Offering {
    pub id: i64,
    pub discipline_id: i64,
    pub year: i32,
    pub operational_term: i32,
    pub instructor_id: Option<i64>,
    pub design_instructor_id: Option<i64>,
    pub kind: OfferingKind,
}

/// 新規オファリング
///
/// 自動生成時は講師・デザイナー未割り当てで作成する
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewOffering {
    pub discipline_id: i64,
    pub year: i32,
    pub operational_term: i32,
    pub kind: OfferingKind,
}

/// 講義（ビデオ講義）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lecture {
    pub id: i64,
    pub offering_id: i64,
    pub week_number: i32,
    pub sequence_in_week: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub external_catalog_id: Option<String>,
    pub duration_minutes: Option<i32>,
    pub original_video_link: Option<String>,
    pub sign_language_link: Option<String>,
    pub audio_description_link: Option<String>,
    pub download_link: Option<String>,
    pub captions_available: bool,
    pub slides_available: bool,
    pub status: Option<String>,
}

/// 新規講義
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct NewLecture {
    pub offering_id: i64,
    pub week_number: i32,
    pub sequence_in_week: i32,
    pub title: String,
    pub synopsis: Option<String>,
    pub external_catalog_id: Option<String>,
    pub duration_minutes: Option<i32>,
    pub original_video_link: Option<String>,
    pub download_link: Option<String>,
    pub slides_available: bool,
    pub status: Option<String>,
}

/// アクセシビリティ項目の部分更新
///
/// `None` のフィールドは既存の値を維持する
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AccessibilityPatch {
    pub sign_language_link: Option<String>,
    pub audio_description_link: Option<String>,
    pub captions_available: Option<bool>,
}

impl AccessibilityPatch {
    /// 更新対象のフィールドが1つもないかどうか
    pub fn is_empty(&self) -> bool {
        self.sign_language_link.is_none()
            && self.audio_description_link.is_none()
            && self.captions_available.is_none()
    }

    /// 講義にパッチを適用する
    pub fn apply_to(&self, lecture: &mut Lecture) {
        if let Some(link) = &self.sign_language_link {
            lecture.sign_language_link = Some(link.clone());
        }
        if let Some(link) = &self.audio_description_link {
            lecture.audio_description_link = Some(link.clone());
        }
        if let Some(flag) = self.captions_available {
            lecture.captions_available = flag;
        }
    }
}

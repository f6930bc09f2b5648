//! # Candidate Row Entity
//!
//! CSVの1行から得られた、検証前の候補レコード
//!
//! 数値フィールドは空欄・解析不能な値を `0` として受け取る。
//! `0` は必須チェックで「未指定」として扱われるため、黙ってデータが失われることはない。

use super::import_kind::ImportKind;

/// アクセシビリティ行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityRow {
    pub external_catalog_id: String,
    pub sign_language_link: Option<String>,
    pub audio_description_link: Option<String>,
    /// 真偽値の生テキスト（検証時に解釈する）
    pub captions_available: Option<String>,
}

/// ディシプリン行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisciplineRow {
    pub code: String,
    pub name: Option<String>,
    pub credit_hours: i64,
    /// コースIDのリスト（`;` `|` `,` 区切り）
    pub course_refs: Option<String>,
}

/// 講義行
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct LectureRow {
    pub external_catalog_id: String,
    pub title: Option<String>,
    pub discipline_code: Option<String>,
    pub year: i32,
    pub operational_term: i32,
    pub week_number: i32,
    pub sequence_in_week: i32,
    pub synopsis: Option<String>,
    pub original_video_link: Option<String>,
    pub duration_minutes: Option<i32>,
    pub download_link: Option<String>,
    pub slides_available: Option<String>,
    pub status: Option<String>,
    pub instructor_name: Option<String>,
    pub design_instructor_name: Option<String>,
    pub offering_kind: Option<String>,
}

/// 種別ごとの候補レコード
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CandidateRecord {
    Accessibility(AccessibilityRow),
    Discipline(DisciplineRow),
    Lecture(LectureRow),
}

/// 候補行
///
/// `line` は入力ファイル上の行番号（ヘッダーを1行目とする）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateRow {
    pub line: u64,
    pub record: CandidateRecord,
}

impl CandidateRow {
    pub fn new(line: u64, record: CandidateRecord) -> Self {
        Self { line, record }
    }

    /// 行の照合キー
    pub fn natural_key(&self) -> &str {
        match &self.record {
            CandidateRecord::Accessibility(row) => &row.external_catalog_id,
            CandidateRecord::Discipline(row) => &row.code,
            CandidateRecord::Lecture(row) => &row.external_catalog_id,
        }
    }

    pub fn kind(&self) -> ImportKind {
        match &self.record {
            CandidateRecord::Accessibility(_) => ImportKind::Accessibility,
            CandidateRecord::Discipline(_) => ImportKind::Disciplines,
            CandidateRecord::Lecture(_) => ImportKind::Lectures,
        }
    }
}

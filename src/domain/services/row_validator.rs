//! # Row Validation Service
//!
//! 候補行の構造検証（必須項目、値の形式）
//!
//! ストアを参照する検証（自然キーの解決）はApplication層の `RowReconciler` が行う。

use thiserror::Error;

use super::header_aliases::LogicalField;
use crate::domain::entities::candidate_row::{
    AccessibilityRow, CandidateRecord, DisciplineRow, LectureRow,
};
use crate::domain::entities::catalog::{AccessibilityPatch, NewDiscipline, NewLecture, OfferingKind};

/// 行単位の検証エラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{0}")]
pub struct ValidationError(pub String);

impl ValidationError {
    fn missing(field: LogicalField) -> Self {
        Self(format!("missing required field '{}'", field.name()))
    }
}

/// アクセシビリティ更新
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccessibilityUpdate {
    pub external_catalog_id: String,
    pub patch: AccessibilityPatch,
}

/// ディシプリン作成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisciplineCreate {
    pub discipline: NewDiscipline,
    /// 重複を除いたコースID（入力順）
    pub course_ids: Vec<i64>,
}

/// 講義作成
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LectureCreate {
    pub external_catalog_id: String,
    pub discipline_code: String,
    pub year: i32,
    pub operational_term: i32,
    pub offering_kind: OfferingKind,
    pub instructor_name: Option<String>,
    pub design_instructor_name: Option<String>,
    pub title: String,
    pub week_number: i32,
    pub sequence_in_week: i32,
    pub synopsis: Option<String>,
    pub original_video_link: Option<String>,
    pub duration_minutes: Option<i32>,
    pub download_link: Option<String>,
    pub slides_available: bool,
    pub status: Option<String>,
}

impl LectureCreate {
    /// 解決済みのオファリングに紐づく新規講義を作る
    pub fn to_new_lecture(&self, offering_id: i64) -> NewLecture {
        NewLecture {
            offering_id,
            week_number: self.week_number,
            sequence_in_week: self.sequence_in_week,
            title: self.title.clone(),
            synopsis: self.synopsis.clone(),
            external_catalog_id: Some(self.external_catalog_id.clone()),
            duration_minutes: self.duration_minutes,
            original_video_link: self.original_video_link.clone(),
            download_link: self.download_link.clone(),
            slides_available: self.slides_available,
            status: self.status.clone(),
        }
    }
}

/// 検証済みの行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidatedRow {
    Accessibility(AccessibilityUpdate),
    Discipline(DisciplineCreate),
    Lecture(LectureCreate),
}

/// 行検証サービス
pub struct RowValidator;

impl RowValidator {
    /// 候補行を検証する
    ///
    /// # Errors
    ///
    /// 必須項目の欠落や値の形式エラーの場合に `ValidationError` を返す
    pub fn validate(record: &CandidateRecord) -> Result<ValidatedRow, ValidationError> {
        match record {
            CandidateRecord::Accessibility(row) => {
                Self::validate_accessibility(row).map(ValidatedRow::Accessibility)
            }
            CandidateRecord::Discipline(row) => {
                Self::validate_discipline(row).map(ValidatedRow::Discipline)
            }
            CandidateRecord::Lecture(row) => Self::validate_lecture(row).map(ValidatedRow::Lecture),
        }
    }

    fn validate_accessibility(row: &AccessibilityRow) -> Result<AccessibilityUpdate, ValidationError> {
        let external_catalog_id = required_text(
            Some(&row.external_catalog_id),
            LogicalField::ExternalCatalogId,
        )?;

        let captions_available = row
            .captions_available
            .as_deref()
            .map(|raw| parse_flag(raw, LogicalField::CaptionsAvailable))
            .transpose()?;

        Ok(AccessibilityUpdate {
            external_catalog_id,
            patch: AccessibilityPatch {
                sign_language_link: row.sign_language_link.clone(),
                audio_description_link: row.audio_description_link.clone(),
                captions_available,
            },
        })
    }

    fn validate_discipline(row: &DisciplineRow) -> Result<DisciplineCreate, ValidationError> {
        let code = required_text(Some(&row.code), LogicalField::Code)?;
        let name = required_text(row.name.as_ref(), LogicalField::Name)?;
        let course_ids = parse_course_ids(row.course_refs.as_deref())?;

        Ok(DisciplineCreate {
            discipline: NewDiscipline {
                code,
                name,
                credit_hours: row.credit_hours,
            },
            course_ids,
        })
    }

    fn validate_lecture(row: &LectureRow) -> Result<LectureCreate, ValidationError> {
        let external_catalog_id = required_text(
            Some(&row.external_catalog_id),
            LogicalField::ExternalCatalogId,
        )?;
        let title = required_text(row.title.as_ref(), LogicalField::Title)?;
        let discipline_code = required_text(row.discipline_code.as_ref(), LogicalField::DisciplineCode)?;

        // 空欄・解析不能な数値は 0 として読み込まれているため、ここで未指定として扱う
        let year = required_positive(row.year, LogicalField::Year)?;
        let operational_term = required_positive(row.operational_term, LogicalField::OperationalTerm)?;
        if !(1..=4).contains(&operational_term) {
            return Err(ValidationError(format!(
                "'{}' must be between 1 and 4, got {}",
                LogicalField::OperationalTerm.name(),
                operational_term
            )));
        }
        let week_number = required_positive(row.week_number, LogicalField::WeekNumber)?;
        let sequence_in_week = required_positive(row.sequence_in_week, LogicalField::SequenceInWeek)?;

        let offering_kind = match row.offering_kind.as_deref() {
            Some(raw) => raw.parse::<OfferingKind>().map_err(ValidationError)?,
            None => OfferingKind::default(),
        };

        let slides_available = row
            .slides_available
            .as_deref()
            .map(|raw| parse_flag(raw, LogicalField::SlidesAvailable))
            .transpose()?
            .unwrap_or(false);

        Ok(LectureCreate {
            external_catalog_id,
            discipline_code,
            year,
            operational_term,
            offering_kind,
            instructor_name: row.instructor_name.clone(),
            design_instructor_name: row.design_instructor_name.clone(),
            title,
            week_number,
            sequence_in_week,
            synopsis: row.synopsis.clone(),
            original_video_link: row.original_video_link.clone(),
            duration_minutes: row.duration_minutes,
            download_link: row.download_link.clone(),
            slides_available,
            status: row.status.clone(),
        })
    }
}

fn required_text(value: Option<&String>, field: LogicalField) -> Result<String, ValidationError> {
    match value {
        Some(text) if !text.trim().is_empty() => Ok(text.clone()),
        _ => Err(ValidationError::missing(field)),
    }
}

fn required_positive(value: i32, field: LogicalField) -> Result<i32, ValidationError> {
    if value > 0 {
        Ok(value)
    } else {
        Err(ValidationError::missing(field))
    }
}

/// 真偽値の列を解釈する
///
/// `true/1/sim/yes` と `false/0/não/nao/no` を受け付ける（大文字小文字は無視）
pub fn parse_flag(raw: &str, field: LogicalField) -> Result<bool, ValidationError> {
    match raw.trim().to_lowercase().as_str() {
        "true" | "1" | "sim" | "s" | "yes" | "y" => Ok(true),
        "false" | "0" | "não" | "nao" | "n" | "no" => Ok(false),
        other => Err(ValidationError(format!(
            "invalid value '{}' for '{}' (expected true/false)",
            other,
            field.name()
        ))),
    }
}

/// コースIDのリストを解釈する
fn parse_course_ids(raw: Option<&str>) -> Result<Vec<i64>, ValidationError> {
    let mut ids = Vec::new();

    for part in raw
        .unwrap_or_default()
        .split([';', '|', ','])
        .map(str::trim)
        .filter(|part| !part.is_empty())
    {
        let id = part.parse::<i64>().map_err(|_| {
            ValidationError(format!(
                "invalid course id '{}' in '{}'",
                part,
                LogicalField::CourseIds.name()
            ))
        })?;
        if !ids.contains(&id) {
            ids.push(id);
        }
    }

    if ids.is_empty() {
        return Err(ValidationError(format!(
            "at least one course reference is required in '{}'",
            LogicalField::CourseIds.name()
        )));
    }

    Ok(ids)
}

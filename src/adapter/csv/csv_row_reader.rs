//! CSV Row Reader Implementation
//!
//! RowReaderのCSV実装

use csv::{ReaderBuilder, StringRecord};
use log::{debug, warn};
use std::str::FromStr;

use crate::domain::entities::candidate_row::{
    AccessibilityRow, CandidateRecord, CandidateRow, DisciplineRow, LectureRow,
};
use crate::domain::entities::import_kind::ImportKind;
use crate::domain::repositories::row_reader::{ImportError, ParsedRows, RowReader};
use crate::domain::services::header_aliases::{key_field, HeaderMap, LogicalField};

/// CSVベースの行リーダー
///
/// 区切り文字を指定しない場合はヘッダー行から `,` と `;` を判別する
pub struct CsvRowReader {
    delimiter: Option<u8>,
}

impl CsvRowReader {
    /// 新しいリーダーを作成
    pub fn new() -> Self {
        Self { delimiter: None }
    }

    /// 区切り文字を固定したリーダーを作成
    pub fn with_delimiter(delimiter: u8) -> Self {
        Self {
            delimiter: Some(delimiter),
        }
    }

    /// ヘッダー行から区切り文字を推定する
    fn detect_delimiter(content: &[u8]) -> u8 {
        let header_line = content
            .split(|b| *b == b'\n')
            .next()
            .unwrap_or_default();
        let commas = header_line.iter().filter(|b| **b == b',').count();
        let semicolons = header_line.iter().filter(|b| **b == b';').count();

        if semicolons > commas {
            b';'
        } else {
            b','
        }
    }

    fn build_record(kind: ImportKind, key: String, cells: &RowCells<'_>) -> CandidateRecord {
        match kind {
            ImportKind::Accessibility => CandidateRecord::Accessibility(AccessibilityRow {
                external_catalog_id: key,
                sign_language_link: cells.text(LogicalField::SignLanguageLink),
                audio_description_link: cells.text(LogicalField::AudioDescriptionLink),
                captions_available: cells.text(LogicalField::CaptionsAvailable),
            }),
            ImportKind::Disciplines => CandidateRecord::Discipline(DisciplineRow {
                code: key,
                name: cells.text(LogicalField::Name),
                credit_hours: cells.number(LogicalField::CreditHours),
                course_refs: cells.text(LogicalField::CourseIds),
            }),
            ImportKind::Lectures => CandidateRecord::Lecture(LectureRow {
                external_catalog_id: key,
                title: cells.text(LogicalField::Title),
                discipline_code: cells.text(LogicalField::DisciplineCode),
                year: cells.number(LogicalField::Year),
                operational_term: cells.number(LogicalField::OperationalTerm),
                week_number: cells.number(LogicalField::WeekNumber),
                sequence_in_week: cells.number(LogicalField::SequenceInWeek),
                synopsis: cells.text(LogicalField::Synopsis),
                original_video_link: cells.text(LogicalField::OriginalVideoLink),
                duration_minutes: cells.optional_number(LogicalField::DurationMinutes),
                download_link: cells.text(LogicalField::DownloadLink),
                slides_available: cells.text(LogicalField::SlidesAvailable),
                status: cells.text(LogicalField::Status),
                instructor_name: cells.text(LogicalField::InstructorName),
                design_instructor_name: cells.text(LogicalField::DesignInstructorName),
                offering_kind: cells.text(LogicalField::OfferingKind),
            }),
        }
    }
}

impl RowReader for CsvRowReader {
    fn read_rows(&self, kind: ImportKind, content: &[u8]) -> Result<ParsedRows, ImportError> {
        let delimiter = self
            .delimiter
            .unwrap_or_else(|| Self::detect_delimiter(content));

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .flexible(true)
            .delimiter(delimiter)
            .from_reader(content);

        let headers = reader
            .headers()
            .map_err(|e| ImportError::UnreadableInput(e.to_string()))?
            .clone();

        if headers.iter().all(|h| h.trim().trim_start_matches('\u{feff}').is_empty()) {
            return Err(ImportError::MissingHeader);
        }

        let header_map = HeaderMap::resolve(kind, headers.iter());
        let key = key_field(kind);

        if !header_map.contains(key) {
            warn!(
                "No '{}' column found for {} import; every row will be dropped",
                key.name(),
                kind
            );
        }

        let mut parsed = ParsedRows {
            unrecognized_headers: header_map.unrecognized().to_vec(),
            ..Default::default()
        };

        for record in reader.records() {
            let record = record.map_err(|e| ImportError::UnreadableInput(e.to_string()))?;

            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }

            let line = record.position().map(|p| p.line()).unwrap_or_default();
            let cells = RowCells {
                map: &header_map,
                record: &record,
            };

            let Some(key_value) = cells.text(key) else {
                debug!("Dropping line {}: no '{}' value", line, key.name());
                parsed.dropped_without_key += 1;
                continue;
            };

            parsed
                .rows
                .push(CandidateRow::new(line, Self::build_record(kind, key_value, &cells)));
        }

        Ok(parsed)
    }
}

impl Default for CsvRowReader {
    fn default() -> Self {
        Self::new()
    }
}

/// 1行分のセルへのアクセサ
struct RowCells<'a> {
    map: &'a HeaderMap,
    record: &'a StringRecord,
}

impl RowCells<'_> {
    fn cell(&self, field: LogicalField) -> Option<&str> {
        self.map
            .column(field)
            .and_then(|index| self.record.get(index))
    }

    /// 空欄でなければ値をそのまま返す（値の前後の空白は変更しない）
    fn text(&self, field: LogicalField) -> Option<String> {
        self.cell(field)
            .filter(|value| !value.trim().is_empty())
            .map(str::to_string)
    }

    /// 数値に変換する（空欄・解析不能な値は 0）
    fn number<T: FromStr + Default>(&self, field: LogicalField) -> T {
        self.cell(field)
            .and_then(|value| value.trim().parse().ok())
            .unwrap_or_default()
    }

    /// 空欄なら `None`、それ以外は数値に変換する（解析不能な値は 0）
    fn optional_number<T: FromStr + Default>(&self, field: LogicalField) -> Option<T> {
        self.text(field)
            .map(|value| value.trim().parse().unwrap_or_default())
    }
}

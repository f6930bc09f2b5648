//! # Header Alias Table
//!
//! 論理フィールドと、それに対応するCSVヘッダー名の静的な対応表
//!
//! ヘッダー名の照合は大文字小文字と空白を無視する（値には適用しない）。
//! 照合はパース開始時に1回だけ行い、列番号の表に変換する。

use std::collections::HashMap;

use crate::domain::entities::import_kind::ImportKind;

/// 論理フィールド
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LogicalField {
    ExternalCatalogId,
    SignLanguageLink,
    AudioDescriptionLink,
    CaptionsAvailable,
    Title,
    DisciplineCode,
    Year,
    OperationalTerm,
    WeekNumber,
    SequenceInWeek,
    Synopsis,
    OriginalVideoLink,
    DurationMinutes,
    DownloadLink,
    SlidesAvailable,
    Status,
    InstructorName,
    DesignInstructorName,
    OfferingKind,
    Code,
    Name,
    CreditHours,
    CourseIds,
}

const ACCESSIBILITY_FIELDS: &[LogicalField] = &[
    LogicalField::ExternalCatalogId,
    LogicalField::SignLanguageLink,
    LogicalField::AudioDescriptionLink,
    LogicalField::CaptionsAvailable,
];

const DISCIPLINE_FIELDS: &[LogicalField] = &[
    LogicalField::Code,
    LogicalField::Name,
    LogicalField::CreditHours,
    LogicalField::CourseIds,
];

const LECTURE_FIELDS: &[LogicalField] = &[
    LogicalField::ExternalCatalogId,
    LogicalField::Title,
    LogicalField::DisciplineCode,
    LogicalField::Year,
    LogicalField::OperationalTerm,
    LogicalField::WeekNumber,
    LogicalField::SequenceInWeek,
    LogicalField::Synopsis,
    LogicalField::OriginalVideoLink,
    LogicalField::DurationMinutes,
    LogicalField::DownloadLink,
    LogicalField::SlidesAvailable,
    LogicalField::Status,
    LogicalField::InstructorName,
    LogicalField::DesignInstructorName,
    LogicalField::OfferingKind,
];

impl LogicalField {
    /// 受け付けるヘッダー名
    ///
    /// 先頭がテンプレートで使う正規のヘッダー名
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            LogicalField::ExternalCatalogId => &[
                "idTvCultura",
                "ID TV Cultura",
                "externalCatalogId",
                "external_catalog_id",
            ],
            LogicalField::SignLanguageLink => {
                &["linkLibras", "Link Libras", "signLanguageLink", "sign_language_link"]
            }
            LogicalField::AudioDescriptionLink => &[
                "linkAudiodescricao",
                "Link Audiodescrição",
                "Link Audiodescricao",
                "audioDescriptionLink",
                "audio_description_link",
            ],
            LogicalField::CaptionsAvailable => {
                &["ccLegenda", "CC Legenda", "captionsAvailable", "captions_available"]
            }
            LogicalField::Title => &["titulo", "Título", "title"],
            LogicalField::DisciplineCode => &[
                "codigoDisciplina",
                "Código Disciplina",
                "Codigo Disciplina",
                "disciplineCode",
                "discipline_code",
            ],
            LogicalField::Year => &["ano", "Ano", "year"],
            LogicalField::OperationalTerm => &[
                "bimestreOperacional",
                "Bimestre",
                "Bimestre Operacional",
                "operationalTerm",
                "operational_term",
            ],
            LogicalField::WeekNumber => &["semana", "Semana", "weekNumber", "week_number"],
            LogicalField::SequenceInWeek => &[
                "numeroAula",
                "Número Aula",
                "Numero Aula",
                "sequenceInWeek",
                "sequence_in_week",
            ],
            LogicalField::Synopsis => &["sinopse", "Sinopse", "synopsis"],
            LogicalField::OriginalVideoLink => &[
                "linkYoutubeOriginal",
                "Link YouTube",
                "originalVideoLink",
                "original_video_link",
            ],
            LogicalField::DurationMinutes => &[
                "duracaoMinutos",
                "Duração",
                "Duracao",
                "durationMinutes",
                "duration_minutes",
            ],
            LogicalField::DownloadLink => {
                &["linkDownload", "Link Download", "downloadLink", "download_link"]
            }
            LogicalField::SlidesAvailable => &[
                "slidesDisponivel",
                "Slides Disponível",
                "slidesAvailable",
                "slides_available",
            ],
            LogicalField::Status => &["status", "Status"],
            LogicalField::InstructorName => {
                &["professor", "Professor", "instructorName", "instructor_name"]
            }
            LogicalField::DesignInstructorName => &[
                "designerInstrucional",
                "Designer Instrucional",
                "designInstructorName",
                "design_instructor_name",
            ],
            LogicalField::OfferingKind => {
                &["tipoOferta", "Tipo Oferta", "offeringKind", "offering_kind"]
            }
            LogicalField::Code => &["codigo", "Código", "code"],
            LogicalField::Name => &["nome", "Nome", "name"],
            LogicalField::CreditHours => {
                &["cargaHoraria", "Carga Horária", "creditHours", "credit_hours"]
            }
            LogicalField::CourseIds => &["cursos", "Cursos", "courseIds", "course_ids"],
        }
    }

    /// テンプレートで使うヘッダー名
    pub fn canonical_header(&self) -> &'static str {
        self.aliases()[0]
    }

    /// エラーメッセージ用の名前
    pub fn name(&self) -> &'static str {
        match self {
            LogicalField::ExternalCatalogId => "externalCatalogId",
            LogicalField::SignLanguageLink => "signLanguageLink",
            LogicalField::AudioDescriptionLink => "audioDescriptionLink",
            LogicalField::CaptionsAvailable => "captionsAvailable",
            LogicalField::Title => "title",
            LogicalField::DisciplineCode => "disciplineCode",
            LogicalField::Year => "year",
            LogicalField::OperationalTerm => "operationalTerm",
            LogicalField::WeekNumber => "weekNumber",
            LogicalField::SequenceInWeek => "sequenceInWeek",
            LogicalField::Synopsis => "synopsis",
            LogicalField::OriginalVideoLink => "originalVideoLink",
            LogicalField::DurationMinutes => "durationMinutes",
            LogicalField::DownloadLink => "downloadLink",
            LogicalField::SlidesAvailable => "slidesAvailable",
            LogicalField::Status => "status",
            LogicalField::InstructorName => "instructorName",
            LogicalField::DesignInstructorName => "designInstructorName",
            LogicalField::OfferingKind => "offeringKind",
            LogicalField::Code => "code",
            LogicalField::Name => "name",
            LogicalField::CreditHours => "creditHours",
            LogicalField::CourseIds => "courseIds",
        }
    }
}

/// 種別ごとに受け付ける論理フィールド
pub fn fields_for(kind: ImportKind) -> &'static [LogicalField] {
    match kind {
        ImportKind::Accessibility => ACCESSIBILITY_FIELDS,
        ImportKind::Disciplines => DISCIPLINE_FIELDS,
        ImportKind::Lectures => LECTURE_FIELDS,
    }
}

/// 種別ごとの照合キー
pub fn key_field(kind: ImportKind) -> LogicalField {
    match kind {
        ImportKind::Accessibility | ImportKind::Lectures => LogicalField::ExternalCatalogId,
        ImportKind::Disciplines => LogicalField::Code,
    }
}

/// ヘッダー名を照合用に正規化する
///
/// BOMと空白をすべて取り除き、小文字にする
pub fn normalize_header(header: &str) -> String {
    header
        .trim_start_matches('\u{feff}')
        .chars()
        .filter(|c| !c.is_whitespace())
        .flat_map(char::to_lowercase)
        .collect()
}

/// 論理フィールドから列番号への対応表
#[derive(Debug, Clone, Default)]
pub struct HeaderMap {
    columns: HashMap<LogicalField, usize>,
    unrecognized: Vec<String>,
}

impl HeaderMap {
    /// ヘッダー行から対応表を作る
    ///
    /// 同じ論理フィールドに対応する列が複数ある場合は最初の列を使う
    pub fn resolve<'a>(kind: ImportKind, headers: impl IntoIterator<Item = &'a str>) -> Self {
        let lookup: HashMap<String, LogicalField> = fields_for(kind)
            .iter()
            .flat_map(|field| {
                field
                    .aliases()
                    .iter()
                    .map(move |alias| (normalize_header(alias), *field))
            })
            .collect();

        let mut map = HeaderMap::default();
        for (index, header) in headers.into_iter().enumerate() {
            match lookup.get(&normalize_header(header)) {
                Some(field) => {
                    map.columns.entry(*field).or_insert(index);
                }
                None => {
                    if !header.trim().is_empty() {
                        map.unrecognized.push(header.to_string());
                    }
                }
            }
        }
        map
    }

    pub fn column(&self, field: LogicalField) -> Option<usize> {
        self.columns.get(&field).copied()
    }

    pub fn contains(&self, field: LogicalField) -> bool {
        self.columns.contains_key(&field)
    }

    pub fn unrecognized(&self) -> &[String] {
        &self.unrecognized
    }
}

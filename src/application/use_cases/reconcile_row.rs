//! # Row Reconciliation
//!
//! 検証済みの1行について自然キーを解決し、カタログに作成・更新を適用する
//!
//! ## ポリシー
//!
//! - **accessibility**: 既存の講義を外部カタログIDで一意に特定して更新する（作成しない）
//! - **disciplines**: 作成のみ。既存コードは行エラー
//! - **lectures**: 毎回講義を作成する。オファリングがなければ担当者なしで自動作成する
//!
//! 行ごとの変更はストアが対応していれば1つのトランザクションで適用する。
//! 対応していない場合、失敗時に残った変更をメッセージに含める。

use log::{debug, warn};
use std::fmt;
use std::sync::Arc;

use crate::domain::entities::catalog::{Discipline, Instructor, NewOffering, Offering};
use crate::domain::repositories::catalog_repository::{CatalogRepository, StoreError};
use crate::domain::services::row_validator::{
    AccessibilityUpdate, DisciplineCreate, LectureCreate, ValidatedRow,
};

/// 行の処理失敗
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowFailure {
    /// この行だけのエラー（処理は続行）
    Rejected(String),
    /// ストアに到達できない（残りの行は処理しない）
    Fatal(String),
}

impl RowFailure {
    /// 文脈付きでストアエラーを変換する
    fn store(context: impl fmt::Display, error: StoreError) -> Self {
        if error.is_fatal() {
            RowFailure::Fatal(error.to_string())
        } else {
            RowFailure::Rejected(format!("{}: {}", context, error))
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RowFailure::Rejected(message) | RowFailure::Fatal(message) => message,
        }
    }

    pub fn is_fatal(&self) -> bool {
        matches!(self, RowFailure::Fatal(_))
    }

    /// 取り消せなかった変更をメッセージに追記する
    fn with_kept_changes(self, kept: &[String]) -> Self {
        if kept.is_empty() {
            return self;
        }
        let suffix = format!("; partial changes kept: {}", kept.join(", "));
        match self {
            RowFailure::Rejected(message) => RowFailure::Rejected(message + &suffix),
            RowFailure::Fatal(message) => RowFailure::Fatal(message + &suffix),
        }
    }
}

impl From<StoreError> for RowFailure {
    fn from(error: StoreError) -> Self {
        if error.is_fatal() {
            RowFailure::Fatal(error.to_string())
        } else {
            RowFailure::Rejected(error.to_string())
        }
    }
}

impl fmt::Display for RowFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.message())
    }
}

pub type RowOutcome = Result<String, RowFailure>;

/// 講義行で解決済みの担当者
struct ResolvedStaff {
    instructor: Option<Instructor>,
    design_instructor: Option<Instructor>,
}

/// 行の照合・適用を行う
pub struct RowReconciler<C: CatalogRepository> {
    catalog: Arc<C>,
    skip_existing_lectures: bool,
}

impl<C: CatalogRepository> RowReconciler<C> {
    /// # Arguments
    ///
    /// * `catalog` - カタログリポジトリ
    /// * `skip_existing_lectures` - 同じ外部カタログIDの講義がある行をエラーにする
    pub fn new(catalog: Arc<C>, skip_existing_lectures: bool) -> Self {
        Self {
            catalog,
            skip_existing_lectures,
        }
    }

    /// 1行を適用する
    ///
    /// # Returns
    ///
    /// 成功時は結果メッセージ
    ///
    /// # Errors
    ///
    /// 行エラーは `RowFailure::Rejected`、ストア到達不能は `RowFailure::Fatal`
    pub async fn reconcile(&self, row: &ValidatedRow) -> RowOutcome {
        match row {
            ValidatedRow::Accessibility(update) => self.update_accessibility(update).await,
            ValidatedRow::Discipline(create) => self.create_discipline(create).await,
            ValidatedRow::Lecture(create) => self.create_lecture(create).await,
        }
    }

    async fn update_accessibility(&self, update: &AccessibilityUpdate) -> RowOutcome {
        let id = &update.external_catalog_id;
        let matches = self.catalog.find_lectures_by_catalog_id(id).await?;

        let lecture = match matches.as_slice() {
            [] => return Err(RowFailure::Rejected(format!("no lecture found for id {}", id))),
            [lecture] => lecture,
            many => {
                return Err(RowFailure::Rejected(format!(
                    "{} lectures match id {}; nothing was updated",
                    many.len(),
                    id
                )))
            }
        };

        if update.patch.is_empty() {
            return Ok("no accessibility fields present; lecture left unchanged".to_string());
        }

        self.catalog
            .update_lecture_accessibility(lecture.id, &update.patch)
            .await
            .map_err(|e| RowFailure::store(format!("failed to update lecture {}", id), e))?;

        let mut fields = Vec::new();
        if update.patch.sign_language_link.is_some() {
            fields.push("signLanguageLink");
        }
        if update.patch.audio_description_link.is_some() {
            fields.push("audioDescriptionLink");
        }
        if update.patch.captions_available.is_some() {
            fields.push("captionsAvailable");
        }

        Ok(format!("updated {}", fields.join(", ")))
    }

    async fn create_discipline(&self, create: &DisciplineCreate) -> RowOutcome {
        let code = &create.discipline.code;

        if self.catalog.find_discipline_by_code(code).await?.is_some() {
            return Err(RowFailure::Rejected(format!(
                "discipline {} already exists",
                code
            )));
        }

        let mut unknown = Vec::new();
        for course_id in &create.course_ids {
            if self.catalog.find_course(*course_id).await?.is_none() {
                unknown.push(course_id.to_string());
            }
        }
        if !unknown.is_empty() {
            return Err(RowFailure::Rejected(format!(
                "unknown course id(s): {}",
                unknown.join(", ")
            )));
        }

        let uses_unit = self.begin().await?;
        let mut kept = Vec::new();
        let result = self.apply_discipline(create, &mut kept).await;
        self.finish(uses_unit, result, &kept).await
    }

    async fn apply_discipline(&self, create: &DisciplineCreate, kept: &mut Vec<String>) -> RowOutcome {
        let code = &create.discipline.code;

        let discipline = self
            .catalog
            .create_discipline(&create.discipline)
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    RowFailure::Rejected(format!("discipline {} already exists", code))
                }
                other => RowFailure::store(format!("failed to create discipline {}", code), other),
            })?;
        kept.push(format!("discipline {} was created", code));

        for course_id in &create.course_ids {
            self.catalog
                .link_discipline_to_course(discipline.id, *course_id)
                .await
                .map_err(|e| {
                    RowFailure::store(
                        format!("failed to link discipline {} to course {}", code, course_id),
                        e,
                    )
                })?;
            kept.push(format!("linked to course {}", course_id));
        }

        Ok(format!(
            "discipline {} created and linked to {} course(s)",
            code,
            create.course_ids.len()
        ))
    }

    async fn create_lecture(&self, create: &LectureCreate) -> RowOutcome {
        let discipline = self
            .catalog
            .find_discipline_by_code(&create.discipline_code)
            .await?
            .ok_or_else(|| {
                RowFailure::Rejected(format!("discipline {} not found", create.discipline_code))
            })?;

        // 変更を加える前に担当者を解決する
        let staff = self.resolve_staff(create).await?;

        if self.skip_existing_lectures {
            let existing = self
                .catalog
                .find_lectures_by_catalog_id(&create.external_catalog_id)
                .await?;
            if !existing.is_empty() {
                return Err(RowFailure::Rejected(format!(
                    "lecture {} already exists",
                    create.external_catalog_id
                )));
            }
        }

        let uses_unit = self.begin().await?;
        let mut kept = Vec::new();
        let result = self
            .apply_lecture(create, &discipline, &staff, &mut kept)
            .await;
        self.finish(uses_unit, result, &kept).await
    }

    async fn resolve_staff(&self, create: &LectureCreate) -> Result<ResolvedStaff, RowFailure> {
        let instructor = match &create.instructor_name {
            Some(name) => Some(
                self.catalog
                    .find_instructor_by_name(name)
                    .await?
                    .ok_or_else(|| {
                        RowFailure::Rejected(format!("instructor '{}' not found", name))
                    })?,
            ),
            None => None,
        };

        let design_instructor = match &create.design_instructor_name {
            Some(name) => Some(
                self.catalog
                    .find_design_instructor_by_name(name)
                    .await?
                    .ok_or_else(|| {
                        RowFailure::Rejected(format!("instructional designer '{}' not found", name))
                    })?,
            ),
            None => None,
        };

        Ok(ResolvedStaff {
            instructor,
            design_instructor,
        })
    }

    async fn apply_lecture(
        &self,
        create: &LectureCreate,
        discipline: &Discipline,
        staff: &ResolvedStaff,
        kept: &mut Vec<String>,
    ) -> RowOutcome {
        let offering_label = format!(
            "{} {}/{}",
            discipline.code, create.year, create.operational_term
        );

        let (offering, offering_created) = self
            .ensure_offering(create, discipline, &offering_label)
            .await?;
        if offering_created {
            kept.push(format!("offering {} was created", offering_label));
        }

        self.assign_missing_staff(&offering, staff, &offering_label, kept)
            .await?;

        let lecture = self
            .catalog
            .create_lecture(&create.to_new_lecture(offering.id))
            .await
            .map_err(|e| {
                RowFailure::store(
                    format!("failed to create lecture {}", create.external_catalog_id),
                    e,
                )
            })?;

        let mut message = format!("lecture {} created in offering {}", lecture.id, offering_label);
        if offering_created {
            message.push_str(" (offering created)");
        }
        Ok(message)
    }

    /// オファリングを取得し、なければ担当者なしで作成する
    async fn ensure_offering(
        &self,
        create: &LectureCreate,
        discipline: &Discipline,
        label: &str,
    ) -> Result<(Offering, bool), RowFailure> {
        let existing = self
            .catalog
            .find_offering(discipline.id, create.year, create.operational_term)
            .await?;
        if let Some(offering) = existing {
            return Ok((offering, false));
        }

        let new_offering = NewOffering {
            discipline_id: discipline.id,
            year: create.year,
            operational_term: create.operational_term,
            kind: create.offering_kind,
        };

        match self.catalog.create_offering(&new_offering).await {
            Ok(offering) => {
                debug!("Auto-created offering {} (id {})", label, offering.id);
                Ok((offering, true))
            }
            Err(StoreError::Conflict(_)) => Err(RowFailure::Rejected(format!(
                "offering {} was created concurrently by another import; the row can be retried",
                label
            ))),
            Err(e) => Err(RowFailure::store(
                format!("failed to create offering {}", label),
                e,
            )),
        }
    }

    /// 未割り当ての担当者だけを設定する
    async fn assign_missing_staff(
        &self,
        offering: &Offering,
        staff: &ResolvedStaff,
        label: &str,
        kept: &mut Vec<String>,
    ) -> Result<(), RowFailure> {
        let instructor_id = staff
            .instructor
            .as_ref()
            .filter(|_| offering.instructor_id.is_none())
            .map(|i| i.id);
        let design_instructor_id = staff
            .design_instructor
            .as_ref()
            .filter(|_| offering.design_instructor_id.is_none())
            .map(|i| i.id);

        if instructor_id.is_none() && design_instructor_id.is_none() {
            return Ok(());
        }

        self.catalog
            .assign_offering_staff(offering.id, instructor_id, design_instructor_id)
            .await
            .map_err(|e| RowFailure::store(format!("failed to assign staff to offering {}", label), e))?;
        kept.push(format!("staff assigned to offering {}", label));

        Ok(())
    }

    /// 行単位の作業を開始する（対応していなければ何もしない）
    async fn begin(&self) -> Result<bool, RowFailure> {
        if !self.catalog.supports_units() {
            return Ok(false);
        }
        self.catalog
            .begin_unit()
            .await
            .map_err(|e| RowFailure::store("failed to start row transaction", e))?;
        Ok(true)
    }

    /// 結果に応じて確定・取り消しを行う
    async fn finish(&self, uses_unit: bool, result: RowOutcome, kept: &[String]) -> RowOutcome {
        if !uses_unit {
            return result.map_err(|failure| failure.with_kept_changes(kept));
        }

        match result {
            Ok(message) => match self.catalog.commit_unit().await {
                Ok(()) => Ok(message),
                Err(e) => {
                    self.rollback().await;
                    Err(RowFailure::store("failed to commit row", e))
                }
            },
            Err(failure) => {
                if self.rollback().await {
                    Err(failure)
                } else {
                    Err(failure.with_kept_changes(kept))
                }
            }
        }
    }

    async fn rollback(&self) -> bool {
        match self.catalog.rollback_unit().await {
            Ok(()) => true,
            Err(e) => {
                warn!("Failed to roll back row changes: {}", e);
                false
            }
        }
    }
}

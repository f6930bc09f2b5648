//! # Catalog Repository Trait
//!
//! ディシプリン・オファリング・講義などのドメインストアを抽象化
//!
//! パイプラインはストアを所有せず、このトレイト経由で読み書きする。

use async_trait::async_trait;
use thiserror::Error;

#[cfg(test)]
use mockall::automock;

use crate::domain::entities::catalog::{
    AccessibilityPatch, Course, Discipline, Instructor, Lecture, NewDiscipline, NewLecture,
    NewOffering, Offering,
};

/// ストアのエラー
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    /// 一意制約違反（行単位のエラーとして扱う）
    #[error("uniqueness violation: {0}")]
    Conflict(String),

    /// ストアに到達できない（実行中の残り行を処理しない）
    #[error("store unavailable: {0}")]
    Unavailable(String),

    /// その他のストアエラー（行単位のエラーとして扱う）
    #[error("store error: {0}")]
    Other(String),
}

impl StoreError {
    /// 実行全体を止めるべきエラーかどうか
    pub fn is_fatal(&self) -> bool {
        matches!(self, StoreError::Unavailable(_))
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// カタログリポジトリ
///
/// 自然キーによる検索、作成、フィールド単位の更新を提供する
#[cfg_attr(test, automock)]
#[async_trait]
pub trait CatalogRepository: Send + Sync {
    /// コースをIDで検索
    async fn find_course(&self, course_id: i64) -> StoreResult<Option<Course>>;

    /// ディシプリンをコードで検索（大文字小文字を区別）
    async fn find_discipline_by_code(&self, code: &str) -> StoreResult<Option<Discipline>>;

    /// ディシプリンを作成
    ///
    /// # Errors
    ///
    /// コードが重複する場合は `StoreError::Conflict` を返す
    async fn create_discipline(&self, discipline: &NewDiscipline) -> StoreResult<Discipline>;

    /// ディシプリンをコースに関連付ける
    async fn link_discipline_to_course(&self, discipline_id: i64, course_id: i64)
        -> StoreResult<()>;

    /// 講師を名前で検索（完全一致）
    async fn find_instructor_by_name(&self, name: &str) -> StoreResult<Option<Instructor>>;

    /// インストラクショナルデザイナーを名前で検索（完全一致）
    async fn find_design_instructor_by_name(&self, name: &str)
        -> StoreResult<Option<Instructor>>;

    /// オファリングを自然キーで検索
    async fn find_offering(
        &self,
        discipline_id: i64,
        year: i32,
        operational_term: i32,
    ) -> StoreResult<Option<Offering>>;

    /// オファリングを作成
    ///
    /// # Errors
    ///
    /// `(discipline_id, year, operational_term)` が既に存在する場合は `StoreError::Conflict` を返す
    async fn create_offering(&self, offering: &NewOffering) -> StoreResult<Offering>;

    /// オファリングの担当者を更新する
    ///
    /// `None` の項目は変更しない
    async fn assign_offering_staff(
        &self,
        offering_id: i64,
        instructor_id: Option<i64>,
        design_instructor_id: Option<i64>,
    ) -> StoreResult<Offering>;

    /// 外部カタログIDに一致する講義をすべて返す
    async fn find_lectures_by_catalog_id(
        &self,
        external_catalog_id: &str,
    ) -> StoreResult<Vec<Lecture>>;

    /// 講義を作成
    async fn create_lecture(&self, lecture: &NewLecture) -> StoreResult<Lecture>;

    /// 講義のアクセシビリティ項目を部分更新
    async fn update_lecture_accessibility(
        &self,
        lecture_id: i64,
        patch: &AccessibilityPatch,
    ) -> StoreResult<Lecture>;

    /// 行単位のトランザクションに対応しているかどうか
    fn supports_units(&self) -> bool {
        false
    }

    /// 行単位の作業を開始
    async fn begin_unit(&self) -> StoreResult<()> {
        Ok(())
    }

    /// 行単位の作業を確定
    async fn commit_unit(&self) -> StoreResult<()> {
        Ok(())
    }

    /// 行単位の作業を取り消す
    async fn rollback_unit(&self) -> StoreResult<()> {
        Ok(())
    }
}

//! SQLite Catalog Repository Implementation
//!
//! CatalogRepositoryのSQLite実装
//!
//! 1つの接続を `Arc<Mutex<_>>` で共有し、トレイトの各操作は
//! `spawn_blocking` 上で実行する。行単位の作業（unit）は接続上の
//! トランザクションとして扱うため、同じリポジトリで同時に複数のインポートを
//! 実行してはならない。

use anyhow::{Context, Result};
use async_trait::async_trait;
use log::{debug, info};
use rusqlite::{params, Connection, OptionalExtension, Row, TransactionBehavior};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use super::sqlite_errors::{classify, poisoned_lock};
use crate::domain::entities::catalog::{
    AccessibilityPatch, Course, Discipline, Instructor, Lecture, NewDiscipline, NewLecture,
    NewOffering, Offering,
};
use crate::domain::repositories::catalog_repository::{CatalogRepository, StoreError, StoreResult};

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS courses (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    axis TEXT NOT NULL DEFAULT ''
);

CREATE TABLE IF NOT EXISTS disciplines (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    code TEXT NOT NULL UNIQUE,
    name TEXT NOT NULL,
    credit_hours INTEGER NOT NULL DEFAULT 0
);

CREATE TABLE IF NOT EXISTS course_disciplines (
    course_id INTEGER NOT NULL REFERENCES courses(id),
    discipline_id INTEGER NOT NULL REFERENCES disciplines(id),
    PRIMARY KEY (course_id, discipline_id)
);

CREATE TABLE IF NOT EXISTS instructors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS design_instructors (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL UNIQUE
);

CREATE TABLE IF NOT EXISTS offerings (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    discipline_id INTEGER NOT NULL REFERENCES disciplines(id),
    year INTEGER NOT NULL,
    operational_term INTEGER NOT NULL,
    instructor_id INTEGER REFERENCES instructors(id),
    design_instructor_id INTEGER REFERENCES design_instructors(id),
    kind TEXT NOT NULL DEFAULT 'ORIGINAL',
    UNIQUE (discipline_id, year, operational_term)
);

CREATE TABLE IF NOT EXISTS lectures (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    offering_id INTEGER NOT NULL REFERENCES offerings(id),
    week_number INTEGER NOT NULL,
    sequence_in_week INTEGER NOT NULL,
    title TEXT NOT NULL,
    synopsis TEXT,
    external_catalog_id TEXT,
    duration_minutes INTEGER,
    original_video_link TEXT,
    sign_language_link TEXT,
    audio_description_link TEXT,
    download_link TEXT,
    captions_available INTEGER NOT NULL DEFAULT 0,
    slides_available INTEGER NOT NULL DEFAULT 0,
    status TEXT
);

-- external_catalog_id is intentionally not unique
CREATE INDEX IF NOT EXISTS idx_lectures_external_catalog_id
    ON lectures(external_catalog_id);
"#;

const OFFERING_COLUMNS: &str =
    "id, discipline_id, year, operational_term, instructor_id, design_instructor_id, kind";

const LECTURE_COLUMNS: &str = "id, offering_id, week_number, sequence_in_week, title, synopsis, \
     external_catalog_id, duration_minutes, original_video_link, sign_language_link, \
     audio_description_link, download_link, captions_available, slides_available, status";

/// SQLiteベースのカタログリポジトリ
pub struct SqliteCatalogRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteCatalogRepository {
    /// データベースファイルを開く（存在しなければ作成）
    ///
    /// # Errors
    ///
    /// ディレクトリ作成・接続・スキーマ初期化に失敗した場合
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).context("Failed to create database directory")?;
            }
        }

        let conn = Connection::open(path)
            .with_context(|| format!("Failed to open catalog database: {}", path.display()))?;
        conn.busy_timeout(Duration::from_secs(5))
            .context("Failed to configure busy timeout")?;

        info!("Opened catalog database: {}", path.display());
        Self::with_connection(conn)
    }

    /// インメモリデータベースを開く
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory().context("Failed to open in-memory database")?;
        Self::with_connection(conn)
    }

    fn with_connection(mut conn: Connection) -> Result<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")
            .context("Failed to enable foreign keys")?;

        // スキーマ作成は書き込みロックを取ってから行う
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to lock catalog schema")?;
        tx.execute_batch(SCHEMA)
            .context("Failed to initialize catalog schema")?;
        tx.commit().context("Failed to initialize catalog schema")?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// 接続を取得して同期処理を実行する
    fn with_conn<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> StoreResult<T> {
        let conn = self.conn.lock().map_err(|_| poisoned_lock())?;
        f(&conn).map_err(classify)
    }

    /// ブロッキングスレッドで同期処理を実行する
    async fn run<T, F>(&self, f: F) -> StoreResult<T>
    where
        T: Send + 'static,
        F: FnOnce(&Connection) -> rusqlite::Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let conn = conn.lock().map_err(|_| poisoned_lock())?;
            f(&conn).map_err(classify)
        })
        .await
        .map_err(|e| StoreError::Unavailable(format!("Failed to spawn blocking task: {}", e)))?
    }

    fn admin<T>(&self, f: impl FnOnce(&Connection) -> rusqlite::Result<T>) -> Result<T> {
        self.with_conn(f).map_err(anyhow::Error::from)
    }

    /// コースを登録する
    pub fn insert_course(&self, name: &str, axis: &str) -> Result<Course> {
        let id = self
            .admin(|conn| {
                conn.execute(
                    "INSERT INTO courses (name, axis) VALUES (?1, ?2)",
                    params![name, axis],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .context("Failed to insert course")?;

        Ok(Course {
            id,
            name: name.to_string(),
            axis: axis.to_string(),
        })
    }

    /// 講師を登録する
    pub fn insert_instructor(&self, name: &str) -> Result<Instructor> {
        self.insert_person("instructors", name)
            .context("Failed to insert instructor")
    }

    /// インストラクショナルデザイナーを登録する
    pub fn insert_design_instructor(&self, name: &str) -> Result<Instructor> {
        self.insert_person("design_instructors", name)
            .context("Failed to insert design instructor")
    }

    fn insert_person(&self, table: &'static str, name: &str) -> Result<Instructor> {
        let id = self.admin(|conn| {
            conn.execute(
                &format!("INSERT INTO {} (name) VALUES (?1)", table),
                params![name],
            )?;
            Ok(conn.last_insert_rowid())
        })?;

        Ok(Instructor {
            id,
            name: name.to_string(),
        })
    }

    pub fn count_disciplines(&self) -> Result<i64> {
        self.admin(|conn| conn.query_row("SELECT COUNT(*) FROM disciplines", [], |row| row.get(0)))
    }

    pub fn count_offerings(&self) -> Result<i64> {
        self.admin(|conn| conn.query_row("SELECT COUNT(*) FROM offerings", [], |row| row.get(0)))
    }

    pub fn count_lectures(&self) -> Result<i64> {
        self.admin(|conn| conn.query_row("SELECT COUNT(*) FROM lectures", [], |row| row.get(0)))
    }

    /// ディシプリンに関連付けられたコースIDの一覧
    pub fn course_ids_for_discipline(&self, discipline_id: i64) -> Result<Vec<i64>> {
        self.admin(|conn| {
            let mut stmt = conn.prepare(
                "SELECT course_id FROM course_disciplines WHERE discipline_id = ?1 ORDER BY course_id",
            )?;
            let ids = stmt
                .query_map(params![discipline_id], |row| row.get(0))?
                .collect::<rusqlite::Result<Vec<i64>>>()?;
            Ok(ids)
        })
    }

    async fn find_person(
        &self,
        table: &'static str,
        name: &str,
    ) -> StoreResult<Option<Instructor>> {
        let name = name.to_string();
        self.run(move |conn| {
            conn.query_row(
                &format!("SELECT id, name FROM {} WHERE name = ?1", table),
                params![name],
                |row| {
                    Ok(Instructor {
                        id: row.get("id")?,
                        name: row.get("name")?,
                    })
                },
            )
            .optional()
        })
        .await
    }

    fn select_offering(conn: &Connection, offering_id: i64) -> rusqlite::Result<Offering> {
        conn.query_row(
            &format!("SELECT {} FROM offerings WHERE id = ?1", OFFERING_COLUMNS),
            params![offering_id],
            offering_from_row,
        )
    }

    fn select_lecture(conn: &Connection, lecture_id: i64) -> rusqlite::Result<Lecture> {
        conn.query_row(
            &format!("SELECT {} FROM lectures WHERE id = ?1", LECTURE_COLUMNS),
            params![lecture_id],
            lecture_from_row,
        )
    }
}

fn discipline_from_row(row: &Row<'_>) -> rusqlite::Result<Discipline> {
    Ok(Discipline {
        id: row.get("id")?,
        code: row.get("code")?,
        name: row.get("name")?,
        credit_hours: row.get("credit_hours")?,
    })
}

fn offering_from_row(row: &Row<'_>) -> rusqlite::Result<Offering> {
    let kind: String = row.get("kind")?;

    Ok(Offering {
        id: row.get("id")?,
        discipline_id: row.get("discipline_id")?,
        year: row.get("year")?,
        operational_term: row.get("operational_term")?,
        instructor_id: row.get("instructor_id")?,
        design_instructor_id: row.get("design_instructor_id")?,
        kind: kind.parse().unwrap_or_default(),
    })
}

fn lecture_from_row(row: &Row<'_>) -> rusqlite::Result<Lecture> {
    Ok(Lecture {
        id: row.get("id")?,
        offering_id: row.get("offering_id")?,
        week_number: row.get("week_number")?,
        sequence_in_week: row.get("sequence_in_week")?,
        title: row.get("title")?,
        synopsis: row.get("synopsis")?,
        external_catalog_id: row.get("external_catalog_id")?,
        duration_minutes: row.get("duration_minutes")?,
        original_video_link: row.get("original_video_link")?,
        sign_language_link: row.get("sign_language_link")?,
        audio_description_link: row.get("audio_description_link")?,
        download_link: row.get("download_link")?,
        captions_available: row.get("captions_available")?,
        slides_available: row.get("slides_available")?,
        status: row.get("status")?,
    })
}

#[async_trait]
impl CatalogRepository for SqliteCatalogRepository {
    async fn find_course(&self, course_id: i64) -> StoreResult<Option<Course>> {
        self.run(move |conn| {
            conn.query_row(
                "SELECT id, name, axis FROM courses WHERE id = ?1",
                params![course_id],
                |row| {
                    Ok(Course {
                        id: row.get("id")?,
                        name: row.get("name")?,
                        axis: row.get("axis")?,
                    })
                },
            )
            .optional()
        })
        .await
    }

    async fn find_discipline_by_code(&self, code: &str) -> StoreResult<Option<Discipline>> {
        let code = code.to_string();
        self.run(move |conn| {
            conn.query_row(
                "SELECT id, code, name, credit_hours FROM disciplines WHERE code = ?1",
                params![code],
                discipline_from_row,
            )
            .optional()
        })
        .await
    }

    async fn create_discipline(&self, discipline: &NewDiscipline) -> StoreResult<Discipline> {
        let new = discipline.clone();
        let id = self
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO disciplines (code, name, credit_hours) VALUES (?1, ?2, ?3)",
                    params![new.code, new.name, new.credit_hours],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        debug!("Created discipline {} (id {})", discipline.code, id);

        Ok(Discipline {
            id,
            code: discipline.code.clone(),
            name: discipline.name.clone(),
            credit_hours: discipline.credit_hours,
        })
    }

    async fn link_discipline_to_course(
        &self,
        discipline_id: i64,
        course_id: i64,
    ) -> StoreResult<()> {
        self.run(move |conn| {
            conn.execute(
                "INSERT OR IGNORE INTO course_disciplines (course_id, discipline_id) VALUES (?1, ?2)",
                params![course_id, discipline_id],
            )?;
            Ok(())
        })
        .await
    }

    async fn find_instructor_by_name(&self, name: &str) -> StoreResult<Option<Instructor>> {
        self.find_person("instructors", name).await
    }

    async fn find_design_instructor_by_name(
        &self,
        name: &str,
    ) -> StoreResult<Option<Instructor>> {
        self.find_person("design_instructors", name).await
    }

    async fn find_offering(
        &self,
        discipline_id: i64,
        year: i32,
        operational_term: i32,
    ) -> StoreResult<Option<Offering>> {
        self.run(move |conn| {
            conn.query_row(
                &format!(
                    "SELECT {} FROM offerings \
                     WHERE discipline_id = ?1 AND year = ?2 AND operational_term = ?3",
                    OFFERING_COLUMNS
                ),
                params![discipline_id, year, operational_term],
                offering_from_row,
            )
            .optional()
        })
        .await
    }

    async fn create_offering(&self, offering: &NewOffering) -> StoreResult<Offering> {
        let new = offering.clone();
        let id = self
            .run(move |conn| {
                conn.execute(
                    "INSERT INTO offerings (discipline_id, year, operational_term, kind) \
                     VALUES (?1, ?2, ?3, ?4)",
                    params![
                        new.discipline_id,
                        new.year,
                        new.operational_term,
                        new.kind.as_str()
                    ],
                )?;
                Ok(conn.last_insert_rowid())
            })
            .await?;
        debug!(
            "Created offering {} for discipline {} ({}/{})",
            id, offering.discipline_id, offering.year, offering.operational_term
        );

        Ok(Offering {
            id,
            discipline_id: offering.discipline_id,
            year: offering.year,
            operational_term: offering.operational_term,
            instructor_id: None,
            design_instructor_id: None,
            kind: offering.kind,
        })
    }

    async fn assign_offering_staff(
        &self,
        offering_id: i64,
        instructor_id: Option<i64>,
        design_instructor_id: Option<i64>,
    ) -> StoreResult<Offering> {
        self.run(move |conn| {
            conn.execute(
                "UPDATE offerings SET \
                 instructor_id = COALESCE(?2, instructor_id), \
                 design_instructor_id = COALESCE(?3, design_instructor_id) \
                 WHERE id = ?1",
                params![offering_id, instructor_id, design_instructor_id],
            )?;
            Self::select_offering(conn, offering_id)
        })
        .await
    }

    async fn find_lectures_by_catalog_id(
        &self,
        external_catalog_id: &str,
    ) -> StoreResult<Vec<Lecture>> {
        let external_catalog_id = external_catalog_id.to_string();
        self.run(move |conn| {
            let mut stmt = conn.prepare(&format!(
                "SELECT {} FROM lectures WHERE external_catalog_id = ?1 ORDER BY id",
                LECTURE_COLUMNS
            ))?;
            let lectures = stmt
                .query_map(params![external_catalog_id], lecture_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?;
            Ok(lectures)
        })
        .await
    }

    async fn create_lecture(&self, lecture: &NewLecture) -> StoreResult<Lecture> {
        let lecture = lecture.clone();
        self.run(move |conn| {
            conn.execute(
                "INSERT INTO lectures (offering_id, week_number, sequence_in_week, title, \
                 synopsis, external_catalog_id, duration_minutes, original_video_link, \
                 download_link, slides_available, status) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11)",
                params![
                    lecture.offering_id,
                    lecture.week_number,
                    lecture.sequence_in_week,
                    lecture.title,
                    lecture.synopsis,
                    lecture.external_catalog_id,
                    lecture.duration_minutes,
                    lecture.original_video_link,
                    lecture.download_link,
                    lecture.slides_available,
                    lecture.status
                ],
            )?;
            Self::select_lecture(conn, conn.last_insert_rowid())
        })
        .await
    }

    async fn update_lecture_accessibility(
        &self,
        lecture_id: i64,
        patch: &AccessibilityPatch,
    ) -> StoreResult<Lecture> {
        let patch = patch.clone();
        self.run(move |conn| {
            conn.execute(
                "UPDATE lectures SET \
                 sign_language_link = COALESCE(?2, sign_language_link), \
                 audio_description_link = COALESCE(?3, audio_description_link), \
                 captions_available = COALESCE(?4, captions_available) \
                 WHERE id = ?1",
                params![
                    lecture_id,
                    patch.sign_language_link,
                    patch.audio_description_link,
                    patch.captions_available
                ],
            )?;
            Self::select_lecture(conn, lecture_id)
        })
        .await
    }

    fn supports_units(&self) -> bool {
        true
    }

    async fn begin_unit(&self) -> StoreResult<()> {
        self.run(|conn| conn.execute_batch("BEGIN IMMEDIATE")).await
    }

    async fn commit_unit(&self) -> StoreResult<()> {
        self.run(|conn| conn.execute_batch("COMMIT")).await
    }

    async fn rollback_unit(&self) -> StoreResult<()> {
        self.run(|conn| {
            if conn.is_autocommit() {
                return Ok(());
            }
            conn.execute_batch("ROLLBACK")
        })
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::catalog::OfferingKind;
    use tempfile::TempDir;

    fn create_repo() -> SqliteCatalogRepository {
        SqliteCatalogRepository::open_in_memory().unwrap()
    }

    fn new_discipline(code: &str) -> NewDiscipline {
        NewDiscipline {
            code: code.to_string(),
            name: "Matemática Básica".to_string(),
            credit_hours: 80,
        }
    }

    fn new_offering(discipline_id: i64) -> NewOffering {
        NewOffering {
            discipline_id,
            year: 2025,
            operational_term: 1,
            kind: OfferingKind::Original,
        }
    }

    #[tokio::test]
    async fn test_discipline_roundtrip_and_conflict() {
        let repo = create_repo();

        let created = repo.create_discipline(&new_discipline("MAT001")).await.unwrap();
        let found = repo.find_discipline_by_code("MAT001").await.unwrap().unwrap();
        assert_eq!(created, found);

        // 大文字小文字を区別する
        assert!(repo.find_discipline_by_code("mat001").await.unwrap().is_none());

        let duplicate = repo.create_discipline(&new_discipline("MAT001")).await;
        assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_link_discipline_to_course() {
        let repo = create_repo();
        let course = repo.insert_course("Licenciatura em Matemática", "Exatas").unwrap();
        let discipline = repo.create_discipline(&new_discipline("MAT001")).await.unwrap();

        repo.link_discipline_to_course(discipline.id, course.id)
            .await
            .unwrap();
        repo.link_discipline_to_course(discipline.id, course.id)
            .await
            .unwrap();

        assert_eq!(
            repo.course_ids_for_discipline(discipline.id).unwrap(),
            vec![course.id]
        );
        assert_eq!(repo.find_course(course.id).await.unwrap(), Some(course));
        assert!(repo.find_course(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_offering_natural_key_is_unique() {
        let repo = create_repo();
        let discipline = repo.create_discipline(&new_discipline("MAT001")).await.unwrap();

        let offering = repo.create_offering(&new_offering(discipline.id)).await.unwrap();
        assert!(offering.instructor_id.is_none());
        assert!(offering.design_instructor_id.is_none());

        let found = repo
            .find_offering(discipline.id, 2025, 1)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found, offering);

        let duplicate = repo.create_offering(&new_offering(discipline.id)).await;
        assert!(matches!(duplicate, Err(StoreError::Conflict(_))));
        assert_eq!(repo.count_offerings().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_assign_offering_staff_keeps_unset_fields() {
        let repo = create_repo();
        let discipline = repo.create_discipline(&new_discipline("MAT001")).await.unwrap();
        let offering = repo.create_offering(&new_offering(discipline.id)).await.unwrap();
        let professor = repo.insert_instructor("Maria Silva").unwrap();
        let designer = repo.insert_design_instructor("João Souza").unwrap();

        let updated = repo
            .assign_offering_staff(offering.id, Some(professor.id), None)
            .await
            .unwrap();
        assert_eq!(updated.instructor_id, Some(professor.id));
        assert!(updated.design_instructor_id.is_none());

        let updated = repo
            .assign_offering_staff(offering.id, None, Some(designer.id))
            .await
            .unwrap();
        assert_eq!(updated.instructor_id, Some(professor.id));
        assert_eq!(updated.design_instructor_id, Some(designer.id));
    }

    #[tokio::test]
    async fn test_find_people_by_exact_name() {
        let repo = create_repo();
        repo.insert_instructor("Maria Silva").unwrap();

        assert!(repo.find_instructor_by_name("Maria Silva").await.unwrap().is_some());
        assert!(repo.find_instructor_by_name("maria silva").await.unwrap().is_none());
        assert!(repo
            .find_design_instructor_by_name("Maria Silva")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn test_lectures_allow_duplicate_catalog_ids() {
        let repo = create_repo();
        let discipline = repo.create_discipline(&new_discipline("MAT001")).await.unwrap();
        let offering = repo.create_offering(&new_offering(discipline.id)).await.unwrap();

        let lecture = NewLecture {
            offering_id: offering.id,
            week_number: 1,
            sequence_in_week: 1,
            title: "Introdução à Matemática".to_string(),
            external_catalog_id: Some("VA001".to_string()),
            duration_minutes: Some(45),
            slides_available: true,
            ..Default::default()
        };

        let first = repo.create_lecture(&lecture).await.unwrap();
        let second = repo.create_lecture(&lecture).await.unwrap();
        assert_ne!(first.id, second.id);
        assert!(first.slides_available);
        assert!(!first.captions_available);

        let found = repo.find_lectures_by_catalog_id("VA001").await.unwrap();
        assert_eq!(found.len(), 2);
        assert_eq!(repo.count_lectures().unwrap(), 2);
    }

    #[tokio::test]
    async fn test_update_accessibility_patch() {
        let repo = create_repo();
        let discipline = repo.create_discipline(&new_discipline("MAT001")).await.unwrap();
        let offering = repo.create_offering(&new_offering(discipline.id)).await.unwrap();
        let lecture = repo
            .create_lecture(&NewLecture {
                offering_id: offering.id,
                week_number: 1,
                sequence_in_week: 1,
                title: "Aula".to_string(),
                external_catalog_id: Some("VA001".to_string()),
                ..Default::default()
            })
            .await
            .unwrap();

        let patch = AccessibilityPatch {
            sign_language_link: Some("https://exemplo.com/libras1.mp4".to_string()),
            audio_description_link: None,
            captions_available: Some(true),
        };
        let updated = repo
            .update_lecture_accessibility(lecture.id, &patch)
            .await
            .unwrap();
        assert_eq!(
            updated.sign_language_link.as_deref(),
            Some("https://exemplo.com/libras1.mp4")
        );
        assert!(updated.captions_available);

        let patch = AccessibilityPatch {
            audio_description_link: Some("https://exemplo.com/audio1.mp4".to_string()),
            ..Default::default()
        };
        let updated = repo
            .update_lecture_accessibility(lecture.id, &patch)
            .await
            .unwrap();
        assert_eq!(
            updated.sign_language_link.as_deref(),
            Some("https://exemplo.com/libras1.mp4")
        );
        assert!(updated.audio_description_link.is_some());
        assert!(updated.captions_available);
    }

    #[tokio::test]
    async fn test_rollback_unit_discards_changes() {
        let repo = create_repo();
        assert!(repo.supports_units());

        repo.begin_unit().await.unwrap();
        repo.create_discipline(&new_discipline("MAT001")).await.unwrap();
        repo.rollback_unit().await.unwrap();
        assert_eq!(repo.count_disciplines().unwrap(), 0);

        repo.begin_unit().await.unwrap();
        repo.create_discipline(&new_discipline("MAT002")).await.unwrap();
        repo.commit_unit().await.unwrap();
        assert_eq!(repo.count_disciplines().unwrap(), 1);

        // トランザクション外のロールバックは何もしない
        repo.rollback_unit().await.unwrap();
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_shared_repository_serves_spawned_tasks() {
        let repo = Arc::new(create_repo());
        repo.create_discipline(&new_discipline("MAT001")).await.unwrap();

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let repo = Arc::clone(&repo);
                tokio::spawn(async move { repo.find_discipline_by_code("MAT001").await })
            })
            .collect();

        for task in tasks {
            let found = task.await.unwrap().unwrap();
            assert_eq!(found.map(|d| d.code).as_deref(), Some("MAT001"));
        }
    }

    #[tokio::test]
    async fn test_open_file_creates_directory() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("nested").join("catalog.db");

        {
            let repo = SqliteCatalogRepository::open(&path).unwrap();
            repo.create_discipline(&new_discipline("MAT001")).await.unwrap();
        }

        let reopened = SqliteCatalogRepository::open(&path).unwrap();
        assert_eq!(reopened.count_disciplines().unwrap(), 1);
    }
}

//! # Import Catalog Use Case
//!
//! CSVインポートのパイプライン全体を実行するユースケース
//!
//! 読み込み → 行の検証 → 照合・適用 → 結果の集計 → 履歴の記録
//!
//! 行単位のエラーでは処理を止めない。入力が読めない場合だけ実行全体が失敗し、
//! その場合は履歴を記録しない。

use log::{info, warn};
use std::sync::Arc;

use super::reconcile_row::{RowFailure, RowReconciler};
use crate::application::dto::import_config::ImportConfig;
use crate::application::dto::import_report::ImportReport;
use crate::application::dto::import_request::ImportRequest;
use crate::domain::entities::import_history::{ImportHistoryEntry, NewImportHistoryEntry};
use crate::domain::entities::import_kind::ImportKind;
use crate::domain::repositories::catalog_repository::CatalogRepository;
use crate::domain::repositories::history_repository::HistoryRepository;
use crate::domain::repositories::row_reader::{ImportError, RowReader};
use crate::domain::services::result_collector::ResultCollector;
use crate::domain::services::row_validator::RowValidator;

/// ストア到達不能で処理されなかった行のメッセージ
pub const NOT_PROCESSED_MESSAGE: &str = "not processed: store unavailable";

/// カタログインポートユースケース
pub struct ImportCatalogUseCase<R: RowReader, C: CatalogRepository, H: HistoryRepository> {
    row_reader: Arc<R>,
    reconciler: RowReconciler<C>,
    history_repository: Arc<H>,
    config: ImportConfig,
}

impl<R: RowReader, C: CatalogRepository, H: HistoryRepository> ImportCatalogUseCase<R, C, H> {
    /// 新しいユースケースを作成
    ///
    /// # Arguments
    ///
    /// * `row_reader` - 行リーダー
    /// * `catalog_repository` - カタログリポジトリ
    /// * `history_repository` - 履歴リポジトリ
    /// * `config` - インポート設定
    pub fn new(
        row_reader: Arc<R>,
        catalog_repository: Arc<C>,
        history_repository: Arc<H>,
        config: ImportConfig,
    ) -> Self {
        let reconciler = RowReconciler::new(catalog_repository, config.skip_existing_lectures);
        Self {
            row_reader,
            reconciler,
            history_repository,
            config,
        }
    }

    /// インポートを実行
    ///
    /// # Arguments
    ///
    /// * `request` - インポート要求
    ///
    /// # Returns
    ///
    /// 行ごとの結果、件数、記録された履歴エントリ
    ///
    /// # Errors
    ///
    /// 入力が区切りテキストとして読めない場合に `ImportError` を返す（履歴は記録しない）
    pub async fn execute(&self, request: ImportRequest) -> Result<ImportReport, ImportError> {
        let ImportRequest {
            kind,
            source_filename,
            actor,
            content,
        } = request;
        let actor = actor
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| self.config.default_actor.clone());

        let parsed = self
            .row_reader
            .read_rows(kind, &content)
            .inspect_err(|e| warn!("Import of {} aborted before processing: {}", source_filename, e))?;

        info!(
            "Starting {} import of {} by {} ({} rows, {} without key)",
            kind,
            source_filename,
            actor,
            parsed.rows.len(),
            parsed.dropped_without_key
        );
        if !parsed.unrecognized_headers.is_empty() {
            info!(
                "Ignoring unrecognized columns: {}",
                parsed.unrecognized_headers.join(", ")
            );
        }

        let mut collector = ResultCollector::new();
        let mut aborted: Option<String> = None;

        for row in &parsed.rows {
            let key = row.natural_key();

            if aborted.is_some() {
                collector.error(row.line, key, NOT_PROCESSED_MESSAGE);
                continue;
            }

            let validated = match RowValidator::validate(&row.record) {
                Ok(validated) => validated,
                Err(e) => {
                    warn!("Line {} ({}): {}", row.line, key, e);
                    collector.error(row.line, key, e.to_string());
                    continue;
                }
            };

            match self.reconciler.reconcile(&validated).await {
                Ok(message) => collector.success(row.line, key, message),
                Err(RowFailure::Rejected(message)) => {
                    warn!("Line {} ({}): {}", row.line, key, message);
                    collector.error(row.line, key, message);
                }
                Err(RowFailure::Fatal(message)) => {
                    warn!(
                        "Line {} ({}): {}; remaining rows will not be processed",
                        row.line, key, message
                    );
                    collector.error(row.line, key, message.clone());
                    aborted = Some(message);
                }
            }
        }

        let tally = collector.tally();
        let (history_entry, audit_warning) = self
            .record_history(kind, &source_filename, &actor, &collector)
            .await;

        info!(
            "Finished {} import of {}: {} rows, {} succeeded, {} failed",
            kind, source_filename, tally.total, tally.success, tally.error
        );

        Ok(ImportReport {
            kind,
            source_filename,
            actor,
            results: collector.into_results(),
            tally,
            dropped_without_key: parsed.dropped_without_key,
            history_entry,
            audit_warning,
            aborted,
        })
    }

    /// 履歴を1件記録する（失敗しても警告のみ）
    async fn record_history(
        &self,
        kind: ImportKind,
        source_filename: &str,
        actor: &str,
        collector: &ResultCollector,
    ) -> (Option<ImportHistoryEntry>, Option<String>) {
        let tally = collector.tally();
        let entry = NewImportHistoryEntry::new(
            kind,
            source_filename.to_string(),
            actor.to_string(),
            tally.total,
            tally.success,
            tally.error,
        );

        let result = match entry {
            Ok(entry) => self.history_repository.append(entry).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(recorded) => (Some(recorded), None),
            Err(e) => {
                let message = format!("failed to record import history: {:#}", e);
                warn!("{}", message);
                (None, Some(message))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::in_memory_catalog::InMemoryCatalog;
    use crate::domain::entities::candidate_row::{
        AccessibilityRow, CandidateRecord, CandidateRow, LectureRow,
    };
    use crate::domain::entities::row_result::RowStatus;
    use crate::domain::repositories::catalog_repository::{MockCatalogRepository, StoreError};
    use crate::domain::repositories::history_repository::MockHistoryRepository;
    use crate::domain::repositories::row_reader::ParsedRows;
    use anyhow::Result;
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    // Mock RowReader
    struct StaticRowReader {
        parsed: ParsedRows,
    }

    impl RowReader for StaticRowReader {
        fn read_rows(&self, _kind: ImportKind, _content: &[u8]) -> Result<ParsedRows, ImportError> {
            Ok(self.parsed.clone())
        }
    }

    struct UnreadableRowReader;

    impl RowReader for UnreadableRowReader {
        fn read_rows(&self, _kind: ImportKind, _content: &[u8]) -> Result<ParsedRows, ImportError> {
            Err(ImportError::UnreadableInput("invalid utf-8".to_string()))
        }
    }

    // Mock HistoryRepository
    #[derive(Default)]
    struct RecordingHistory {
        entries: Mutex<Vec<ImportHistoryEntry>>,
    }

    #[async_trait]
    impl HistoryRepository for RecordingHistory {
        async fn append(&self, entry: NewImportHistoryEntry) -> Result<ImportHistoryEntry> {
            let mut entries = self.entries.lock().unwrap();
            let recorded =
                ImportHistoryEntry::record(entry, format!("entry-{}", entries.len()), Utc::now());
            entries.push(recorded.clone());
            Ok(recorded)
        }

        async fn list_newest_first(&self) -> Result<Vec<ImportHistoryEntry>> {
            let mut entries = self.entries.lock().unwrap().clone();
            entries.reverse();
            Ok(entries)
        }
    }

    fn accessibility_row(line: u64, id: &str, link: &str) -> CandidateRow {
        CandidateRow::new(
            line,
            CandidateRecord::Accessibility(AccessibilityRow {
                external_catalog_id: id.to_string(),
                sign_language_link: Some(link.to_string()),
                audio_description_link: None,
                captions_available: Some("true".to_string()),
            }),
        )
    }

    fn lecture_row(line: u64, id: &str, code: &str) -> CandidateRow {
        CandidateRow::new(
            line,
            CandidateRecord::Lecture(LectureRow {
                external_catalog_id: id.to_string(),
                title: Some(format!("Aula {}", id)),
                discipline_code: Some(code.to_string()),
                year: 2025,
                operational_term: 1,
                week_number: 1,
                sequence_in_week: 1,
                ..Default::default()
            }),
        )
    }

    fn reader(rows: Vec<CandidateRow>) -> Arc<StaticRowReader> {
        Arc::new(StaticRowReader {
            parsed: ParsedRows {
                rows,
                ..Default::default()
            },
        })
    }

    fn request(kind: ImportKind) -> ImportRequest {
        ImportRequest::new(kind, "import.csv", Vec::new()).with_actor("coordenacao")
    }

    fn seeded_catalog() -> Arc<InMemoryCatalog> {
        let catalog = Arc::new(InMemoryCatalog::new());
        let d = catalog.add_discipline("MAT001");
        let o = catalog.add_offering(d.id, 2025, 1);
        catalog.add_lecture(o.id, "VA001");
        catalog.add_lecture(o.id, "VA003");
        catalog
    }

    #[tokio::test]
    async fn test_accessibility_run_with_unknown_row() {
        let catalog = seeded_catalog();
        let history = Arc::new(RecordingHistory::default());
        let use_case = ImportCatalogUseCase::new(
            reader(vec![
                accessibility_row(2, "VA001", "https://exemplo.com/l1.mp4"),
                accessibility_row(3, "VA002", "https://exemplo.com/l2.mp4"),
                accessibility_row(4, "VA003", "https://exemplo.com/l3.mp4"),
            ]),
            catalog.clone(),
            history.clone(),
            ImportConfig::default(),
        );

        let report = use_case.execute(request(ImportKind::Accessibility)).await.unwrap();

        let statuses: Vec<_> = report.results.iter().map(|r| r.status).collect();
        assert_eq!(
            statuses,
            vec![RowStatus::Success, RowStatus::Error, RowStatus::Success]
        );
        assert_eq!(report.results[1].message, "no lecture found for id VA002");
        assert_eq!(report.tally.total, 3);
        assert_eq!(report.tally.success, 2);
        assert_eq!(report.tally.error, 1);

        let entry = report.history_entry.unwrap();
        assert_eq!(entry.total_rows, 3);
        assert_eq!(entry.success_count, 2);
        assert_eq!(entry.error_count, 1);
        assert_eq!(entry.actor, "coordenacao");
        assert_eq!(history.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_validation_errors_continue_batch() {
        let catalog = seeded_catalog();
        let history = Arc::new(RecordingHistory::default());
        let mut invalid = lecture_row(3, "VA011", "MAT001");
        if let CandidateRecord::Lecture(row) = &mut invalid.record {
            row.title = None;
        }
        let use_case = ImportCatalogUseCase::new(
            reader(vec![
                lecture_row(2, "VA010", "MAT001"),
                invalid,
                lecture_row(4, "VA012", "MAT001"),
            ]),
            catalog.clone(),
            history,
            ImportConfig::default(),
        );

        let report = use_case.execute(request(ImportKind::Lectures)).await.unwrap();

        assert_eq!(report.tally.success, 2);
        assert_eq!(report.results[1].message, "missing required field 'title'");
        assert_eq!(catalog.lectures().len(), 4);
    }

    #[tokio::test]
    async fn test_unreadable_input_records_nothing() {
        let history = Arc::new(RecordingHistory::default());
        let use_case = ImportCatalogUseCase::new(
            Arc::new(UnreadableRowReader),
            Arc::new(InMemoryCatalog::new()),
            history.clone(),
            ImportConfig::default(),
        );

        let result = use_case.execute(request(ImportKind::Accessibility)).await;

        assert!(matches!(result, Err(ImportError::UnreadableInput(_))));
        assert!(history.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_empty_file_is_audited() {
        let history = Arc::new(RecordingHistory::default());
        let use_case = ImportCatalogUseCase::new(
            reader(vec![]),
            Arc::new(InMemoryCatalog::new()),
            history.clone(),
            ImportConfig::default(),
        );

        let report = use_case.execute(request(ImportKind::Disciplines)).await.unwrap();

        assert!(report.results.is_empty());
        assert_eq!(report.history_entry.unwrap().total_rows, 0);
    }

    #[tokio::test]
    async fn test_default_actor_used_when_missing() {
        let history = Arc::new(RecordingHistory::default());
        let use_case = ImportCatalogUseCase::new(
            reader(vec![]),
            Arc::new(InMemoryCatalog::new()),
            history,
            ImportConfig::new("secretaria".to_string(), false),
        );

        let report = use_case
            .execute(ImportRequest::new(ImportKind::Lectures, "aulas.csv", Vec::new()))
            .await
            .unwrap();

        assert_eq!(report.actor, "secretaria");
    }

    #[tokio::test]
    async fn test_audit_failure_is_warning_only() {
        let catalog = seeded_catalog();
        let mut history = MockHistoryRepository::new();
        history
            .expect_append()
            .times(1)
            .returning(|_| Err(anyhow::anyhow!("disk full")));

        let use_case = ImportCatalogUseCase::new(
            reader(vec![accessibility_row(2, "VA001", "https://exemplo.com/l1.mp4")]),
            catalog.clone(),
            Arc::new(history),
            ImportConfig::default(),
        );

        let report = use_case.execute(request(ImportKind::Accessibility)).await.unwrap();

        assert!(report.history_entry.is_none());
        assert!(report.audit_warning.unwrap().contains("disk full"));
        // 行の変更は取り消されない
        assert_eq!(report.tally.success, 1);
        assert!(catalog.lectures()[0].sign_language_link.is_some());
    }

    #[tokio::test]
    async fn test_store_unavailable_marks_remaining_rows() {
        let mut catalog = MockCatalogRepository::new();
        let mut calls = 0;
        catalog
            .expect_find_lectures_by_catalog_id()
            .times(2)
            .returning(move |_| {
                calls += 1;
                if calls == 1 {
                    Ok(vec![])
                } else {
                    Err(StoreError::Unavailable("unable to open database file".to_string()))
                }
            });
        let history = Arc::new(RecordingHistory::default());

        let use_case = ImportCatalogUseCase::new(
            reader(vec![
                accessibility_row(2, "VA001", "a"),
                accessibility_row(3, "VA002", "b"),
                accessibility_row(4, "VA003", "c"),
                accessibility_row(5, "VA004", "d"),
            ]),
            Arc::new(catalog),
            history.clone(),
            ImportConfig::default(),
        );

        let report = use_case.execute(request(ImportKind::Accessibility)).await.unwrap();

        assert!(report.is_aborted());
        assert_eq!(report.tally.total, 4);
        assert_eq!(report.tally.error, 4);
        assert_eq!(report.results[0].message, "no lecture found for id VA001");
        assert!(report.results[1].message.starts_with("store unavailable"));
        assert_eq!(report.results[2].message, NOT_PROCESSED_MESSAGE);
        assert_eq!(report.results[3].message, NOT_PROCESSED_MESSAGE);

        // 中断した実行も記録される
        let entries = history.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].error_count, 4);
    }

    #[tokio::test]
    async fn test_result_count_matches_keyed_rows() {
        let catalog = seeded_catalog();
        let history = Arc::new(RecordingHistory::default());
        let use_case = ImportCatalogUseCase::new(
            Arc::new(StaticRowReader {
                parsed: ParsedRows {
                    rows: vec![
                        accessibility_row(2, "VA001", "x"),
                        accessibility_row(4, "VA003", "y"),
                    ],
                    dropped_without_key: 3,
                    unrecognized_headers: vec!["observacao".to_string()],
                },
            }),
            catalog,
            history,
            ImportConfig::default(),
        );

        let report = use_case.execute(request(ImportKind::Accessibility)).await.unwrap();

        assert_eq!(report.results.len(), 2);
        assert_eq!(report.dropped_without_key, 3);
        let lines: Vec<_> = report.results.iter().map(|r| r.line).collect();
        assert_eq!(lines, vec![2, 4]);
    }
}

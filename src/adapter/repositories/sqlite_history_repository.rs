//! SQLite History Repository Implementation
//!
//! HistoryRepositoryのSQLite実装
//!
//! 履歴はカタログDBの `import_history` テーブルに1行ずつ追記する。
//! 追記は1回の `INSERT` なので、別プロセスや別インスタンスから同時に
//! 実行しても他のエントリを上書きしない。

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, SecondsFormat, Utc};
use log::{debug, info};
use rusqlite::types::Type;
use rusqlite::{params, Connection, Row, TransactionBehavior};
use std::fs;
use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use uuid::Uuid;

use crate::domain::entities::import_history::{ImportHistoryEntry, NewImportHistoryEntry};
use crate::domain::entities::import_kind::ImportKind;
use crate::domain::repositories::history_repository::HistoryRepository;

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS import_history (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    id TEXT NOT NULL UNIQUE,
    kind TEXT NOT NULL,
    source_filename TEXT NOT NULL,
    actor TEXT NOT NULL,
    total_rows INTEGER NOT NULL,
    success_count INTEGER NOT NULL,
    error_count INTEGER NOT NULL,
    created_at TEXT NOT NULL,
    CHECK (success_count + error_count = total_rows)
);

CREATE INDEX IF NOT EXISTS idx_import_history_created_at
    ON import_history(created_at);
"#;

/// SQLiteベースの履歴リポジトリ（追記のみ）
pub struct SqliteHistoryRepository {
    conn: Arc<Mutex<Connection>>,
}

impl SqliteHistoryRepository {
    /// データベースファイルを開く（存在しなければ作成）
    ///
    /// # Arguments
    ///
    /// * `path` - カタログDBのパス（カタログと同じファイルを共有する）
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

        let mut conn = Connection::open(path)
            .with_context(|| format!("Failed to open history database: {}", path.display()))?;
        conn.busy_timeout(Duration::from_secs(5))
            .context("Failed to configure busy timeout")?;

        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to lock history schema")?;
        tx.execute_batch(SCHEMA)
            .context("Failed to initialize history schema")?;
        tx.commit().context("Failed to initialize history schema")?;

        debug!("Opened import history: {}", path.display());
        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    /// エントリを1行追記する（同期処理）
    fn insert_sync(conn: &mut Connection, entry: &ImportHistoryEntry) -> Result<()> {
        let tx = conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .context("Failed to lock import history")?;
        tx.execute(
            "INSERT INTO import_history \
             (id, kind, source_filename, actor, total_rows, success_count, error_count, created_at) \
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                entry.id,
                entry.kind.as_str(),
                entry.source_filename,
                entry.actor,
                entry.total_rows as i64,
                entry.success_count as i64,
                entry.error_count as i64,
                format_timestamp(&entry.created_at)
            ],
        )
        .context("Failed to insert import history entry")?;
        tx.commit().context("Failed to commit import history entry")?;

        Ok(())
    }

    /// 新しい順に読み込む（同期処理）
    ///
    /// 同時刻なら後に追記されたものが先
    fn load_newest_first_sync(conn: &Connection) -> Result<Vec<ImportHistoryEntry>> {
        let mut stmt = conn
            .prepare(
                "SELECT id, kind, source_filename, actor, total_rows, success_count, \
                 error_count, created_at FROM import_history \
                 ORDER BY created_at DESC, seq DESC",
            )
            .context("Failed to query import history")?;

        let entries = stmt
            .query_map([], entry_from_row)
            .context("Failed to query import history")?
            .collect::<rusqlite::Result<Vec<_>>>()
            .context("Failed to read import history")?;

        Ok(entries)
    }

    async fn run_blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&mut Connection) -> Result<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        tokio::task::spawn_blocking(move || {
            let mut conn = conn
                .lock()
                .map_err(|_| anyhow::anyhow!("History connection lock poisoned"))?;
            f(&mut *conn)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Failed to spawn blocking task: {}", e))?
    }
}

/// 文字列比較で時刻順になる固定幅のRFC 3339
fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

fn conversion_error(
    index: usize,
    error: impl Into<Box<dyn std::error::Error + Send + Sync>>,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(index, Type::Text, error.into())
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<ImportHistoryEntry> {
    let kind: String = row.get("kind")?;
    let created_at: String = row.get("created_at")?;
    let total_rows: i64 = row.get("total_rows")?;
    let success_count: i64 = row.get("success_count")?;
    let error_count: i64 = row.get("error_count")?;

    Ok(ImportHistoryEntry {
        id: row.get("id")?,
        kind: kind.parse::<ImportKind>().map_err(|e| conversion_error(1, e))?,
        source_filename: row.get("source_filename")?,
        actor: row.get("actor")?,
        total_rows: total_rows as usize,
        success_count: success_count as usize,
        error_count: error_count as usize,
        created_at: DateTime::parse_from_rfc3339(&created_at)
            .map_err(|e| conversion_error(7, e))?
            .with_timezone(&Utc),
    })
}

#[async_trait]
impl HistoryRepository for SqliteHistoryRepository {
    async fn append(&self, entry: NewImportHistoryEntry) -> Result<ImportHistoryEntry> {
        let recorded = ImportHistoryEntry::record(entry, Uuid::new_v4().to_string(), Utc::now());

        let to_insert = recorded.clone();
        self.run_blocking(move |conn| Self::insert_sync(conn, &to_insert))
            .await?;

        info!(
            "Recorded import history {} ({} rows, {} errors)",
            recorded.id, recorded.total_rows, recorded.error_count
        );
        Ok(recorded)
    }

    async fn list_newest_first(&self) -> Result<Vec<ImportHistoryEntry>> {
        self.run_blocking(|conn| Self::load_newest_first_sync(conn))
            .await
    }
}

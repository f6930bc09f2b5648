//! Workflow Orchestration
//!
//! サブコマンドごとに依存性を組み立てて実行する

use anyhow::{Context, Result};
use log::info;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::adapter::config::Config;
use crate::adapter::csv::csv_row_reader::CsvRowReader;
use crate::adapter::repositories::sqlite_catalog_repository::SqliteCatalogRepository;
use crate::adapter::repositories::sqlite_history_repository::SqliteHistoryRepository;
use crate::application::dto::import_report::ImportReport;
use crate::application::dto::import_request::ImportRequest;
use crate::application::use_cases::generate_template::TemplateGenerator;
use crate::application::use_cases::import_catalog::ImportCatalogUseCase;
use crate::application::use_cases::list_history::ListHistoryUseCase;
use crate::domain::entities::import_history::ImportHistoryEntry;
use crate::domain::entities::import_kind::ImportKind;
use crate::domain::entities::row_result::RowStatus;

use super::cli::{Args, Command};

/// Source filename recorded in the history (file name without directories)
pub fn source_filename(path: &str) -> String {
    Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| path.to_string())
}

/// Format a success rate for display
pub fn format_success_rate(entry: &ImportHistoryEntry) -> String {
    format!("{:.1}%", entry.success_rate() * 100.0)
}

/// Catalog Import Workflow
pub struct CatalogImportWorkflow {
    config: Config,
}

impl CatalogImportWorkflow {
    /// Create a new workflow instance with injected configuration
    pub fn new(config: Config) -> Self {
        Self { config }
    }

    /// Execute the selected subcommand
    pub async fn execute(&self, args: Args) -> Result<()> {
        match args.command {
            Command::Import {
                kind,
                file,
                actor,
                json,
            } => {
                let report = self.run_import(kind, &file, actor).await?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&report)
                            .context("Failed to serialize import report")?
                    );
                } else {
                    print_report(&report);
                }

                if let Some(reason) = &report.aborted {
                    anyhow::bail!("Import aborted: {}", reason);
                }
                Ok(())
            }
            Command::Template { kind, output } => self.run_template(kind, output.as_deref()),
            Command::History { limit, json } => {
                let entries = self.run_history(limit).await?;
                if json {
                    println!(
                        "{}",
                        serde_json::to_string_pretty(&entries)
                            .context("Failed to serialize import history")?
                    );
                } else {
                    print_history(&entries);
                }
                Ok(())
            }
        }
    }

    /// Run one import against the configured catalog and history
    pub async fn run_import(
        &self,
        kind: ImportKind,
        file: &str,
        actor: Option<String>,
    ) -> Result<ImportReport> {
        info!("Starting {} import from {}", kind, file);

        let content = fs::read(file).with_context(|| format!("Failed to read {}", file))?;

        let database_path = self.config.database_path();
        let catalog = Arc::new(SqliteCatalogRepository::open(&database_path)?);
        println!("✓ Opened catalog: {}", database_path.display());

        let history = Arc::new(SqliteHistoryRepository::open(&database_path)?);

        let use_case = ImportCatalogUseCase::new(
            Arc::new(CsvRowReader::new()),
            catalog,
            history,
            self.config.import_config(),
        );

        let mut request = ImportRequest::new(kind, source_filename(file), content);
        if let Some(actor) = actor {
            request = request.with_actor(actor);
        }

        let report = use_case.execute(request).await.map_err(|e| {
            println!("✗ Import failed: {}", e);
            anyhow::Error::new(e).context(format!("Failed to import {}", file))
        })?;

        Ok(report)
    }

    /// Write (or print) the CSV template for a kind
    pub fn run_template(&self, kind: ImportKind, output: Option<&str>) -> Result<()> {
        let content = TemplateGenerator::content(kind);

        match output {
            Some(path) => {
                fs::write(path, content)
                    .with_context(|| format!("Failed to write template to {}", path))?;
                println!("✓ Wrote {} template to {}", kind, path);
                println!(
                    "  Suggested file name: {}",
                    TemplateGenerator::file_name(kind)
                );
            }
            None => print!("{}", content),
        }

        Ok(())
    }

    /// Load the history, newest first
    pub async fn run_history(&self, limit: Option<usize>) -> Result<Vec<ImportHistoryEntry>> {
        let history = Arc::new(SqliteHistoryRepository::open(self.config.database_path())?);
        ListHistoryUseCase::new(history).execute(limit).await
    }
}

fn print_report(report: &ImportReport) {
    println!(
        "✓ Processed {} rows from {} ({})",
        report.tally.total, report.source_filename, report.kind
    );
    if report.dropped_without_key > 0 {
        println!(
            "  Skipped {} rows without a key value",
            report.dropped_without_key
        );
    }

    for result in &report.results {
        let mark = match result.status {
            RowStatus::Success => "✓",
            RowStatus::Error => "✗",
        };
        println!(
            "  {} line {} [{}] {}",
            mark, result.line, result.natural_key, result.message
        );
    }

    println!(
        "✓ Import complete: {} succeeded, {} failed",
        report.tally.success, report.tally.error
    );

    if let Some(entry) = &report.history_entry {
        println!("✓ Recorded import history {}", entry.id);
    }
    if let Some(warning) = &report.audit_warning {
        println!("⚠ {}", warning);
    }
    if let Some(reason) = &report.aborted {
        println!("✗ Store became unavailable: {}", reason);
    }
}

fn print_history(entries: &[ImportHistoryEntry]) {
    if entries.is_empty() {
        println!("No imports recorded yet.");
        return;
    }

    for entry in entries {
        let mark = if entry.has_errors() { "⚠" } else { "✓" };
        println!(
            "{} {} {} {} by {}: {}/{} succeeded ({})",
            mark,
            entry.created_at.format("%Y-%m-%d %H:%M:%S"),
            entry.kind.label(),
            entry.source_filename,
            entry.actor,
            entry.success_count,
            entry.total_rows,
            format_success_rate(entry)
        );
    }
}

//! Lecturesync - Lecture Catalog CSV Importer
//!
//! 講義カタログのCSVをインポートし、履歴を記録する

// coverage_nightly cfg が設定されている場合のみ coverage_attribute を有効化
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

use anyhow::Result;
use clap::Parser;

use lecturesync::adapter::config::Config;
use lecturesync::driver::{Args, CatalogImportWorkflow};

#[cfg_attr(coverage_nightly, coverage(off))]
#[tokio::main]
async fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();

    // Load configuration (defaults when the file does not exist)
    let config = Config::load_or_default(&args.config)?;

    // Create workflow with injected configuration
    let workflow = CatalogImportWorkflow::new(config);

    workflow.execute(args).await
}

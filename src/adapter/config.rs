//! Configuration
//!
//! JSON設定ファイルの読み込み

use anyhow::{Context, Result};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::application::dto::import_config::ImportConfig;

pub const DEFAULT_CONFIG_PATH: &str = "./.lecturesync/config.json";

fn default_database_path() -> String {
    "./.lecturesync/catalog.db".to_string()
}

fn default_actor() -> String {
    "admin".to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Config {
    /// カタログDB（SQLite）のパス
    ///
    /// インポート履歴も同じDBの `import_history` テーブルに記録する
    #[serde(default = "default_database_path")]
    pub database_path: String,

    /// `--actor` 未指定時の実行ユーザー
    #[serde(default = "default_actor")]
    pub default_actor: String,

    /// 既存の講義（同じ外部カタログID）をエラーとしてスキップする
    #[serde(default)]
    pub skip_existing_lectures: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            database_path: default_database_path(),
            default_actor: default_actor(),
            skip_existing_lectures: false,
        }
    }
}

impl Config {
    pub fn load(path: &str) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path))?;
        let config: Config =
            serde_json::from_str(&content).context("Failed to parse config JSON")?;
        Ok(config)
    }

    /// 設定ファイルがなければ既定値を使う
    pub fn load_or_default(path: &str) -> Result<Self> {
        if !Path::new(path).exists() {
            info!("No config file at {}, using defaults", path);
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn database_path(&self) -> PathBuf {
        expand_path(&self.database_path)
    }

    pub fn import_config(&self) -> ImportConfig {
        ImportConfig::new(self.default_actor.clone(), self.skip_existing_lectures)
    }
}

/// `~` と環境変数を展開する（展開できない場合はそのまま）
pub fn expand_path(path: &str) -> PathBuf {
    match shellexpand::full(path) {
        Ok(expanded) => PathBuf::from(expanded.as_ref()),
        Err(_) => PathBuf::from(shellexpand::tilde(path).as_ref()),
    }
}

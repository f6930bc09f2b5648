//! # Import Configuration DTO
//!
//! インポート設定のData Transfer Object

/// インポート設定
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportConfig {
    /// 実行ユーザーが指定されなかった場合に履歴へ記録する名前
    pub default_actor: String,
    /// 講義インポートで、同じ外部カタログIDの講義が既に存在する行をエラーにする
    ///
    /// 無効（既定）の場合、同じファイルを再インポートすると講義が重複して作成される
    pub skip_existing_lectures: bool,
}

impl ImportConfig {
    /// 新しいインポート設定を作成します。
    ///
    /// # 例
    ///
    /// ```
    /// use lecturesync::application::dto::import_config::ImportConfig;
    ///
    /// let config = ImportConfig::new("coordenacao".to_string(), false);
    ///
    /// assert_eq!(config.default_actor, "coordenacao");
    /// assert!(!config.skip_existing_lectures);
    /// ```
    pub fn new(default_actor: String, skip_existing_lectures: bool) -> Self {
        Self {
            default_actor,
            skip_existing_lectures,
        }
    }
}

impl Default for ImportConfig {
    fn default() -> Self {
        Self::new("admin".to_string(), false)
    }
}

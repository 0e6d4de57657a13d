use crate::error::{ImageSearchError, Result};
use image_search_common::POLL_ATTEMPT_LIMIT;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub backend_url: String,
    pub default_model_id: Option<String>,
    /// ポーリング試行回数の上限（1秒間隔）
    pub poll_limit: u32,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            backend_url: "http://localhost:8000".into(),
            default_model_id: None,
            poll_limit: POLL_ATTEMPT_LIMIT,
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            let content = std::fs::read_to_string(&config_path)?;
            let config: Config = serde_json::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let config_path = Self::config_path()?;

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(&config_path, content)?;
        Ok(())
    }

    pub fn config_path() -> Result<PathBuf> {
        let home = dirs::home_dir()
            .ok_or_else(|| ImageSearchError::Config("ホームディレクトリが見つかりません".into()))?;
        Ok(home.join(".config").join("image-search").join("config.json"))
    }

    pub fn set_backend_url(&mut self, url: String) -> Result<()> {
        self.backend_url = url;
        self.save()
    }

    pub fn set_default_model(&mut self, model_id: String) -> Result<()> {
        self.default_model_id = Some(model_id);
        self.save()
    }
}

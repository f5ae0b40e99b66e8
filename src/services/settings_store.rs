//! 设置存储 - 业务能力层
//!
//! 只负责"读写用户设置"能力：控制面初始化时读取，
//! 每次成功提交后写回。文件缺失或损坏时回退默认值，不算错误

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, warn};

use crate::models::UserSettings;

/// 设置存储
pub struct SettingsStore {
    path: PathBuf,
}

impl SettingsStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// 读取设置
    ///
    /// 文件不存在或解析失败都回退到默认值（首次运行是常态，不报错）
    pub async fn load(&self) -> UserSettings {
        match fs::read_to_string(&self.path).await {
            Ok(content) => match toml::from_str(&content) {
                Ok(settings) => {
                    debug!("已加载用户设置: {}", self.path.display());
                    settings
                }
                Err(e) => {
                    warn!("设置文件解析失败 ({}), 使用默认值: {}", self.path.display(), e);
                    UserSettings::default()
                }
            },
            Err(_) => {
                debug!("设置文件不存在，使用默认值: {}", self.path.display());
                UserSettings::default()
            }
        }
    }

    /// 写回设置
    pub async fn save(&self, settings: &UserSettings) -> Result<()> {
        let content = toml::to_string_pretty(settings)
            .with_context(|| format!("无法序列化设置: {:?}", settings))?;
        fs::write(&self.path, content)
            .await
            .with_context(|| format!("无法写入设置文件: {}", self.path.display()))?;
        debug!("已保存用户设置: {}", self.path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_settings_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "pdf_summary_relay_settings_{}_{}.toml",
            tag,
            std::process::id()
        ))
    }

    #[tokio::test]
    async fn test_missing_file_falls_back_to_defaults() {
        let store = SettingsStore::new(temp_settings_path("missing"));
        let settings = store.load().await;
        assert_eq!(settings, UserSettings::default());
    }

    #[tokio::test]
    async fn test_save_then_load_roundtrip() {
        let path = temp_settings_path("roundtrip");
        let store = SettingsStore::new(&path);

        let settings = UserSettings {
            server_url: "http://summarizer.internal:8000".to_string(),
            max_words: 800,
            use_llm: false,
            llm_model: "gpt-4o".to_string(),
            token_limit: 1200,
        };
        store.save(&settings).await.unwrap();

        let loaded = store.load().await;
        assert_eq!(loaded, settings);

        let _ = tokio::fs::remove_file(&path).await;
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_defaults() {
        let path = temp_settings_path("corrupt");
        tokio::fs::write(&path, "这不是 toml {{{{").await.unwrap();

        let store = SettingsStore::new(&path);
        let settings = store.load().await;
        assert_eq!(settings, UserSettings::default());

        let _ = tokio::fs::remove_file(&path).await;
    }
}

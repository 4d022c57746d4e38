//! 服務設定
//!
//! JSON 設定檔（可省略）+ 環境變數覆寫

use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::ConfigError;

pub const ENV_CONTENT_DIR: &str = "DUCKOV_CARDS_CONTENT_DIR";
pub const ENV_ADDR: &str = "DUCKOV_CARDS_ADDR";
pub const ENV_SEED: &str = "DUCKOV_CARDS_SEED";
pub const ENV_LOG: &str = "RUST_LOG";

#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 卡組目錄根（每個子目錄一個卡組）
    pub content_dir: PathBuf,
    /// gRPC 監聽位址
    pub listen_addr: String,
    /// 玩家 RNG session 的基礎種子
    pub seed: u64,
    /// tracing EnvFilter 字串
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            listen_addr: "127.0.0.1:50051".to_string(),
            seed: 0,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// 載入設定：檔案不存在時使用預設值，之後套用環境變數
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        config.apply_overrides(|key| std::env::var(key).ok())?;
        Ok(config)
    }

    /// 讀取 JSON 設定檔；缺少的欄位沿用預設值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::read_to_string(path) {
            Ok(text) => Self::from_json(&text),
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => Ok(Self::default()),
            Err(source) => Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            }),
        }
    }

    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(text)?)
    }

    /// 套用覆寫值（`lookup` 通常是環境變數）
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(dir) = lookup(ENV_CONTENT_DIR) {
            self.content_dir = PathBuf::from(dir);
        }
        if let Some(addr) = lookup(ENV_ADDR) {
            self.listen_addr = addr;
        }
        if let Some(seed) = lookup(ENV_SEED) {
            self.seed = seed.trim().parse().map_err(|_| ConfigError::InvalidEnv {
                key: ENV_SEED,
                value: seed.clone(),
            })?;
        }
        if let Some(filter) = lookup(ENV_LOG) {
            self.log_filter = filter;
        }
        Ok(())
    }
}

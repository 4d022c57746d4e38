//! 錯誤類型
//!
//! 解析本身不會失敗（壞行直接略過），這裡只涵蓋檔案讀取、ID 衝突與設定錯誤。

use std::path::PathBuf;

use thiserror::Error;

/// 目錄載入 / 註冊錯誤
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("card id {id} for '{incoming}' already used by '{existing}'")]
    DuplicateCardId {
        id: u32,
        existing: String,
        incoming: String,
    },

    #[error("pack id {id} for '{incoming}' already used by '{existing}'")]
    DuplicatePackId {
        id: u32,
        existing: String,
        incoming: String,
    },
}

/// 設定載入錯誤
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config json: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid value for {key}: {value}")]
    InvalidEnv { key: &'static str, value: String },
}

//! Escape from Duckov 交易卡內容核心
//!
//! - `game`: 卡片/卡包定義解析、ID 生成、稀有度對照、加權抽取、目錄
//! - `config`: 服務設定
//! - `error`: 錯誤類型
//! - `service`: gRPC 服務層（需要 `grpc` feature）

pub mod config;
pub mod error;
pub mod game;

#[cfg(feature = "grpc")]
pub mod service;

#[cfg(feature = "grpc")]
pub mod proto {
    tonic::include_proto!("duckov_cards");
}

pub use config::Config;
pub use error::{CatalogError, ConfigError};

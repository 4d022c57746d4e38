//! 服務層模組
//!
//! 提供 gRPC 服務所需的狀態管理與訊息轉換

pub mod convert;
pub mod state;

pub use convert::{card_info, open_pack_response, pack_info, set_infos};
pub use state::{ServiceError, ServiceState, DEFAULT_MAX_SESSIONS};

#[cfg(test)]
mod integration_tests;

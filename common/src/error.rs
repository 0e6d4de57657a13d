//! エラー型定義

use thiserror::Error;

/// 共通エラー型
#[derive(Error, Debug)]
pub enum Error {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("protocol error: {0}")]
    Protocol(String),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("task did not reach a terminal state after {0} attempts")]
    PollLimit(u32),

    #[error("polling cancelled")]
    Cancelled,
}

/// Result型エイリアス
pub type Result<T> = std::result::Result<T, Error>;

//! Image Search Common Library
//!
//! CLIとWeb(WASM)で共有される型とタスクプロトコル

pub mod types;
pub mod parser;
pub mod poll;
pub mod error;

pub use types::{ModelEntry, SearchResult, ResultCell, similarity_label, result_cells, PLACEHOLDER_IMAGE};
pub use parser::{TaskReply, SearchOutcome, decode_task_reply, decode_submit_reply};
pub use poll::{PollToken, TaskOutcome, poll_until_terminal, POLL_INTERVAL_MS, POLL_ATTEMPT_LIMIT};
pub use error::{Error, Result};

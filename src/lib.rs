//! image-search-rust - 画像類似検索カタログ操作CLI

pub mod cli;
pub mod client;
pub mod config;
pub mod error;
pub mod scanner;

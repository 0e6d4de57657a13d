use thiserror::Error;

#[derive(Error, Debug)]
pub enum ImageSearchError {
    #[error("設定エラー: {0}")]
    Config(String),

    #[error("ファイルが見つかりません: {0}")]
    FileNotFound(String),

    #[error("フォルダが見つかりません: {0}")]
    FolderNotFound(String),

    #[error("画像が見つかりません: {0}")]
    NoImagesFound(String),

    #[error("ファイルが選択されていません")]
    NoFilesSelected,

    #[error("バックエンドへの接続に失敗: {0}")]
    Http(#[from] reqwest::Error),

    #[error("バックエンドエラー: {0}")]
    Backend(String),

    #[error("タスクが失敗しました")]
    TaskFailed,

    #[error("JSON解析エラー: {0}")]
    JsonParse(#[from] serde_json::Error),

    #[error("IOエラー: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Common(#[from] image_search_common::Error),
}

pub type Result<T> = std::result::Result<T, ImageSearchError>;

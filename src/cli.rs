use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "image-search")]
#[command(about = "画像類似検索カタログ操作ツール", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// バックエンドURL（設定ファイルより優先）
    #[arg(long, global = true)]
    pub backend_url: Option<String>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 画像で類似検索を実行してタスク完了まで待機
    Search {
        /// クエリ画像のパス
        #[arg(required = true)]
        image: PathBuf,

        /// モデルID（省略時は設定のデフォルト、未設定なら送信しない）
        #[arg(short, long)]
        model: Option<String>,

        /// 結果をJSONで出力
        #[arg(long)]
        json: bool,
    },

    /// フォルダの画像をカタログへ登録してタスク完了まで待機
    Update {
        /// 画像フォルダのパス
        #[arg(required = true)]
        folder: String,

        /// モデルID（省略時は設定のデフォルト、未設定なら送信しない）
        #[arg(short, long)]
        model: Option<String>,

        /// フォルダをバックエンドホスト上のパスとして送る（アップロードしない）
        #[arg(long)]
        server: bool,
    },

    /// タスクの現在状態を1回だけ照会
    Status {
        /// タスクID
        #[arg(required = true)]
        task_id: String,
    },

    /// 利用可能なモデル一覧を表示
    Models,

    /// 設定の表示・変更
    Config {
        /// バックエンドURLを設定
        #[arg(long)]
        set_backend_url: Option<String>,

        /// デフォルトモデルIDを設定
        #[arg(long)]
        set_model: Option<String>,

        /// 現在の設定を表示
        #[arg(long)]
        show: bool,
    },
}

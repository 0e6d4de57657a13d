//! 検索結果の型定義
//!
//! CLIとWeb(WASM)で共有される型:
//! - ModelEntry: モデル設定（model_config.json の1要素）
//! - SearchResult: バックエンドが返す類似検索結果の1件
//! - ResultCell: 表示用に変換した1セル（画像ソース + 類似度ラベル）

use serde::{Deserialize, Serialize};

/// image_uriが無い結果に使うプレースホルダ画像
pub const PLACEHOLDER_IMAGE: &str = "/static/placeholder.png";

/// モデル設定の1エントリ
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelEntry {
    pub model_id: String,
}

/// 類似検索結果の1件
///
/// `distance` は [0,1] の非類似度。類似度は `(1 - distance) * 100` [%]。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    #[serde(default)]
    pub image_uri: Option<String>,
    pub distance: f64,
}

/// 表示用の1セル
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultCell {
    pub image_src: String,
    pub similarity_label: String,
}

/// 非類似度から類似度ラベルを作る（小数2桁 + "%"）
pub fn similarity_label(distance: f64) -> String {
    format!("{:.2}%", (1.0 - distance) * 100.0)
}

/// 検索結果列を表示セル列へ変換
///
/// image_uriが無い結果はプレースホルダ画像で埋める
pub fn result_cells(results: &[SearchResult]) -> Vec<ResultCell> {
    results
        .iter()
        .map(|result| ResultCell {
            image_src: result
                .image_uri
                .clone()
                .unwrap_or_else(|| PLACEHOLDER_IMAGE.to_string()),
            similarity_label: similarity_label(result.distance),
        })
        .collect()
}

//! バックエンドHTTPクライアント
//!
//! multipart投入（画像検索・カタログ更新）とタスクステータス照会。
//! 完了待機は共通ライブラリのポーリングループにreqwestとtokioの
//! タイマーを注入して行う。

use std::path::Path;
use std::time::Duration;

use reqwest::multipart::{Form, Part};
use serde_json::Value;

use image_search_common::{
    decode_submit_reply, poll_until_terminal, ModelEntry, PollToken, TaskOutcome,
    POLL_INTERVAL_MS,
};

use crate::error::{ImageSearchError, Result};
use crate::scanner::ImageInfo;

pub struct BackendClient {
    http: reqwest::Client,
    base_url: String,
}

impl BackendClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            http: reqwest::Client::new(),
            base_url,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn get_json(&self, path: &str) -> Result<Value> {
        let response = self.http.get(self.url(path)).send().await?;
        if !response.status().is_success() {
            return Err(ImageSearchError::Backend(response.status().to_string()));
        }
        Ok(response.json().await?)
    }

    async fn post_multipart(&self, path: &str, form: Form) -> Result<Value> {
        let response = self
            .http
            .post(self.url(path))
            .multipart(form)
            .send()
            .await?;
        if !response.status().is_success() {
            return Err(ImageSearchError::Backend(response.status().to_string()));
        }
        Ok(response.json().await?)
    }

    /// モデル設定を取得
    pub async fn fetch_models(&self) -> Result<Vec<ModelEntry>> {
        let value = self.get_json("/config/model_config.json").await?;
        Ok(serde_json::from_value(value)?)
    }

    /// クエリ画像で検索タスクを投入し、task_idを返す
    pub async fn search_with_image(
        &self,
        image: &Path,
        model_id: Option<&str>,
    ) -> Result<String> {
        if !image.is_file() {
            return Err(ImageSearchError::FileNotFound(image.display().to_string()));
        }

        let form = append_model_id(
            Form::new().part("file", file_part(image).await?),
            model_id,
        );
        let value = self.post_multipart("/search_with_image", form).await?;
        Ok(decode_submit_reply(&value)?)
    }

    /// ローカル画像群をカタログ更新タスクとして投入し、task_idを返す
    ///
    /// 0件は送信前に弾く（リクエストは発行されない）
    pub async fn upload_catalogue_files(
        &self,
        images: &[ImageInfo],
        model_id: Option<&str>,
    ) -> Result<String> {
        if images.is_empty() {
            return Err(ImageSearchError::NoFilesSelected);
        }

        let mut form = Form::new();
        for image in images {
            form = form.part("files", file_part(&image.path).await?);
        }
        let form = append_model_id(form, model_id);

        let value = self.post_multipart("/upload_catalogue", form).await?;
        Ok(decode_submit_reply(&value)?)
    }

    /// バックエンドホスト上のフォルダパスでカタログ更新タスクを投入
    pub async fn upload_catalogue_folder(
        &self,
        folder_path: &str,
        model_id: Option<&str>,
    ) -> Result<String> {
        let form = append_model_id(
            Form::new().text("folder_path", folder_path.to_string()),
            model_id,
        );
        let value = self.post_multipart("/upload_catalogue", form).await?;
        Ok(decode_submit_reply(&value)?)
    }

    /// タスク状態を1回だけ照会（ポーリングしない）
    pub async fn task_status(&self, task_id: &str) -> Result<Value> {
        self.get_json(&format!("/get_task_status/{}", task_id)).await
    }

    /// タスクが終端状態になるまで1秒間隔でポーリング
    ///
    /// 非終端ステータスのラベルは `on_status` へ通知される
    pub async fn wait_for_task<P>(
        &self,
        task_id: &str,
        limit: u32,
        on_status: P,
    ) -> Result<TaskOutcome>
    where
        P: FnMut(&str),
    {
        let token = PollToken::new();
        let http = self.http.clone();
        let url = self.url(&format!("/poll_task_status/{}", task_id));

        let fetch = move || {
            let http = http.clone();
            let url = url.clone();
            async move {
                let response = http.get(&url).send().await.map_err(|e| e.to_string())?;
                if !response.status().is_success() {
                    return Err(response.status().to_string());
                }
                response.json::<Value>().await.map_err(|e| e.to_string())
            }
        };
        let sleep = || tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS));

        Ok(poll_until_terminal(fetch, sleep, &token, limit, on_status).await?)
    }
}

async fn file_part(path: &Path) -> Result<Part> {
    let bytes = tokio::fs::read(path).await?;
    let file_name = path
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    Ok(Part::bytes(bytes).file_name(file_name))
}

fn append_model_id(form: Form, model_id: Option<&str>) -> Form {
    match model_id {
        Some(model_id) if !model_id.is_empty() => {
            form.text("model_id", model_id.to_string())
        }
        _ => form,
    }
}

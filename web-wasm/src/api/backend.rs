//! バックエンドAPI呼び出し
//!
//! モデル設定の取得、multipart投入（画像検索・カタログ更新）、
//! タスクステータス照会。エラーは表示用メッセージの文字列で返す。

use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::JsFuture;
use web_sys::{File, FormData, Request, RequestInit, RequestMode, Response};

use image_search_common::{decode_submit_reply, ModelEntry};

/// モデル設定を取得
///
/// ページロード時に1回だけ呼ばれる（リトライなし）
pub async fn fetch_model_config() -> Result<Vec<ModelEntry>, String> {
    let value = get_json("/config/model_config.json").await?;
    serde_json::from_value(value).map_err(|e| format!("モデル設定の形式が不正です: {}", e))
}

/// 画像検索タスクを投入してtask_idを得る
pub async fn submit_image_search(
    file: &File,
    model_id: Option<&str>,
) -> Result<String, String> {
    let form = new_form(model_id)?;
    form.append_with_blob("file", file)
        .map_err(|e| js_error_message(&e))?;

    let value = post_form("/search_with_image", &form).await?;
    decode_submit_reply(&value).map_err(|e| e.to_string())
}

/// カタログ更新タスクを投入してtask_idを得る
///
/// ファイルは繰り返しキー `files` で積む
pub async fn submit_catalogue_update(
    files: &[File],
    model_id: Option<&str>,
) -> Result<String, String> {
    let form = new_form(model_id)?;
    for file in files {
        form.append_with_blob("files", file)
            .map_err(|e| js_error_message(&e))?;
    }

    let value = post_form("/upload_catalogue", &form).await?;
    decode_submit_reply(&value).map_err(|e| e.to_string())
}

/// タスクステータスを1回取得
pub async fn fetch_task_status(task_id: &str) -> Result<Value, String> {
    get_json(&format!("/poll_task_status/{}", task_id)).await
}

/// model_id付き（設定時のみ）の空フォームを作る
fn new_form(model_id: Option<&str>) -> Result<FormData, String> {
    let form = FormData::new().map_err(|e| js_error_message(&e))?;
    if let Some(model_id) = model_id.filter(|m| !m.is_empty()) {
        form.append_with_str("model_id", model_id)
            .map_err(|e| js_error_message(&e))?;
    }
    Ok(form)
}

async fn get_json(url: &str) -> Result<Value, String> {
    let request = Request::new_with_str(url).map_err(|e| js_error_message(&e))?;
    run_fetch(&request).await
}

async fn post_form(url: &str, form: &FormData) -> Result<Value, String> {
    let mut opts = RequestInit::new();
    opts.method("POST");
    opts.mode(RequestMode::Cors);
    // Content-Typeはブラウザに任せる（boundary付きで自動設定される）
    opts.body(Some(form.as_ref()));

    let request =
        Request::new_with_str_and_init(url, &opts).map_err(|e| js_error_message(&e))?;
    run_fetch(&request).await
}

/// fetch実行（共通処理）: 非2xxはステータステキストをエラーにする
async fn run_fetch(request: &Request) -> Result<Value, String> {
    let window = web_sys::window().ok_or_else(|| "window unavailable".to_string())?;
    let resp_value = JsFuture::from(window.fetch_with_request(request))
        .await
        .map_err(|e| js_error_message(&e))?;
    let resp: Response = resp_value
        .dyn_into()
        .map_err(|_| "unexpected fetch response".to_string())?;

    if !resp.ok() {
        return Err(format!("Error: {}", resp.status_text()));
    }

    let json = JsFuture::from(resp.json().map_err(|e| js_error_message(&e))?)
        .await
        .map_err(|e| js_error_message(&e))?;
    serde_wasm_bindgen::from_value(json).map_err(|e| e.to_string())
}

fn js_error_message(value: &JsValue) -> String {
    value
        .as_string()
        .unwrap_or_else(|| format!("{:?}", value))
}

#[cfg(all(target_arch = "wasm32", test))]
mod wasm_tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn wasm_form_carries_model_id() {
        let form = new_form(Some("resnet50_1")).unwrap();
        assert_eq!(
            form.get("model_id").as_string(),
            Some("resnet50_1".to_string())
        );
    }

    #[wasm_bindgen_test]
    fn wasm_form_omits_unset_model_id() {
        let form = new_form(None).unwrap();
        assert!(form.get("model_id").is_undefined());

        let form = new_form(Some("")).unwrap();
        assert!(form.get("model_id").is_undefined());
    }
}

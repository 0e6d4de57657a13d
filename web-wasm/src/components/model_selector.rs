//! モデル選択コンポーネント
//!
//! 読み込み済みモデルIDのセレクタ。未選択（デフォルト）は空文字で、
//! その場合リクエストにmodel_idは付かない。

use leptos::prelude::*;

use image_search_common::ModelEntry;

#[component]
pub fn ModelSelector(
    models: ReadSignal<Vec<ModelEntry>>,
    selected_model: ReadSignal<String>,
    set_selected_model: WriteSignal<String>,
) -> impl IntoView {
    view! {
        <div class="form-group model-selector">
            <label for="model-select">"モデル"</label>
            <select
                id="model-select"
                on:change=move |ev| {
                    set_selected_model.set(event_target_value(&ev));
                }
            >
                <option value="" selected=move || selected_model.get().is_empty()>
                    "（デフォルトモデル）"
                </option>
                {move || models.get().into_iter().map(|entry| {
                    let value = entry.model_id.clone();
                    let label = entry.model_id.clone();
                    let current = entry.model_id;
                    let is_selected = move || selected_model.get() == current;
                    view! {
                        <option value=value selected=is_selected>{label}</option>
                    }
                }).collect_view()}
            </select>
        </div>
    }
}

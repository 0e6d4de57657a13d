//! ローディング表示コンポーネント

use leptos::prelude::*;

#[component]
pub fn LoadingIndicator(
    is_loading: ReadSignal<bool>,
    status_line: ReadSignal<String>,
) -> impl IntoView {
    view! {
        <Show when=move || is_loading.get() || !status_line.get().is_empty()>
            <div class="loading-indicator">
                <div class="spinner" />
                <p class="status-line">
                    {move || {
                        let line = status_line.get();
                        if line.is_empty() { "処理中...".to_string() } else { line }
                    }}
                </p>
            </div>
        </Show>
    }
}

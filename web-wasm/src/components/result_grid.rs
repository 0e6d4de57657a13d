//! 結果グリッドコンポーネント
//!
//! サーフェスの内容ごと描画し直す: 結果グリッドか「結果なし」通知の
//! どちらか一方だけが存在する

use leptos::prelude::*;

use crate::app::Surface;

#[component]
pub fn ResultGrid(surface: ReadSignal<Surface>) -> impl IntoView {
    move || match surface.get() {
        Surface::Hidden => ().into_any(),
        Surface::Notice(message) => view! {
            <div class="no-results">
                <p>{message}</p>
            </div>
        }
        .into_any(),
        Surface::Results(cells) => view! {
            <div class="result-grid">
                {cells.into_iter().map(|cell| view! {
                    <div class="result-card">
                        <img src=cell.image_src alt="検索結果" />
                        <p class="similarity">{cell.similarity_label}</p>
                    </div>
                }).collect_view()}
            </div>
        }
        .into_any(),
    }
}

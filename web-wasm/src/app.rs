//! メインアプリケーションコンポーネント

use leptos::prelude::*;
use leptos::task::spawn_local;
use web_sys::File;

use image_search_common::{result_cells, ModelEntry, PollToken, ResultCell, SearchOutcome, TaskOutcome};

use crate::api::{backend, poller};
use crate::components::{
    header::Header,
    loading_indicator::LoadingIndicator,
    model_selector::ModelSelector,
    result_grid::ResultGrid,
    upload_area::UploadArea,
};

/// 結果表示サーフェス
///
/// 常に1つだけ存在し、書き込みは置き換え
/// （結果グリッドと「結果なし」通知が同時に表示されることはない）
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Surface {
    #[default]
    Hidden,
    Results(Vec<ResultCell>),
    Notice(String),
}

impl Surface {
    /// 終端SUCCESSペイロードから次のサーフェスを決める
    pub fn from_outcome(outcome: &SearchOutcome) -> Self {
        match outcome {
            SearchOutcome::Results(results) if results.is_empty() => {
                Surface::Notice("検索結果がありません".to_string())
            }
            SearchOutcome::Results(results) => Surface::Results(result_cells(results)),
            SearchOutcome::Empty(reason) => Surface::Notice(reason.clone()),
        }
    }
}

/// ブロッキング通知（元実装のalert相当）
pub(crate) fn alert(message: &str) {
    if let Some(window) = web_sys::window() {
        let _ = window.alert_with_message(message);
    }
}

/// メインアプリケーションコンポーネント
#[component]
pub fn App() -> impl IntoView {
    // アプリケーション状態
    let (models, set_models) = signal(Vec::<ModelEntry>::new());
    let (selected_model, set_selected_model) = signal(String::new());
    let (is_loading, set_is_loading) = signal(false);
    let (status_line, set_status_line) = signal(String::new());
    let (surface, set_surface) = signal(Surface::Hidden);

    // モデル設定はページロード時に1回だけ取得（失敗してもセレクタが空になるだけ）
    spawn_local(async move {
        match backend::fetch_model_config().await {
            Ok(entries) => set_models.set(entries),
            Err(e) => {
                web_sys::console::error_1(&format!("モデル設定の取得に失敗: {}", e).into());
                alert(&format!("モデル設定の取得に失敗しました: {}", e));
            }
        }
    });

    // 終端状態までポーリングして結果を反映する
    let run_poll = move |task_id: String| {
        spawn_local(async move {
            let token = PollToken::new();
            let result = poller::poll_task(&task_id, &token, |label| {
                set_status_line.set(format!("状態: {}", label));
            })
            .await;

            // どの終端経路でもローディング表示は一度だけ消す
            set_is_loading.set(false);
            set_status_line.set(String::new());

            match result {
                Ok(TaskOutcome::Completed(outcome)) => {
                    set_surface.set(Surface::from_outcome(&outcome));
                }
                Ok(TaskOutcome::Failed) => alert("タスクが失敗しました。"),
                Err(e) => alert(&format!("Error: {}", e)),
            }
        });
    };

    // 画像検索の投入ハンドラ
    let on_search = move |files: Vec<File>| {
        let Some(file) = files.into_iter().next() else {
            alert("ファイルが選択されていません。");
            return;
        };

        let model = selected_model.get();
        let model = (!model.is_empty()).then_some(model);

        set_is_loading.set(true);
        spawn_local(async move {
            match backend::submit_image_search(&file, model.as_deref()).await {
                Ok(task_id) => run_poll(task_id),
                Err(e) => {
                    set_is_loading.set(false);
                    alert(&format!("Error: {}", e));
                }
            }
        });
    };

    // カタログ更新の投入ハンドラ
    let on_update = move |files: Vec<File>| {
        if files.is_empty() {
            alert("フォルダに画像がありません。");
            return;
        }

        let model = selected_model.get();
        let model = (!model.is_empty()).then_some(model);

        spawn_local(async move {
            match backend::submit_catalogue_update(&files, model.as_deref()).await {
                Ok(task_id) => run_poll(task_id),
                Err(e) => alert(&format!("Error: {}", e)),
            }
        });
    };

    view! {
        <div class="container">
            <Header />

            <ModelSelector
                models=models
                selected_model=selected_model
                set_selected_model=set_selected_model
            />

            <UploadArea on_search=on_search on_update=on_update />

            <LoadingIndicator is_loading=is_loading status_line=status_line />

            <ResultGrid surface=surface />
        </div>
    }
}

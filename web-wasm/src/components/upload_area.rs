//! アップロード操作コンポーネント
//!
//! 画像検索用のファイル選択とカタログ更新用のフォルダ選択。
//! どちらも動的に<input>を作ってダイアログを開く。

use leptos::prelude::*;
use wasm_bindgen::prelude::*;
use web_sys::{File, HtmlInputElement};

#[component]
pub fn UploadArea<FS, FU>(on_search: FS, on_update: FU) -> impl IntoView
where
    FS: Fn(Vec<File>) + 'static + Clone,
    FU: Fn(Vec<File>) + 'static + Clone,
{
    let open_search_picker = {
        let on_search = on_search.clone();
        move |_| {
            let on_search = on_search.clone();
            open_file_picker(false, move |files| on_search(files));
        }
    };

    let open_folder_picker = {
        let on_update = on_update.clone();
        move |_| {
            let on_update = on_update.clone();
            open_file_picker(true, move |files| {
                // フォルダ内の画像以外は除外
                let images: Vec<File> = files
                    .into_iter()
                    .filter(|file| file.type_().starts_with("image/"))
                    .collect();
                on_update(images);
            });
        }
    };

    view! {
        <div class="upload-area">
            <button class="btn btn-primary" on:click=open_search_picker>
                "画像で検索"
            </button>
            <button class="btn btn-secondary" on:click=open_folder_picker>
                "カタログ更新"
            </button>
        </div>
    }
}

/// ファイル選択ダイアログを開き、選択結果をコールバックへ渡す
fn open_file_picker<F>(directory: bool, on_picked: F)
where
    F: Fn(Vec<File>) + 'static,
{
    let Some(document) = web_sys::window().and_then(|w| w.document()) else {
        return;
    };
    let Ok(input) = document
        .create_element("input")
        .map(|element| element.unchecked_into::<HtmlInputElement>())
    else {
        return;
    };

    input.set_type("file");
    if directory {
        // フォルダ選択（中のファイルがまとめて渡る）
        let _ = input.set_attribute("webkitdirectory", "");
        input.set_multiple(true);
    } else {
        input.set_accept("image/*");
    }

    let picked = input.clone();
    let closure = Closure::wrap(Box::new(move |_: web_sys::Event| {
        let mut files = Vec::new();
        if let Some(list) = picked.files() {
            for i in 0..list.length() {
                if let Some(file) = list.get(i) {
                    files.push(file);
                }
            }
        }
        on_picked(files);
    }) as Box<dyn FnMut(_)>);

    input.set_onchange(Some(closure.as_ref().unchecked_ref()));
    closure.forget();
    input.click();
}

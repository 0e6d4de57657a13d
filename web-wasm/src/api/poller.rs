//! ブラウザ側ポーリング
//!
//! 共通ライブラリのポーリングループにfetchとglooのタイマーを注入する

use gloo::timers::future::TimeoutFuture;

use image_search_common::{
    poll_until_terminal, PollToken, TaskOutcome, POLL_ATTEMPT_LIMIT, POLL_INTERVAL_MS,
};

use super::backend;

/// タスクが終端状態になるまで1秒間隔でポーリングする
///
/// 非終端ステータスのラベルは `on_status` へ通知される。
/// 次のリクエストは前のレスポンス処理後にのみ発行される。
pub async fn poll_task<P>(
    task_id: &str,
    token: &PollToken,
    on_status: P,
) -> Result<TaskOutcome, String>
where
    P: FnMut(&str),
{
    let task_id = task_id.to_string();
    let fetch = move || {
        let task_id = task_id.clone();
        async move { backend::fetch_task_status(&task_id).await }
    };
    let sleep = || TimeoutFuture::new(POLL_INTERVAL_MS as u32);

    poll_until_terminal(fetch, sleep, token, POLL_ATTEMPT_LIMIT, on_status)
        .await
        .map_err(|e| e.to_string())
}

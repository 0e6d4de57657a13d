//! タスクポーリングループ
//!
//! 固定間隔待機 → ステータス取得 → 分岐、を終端状態まで繰り返す。
//! トランスポートとタイマーは注入式: CLIはreqwest + tokio::time::sleep、
//! WebはfetchとglooのTimeoutFutureを渡す。
//!
//! 順序保証: 次のリクエストは前のレスポンス処理後にのみ発行される
//! （同一タスクのステータス照会が同時に飛ぶことはない）。

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use serde_json::Value;

use crate::error::{Error, Result};
use crate::parser::{decode_task_reply, SearchOutcome, TaskReply};

/// ポーリング間隔（ミリ秒）
pub const POLL_INTERVAL_MS: u64 = 1_000;

/// ポーリング試行回数の上限（約5分）
pub const POLL_ATTEMPT_LIMIT: u32 = 300;

/// ポーリングの終端結果
#[derive(Debug, Clone, PartialEq)]
pub enum TaskOutcome {
    /// SUCCESS: デコード済みペイロード付き
    Completed(SearchOutcome),
    /// FAILURE: バックエンドがタスク失敗を報告
    Failed,
}

/// ポーリングのキャンセルトークン
///
/// 各tickの先頭で検査される。終端到達によるループ終了は暗黙で、
/// トークンは外部からの明示キャンセル用。
#[derive(Debug, Clone, Default)]
pub struct PollToken {
    cancelled: Arc<AtomicBool>,
}

impl PollToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }
}

/// タスクが終端状態になるまでポーリングする
///
/// ループ: 固定間隔を待機 → ステータスを1回取得 → 分岐。
/// 非終端ステータスは `on_status` へラベルを通知して継続する。
///
/// # Arguments
/// * `fetch` - ステータスレスポンスのJSONを返す非同期クロージャ。
///   トランスポートエラーは `Err(メッセージ)` で返す
/// * `sleep` - 固定間隔ぶん待機するFutureを返すクロージャ
/// * `token` - キャンセルトークン
/// * `limit` - 発行するリクエスト数の上限
/// * `on_status` - 非終端ステータスラベルの通知先
///
/// # Errors
/// * `Error::Transport` - リクエスト失敗・非2xx
/// * `Error::Protocol` - statusフィールド欠落
/// * `Error::PollLimit` - 上限到達までに終端状態へ達しなかった
/// * `Error::Cancelled` - トークンがキャンセルされた
pub async fn poll_until_terminal<F, Fut, S, SFut, P>(
    mut fetch: F,
    mut sleep: S,
    token: &PollToken,
    limit: u32,
    mut on_status: P,
) -> Result<TaskOutcome>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = std::result::Result<Value, String>>,
    S: FnMut() -> SFut,
    SFut: Future<Output = ()>,
    P: FnMut(&str),
{
    for _ in 0..limit {
        sleep().await;

        if token.is_cancelled() {
            return Err(Error::Cancelled);
        }

        let value = fetch().await.map_err(Error::Transport)?;

        match decode_task_reply(&value)? {
            TaskReply::Completed(outcome) => return Ok(TaskOutcome::Completed(outcome)),
            TaskReply::Failed => return Ok(TaskOutcome::Failed),
            TaskReply::InProgress(label) => on_status(&label),
        }
    }

    Err(Error::PollLimit(limit))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;
    use std::time::Duration;

    type FetchResult = std::result::Result<Value, String>;
    type BoxedFetch = std::pin::Pin<Box<dyn Future<Output = FetchResult>>>;

    /// 所定の応答列を順に返すfetchクロージャを作る
    fn scripted_fetch(replies: Vec<FetchResult>) -> (impl FnMut() -> BoxedFetch, Rc<Cell<u32>>) {
        let calls = Rc::new(Cell::new(0u32));
        let replies = Rc::new(RefCell::new(replies));
        let counter = calls.clone();
        let fetch = move || -> BoxedFetch {
            let replies = replies.clone();
            let counter = counter.clone();
            Box::pin(async move {
                counter.set(counter.get() + 1);
                replies.borrow_mut().remove(0)
            })
        };
        (fetch, calls)
    }

    fn no_sleep() -> impl FnMut() -> std::future::Ready<()> {
        || std::future::ready(())
    }

    #[tokio::test]
    async fn test_running_twice_then_success() {
        let (fetch, calls) = scripted_fetch(vec![
            Ok(json!({"status": "RUNNING"})),
            Ok(json!({"status": "RUNNING"})),
            Ok(json!({"status": "SUCCESS", "result": [
                {"distance": 0.1}, {"distance": 0.5}
            ]})),
        ]);

        let statuses = Rc::new(RefCell::new(Vec::new()));
        let seen = statuses.clone();
        let outcome = poll_until_terminal(
            fetch,
            no_sleep(),
            &PollToken::new(),
            POLL_ATTEMPT_LIMIT,
            |label| seen.borrow_mut().push(label.to_string()),
        )
        .await
        .unwrap();

        assert_eq!(calls.get(), 3);
        assert_eq!(*statuses.borrow(), vec!["RUNNING", "RUNNING"]);

        let TaskOutcome::Completed(SearchOutcome::Results(results)) = outcome else {
            panic!("expected Completed(Results), got {:?}", outcome);
        };
        let labels: Vec<String> = crate::types::result_cells(&results)
            .into_iter()
            .map(|cell| cell.similarity_label)
            .collect();
        assert_eq!(labels, vec!["90.00%", "50.00%"]);
    }

    #[tokio::test]
    async fn test_failure_stops_polling() {
        let (fetch, calls) = scripted_fetch(vec![
            Ok(json!({"status": "FAILURE"})),
            Ok(json!({"status": "SUCCESS"})),
        ]);

        let outcome =
            poll_until_terminal(fetch, no_sleep(), &PollToken::new(), 10, |_| {})
                .await
                .unwrap();

        // FAILUREで停止し、以降のリクエストは発行されない
        assert_eq!(outcome, TaskOutcome::Failed);
        assert_eq!(calls.get(), 1);
    }

    #[tokio::test]
    async fn test_transport_error_stops_polling() {
        let (fetch, calls) = scripted_fetch(vec![
            Ok(json!({"status": "PENDING"})),
            Err("500 Internal Server Error".to_string()),
            Ok(json!({"status": "SUCCESS"})),
        ]);

        let err = poll_until_terminal(fetch, no_sleep(), &PollToken::new(), 10, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Transport(_)));
        assert_eq!(calls.get(), 2);
    }

    #[tokio::test]
    async fn test_attempt_limit() {
        let (fetch, calls) = scripted_fetch(
            (0..5).map(|_| Ok(json!({"status": "RUNNING"}))).collect(),
        );

        let err = poll_until_terminal(fetch, no_sleep(), &PollToken::new(), 5, |_| {})
            .await
            .unwrap_err();

        assert!(matches!(err, Error::PollLimit(5)));
        assert_eq!(calls.get(), 5);
    }

    #[tokio::test]
    async fn test_cancelled_before_first_request() {
        let (fetch, calls) = scripted_fetch(vec![Ok(json!({"status": "RUNNING"}))]);

        let token = PollToken::new();
        token.cancel();

        let err = poll_until_terminal(fetch, no_sleep(), &token, 10, |_| {})
            .await
            .unwrap_err();

        // キャンセル後はリクエストを発行しない
        assert!(matches!(err, Error::Cancelled));
        assert_eq!(calls.get(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_fixed_interval_between_requests() {
        let (fetch, _calls) = scripted_fetch(vec![
            Ok(json!({"status": "RUNNING"})),
            Ok(json!({"status": "RUNNING"})),
            Ok(json!({"status": "SUCCESS", "result": [{"distance": 0.1}]})),
        ]);

        let start = tokio::time::Instant::now();
        let ticks = Rc::new(RefCell::new(Vec::new()));
        let recorded = ticks.clone();

        let sleep = move || {
            let recorded = recorded.clone();
            async move {
                tokio::time::sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
                recorded.borrow_mut().push(start.elapsed());
            }
        };

        poll_until_terminal(fetch, sleep, &PollToken::new(), 10, |_| {})
            .await
            .unwrap();

        // 各リクエストは前のレスポンス処理から1000ms後に発行される
        let ticks = ticks.borrow();
        assert_eq!(ticks.len(), 3);
        assert_eq!(ticks[0], Duration::from_millis(1_000));
        assert_eq!(ticks[1], Duration::from_millis(2_000));
        assert_eq!(ticks[2], Duration::from_millis(3_000));
    }
}

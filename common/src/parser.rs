//! バックエンドレスポンスパーサー
//!
//! 投入レスポンス（task_id）とポーリングレスポンス（status/result）を
//! 境界で一度だけデコードし、タグ付きの型へ変換する

use serde_json::Value;

use crate::error::{Error, Result};
use crate::types::SearchResult;

/// ポーリングレスポンスのデコード結果
#[derive(Debug, Clone, PartialEq)]
pub enum TaskReply {
    /// SUCCESS: 結果ペイロード付きで完了
    Completed(SearchOutcome),
    /// FAILURE: バックエンドがタスク失敗を報告（詳細なし）
    Failed,
    /// 非終端ステータス（PENDING / RUNNING / その他のラベル）
    InProgress(String),
}

/// SUCCESSペイロードのデコード結果
///
/// 結果配列以外の形（欠落 / errorフィールド付きオブジェクト /
/// 文字列 / デコード不能な配列）はすべて `Empty(理由)` に落とす。
/// クラッシュではなく「結果なし」表示にするための縮退成功。
#[derive(Debug, Clone, PartialEq)]
pub enum SearchOutcome {
    Results(Vec<SearchResult>),
    Empty(String),
}

/// 投入レスポンスからtask_idを取り出す
///
/// # Returns
/// * `Ok(String)` - 空でないtask_id
/// * `Err(Error::Protocol)` - task_idが欠落・空・文字列以外
pub fn decode_submit_reply(value: &Value) -> Result<String> {
    match value.get("task_id").and_then(Value::as_str) {
        Some(task_id) if !task_id.is_empty() => Ok(task_id.to_string()),
        _ => Err(Error::Protocol(
            "task_id missing from response".to_string(),
        )),
    }
}

/// ポーリングレスポンスをTaskReplyへデコード
///
/// statusは文字列以外（バックエンドのロングポールは408を数値で返すことが
/// ある）も文字列化して扱う。SUCCESS/FAILURE以外はすべて非終端。
pub fn decode_task_reply(value: &Value) -> Result<TaskReply> {
    let status = match value.get("status") {
        Some(Value::String(status)) => status.clone(),
        Some(other) => other.to_string(),
        None => {
            return Err(Error::Protocol(
                "status missing from response".to_string(),
            ))
        }
    };

    match status.as_str() {
        "SUCCESS" => Ok(TaskReply::Completed(decode_search_outcome(
            value.get("result"),
        ))),
        "FAILURE" => Ok(TaskReply::Failed),
        _ => Ok(TaskReply::InProgress(status)),
    }
}

fn decode_search_outcome(result: Option<&Value>) -> SearchOutcome {
    match result {
        None | Some(Value::Null) => {
            SearchOutcome::Empty("検索結果がありません".to_string())
        }
        Some(array @ Value::Array(_)) => {
            match serde_json::from_value::<Vec<SearchResult>>(array.clone()) {
                Ok(results) => SearchOutcome::Results(results),
                Err(e) => {
                    SearchOutcome::Empty(format!("検索結果の形式が不正です: {}", e))
                }
            }
        }
        // カタログ更新の完了メッセージは文字列で届く
        Some(Value::String(message)) => SearchOutcome::Empty(message.clone()),
        Some(Value::Object(map)) if map.contains_key("error") => {
            let reason = match &map["error"] {
                Value::String(reason) => reason.clone(),
                other => other.to_string(),
            };
            SearchOutcome::Empty(reason)
        }
        Some(_) => SearchOutcome::Empty("検索結果の形式が不正です".to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    // =============================================
    // 投入レスポンス
    // =============================================

    #[test]
    fn test_decode_submit_reply_ok() {
        let value = json!({"task_id": "abc123"});
        assert_eq!(decode_submit_reply(&value).unwrap(), "abc123");
    }

    #[test]
    fn test_decode_submit_reply_missing_task_id() {
        let value = json!({"detail": "Task failed"});
        let err = decode_submit_reply(&value).unwrap_err();
        assert!(matches!(err, Error::Protocol(_)));
    }

    #[test]
    fn test_decode_submit_reply_empty_task_id() {
        let value = json!({"task_id": ""});
        assert!(decode_submit_reply(&value).is_err());
    }

    #[test]
    fn test_decode_submit_reply_non_string_task_id() {
        let value = json!({"task_id": 42});
        assert!(decode_submit_reply(&value).is_err());
    }

    // =============================================
    // ポーリングレスポンス: 終端
    // =============================================

    #[test]
    fn test_decode_success_with_results() {
        let value = json!({
            "status": "SUCCESS",
            "result": [
                {"image_uri": "/data/a.jpg", "distance": 0.1},
                {"distance": 0.5}
            ]
        });

        let reply = decode_task_reply(&value).unwrap();
        let TaskReply::Completed(SearchOutcome::Results(results)) = reply else {
            panic!("expected Completed(Results), got {:?}", reply);
        };
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].image_uri.as_deref(), Some("/data/a.jpg"));
        assert_eq!(results[1].image_uri, None);
        assert_eq!(results[1].distance, 0.5);
    }

    #[test]
    fn test_decode_success_without_result() {
        let value = json!({"status": "SUCCESS"});
        let reply = decode_task_reply(&value).unwrap();
        assert!(matches!(
            reply,
            TaskReply::Completed(SearchOutcome::Empty(_))
        ));
    }

    #[test]
    fn test_decode_success_with_error_object() {
        let value = json!({
            "status": "SUCCESS",
            "result": {"error": "No embeddings found for model_id resnet50_1."}
        });

        let reply = decode_task_reply(&value).unwrap();
        let TaskReply::Completed(SearchOutcome::Empty(reason)) = reply else {
            panic!("expected Empty, got {:?}", reply);
        };
        assert_eq!(reason, "No embeddings found for model_id resnet50_1.");
    }

    #[test]
    fn test_decode_success_with_string_result() {
        // カタログ更新タスクの完了メッセージ
        let value = json!({
            "status": "SUCCESS",
            "result": "Catalogue updated successfully"
        });

        let reply = decode_task_reply(&value).unwrap();
        assert_eq!(
            reply,
            TaskReply::Completed(SearchOutcome::Empty(
                "Catalogue updated successfully".to_string()
            ))
        );
    }

    #[test]
    fn test_decode_success_with_undecodable_array() {
        // distance欠落は結果配列として成立しない
        let value = json!({
            "status": "SUCCESS",
            "result": [{"image_uri": "/data/a.jpg"}]
        });

        let reply = decode_task_reply(&value).unwrap();
        assert!(matches!(
            reply,
            TaskReply::Completed(SearchOutcome::Empty(_))
        ));
    }

    #[test]
    fn test_decode_success_with_non_sequence_result() {
        let value = json!({"status": "SUCCESS", "result": 7});
        let reply = decode_task_reply(&value).unwrap();
        assert!(matches!(
            reply,
            TaskReply::Completed(SearchOutcome::Empty(_))
        ));
    }

    #[test]
    fn test_decode_failure_ignores_detail() {
        let value = json!({"status": "FAILURE", "result": "boom"});
        assert_eq!(decode_task_reply(&value).unwrap(), TaskReply::Failed);
    }

    // =============================================
    // ポーリングレスポンス: 非終端
    // =============================================

    #[test]
    fn test_decode_pending_and_running() {
        for status in ["PENDING", "RUNNING", "RETRYING"] {
            let value = json!({"status": status});
            assert_eq!(
                decode_task_reply(&value).unwrap(),
                TaskReply::InProgress(status.to_string())
            );
        }
    }

    #[test]
    fn test_decode_numeric_status_is_in_progress() {
        // ロングポールのタイムアウトは {"status": 408} を返す
        let value = json!({"status": 408, "result": "Connection Timeout"});
        assert_eq!(
            decode_task_reply(&value).unwrap(),
            TaskReply::InProgress("408".to_string())
        );
    }

    #[test]
    fn test_decode_missing_status_is_protocol_error() {
        let value = json!({"result": []});
        assert!(matches!(
            decode_task_reply(&value).unwrap_err(),
            Error::Protocol(_)
        ));
    }
}

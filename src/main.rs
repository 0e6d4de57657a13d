use clap::Parser;
use std::path::Path;
use std::time::Duration;

use image_search_rust::{cli, client, config, error, scanner};

use cli::{Cli, Commands};
use client::BackendClient;
use config::Config;
use error::{ImageSearchError, Result};
use image_search_common::{result_cells, SearchOutcome, TaskOutcome};
use indicatif::ProgressBar;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::load()?;
    let backend_url = cli
        .backend_url
        .clone()
        .unwrap_or_else(|| config.backend_url.clone());

    match cli.command {
        Commands::Search { image, model, json } => {
            println!("🔍 image-search - 類似画像検索\n");

            let client = BackendClient::new(backend_url);
            let model = model.or_else(|| config.default_model_id.clone());

            // 1. 検索タスク投入
            println!("[1/2] 検索タスクを投入中...");
            let task_id = client.search_with_image(&image, model.as_deref()).await?;
            println!("✔ タスク受付: {}\n", task_id);

            // 2. 完了待機
            println!("[2/2] タスク完了を待機中...");
            let outcome = wait_with_spinner(&client, &task_id, config.poll_limit).await?;

            match outcome {
                TaskOutcome::Completed(SearchOutcome::Results(results)) => {
                    if json {
                        println!("{}", serde_json::to_string_pretty(&results)?);
                    } else {
                        println!("✔ {}件ヒット\n", results.len());
                        for (i, cell) in result_cells(&results).iter().enumerate() {
                            println!(
                                "  {:>2}. {}  {}",
                                i + 1,
                                cell.similarity_label,
                                cell.image_src
                            );
                        }
                    }
                    println!("\n✅ 検索完了");
                }
                TaskOutcome::Completed(SearchOutcome::Empty(reason)) => {
                    println!("結果なし: {}", reason);
                }
                TaskOutcome::Failed => return Err(ImageSearchError::TaskFailed),
            }
        }

        Commands::Update {
            folder,
            model,
            server,
        } => {
            println!("📦 image-search - カタログ更新\n");

            let client = BackendClient::new(backend_url);
            let model = model.or_else(|| config.default_model_id.clone());

            // 1. カタログ更新タスク投入
            let task_id = if server {
                println!("[1/2] サーバ上のフォルダを登録中: {}", folder);
                client
                    .upload_catalogue_folder(&folder, model.as_deref())
                    .await?
            } else {
                println!("[1/2] 画像をスキャン中...");
                let images = scanner::scan_folder(Path::new(&folder))?;
                if images.is_empty() {
                    return Err(ImageSearchError::NoImagesFound(folder));
                }
                println!("✔ {}枚の画像を検出", images.len());
                client
                    .upload_catalogue_files(&images, model.as_deref())
                    .await?
            };
            println!("✔ タスク受付: {}\n", task_id);

            // 2. 完了待機
            println!("[2/2] タスク完了を待機中...");
            let outcome = wait_with_spinner(&client, &task_id, config.poll_limit).await?;

            match outcome {
                TaskOutcome::Completed(SearchOutcome::Empty(message)) => {
                    println!("✔ {}", message);
                    println!("\n✅ カタログ更新完了");
                }
                TaskOutcome::Completed(SearchOutcome::Results(_)) => {
                    println!("\n✅ カタログ更新完了");
                }
                TaskOutcome::Failed => return Err(ImageSearchError::TaskFailed),
            }
        }

        Commands::Status { task_id } => {
            let client = BackendClient::new(backend_url);
            let value = client.task_status(&task_id).await?;
            println!("{}", serde_json::to_string_pretty(&value)?);
        }

        Commands::Models => {
            println!("🧠 利用可能なモデル:\n");

            let client = BackendClient::new(backend_url);
            let models = client.fetch_models().await?;

            if models.is_empty() {
                println!("  (なし)");
            }
            for entry in &models {
                println!("  - {}", entry.model_id);
            }
        }

        Commands::Config {
            set_backend_url,
            set_model,
            show,
        } => {
            let mut config = config;

            if let Some(url) = set_backend_url {
                config.set_backend_url(url)?;
                println!("✔ バックエンドURLを設定しました");
            }

            if let Some(model) = set_model {
                config.set_default_model(model)?;
                println!("✔ デフォルトモデルを設定しました");
            }

            if show {
                println!("設定:");
                println!("  バックエンドURL: {}", config.backend_url);
                println!(
                    "  デフォルトモデル: {}",
                    config.default_model_id.as_deref().unwrap_or("未設定")
                );
                println!("  ポーリング上限: {}回", config.poll_limit);
            }
        }
    }

    Ok(())
}

/// スピナーを回しながらタスク完了を待つ
///
/// 非終端ステータスのラベルをスピナーのメッセージへ反映する
async fn wait_with_spinner(
    client: &BackendClient,
    task_id: &str,
    limit: u32,
) -> Result<TaskOutcome> {
    let spinner = ProgressBar::new_spinner();
    spinner.enable_steady_tick(Duration::from_millis(120));
    spinner.set_message("状態: PENDING");

    let result = client
        .wait_for_task(task_id, limit, |label| {
            spinner.set_message(format!("状態: {}", label));
        })
        .await;

    spinner.finish_and_clear();
    result
}

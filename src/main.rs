//! Push Notify Handler CLI
//!
//! 把推送消息（JSON）送入处理流水线，投递记录按行输出到 stdout

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::io::{self, Read};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};

use push_notify_handler::notification::{ChannelStore, FileChannelStore, InMemoryChannelStore};
use push_notify_handler::{
    AppStateSnapshot, Collaborators, HandleOutcome, HandlerConfig, JsonLinesBridge, LoggingNotifier,
    MessagingService, NotificationLog, RemoteMessage, TracingReporter,
};

#[derive(Parser)]
#[command(name = "pnh")]
#[command(about = "Push Notify Handler - 推送消息规范化与系统通知构建")]
#[command(version)]
struct Cli {
    /// 配置文件路径（默认 ~/.config/push-notify-handler/config.json）
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 处理推送消息
    Receive {
        /// 消息文件（默认从 stdin 读取）
        #[arg(long, short)]
        file: Option<PathBuf>,
        /// 输入为 JSONL，每行一条消息，并发处理
        #[arg(long)]
        stream: bool,
        /// 应用在后台
        #[arg(long)]
        background: bool,
        /// 应用注册了自己的通知回调
        #[arg(long)]
        has_callback: bool,
        /// 覆盖配置中的 SDK 版本
        #[arg(long)]
        sdk: Option<u32>,
        /// Dry-run 模式（channel 只保存在内存，不写通知记录）
        #[arg(long)]
        dry_run: bool,
    },
    /// 投递轮换后的 token
    Token {
        token: String,
    },
    /// 列出已创建的通知 channel
    Channels {
        /// 输出 JSON 格式
        #[arg(long)]
        json: bool,
    },
    /// 查看最近发出的通知
    Notifications {
        /// 显示最近 N 条
        #[arg(long, short, default_value = "10")]
        limit: usize,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // 通过 RUST_LOG 控制日志级别，例如: RUST_LOG=debug pnh receive
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("push_notify_handler=info,pnh=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => HandlerConfig::load_from(path)?,
        None => HandlerConfig::auto_load()?,
    };

    match cli.command {
        Commands::Receive {
            file,
            stream,
            background,
            has_callback,
            sdk,
            dry_run,
        } => {
            if let Some(sdk) = sdk {
                config.sdk_level = sdk;
            }
            let app_state = AppStateSnapshot {
                in_background: background,
                has_notification_handler: has_callback,
            };
            let service = Arc::new(build_service(&config, app_state, dry_run));
            let input = read_input(file.as_ref())?;

            if stream {
                receive_stream(service, &input).await?;
            } else {
                let message: RemoteMessage =
                    serde_json::from_str(&input).context("invalid message JSON")?;
                let outcome = service.on_message_received(&message);
                report_outcome(&outcome);
            }
        }
        Commands::Token { token } => {
            let service = build_service(&config, AppStateSnapshot::default(), true);
            if !service.on_new_token(&token) {
                warn!("Token was not delivered");
            }
        }
        Commands::Channels { json } => {
            let store = FileChannelStore::new(config.channel_store_path());
            let channels = store.list()?;
            if json {
                println!("{}", serde_json::to_string_pretty(&channels)?);
            } else {
                println!("发现 {} 个通知 channel:\n", channels.len());
                for channel in channels {
                    println!(
                        "  ID: {} | 名称: {} | 重要程度: {:?} | 呼吸灯: {}",
                        channel.id,
                        channel.name,
                        channel.importance,
                        channel
                            .light_color
                            .map(|c| format!("#{:08X}", c))
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }
        Commands::Notifications { limit } => {
            let log = NotificationLog::new(config.notification_log_path());
            let records = log.read_recent(limit);
            if records.is_empty() {
                println!("暂无通知记录");
            }
            for record in records {
                println!(
                    "[{}] tag={} channel={} {} - {}",
                    record.ts.format("%Y-%m-%d %H:%M:%S"),
                    record.tag,
                    record.channel_id,
                    record.title.as_deref().unwrap_or(""),
                    record.body.as_deref().unwrap_or("")
                );
            }
        }
    }

    Ok(())
}

fn build_service(config: &HandlerConfig, app_state: AppStateSnapshot, dry_run: bool) -> MessagingService {
    let channel_store: Arc<dyn ChannelStore> = if dry_run {
        Arc::new(InMemoryChannelStore::new())
    } else {
        Arc::new(FileChannelStore::new(config.channel_store_path()))
    };
    let notifier = if dry_run {
        LoggingNotifier::new()
    } else {
        LoggingNotifier::new().with_log(NotificationLog::new(config.notification_log_path()))
    };

    MessagingService::new(
        config,
        Collaborators {
            app_state: Arc::new(app_state),
            resources: Arc::new(config.static_resources()),
            channel_store,
            notifier: Arc::new(notifier),
            bridge: Arc::new(JsonLinesBridge::new(io::stdout())),
            reporter: Arc::new(TracingReporter),
        },
    )
}

fn read_input(file: Option<&PathBuf>) -> Result<String> {
    match file {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display())),
        None => {
            let mut input = String::new();
            io::stdin().read_to_string(&mut input)?;
            Ok(input)
        }
    }
}

/// 每行一条消息，各自在 blocking 线程上处理，单条失败不影响其它消息
async fn receive_stream(service: Arc<MessagingService>, input: &str) -> Result<()> {
    let mut handles = Vec::new();

    for (line_no, line) in input.lines().enumerate() {
        if line.trim().is_empty() {
            continue;
        }
        let message: RemoteMessage = match serde_json::from_str(line) {
            Ok(m) => m,
            Err(e) => {
                warn!(line = line_no + 1, error = %e, "Skipping invalid message JSON");
                continue;
            }
        };

        let service = Arc::clone(&service);
        handles.push(tokio::task::spawn_blocking(move || service.on_message_received(&message)));
    }

    let summary = collect_outcomes(handles).await;
    info!(
        total = summary.total,
        shown = summary.shown,
        failed = summary.failed,
        "Processed message stream"
    );
    Ok(())
}

#[derive(Debug, Default, PartialEq, Eq)]
struct StreamSummary {
    total: usize,
    shown: usize,
    failed: usize,
}

/// 汇总各条消息的结果；任务 panic 计为失败，不中断汇总
async fn collect_outcomes(handles: Vec<JoinHandle<HandleOutcome>>) -> StreamSummary {
    let mut summary = StreamSummary {
        total: handles.len(),
        ..StreamSummary::default()
    };
    for handle in handles {
        match handle.await {
            Ok(HandleOutcome::Dispatched {
                notification_tag: Some(_),
                ..
            }) => summary.shown += 1,
            Ok(HandleOutcome::Failed { .. }) => summary.failed += 1,
            Ok(_) => {}
            Err(e) => {
                warn!(error = %e, "Message task panicked");
                summary.failed += 1;
            }
        }
    }
    summary
}

fn report_outcome(outcome: &HandleOutcome) {
    match outcome {
        HandleOutcome::Claimed { receiver } => info!(receiver = %receiver, "Message claimed by receiver"),
        HandleOutcome::Ignored { message_id } => info!(message_id = %message_id, "Message ignored"),
        HandleOutcome::Dispatched {
            message_id,
            notification_tag,
        } => info!(message_id = %message_id, notification_tag = ?notification_tag, "Message dispatched"),
        HandleOutcome::Failed { error } => warn!(error = %error, "Message handling failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_panicked_task_counts_as_failed() {
        let handles = vec![
            tokio::task::spawn_blocking(|| HandleOutcome::Dispatched {
                message_id: "1".to_string(),
                notification_tag: Some(49),
            }),
            tokio::task::spawn_blocking(|| -> HandleOutcome { panic!("notifier crashed") }),
            tokio::task::spawn_blocking(|| HandleOutcome::Failed {
                error: "bridge down".to_string(),
            }),
            tokio::task::spawn_blocking(|| HandleOutcome::Dispatched {
                message_id: "2".to_string(),
                notification_tag: Some(50),
            }),
        ];

        let summary = collect_outcomes(handles).await;
        assert_eq!(
            summary,
            StreamSummary {
                total: 4,
                shown: 2,
                failed: 2,
            }
        );
    }
}

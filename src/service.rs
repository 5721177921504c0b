//! 消息服务 - provider 回调入口
//!
//! 每条消息的处理流程：
//! 1. 注册的接收器认领 → 结束
//! 2. 字段提取 + 规范化
//! 3. 没有 title/body 且没有 data → 忽略
//! 4. 显示策略决定是否弹通知；弹出时构建描述符、确保 channel、发布
//! 5. 投递给应用桥接（无论是否弹出）
//!
//! 两个入口都是错误边界：内部错误交给 `ErrorReporter`，不向调用方传播。
//! 服务本身无可变状态，可以在多个线程上并发调用。

use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::{debug, info};

use crate::bridge::{AppBridge, BridgePayload};
use crate::config::HandlerConfig;
use crate::message::{FieldExtractor, MessageNormalizer, NormalizedMessage, RemoteMessage};
use crate::notification::{ChannelRegistry, ChannelStore, NotificationBuilder, Notifier, ResourceResolver};
use crate::policy::{should_show_notification, AppState};
use crate::receiver::{MessageReceiver, ReceiverManager};
use crate::reporter::ErrorReporter;

/// 外部协作方
pub struct Collaborators {
    pub app_state: Arc<dyn AppState>,
    pub resources: Arc<dyn ResourceResolver>,
    pub channel_store: Arc<dyn ChannelStore>,
    pub notifier: Arc<dyn Notifier>,
    pub bridge: Arc<dyn AppBridge>,
    pub reporter: Arc<dyn ErrorReporter>,
}

/// 单条消息的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HandleOutcome {
    /// 被注册的接收器认领
    Claimed { receiver: String },
    /// 没有可处理的内容
    Ignored { message_id: String },
    /// 已投递给应用
    Dispatched {
        message_id: String,
        /// 发出的通知 tag；未弹出或发布失败为 `None`
        notification_tag: Option<i32>,
    },
    /// 处理失败（已上报）
    Failed { error: String },
}

/// 推送消息服务
pub struct MessagingService {
    extractor: FieldExtractor,
    normalizer: MessageNormalizer,
    builder: NotificationBuilder,
    registry: ChannelRegistry,
    receivers: ReceiverManager,
    app_state: Arc<dyn AppState>,
    notifier: Arc<dyn Notifier>,
    bridge: Arc<dyn AppBridge>,
    reporter: Arc<dyn ErrorReporter>,
}

impl MessagingService {
    pub fn new(config: &HandlerConfig, collaborators: Collaborators) -> Self {
        let capabilities = config.capabilities();
        Self {
            extractor: FieldExtractor::new(capabilities),
            normalizer: MessageNormalizer::new(config.fallback_id),
            builder: NotificationBuilder::new(
                capabilities,
                collaborators.resources,
                config.channel_defaults(),
            ),
            registry: ChannelRegistry::new(collaborators.channel_store, capabilities),
            receivers: ReceiverManager::new(),
            app_state: collaborators.app_state,
            notifier: collaborators.notifier,
            bridge: collaborators.bridge,
            reporter: collaborators.reporter,
        }
    }

    /// 注册接收器
    pub fn register_receiver(&mut self, receiver: Arc<dyn MessageReceiver>) {
        self.receivers.register(receiver);
    }

    /// 收到消息
    pub fn on_message_received(&self, message: &RemoteMessage) -> HandleOutcome {
        match self.process(message) {
            Ok(outcome) => outcome,
            Err(e) => {
                self.reporter.report("on_message_received", &e);
                HandleOutcome::Failed {
                    error: format!("{:#}", e),
                }
            }
        }
    }

    /// token 更新；返回是否成功投递
    pub fn on_new_token(&self, token: &str) -> bool {
        debug!(token, "Refreshed token");
        match self.bridge.send_token(token).context("failed to forward token") {
            Ok(()) => true,
            Err(e) => {
                self.reporter.report("on_new_token", &e);
                false
            }
        }
    }

    fn process(&self, message: &RemoteMessage) -> Result<HandleOutcome> {
        if let Some(receiver) = self.receivers.offer(message) {
            return Ok(HandleOutcome::Claimed {
                receiver: receiver.to_string(),
            });
        }

        let fields = self.extractor.extract(message);
        info!(message_type = %fields.message_type, "Received message");
        let normalized = self.normalizer.normalize(fields, message);

        if !normalized.is_actionable() {
            debug!(message_id = %normalized.id, "Message has no content and no data, ignoring");
            return Ok(HandleOutcome::Ignored {
                message_id: normalized.id,
            });
        }

        let show = should_show_notification(&normalized, self.app_state.as_ref());
        let payload = BridgePayload::from_message(&normalized, show);
        debug!(
            message_id = %normalized.id,
            show_notification = show,
            data_keys = normalized.data.len(),
            "Dispatching message"
        );

        let notification_tag = if show {
            self.present(&normalized, &payload)
        } else {
            None
        };

        self.bridge
            .send_message(&payload)
            .context("failed to send message to app bridge")?;

        Ok(HandleOutcome::Dispatched {
            message_id: normalized.id,
            notification_tag,
        })
    }

    /// 发布系统通知；失败只上报，不影响投递
    fn present(&self, message: &NormalizedMessage, payload: &BridgePayload) -> Option<i32> {
        let descriptor = self.builder.build(message, payload);
        let result = self
            .registry
            .ensure_exists(&descriptor)
            .context("failed to ensure notification channel")
            .and_then(|_| {
                self.notifier
                    .notify(&descriptor)
                    .context("failed to post notification")
            });

        match result {
            Ok(()) => Some(descriptor.tag),
            Err(e) => {
                self.reporter.report("present_notification", &e);
                None
            }
        }
    }
}

//! 消息接收器 - 在通知流水线之前认领消息
//!
//! 接收器按注册顺序依次检查消息，第一个返回 `true` 的认领该消息，
//! 被认领的消息不再构建通知也不投递给应用。

use std::sync::Arc;
use tracing::{debug, info};

use crate::message::RemoteMessage;

/// 消息接收器
pub trait MessageReceiver: Send + Sync {
    /// 接收器名称（用于日志）
    fn name(&self) -> &str;

    /// 返回 `true` 表示已处理该消息
    fn on_message_received(&self, message: &RemoteMessage) -> bool;
}

/// 接收器管理
#[derive(Default)]
pub struct ReceiverManager {
    receivers: Vec<Arc<dyn MessageReceiver>>,
}

impl ReceiverManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册接收器
    pub fn register(&mut self, receiver: Arc<dyn MessageReceiver>) {
        info!(receiver = receiver.name(), "Registering message receiver");
        self.receivers.push(receiver);
    }

    /// 依次交给接收器，返回认领者名称
    pub fn offer(&self, message: &RemoteMessage) -> Option<&str> {
        for receiver in &self.receivers {
            if receiver.on_message_received(message) {
                debug!(receiver = receiver.name(), "Message was handled by a registered receiver");
                return Some(receiver.name());
            }
        }
        None
    }

    pub fn receiver_count(&self) -> usize {
        self.receivers.len()
    }
}

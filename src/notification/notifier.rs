//! 系统通知发布

use anyhow::Result;
use tracing::info;

use super::descriptor::NotificationDescriptor;
use super::store::{NotificationLog, NotificationRecord};

/// 系统通知发布原语（相同 tag 替换旧通知）
pub trait Notifier: Send + Sync {
    fn notify(&self, descriptor: &NotificationDescriptor) -> Result<()>;
}

/// 只记录日志的发布器，可选写入通知记录文件
#[derive(Debug, Clone, Default)]
pub struct LoggingNotifier {
    log: Option<NotificationLog>,
}

impl LoggingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_log(mut self, log: NotificationLog) -> Self {
        self.log = Some(log);
        self
    }
}

impl Notifier for LoggingNotifier {
    fn notify(&self, descriptor: &NotificationDescriptor) -> Result<()> {
        info!(
            tag = descriptor.tag,
            channel_id = %descriptor.channel.id,
            title = ?descriptor.title,
            body = ?descriptor.body,
            sound = ?descriptor.sound.as_ref().map(|s| s.uri()),
            priority = descriptor.priority.level(),
            visibility = descriptor.visibility.level(),
            extras = descriptor.extras.len(),
            "Posting notification"
        );

        if let Some(log) = &self.log {
            log.append(&NotificationRecord::from_descriptor(descriptor))?;
        }
        Ok(())
    }
}

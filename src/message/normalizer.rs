//! 消息规范化 - 候选字段 → `NormalizedMessage`
//!
//! ID 缺失时生成兜底 ID。兼容模式下兜底 ID 取自 1..=50，
//! 独立消息之间可能撞 ID（会互相替换通知），调用方不要依赖兜底 ID 唯一。

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::debug;

use super::extractor::{CandidateFields, Field, MessageType};
use super::remote::RemoteMessage;

/// 兼容模式兜底 ID 上限（含）
pub const COMPAT_FALLBACK_ID_MAX: u32 = 50;

/// 兜底 ID 生成策略
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FallbackIdPolicy {
    /// 1..=50 的随机数，与已部署版本一致
    #[default]
    Compat,
    /// UUID v4
    Unique,
}

impl FallbackIdPolicy {
    pub fn generate(&self) -> String {
        match self {
            FallbackIdPolicy::Compat => {
                let n = rand::rng().random_range(1..=COMPAT_FALLBACK_ID_MAX);
                n.to_string()
            }
            FallbackIdPolicy::Unique => uuid::Uuid::new_v4().to_string(),
        }
    }
}

/// 规范化后的消息，构造后不再修改
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NormalizedMessage {
    /// 非空
    pub id: String,
    pub message_type: MessageType,
    pub title: Option<String>,
    pub body: Option<String>,
    pub sound: Option<String>,
    pub vibrate: Option<String>,
    pub light: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    pub channel_id: Option<String>,
    pub visibility: Option<String>,
    pub priority: Option<String>,
    pub force_foreground: bool,
    pub from: Option<String>,
    pub collapse_key: Option<String>,
    pub sent_time: i64,
    pub ttl: i32,
    /// 原始 data 映射（包括未识别的 key）
    pub data: BTreeMap<String, String>,
}

impl NormalizedMessage {
    /// title 或 body 非空
    pub fn has_content(&self) -> bool {
        is_non_empty(&self.title) || is_non_empty(&self.body)
    }

    /// 有内容或有 data 时才值得继续处理
    pub fn is_actionable(&self) -> bool {
        self.has_content() || !self.data.is_empty()
    }
}

fn is_non_empty(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}

/// 消息规范化器
#[derive(Debug, Clone, Copy, Default)]
pub struct MessageNormalizer {
    fallback: FallbackIdPolicy,
}

impl MessageNormalizer {
    pub fn new(fallback: FallbackIdPolicy) -> Self {
        Self { fallback }
    }

    pub fn normalize(&self, mut fields: CandidateFields, message: &RemoteMessage) -> NormalizedMessage {
        let id = match fields.take(Field::Id) {
            Some(id) if !id.is_empty() => id,
            _ => self.fallback.generate(),
        };

        let normalized = NormalizedMessage {
            id,
            message_type: fields.message_type,
            title: fields.take(Field::Title),
            body: fields.take(Field::Body),
            sound: fields.take(Field::Sound),
            vibrate: fields.take(Field::Vibrate),
            light: fields.take(Field::Light),
            color: fields.take(Field::Color),
            icon: fields.take(Field::Icon),
            channel_id: fields.take(Field::ChannelId),
            visibility: fields.take(Field::Visibility),
            priority: fields.take(Field::Priority),
            force_foreground: fields.force_foreground,
            from: message.from.clone(),
            collapse_key: message.collapse_key.clone(),
            sent_time: message.sent_time,
            ttl: message.ttl,
            data: message.data.clone(),
        };

        debug!(
            message_id = %normalized.id,
            message_type = %normalized.message_type,
            from = ?normalized.from,
            title = ?normalized.title,
            body = ?normalized.body,
            sound = ?normalized.sound,
            vibrate = ?normalized.vibrate,
            light = ?normalized.light,
            color = ?normalized.color,
            icon = ?normalized.icon,
            channel_id = ?normalized.channel_id,
            visibility = ?normalized.visibility,
            priority = ?normalized.priority,
            "Normalized message"
        );

        normalized
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::extractor::FieldExtractor;
    use crate::message::remote::NotificationPayload;
    use crate::platform::PlatformCapabilities;

    fn normalize(msg: &RemoteMessage) -> NormalizedMessage {
        let fields = FieldExtractor::new(PlatformCapabilities::default()).extract(msg);
        MessageNormalizer::default().normalize(fields, msg)
    }

    #[test]
    fn test_compat_fallback_id_in_range() {
        for _ in 0..200 {
            let id = FallbackIdPolicy::Compat.generate();
            let n: u32 = id.parse().unwrap();
            assert!((1..=COMPAT_FALLBACK_ID_MAX).contains(&n), "id out of range: {}", id);
        }
    }

    #[test]
    fn test_unique_fallback_id() {
        let a = FallbackIdPolicy::Unique.generate();
        let b = FallbackIdPolicy::Unique.generate();
        assert_eq!(a.len(), 36);
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_id_gets_fallback() {
        let msg = RemoteMessage::new().with_data("notification_android_id", "");
        let normalized = normalize(&msg);
        assert!(!normalized.id.is_empty());
        assert!(normalized.id.chars().all(|c| c.is_ascii_digit()));
    }

    #[test]
    fn test_explicit_id_kept() {
        let msg = RemoteMessage::new()
            .with_message_id("provider-id")
            .with_notification(NotificationPayload::new().with_body("x"))
            .with_data("notification_android_id", "custom-id");
        assert_eq!(normalize(&msg).id, "custom-id");
    }

    #[test]
    fn test_data_carried_verbatim() {
        let msg = RemoteMessage::new()
            .with_from("/topics/a")
            .with_data("notification_title", "T")
            .with_data("order_id", "42");
        let normalized = normalize(&msg);

        assert_eq!(normalized.title.as_deref(), Some("T"));
        assert_eq!(normalized.data.len(), 2);
        assert_eq!(normalized.data.get("order_id").map(String::as_str), Some("42"));
        assert_eq!(normalized.from.as_deref(), Some("/topics/a"));
    }

    #[test]
    fn test_actionable() {
        let empty = normalize(&RemoteMessage::new());
        assert!(!empty.has_content());
        assert!(!empty.is_actionable());

        let data_only = normalize(&RemoteMessage::new().with_data("k", "v"));
        assert!(!data_only.has_content());
        assert!(data_only.is_actionable());

        let titled = normalize(&RemoteMessage::new().with_data("notification_title", "t"));
        assert!(titled.has_content());
    }
}

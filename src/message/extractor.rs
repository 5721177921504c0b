//! 字段提取 - 把两种 payload 形态展平成候选字段集合
//!
//! 提取按固定顺序进行：先结构化 payload，再 data 映射。
//! data 映射中出现的 key 总是覆盖结构化 payload 的同名字段（即使值为空字符串）。

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::remote::RemoteMessage;
use crate::platform::PlatformCapabilities;

/// 出现即表示"前台也要弹通知"
pub const FOREGROUND_KEY: &str = "notification_foreground";

/// 消息类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageType {
    /// 携带结构化 notification payload
    Notification,
    /// 只有 data payload
    Data,
}

impl MessageType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageType::Notification => "notification",
            MessageType::Data => "data",
        }
    }
}

impl fmt::Display for MessageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 可被两种 payload 设置的逻辑字段
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Field {
    Id,
    Title,
    Body,
    Sound,
    Vibrate,
    Light,
    Color,
    Icon,
    ChannelId,
    Visibility,
    Priority,
}

/// data key → 逻辑字段
///
/// 表顺序即写入顺序；每个字段只对应一个 key，所以顺序不影响结果。
pub const DATA_FIELD_TABLE: &[(&str, Field)] = &[
    ("notification_title", Field::Title),
    ("notification_body", Field::Body),
    ("notification_android_channel_id", Field::ChannelId),
    ("notification_android_id", Field::Id),
    ("notification_android_sound", Field::Sound),
    ("notification_android_vibrate", Field::Vibrate),
    ("notification_android_light", Field::Light),
    ("notification_android_color", Field::Color),
    ("notification_android_icon", Field::Icon),
    ("notification_android_visibility", Field::Visibility),
    ("notification_android_priority", Field::Priority),
];

/// 提取结果
#[derive(Debug, Clone, PartialEq)]
pub struct CandidateFields {
    pub message_type: MessageType,
    /// data 中带了 `notification_foreground`
    pub force_foreground: bool,
    values: BTreeMap<Field, String>,
}

impl CandidateFields {
    pub fn new(message_type: MessageType) -> Self {
        Self {
            message_type,
            force_foreground: false,
            values: BTreeMap::new(),
        }
    }

    pub fn get(&self, field: Field) -> Option<&str> {
        self.values.get(&field).map(String::as_str)
    }

    /// 取出字段（normalizer 用，避免 clone）
    pub fn take(&mut self, field: Field) -> Option<String> {
        self.values.remove(&field)
    }

    /// 写入字段；`None` 会清除之前的值
    pub fn set(&mut self, field: Field, value: Option<String>) {
        match value {
            Some(v) => {
                self.values.insert(field, v);
            }
            None => {
                self.values.remove(&field);
            }
        }
    }
}

/// 字段提取器
#[derive(Debug, Clone, Copy)]
pub struct FieldExtractor {
    capabilities: PlatformCapabilities,
}

impl FieldExtractor {
    pub fn new(capabilities: PlatformCapabilities) -> Self {
        Self { capabilities }
    }

    /// 提取候选字段，不会失败
    pub fn extract(&self, message: &RemoteMessage) -> CandidateFields {
        let mut fields = match &message.notification {
            Some(notification) => {
                let mut fields = CandidateFields::new(MessageType::Notification);
                // 旧平台上结构化 payload 的 channel id 没有意义
                let channel_id = if self.capabilities.uses_channels() {
                    notification.channel_id.clone()
                } else {
                    None
                };

                let structured = [
                    (Field::Id, message.message_id.clone()),
                    (Field::Title, notification.title.clone()),
                    (Field::Body, notification.body.clone()),
                    (Field::ChannelId, channel_id),
                    (Field::Sound, notification.sound.clone()),
                    (Field::Color, notification.color.clone()),
                    (Field::Icon, notification.icon.clone()),
                ];
                for (field, value) in structured {
                    fields.set(field, value);
                }
                fields
            }
            None => CandidateFields::new(MessageType::Data),
        };

        if message.data.contains_key(FOREGROUND_KEY) {
            fields.force_foreground = true;
        }

        for (key, field) in DATA_FIELD_TABLE {
            if let Some(value) = message.data.get(*key) {
                fields.set(*field, Some(value.clone()));
            }
        }

        fields
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::remote::NotificationPayload;

    fn extractor(sdk: u32) -> FieldExtractor {
        FieldExtractor::new(PlatformCapabilities::new(sdk))
    }

    #[test]
    fn test_data_only_message() {
        let msg = RemoteMessage::new()
            .with_message_id("ignored")
            .with_data("notification_body", "Hi");
        let fields = extractor(33).extract(&msg);

        assert_eq!(fields.message_type, MessageType::Data);
        assert_eq!(fields.get(Field::Body), Some("Hi"));
        // 没有结构化 payload 时不取 provider 的 message id
        assert_eq!(fields.get(Field::Id), None);
        assert!(!fields.force_foreground);
    }

    #[test]
    fn test_data_overrides_structured() {
        let msg = RemoteMessage::new()
            .with_notification(NotificationPayload::new().with_title("A").with_body("body"))
            .with_data("notification_title", "B");
        let fields = extractor(33).extract(&msg);

        assert_eq!(fields.message_type, MessageType::Notification);
        assert_eq!(fields.get(Field::Title), Some("B"));
        assert_eq!(fields.get(Field::Body), Some("body"));
    }

    #[test]
    fn test_empty_data_value_still_overrides() {
        let msg = RemoteMessage::new()
            .with_notification(NotificationPayload::new().with_title("A"))
            .with_data("notification_title", "");
        let fields = extractor(33).extract(&msg);
        assert_eq!(fields.get(Field::Title), Some(""));
    }

    #[test]
    fn test_structured_channel_id_requires_channel_platform() {
        let msg = RemoteMessage::new()
            .with_notification(NotificationPayload::new().with_channel_id("news"));

        assert_eq!(extractor(33).extract(&msg).get(Field::ChannelId), Some("news"));
        assert_eq!(extractor(25).extract(&msg).get(Field::ChannelId), None);

        // data 里的 channel id 不受平台限制
        let msg = msg.with_data("notification_android_channel_id", "alerts");
        assert_eq!(extractor(25).extract(&msg).get(Field::ChannelId), Some("alerts"));
    }

    #[test]
    fn test_foreground_flag_is_presence_based() {
        let msg = RemoteMessage::new().with_data(FOREGROUND_KEY, "false");
        assert!(extractor(33).extract(&msg).force_foreground);
    }

    #[test]
    fn test_all_recognized_keys_are_extracted() {
        let mut msg = RemoteMessage::new();
        for (key, _) in DATA_FIELD_TABLE {
            msg = msg.with_data(*key, format!("v-{}", key));
        }
        let fields = extractor(33).extract(&msg);
        for (key, field) in DATA_FIELD_TABLE {
            assert_eq!(fields.get(*field), Some(format!("v-{}", key).as_str()));
        }
    }
}

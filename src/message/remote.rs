//! Provider 投递的原始消息
//!
//! 一条消息可能同时携带两种 payload：
//! - 结构化的 `notification` payload（title/body/sound 等固定字段）
//! - 自由格式的 `data` 字符串映射
//!
//! JSON 格式：
//! ```json
//! {
//!   "message_id": "0:1700000000000000%abc",
//!   "from": "/topics/news",
//!   "collapse_key": "news",
//!   "sent_time": 1700000000000,
//!   "ttl": 2419200,
//!   "notification": { "title": "Hello", "body": "World" },
//!   "data": { "notification_android_light": "#FF00FF,1000,3000" }
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// 结构化 notification payload
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationPayload {
    pub title: Option<String>,
    pub body: Option<String>,
    pub sound: Option<String>,
    pub color: Option<String>,
    pub icon: Option<String>,
    #[serde(alias = "android_channel_id")]
    pub channel_id: Option<String>,
}

impl NotificationPayload {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }

    pub fn with_sound(mut self, sound: impl Into<String>) -> Self {
        self.sound = Some(sound.into());
        self
    }

    pub fn with_channel_id(mut self, channel_id: impl Into<String>) -> Self {
        self.channel_id = Some(channel_id.into());
        self
    }
}

/// 一条收到的推送消息
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteMessage {
    /// Provider 分配的消息 ID
    pub message_id: Option<String>,
    /// 发送方（sender id 或 topic）
    pub from: Option<String>,
    pub collapse_key: Option<String>,
    /// 发送时间（毫秒时间戳）
    pub sent_time: i64,
    /// 存活时间（秒）
    pub ttl: i32,
    /// 结构化 payload
    pub notification: Option<NotificationPayload>,
    /// data payload
    pub data: BTreeMap<String, String>,
}

impl RemoteMessage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_message_id(mut self, id: impl Into<String>) -> Self {
        self.message_id = Some(id.into());
        self
    }

    pub fn with_from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    pub fn with_notification(mut self, notification: NotificationPayload) -> Self {
        self.notification = Some(notification);
        self
    }

    /// 追加一个 data 键值
    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }
}

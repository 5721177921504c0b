//! 应用桥接 - 把规范化消息和 token 交给宿主应用
//!
//! 每条收到的消息无论是否弹出通知都会投递一次。
//! 投递记录是扁平的字符串映射：先放入原始 data 的全部键值，
//! 再追加派生字段（已存在的 key 不覆盖，`messageType` 除外）。

use anyhow::Result;
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::sync::Mutex;

use crate::message::NormalizedMessage;

/// 投递记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct BridgePayload(BTreeMap<String, String>);

impl BridgePayload {
    pub fn new() -> Self {
        Self::default()
    }

    /// 从规范化消息构建
    pub fn from_message(message: &NormalizedMessage, show_notification: bool) -> Self {
        let mut payload = Self(message.data.clone());

        payload.insert("messageType", message.message_type.as_str());
        payload.insert_if_absent("id", Some(message.id.as_str()));
        payload.insert_if_absent("title", message.title.as_deref());
        payload.insert_if_absent("body", message.body.as_deref());
        payload.insert_if_absent("sound", message.sound.as_deref());
        payload.insert_if_absent("vibrate", message.vibrate.as_deref());
        payload.insert_if_absent("light", message.light.as_deref());
        payload.insert_if_absent("color", message.color.as_deref());
        payload.insert_if_absent("icon", message.icon.as_deref());
        payload.insert_if_absent("channel_id", message.channel_id.as_deref());
        payload.insert_if_absent("priority", message.priority.as_deref());
        payload.insert_if_absent("visibility", message.visibility.as_deref());
        payload.insert_if_absent("show_notification", Some(show_notification.to_string().as_str()));
        payload.insert_if_absent("from", message.from.as_deref());
        payload.insert_if_absent("collapse_key", message.collapse_key.as_deref());
        payload.insert_if_absent("sent_time", Some(message.sent_time.to_string().as_str()));
        payload.insert_if_absent("ttl", Some(message.ttl.to_string().as_str()));

        payload
    }

    /// 写入（覆盖）
    pub fn insert(&mut self, key: &str, value: &str) {
        self.0.insert(key.to_string(), value.to_string());
    }

    /// 值非空且 key 不存在时写入
    pub fn insert_if_absent(&mut self, key: &str, value: Option<&str>) {
        if let Some(value) = value {
            self.0
                .entry(key.to_string())
                .or_insert_with(|| value.to_string());
        }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// 宿主应用桥接
pub trait AppBridge: Send + Sync {
    /// 投递一条消息
    fn send_message(&self, payload: &BridgePayload) -> Result<()>;

    /// 投递新的（轮换后的）token
    fn send_token(&self, token: &str) -> Result<()>;
}

/// 按行输出 JSON 的桥接（CLI 使用）
///
/// ```text
/// {"event":"message","payload":{"id":"1","messageType":"data",...}}
/// {"event":"token","token":"abc"}
/// ```
pub struct JsonLinesBridge<W: Write + Send> {
    writer: Mutex<W>,
}

#[derive(Serialize)]
#[serde(tag = "event", rename_all = "lowercase")]
enum BridgeEvent<'a> {
    Message { payload: &'a BridgePayload },
    Token { token: &'a str },
}

impl<W: Write + Send> JsonLinesBridge<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer: Mutex::new(writer),
        }
    }

    /// 取回 writer（测试用）
    pub fn into_inner(self) -> W {
        match self.writer.into_inner() {
            Ok(w) => w,
            Err(poisoned) => poisoned.into_inner(),
        }
    }

    fn write_event(&self, event: &BridgeEvent<'_>) -> Result<()> {
        let line = serde_json::to_string(event)?;
        let mut writer = self
            .writer
            .lock()
            .map_err(|_| anyhow::anyhow!("bridge writer lock poisoned"))?;
        writeln!(writer, "{}", line)?;
        writer.flush()?;
        Ok(())
    }
}

impl<W: Write + Send> AppBridge for JsonLinesBridge<W> {
    fn send_message(&self, payload: &BridgePayload) -> Result<()> {
        self.write_event(&BridgeEvent::Message { payload })
    }

    fn send_token(&self, token: &str) -> Result<()> {
        self.write_event(&BridgeEvent::Token { token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{FieldExtractor, MessageNormalizer, NotificationPayload, RemoteMessage};
    use crate::platform::PlatformCapabilities;

    fn normalize(msg: &RemoteMessage) -> NormalizedMessage {
        let fields = FieldExtractor::new(PlatformCapabilities::default()).extract(msg);
        MessageNormalizer::default().normalize(fields, msg)
    }

    #[test]
    fn test_payload_contains_data_and_derived_fields() {
        let msg = RemoteMessage::new()
            .with_message_id("m-1")
            .with_from("123")
            .with_notification(NotificationPayload::new().with_title("Hello"))
            .with_data("order_id", "42");
        let payload = BridgePayload::from_message(&normalize(&msg), true);

        assert_eq!(payload.get("order_id"), Some("42"));
        assert_eq!(payload.get("messageType"), Some("notification"));
        assert_eq!(payload.get("id"), Some("m-1"));
        assert_eq!(payload.get("title"), Some("Hello"));
        assert_eq!(payload.get("show_notification"), Some("true"));
        assert_eq!(payload.get("from"), Some("123"));
        assert_eq!(payload.get("sent_time"), Some("0"));
        assert_eq!(payload.get("ttl"), Some("0"));
        // 空值不写入
        assert!(!payload.contains_key("body"));
        assert!(!payload.contains_key("collapse_key"));
    }

    #[test]
    fn test_raw_data_key_wins() {
        let msg = RemoteMessage::new()
            .with_data("notification_title", "T")
            .with_data("title", "raw title")
            .with_data("show_notification", "raw");
        let payload = BridgePayload::from_message(&normalize(&msg), false);

        assert_eq!(payload.get("title"), Some("raw title"));
        assert_eq!(payload.get("show_notification"), Some("raw"));
    }

    #[test]
    fn test_message_type_always_overwritten() {
        let msg = RemoteMessage::new().with_data("messageType", "custom");
        let payload = BridgePayload::from_message(&normalize(&msg), false);
        assert_eq!(payload.get("messageType"), Some("data"));
    }

    #[test]
    fn test_json_lines_bridge_output() {
        let bridge = JsonLinesBridge::new(Vec::new());
        let mut payload = BridgePayload::new();
        payload.insert("id", "7");
        bridge.send_message(&payload).unwrap();
        bridge.send_token("tok").unwrap();

        let out = String::from_utf8(bridge.into_inner()).unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);

        let first: serde_json::Value = serde_json::from_str(lines[0]).unwrap();
        assert_eq!(first["event"], "message");
        assert_eq!(first["payload"]["id"], "7");

        let second: serde_json::Value = serde_json::from_str(lines[1]).unwrap();
        assert_eq!(second["event"], "token");
        assert_eq!(second["token"], "tok");
    }
}

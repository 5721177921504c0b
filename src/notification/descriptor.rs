//! 通知描述符 - 构建一条系统通知所需的全部已解析属性

use serde::{Deserialize, Serialize};

use super::channel::Channel;
use super::pattern::LightPattern;
use crate::bridge::BridgePayload;

/// 系统默认通知提示音 URI
pub const DEFAULT_SOUND_URI: &str = "content://settings/system/notification_sound";

/// 提示音
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "uri", rename_all = "lowercase")]
pub enum SoundUri {
    /// 系统默认提示音
    Default,
    /// 应用内置提示音
    Resource(String),
}

impl SoundUri {
    pub fn uri(&self) -> &str {
        match self {
            SoundUri::Default => DEFAULT_SOUND_URI,
            SoundUri::Resource(uri) => uri,
        }
    }
}

/// 通知优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Min,
    Low,
    Default,
    High,
    Max,
}

impl Priority {
    /// 解析 `-2..=2` 或名称；无法识别返回 `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "-2" | "min" => Some(Priority::Min),
            "-1" | "low" => Some(Priority::Low),
            "0" | "default" => Some(Priority::Default),
            "1" | "high" => Some(Priority::High),
            "2" | "max" => Some(Priority::Max),
            _ => None,
        }
    }

    /// 平台数值
    pub fn level(&self) -> i8 {
        match self {
            Priority::Min => -2,
            Priority::Low => -1,
            Priority::Default => 0,
            Priority::High => 1,
            Priority::Max => 2,
        }
    }
}

/// 锁屏可见性
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Visibility {
    Secret,
    Private,
    Public,
}

impl Visibility {
    /// 解析 `-1|0|1` 或名称；无法识别返回 `None`
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "-1" | "secret" => Some(Visibility::Secret),
            "0" | "private" => Some(Visibility::Private),
            "1" | "public" => Some(Visibility::Public),
            _ => None,
        }
    }

    pub fn level(&self) -> i8 {
        match self {
            Visibility::Secret => -1,
            Visibility::Private => 0,
            Visibility::Public => 1,
        }
    }
}

/// 通知描述符，只在构建一条系统通知期间存在
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotificationDescriptor {
    /// 由消息 ID 派生，相同 ID 替换旧通知
    pub tag: i32,
    pub channel: Channel,
    pub title: Option<String>,
    /// 同时作为 big-text 样式内容
    pub body: Option<String>,
    /// `None` 表示不覆盖提示音
    pub sound: Option<SoundUri>,
    pub vibrate: Option<Vec<u64>>,
    pub light: Option<LightPattern>,
    /// 强调色（ARGB）
    pub color: Option<u32>,
    pub small_icon: Option<String>,
    /// content view 大图标
    pub content_icon: Option<String>,
    pub priority: Priority,
    pub visibility: Visibility,
    pub auto_cancel: bool,
    /// 点击通知时回传给应用的数据
    pub extras: BridgePayload,
}

impl NotificationDescriptor {
    /// 只有 tag 和 channel 的最简描述符
    pub fn new(tag: i32, channel: Channel) -> Self {
        Self {
            tag,
            channel,
            title: None,
            body: None,
            sound: None,
            vibrate: None,
            light: None,
            color: None,
            small_icon: None,
            content_icon: None,
            priority: Priority::Max,
            visibility: Visibility::Public,
            auto_cancel: true,
            extras: BridgePayload::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_priority_parse() {
        assert_eq!(Priority::parse("2"), Some(Priority::Max));
        assert_eq!(Priority::parse(" HIGH "), Some(Priority::High));
        assert_eq!(Priority::parse("-2"), Some(Priority::Min));
        assert_eq!(Priority::parse("urgent"), None);
        assert_eq!(Priority::Low.level(), -1);
    }

    #[test]
    fn test_visibility_parse() {
        assert_eq!(Visibility::parse("-1"), Some(Visibility::Secret));
        assert_eq!(Visibility::parse("private"), Some(Visibility::Private));
        assert_eq!(Visibility::parse("2"), None);
        assert_eq!(Visibility::Public.level(), 1);
    }

    #[test]
    fn test_sound_uri() {
        assert_eq!(SoundUri::Default.uri(), DEFAULT_SOUND_URI);
        assert_eq!(SoundUri::Resource("android.resource://p/raw/x".into()).uri(), "android.resource://p/raw/x");
    }
}

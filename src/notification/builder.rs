//! 通知构建器 - `NormalizedMessage` → `NotificationDescriptor`
//!
//! 解析顺序：
//! 1. channel：消息未指定时使用应用默认 channel
//! 2. 提示音：只在没有 channel 的旧平台按消息解析，新平台由 channel 决定
//! 3. 呼吸灯：`"<color>,<onMs>,<offMs>"`，格式错误忽略
//! 4. 强调色：取应用主题色 `accent`
//! 5. 优先级/可见性：消息提供则沿用，否则 `Max` / `Public`

use std::sync::Arc;
use tracing::{debug, warn};

use super::channel::Channel;
use super::descriptor::{NotificationDescriptor, Priority, SoundUri, Visibility};
use super::pattern::{parse_vibrate_pattern, LightPattern};
use super::resource::{Resource, ResourceKind, ResourceResolver};
use super::tag::notification_tag;
use crate::bridge::BridgePayload;
use crate::message::NormalizedMessage;
use crate::platform::PlatformCapabilities;

/// 默认 channel 的资源名
pub const DEFAULT_CHANNEL_ID_RESOURCE: &str = "default_notification_channel_id";
pub const DEFAULT_CHANNEL_NAME_RESOURCE: &str = "default_notification_channel_name";
/// 强调色资源名
pub const ACCENT_COLOR_RESOURCE: &str = "accent";
/// content view 大图标资源名
pub const CONTENT_ICON_RESOURCE: &str = "notification_big";

/// 资源中没有定义时使用的默认 channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelDefaults {
    pub id: String,
    pub name: String,
}

/// 通知构建器
pub struct NotificationBuilder {
    capabilities: PlatformCapabilities,
    resources: Arc<dyn ResourceResolver>,
    defaults: ChannelDefaults,
}

impl NotificationBuilder {
    pub fn new(
        capabilities: PlatformCapabilities,
        resources: Arc<dyn ResourceResolver>,
        defaults: ChannelDefaults,
    ) -> Self {
        Self {
            capabilities,
            resources,
            defaults,
        }
    }

    /// 构建描述符；`extras` 是点击通知时回传的投递记录
    pub fn build(&self, message: &NormalizedMessage, extras: &BridgePayload) -> NotificationDescriptor {
        let light = message.light.as_deref().and_then(|raw| {
            let parsed = LightPattern::parse(raw);
            if parsed.is_none() {
                debug!(message_id = %message.id, light = raw, "Ignoring malformed light pattern");
            }
            parsed
        });

        let channel = self
            .resolve_channel(message.channel_id.as_deref())
            .with_light_color(light.map(|l| l.argb));

        let mut descriptor = NotificationDescriptor::new(notification_tag(&message.id), channel);
        descriptor.title = message.title.clone();
        descriptor.body = message.body.clone();
        descriptor.light = light;
        descriptor.extras = extras.clone();

        // 新平台上声音和振动由 channel 决定
        if !self.capabilities.uses_channels() {
            descriptor.sound = self.resolve_sound(message.sound.as_deref());
            descriptor.vibrate = message.vibrate.as_deref().and_then(parse_vibrate_pattern);
        }

        if self.capabilities.supports_accent_color() {
            descriptor.color = self.resources.color(ACCENT_COLOR_RESOURCE);
        }

        descriptor.small_icon = message
            .icon
            .as_deref()
            .filter(|name| !name.is_empty())
            .and_then(|name| self.drawable(name));

        if self.capabilities.supports_custom_content_view() {
            descriptor.content_icon = self.drawable(CONTENT_ICON_RESOURCE);
        }

        descriptor.priority = message
            .priority
            .as_deref()
            .and_then(Priority::parse)
            .unwrap_or(Priority::Max);
        descriptor.visibility = message
            .visibility
            .as_deref()
            .and_then(Visibility::parse)
            .unwrap_or(Visibility::Public);

        debug!(
            message_id = %message.id,
            tag = descriptor.tag,
            channel_id = %descriptor.channel.id,
            sound = ?descriptor.sound,
            priority = ?descriptor.priority,
            "Built notification descriptor"
        );

        descriptor
    }

    /// 消息指定的 channel 或应用默认 channel
    fn resolve_channel(&self, channel_id: Option<&str>) -> Channel {
        let default_id = self
            .resources
            .string(DEFAULT_CHANNEL_ID_RESOURCE)
            .unwrap_or_else(|| self.defaults.id.clone());
        let default_name = self
            .resources
            .string(DEFAULT_CHANNEL_NAME_RESOURCE)
            .unwrap_or_else(|| self.defaults.name.clone());

        match channel_id.filter(|id| !id.is_empty()) {
            Some(id) if id != default_id => Channel::high_importance(id, id),
            _ => Channel::high_importance(default_id, default_name),
        }
    }

    fn resolve_sound(&self, sound: Option<&str>) -> Option<SoundUri> {
        match sound? {
            "" => None,
            "default" => Some(SoundUri::Default),
            name => match self.resources.resolve(ResourceKind::Sound, name) {
                Some(Resource::Sound(uri)) => Some(SoundUri::Resource(uri)),
                _ => {
                    warn!(sound = name, "Sound resource not found, using no sound override");
                    None
                }
            },
        }
    }

    fn drawable(&self, name: &str) -> Option<String> {
        match self.resources.resolve(ResourceKind::Drawable, name)? {
            Resource::Drawable(d) => Some(d),
            _ => None,
        }
    }
}

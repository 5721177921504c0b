//! 平台能力 - 根据系统版本决定通知特性走 channel 还是单条通知字段

use serde::{Deserialize, Serialize};

/// 支持自定义 content view 图标的最低版本 (Lollipop)
pub const SDK_CUSTOM_CONTENT_VIEW: u32 = 21;
/// 支持通知强调色的最低版本 (Marshmallow)
pub const SDK_ACCENT_COLOR: u32 = 23;
/// 必须显式创建通知 channel 的最低版本 (Oreo)
pub const SDK_NOTIFICATION_CHANNELS: u32 = 26;

/// 默认按较新的平台处理
pub const DEFAULT_SDK_LEVEL: u32 = 33;

/// 平台能力
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlatformCapabilities {
    /// 系统 SDK 版本
    pub sdk_level: u32,
}

impl PlatformCapabilities {
    pub fn new(sdk_level: u32) -> Self {
        Self { sdk_level }
    }

    /// channel 控制声音/振动/呼吸灯，且消息可以携带 channel id
    pub fn uses_channels(&self) -> bool {
        self.sdk_level >= SDK_NOTIFICATION_CHANNELS
    }

    pub fn supports_accent_color(&self) -> bool {
        self.sdk_level >= SDK_ACCENT_COLOR
    }

    pub fn supports_custom_content_view(&self) -> bool {
        self.sdk_level >= SDK_CUSTOM_CONTENT_VIEW
    }
}

impl Default for PlatformCapabilities {
    fn default() -> Self {
        Self::new(DEFAULT_SDK_LEVEL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_capability_thresholds() {
        let legacy = PlatformCapabilities::new(22);
        assert!(!legacy.uses_channels());
        assert!(!legacy.supports_accent_color());
        assert!(legacy.supports_custom_content_view());

        let oreo = PlatformCapabilities::new(26);
        assert!(oreo.uses_channels());
        assert!(oreo.supports_accent_color());

        assert!(!PlatformCapabilities::new(19).supports_custom_content_view());
    }

    #[test]
    fn test_default_is_channel_capable() {
        assert!(PlatformCapabilities::default().uses_channels());
    }
}

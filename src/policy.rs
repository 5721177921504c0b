//! 显示策略 - 决定是否弹出系统通知
//!
//! 应用在前台且自己注册了通知回调时不弹系统通知，避免重复展示；
//! 消息带 `notification_foreground` 时强制弹出。

use crate::message::NormalizedMessage;

/// 应用当前状态（由宿主应用提供）
pub trait AppState: Send + Sync {
    /// 应用是否在后台
    fn in_background(&self) -> bool;

    /// 应用是否注册了自己处理通知的回调
    fn has_notification_handler(&self) -> bool;
}

/// 固定值的应用状态
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AppStateSnapshot {
    pub in_background: bool,
    pub has_notification_handler: bool,
}

impl AppState for AppStateSnapshot {
    fn in_background(&self) -> bool {
        self.in_background
    }

    fn has_notification_handler(&self) -> bool {
        self.has_notification_handler
    }
}

/// 是否显示系统通知
pub fn should_show_notification(message: &NormalizedMessage, state: &dyn AppState) -> bool {
    message.has_content()
        && (state.in_background() || !state.has_notification_handler() || message.force_foreground)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::{FieldExtractor, MessageNormalizer, RemoteMessage, FOREGROUND_KEY};
    use crate::platform::PlatformCapabilities;

    fn message(title: &str, body: &str, foreground: bool) -> NormalizedMessage {
        let mut msg = RemoteMessage::new()
            .with_data("notification_title", title)
            .with_data("notification_body", body);
        if foreground {
            msg = msg.with_data(FOREGROUND_KEY, "1");
        }
        let fields = FieldExtractor::new(PlatformCapabilities::default()).extract(&msg);
        MessageNormalizer::default().normalize(fields, &msg)
    }

    fn state(in_background: bool, has_notification_handler: bool) -> AppStateSnapshot {
        AppStateSnapshot {
            in_background,
            has_notification_handler,
        }
    }

    #[test]
    fn test_background_shows() {
        assert!(should_show_notification(&message("", "Hi", false), &state(true, true)));
    }

    #[test]
    fn test_foreground_with_handler_suppresses() {
        assert!(!should_show_notification(&message("", "Hi", false), &state(false, true)));
    }

    #[test]
    fn test_foreground_without_handler_shows() {
        assert!(should_show_notification(&message("Hi", "", false), &state(false, false)));
    }

    #[test]
    fn test_force_foreground_overrides_suppression() {
        assert!(should_show_notification(&message("", "Hi", true), &state(false, true)));
    }

    #[test]
    fn test_no_content_never_shows() {
        for (bg, handler) in [(true, true), (true, false), (false, false), (false, true)] {
            assert!(!should_show_notification(&message("", "", true), &state(bg, handler)));
        }
    }
}

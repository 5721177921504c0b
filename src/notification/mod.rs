//! 通知构建层 - 从规范化消息到系统通知
//!
//! # 组成
//! 1. `NotificationBuilder`：消息 + 平台能力 → `NotificationDescriptor`
//! 2. `ChannelRegistry`：保证描述符引用的 channel 已创建（create-once）
//! 3. `Notifier`：把描述符发布为系统通知
//!
//! # 使用示例
//! ```ignore
//! use push_notify_handler::notification::{ChannelRegistry, NotificationBuilder};
//!
//! let descriptor = builder.build(&message, &extras);
//! registry.ensure_exists(&descriptor)?;
//! notifier.notify(&descriptor)?;
//! ```

pub mod builder;
pub mod channel;
pub mod descriptor;
pub mod notifier;
pub mod pattern;
pub mod resource;
pub mod store;
pub mod tag;

pub use builder::{ChannelDefaults, NotificationBuilder};
pub use channel::{Channel, ChannelRegistry, ChannelState, ChannelStore, EnsureOutcome, Importance};
pub use descriptor::{NotificationDescriptor, Priority, SoundUri, Visibility};
pub use notifier::{LoggingNotifier, Notifier};
pub use pattern::{parse_color, parse_vibrate_pattern, LightPattern};
pub use resource::{Resource, ResourceKind, ResourceResolver, ResourceTable, StaticResources};
pub use store::{FileChannelStore, InMemoryChannelStore, NotificationLog, NotificationRecord};
pub use tag::notification_tag;

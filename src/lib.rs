//! Push Notify Handler - 把云推送消息规范化为系统通知并投递给宿主应用

pub mod bridge;
pub mod config;
pub mod message;
pub mod notification;
pub mod platform;
pub mod policy;
pub mod receiver;
pub mod reporter;
pub mod service;

pub use bridge::{AppBridge, BridgePayload, JsonLinesBridge};
pub use config::HandlerConfig;
pub use message::{FallbackIdPolicy, MessageType, NormalizedMessage, NotificationPayload, RemoteMessage};
pub use notification::{
    Channel, ChannelRegistry, ChannelStore, FileChannelStore, InMemoryChannelStore, LoggingNotifier,
    NotificationBuilder, NotificationDescriptor, NotificationLog, Notifier, ResourceResolver,
};
pub use platform::PlatformCapabilities;
pub use policy::{should_show_notification, AppState, AppStateSnapshot};
pub use receiver::{MessageReceiver, ReceiverManager};
pub use reporter::{ErrorReporter, TracingReporter};
pub use service::{Collaborators, HandleOutcome, MessagingService};

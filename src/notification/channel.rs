//! 通知 channel 注册 - 同一 channel id 只创建一次
//!
//! 状态机：`Unknown` → `Registered`，没有删除和修改。
//! "哪些 channel 已存在" 以 `ChannelStore`（系统通知子系统）为准，进程内不缓存，
//! 并发调用下的 list/create 由 store 自己保证串行。

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info};

use super::descriptor::NotificationDescriptor;
use crate::platform::PlatformCapabilities;

/// channel 重要程度
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Importance {
    None,
    Min,
    Low,
    Default,
    High,
}

/// 通知 channel
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Channel {
    pub id: String,
    /// 显示名称
    pub name: String,
    pub importance: Importance,
    pub enable_lights: bool,
    pub enable_vibration: bool,
    pub show_badge: bool,
    /// 呼吸灯颜色（ARGB）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub light_color: Option<u32>,
}

impl Channel {
    /// 高优先级 channel：开启呼吸灯、振动和角标
    pub fn high_importance(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            importance: Importance::High,
            enable_lights: true,
            enable_vibration: true,
            show_badge: true,
            light_color: None,
        }
    }

    pub fn with_light_color(mut self, light_color: Option<u32>) -> Self {
        self.light_color = light_color;
        self
    }
}

/// channel 存储（系统通知子系统的 channel 查询/创建原语）
pub trait ChannelStore: Send + Sync {
    /// 列出已存在的 channel
    fn list(&self) -> Result<Vec<Channel>>;

    /// 创建 channel
    fn create(&self, channel: &Channel) -> Result<()>;
}

/// channel 状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChannelState {
    /// 从未见过
    Unknown,
    /// 已在系统中创建
    Registered,
}

/// `ensure_exists` 的结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EnsureOutcome {
    /// 本次新建
    Created,
    /// 已存在，无操作
    AlreadyRegistered,
    /// 旧平台没有 channel
    NotApplicable,
}

/// channel 注册表
pub struct ChannelRegistry {
    store: Arc<dyn ChannelStore>,
    capabilities: PlatformCapabilities,
}

impl ChannelRegistry {
    pub fn new(store: Arc<dyn ChannelStore>, capabilities: PlatformCapabilities) -> Self {
        Self { store, capabilities }
    }

    /// 查询 channel 当前状态
    pub fn state(&self, channel_id: &str) -> Result<ChannelState> {
        let exists = self.store.list()?.iter().any(|c| c.id == channel_id);
        Ok(if exists {
            ChannelState::Registered
        } else {
            ChannelState::Unknown
        })
    }

    /// 确保描述符引用的 channel 存在（幂等）
    pub fn ensure_exists(&self, descriptor: &NotificationDescriptor) -> Result<EnsureOutcome> {
        if !self.capabilities.uses_channels() {
            return Ok(EnsureOutcome::NotApplicable);
        }

        let channel = &descriptor.channel;
        match self.state(&channel.id)? {
            ChannelState::Registered => {
                debug!(channel_id = %channel.id, "Notification channel already registered");
                Ok(EnsureOutcome::AlreadyRegistered)
            }
            ChannelState::Unknown => {
                self.store.create(channel)?;
                info!(
                    channel_id = %channel.id,
                    name = %channel.name,
                    light_color = ?channel.light_color.map(|c| format!("{:08X}", c)),
                    "Created notification channel"
                );
                Ok(EnsureOutcome::Created)
            }
        }
    }
}

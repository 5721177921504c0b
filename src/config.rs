//! 配置加载
//!
//! 配置文件 `~/.config/push-notify-handler/config.json`（JSON 格式），所有字段可省略：
//! ```json
//! {
//!   "package_name": "com.example.app",
//!   "default_channel_id": "fcm_default_channel",
//!   "default_channel_name": "Default",
//!   "sdk_level": 33,
//!   "fallback_id": "compat",
//!   "resources": {
//!     "colors": { "accent": "#3F51B5" },
//!     "drawables": ["notification_big"],
//!     "sounds": ["chime"]
//!   }
//! }
//! ```

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::message::FallbackIdPolicy;
use crate::notification::{ChannelDefaults, ResourceTable, StaticResources};
use crate::platform::{PlatformCapabilities, DEFAULT_SDK_LEVEL};

/// 配置目录名
pub const APP_DIR: &str = "push-notify-handler";

pub const DEFAULT_PACKAGE_NAME: &str = "com.example.app";
pub const DEFAULT_CHANNEL_ID: &str = "fcm_default_channel";
pub const DEFAULT_CHANNEL_NAME: &str = "Default";

/// Handler 配置
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HandlerConfig {
    /// 应用包名，用于拼接内置提示音 URI
    pub package_name: String,
    pub default_channel_id: String,
    pub default_channel_name: String,
    /// 平台 SDK 版本
    pub sdk_level: u32,
    /// 兜底 ID 策略
    pub fallback_id: FallbackIdPolicy,
    pub resources: ResourceTable,
    /// channel 存储文件（默认在配置目录下）
    pub channel_store_path: Option<PathBuf>,
    /// 通知记录文件（默认在配置目录下）
    pub notification_log_path: Option<PathBuf>,
}

impl Default for HandlerConfig {
    fn default() -> Self {
        Self {
            package_name: DEFAULT_PACKAGE_NAME.to_string(),
            default_channel_id: DEFAULT_CHANNEL_ID.to_string(),
            default_channel_name: DEFAULT_CHANNEL_NAME.to_string(),
            sdk_level: DEFAULT_SDK_LEVEL,
            fallback_id: FallbackIdPolicy::default(),
            resources: ResourceTable::default(),
            channel_store_path: None,
            notification_log_path: None,
        }
    }
}

impl HandlerConfig {
    /// 配置目录 `~/.config/push-notify-handler`
    pub fn config_dir() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".config")
            .join(APP_DIR)
    }

    /// 从默认位置加载，文件不存在时使用默认配置
    pub fn auto_load() -> Result<Self> {
        let path = Self::config_dir().join("config.json");
        if !path.exists() {
            debug!(path = %path.display(), "Config file not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// 从指定文件加载
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("invalid config {}", path.display()))?;
        debug!(path = %path.display(), sdk_level = config.sdk_level, "Loaded config");
        Ok(config)
    }

    pub fn capabilities(&self) -> PlatformCapabilities {
        PlatformCapabilities::new(self.sdk_level)
    }

    pub fn channel_defaults(&self) -> ChannelDefaults {
        ChannelDefaults {
            id: self.default_channel_id.clone(),
            name: self.default_channel_name.clone(),
        }
    }

    pub fn static_resources(&self) -> StaticResources {
        StaticResources::new(self.package_name.clone(), self.resources.clone())
    }

    pub fn channel_store_path(&self) -> PathBuf {
        self.channel_store_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("channels.json"))
    }

    pub fn notification_log_path(&self) -> PathBuf {
        self.notification_log_path
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("notifications.jsonl"))
    }
}

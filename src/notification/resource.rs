//! 应用资源解析 - 按名称查找字符串、颜色、图标和提示音
//!
//! 构建通知时所有资源都通过 `ResourceResolver` 查找，和具体平台资源系统解耦。

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

use super::pattern::parse_color;

/// 资源类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ResourceKind {
    String,
    Color,
    Drawable,
    Sound,
}

/// 解析出的资源
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum Resource {
    Text(String),
    /// ARGB
    Color(u32),
    /// drawable 名称
    Drawable(String),
    /// 提示音 URI
    Sound(String),
}

/// 资源解析接口，找不到返回 `None`
pub trait ResourceResolver: Send + Sync {
    fn resolve(&self, kind: ResourceKind, name: &str) -> Option<Resource>;

    fn string(&self, name: &str) -> Option<String> {
        match self.resolve(ResourceKind::String, name)? {
            Resource::Text(s) => Some(s),
            _ => None,
        }
    }

    fn color(&self, name: &str) -> Option<u32> {
        match self.resolve(ResourceKind::Color, name)? {
            Resource::Color(argb) => Some(argb),
            _ => None,
        }
    }
}

/// 资源表（配置文件中的 `resources` 段）
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResourceTable {
    pub strings: BTreeMap<String, String>,
    /// 名称 → `#RRGGBB` / `#AARRGGBB`
    pub colors: BTreeMap<String, String>,
    pub drawables: BTreeSet<String>,
    /// 应用内置的提示音名称（raw 资源）
    pub sounds: BTreeSet<String>,
}

/// 基于静态资源表的解析器
#[derive(Debug, Clone)]
pub struct StaticResources {
    package_name: String,
    table: ResourceTable,
}

impl StaticResources {
    pub fn new(package_name: impl Into<String>, table: ResourceTable) -> Self {
        Self {
            package_name: package_name.into(),
            table,
        }
    }

    /// 应用内置提示音的 URI
    pub fn sound_uri(&self, name: &str) -> String {
        format!("android.resource://{}/raw/{}", self.package_name, name)
    }
}

impl ResourceResolver for StaticResources {
    fn resolve(&self, kind: ResourceKind, name: &str) -> Option<Resource> {
        match kind {
            ResourceKind::String => self.table.strings.get(name).cloned().map(Resource::Text),
            ResourceKind::Color => self
                .table
                .colors
                .get(name)
                .and_then(|c| parse_color(c))
                .map(Resource::Color),
            ResourceKind::Drawable => self
                .table
                .drawables
                .contains(name)
                .then(|| Resource::Drawable(name.to_string())),
            ResourceKind::Sound => self
                .table
                .sounds
                .contains(name)
                .then(|| Resource::Sound(self.sound_uri(name))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn resources() -> StaticResources {
        let mut table = ResourceTable::default();
        table.strings.insert("app_name".into(), "Demo".into());
        table.colors.insert("accent".into(), "#3F51B5".into());
        table.colors.insert("broken".into(), "nope".into());
        table.drawables.insert("notification_big".into());
        table.sounds.insert("chime".into());
        StaticResources::new("com.example.app", table)
    }

    #[test]
    fn test_resolve_each_kind() {
        let r = resources();
        assert_eq!(r.string("app_name").as_deref(), Some("Demo"));
        assert_eq!(r.color("accent"), Some(0xFF3F51B5));
        assert_eq!(
            r.resolve(ResourceKind::Drawable, "notification_big"),
            Some(Resource::Drawable("notification_big".into()))
        );
        assert_eq!(
            r.resolve(ResourceKind::Sound, "chime"),
            Some(Resource::Sound("android.resource://com.example.app/raw/chime".into()))
        );
    }

    #[test]
    fn test_missing_resources() {
        let r = resources();
        assert_eq!(r.string("missing"), None);
        assert_eq!(r.color("broken"), None);
        assert_eq!(r.resolve(ResourceKind::Sound, "app_name"), None);
    }
}

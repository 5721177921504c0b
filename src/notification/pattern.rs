//! 颜色、呼吸灯、振动模式解析
//!
//! 解析都是宽松的：格式不对直接返回 `None`，通知照常发出。

use serde::{Deserialize, Serialize};

/// 呼吸灯模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LightPattern {
    /// ARGB 颜色
    pub argb: u32,
    pub on_ms: u32,
    pub off_ms: u32,
}

impl LightPattern {
    /// 解析 `"<color>,<onMs>,<offMs>"`，例如 `"#FF00FF,1000,3000"`
    ///
    /// 空白字符先被去掉；必须恰好三段。
    pub fn parse(s: &str) -> Option<Self> {
        let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
        let parts: Vec<&str> = compact.split(',').collect();
        if parts.len() != 3 {
            return None;
        }

        Some(Self {
            argb: parse_color(parts[0])?,
            on_ms: parts[1].parse().ok()?,
            off_ms: parts[2].parse().ok()?,
        })
    }
}

const NAMED_COLORS: &[(&str, u32)] = &[
    ("black", 0xFF000000),
    ("darkgray", 0xFF444444),
    ("darkgrey", 0xFF444444),
    ("gray", 0xFF888888),
    ("grey", 0xFF888888),
    ("lightgray", 0xFFCCCCCC),
    ("lightgrey", 0xFFCCCCCC),
    ("white", 0xFFFFFFFF),
    ("red", 0xFFFF0000),
    ("green", 0xFF00FF00),
    ("blue", 0xFF0000FF),
    ("yellow", 0xFFFFFF00),
    ("cyan", 0xFF00FFFF),
    ("magenta", 0xFFFF00FF),
    ("aqua", 0xFF00FFFF),
    ("fuchsia", 0xFFFF00FF),
    ("lime", 0xFF00FF00),
    ("maroon", 0xFF800000),
    ("navy", 0xFF000080),
    ("olive", 0xFF808000),
    ("purple", 0xFF800080),
    ("silver", 0xFFC0C0C0),
    ("teal", 0xFF008080),
];

/// 解析颜色为 ARGB
///
/// 支持 `#RRGGBB`（alpha 补 0xFF）、`#AARRGGBB` 和常见颜色名（不区分大小写）。
pub fn parse_color(s: &str) -> Option<u32> {
    if let Some(hex) = s.strip_prefix('#') {
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let value = u32::from_str_radix(hex, 16).ok()?;
        return match hex.len() {
            6 => Some(0xFF00_0000 | value),
            8 => Some(value),
            _ => None,
        };
    }

    let lower = s.to_ascii_lowercase();
    NAMED_COLORS
        .iter()
        .find(|(name, _)| *name == lower)
        .map(|(_, argb)| *argb)
}

/// 解析振动模式 `"500,200,500"`（毫秒，交替 关/开）
pub fn parse_vibrate_pattern(s: &str) -> Option<Vec<u64>> {
    let compact: String = s.chars().filter(|c| !c.is_whitespace()).collect();
    if compact.is_empty() {
        return None;
    }
    compact
        .split(',')
        .map(|part| part.parse::<u64>().ok())
        .collect()
}

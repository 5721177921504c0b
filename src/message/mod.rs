//! 消息处理 - 原始 payload 解析、字段提取与规范化
//!
//! 流程：`RemoteMessage` → `FieldExtractor` → `CandidateFields` → `MessageNormalizer` → `NormalizedMessage`

pub mod extractor;
pub mod normalizer;
pub mod remote;

pub use extractor::{CandidateFields, Field, FieldExtractor, MessageType, DATA_FIELD_TABLE, FOREGROUND_KEY};
pub use normalizer::{FallbackIdPolicy, MessageNormalizer, NormalizedMessage, COMPAT_FALLBACK_ID_MAX};
pub use remote::{NotificationPayload, RemoteMessage};

//! 错误上报 - 处理失败只上报，不向 provider 或宿主传播

use tracing::error;

/// 崩溃/错误上报接口
pub trait ErrorReporter: Send + Sync {
    /// `context` 是出错的入口（如 `on_message_received`）
    fn report(&self, context: &str, error: &anyhow::Error);
}

/// 通过 tracing 记录错误
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingReporter;

impl ErrorReporter for TracingReporter {
    fn report(&self, context: &str, error: &anyhow::Error) {
        error!(context, error = %format!("{:#}", error), "Push message handling failed");
    }
}

//! SMS 网关抽象
//!
//! 渠道只依赖 `SmsGateway`，具体 HTTP 调用（签名、超时）由实现负责。

pub mod ovh;

pub use ovh::{OvhClient, OvhEndpoint};

use anyhow::Result;

/// SMS 网关 trait
pub trait SmsGateway: Send + Sync {
    /// 网关名称（用于日志）
    fn name(&self) -> &str;

    /// POST 请求，返回网关原始响应
    fn post(&self, path: &str, payload: &serde_json::Value) -> Result<serde_json::Value>;
}

//! 错误类型

use thiserror::Error;

/// SMS 渠道错误
///
/// 校验类错误（receivers / 消息类型 / priority / coding / sender）在发送前抛出，
/// 网关错误原样透传，不做重试也不解析错误码。
#[derive(Debug, Error)]
pub enum SmsError {
    /// receivers 既不是字符串也不是字符串数组
    #[error("receivers must be a string or an array of strings, {0} given")]
    InvalidReceivers(String),

    /// 通知返回的消息不是文本也不是 SmsMessage
    #[error("message must be an SmsMessage or a string, {0} given")]
    UnsupportedMessage(String),

    /// 未知的 priority
    #[error("invalid priority '{0}', expected one of: veryLow, low, medium, high")]
    InvalidPriority(String),

    /// 未知的 coding
    #[error("invalid coding '{0}', expected one of: 7bit, 8bit")]
    InvalidCoding(String),

    /// 未设置 sender，且渠道没有配置默认 sender
    #[error("a valid sender is required when sendForResponse is disabled")]
    MissingSender,

    /// 配置错误
    #[error("configuration error: {0}")]
    Config(String),

    /// 请求体编码失败
    #[error("failed to encode SMS payload: {0}")]
    Payload(#[from] serde_json::Error),

    /// 网关调用失败
    #[error(transparent)]
    Gateway(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, SmsError>;

/// JSON 值的类型名，用于错误信息
pub(crate) fn json_type_name(value: &serde_json::Value) -> &'static str {
    match value {
        serde_json::Value::Null => "null",
        serde_json::Value::Bool(_) => "boolean",
        serde_json::Value::Number(_) => "number",
        serde_json::Value::String(_) => "string",
        serde_json::Value::Array(_) => "array",
        serde_json::Value::Object(_) => "object",
    }
}

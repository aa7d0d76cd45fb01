//! 通知协作方 trait 定义
//!
//! - `Notifiable`：通知接收方，负责把渠道名解析成接收号码
//! - `Notification`：通知本身，通过 `as_ovh_sms` 声明是否支持转换为短信
//! - `SmsNotification`：实际执行转换

use super::message::{Coding, Priority, Receivers, SmsMessage};
use crate::error::{json_type_name, Result, SmsError};

/// 渠道名称（用于路由解析和日志）
pub const CHANNEL_NAME: &str = "ovhSms";

/// 通知转换结果：纯文本或已构建的消息
#[derive(Debug, Clone, PartialEq)]
pub enum SmsContent {
    PlainText(String),
    Message(SmsMessage),
}

impl From<&str> for SmsContent {
    fn from(text: &str) -> Self {
        SmsContent::PlainText(text.to_string())
    }
}

impl From<String> for SmsContent {
    fn from(text: String) -> Self {
        SmsContent::PlainText(text)
    }
}

impl From<SmsMessage> for SmsContent {
    fn from(message: SmsMessage) -> Self {
        SmsContent::Message(message)
    }
}

/// 外部（JSON）产出的消息：字符串为纯文本，对象按 `SmsMessage` 解析，其它类型报错
impl TryFrom<serde_json::Value> for SmsContent {
    type Error = SmsError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(text) => Ok(SmsContent::PlainText(text)),
            serde_json::Value::Object(fields) => message_from_object(fields).map(SmsContent::Message),
            other => Err(SmsError::UnsupportedMessage(json_type_name(&other).to_string())),
        }
    }
}

/// 先校验带专属错误的字段，剩余字段交给 serde
fn message_from_object(mut fields: serde_json::Map<String, serde_json::Value>) -> Result<SmsMessage> {
    let priority = fields
        .remove("priority")
        .map(|v| parse_name::<Priority>(v, SmsError::InvalidPriority))
        .transpose()?;
    let coding = fields
        .remove("coding")
        .map(|v| parse_name::<Coding>(v, SmsError::InvalidCoding))
        .transpose()?;
    let receivers = fields.remove("receivers").map(Receivers::try_from).transpose()?;

    let mut message = serde_json::from_value::<SmsMessage>(serde_json::Value::Object(fields))
        .map_err(|e| SmsError::UnsupportedMessage(format!("malformed object ({})", e)))?;
    if let Some(priority) = priority {
        message = message.with_priority(priority);
    }
    if let Some(coding) = coding {
        message = message.with_coding(coding);
    }
    if let Some(receivers) = receivers {
        message = message.with_receivers(receivers);
    }
    Ok(message)
}

fn parse_name<T>(value: serde_json::Value, invalid: fn(String) -> SmsError) -> Result<T>
where
    T: std::str::FromStr<Err = SmsError>,
{
    match value {
        serde_json::Value::String(name) => name.parse(),
        other => Err(invalid(json_type_name(&other).to_string())),
    }
}

/// 通知接收方
pub trait Notifiable: Send + Sync {
    /// 返回该渠道下的接收号码；`None` 表示此接收方不走该渠道
    fn route_notification_for(&self, channel: &str, notification: &dyn Notification) -> Option<Vec<String>>;
}

/// 通知
pub trait Notification: Send + Sync {
    /// 通知类型名（用于日志）
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }

    /// 是否支持转换为短信，默认不支持
    fn as_ovh_sms(&self) -> Option<&dyn SmsNotification> {
        None
    }
}

/// 可转换为短信的通知
pub trait SmsNotification: Send + Sync {
    fn to_ovh_sms(&self, notifiable: &dyn Notifiable) -> SmsContent;
}

/// 固定号码的接收方（CLI 和测试使用）
#[derive(Debug, Clone, Default)]
pub struct PhoneRoute {
    receivers: Vec<String>,
}

impl PhoneRoute {
    pub fn new(receivers: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            receivers: receivers.into_iter().map(Into::into).collect(),
        }
    }
}

impl Notifiable for PhoneRoute {
    fn route_notification_for(&self, channel: &str, _notification: &dyn Notification) -> Option<Vec<String>> {
        if channel != CHANNEL_NAME {
            return None;
        }
        Some(self.receivers.clone())
    }
}

/// 直接携带短信内容的通知
#[derive(Debug, Clone)]
pub struct SmsText {
    content: SmsContent,
}

impl SmsText {
    pub fn new(content: impl Into<SmsContent>) -> Self {
        Self { content: content.into() }
    }
}

impl Notification for SmsText {
    fn as_ovh_sms(&self) -> Option<&dyn SmsNotification> {
        Some(self)
    }
}

impl SmsNotification for SmsText {
    fn to_ovh_sms(&self, _notifiable: &dyn Notifiable) -> SmsContent {
        self.content.clone()
    }
}

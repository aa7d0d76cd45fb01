//! SMS 消息模型
//!
//! `SmsMessage` 描述一条待发送的短信。所有 `with_*` 方法都消费并返回新值，
//! 需要解析文本输入的方法（`with_priority_name` / `with_coding_name`）失败时不会影响原值。

use crate::error::{json_type_name, Result, SmsError};
use serde::{Deserialize, Serialize};
use std::fmt;

/// 默认有效期：48 小时（分钟）
pub const DEFAULT_VALIDITY_PERIOD: u32 = 2880;

/// 短信优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "String")]
pub enum Priority {
    VeryLow,
    Low,
    #[default]
    Medium,
    High,
}

impl Priority {
    pub fn as_str(&self) -> &'static str {
        match self {
            Priority::VeryLow => "veryLow",
            Priority::Low => "low",
            Priority::Medium => "medium",
            Priority::High => "high",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Priority {
    type Err = SmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "veryLow" => Ok(Priority::VeryLow),
            "low" => Ok(Priority::Low),
            "medium" => Ok(Priority::Medium),
            "high" => Ok(Priority::High),
            _ => Err(SmsError::InvalidPriority(s.to_string())),
        }
    }
}

impl TryFrom<String> for Priority {
    type Error = SmsError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// 短信编码
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Coding {
    #[default]
    #[serde(rename = "7bit")]
    SevenBit,
    #[serde(rename = "8bit")]
    EightBit,
}

impl Coding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Coding::SevenBit => "7bit",
            Coding::EightBit => "8bit",
        }
    }
}

impl fmt::Display for Coding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Coding {
    type Err = SmsError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "7bit" => Ok(Coding::SevenBit),
            "8bit" => Ok(Coding::EightBit),
            _ => Err(SmsError::InvalidCoding(s.to_string())),
        }
    }
}

impl TryFrom<String> for Coding {
    type Error = SmsError;

    fn try_from(value: String) -> Result<Self> {
        value.parse()
    }
}

/// 接收者：单个号码或号码列表
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Receivers {
    One(String),
    Many(Vec<String>),
}

impl Receivers {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Receivers::One(receiver) => vec![receiver],
            Receivers::Many(receivers) => receivers,
        }
    }
}

impl From<&str> for Receivers {
    fn from(receiver: &str) -> Self {
        Receivers::One(receiver.to_string())
    }
}

impl From<String> for Receivers {
    fn from(receiver: String) -> Self {
        Receivers::One(receiver)
    }
}

impl From<Vec<String>> for Receivers {
    fn from(receivers: Vec<String>) -> Self {
        Receivers::Many(receivers)
    }
}

impl<const N: usize> From<[&str; N]> for Receivers {
    fn from(receivers: [&str; N]) -> Self {
        Receivers::Many(receivers.iter().map(|r| r.to_string()).collect())
    }
}

/// 宽松输入（例如外部 JSON）：只接受字符串或字符串数组
impl TryFrom<serde_json::Value> for Receivers {
    type Error = SmsError;

    fn try_from(value: serde_json::Value) -> Result<Self> {
        match value {
            serde_json::Value::String(receiver) => Ok(Receivers::One(receiver)),
            serde_json::Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    serde_json::Value::String(receiver) => Ok(receiver),
                    other => Err(SmsError::InvalidReceivers(format!(
                        "array containing {}",
                        json_type_name(&other)
                    ))),
                })
                .collect::<Result<Vec<_>>>()
                .map(Receivers::Many),
            other => Err(SmsError::InvalidReceivers(json_type_name(&other).to_string())),
        }
    }
}

/// 一条待发送的短信
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsMessage {
    /// 短信内容
    pub content: String,
    /// 发送者（sendForResponse 为 false 时必填，可由渠道默认值补齐）
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    /// 接收号码（国际格式），JSON 中可以是单个字符串
    #[serde(default, deserialize_with = "deserialize_receivers")]
    pub receivers: Vec<String>,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub coding: Coding,
    /// 有效期（分钟）
    #[serde(default = "default_validity_period")]
    pub validity_period: u32,
    /// 是否附带 STOP 退订条款
    #[serde(default)]
    pub with_stop_clause: bool,
    /// 是否使用短号码以接收回复
    #[serde(default)]
    pub send_for_response: bool,
}

fn default_validity_period() -> u32 {
    DEFAULT_VALIDITY_PERIOD
}

fn deserialize_receivers<'de, D>(deserializer: D) -> std::result::Result<Vec<String>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    Receivers::try_from(value)
        .map(Receivers::into_vec)
        .map_err(serde::de::Error::custom)
}

impl SmsMessage {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            sender: None,
            receivers: Vec::new(),
            priority: Priority::default(),
            coding: Coding::default(),
            validity_period: DEFAULT_VALIDITY_PERIOD,
            with_stop_clause: false,
            send_for_response: false,
        }
    }

    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    /// 格式交给网关校验
    pub fn with_sender(mut self, sender: impl Into<String>) -> Self {
        self.sender = Some(sender.into());
        self
    }

    pub fn with_priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    /// 按名称设置优先级，未知名称返回 `SmsError::InvalidPriority`
    pub fn with_priority_name(&self, priority: &str) -> Result<Self> {
        let priority = priority.parse::<Priority>()?;
        Ok(self.clone().with_priority(priority))
    }

    pub fn with_coding(mut self, coding: Coding) -> Self {
        self.coding = coding;
        self
    }

    /// 按名称设置编码，未知名称返回 `SmsError::InvalidCoding`
    pub fn with_coding_name(&self, coding: &str) -> Result<Self> {
        let coding = coding.parse::<Coding>()?;
        Ok(self.clone().with_coding(coding))
    }

    pub fn with_validity_period(mut self, minutes: u32) -> Self {
        self.validity_period = minutes;
        self
    }

    pub fn with_stop_clause(mut self, stop_clause: bool) -> Self {
        self.with_stop_clause = stop_clause;
        self
    }

    pub fn with_send_for_response(mut self, send_for_response: bool) -> Self {
        self.send_for_response = send_for_response;
        self
    }

    /// 替换接收者；单个号码会被包装成只有一个元素的列表
    pub fn with_receivers(mut self, receivers: impl Into<Receivers>) -> Self {
        self.receivers = receivers.into().into_vec();
        self
    }

    /// 是否需要 sender（未启用 sendForResponse 且未设置 sender）
    pub fn needs_sender(&self) -> bool {
        !self.send_for_response && self.sender.is_none()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let msg = SmsMessage::new("Hello");
        assert_eq!(msg.content, "Hello");
        assert_eq!(msg.sender, None);
        assert!(msg.receivers.is_empty());
        assert_eq!(msg.priority, Priority::Medium);
        assert_eq!(msg.coding, Coding::SevenBit);
        assert_eq!(msg.validity_period, 2880);
        assert!(!msg.with_stop_clause);
        assert!(!msg.send_for_response);
    }

    #[test]
    fn test_builder_chain() {
        let msg = SmsMessage::new("draft")
            .with_content("final")
            .with_sender("MYAPP")
            .with_priority(Priority::High)
            .with_coding(Coding::EightBit)
            .with_validity_period(60)
            .with_stop_clause(true)
            .with_send_for_response(true)
            .with_receivers("+33600000001");

        assert_eq!(msg.content, "final");
        assert_eq!(msg.sender.as_deref(), Some("MYAPP"));
        assert_eq!(msg.priority, Priority::High);
        assert_eq!(msg.coding, Coding::EightBit);
        assert_eq!(msg.validity_period, 60);
        assert!(msg.with_stop_clause);
        assert!(msg.send_for_response);
        assert_eq!(msg.receivers, vec!["+33600000001".to_string()]);
    }

    #[test]
    fn test_single_receiver_equals_one_element_list() {
        let single = SmsMessage::new("x").with_receivers("+33600000001");
        let list = SmsMessage::new("x").with_receivers(vec!["+33600000001".to_string()]);
        assert_eq!(single, list);
    }

    #[test]
    fn test_receivers_replaced_not_appended() {
        let msg = SmsMessage::new("x")
            .with_receivers(["+33600000001", "+33600000002"])
            .with_receivers("+33600000003");
        assert_eq!(msg.receivers, vec!["+33600000003".to_string()]);
    }

    #[test]
    fn test_receivers_from_json() {
        let one = Receivers::try_from(serde_json::json!("+33600000001")).unwrap();
        assert_eq!(one.into_vec(), vec!["+33600000001".to_string()]);

        let many = Receivers::try_from(serde_json::json!(["+33600000001", "+33600000002"])).unwrap();
        assert_eq!(many.into_vec().len(), 2);
    }

    #[test]
    fn test_receivers_from_json_rejects_other_types() {
        let err = Receivers::try_from(serde_json::json!(33600000001u64)).unwrap_err();
        assert!(matches!(err, SmsError::InvalidReceivers(ref t) if t == "number"));

        let err = Receivers::try_from(serde_json::json!({"to": "+33600000001"})).unwrap_err();
        assert!(matches!(err, SmsError::InvalidReceivers(ref t) if t == "object"));

        let err = Receivers::try_from(serde_json::json!(["+33600000001", 1])).unwrap_err();
        assert!(matches!(err, SmsError::InvalidReceivers(_)));
    }

    #[test]
    fn test_priority_parse() {
        assert_eq!("veryLow".parse::<Priority>().unwrap(), Priority::VeryLow);
        assert_eq!("low".parse::<Priority>().unwrap(), Priority::Low);
        assert_eq!("medium".parse::<Priority>().unwrap(), Priority::Medium);
        assert_eq!("high".parse::<Priority>().unwrap(), Priority::High);
        assert!(matches!(
            "urgent".parse::<Priority>(),
            Err(SmsError::InvalidPriority(_))
        ));
    }

    #[test]
    fn test_priority_parse_is_exact() {
        for raw in ["very_low", "very-low", "verylow", "MEDIUM", " high", "High"] {
            assert!(
                matches!(raw.parse::<Priority>(), Err(SmsError::InvalidPriority(ref v)) if v == raw),
                "{} should be rejected",
                raw
            );
        }
        assert!(SmsMessage::new("x").with_priority_name("very_low").is_err());
    }

    #[test]
    fn test_text_and_json_priority_agree() {
        for raw in ["veryLow", "very_low", "MEDIUM"] {
            let parsed = raw.parse::<Priority>().ok();
            let from_json = serde_json::from_value::<Priority>(serde_json::json!(raw)).ok();
            assert_eq!(parsed, from_json, "{}", raw);
        }
    }

    #[test]
    fn test_coding_parse() {
        assert_eq!("7bit".parse::<Coding>().unwrap(), Coding::SevenBit);
        assert_eq!("8bit".parse::<Coding>().unwrap(), Coding::EightBit);
        assert!(matches!("16bit".parse::<Coding>(), Err(SmsError::InvalidCoding(_))));
        assert!(matches!("7BIT".parse::<Coding>(), Err(SmsError::InvalidCoding(_))));
    }

    #[test]
    fn test_invalid_priority_name_leaves_message_unchanged() {
        let msg = SmsMessage::new("x").with_priority(Priority::High);
        let err = msg.with_priority_name("urgent").unwrap_err();
        assert!(matches!(err, SmsError::InvalidPriority(_)));
        assert_eq!(msg.priority, Priority::High);

        let updated = msg.with_priority_name("low").unwrap();
        assert_eq!(updated.priority, Priority::Low);
    }

    #[test]
    fn test_invalid_coding_name_leaves_message_unchanged() {
        let msg = SmsMessage::new("x").with_coding(Coding::EightBit);
        assert!(msg.with_coding_name("utf16").is_err());
        assert_eq!(msg.coding, Coding::EightBit);
    }

    #[test]
    fn test_wire_names() {
        assert_eq!(serde_json::to_value(Priority::VeryLow).unwrap(), "veryLow");
        assert_eq!(serde_json::to_value(Coding::EightBit).unwrap(), "8bit");
        assert_eq!(Priority::High.to_string(), "high");
        assert_eq!(Coding::SevenBit.to_string(), "7bit");
    }

    #[test]
    fn test_deserialize_applies_defaults() {
        let msg: SmsMessage = serde_json::from_value(serde_json::json!({
            "content": "Hello",
            "priority": "high",
            "sendForResponse": true
        }))
        .unwrap();

        assert_eq!(msg.priority, Priority::High);
        assert_eq!(msg.coding, Coding::SevenBit);
        assert_eq!(msg.validity_period, DEFAULT_VALIDITY_PERIOD);
        assert!(msg.send_for_response);
        assert!(!msg.needs_sender());
    }

    #[test]
    fn test_deserialize_single_receiver() {
        let msg: SmsMessage = serde_json::from_value(serde_json::json!({
            "content": "x",
            "receivers": "+33600000001"
        }))
        .unwrap();
        assert_eq!(msg.receivers, vec!["+33600000001".to_string()]);

        let result = serde_json::from_value::<SmsMessage>(serde_json::json!({
            "content": "x",
            "receivers": 33600000001u64
        }));
        assert!(result.is_err());
    }

    #[test]
    fn test_needs_sender() {
        assert!(SmsMessage::new("x").needs_sender());
        assert!(!SmsMessage::new("x").with_sender("MYAPP").needs_sender());
        assert!(!SmsMessage::new("x").with_send_for_response(true).needs_sender());
    }
}

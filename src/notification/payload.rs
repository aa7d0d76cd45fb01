//! OVH SMS job payload
//!
//! `POST /sms/{account}/jobs` 的请求体：
//! ```json
//! {
//!   "charset": "UTF-8",
//!   "class": "phoneDisplay",
//!   "sender": "MYAPP",
//!   "coding": "7bit",
//!   "message": "Hello",
//!   "noStopClause": true,
//!   "priority": "medium",
//!   "receivers": ["+33600000001"],
//!   "senderForResponse": false,
//!   "validityPeriod": 2880
//! }
//! ```

use serde::Serialize;

use super::message::{Coding, Priority, SmsMessage};
use crate::error::Result;

pub const CHARSET: &str = "UTF-8";
pub const MESSAGE_CLASS: &str = "phoneDisplay";

/// SMS job 请求体
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SmsJobPayload {
    pub charset: &'static str,
    pub class: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sender: Option<String>,
    pub coding: Coding,
    pub message: String,
    /// 与 `SmsMessage::with_stop_clause` 相反
    pub no_stop_clause: bool,
    pub priority: Priority,
    pub receivers: Vec<String>,
    pub sender_for_response: bool,
    pub validity_period: u32,
}

impl SmsJobPayload {
    pub fn from_message(message: &SmsMessage) -> Self {
        Self {
            charset: CHARSET,
            class: MESSAGE_CLASS,
            sender: message.sender.clone(),
            coding: message.coding,
            message: message.content.clone(),
            no_stop_clause: !message.with_stop_clause,
            priority: message.priority,
            receivers: message.receivers.clone(),
            sender_for_response: message.send_for_response,
            validity_period: message.validity_period,
        }
    }

    pub fn to_value(&self) -> Result<serde_json::Value> {
        Ok(serde_json::to_value(self)?)
    }
}

impl From<&SmsMessage> for SmsJobPayload {
    fn from(message: &SmsMessage) -> Self {
        Self::from_message(message)
    }
}

/// 网关路径
pub fn jobs_path(account: &str) -> String {
    format!("/sms/{}/jobs", account)
}

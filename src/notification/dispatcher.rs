//! 短信渠道 - 把一次通知转换为最多一次网关提交
//!
//! 流程：解析接收者 → 检查转换能力 → 规范化消息 → 补齐默认 sender → 沙盒拦截 →
//! 构建 payload → 提交。接收者为空、通知不支持短信、沙盒模式都返回 `Ok(None)`，不算错误。

use super::channel::{Notifiable, Notification, SmsContent, SmsNotification, CHANNEL_NAME};
use super::message::SmsMessage;
use super::payload::{jobs_path, SmsJobPayload};
use crate::config::SmsChannelConfig;
use crate::error::{Result, SmsError};
use crate::gateway::SmsGateway;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// OVH 短信渠道
pub struct OvhSmsChannel {
    gateway: Arc<dyn SmsGateway>,
    config: SmsChannelConfig,
}

impl OvhSmsChannel {
    pub fn new(gateway: Arc<dyn SmsGateway>, config: SmsChannelConfig) -> Self {
        Self { gateway, config }
    }

    pub fn config(&self) -> &SmsChannelConfig {
        &self.config
    }

    /// 发送通知
    ///
    /// 成功时返回网关原始响应；无需发送时返回 `Ok(None)`。
    pub fn send(
        &self,
        notifiable: &dyn Notifiable,
        notification: &dyn Notification,
    ) -> Result<Option<serde_json::Value>> {
        self.dispatch(notifiable, notification, |sms| Ok(sms.to_ovh_sms(notifiable)))
    }

    /// 同 `send`，但消息由外部以 JSON 给出（字符串或消息对象）
    pub fn send_value(
        &self,
        notifiable: &dyn Notifiable,
        notification: &dyn Notification,
        message: serde_json::Value,
    ) -> Result<Option<serde_json::Value>> {
        self.dispatch(notifiable, notification, |_| SmsContent::try_from(message))
    }

    fn dispatch<F>(
        &self,
        notifiable: &dyn Notifiable,
        notification: &dyn Notification,
        convert: F,
    ) -> Result<Option<serde_json::Value>>
    where
        F: FnOnce(&dyn SmsNotification) -> Result<SmsContent>,
    {
        let receivers = match notifiable.route_notification_for(CHANNEL_NAME, notification) {
            Some(receivers) if !receivers.is_empty() => receivers,
            _ => {
                debug!(notification = notification.name(), "No SMS receivers, skipping");
                return Ok(None);
            }
        };

        let Some(sms) = notification.as_ovh_sms() else {
            debug!(notification = notification.name(), "Notification has no SMS representation, skipping");
            return Ok(None);
        };

        let message = self.normalize(convert(sms)?, receivers);
        let message = self.apply_default_sender(message)?;
        let payload = SmsJobPayload::from_message(&message);

        if self.config.sandbox {
            info!(
                account = %self.config.account,
                receivers = ?payload.receivers,
                "[SANDBOX] SMS not submitted"
            );
            return Ok(None);
        }

        self.submit(&payload).map(Some)
    }

    /// 纯文本包装成消息，并附上接收者
    fn normalize(&self, content: SmsContent, receivers: Vec<String>) -> SmsMessage {
        let message = match content {
            SmsContent::PlainText(text) => {
                let message = SmsMessage::new(text);
                match &self.config.default_sender {
                    Some(sender) => message.with_sender(sender.as_str()),
                    None => message,
                }
            }
            SmsContent::Message(message) => message,
        };
        message.with_receivers(receivers)
    }

    /// 未请求短号码回复且没有 sender 时使用默认 sender；显式 sender 不会被覆盖
    fn apply_default_sender(&self, message: SmsMessage) -> Result<SmsMessage> {
        if !message.needs_sender() {
            return Ok(message);
        }
        match &self.config.default_sender {
            Some(sender) => Ok(message.with_sender(sender.as_str())),
            None => Err(SmsError::MissingSender),
        }
    }

    fn submit(&self, payload: &SmsJobPayload) -> Result<serde_json::Value> {
        let path = jobs_path(&self.config.account);
        let body = payload.to_value()?;
        match self.gateway.post(&path, &body) {
            Ok(response) => {
                info!(
                    gateway = self.gateway.name(),
                    account = %self.config.account,
                    receivers = payload.receivers.len(),
                    "SMS submitted"
                );
                Ok(response)
            }
            Err(e) => {
                warn!(gateway = self.gateway.name(), account = %self.config.account, error = %e, "SMS submission failed");
                Err(SmsError::Gateway(e))
            }
        }
    }
}

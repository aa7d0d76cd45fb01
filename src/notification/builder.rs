//! 短信渠道构建器 - 从配置组装网关和渠道

use super::dispatcher::OvhSmsChannel;
use crate::config::{AppConfig, OvhApiConfig, SmsChannelConfig};
use crate::error::{Result, SmsError};
use crate::gateway::{OvhClient, SmsGateway};
use std::sync::Arc;
use tracing::info;

/// 短信渠道构建器
pub struct SmsChannelBuilder {
    api: OvhApiConfig,
    channel: SmsChannelConfig,
    gateway: Option<Arc<dyn SmsGateway>>,
}

impl SmsChannelBuilder {
    pub fn new() -> Self {
        Self {
            api: OvhApiConfig::default(),
            channel: SmsChannelConfig::default(),
            gateway: None,
        }
    }

    /// 使用应用配置
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            api: config.ovh.clone(),
            channel: config.sms.clone(),
            gateway: None,
        }
    }

    /// 设置 SMS 账号
    pub fn account(mut self, account: impl Into<String>) -> Self {
        self.channel.account = account.into();
        self
    }

    /// 设置默认 sender
    pub fn default_sender(mut self, sender: impl Into<String>) -> Self {
        self.channel.default_sender = Some(sender.into());
        self
    }

    /// 设置沙盒模式
    pub fn sandbox(mut self, sandbox: bool) -> Self {
        self.channel.sandbox = sandbox;
        self
    }

    /// 使用自定义网关（不再创建 OvhClient）
    pub fn gateway(mut self, gateway: Arc<dyn SmsGateway>) -> Self {
        self.gateway = Some(gateway);
        self
    }

    pub fn build(self) -> Result<OvhSmsChannel> {
        if self.channel.account.trim().is_empty() {
            return Err(SmsError::Config("sms account is required".to_string()));
        }

        let gateway = match self.gateway {
            Some(gateway) => gateway,
            None => Arc::new(OvhClient::new(self.api)?) as Arc<dyn SmsGateway>,
        };

        info!(
            gateway = gateway.name(),
            account = %self.channel.account,
            sandbox = self.channel.sandbox,
            default_sender = ?self.channel.default_sender,
            "SMS channel ready"
        );
        Ok(OvhSmsChannel::new(gateway, self.channel))
    }
}

impl Default for SmsChannelBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NullGateway;

    impl SmsGateway for NullGateway {
        fn name(&self) -> &str {
            "null"
        }

        fn post(&self, _path: &str, _payload: &serde_json::Value) -> anyhow::Result<serde_json::Value> {
            Ok(serde_json::Value::Null)
        }
    }

    #[test]
    fn test_build_requires_account() {
        let result = SmsChannelBuilder::new().gateway(Arc::new(NullGateway)).build();
        assert!(matches!(result, Err(SmsError::Config(_))));
    }

    #[test]
    fn test_build_without_credentials_fails() {
        let result = SmsChannelBuilder::new().account("sms-ab12345-1").build();
        assert!(matches!(result, Err(SmsError::Config(_))));
    }

    #[test]
    fn test_builder_chain() {
        let channel = SmsChannelBuilder::new()
            .account("sms-ab12345-1")
            .default_sender("MYAPP")
            .sandbox(true)
            .gateway(Arc::new(NullGateway))
            .build()
            .unwrap();

        let config = channel.config();
        assert_eq!(config.account, "sms-ab12345-1");
        assert_eq!(config.default_sender.as_deref(), Some("MYAPP"));
        assert!(config.sandbox);
    }

    #[test]
    fn test_from_config_creates_ovh_client() {
        let mut config = AppConfig::default();
        config.ovh.app_key = "key".to_string();
        config.ovh.app_secret = "secret".to_string();
        config.ovh.consumer_key = "consumer".to_string();
        config.sms.account = "sms-ab12345-1".to_string();

        let channel = SmsChannelBuilder::from_config(&config).build().unwrap();
        assert_eq!(channel.config(), &config.sms);
    }
}

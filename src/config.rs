//! 配置加载
//!
//! 读取优先级（后者覆盖前者）：
//! 1. 配置文件 `~/.config/ovh-sms-channel/config.json`（或 `--config` 指定的路径）
//! 2. 环境变量 `OVH_APP_KEY` / `OVH_APP_SECRET` / `OVH_CONSUMER_KEY` / `OVH_ENDPOINT` /
//!    `OVH_SMS_ACCOUNT` / `OVH_SMS_FROM` / `OVH_SMS_SANDBOX`
//!
//! 配置文件格式：
//! ```json
//! {
//!   "ovh": {
//!     "app_key": "...",
//!     "app_secret": "...",
//!     "consumer_key": "...",
//!     "endpoint": "ovh-eu"
//!   },
//!   "sms": {
//!     "account": "sms-ab12345-1",
//!     "default_sender": "MYAPP",
//!     "sandbox": false
//!   }
//! }
//! ```

use crate::error::{Result, SmsError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// 默认 API endpoint
pub const DEFAULT_ENDPOINT: &str = "ovh-eu";

/// 默认请求超时（秒）
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// OVH API 凭据
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OvhApiConfig {
    #[serde(default)]
    pub app_key: String,
    #[serde(default)]
    pub app_secret: String,
    #[serde(default)]
    pub consumer_key: String,
    /// endpoint 别名（如 `ovh-eu`）或完整 URL
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint() -> String {
    DEFAULT_ENDPOINT.to_string()
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for OvhApiConfig {
    fn default() -> Self {
        Self {
            app_key: String::new(),
            app_secret: String::new(),
            consumer_key: String::new(),
            endpoint: default_endpoint(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// 短信渠道配置，构建后只读
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SmsChannelConfig {
    /// SMS 账号（如 `sms-ab12345-1`）
    #[serde(default)]
    pub account: String,
    /// 消息未指定 sender 时使用
    #[serde(default, alias = "from")]
    pub default_sender: Option<String>,
    /// 沙盒模式：完整校验但不实际发送
    #[serde(default)]
    pub sandbox: bool,
}

/// 应用配置
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub ovh: OvhApiConfig,
    #[serde(default)]
    pub sms: SmsChannelConfig,
}

impl AppConfig {
    /// 默认配置文件路径
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(".config/ovh-sms-channel/config.json"))
    }

    /// 从默认路径和环境变量加载
    pub fn auto_load() -> Result<Self> {
        Self::load(None)
    }

    /// 加载并校验配置：显式路径必须存在，默认路径不存在时只使用环境变量
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = Self::load_unchecked(path)?;
        config.validate()?;
        Ok(config)
    }

    /// 加载配置但不校验
    pub fn load_unchecked(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => match Self::default_path().filter(|p| p.exists()) {
                Some(path) => Self::from_file(&path)?,
                None => Self::default(),
            },
        };

        config.apply_env(|key| std::env::var(key).ok());
        Ok(config)
    }

    /// 读取 JSON 配置文件（不做校验）
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| SmsError::Config(format!("cannot read {}: {}", path.display(), e)))?;
        let config: AppConfig = serde_json::from_str(&content)
            .map_err(|e| SmsError::Config(format!("invalid config {}: {}", path.display(), e)))?;
        debug!(path = %path.display(), "Loaded config file");
        Ok(config)
    }

    /// 用环境变量覆盖，空值忽略
    pub fn apply_env<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        if let Some(v) = get("OVH_APP_KEY") {
            self.ovh.app_key = v;
        }
        if let Some(v) = get("OVH_APP_SECRET") {
            self.ovh.app_secret = v;
        }
        if let Some(v) = get("OVH_CONSUMER_KEY") {
            self.ovh.consumer_key = v;
        }
        if let Some(v) = get("OVH_ENDPOINT") {
            self.ovh.endpoint = v;
        }
        if let Some(v) = get("OVH_SMS_ACCOUNT") {
            self.sms.account = v;
        }
        if let Some(v) = get("OVH_SMS_FROM") {
            self.sms.default_sender = Some(v);
        }
        if let Some(v) = get("OVH_SMS_SANDBOX") {
            self.sms.sandbox = matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes" | "on");
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.sms.account.trim().is_empty() {
            return Err(SmsError::Config(
                "sms.account is required (config file or OVH_SMS_ACCOUNT)".to_string(),
            ));
        }
        Ok(())
    }

    /// 隐藏密钥后的副本（用于展示）
    pub fn masked(&self) -> Self {
        let mut masked = self.clone();
        masked.ovh.app_secret = mask(&self.ovh.app_secret);
        masked.ovh.consumer_key = mask(&self.ovh.consumer_key);
        masked
    }
}

fn mask(secret: &str) -> String {
    if secret.is_empty() {
        return String::new();
    }
    let visible: String = secret.chars().take(4).collect();
    format!("{}****", visible)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.ovh.endpoint, "ovh-eu");
        assert_eq!(config.ovh.timeout_secs, 30);
        assert!(!config.sms.sandbox);
        assert!(config.sms.default_sender.is_none());
    }

    #[test]
    fn test_validate_requires_account() {
        let config = AppConfig::default();
        assert!(matches!(config.validate(), Err(SmsError::Config(_))));

        let mut config = AppConfig::default();
        config.sms.account = "sms-ab12345-1".to_string();
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_apply_env() {
        let env: HashMap<&str, &str> = [
            ("OVH_APP_KEY", "key"),
            ("OVH_SMS_ACCOUNT", "sms-ab12345-1"),
            ("OVH_SMS_FROM", "MYAPP"),
            ("OVH_SMS_SANDBOX", "true"),
            ("OVH_ENDPOINT", ""),
        ]
        .into_iter()
        .collect();

        let mut config = AppConfig::default();
        config.apply_env(|key| env.get(key).map(|v| v.to_string()));

        assert_eq!(config.ovh.app_key, "key");
        assert_eq!(config.ovh.endpoint, "ovh-eu");
        assert_eq!(config.sms.account, "sms-ab12345-1");
        assert_eq!(config.sms.default_sender.as_deref(), Some("MYAPP"));
        assert!(config.sms.sandbox);
    }

    #[test]
    fn test_sandbox_env_false() {
        let mut config = AppConfig::default();
        config.sms.sandbox = true;
        config.apply_env(|key| (key == "OVH_SMS_SANDBOX").then(|| "0".to_string()));
        assert!(!config.sms.sandbox);
    }

    #[test]
    fn test_from_alias_for_default_sender() {
        let config: AppConfig = serde_json::from_value(serde_json::json!({
            "sms": {"account": "sms-ab12345-1", "from": "MYAPP"}
        }))
        .unwrap();
        assert_eq!(config.sms.default_sender.as_deref(), Some("MYAPP"));
        assert_eq!(config.ovh, OvhApiConfig::default());
    }

    #[test]
    fn test_masked() {
        let mut config = AppConfig::default();
        config.ovh.app_secret = "abcdefgh".to_string();
        let masked = config.masked();
        assert_eq!(masked.ovh.app_secret, "abcd****");
        assert_eq!(masked.ovh.consumer_key, "");
    }
}

//! OVH API 客户端
//!
//! 每个请求都带签名头：
//! - `X-Ovh-Application`：application key
//! - `X-Ovh-Consumer`：consumer key
//! - `X-Ovh-Timestamp`：服务器时间（本地时间 + `/auth/time` 时间差）
//! - `X-Ovh-Signature`：`"$1$" + sha1(AS+CK+METHOD+URL+BODY+TSTAMP)`，以 `+` 连接

use super::SmsGateway;
use crate::config::OvhApiConfig;
use crate::error::SmsError;
use anyhow::{anyhow, Result};
use serde::Deserialize;
use sha1::{Digest, Sha1};
use std::sync::Mutex;
use std::time::Duration;
use tracing::debug;

/// API endpoint
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OvhEndpoint {
    OvhEu,
    OvhCa,
    OvhUs,
    KimsufiEu,
    KimsufiCa,
    SoyoustartEu,
    SoyoustartCa,
    Custom(String),
}

impl OvhEndpoint {
    pub fn base_url(&self) -> &str {
        match self {
            OvhEndpoint::OvhEu => "https://eu.api.ovh.com/1.0",
            OvhEndpoint::OvhCa => "https://ca.api.ovh.com/1.0",
            OvhEndpoint::OvhUs => "https://api.us.ovhcloud.com/1.0",
            OvhEndpoint::KimsufiEu => "https://eu.api.kimsufi.com/1.0",
            OvhEndpoint::KimsufiCa => "https://ca.api.kimsufi.com/1.0",
            OvhEndpoint::SoyoustartEu => "https://eu.api.soyoustart.com/1.0",
            OvhEndpoint::SoyoustartCa => "https://ca.api.soyoustart.com/1.0",
            OvhEndpoint::Custom(url) => url,
        }
    }
}

impl std::str::FromStr for OvhEndpoint {
    type Err = SmsError;

    fn from_str(s: &str) -> std::result::Result<Self, SmsError> {
        let s = s.trim();
        if s.starts_with("http://") || s.starts_with("https://") {
            return Ok(OvhEndpoint::Custom(s.trim_end_matches('/').to_string()));
        }
        match s.to_lowercase().as_str() {
            "ovh-eu" => Ok(OvhEndpoint::OvhEu),
            "ovh-ca" => Ok(OvhEndpoint::OvhCa),
            "ovh-us" => Ok(OvhEndpoint::OvhUs),
            "kimsufi-eu" => Ok(OvhEndpoint::KimsufiEu),
            "kimsufi-ca" => Ok(OvhEndpoint::KimsufiCa),
            "soyoustart-eu" => Ok(OvhEndpoint::SoyoustartEu),
            "soyoustart-ca" => Ok(OvhEndpoint::SoyoustartCa),
            _ => Err(SmsError::Config(format!("unknown OVH endpoint: {}", s))),
        }
    }
}

/// 计算请求签名
pub fn sign(
    app_secret: &str,
    consumer_key: &str,
    method: &str,
    url: &str,
    body: &str,
    timestamp: i64,
) -> String {
    let to_sign = format!(
        "{}+{}+{}+{}+{}+{}",
        app_secret, consumer_key, method, url, body, timestamp
    );
    let digest = Sha1::digest(to_sign.as_bytes());
    let hex: String = digest.iter().map(|b| format!("{:02x}", b)).collect();
    format!("$1${}", hex)
}

/// API 错误响应
#[derive(Deserialize)]
struct ErrorResponse {
    message: String,
}

/// OVH API 客户端
pub struct OvhClient {
    client: reqwest::blocking::Client,
    config: OvhApiConfig,
    base_url: String,
    /// 服务器时间 - 本地时间（秒），首次签名时获取
    time_delta: Mutex<Option<i64>>,
}

impl OvhClient {
    pub fn new(config: OvhApiConfig) -> std::result::Result<Self, SmsError> {
        if config.app_key.is_empty() || config.app_secret.is_empty() {
            return Err(SmsError::Config(
                "ovh.app_key and ovh.app_secret are required".to_string(),
            ));
        }
        if config.consumer_key.is_empty() {
            return Err(SmsError::Config("ovh.consumer_key is required".to_string()));
        }

        let endpoint: OvhEndpoint = config.endpoint.parse()?;
        let client = reqwest::blocking::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()
            .map_err(|e| SmsError::Config(format!("cannot create HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: endpoint.base_url().to_string(),
            config,
            time_delta: Mutex::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// 带时间差校正的时间戳
    fn timestamp(&self) -> Result<i64> {
        let cached = *self
            .time_delta
            .lock()
            .map_err(|_| anyhow!("time delta lock poisoned"))?;

        // 网络请求期间不持有锁，并发首次调用可能各取一次，结果相同
        let delta = match cached {
            Some(delta) => delta,
            None => {
                let delta = self.fetch_time_delta()?;
                *self
                    .time_delta
                    .lock()
                    .map_err(|_| anyhow!("time delta lock poisoned"))? = Some(delta);
                delta
            }
        };

        Ok(chrono::Utc::now().timestamp() + delta)
    }

    fn fetch_time_delta(&self) -> Result<i64> {
        let url = format!("{}/auth/time", self.base_url);
        let server_time: i64 = self
            .client
            .get(&url)
            .send()
            .map_err(|e| anyhow!("Failed to fetch OVH server time: {}", e))?
            .json()
            .map_err(|e| anyhow!("Failed to parse OVH server time: {}", e))?;
        let delta = server_time - chrono::Utc::now().timestamp();
        debug!(delta, "Fetched OVH time delta");
        Ok(delta)
    }

    /// 发送签名请求
    fn call(&self, method: reqwest::Method, path: &str, body: Option<&serde_json::Value>) -> Result<serde_json::Value> {
        let url = format!("{}{}", self.base_url, path);
        let body = match body {
            Some(value) => serde_json::to_string(value)?,
            None => String::new(),
        };
        let timestamp = self.timestamp()?;
        let signature = sign(
            &self.config.app_secret,
            &self.config.consumer_key,
            method.as_str(),
            &url,
            &body,
            timestamp,
        );

        debug!(method = %method, url = %url, body_len = body.len(), "Sending OVH API request");

        let start = std::time::Instant::now();
        let mut request = self
            .client
            .request(method, &url)
            .header("X-Ovh-Application", &self.config.app_key)
            .header("X-Ovh-Consumer", &self.config.consumer_key)
            .header("X-Ovh-Timestamp", timestamp.to_string())
            .header("X-Ovh-Signature", signature);
        if !body.is_empty() {
            request = request.header("Content-Type", "application/json").body(body);
        }

        let response = request.send().map_err(|e| {
            anyhow!("OVH request failed after {}ms: {}", start.elapsed().as_millis(), e)
        })?;

        let status = response.status();
        let text = response
            .text()
            .map_err(|e| anyhow!("Failed to read OVH response: {}", e))?;

        debug!(status = %status, elapsed_ms = start.elapsed().as_millis(), "OVH API request completed");

        if !status.is_success() {
            if let Ok(error) = serde_json::from_str::<ErrorResponse>(&text) {
                return Err(anyhow!("OVH API error ({}): {}", status, error.message));
            }
            return Err(anyhow!("OVH API error ({}): {}", status, text));
        }

        if text.trim().is_empty() {
            return Ok(serde_json::Value::Null);
        }
        serde_json::from_str(&text)
            .map_err(|e| anyhow!("Failed to parse OVH response: {} - body: {}", e, text))
    }
}

impl SmsGateway for OvhClient {
    fn name(&self) -> &str {
        "ovh"
    }

    fn post(&self, path: &str, payload: &serde_json::Value) -> Result<serde_json::Value> {
        self.call(reqwest::Method::POST, path, Some(payload))
    }
}

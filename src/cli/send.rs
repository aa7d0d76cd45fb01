//! send / payload / config 命令

use crate::cli::output::format_output;
use crate::config::AppConfig;
use crate::gateway::SmsGateway;
use crate::notification::{PhoneRoute, SmsChannelBuilder, SmsMessage, SmsText};
use anyhow::Result;
use clap::Args;
use std::path::PathBuf;
use std::sync::Arc;

/// 短信参数
#[derive(Args, Debug, Clone)]
pub struct MessageArgs {
    /// 接收号码（国际格式，可重复）
    #[arg(long, short, required = true)]
    pub to: Vec<String>,

    /// 短信内容
    #[arg(long, short)]
    pub message: String,

    /// 发送者（默认使用配置中的 default_sender）
    #[arg(long, short)]
    pub sender: Option<String>,

    /// 优先级: veryLow, low, medium, high
    #[arg(long, short)]
    pub priority: Option<String>,

    /// 编码: 7bit, 8bit
    #[arg(long)]
    pub coding: Option<String>,

    /// 有效期（分钟）
    #[arg(long)]
    pub validity: Option<u32>,

    /// 附带 STOP 退订条款
    #[arg(long)]
    pub stop_clause: bool,

    /// 使用短号码以接收回复
    #[arg(long)]
    pub for_response: bool,
}

impl MessageArgs {
    /// 构建消息（接收者由渠道路由时附上）
    pub fn to_message(&self) -> crate::Result<SmsMessage> {
        let mut message = SmsMessage::new(self.message.as_str())
            .with_stop_clause(self.stop_clause)
            .with_send_for_response(self.for_response);

        if let Some(sender) = &self.sender {
            message = message.with_sender(sender.as_str());
        }
        if let Some(priority) = &self.priority {
            message = message.with_priority_name(priority)?;
        }
        if let Some(coding) = &self.coding {
            message = message.with_coding_name(coding)?;
        }
        if let Some(validity) = self.validity {
            message = message.with_validity_period(validity);
        }
        Ok(message)
    }

    pub fn route(&self) -> PhoneRoute {
        PhoneRoute::new(self.to.iter().cloned())
    }
}

/// send 命令参数
#[derive(Args, Debug)]
pub struct SendArgs {
    #[command(flatten)]
    pub message: MessageArgs,

    /// 沙盒模式：只校验不发送
    #[arg(long)]
    pub sandbox: bool,

    /// 配置文件路径
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// payload 命令参数
#[derive(Args, Debug)]
pub struct PayloadArgs {
    #[command(flatten)]
    pub message: MessageArgs,

    /// 配置文件路径
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// config 命令参数
#[derive(Args, Debug)]
pub struct ConfigArgs {
    /// 配置文件路径
    #[arg(long, short)]
    pub config: Option<PathBuf>,
}

/// 处理 send 命令
pub fn handle_send(args: SendArgs) -> Result<()> {
    let mut config = AppConfig::load(args.config.as_deref())?;
    if args.sandbox {
        config.sms.sandbox = true;
    }

    let channel = SmsChannelBuilder::from_config(&config).build()?;
    let notification = SmsText::new(args.message.to_message()?);

    match channel.send(&args.message.route(), &notification)? {
        Some(response) => println!("{}", format_output(&response)),
        None if config.sms.sandbox => eprintln!("[SANDBOX] 短信校验通过，未实际发送"),
        None => eprintln!("没有可发送的接收者"),
    }
    Ok(())
}

/// 把 payload 原样返回的网关，用于预览
struct PreviewGateway;

impl SmsGateway for PreviewGateway {
    fn name(&self) -> &str {
        "preview"
    }

    fn post(&self, path: &str, payload: &serde_json::Value) -> Result<serde_json::Value> {
        Ok(serde_json::json!({ "path": path, "body": payload }))
    }
}

/// 构建将要提交的请求（不访问网络）
pub fn preview_payload(config: &AppConfig, message: &MessageArgs) -> Result<Option<serde_json::Value>> {
    let mut channel_config = config.sms.clone();
    channel_config.sandbox = false;
    if channel_config.account.trim().is_empty() {
        channel_config.account = "{account}".to_string();
    }

    let channel = crate::notification::OvhSmsChannel::new(Arc::new(PreviewGateway), channel_config);
    let notification = SmsText::new(message.to_message()?);
    Ok(channel.send(&message.route(), &notification)?)
}

/// 处理 payload 命令
pub fn handle_payload(args: PayloadArgs) -> Result<()> {
    let config = AppConfig::load_unchecked(args.config.as_deref())?;
    match preview_payload(&config, &args.message)? {
        Some(request) => println!("{}", format_output(&request)),
        None => eprintln!("没有可发送的接收者"),
    }
    Ok(())
}

/// 处理 config 命令
pub fn handle_config(args: ConfigArgs) -> Result<()> {
    let config = AppConfig::load_unchecked(args.config.as_deref())?;
    println!("{}", format_output(&config.masked()));
    if let Err(e) = config.validate() {
        eprintln!("警告: {}", e);
    }
    Ok(())
}

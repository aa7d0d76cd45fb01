use anyhow::Result;
use clap::{Parser, Subcommand};
use ovh_sms_channel::cli::{handle_config, handle_payload, handle_send, ConfigArgs, PayloadArgs, SendArgs};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "ovhsms")]
#[command(about = "OVH SMS Channel - 通过 OVH SMS API 发送短信通知")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 发送短信
    Send(SendArgs),
    /// 打印将要提交的请求，不访问网络
    Payload(PayloadArgs),
    /// 显示当前生效的配置（隐藏密钥）
    Config(ConfigArgs),
}

fn main() -> Result<()> {
    // 通过 RUST_LOG 控制日志级别，例如: RUST_LOG=debug ovhsms send ...
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("ovh_sms_channel=info,ovhsms=info"));

    fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Send(args) => handle_send(args)?,
        Commands::Payload(args) => handle_payload(args)?,
        Commands::Config(args) => handle_config(args)?,
    }

    Ok(())
}

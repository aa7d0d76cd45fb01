//! 短信通知 - 把应用通知转换为 OVH SMS job
//!
//! # 组成
//! 1. `SmsMessage`：短信内容和参数，自带校验
//! 2. `Notifiable` / `Notification` / `SmsNotification`：路由和转换协作方
//! 3. `OvhSmsChannel`：解析接收者、补齐默认值、构建 payload 并提交到网关
//!
//! # 使用示例
//! ```ignore
//! use ovh_sms_channel::notification::{PhoneRoute, SmsChannelBuilder, SmsText};
//!
//! let channel = SmsChannelBuilder::from_config(&AppConfig::auto_load()?).build()?;
//! let response = channel.send(&PhoneRoute::new(["+33600000001"]), &SmsText::new("Hello"))?;
//! ```

pub mod builder;
pub mod channel;
pub mod dispatcher;
pub mod message;
pub mod payload;

pub use builder::SmsChannelBuilder;
pub use channel::{Notifiable, Notification, PhoneRoute, SmsContent, SmsNotification, SmsText, CHANNEL_NAME};
pub use dispatcher::OvhSmsChannel;
pub use message::{Coding, Priority, Receivers, SmsMessage, DEFAULT_VALIDITY_PERIOD};
pub use payload::{jobs_path, SmsJobPayload};

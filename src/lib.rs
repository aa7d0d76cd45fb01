//! OVH SMS Channel - 通过 OVH SMS API 发送短信通知

pub mod cli;
pub mod config;
pub mod error;
pub mod gateway;
pub mod notification;

pub use config::{AppConfig, OvhApiConfig, SmsChannelConfig};
pub use error::{Result, SmsError};
pub use gateway::{OvhClient, OvhEndpoint, SmsGateway};
pub use notification::{
    Coding, Notifiable, Notification, OvhSmsChannel, PhoneRoute, Priority, Receivers, SmsChannelBuilder,
    SmsContent, SmsJobPayload, SmsMessage, SmsNotification, SmsText, CHANNEL_NAME,
};

//! 外部协作者 - 目录 / 翻译 / 支付 / 通知
//!
//! # 服务列表
//!
//! - [`CatalogProvider`] / [`StaticCatalog`] - 只读菜单数据
//! - [`Translator`] / [`Translations`] - 多语言文本 (locale → 默认 locale → key)
//! - [`PaymentProcessor`] / [`SimulatedPayment`] - 支付处理
//! - [`Notifier`] / [`LogNotifier`] / [`MemoryNotifier`] - 提示消息

pub mod catalog;
pub mod i18n;
pub mod notify;
pub mod payment;

pub use catalog::{CatalogProvider, StaticCatalog};
pub use i18n::{Translations, Translator};
pub use notify::{LogNotifier, MemoryNotifier, Notification, Notifier, Severity};
pub use payment::{PaymentProcessor, SimulatedPayment, validate_card};

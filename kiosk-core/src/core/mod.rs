//! 核心模块 - 配置、会话、门面和运行时
//!
//! # 模块结构
//!
//! - [`Config`] - 终端配置 (环境变量)
//! - [`Session`] - 单个顾客的会话状态
//! - [`Kiosk`] - 所有用户操作的入口
//! - [`KioskRuntime`] - tokio 事件循环

pub mod config;
pub mod kiosk;
pub mod runtime;
pub mod session;

pub use config::Config;
pub use kiosk::{Collaborators, Kiosk, PaymentTicket, ResetReason, UiEffect};
pub use runtime::{KioskCommand, KioskHandle, KioskRuntime, KioskSnapshot, RuntimeError};
pub use session::{Preferences, Session};

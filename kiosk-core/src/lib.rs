//! Kiosk Core - 自助点餐终端会话引擎
//!
//! # 架构概述
//!
//! 一个顾客从欢迎页到支付完成的全部交互状态：
//!
//! - **计价** (`orders::money`): 单价、小计、税、总额 (rust_decimal)
//! - **购物车** (`orders::cart`): 按 LineId 合并、改数量、编辑、删除
//! - **导航** (`navigation`): 固定步骤流程 + 空购物车拦截
//! - **定制向导** (`wizard`): 单个菜品的选项 / 数量 / 备注
//! - **空闲看门狗** (`watchdog`): 无操作提示 + 自动重置
//! - **滑动手势** (`gesture`): 滑动提交判定 + 阻尼显示
//!
//! # 模块结构
//!
//! ```text
//! kiosk-core/src/
//! ├── core/          # 配置、会话、Kiosk 门面、运行时
//! ├── common/        # 日志
//! ├── orders/        # 计价和购物车
//! ├── navigation/    # 步骤状态机
//! ├── wizard/        # 定制向导
//! ├── watchdog/      # 空闲看门狗
//! ├── gesture/       # 滑动手势识别
//! └── services/      # 目录、翻译、支付、通知
//! ```

pub mod common;
pub mod core;
pub mod gesture;
pub mod navigation;
pub mod orders;
pub mod services;
pub mod watchdog;
pub mod wizard;

// Re-export 公共类型
pub use core::{
    Collaborators, Config, Kiosk, KioskCommand, KioskHandle, KioskRuntime, KioskSnapshot,
    PaymentTicket, ResetReason, UiEffect,
};
pub use gesture::{SwipeConfig, SwipeDecision, SwipeRecognizer};
pub use navigation::{NavOutcome, NavPolicy, Navigator, StepState};
pub use orders::Cart;
pub use watchdog::{IdleWatchdog, WatchdogConfig, WatchdogState};
pub use wizard::{CommitOutcome, CustomizationWizard, WizardStep};

// Re-export logger functions
pub use common::logger::{cleanup_old_logs, init_logger, init_logger_with_file};

pub fn print_banner() {
    println!(
        r#"
    __ __ _           __
   / //_/(_)___  ____/ /__
  / ,<  / / __ \/ ___/ //_/
 / /| |/ / /_/ (__  ) ,<
/_/ |_/_/\____/____/_/|_|
    "#
    );
}

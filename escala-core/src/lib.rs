//! Escala Core - 教会排班与提醒系统核心
//!
//! # 架构概述
//!
//! 本模块是 Escala 的主入口，提供以下核心功能：
//!
//! - **状态存储** (`db`): redb 键值存储 + 内置默认数据集
//! - **聚合状态** (`store`): 成员、账号、排班组与会话
//! - **排班逻辑** (`roster`): 参与者解析与一致性传播
//! - **服务层** (`services`): 提醒引擎、推送/邮件边界、头像处理
//! - **认证** (`auth`): 登录、注册、密码重置
//!
//! # 模块结构
//!
//! ```text
//! escala-core/src/
//! ├── core/          # 配置、状态、错误
//! ├── auth/          # 会话与认证门面
//! ├── store/         # 聚合状态与持久化
//! ├── roster/        # 参与者解析、一致性引擎
//! ├── services/      # 提醒、推送、邮件、头像
//! ├── db/            # 状态存储与默认数据
//! └── utils/         # 工具函数
//! ```

pub mod auth;
pub mod core;
pub mod db;
pub mod roster;
pub mod services;
pub mod store;
pub mod utils;

// Re-export 公共类型
pub use auth::{AuthGate, AuthOutcome};
pub use core::{AppError, AppResult, AppState, Config};
pub use db::{StateStorage, StorageError};
pub use services::mailer::{LogMailer, Mailer};
pub use services::push::{DisconnectedChannel, PushChannel, PushPermission};
pub use services::reminder::ReminderOutcome;
pub use store::RosterStore;

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};

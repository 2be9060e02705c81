//! 数据模型模块
//!
//! 包含所有核心数据结构:
//! - errors: 错误类型定义 (登录流程、配置加载)
//! - platform: 登录平台标识
//! - token: 授权凭证
//! - user_profile: 平台用户信息
//! - login_result: 登录结果与三种终态
//! - login_attempt: 单次登录尝试的状态追踪
//! - social_config: 平台配置值对象
//!
//! # 日志安全
//! 令牌与AppKey只以脱敏形式出现在日志中。

pub mod errors;
pub mod login_attempt;
pub mod login_result;
pub mod platform;
pub mod social_config;
pub mod token;
pub mod user_profile;

// 重导出常用类型,简化外部引用
pub use errors::{ConfigError, LoginError};
pub use login_attempt::{LoginAttempt, LoginState};
pub use login_result::{LoginOutcome, LoginResult};
pub use platform::LoginPlatform;
pub use social_config::SocialConfig;
pub use token::AccessToken;
pub use user_profile::{Gender, UserProfile};

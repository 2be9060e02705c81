//! QQ / 微博第三方登录适配层
//!
//! - `models`: 凭证、用户信息、登录结果与错误类型
//! - `platforms`: 各平台的授权数据解析与用户信息接口
//! - `services`: 登录适配器、回调归一化、用户信息获取
//! - `state`: 适配器共享的运行环境
//! - `utils`: 日志与通用工具

pub mod models;
pub mod platforms;
pub mod services;
pub mod state;
pub mod utils;

pub use models::{
    AccessToken, ConfigError, Gender, LoginError, LoginOutcome, LoginPlatform, LoginResult,
    SocialConfig, UserProfile,
};
pub use services::{LoginAdapter, LoginListener, QqLoginAdapter, WeiboLoginAdapter};
pub use state::LoginContext;

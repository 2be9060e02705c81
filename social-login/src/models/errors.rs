use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::LoginPlatform;

/// 登录流程相关错误
///
/// 覆盖从授权回调到用户信息获取的所有失败场景。
/// 所有错误都通过监听器的失败回调交给调用方,不会导致进程崩溃。
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum LoginError {
    /// 用户取消授权
    ///
    /// 适配器以 `login_cancel` 回调交付取消,不产生此值;
    /// 宿主用 [`LoginOutcome::into_result`](crate::models::LoginOutcome::into_result)
    /// 把三种终态折叠为 `Result` 时使用
    #[error("用户取消授权")]
    AuthCancelled,

    /// 第三方SDK报告授权失败
    ///
    /// 携带平台返回的错误码与描述
    #[error("{message}")]
    AuthFailed {
        platform: LoginPlatform,
        code: Option<i32>,
        message: String,
    },

    /// 授权数据解析失败
    ///
    /// SDK回调的授权数据缺少 access_token / openid 等必需字段
    #[error("授权数据解析失败: {0}")]
    TokenParseFailed(String),

    /// 用户信息获取失败
    ///
    /// 可能原因:
    /// - 网络请求失败
    /// - HTTP状态码非2xx
    /// - 响应不是合法JSON,或平台返回错误码
    #[error("{platform}用户信息获取失败: {reason}")]
    ProfileFetchFailed {
        platform: LoginPlatform,
        reason: String,
    },

    /// SDK无法启动授权流程
    #[error("授权流程启动失败: {0}")]
    SdkLaunchFailed(String),
}

impl LoginError {
    /// 构造平台授权失败错误
    ///
    /// 诊断文本格式: `QQError: 100044 invalid scope`,与平台SDK的日志习惯保持一致
    pub fn auth_failed(
        platform: LoginPlatform,
        code: Option<i32>,
        detail: impl AsRef<str>,
    ) -> Self {
        LoginError::AuthFailed {
            platform,
            code,
            message: vendor_diagnostic(platform, code, detail.as_ref()),
        }
    }

    /// 构造授权流程启动失败错误,诊断文本格式与 [`LoginError::auth_failed`] 相同
    pub fn sdk_launch(platform: LoginPlatform, code: Option<i32>, detail: impl AsRef<str>) -> Self {
        LoginError::SdkLaunchFailed(vendor_diagnostic(platform, code, detail.as_ref()))
    }

    /// 构造用户信息获取失败错误
    pub fn profile_fetch(platform: LoginPlatform, reason: impl Into<String>) -> Self {
        LoginError::ProfileFetchFailed {
            platform,
            reason: reason.into(),
        }
    }

    /// 将reqwest错误映射为用户信息获取失败
    pub fn from_http(platform: LoginPlatform, err: reqwest::Error) -> Self {
        let reason = if err.is_timeout() {
            "请求超时".to_string()
        } else if err.is_connect() {
            "无法连接到服务器".to_string()
        } else if let Some(status) = err.status() {
            format!("HTTP错误 {}", status.as_u16())
        } else {
            err.to_string()
        };
        LoginError::profile_fetch(platform, reason)
    }

    /// 错误类别名,用于结构化日志的 `error_type` 字段
    pub fn kind(&self) -> &'static str {
        match self {
            LoginError::AuthCancelled => "AuthCancelled",
            LoginError::AuthFailed { .. } => "AuthFailed",
            LoginError::TokenParseFailed(_) => "TokenParseFailed",
            LoginError::ProfileFetchFailed { .. } => "ProfileFetchFailed",
            LoginError::SdkLaunchFailed(_) => "SdkLaunchFailed",
        }
    }
}

/// 平台SDK错误的诊断文本: `<平台>Error: <错误码> <描述>`
fn vendor_diagnostic(platform: LoginPlatform, code: Option<i32>, detail: &str) -> String {
    match code {
        Some(code) if detail.is_empty() => format!("{}Error: {}", platform.tag(), code),
        Some(code) => format!("{}Error: {} {}", platform.tag(), code, detail),
        None => format!("{}Error: {}", platform.tag(), detail),
    }
}

/// 配置加载相关错误
#[derive(Debug, Error, Serialize, Deserialize)]
#[serde(tag = "error", content = "details")]
pub enum ConfigError {
    /// 读取 .env 文件时的文件系统错误
    #[error("I/O错误: {0}")]
    IoError(String),

    /// .env 文件格式错误
    #[error("配置文件格式错误: {0}")]
    ParseError(String),

    /// 缺少必需的配置项
    ///
    /// 只有在构建对应平台的适配器时才会检查
    #[error("缺少必需的配置项: {0}")]
    MissingKey(String),

    /// 配置项取值非法
    #[error("配置项 {key} 取值非法: {value}")]
    InvalidValue { key: String, value: String },

    /// HTTP客户端初始化失败
    #[error("HTTP客户端初始化失败: {0}")]
    HttpClientInit(String),
}

impl From<std::io::Error> for ConfigError {
    fn from(err: std::io::Error) -> Self {
        ConfigError::IoError(err.to_string())
    }
}

impl From<dotenvy::Error> for ConfigError {
    fn from(err: dotenvy::Error) -> Self {
        match err {
            dotenvy::Error::Io(e) => ConfigError::IoError(e.to_string()),
            other => ConfigError::ParseError(other.to_string()),
        }
    }
}

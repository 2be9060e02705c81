//! 平台实现
//!
//! 每个平台只负责数据形态的转换:
//! - 授权数据 -> [`AccessToken`]
//! - 用户信息接口地址与参数
//! - 用户信息响应 -> [`UserProfile`]
//!
//! 登录流程本身由 [`crate::services::LoginAdapter`] 统一驱动。

pub mod qq;
pub mod weibo;

use reqwest::Url;
use serde_json::{Map, Value};

use crate::models::{AccessToken, ConfigError, LoginError, LoginPlatform, SocialConfig, UserProfile};
use crate::services::sdk::AuthPayload;
use crate::utils::json_fields::{i64_field, string_field};

pub use qq::QqProvider;
pub use weibo::WeiboProvider;

/// 平台数据转换策略
pub trait PlatformProvider: Send + Sync + 'static {
    /// 平台标识
    fn platform(&self) -> LoginPlatform;

    /// 校验本平台必需的配置项
    fn validate_config(&self, config: &SocialConfig) -> Result<(), ConfigError>;

    /// 授权范围
    fn scope<'a>(&self, config: &'a SocialConfig) -> &'a str;

    /// 解析SDK授权数据
    ///
    /// # 错误
    /// - `LoginError::TokenParseFailed`: 数据格式错误或缺少必需字段
    fn parse_token(&self, payload: AuthPayload) -> Result<AccessToken, LoginError>;

    /// 构造用户信息请求地址 (含查询参数)
    fn user_info_url(&self, config: &SocialConfig, token: &AccessToken) -> Result<Url, LoginError>;

    /// 解析用户信息响应
    ///
    /// # 错误
    /// - `LoginError::ProfileFetchFailed`: 响应结构不符或平台返回错误码
    fn parse_user(&self, token: &AccessToken, body: Value) -> Result<UserProfile, LoginError>;
}

/// 拼接接口地址与查询参数,参数值会被URL编码
pub(crate) fn build_url(
    platform: LoginPlatform,
    base: &str,
    params: &[(&str, &str)],
) -> Result<Url, LoginError> {
    Url::parse_with_params(base, params).map_err(|e| {
        LoginError::profile_fetch(platform, format!("非法的接口地址 {}: {}", base, e))
    })
}

/// 取出JSON对象,非对象视为响应结构错误
pub(crate) fn expect_object(
    platform: LoginPlatform,
    body: Value,
) -> Result<Map<String, Value>, LoginError> {
    match body {
        Value::Object(obj) => Ok(obj),
        other => Err(LoginError::profile_fetch(
            platform,
            format!("响应不是JSON对象: {}", type_name(&other)),
        )),
    }
}

/// 去掉已映射的字段,其余原样保留
pub(crate) fn remaining_fields(
    mut obj: Map<String, Value>,
    consumed: &[&str],
) -> Map<String, Value> {
    for key in consumed {
        obj.remove(*key);
    }
    obj
}

/// 读取授权数据中的 `expires_in` 并设置到凭证上
///
/// 字段缺失时保持凭证不变;不是整数或超出时间范围时视为授权数据非法
pub(crate) fn apply_expires_in(
    obj: &Map<String, Value>,
    token: AccessToken,
) -> Result<AccessToken, LoginError> {
    if string_field(obj, "expires_in").is_none() {
        return Ok(token);
    }
    let expires_in = i64_field(obj, "expires_in")
        .ok_or_else(|| LoginError::TokenParseFailed("expires_in 格式错误".to_string()))?;
    token
        .try_with_expires_in(expires_in)
        .ok_or_else(|| LoginError::TokenParseFailed("expires_in 超出范围".to_string()))
}

pub(crate) fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

use serde::{Deserialize, Serialize};

use crate::models::{AccessToken, LoginError, LoginPlatform, UserProfile};

/// 登录结果
///
/// 每次登录尝试的终值,只交付一次。
/// 未请求用户信息时 `user` 为空。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoginResult {
    pub platform: LoginPlatform,
    pub token: AccessToken,
    pub user: Option<UserProfile>,
}

impl LoginResult {
    /// 仅包含授权凭证的结果
    pub fn with_token(token: AccessToken) -> Self {
        Self {
            platform: token.platform,
            token,
            user: None,
        }
    }

    /// 包含授权凭证与用户信息的结果
    pub fn with_user(token: AccessToken, user: UserProfile) -> Self {
        Self {
            platform: token.platform,
            token,
            user: Some(user),
        }
    }
}

/// 登录尝试的三种终态
///
/// 多方法的监听器回调被归一化为这一个枚举,
/// 每次登录尝试恰好产出一个值。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "outcome", content = "data", rename_all = "snake_case")]
pub enum LoginOutcome {
    Success(LoginResult),
    Cancelled,
    Failed(LoginError),
}

impl LoginOutcome {
    pub fn is_success(&self) -> bool {
        matches!(self, LoginOutcome::Success(_))
    }

    /// 折叠为 `Result`,取消映射为 [`LoginError::AuthCancelled`]
    ///
    /// 适用于只区分成功与否的宿主
    pub fn into_result(self) -> Result<LoginResult, LoginError> {
        match self {
            LoginOutcome::Success(result) => Ok(result),
            LoginOutcome::Cancelled => Err(LoginError::AuthCancelled),
            LoginOutcome::Failed(error) => Err(error),
        }
    }

    /// 结果名称,用于结构化日志
    pub fn label(&self) -> &'static str {
        match self {
            LoginOutcome::Success(_) => "success",
            LoginOutcome::Cancelled => "cancelled",
            LoginOutcome::Failed(_) => "failed",
        }
    }
}

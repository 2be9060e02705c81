use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize};

use crate::models::LoginPlatform;
use crate::utils::redact::mask_secret;

/// 授权凭证
///
/// 授权回调成功后由平台数据解析得到,解析后不可变。
/// 仅在可选的用户信息获取期间被适配器持有,随后交给调用方。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AccessToken {
    /// 所属平台
    pub platform: LoginPlatform,

    /// 访问令牌
    pub access_token: String,

    /// 平台用户标识 (QQ为openid,微博为uid)
    pub openid: String,

    /// 刷新令牌 (仅微博返回)
    pub refresh_token: Option<String>,

    /// 有效期(秒),平台未返回时为空
    pub expires_in: Option<i64>,

    /// 过期时间,由 `obtained_at + expires_in` 推算
    pub expires_at: Option<DateTime<Utc>>,

    /// 获取时间
    pub obtained_at: DateTime<Utc>,
}

impl AccessToken {
    pub fn new(platform: LoginPlatform, access_token: String, openid: String) -> Self {
        Self {
            platform,
            access_token,
            openid,
            refresh_token: None,
            expires_in: None,
            expires_at: None,
            obtained_at: Utc::now(),
        }
    }

    /// 设置有效期 (构建器模式)
    ///
    /// 有效期超出时间可表示范围时返回 `None`
    pub fn try_with_expires_in(mut self, expires_in: i64) -> Option<Self> {
        let expires_at = TimeDelta::try_seconds(expires_in)
            .and_then(|delta| self.obtained_at.checked_add_signed(delta))?;
        self.expires_in = Some(expires_in);
        self.expires_at = Some(expires_at);
        Some(self)
    }

    /// 设置刷新令牌 (构建器模式)
    pub fn with_refresh_token(mut self, refresh_token: String) -> Self {
        self.refresh_token = Some(refresh_token);
        self
    }

    /// 是否已过期
    ///
    /// 平台未返回有效期时视为未过期
    pub fn is_expired(&self) -> bool {
        self.expires_at.map(|at| Utc::now() > at).unwrap_or(false)
    }

    /// 脱敏后的令牌,仅用于日志
    pub fn masked_access_token(&self) -> String {
        mask_secret(&self.access_token)
    }
}

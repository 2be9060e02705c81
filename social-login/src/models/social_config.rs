use serde::{Deserialize, Serialize};

use crate::models::ConfigError;
use crate::utils::redact::mask_secret;

/// QQ互联默认授权范围
pub const DEFAULT_QQ_SCOPE: &str = "get_simple_userinfo";

/// 微博默认授权范围
pub const DEFAULT_WEIBO_SCOPE: &str = "email,direct_messages_read,direct_messages_write,\
friendships_groups_read,friendships_groups_write,statuses_to_me_read,\
follow_app_official_microblog,invitation_write";

/// QQ用户信息接口
pub const DEFAULT_QQ_USER_INFO_URL: &str = "https://graph.qq.com/user/get_user_info";

/// 微博用户信息接口
pub const DEFAULT_WEIBO_USER_INFO_URL: &str = "https://api.weibo.com/2/users/show.json";

/// 第三方登录配置
///
/// 启动时构建一次,以 `Arc` 共享给各平台适配器。
/// 平台必需字段只在构建对应适配器时校验。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialConfig {
    /// QQ互联 AppID
    pub qq_app_id: Option<String>,

    /// QQ授权范围
    pub qq_scope: String,

    /// 微博 AppKey
    pub weibo_app_key: Option<String>,

    /// 微博授权回调地址
    pub weibo_redirect_url: Option<String>,

    /// 微博授权范围
    pub weibo_scope: String,

    /// QQ用户信息接口地址
    pub qq_user_info_url: String,

    /// 微博用户信息接口地址
    pub weibo_user_info_url: String,

    /// 用户信息请求超时(秒),为空时使用HTTP客户端默认值
    pub http_timeout_secs: Option<u64>,
}

impl Default for SocialConfig {
    fn default() -> Self {
        Self {
            qq_app_id: None,
            qq_scope: DEFAULT_QQ_SCOPE.to_string(),
            weibo_app_key: None,
            weibo_redirect_url: None,
            weibo_scope: DEFAULT_WEIBO_SCOPE.to_string(),
            qq_user_info_url: DEFAULT_QQ_USER_INFO_URL.to_string(),
            weibo_user_info_url: DEFAULT_WEIBO_USER_INFO_URL.to_string(),
            http_timeout_secs: None,
        }
    }
}

impl SocialConfig {
    /// 设置QQ AppID (构建器模式)
    pub fn with_qq(mut self, app_id: impl Into<String>) -> Self {
        self.qq_app_id = Some(app_id.into());
        self
    }

    /// 设置微博 AppKey 与回调地址 (构建器模式)
    pub fn with_weibo(mut self, app_key: impl Into<String>, redirect_url: impl Into<String>) -> Self {
        self.weibo_app_key = Some(app_key.into());
        self.weibo_redirect_url = Some(redirect_url.into());
        self
    }

    /// 覆盖用户信息接口地址 (测试或预发环境)
    pub fn with_user_info_urls(
        mut self,
        qq_url: impl Into<String>,
        weibo_url: impl Into<String>,
    ) -> Self {
        self.qq_user_info_url = qq_url.into();
        self.weibo_user_info_url = weibo_url.into();
        self
    }

    pub fn with_http_timeout_secs(mut self, secs: u64) -> Self {
        self.http_timeout_secs = Some(secs);
        self
    }

    /// 校验QQ登录所需配置,返回 AppID
    pub fn require_qq(&self) -> Result<&str, ConfigError> {
        non_empty(self.qq_app_id.as_deref(), "SOCIAL_QQ_APP_ID")
    }

    /// 校验微博登录所需配置,返回 (AppKey, 回调地址)
    pub fn require_weibo(&self) -> Result<(&str, &str), ConfigError> {
        let app_key = non_empty(self.weibo_app_key.as_deref(), "SOCIAL_WEIBO_APP_KEY")?;
        let redirect_url = non_empty(
            self.weibo_redirect_url.as_deref(),
            "SOCIAL_WEIBO_REDIRECT_URL",
        )?;
        Ok((app_key, redirect_url))
    }

    /// 生成日志摘要 (隐藏敏感信息)
    pub fn summary_for_logging(&self) -> String {
        format!(
            "qq_app_id={}, weibo_app_key={}, weibo_redirect_url={}, timeout={}",
            self.qq_app_id.as_deref().map(mask_secret).unwrap_or_else(|| "-".into()),
            self.weibo_app_key.as_deref().map(mask_secret).unwrap_or_else(|| "-".into()),
            self.weibo_redirect_url.as_deref().unwrap_or("-"),
            self.http_timeout_secs
                .map(|s| format!("{}s", s))
                .unwrap_or_else(|| "default".into()),
        )
    }
}

fn non_empty<'a>(value: Option<&'a str>, key: &str) -> Result<&'a str, ConfigError> {
    match value.map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(ConfigError::MissingKey(key.to_string())),
    }
}

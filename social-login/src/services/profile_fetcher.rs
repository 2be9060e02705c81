use reqwest::Client;
use serde_json::Value;
use std::time::Duration;

use crate::models::{AccessToken, ConfigError, LoginError, SocialConfig, UserProfile};
use crate::platforms::PlatformProvider;

/// 用户信息获取服务
///
/// 职责: 用授权凭证请求平台用户信息接口,解析为 [`UserProfile`]。
/// 每次调用只发一次GET请求,失败不重试。
pub struct ProfileFetcher {
    client: Client,
}

impl ProfileFetcher {
    /// 创建新的获取服务
    ///
    /// 配置了 `http_timeout_secs` 时设置请求超时,否则沿用HTTP客户端默认值
    pub fn new(config: &SocialConfig) -> Result<Self, ConfigError> {
        let mut builder = Client::builder();
        if let Some(secs) = config.http_timeout_secs {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let client = builder
            .build()
            .map_err(|e| ConfigError::HttpClientInit(e.to_string()))?;

        tracing::info!(
            timeout_secs = ?config.http_timeout_secs,
            "Profile fetcher initialized"
        );

        Ok(Self { client })
    }

    /// 获取用户信息
    ///
    /// # 错误
    /// - `LoginError::ProfileFetchFailed`: 网络失败、HTTP状态码非2xx、
    ///   响应不是合法JSON或平台返回错误码
    pub async fn fetch<P>(
        &self,
        provider: &P,
        config: &SocialConfig,
        token: &AccessToken,
    ) -> Result<UserProfile, LoginError>
    where
        P: PlatformProvider + ?Sized,
    {
        let platform = provider.platform();
        let url = provider.user_info_url(config, token)?;

        tracing::debug!(
            platform = %platform,
            endpoint = %url.path(),
            openid = %token.openid,
            "Fetching user info"
        );

        let response = self.client.get(url).send().await.map_err(|e| {
            tracing::error!(platform = %platform, error = %e, "用户信息请求失败");
            LoginError::from_http(platform, e)
        })?;

        let status = response.status();
        let body = response
            .bytes()
            .await
            .map_err(|e| LoginError::from_http(platform, e))?;

        if !status.is_success() {
            tracing::error!(
                platform = %platform,
                status = %status.as_u16(),
                body = %String::from_utf8_lossy(&body),
                "用户信息接口返回错误状态"
            );
            return Err(LoginError::profile_fetch(
                platform,
                format!("HTTP错误 {}", status.as_u16()),
            ));
        }

        let json: Value = serde_json::from_slice(&body).map_err(|e| {
            tracing::error!(
                platform = %platform,
                error = %e,
                body = %String::from_utf8_lossy(&body),
                "用户信息响应解析失败"
            );
            LoginError::profile_fetch(platform, format!("响应数据解析失败: {}", e))
        })?;

        let profile = provider.parse_user(token, json)?;

        tracing::info!(
            platform = %platform,
            openid = %profile.openid,
            nickname = ?profile.nickname,
            "User info fetched"
        );

        Ok(profile)
    }
}

use reqwest::Url;
use serde_json::Value;

use crate::models::{
    AccessToken, ConfigError, Gender, LoginError, LoginPlatform, SocialConfig, UserProfile,
};
use crate::platforms::{
    apply_expires_in, build_url, expect_object, remaining_fields, type_name, PlatformProvider,
};
use crate::services::sdk::AuthPayload;
use crate::utils::json_fields::{i64_field, string_field};

/// 已映射到 [`UserProfile`] 的字段
const CONSUMED_FIELDS: &[&str] = &[
    "ret",
    "msg",
    "nickname",
    "gender",
    "figureurl_qq_1",
    "figureurl_qq_2",
    "province",
    "city",
];

/// QQ互联
#[derive(Debug, Clone, Copy, Default)]
pub struct QqProvider;

impl PlatformProvider for QqProvider {
    fn platform(&self) -> LoginPlatform {
        LoginPlatform::Qq
    }

    fn validate_config(&self, config: &SocialConfig) -> Result<(), ConfigError> {
        config.require_qq().map(|_| ())
    }

    fn scope<'a>(&self, config: &'a SocialConfig) -> &'a str {
        &config.qq_scope
    }

    /// QQ SDK `onComplete` 返回的JSON:
    /// `{"ret":0,"openid":"...","access_token":"...","expires_in":7776000,...}`
    fn parse_token(&self, payload: AuthPayload) -> Result<AccessToken, LoginError> {
        let obj = match payload {
            AuthPayload::Json(Value::Object(obj)) => obj,
            AuthPayload::Json(other) => {
                return Err(LoginError::TokenParseFailed(format!(
                    "QQ授权数据不是JSON对象: {}",
                    type_name(&other)
                )))
            }
            AuthPayload::Bundle(_) => {
                return Err(LoginError::TokenParseFailed(
                    "QQ授权数据应为JSON对象".to_string(),
                ))
            }
        };

        if let Some(ret) = i64_field(&obj, "ret").filter(|ret| *ret != 0) {
            let msg = string_field(&obj, "msg").unwrap_or_default();
            return Err(LoginError::TokenParseFailed(format!(
                "QQ授权返回错误 ret={} {}",
                ret, msg
            )));
        }

        let access_token = string_field(&obj, "access_token")
            .ok_or_else(|| LoginError::TokenParseFailed("缺少 access_token".to_string()))?;
        let openid = string_field(&obj, "openid")
            .ok_or_else(|| LoginError::TokenParseFailed("缺少 openid".to_string()))?;

        apply_expires_in(&obj, AccessToken::new(LoginPlatform::Qq, access_token, openid))
    }

    fn user_info_url(&self, config: &SocialConfig, token: &AccessToken) -> Result<Url, LoginError> {
        let app_id = config
            .require_qq()
            .map_err(|e| LoginError::profile_fetch(LoginPlatform::Qq, e.to_string()))?;

        build_url(
            LoginPlatform::Qq,
            &config.qq_user_info_url,
            &[
                ("access_token", token.access_token.as_str()),
                ("oauth_consumer_key", app_id),
                ("openid", token.openid.as_str()),
            ],
        )
    }

    /// `get_user_info` 响应: `ret` 为0表示成功,用户标识取自授权凭证
    fn parse_user(&self, token: &AccessToken, body: Value) -> Result<UserProfile, LoginError> {
        let obj = expect_object(LoginPlatform::Qq, body)?;

        if let Some(ret) = i64_field(&obj, "ret").filter(|ret| *ret != 0) {
            let msg = string_field(&obj, "msg").unwrap_or_default();
            return Err(LoginError::profile_fetch(
                LoginPlatform::Qq,
                format!("ret={} {}", ret, msg),
            ));
        }

        let mut profile = UserProfile::new(LoginPlatform::Qq, token.openid.clone());
        profile.nickname = string_field(&obj, "nickname");
        profile.gender = match string_field(&obj, "gender").as_deref() {
            Some("男") => Gender::Male,
            Some("女") => Gender::Female,
            _ => Gender::Unknown,
        };
        profile.head_image_url = string_field(&obj, "figureurl_qq_1");
        profile.head_image_url_large = string_field(&obj, "figureurl_qq_2");
        profile.province = string_field(&obj, "province");
        profile.city = string_field(&obj, "city");
        profile.extra = remaining_fields(obj, CONSUMED_FIELDS);

        Ok(profile)
    }
}

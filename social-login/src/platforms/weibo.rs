use reqwest::Url;
use serde_json::{Map, Value};

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
    "id",
    "idstr",
    "screen_name",
    "name",
    "gender",
    "profile_image_url",
    "avatar_hd",
    "avatar_large",
    "province",
    "city",
];

/// 新浪微博
#[derive(Debug, Clone, Copy, Default)]
pub struct WeiboProvider;

impl PlatformProvider for WeiboProvider {
    fn platform(&self) -> LoginPlatform {
        LoginPlatform::Weibo
    }

    fn validate_config(&self, config: &SocialConfig) -> Result<(), ConfigError> {
        config.require_weibo().map(|_| ())
    }

    fn scope<'a>(&self, config: &'a SocialConfig) -> &'a str {
        &config.weibo_scope
    }

    /// 微博SDK授权 Bundle: `uid`, `access_token`, `expires_in`, `refresh_token`, `phone_num`
    ///
    /// 网页授权回调以JSON对象返回同样的字段,一并支持
    fn parse_token(&self, payload: AuthPayload) -> Result<AccessToken, LoginError> {
        let obj: Map<String, Value> = match payload {
            AuthPayload::Bundle(bundle) => bundle
                .into_iter()
                .map(|(k, v)| (k, Value::String(v)))
                .collect(),
            AuthPayload::Json(Value::Object(obj)) => obj,
            AuthPayload::Json(other) => {
                return Err(LoginError::TokenParseFailed(format!(
                    "微博授权数据格式错误: {}",
                    type_name(&other)
                )))
            }
        };

        let access_token = string_field(&obj, "access_token")
            .ok_or_else(|| LoginError::TokenParseFailed("缺少 access_token".to_string()))?;
        let uid = string_field(&obj, "uid")
            .ok_or_else(|| LoginError::TokenParseFailed("缺少 uid".to_string()))?;

        let mut token =
            apply_expires_in(&obj, AccessToken::new(LoginPlatform::Weibo, access_token, uid))?;
        if let Some(refresh_token) = string_field(&obj, "refresh_token") {
            token = token.with_refresh_token(refresh_token);
        }
        Ok(token)
    }

    fn user_info_url(&self, config: &SocialConfig, token: &AccessToken) -> Result<Url, LoginError> {
        build_url(
            LoginPlatform::Weibo,
            &config.weibo_user_info_url,
            &[
                ("access_token", token.access_token.as_str()),
                ("uid", token.openid.as_str()),
            ],
        )
    }

    /// `users/show.json` 响应;出错时返回 `{"error_code":21327,"error":"expired_token"}`
    fn parse_user(&self, _token: &AccessToken, body: Value) -> Result<UserProfile, LoginError> {
        let obj = expect_object(LoginPlatform::Weibo, body)?;

        if let Some(code) = i64_field(&obj, "error_code") {
            let error = string_field(&obj, "error").unwrap_or_default();
            return Err(LoginError::profile_fetch(
                LoginPlatform::Weibo,
                format!("error_code={} {}", code, error),
            ));
        }

        let openid = string_field(&obj, "id")
            .or_else(|| string_field(&obj, "idstr"))
            .ok_or_else(|| LoginError::profile_fetch(LoginPlatform::Weibo, "响应缺少用户id"))?;

        let mut profile = UserProfile::new(LoginPlatform::Weibo, openid);
        profile.nickname = string_field(&obj, "screen_name").or_else(|| string_field(&obj, "name"));
        profile.gender = match string_field(&obj, "gender").as_deref() {
            Some("m") => Gender::Male,
            Some("f") => Gender::Female,
            _ => Gender::Unknown,
        };
        profile.head_image_url = string_field(&obj, "profile_image_url");
        profile.head_image_url_large =
            string_field(&obj, "avatar_hd").or_else(|| string_field(&obj, "avatar_large"));
        profile.province = string_field(&obj, "province");
        profile.city = string_field(&obj, "city");
        profile.extra = remaining_fields(obj, CONSUMED_FIELDS);

        Ok(profile)
    }
}

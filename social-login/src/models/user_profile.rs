use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::models::LoginPlatform;

/// 用户性别
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Gender {
    Male,
    Female,
    Unknown,
}

/// 第三方平台用户信息
///
/// 由一次用户信息接口响应解析而来,解析后不可变,只交付调用方一次。
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    /// 所属平台
    pub platform: LoginPlatform,

    /// 平台用户标识
    pub openid: String,

    /// 昵称
    pub nickname: Option<String>,

    /// 性别
    pub gender: Gender,

    /// 头像 (小图)
    pub head_image_url: Option<String>,

    /// 头像 (大图)
    pub head_image_url_large: Option<String>,

    /// 省份
    pub province: Option<String>,

    /// 城市
    pub city: Option<String>,

    /// 其余平台字段,原样保留
    pub extra: Map<String, Value>,
}

impl UserProfile {
    pub fn new(platform: LoginPlatform, openid: String) -> Self {
        Self {
            platform,
            openid,
            nickname: None,
            gender: Gender::Unknown,
            head_image_url: None,
            head_image_url_large: None,
            province: None,
            city: None,
            extra: Map::new(),
        }
    }

    /// 读取平台原始字段
    pub fn extra_str(&self, key: &str) -> Option<&str> {
        self.extra.get(key).and_then(Value::as_str)
    }
}

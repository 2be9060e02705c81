use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// 第三方登录平台
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginPlatform {
    /// QQ互联
    Qq,

    /// 新浪微博
    Weibo,
}

impl LoginPlatform {
    /// 平台标识,用于诊断文本和日志
    pub fn tag(&self) -> &'static str {
        match self {
            LoginPlatform::Qq => "QQ",
            LoginPlatform::Weibo => "Weibo",
        }
    }

    /// 伴生客户端的安装包名
    ///
    /// 用于判断是否可以走SSO(客户端授权)而非网页授权
    pub fn companion_package(&self) -> &'static str {
        match self {
            LoginPlatform::Qq => "com.tencent.mobileqq",
            LoginPlatform::Weibo => "com.sina.weibo",
        }
    }
}

impl fmt::Display for LoginPlatform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for LoginPlatform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "qq" => Ok(LoginPlatform::Qq),
            "weibo" => Ok(LoginPlatform::Weibo),
            other => Err(format!("未知的登录平台: {}", other)),
        }
    }
}

use crate::models::{ConfigError, SocialConfig};
use std::collections::HashMap;
use std::env;
use std::path::PathBuf;

pub const KEY_QQ_APP_ID: &str = "SOCIAL_QQ_APP_ID";
pub const KEY_QQ_SCOPE: &str = "SOCIAL_QQ_SCOPE";
pub const KEY_WEIBO_APP_KEY: &str = "SOCIAL_WEIBO_APP_KEY";
pub const KEY_WEIBO_REDIRECT_URL: &str = "SOCIAL_WEIBO_REDIRECT_URL";
pub const KEY_WEIBO_SCOPE: &str = "SOCIAL_WEIBO_SCOPE";
pub const KEY_QQ_USER_INFO_URL: &str = "SOCIAL_QQ_USER_INFO_URL";
pub const KEY_WEIBO_USER_INFO_URL: &str = "SOCIAL_WEIBO_USER_INFO_URL";
pub const KEY_HTTP_TIMEOUT_SECS: &str = "SOCIAL_HTTP_TIMEOUT_SECS";

const ALL_KEYS: &[&str] = &[
    KEY_QQ_APP_ID,
    KEY_QQ_SCOPE,
    KEY_WEIBO_APP_KEY,
    KEY_WEIBO_REDIRECT_URL,
    KEY_WEIBO_SCOPE,
    KEY_QQ_USER_INFO_URL,
    KEY_WEIBO_USER_INFO_URL,
    KEY_HTTP_TIMEOUT_SECS,
];

/// 配置服务
///
/// 职责单一: 从 .env 文件与进程环境变量构建 [`SocialConfig`]。
/// 环境变量优先于 .env 文件。
pub struct ConfigService;

impl ConfigService {
    /// 获取 .env 文件路径
    ///
    /// 查找顺序:
    /// 1. 当前工作目录的 .env
    /// 2. 上层目录(工作区根目录)的 .env
    fn env_file_path() -> Result<Option<PathBuf>, ConfigError> {
        let cwd = env::current_dir()
            .map_err(|e| ConfigError::IoError(format!("无法获取当前目录: {}", e)))?;

        let env_path = cwd.join(".env");
        if env_path.exists() {
            return Ok(Some(env_path));
        }

        if let Some(parent) = cwd.parent() {
            let parent_env = parent.join(".env");
            if parent_env.exists() {
                return Ok(Some(parent_env));
            }
        }

        Ok(None)
    }

    /// 解析 .env 文件内容
    ///
    /// 格式遵循 dotenv 约定: `KEY=VALUE`,支持注释与引号
    pub fn parse_env_content(content: &str) -> Result<HashMap<String, String>, ConfigError> {
        dotenvy::from_read_iter(content.as_bytes())
            .map(|item| item.map_err(ConfigError::from))
            .collect()
    }

    /// 加载配置
    ///
    /// # 错误处理
    /// - .env 文件不存在时只使用环境变量(不报错)
    /// - 文件读取或格式错误时返回 IoError / ParseError
    /// - 超时秒数格式错误时返回 InvalidValue
    pub fn load() -> Result<SocialConfig, ConfigError> {
        let mut vars = HashMap::new();

        match Self::env_file_path()? {
            Some(path) => {
                for item in dotenvy::from_path_iter(&path)? {
                    let (key, value) = item?;
                    vars.insert(key, value);
                }
                tracing::info!(path = %path.display(), "已读取 .env 配置文件");
            }
            None => tracing::info!("配置文件不存在,仅使用环境变量"),
        }

        for key in ALL_KEYS {
            if let Ok(value) = env::var(key) {
                vars.insert((*key).to_string(), value);
            }
        }

        let config = Self::from_vars(&vars)?;

        tracing::info!(
            config = %config.summary_for_logging(),
            "已加载第三方登录配置"
        );

        Ok(config)
    }

    /// 由键值对构建配置,缺省项使用默认值
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<SocialConfig, ConfigError> {
        let get = |key: &str| {
            vars.get(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        let mut config = SocialConfig::default();
        config.qq_app_id = get(KEY_QQ_APP_ID);
        config.weibo_app_key = get(KEY_WEIBO_APP_KEY);
        config.weibo_redirect_url = get(KEY_WEIBO_REDIRECT_URL);

        if let Some(scope) = get(KEY_QQ_SCOPE) {
            config.qq_scope = scope;
        }
        if let Some(scope) = get(KEY_WEIBO_SCOPE) {
            config.weibo_scope = scope;
        }
        if let Some(url) = get(KEY_QQ_USER_INFO_URL) {
            config.qq_user_info_url = url;
        }
        if let Some(url) = get(KEY_WEIBO_USER_INFO_URL) {
            config.weibo_user_info_url = url;
        }

        if let Some(raw) = get(KEY_HTTP_TIMEOUT_SECS) {
            let secs = raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| ConfigError::InvalidValue {
                    key: KEY_HTTP_TIMEOUT_SECS.to_string(),
                    value: raw.clone(),
                })?;
            config.http_timeout_secs = Some(secs);
        }

        Ok(config)
    }
}

use std::sync::Arc;
use tokio::runtime::Handle;

use crate::models::{ConfigError, SocialConfig};
use crate::services::{ProfileFetcher, UiExecutor};

/// 登录适配器共享的运行环境
///
/// 启动时构建一次,克隆后传给各平台适配器:
/// - config: 平台AppID/回调地址等配置
/// - fetcher: 用户信息获取服务 (复用HTTP连接池)
/// - runtime: 执行用户信息请求的后台运行时
/// - ui: 终态回调交付的界面线程执行器
#[derive(Clone)]
pub struct LoginContext {
    pub config: Arc<SocialConfig>,
    pub fetcher: Arc<ProfileFetcher>,
    pub runtime: Handle,
    pub ui: Arc<dyn UiExecutor>,
}

impl LoginContext {
    /// 初始化运行环境
    ///
    /// # 错误
    /// - `ConfigError::HttpClientInit`: HTTP客户端无法创建
    pub fn new(
        config: SocialConfig,
        runtime: Handle,
        ui: Arc<dyn UiExecutor>,
    ) -> Result<Self, ConfigError> {
        let fetcher = Arc::new(ProfileFetcher::new(&config)?);

        tracing::info!(
            config = %config.summary_for_logging(),
            "LoginContext initialized"
        );

        Ok(Self {
            config: Arc::new(config),
            fetcher,
            runtime,
            ui,
        })
    }

    /// 使用当前tokio运行时初始化
    ///
    /// 必须在tokio运行时内调用
    pub fn with_current_runtime(
        config: SocialConfig,
        ui: Arc<dyn UiExecutor>,
    ) -> Result<Self, ConfigError> {
        Self::new(config, Handle::current(), ui)
    }
}

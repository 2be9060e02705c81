//! 服务层模块
//!
//! 包含第三方登录的业务逻辑服务:
//! - `config_service`: 从 .env 与环境变量加载平台配置
//! - `sdk`: 平台SDK与已安装应用查询的抽象
//! - `normalizer`: 把SDK回调归一化为授权结果
//! - `profile_fetcher`: 请求平台用户信息接口
//! - `login_adapter`: 驱动一次登录尝试直到唯一的终态回调
//! - `executor` / `listener`: 界面线程交付与结果监听
//!
//! # 服务架构
//!
//! ```text
//! ┌─────────────────┐
//! │   宿主界面       │  do_login / handle_result / is_install / recycle
//! └────────┬────────┘
//!          │
//!          ▼
//! ┌──────────────────────────────────────┐
//! │            LoginAdapter              │
//! │  ┌──────────────┐  ┌──────────────┐  │
//! │  │  normalize   │  │ProfileFetcher│  │
//! │  └──────┬───────┘  └──────┬───────┘  │
//! │         │                 │          │
//! │  ┌──────▼─────────────────▼───────┐  │
//! │  │   UiExecutor ──> LoginListener │  │
//! │  └────────────────────────────────┘  │
//! └──────────────────────────────────────┘
//!          │                 │
//!          ▼                 ▼
//!     平台授权SDK       平台用户信息接口
//! ```
//!
//! # 使用示例
//!
//! ```no_run
//! use std::sync::Arc;
//! use social_login::models::SocialConfig;
//! use social_login::services::{ui_channel, LoginAdapter, OutcomeListener, StaticPackages};
//! use social_login::state::LoginContext;
//!
//! # async fn example(sdk: Box<dyn social_login::services::AuthSdk>) -> Result<(), Box<dyn std::error::Error>> {
//! let config = SocialConfig::default().with_qq("1105602574");
//! let (executor, mut ui_loop) = ui_channel();
//! let context = LoginContext::with_current_runtime(config, Arc::new(executor))?;
//!
//! let mut adapter = LoginAdapter::qq(context, sdk)?;
//! if !adapter.is_install(&StaticPackages::new(["com.tencent.mobileqq"])) {
//!     return Ok(());
//! }
//!
//! let (listener, mut outcomes) = OutcomeListener::channel();
//! adapter.do_login(Arc::new(listener), true);
//!
//! // 宿主界面获得控制权后转交结果
//! adapter.handle_result(11101, -1, None);
//!
//! ui_loop.run_next().await;
//! let outcome = outcomes.recv().await;
//! println!("{:?}", outcome);
//!
//! adapter.recycle();
//! # Ok(())
//! # }
//! ```

pub mod config_service;
pub mod executor;
pub mod listener;
pub mod login_adapter;
pub mod normalizer;
pub mod profile_fetcher;
pub mod sdk;

// 重导出常用类型,简化外部引用
pub use config_service::ConfigService;
pub use executor::{ui_channel, ChannelExecutor, InlineExecutor, UiExecutor, UiLoop, UiTask};
pub use listener::{LoginListener, OutcomeListener};
pub use login_adapter::{LoginAdapter, QqLoginAdapter, WeiboLoginAdapter, OVERLAPPING_LOGIN};
pub use normalizer::{normalize, AuthOutcome};
pub use profile_fetcher::ProfileFetcher;
pub use sdk::{AuthPayload, AuthSdk, PackageQuery, StaticPackages, VendorCallback, VendorError};

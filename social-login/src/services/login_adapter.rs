//! 登录适配器
//!
//! 一个适配器实例对应一个平台SDK句柄,同一时间只服务一次登录尝试:
//!
//! ```text
//! do_login ──> SDK授权界面 ──> handle_result ──> normalize
//!                                                   │
//!                         ┌─────────────────────────┼──────────────┐
//!                         ▼                         ▼              ▼
//!                 fetch_user_info?            Cancelled        Failed
//!                  │            │
//!                  ▼            ▼
//!          后台获取用户信息   Success(token)
//!                  │
//!                  ▼
//!      界面线程交付 Success / Failed
//! ```
//!
//! 所有终态回调都经过 [`PendingLogin::deliver`],监听器在交付时被取走,
//! 因此每次尝试最多回调一次。

use serde_json::Value;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::models::{
    AccessToken, ConfigError, LoginAttempt, LoginError, LoginOutcome, LoginPlatform, LoginResult,
    LoginState,
};
use crate::platforms::{PlatformProvider, QqProvider, WeiboProvider};
use crate::services::executor::UiExecutor;
use crate::services::listener::LoginListener;
use crate::services::normalizer::{normalize, AuthOutcome};
use crate::services::sdk::{AuthSdk, PackageQuery, VendorCallback};
use crate::state::LoginContext;
use crate::{log_error, log_event};

/// QQ登录适配器
pub type QqLoginAdapter = LoginAdapter<QqProvider>;

/// 微博登录适配器
pub type WeiboLoginAdapter = LoginAdapter<WeiboProvider>;

/// 重叠登录被拒绝时交给监听器的诊断文本
pub const OVERLAPPING_LOGIN: &str = "已有登录尝试进行中";

/// 进行中的登录尝试
///
/// 由适配器与后台获取任务共享
struct PendingLogin {
    inner: Mutex<PendingInner>,
}

struct PendingInner {
    attempt: LoginAttempt,
    listener: Option<Arc<dyn LoginListener>>,
}

impl PendingLogin {
    fn new(attempt: LoginAttempt, listener: Arc<dyn LoginListener>) -> Arc<Self> {
        Arc::new(Self {
            inner: Mutex::new(PendingInner {
                attempt,
                listener: Some(listener),
            }),
        })
    }

    fn lock(&self) -> MutexGuard<'_, PendingInner> {
        // 监听器回调不在锁内执行,中毒时状态仍然一致
        self.inner.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn snapshot(&self) -> LoginAttempt {
        self.lock().attempt.clone()
    }

    /// 交付终态
    ///
    /// 监听器已被取走 (已交付或已回收) 时丢弃结果
    fn deliver(&self, ui: &Arc<dyn UiExecutor>, outcome: LoginOutcome) {
        let (listener, attempt) = {
            let mut inner = self.lock();
            let Some(listener) = inner.listener.take() else {
                tracing::debug!(
                    attempt_id = %inner.attempt.attempt_id,
                    outcome = outcome.label(),
                    "登录尝试已结束,结果被丢弃"
                );
                return;
            };
            match &outcome {
                LoginOutcome::Success(_) => inner.attempt.mark_succeeded(),
                LoginOutcome::Cancelled => inner.attempt.mark_cancelled(),
                LoginOutcome::Failed(_) => inner.attempt.mark_failed(),
            }
            (listener, inner.attempt.clone())
        };

        if let LoginOutcome::Failed(e) = &outcome {
            let error = e.to_string();
            log_error!(
                "LoginFailed",
                attempt_id = attempt.attempt_id.as_str(),
                platform = attempt.platform.tag(),
                error_type = e.kind(),
                error = error.as_str(),
                duration_ms = attempt.duration_ms(),
            );
        } else {
            log_event!(
                "LoginFinished",
                attempt_id = attempt.attempt_id.as_str(),
                platform = attempt.platform.tag(),
                outcome = outcome.label(),
                duration_ms = attempt.duration_ms(),
            );
        }

        ui.post(Box::new(move || match outcome {
            LoginOutcome::Success(result) => listener.login_success(result),
            LoginOutcome::Cancelled => listener.login_cancel(),
            LoginOutcome::Failed(error) => listener.login_failure(error),
        }));
    }

    /// 回收: 丢弃监听器,进行中的后台结果将不再交付
    fn detach(&self) {
        self.lock().listener = None;
    }
}

/// 第三方登录适配器
///
/// 持有平台SDK句柄,把SDK回调归一化后交给 [`LoginListener`]。
/// 不支持在同一实例上重叠发起登录。
pub struct LoginAdapter<P: PlatformProvider> {
    provider: Arc<P>,
    context: LoginContext,
    sdk: Option<Box<dyn AuthSdk>>,
    pending: Option<Arc<PendingLogin>>,
    recycled: bool,
}

impl LoginAdapter<QqProvider> {
    /// 创建QQ登录适配器
    ///
    /// # 错误
    /// - `ConfigError::MissingKey`: 未配置 QQ AppID
    pub fn qq(context: LoginContext, sdk: Box<dyn AuthSdk>) -> Result<Self, ConfigError> {
        Self::new(QqProvider, context, sdk)
    }
}

impl LoginAdapter<WeiboProvider> {
    /// 创建微博登录适配器
    ///
    /// # 错误
    /// - `ConfigError::MissingKey`: 未配置微博 AppKey 或回调地址
    pub fn weibo(context: LoginContext, sdk: Box<dyn AuthSdk>) -> Result<Self, ConfigError> {
        Self::new(WeiboProvider, context, sdk)
    }
}

impl<P: PlatformProvider> LoginAdapter<P> {
    pub fn new(provider: P, context: LoginContext, sdk: Box<dyn AuthSdk>) -> Result<Self, ConfigError> {
        provider.validate_config(&context.config)?;

        tracing::info!(
            platform = %provider.platform(),
            config = %context.config.summary_for_logging(),
            "Login adapter initialized"
        );

        Ok(Self {
            provider: Arc::new(provider),
            context,
            sdk: Some(sdk),
            pending: None,
            recycled: false,
        })
    }

    /// 发起登录
    ///
    /// 启动平台授权界面后立即返回,结果稍后通过监听器交付。
    /// 已有登录尝试在进行中时,本次的监听器收到 `SdkLaunchFailed`,进行中的尝试不受影响;
    /// 适配器已回收时忽略本次调用。
    pub fn do_login(&mut self, listener: Arc<dyn LoginListener>, fetch_user_info: bool) {
        let platform = self.provider.platform();

        if self.recycled {
            tracing::warn!(platform = %platform, "适配器已回收,忽略登录请求");
            return;
        }

        if let Some(pending) = &self.pending {
            let attempt = pending.snapshot();
            if attempt.is_open() {
                tracing::warn!(
                    platform = %platform,
                    attempt_id = %attempt.attempt_id,
                    state = ?attempt.state,
                    "已有登录尝试进行中,拒绝重复的登录请求"
                );
                let error = LoginError::SdkLaunchFailed(OVERLAPPING_LOGIN.to_string());
                self.context
                    .ui
                    .post(Box::new(move || listener.login_failure(error)));
                return;
            }
        }

        let Some(sdk) = self.sdk.as_mut() else {
            tracing::warn!(platform = %platform, "SDK句柄不可用,忽略登录请求");
            return;
        };

        let mut attempt = LoginAttempt::new(platform, fetch_user_info);
        attempt.mark_awaiting();
        log_event!(
            "LoginStarted",
            attempt_id = attempt.attempt_id.as_str(),
            platform = platform.tag(),
            fetch_user_info = fetch_user_info,
        );

        let pending = PendingLogin::new(attempt, listener);
        self.pending = Some(Arc::clone(&pending));

        if let Err(e) = sdk.authorize(self.provider.scope(&self.context.config)) {
            tracing::error!(
                platform = %platform,
                code = ?e.code,
                error = %e.diagnostic(),
                "授权界面启动失败"
            );
            pending.deliver(
                &self.context.ui,
                LoginOutcome::Failed(LoginError::sdk_launch(platform, e.code, e.diagnostic())),
            );
        }
    }

    /// 处理宿主界面返回的结果
    ///
    /// 宿主界面重新获得控制权时必须调用,这是挂起的授权流程恢复的唯一途径。
    pub fn handle_result(&mut self, request_code: i32, result_code: i32, data: Option<&Value>) {
        if self.recycled {
            tracing::warn!(
                platform = %self.provider.platform(),
                request_code,
                "适配器已回收,忽略界面结果"
            );
            return;
        }

        let Some(sdk) = self.sdk.as_mut() else {
            return;
        };

        match sdk.dispatch_result(request_code, result_code, data) {
            Some(callback) => self.on_vendor_callback(callback),
            None => tracing::debug!(
                platform = %self.provider.platform(),
                request_code,
                result_code,
                "界面结果不属于本SDK"
            ),
        }
    }

    /// 处理SDK回调
    ///
    /// 直接回调的SDK (如网页授权) 可绕过 `handle_result` 调用此方法。
    /// 没有等待中的登录尝试时回调被丢弃。
    pub fn on_vendor_callback(&mut self, callback: VendorCallback) {
        let platform = self.provider.platform();

        if self.recycled {
            tracing::warn!(platform = %platform, "适配器已回收,忽略SDK回调");
            return;
        }

        let pending = match &self.pending {
            Some(pending)
                if pending.snapshot().state == LoginState::AwaitingVendorCallback =>
            {
                Arc::clone(pending)
            }
            _ => {
                tracing::warn!(platform = %platform, "没有等待中的登录尝试,SDK回调被丢弃");
                return;
            }
        };

        match normalize(self.provider.as_ref(), callback) {
            AuthOutcome::Authorized(token) => {
                let fetch_user_info = pending.snapshot().fetch_user_info;
                if fetch_user_info {
                    self.start_profile_fetch(pending, token);
                } else {
                    pending.deliver(
                        &self.context.ui,
                        LoginOutcome::Success(LoginResult::with_token(token)),
                    );
                }
            }
            AuthOutcome::Cancelled => pending.deliver(&self.context.ui, LoginOutcome::Cancelled),
            AuthOutcome::Failed(e) => pending.deliver(&self.context.ui, LoginOutcome::Failed(e)),
        }
    }

    /// 在后台任务中获取用户信息,结果回到界面线程交付
    ///
    /// 获取失败时整体视为登录失败,不交付仅含凭证的结果
    fn start_profile_fetch(&self, pending: Arc<PendingLogin>, token: AccessToken) {
        let listener = {
            let mut inner = pending.lock();
            inner.attempt.mark_fetching_profile();
            inner.listener.clone()
        };
        if let Some(listener) = listener {
            listener.before_fetch_user_info(&token);
        }

        let provider = Arc::clone(&self.provider);
        let config = Arc::clone(&self.context.config);
        let fetcher = Arc::clone(&self.context.fetcher);
        let ui = Arc::clone(&self.context.ui);

        self.context.runtime.spawn(async move {
            let outcome = match fetcher.fetch(provider.as_ref(), &config, &token).await {
                Ok(user) => LoginOutcome::Success(LoginResult::with_user(token, user)),
                Err(e) => LoginOutcome::Failed(e),
            };
            pending.deliver(&ui, outcome);
        });
    }

    /// 判断平台客户端是否已安装
    ///
    /// 优先询问SDK;SDK无法判断时查找已安装应用列表。
    /// 查询不可用或列表为空时返回 `false`。
    pub fn is_install(&self, query: &dyn PackageQuery) -> bool {
        if let Some(installed) = self.sdk.as_ref().and_then(|sdk| sdk.is_app_installed()) {
            return installed;
        }

        let package = self.provider.platform().companion_package();
        query
            .installed_packages()
            .map(|packages| {
                packages
                    .iter()
                    .any(|name| name.trim().eq_ignore_ascii_case(package))
            })
            .unwrap_or(false)
    }

    /// 释放SDK句柄并清除监听器
    ///
    /// 可重复调用。回收后所有调用都安全地不做任何事;
    /// 进行中的用户信息请求不会被中断,但其结果不再交付。
    pub fn recycle(&mut self) {
        if let Some(mut sdk) = self.sdk.take() {
            sdk.release();
        }
        if let Some(pending) = self.pending.take() {
            pending.detach();
        }
        if !self.recycled {
            tracing::info!(platform = %self.provider.platform(), "Login adapter recycled");
        }
        self.recycled = true;
    }

    pub fn is_recycled(&self) -> bool {
        self.recycled
    }

    /// 当前 (或最近一次) 登录尝试的快照
    pub fn current_attempt(&self) -> Option<LoginAttempt> {
        self.pending.as_ref().map(|pending| pending.snapshot())
    }

    pub fn platform(&self) -> LoginPlatform {
        self.provider.platform()
    }
}

impl<P: PlatformProvider> Drop for LoginAdapter<P> {
    fn drop(&mut self) {
        self.recycle();
    }
}

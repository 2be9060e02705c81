//! 测试公共模块
//!
//! 提供Mock SDK、记录型监听器与本地HTTP服务,测试不依赖真实平台。

#![allow(dead_code)]

use serde_json::Value;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;

use social_login::models::{AccessToken, LoginError, LoginOutcome, LoginResult, SocialConfig};
use social_login::services::{
    ui_channel, AuthSdk, LoginListener, UiExecutor, UiLoop, VendorCallback, VendorError,
};
use social_login::state::LoginContext;

/// Mock SDK使用的请求码
pub const REQUEST_CODE: i32 = 11101;

/// Mock SDK的共享状态
#[derive(Default)]
pub struct SdkState {
    /// 待返回的回调 (每次 dispatch_result 取一个)
    pub callbacks: VecDeque<VendorCallback>,
    /// authorize 收到的授权范围
    pub authorize_scopes: Vec<String>,
    /// 启动授权界面时返回的错误
    pub launch_error: Option<VendorError>,
    /// SDK自身的安装判断
    pub installed: Option<bool>,
    pub released: bool,
}

/// Mock平台SDK
///
/// 状态以 `Arc` 共享,交给适配器后测试仍可检查
#[derive(Clone, Default)]
pub struct MockSdk {
    state: Arc<Mutex<SdkState>>,
}

impl MockSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// 排队一个回调
    pub fn push(&self, callback: VendorCallback) -> &Self {
        self.state.lock().unwrap().callbacks.push_back(callback);
        self
    }

    pub fn fail_launch(&self, error: VendorError) {
        self.state.lock().unwrap().launch_error = Some(error);
    }

    pub fn set_installed(&self, installed: Option<bool>) {
        self.state.lock().unwrap().installed = installed;
    }

    pub fn authorize_scopes(&self) -> Vec<String> {
        self.state.lock().unwrap().authorize_scopes.clone()
    }

    pub fn is_released(&self) -> bool {
        self.state.lock().unwrap().released
    }

    pub fn boxed(&self) -> Box<dyn AuthSdk> {
        Box::new(self.clone())
    }
}

impl AuthSdk for MockSdk {
    fn authorize(&mut self, scope: &str) -> Result<(), VendorError> {
        let mut state = self.state.lock().unwrap();
        state.authorize_scopes.push(scope.to_string());
        match state.launch_error.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    fn dispatch_result(
        &mut self,
        request_code: i32,
        _result_code: i32,
        _data: Option<&Value>,
    ) -> Option<VendorCallback> {
        if request_code != REQUEST_CODE {
            return None;
        }
        self.state.lock().unwrap().callbacks.pop_front()
    }

    fn is_app_installed(&self) -> Option<bool> {
        self.state.lock().unwrap().installed
    }

    fn release(&mut self) {
        self.state.lock().unwrap().released = true;
    }
}

/// 记录所有回调的监听器
#[derive(Default)]
pub struct RecordingListener {
    outcomes: Mutex<Vec<LoginOutcome>>,
    before_fetch: Mutex<Vec<AccessToken>>,
}

impl RecordingListener {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn outcomes(&self) -> Vec<LoginOutcome> {
        self.outcomes.lock().unwrap().clone()
    }

    pub fn callback_count(&self) -> usize {
        self.outcomes.lock().unwrap().len()
    }

    pub fn before_fetch_count(&self) -> usize {
        self.before_fetch.lock().unwrap().len()
    }

    /// 唯一的终态
    pub fn single_outcome(&self) -> LoginOutcome {
        let outcomes = self.outcomes();
        assert_eq!(outcomes.len(), 1, "应恰好回调一次: {:?}", outcomes);
        outcomes[0].clone()
    }
}

impl LoginListener for RecordingListener {
    fn login_success(&self, result: LoginResult) {
        self.outcomes.lock().unwrap().push(LoginOutcome::Success(result));
    }

    fn login_cancel(&self) {
        self.outcomes.lock().unwrap().push(LoginOutcome::Cancelled);
    }

    fn login_failure(&self, error: LoginError) {
        self.outcomes.lock().unwrap().push(LoginOutcome::Failed(error));
    }

    fn before_fetch_user_info(&self, token: &AccessToken) {
        self.before_fetch.lock().unwrap().push(token.clone());
    }
}

/// 本地HTTP服务
///
/// 对每个请求返回固定的状态码与响应体,记录收到的请求行
pub struct MockHttpServer {
    pub base_url: String,
    hits: Arc<AtomicUsize>,
    request_lines: Arc<Mutex<Vec<String>>>,
}

impl MockHttpServer {
    pub async fn start(status: u16, body: &str) -> Self {
        Self::start_with_delay(status, body, Duration::ZERO).await
    }

    /// 响应前等待 `delay`
    pub async fn start_with_delay(status: u16, body: &str, delay: Duration) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let hits = Arc::new(AtomicUsize::new(0));
        let request_lines = Arc::new(Mutex::new(Vec::new()));
        let body = body.to_string();

        let server_hits = Arc::clone(&hits);
        let server_lines = Arc::clone(&request_lines);
        tokio::spawn(async move {
            loop {
                let Ok((mut socket, _)) = listener.accept().await else {
                    return;
                };
                let hits = Arc::clone(&server_hits);
                let lines = Arc::clone(&server_lines);
                let body = body.clone();
                tokio::spawn(async move {
                    let mut request = Vec::new();
                    let mut buf = [0u8; 1024];
                    loop {
                        match socket.read(&mut buf).await {
                            Ok(0) | Err(_) => break,
                            Ok(n) => {
                                request.extend_from_slice(&buf[..n]);
                                if request.windows(4).any(|w| w == b"\r\n\r\n") {
                                    break;
                                }
                            }
                        }
                    }
                    let text = String::from_utf8_lossy(&request);
                    if let Some(line) = text.lines().next() {
                        lines.lock().unwrap().push(line.to_string());
                    }
                    hits.fetch_add(1, Ordering::SeqCst);

                    tokio::time::sleep(delay).await;

                    let response = format!(
                        "HTTP/1.1 {} Mock\r\nContent-Type: application/json\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{}",
                        status,
                        body.len(),
                        body
                    );
                    let _ = socket.write_all(response.as_bytes()).await;
                    let _ = socket.shutdown().await;
                });
            }
        });

        Self {
            base_url: format!("http://{}", addr),
            hits,
            request_lines,
        }
    }

    /// 已收到的请求数
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn request_lines(&self) -> Vec<String> {
        self.request_lines.lock().unwrap().clone()
    }
}

/// 两个平台都已配置、用户信息接口指向 `base_url` 的配置
pub fn test_config(base_url: &str) -> SocialConfig {
    SocialConfig::default()
        .with_qq("1105602574")
        .with_weibo("3921700954", "https://api.weibo.com/oauth2/default.html")
        .with_user_info_urls(
            format!("{}/user/get_user_info", base_url),
            format!("{}/2/users/show.json", base_url),
        )
        .with_http_timeout_secs(5)
}

/// 使用通道执行器的运行环境
///
/// 必须在tokio运行时内调用
pub fn channel_context(config: SocialConfig) -> (LoginContext, UiLoop) {
    let (executor, ui_loop) = ui_channel();
    let ui: Arc<dyn UiExecutor> = Arc::new(executor);
    let context = LoginContext::with_current_runtime(config, ui).unwrap();
    (context, ui_loop)
}

/// 等待下一个界面任务,超时返回 `false`
pub async fn pump_next(ui_loop: &mut UiLoop, timeout: Duration) -> bool {
    matches!(
        tokio::time::timeout(timeout, ui_loop.run_next()).await,
        Ok(true)
    )
}

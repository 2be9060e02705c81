use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::LoginPlatform;

/// 一次登录尝试
///
/// 追踪从 `do_login` 到终态回调的完整流程,
/// 用于状态判断和日志关联 (attempt_id)。
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginAttempt {
    /// 尝试唯一ID
    pub attempt_id: String,

    /// 所属平台
    pub platform: LoginPlatform,

    /// 是否在授权成功后获取用户信息
    pub fetch_user_info: bool,

    /// 当前状态
    pub state: LoginState,

    /// 创建时间
    pub created_at: DateTime<Utc>,

    /// 收到授权结果的时间 (可选)
    pub authorized_at: Option<DateTime<Utc>>,

    /// 进入终态的时间 (可选)
    pub finished_at: Option<DateTime<Utc>>,
}

/// 登录尝试状态
///
/// 状态转换流程:
/// Idle -> AwaitingVendorCallback -> Succeeded
///                 |        |
///                 |        +---> FetchingProfile -> Succeeded / Failed
///                 |
///                 +---> Cancelled / Failed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LoginState {
    /// 尚未发起授权
    Idle,

    /// 已启动授权界面,等待SDK回调
    AwaitingVendorCallback,

    /// 授权成功,正在获取用户信息
    FetchingProfile,

    /// 登录成功
    Succeeded,

    /// 用户取消
    Cancelled,

    /// 登录失败
    Failed,
}

impl LoginAttempt {
    pub fn new(platform: LoginPlatform, fetch_user_info: bool) -> Self {
        Self {
            attempt_id: Uuid::new_v4().to_string(),
            platform,
            fetch_user_info,
            state: LoginState::Idle,
            created_at: Utc::now(),
            authorized_at: None,
            finished_at: None,
        }
    }

    /// 是否为终态
    ///
    /// 一旦进入终态,不应再有任何回调交付。
    pub fn is_final_status(&self) -> bool {
        matches!(
            self.state,
            LoginState::Succeeded | LoginState::Cancelled | LoginState::Failed
        )
    }

    /// 是否仍在进行中 (等待回调或获取用户信息)
    pub fn is_open(&self) -> bool {
        matches!(
            self.state,
            LoginState::AwaitingVendorCallback | LoginState::FetchingProfile
        )
    }

    pub fn mark_awaiting(&mut self) {
        self.state = LoginState::AwaitingVendorCallback;
    }

    /// 授权成功,开始获取用户信息
    pub fn mark_fetching_profile(&mut self) {
        self.state = LoginState::FetchingProfile;
        self.authorized_at = Some(Utc::now());
    }

    pub fn mark_succeeded(&mut self) {
        if self.authorized_at.is_none() {
            self.authorized_at = Some(Utc::now());
        }
        self.finish(LoginState::Succeeded);
    }

    pub fn mark_cancelled(&mut self) {
        self.finish(LoginState::Cancelled);
    }

    pub fn mark_failed(&mut self) {
        self.finish(LoginState::Failed);
    }

    fn finish(&mut self, state: LoginState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
    }

    /// 尝试持续时长(毫秒),用于日志统计
    pub fn duration_ms(&self) -> i64 {
        let end = self.finished_at.unwrap_or_else(Utc::now);
        (end - self.created_at).num_milliseconds()
    }
}

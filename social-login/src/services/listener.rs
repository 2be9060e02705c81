use tokio::sync::mpsc;

use crate::models::{AccessToken, LoginError, LoginOutcome, LoginResult};

/// 登录结果监听器
///
/// 由宿主实现。每次登录尝试,`login_success` / `login_cancel` /
/// `login_failure` 三者中恰好有一个被调用一次,且都在界面线程上调用。
pub trait LoginListener: Send + Sync {
    fn login_success(&self, result: LoginResult);

    fn login_cancel(&self);

    fn login_failure(&self, error: LoginError);

    /// 授权成功、开始获取用户信息之前调用
    ///
    /// 宿主可在此展示加载状态
    fn before_fetch_user_info(&self, _token: &AccessToken) {}
}

/// 把回调转换为 [`LoginOutcome`] 发送到通道
///
/// 适用于以 async 方式等待登录结果的宿主
pub struct OutcomeListener {
    tx: mpsc::UnboundedSender<LoginOutcome>,
}

impl OutcomeListener {
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<LoginOutcome>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    fn send(&self, outcome: LoginOutcome) {
        if self.tx.send(outcome).is_err() {
            tracing::debug!("登录结果接收端已关闭");
        }
    }
}

impl LoginListener for OutcomeListener {
    fn login_success(&self, result: LoginResult) {
        self.send(LoginOutcome::Success(result));
    }

    fn login_cancel(&self) {
        self.send(LoginOutcome::Cancelled);
    }

    fn login_failure(&self, error: LoginError) {
        self.send(LoginOutcome::Failed(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::LoginPlatform;

    #[test]
    fn test_outcome_listener_forwards_callbacks() {
        let (listener, mut rx) = OutcomeListener::channel();
        let token = AccessToken::new(LoginPlatform::Qq, "t".into(), "o".into());

        listener.before_fetch_user_info(&token);
        listener.login_success(LoginResult::with_token(token));
        listener.login_cancel();
        listener.login_failure(LoginError::TokenParseFailed("bad".into()));

        assert!(rx.try_recv().unwrap().is_success());
        assert_eq!(rx.try_recv().unwrap(), LoginOutcome::Cancelled);
        assert_eq!(
            rx.try_recv().unwrap(),
            LoginOutcome::Failed(LoginError::TokenParseFailed("bad".into()))
        );
        assert!(rx.try_recv().is_err());
    }
}

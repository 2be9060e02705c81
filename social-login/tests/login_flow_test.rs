//! 登录流程集成测试
//!
//! 覆盖从 do_login 到监听器终态回调的完整流程:
//! - 不获取用户信息时直接交付凭证,不发网络请求
//! - 获取用户信息时交付凭证与用户信息
//! - 取消、平台错误、授权数据非法
//! - 重复回调只交付一次,重叠登录被拒绝
//! - expires_in 超出范围时以授权数据非法结束

mod common;

use common::{
    channel_context, pump_next, test_config, MockHttpServer, MockSdk, RecordingListener,
    REQUEST_CODE,
};
use serde_json::json;
use std::collections::HashMap;
use std::time::Duration;

use social_login::models::{Gender, LoginError, LoginOutcome, LoginPlatform, LoginState};
use social_login::services::{
    AuthPayload, LoginAdapter, VendorCallback, VendorError, OVERLAPPING_LOGIN,
};

const WAIT: Duration = Duration::from_secs(5);

fn qq_complete() -> VendorCallback {
    VendorCallback::Complete(AuthPayload::Json(json!({
        "ret": 0,
        "openid": "B2B3C4D5E6F7",
        "access_token": "A1B2C3D4E5F6",
        "expires_in": 7776000,
    })))
}

fn weibo_complete() -> VendorCallback {
    let mut bundle = HashMap::new();
    bundle.insert("uid".to_string(), "123".to_string());
    bundle.insert("access_token".to_string(), "2.00abc".to_string());
    bundle.insert("expires_in".to_string(), "157679999".to_string());
    VendorCallback::Complete(AuthPayload::Bundle(bundle))
}

#[tokio::test]
async fn test_qq_login_without_user_info_skips_network() {
    let server = MockHttpServer::start(200, r#"{"ret":0,"nickname":"不应请求"}"#).await;
    let (context, mut ui_loop) = channel_context(test_config(&server.base_url));
    let sdk = MockSdk::new();
    sdk.push(qq_complete());

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), false);
    assert_eq!(sdk.authorize_scopes(), vec!["get_simple_userinfo".to_string()]);

    adapter.handle_result(REQUEST_CODE, -1, None);
    assert_eq!(ui_loop.run_pending(), 1);

    match listener.single_outcome() {
        LoginOutcome::Success(result) => {
            assert_eq!(result.platform, LoginPlatform::Qq);
            assert_eq!(result.token.openid, "B2B3C4D5E6F7");
            assert_eq!(result.token.access_token, "A1B2C3D4E5F6");
            assert_eq!(result.token.expires_in, Some(7_776_000));
            assert!(result.user.is_none());
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(listener.before_fetch_count(), 0);

    tokio::time::sleep(Duration::from_millis(50)).await;
    assert_eq!(server.hits(), 0);
    assert_eq!(
        adapter.current_attempt().map(|a| a.state),
        Some(LoginState::Succeeded)
    );
}

#[tokio::test]
async fn test_weibo_login_with_user_info() {
    let server = MockHttpServer::start(200, r#"{"id":"123","name":"Alice"}"#).await;
    let (context, mut ui_loop) = channel_context(test_config(&server.base_url));
    let sdk = MockSdk::new();
    sdk.push(weibo_complete());

    let mut adapter = LoginAdapter::weibo(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), true);
    adapter.handle_result(REQUEST_CODE, -1, None);

    // 授权完成后立即通知,用户信息在后台获取
    assert_eq!(listener.before_fetch_count(), 1);
    assert_eq!(listener.callback_count(), 0);
    assert_eq!(
        adapter.current_attempt().map(|a| a.state),
        Some(LoginState::FetchingProfile)
    );

    assert!(pump_next(&mut ui_loop, WAIT).await);

    match listener.single_outcome() {
        LoginOutcome::Success(result) => {
            assert_eq!(result.token.openid, "123");
            let user = result.user.expect("应包含用户信息");
            assert_eq!(user.openid, "123");
            assert_eq!(user.nickname.as_deref(), Some("Alice"));
            assert_eq!(user.gender, Gender::Unknown);
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    assert_eq!(server.hits(), 1);
    let lines = server.request_lines();
    assert!(lines[0].starts_with("GET /2/users/show.json?"));
    assert!(lines[0].contains("access_token=2.00abc"));
    assert!(lines[0].contains("uid=123"));
}

#[tokio::test]
async fn test_qq_login_with_user_info() {
    let body = json!({
        "ret": 0,
        "msg": "",
        "nickname": "小明",
        "gender": "男",
        "province": "广东",
        "city": "深圳",
        "figureurl_qq_1": "http://q.qlogo.cn/40",
        "figureurl_qq_2": "http://q.qlogo.cn/100",
        "is_yellow_vip": "0",
    })
    .to_string();
    let server = MockHttpServer::start(200, &body).await;
    let (context, mut ui_loop) = channel_context(test_config(&server.base_url));
    let sdk = MockSdk::new();
    sdk.push(qq_complete());

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), true);
    adapter.handle_result(REQUEST_CODE, -1, None);
    assert!(pump_next(&mut ui_loop, WAIT).await);

    match listener.single_outcome() {
        LoginOutcome::Success(result) => {
            let user = result.user.expect("应包含用户信息");
            assert_eq!(user.openid, "B2B3C4D5E6F7");
            assert_eq!(user.nickname.as_deref(), Some("小明"));
            assert_eq!(user.gender, Gender::Male);
            assert_eq!(user.head_image_url_large.as_deref(), Some("http://q.qlogo.cn/100"));
            assert_eq!(user.extra_str("is_yellow_vip"), Some("0"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let lines = server.request_lines();
    assert!(lines[0].contains("oauth_consumer_key=1105602574"));
    assert!(lines[0].contains("openid=B2B3C4D5E6F7"));
}

#[tokio::test]
async fn test_cancel_delivers_login_cancel() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(VendorCallback::Cancel);

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), true);
    adapter.handle_result(REQUEST_CODE, 0, None);
    ui_loop.run_pending();

    assert_eq!(listener.single_outcome(), LoginOutcome::Cancelled);
    assert_eq!(listener.before_fetch_count(), 0);
}

#[tokio::test]
async fn test_vendor_error_delivers_auth_failed() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(VendorCallback::Error(
        VendorError::new(Some(100044), "error").with_detail("invalid scope"),
    ));

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), false);
    adapter.handle_result(REQUEST_CODE, -1, None);
    ui_loop.run_pending();

    assert_eq!(
        listener.single_outcome(),
        LoginOutcome::Failed(LoginError::AuthFailed {
            platform: LoginPlatform::Qq,
            code: Some(100044),
            message: "QQError: 100044 invalid scope".to_string(),
        })
    );
}

#[tokio::test]
async fn test_malformed_token_payload_fails() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(VendorCallback::Complete(AuthPayload::Json(json!({ "foo": 1 }))));

    let mut adapter = LoginAdapter::weibo(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), true);
    adapter.handle_result(REQUEST_CODE, -1, None);
    ui_loop.run_pending();

    match listener.single_outcome() {
        LoginOutcome::Failed(LoginError::TokenParseFailed(_)) => {}
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(listener.before_fetch_count(), 0);
}

#[tokio::test]
async fn test_out_of_range_expiry_fails_without_crash() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(VendorCallback::Complete(AuthPayload::Json(json!({
        "access_token": "tok",
        "openid": "oid",
        "expires_in": "99999999999999999",
    }))))
    .push(qq_complete());

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), true);
    adapter.handle_result(REQUEST_CODE, -1, None);
    // 尝试已结束,后续回调被丢弃
    adapter.handle_result(REQUEST_CODE, -1, None);
    ui_loop.run_pending();

    assert_eq!(
        listener.single_outcome(),
        LoginOutcome::Failed(LoginError::TokenParseFailed("expires_in 超出范围".to_string()))
    );
    assert_eq!(listener.before_fetch_count(), 0);
}

#[tokio::test]
async fn test_sdk_launch_failure_fails_attempt() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.fail_launch(VendorError::new(None, "activity not found"));

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), false);
    ui_loop.run_pending();

    assert_eq!(
        listener.single_outcome(),
        LoginOutcome::Failed(LoginError::SdkLaunchFailed(
            "QQError: activity not found".to_string()
        ))
    );
}

#[tokio::test]
async fn test_sdk_launch_failure_keeps_vendor_code() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.fail_launch(VendorError::new(Some(-3), "error").with_detail("sso package or sign error"));

    let mut adapter = LoginAdapter::weibo(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), true);
    ui_loop.run_pending();

    assert_eq!(
        listener.single_outcome(),
        LoginOutcome::Failed(LoginError::SdkLaunchFailed(
            "WeiboError: -3 sso package or sign error".to_string()
        ))
    );
    assert_eq!(
        adapter.current_attempt().map(|a| a.state),
        Some(LoginState::Failed)
    );
}

#[tokio::test]
async fn test_foreign_request_code_is_ignored() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(qq_complete());

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), false);

    adapter.handle_result(REQUEST_CODE + 1, -1, None);
    assert_eq!(ui_loop.run_pending(), 0);
    assert_eq!(listener.callback_count(), 0);

    adapter.handle_result(REQUEST_CODE, -1, None);
    ui_loop.run_pending();
    assert!(listener.single_outcome().is_success());
}

#[tokio::test]
async fn test_duplicate_callbacks_deliver_once() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(qq_complete())
        .push(VendorCallback::Cancel)
        .push(VendorCallback::Error(VendorError::new(Some(-1), "late")));

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), false);
    for _ in 0..3 {
        adapter.handle_result(REQUEST_CODE, -1, None);
    }
    adapter.on_vendor_callback(VendorCallback::Cancel);
    ui_loop.run_pending();

    assert!(listener.single_outcome().is_success());
}

#[tokio::test]
async fn test_duplicate_callbacks_during_fetch_deliver_once() {
    let server = MockHttpServer::start(200, r#"{"id":"123","screen_name":"Alice"}"#).await;
    let (context, mut ui_loop) = channel_context(test_config(&server.base_url));
    let sdk = MockSdk::new();
    sdk.push(weibo_complete()).push(weibo_complete());

    let mut adapter = LoginAdapter::weibo(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), true);
    adapter.handle_result(REQUEST_CODE, -1, None);
    adapter.handle_result(REQUEST_CODE, -1, None);

    assert!(pump_next(&mut ui_loop, WAIT).await);
    tokio::time::sleep(Duration::from_millis(100)).await;
    ui_loop.run_pending();

    assert!(listener.single_outcome().is_success());
    assert_eq!(listener.before_fetch_count(), 1);
    assert_eq!(server.hits(), 1);
}

#[tokio::test]
async fn test_overlapping_login_is_rejected() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(qq_complete());

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let first = RecordingListener::new();
    let second = RecordingListener::new();
    adapter.do_login(first.clone(), false);
    let attempt_id = adapter.current_attempt().map(|a| a.attempt_id);

    adapter.do_login(second.clone(), false);
    assert_eq!(sdk.authorize_scopes().len(), 1);
    assert_eq!(adapter.current_attempt().map(|a| a.attempt_id), attempt_id);

    // 被拒绝的监听器同样在界面线程上收到回调
    assert_eq!(second.callback_count(), 0);
    assert_eq!(ui_loop.run_pending(), 1);
    assert_eq!(
        second.single_outcome(),
        LoginOutcome::Failed(LoginError::SdkLaunchFailed(OVERLAPPING_LOGIN.to_string()))
    );
    assert_eq!(first.callback_count(), 0);

    adapter.handle_result(REQUEST_CODE, -1, None);
    ui_loop.run_pending();

    assert!(first.single_outcome().is_success());
    assert_eq!(second.callback_count(), 1);
}

#[tokio::test]
async fn test_new_login_after_completion() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(VendorCallback::Cancel).push(qq_complete());

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();

    let first = RecordingListener::new();
    adapter.do_login(first.clone(), false);
    adapter.handle_result(REQUEST_CODE, 0, None);

    let second = RecordingListener::new();
    adapter.do_login(second.clone(), false);
    adapter.handle_result(REQUEST_CODE, -1, None);
    ui_loop.run_pending();

    assert_eq!(first.single_outcome(), LoginOutcome::Cancelled);
    assert!(second.single_outcome().is_success());
    assert_eq!(sdk.authorize_scopes().len(), 2);
}

#[tokio::test]
async fn test_callbacks_wait_for_ui_thread() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();
    sdk.push(VendorCallback::Cancel);

    let mut adapter = LoginAdapter::qq(context, sdk.boxed()).unwrap();
    let listener = RecordingListener::new();
    adapter.do_login(listener.clone(), false);
    adapter.handle_result(REQUEST_CODE, 0, None);

    // 尝试已结束,但回调尚未在界面线程执行
    assert_eq!(
        adapter.current_attempt().map(|a| a.state),
        Some(LoginState::Cancelled)
    );
    assert_eq!(listener.callback_count(), 0);

    assert_eq!(ui_loop.run_pending(), 1);
    assert_eq!(listener.single_outcome(), LoginOutcome::Cancelled);
}

#[tokio::test]
async fn test_web_callback_without_pending_attempt_is_dropped() {
    let (context, mut ui_loop) = channel_context(test_config("http://127.0.0.1:1"));
    let sdk = MockSdk::new();

    let mut adapter = LoginAdapter::weibo(context, sdk.boxed()).unwrap();
    adapter.on_vendor_callback(weibo_complete());

    assert_eq!(ui_loop.run_pending(), 0);
    assert!(adapter.current_attempt().is_none());
}

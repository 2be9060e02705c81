//! 授权回调归一化
//!
//! | SDK回调 | 结果 |
//! |---|---|
//! | Complete(payload) | 解析为 AccessToken,解析失败视为 Failed |
//! | Cancel | Cancelled |
//! | Error(e) | Failed(AuthFailed),携带平台错误码与描述 |

use crate::models::{AccessToken, LoginError};
use crate::platforms::PlatformProvider;
use crate::services::sdk::VendorCallback;

/// 授权阶段的结果
///
/// `Authorized` 还不是终态: 可能紧接着获取用户信息
#[derive(Debug, Clone, PartialEq)]
pub enum AuthOutcome {
    Authorized(AccessToken),
    Cancelled,
    Failed(LoginError),
}

pub fn normalize<P>(provider: &P, callback: VendorCallback) -> AuthOutcome
where
    P: PlatformProvider + ?Sized,
{
    let platform = provider.platform();
    match callback {
        VendorCallback::Complete(payload) => match provider.parse_token(payload) {
            Ok(token) => {
                tracing::info!(
                    platform = %platform,
                    openid = %token.openid,
                    access_token = %token.masked_access_token(),
                    "授权成功"
                );
                AuthOutcome::Authorized(token)
            }
            Err(e) => {
                tracing::warn!(platform = %platform, error = %e, "授权数据非法");
                AuthOutcome::Failed(e)
            }
        },
        VendorCallback::Cancel => {
            tracing::info!(platform = %platform, "用户取消授权");
            AuthOutcome::Cancelled
        }
        VendorCallback::Error(vendor_error) => {
            let err = LoginError::auth_failed(platform, vendor_error.code, vendor_error.diagnostic());
            tracing::warn!(
                platform = %platform,
                code = ?vendor_error.code,
                error = %err,
                "平台授权失败"
            );
            AuthOutcome::Failed(err)
        }
    }
}

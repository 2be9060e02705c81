//! 第三方SDK与宿主能力的抽象边界
//!
//! 平台SDK (授权界面、SSO跳转、网页授权) 与已安装应用查询由宿主提供,
//! 适配器只通过这里的trait与它们交互。

use serde_json::Value;
use std::collections::HashMap;

/// SDK授权成功时携带的原始数据
#[derive(Debug, Clone, PartialEq)]
pub enum AuthPayload {
    /// JSON对象 (QQ SDK的 `onComplete` 返回值)
    Json(Value),

    /// 键值对 (微博SDK的授权 Bundle)
    Bundle(HashMap<String, String>),
}

/// SDK报告的错误
#[derive(Debug, Clone, PartialEq)]
pub struct VendorError {
    /// 平台错误码
    pub code: Option<i32>,

    /// 错误描述
    pub message: String,

    /// 详细信息 (QQ `UiError.errorDetail`)
    pub detail: Option<String>,
}

impl VendorError {
    pub fn new(code: Option<i32>, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            detail: None,
        }
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }

    /// 诊断文本: 优先使用详细信息,否则使用描述
    pub fn diagnostic(&self) -> &str {
        self.detail
            .as_deref()
            .filter(|d| !d.is_empty())
            .unwrap_or(&self.message)
    }
}

/// SDK的三种回调
///
/// 对应平台监听器的 complete / error / cancel 三个方法
#[derive(Debug, Clone, PartialEq)]
pub enum VendorCallback {
    Complete(AuthPayload),
    Error(VendorError),
    Cancel,
}

/// 平台授权SDK
///
/// 由宿主实现,封装平台SDK实例。
pub trait AuthSdk: Send {
    /// 启动授权界面
    ///
    /// 非阻塞;结果稍后通过 [`AuthSdk::dispatch_result`] 返回
    fn authorize(&mut self, scope: &str) -> Result<(), VendorError>;

    /// 分发宿主界面返回的结果
    ///
    /// 宿主界面重新获得控制权时调用。
    /// 结果不属于本SDK时返回 `None`。
    fn dispatch_result(
        &mut self,
        request_code: i32,
        result_code: i32,
        data: Option<&Value>,
    ) -> Option<VendorCallback>;

    /// SDK自身判断客户端是否安装
    ///
    /// 返回 `None` 表示SDK无法判断,由已安装应用列表决定
    fn is_app_installed(&self) -> Option<bool> {
        None
    }

    /// 释放SDK持有的资源
    fn release(&mut self) {}
}

/// 已安装应用查询
pub trait PackageQuery {
    /// 已安装应用的包名列表
    ///
    /// 查询能力不可用时返回 `None`
    fn installed_packages(&self) -> Option<Vec<String>>;
}

/// 固定的已安装应用列表
#[derive(Debug, Clone, Default)]
pub struct StaticPackages(pub Option<Vec<String>>);

impl StaticPackages {
    pub fn new<I, S>(packages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(Some(packages.into_iter().map(Into::into).collect()))
    }

    /// 查询能力不可用
    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl PackageQuery for StaticPackages {
    fn installed_packages(&self) -> Option<Vec<String>> {
        self.0.clone()
    }
}

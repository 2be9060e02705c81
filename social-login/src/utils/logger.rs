use std::io;
use std::path::{Path, PathBuf};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// 默认日志目录
///
/// - Linux: `~/.local/share/social-login/logs/`
/// - macOS: `~/Library/Application Support/social-login/logs/`
/// - Windows: `C:\Users\<user>\AppData\Local\social-login\logs\`
///
/// 无法获取系统目录时回退到 `./logs`
pub fn default_log_dir() -> PathBuf {
    dirs::data_local_dir()
        .map(|p| p.join("social-login").join("logs"))
        .unwrap_or_else(|| PathBuf::from("logs"))
}

/// 初始化日志系统
///
/// 配置结构化日志输出:
/// - JSON格式文件: 按天轮转,文件名 `social-login.2025-10-05.log`
/// - non_blocking: 日志I/O不阻塞登录回调
/// - 控制台: 人类可读格式,便于开发调试
/// - 环境变量控制: RUST_LOG=debug 可调整日志级别,默认 INFO
///
/// # 示例日志
/// ```json
/// {
///   "timestamp": "2025-10-05T10:30:45.123Z",
///   "level": "INFO",
///   "target": "social_login::services::login_adapter",
///   "fields": {
///     "attempt_id": "5f0c...",
///     "platform": "QQ",
///     "message": "授权成功"
///   }
/// }
/// ```
///
/// # 重要提示
/// 返回的guard必须被调用者保存,直到应用退出。
/// 如果guard被drop,文件写入器将被关闭。
pub fn init(log_dir: impl AsRef<Path>) -> Result<WorkerGuard, io::Error> {
    let log_dir = log_dir.as_ref();
    std::fs::create_dir_all(log_dir)?;

    let file_appender = RollingFileAppender::builder()
        .rotation(Rotation::DAILY)
        .filename_prefix("social-login")
        .filename_suffix("log")
        .build(log_dir)
        .map_err(|e| io::Error::new(io::ErrorKind::Other, e))?;

    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

    // 文件层: JSON格式,便于日志分析工具解析
    let file_layer = fmt::layer()
        .json()
        .with_writer(non_blocking)
        .with_target(true)
        .with_thread_ids(false)
        .with_thread_names(false)
        .with_file(false)
        .with_line_number(false);

    // 控制台层: 输出到stderr,stdout留给CLI结果
    let console_layer = fmt::layer()
        .with_writer(io::stderr)
        .with_target(true)
        .with_level(true)
        .with_ansi(true);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(file_layer)
        .with(console_layer)
        .try_init()
        .map_err(|e| io::Error::new(io::ErrorKind::AlreadyExists, e))?;

    Ok(guard)
}

/// 日志宏辅助模块
///
/// 提供结构化日志的便捷宏
pub mod macros {
    /// 记录登录流程事件
    ///
    /// 使用示例:
    /// ```no_run
    /// use social_login::log_event;
    /// log_event!(
    ///     "LoginSucceeded",
    ///     attempt_id = "5f0c0b1e",
    ///     platform = "QQ"
    /// );
    /// ```
    #[macro_export]
    macro_rules! log_event {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::info!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }

    /// 记录登录失败事件
    ///
    /// 使用示例:
    /// ```no_run
    /// use social_login::log_error;
    /// log_error!(
    ///     "ProfileFetchFailed",
    ///     attempt_id = "5f0c0b1e",
    ///     error = "connection timeout"
    /// );
    /// ```
    #[macro_export]
    macro_rules! log_error {
        ($event_type:expr, $($field:tt = $value:expr),* $(,)?) => {
            tracing::error!(
                event_type = $event_type,
                $($field = $value),*
            );
        };
    }
}

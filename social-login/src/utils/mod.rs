//! 工具模块
//!
//! - logger: 日志系统初始化
//! - redact: 敏感数据脱敏
//! - json_fields: 宽松的JSON字段读取

pub mod json_fields;
pub mod logger;
pub mod redact;

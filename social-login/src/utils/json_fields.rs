//! 宽松的JSON字段读取
//!
//! 平台接口对同一字段时而返回字符串、时而返回数字 (如 `expires_in`、微博 `id`),
//! 这里统一做兼容读取。

use serde_json::{Map, Value};

/// 读取字符串字段
///
/// - 字符串: 去除首尾空白,空串视为缺失
/// - 数字: 转为十进制字符串
/// - 其他类型: 视为缺失
pub fn string_field(obj: &Map<String, Value>, key: &str) -> Option<String> {
    match obj.get(key)? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty()).then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// 读取整数字段,兼容数字字符串
pub fn i64_field(obj: &Map<String, Value>, key: &str) -> Option<i64> {
    match obj.get(key)? {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

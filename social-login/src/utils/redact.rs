/// 脱敏处理
///
/// 长度大于8的值保留首4位和末2位,其余替换为 `*`;
/// 较短的值整体替换为 `****`。日志中不出现完整的令牌或密钥。
pub fn mask_secret(value: &str) -> String {
    let chars: Vec<char> = value.chars().collect();
    if chars.len() <= 8 {
        return "****".to_string();
    }

    let head: String = chars[..4].iter().collect();
    let tail: String = chars[chars.len() - 2..].iter().collect();
    format!("{}{}{}", head, "*".repeat(chars.len() - 6), tail)
}

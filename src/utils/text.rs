//! 字符串处理工具
//!
//! 所有长度均按 Unicode 字符计算，避免在多字节字符中间截断。

use uuid::Uuid;

/// 首字母大写，其余字符保持不变
///
/// 非字母开头的字符串原样返回（`to_uppercase` 对其无影响）。
pub fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// 按字符数截断
///
/// 超过 `max_chars` 时保留前 `max_chars - 3` 个字符并追加 `...`，
/// 截断后的总长度恰好为 `max_chars`。
pub fn truncate_chars(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        return s.to_string();
    }
    let keep = max_chars.saturating_sub(3);
    let mut out: String = s.chars().take(keep).collect();
    out.push_str("...");
    out
}

/// API 密钥脱敏
pub fn mask_api_key(api_key: &str) -> String {
    let len = api_key.chars().count();
    if len <= 8 {
        "*".repeat(len)
    } else {
        let head: String = api_key.chars().take(4).collect();
        let tail: String = api_key.chars().skip(len - 4).collect();
        format!("{}...{}", head, tail)
    }
}

/// 生成请求 ID（8 位，仅用于日志关联）
pub fn generate_request_id() -> String {
    Uuid::new_v4().simple().to_string()[..8].to_string()
}

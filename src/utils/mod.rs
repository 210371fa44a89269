pub mod password;
pub mod short_code;
pub mod url_validator;

pub use short_code::generate_short_code;

/// 生成指定长度的随机字母数字字符串
pub fn generate_random_code(length: usize) -> String {
    use std::iter;

    let chars = b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

    iter::repeat_with(|| chars[rand::random_range(0..chars.len())] as char)
        .take(length)
        .collect()
}

/// Generate a secure random token (for signing secrets)
pub fn generate_secure_token(length: usize) -> String {
    generate_random_code(length)
}

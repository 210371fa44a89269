//! 统一 API 错误码定义

use serde_repr::{Deserialize_repr, Serialize_repr};

use crate::errors::LinkvaultError;

/// API 错误码枚举
///
/// 使用 serde_repr 序列化为数字。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize_repr, Deserialize_repr)]
#[repr(i32)]
pub enum ErrorCode {
    Success = 0,

    BadRequest = 1000,
    Unauthorized = 1001,
    Forbidden = 1003,
    NotFound = 1004,
    InternalServerError = 1005,
    Conflict = 1009,
}

impl From<&LinkvaultError> for ErrorCode {
    fn from(err: &LinkvaultError) -> Self {
        match err {
            LinkvaultError::Validation(_) => ErrorCode::BadRequest,
            LinkvaultError::Auth(_) => ErrorCode::Unauthorized,
            LinkvaultError::Forbidden(_) => ErrorCode::Forbidden,
            LinkvaultError::Conflict(_) => ErrorCode::Conflict,
            LinkvaultError::NotFound(_) => ErrorCode::NotFound,
            LinkvaultError::Config(_)
            | LinkvaultError::DatabaseConnection(_)
            | LinkvaultError::DatabaseOperation(_)
            | LinkvaultError::Internal(_) => ErrorCode::InternalServerError,
        }
    }
}

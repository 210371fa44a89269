//! API 帮助函数

use actix_web::HttpRequest;
use actix_web::HttpResponse;
use actix_web::http::StatusCode;
use serde::Serialize;
use tracing::error;

use crate::errors::LinkvaultError;

use super::error_code::ErrorCode;
use super::types::ApiResponse;

/// 构建 JSON 响应
pub fn json_response<T: Serialize>(
    status: StatusCode,
    code: ErrorCode,
    message: impl Into<String>,
    data: Option<T>,
) -> HttpResponse {
    HttpResponse::build(status)
        .append_header(("Content-Type", "application/json; charset=utf-8"))
        .json(ApiResponse {
            code: code as i32,
            message: message.into(),
            data,
        })
}

/// 构建成功响应
pub fn success_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::OK, ErrorCode::Success, "OK", Some(data))
}

/// 构建 201 响应（新建资源）
pub fn created_response<T: Serialize>(data: T) -> HttpResponse {
    json_response(StatusCode::CREATED, ErrorCode::Success, "Created", Some(data))
}

/// 构建错误响应
pub fn error_response(status: StatusCode, error_code: ErrorCode, message: &str) -> HttpResponse {
    json_response::<()>(status, error_code, message, None)
}

/// 从 LinkvaultError 构建错误响应（自动映射 HTTP 状态码和 ErrorCode）
///
/// 500 级错误只返回笼统信息，详情写入日志。
pub fn error_from_linkvault(err: &LinkvaultError) -> HttpResponse {
    let status = err.http_status();
    let code = ErrorCode::from(err);

    if err.is_internal() {
        error!("API: internal error: {}", err);
        return error_response(status, code, "an unexpected error occurred");
    }

    error_response(status, code, err.message())
}

/// 统一 Result → HttpResponse 转换
pub fn api_result<T: Serialize>(result: Result<T, LinkvaultError>) -> HttpResponse {
    match result {
        Ok(data) => success_response(data),
        Err(e) => error_from_linkvault(&e),
    }
}

/// 从 Authorization header 提取 Bearer token
pub fn extract_bearer_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .and_then(|s| s.strip_prefix("Bearer "))
        .map(|s| s.to_string())
}

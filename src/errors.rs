use std::fmt;

use actix_web::http::StatusCode;

#[derive(Debug, Clone)]
pub enum LinkvaultError {
    Validation(String),
    Auth(String),
    Forbidden(String),
    Conflict(String),
    NotFound(String),
    Config(String),
    DatabaseConnection(String),
    DatabaseOperation(String),
    Internal(String),
}

impl LinkvaultError {
    /// 获取错误代码
    pub fn code(&self) -> &'static str {
        match self {
            LinkvaultError::Validation(_) => "E001",
            LinkvaultError::Auth(_) => "E002",
            LinkvaultError::Forbidden(_) => "E003",
            LinkvaultError::Conflict(_) => "E004",
            LinkvaultError::NotFound(_) => "E005",
            LinkvaultError::Config(_) => "E006",
            LinkvaultError::DatabaseConnection(_) => "E007",
            LinkvaultError::DatabaseOperation(_) => "E008",
            LinkvaultError::Internal(_) => "E009",
        }
    }

    /// 获取错误类型名称
    pub fn error_type(&self) -> &'static str {
        match self {
            LinkvaultError::Validation(_) => "Validation Error",
            LinkvaultError::Auth(_) => "Authentication Error",
            LinkvaultError::Forbidden(_) => "Forbidden",
            LinkvaultError::Conflict(_) => "Conflict",
            LinkvaultError::NotFound(_) => "Resource Not Found",
            LinkvaultError::Config(_) => "Configuration Error",
            LinkvaultError::DatabaseConnection(_) => "Database Connection Error",
            LinkvaultError::DatabaseOperation(_) => "Database Operation Error",
            LinkvaultError::Internal(_) => "Internal Error",
        }
    }

    /// 获取错误详情
    pub fn message(&self) -> &str {
        match self {
            LinkvaultError::Validation(msg) => msg,
            LinkvaultError::Auth(msg) => msg,
            LinkvaultError::Forbidden(msg) => msg,
            LinkvaultError::Conflict(msg) => msg,
            LinkvaultError::NotFound(msg) => msg,
            LinkvaultError::Config(msg) => msg,
            LinkvaultError::DatabaseConnection(msg) => msg,
            LinkvaultError::DatabaseOperation(msg) => msg,
            LinkvaultError::Internal(msg) => msg,
        }
    }

    /// HTTP status the transport boundary maps this error to.
    ///
    /// Everything that is not one of the client-facing kinds collapses to
    /// 500; the boundary replaces the message of 500-class responses with a
    /// generic one so store/config details never leak to callers.
    pub fn http_status(&self) -> StatusCode {
        match self {
            LinkvaultError::Validation(_) => StatusCode::BAD_REQUEST,
            LinkvaultError::Auth(_) => StatusCode::UNAUTHORIZED,
            LinkvaultError::Forbidden(_) => StatusCode::FORBIDDEN,
            LinkvaultError::Conflict(_) => StatusCode::CONFLICT,
            LinkvaultError::NotFound(_) => StatusCode::NOT_FOUND,
            LinkvaultError::Config(_)
            | LinkvaultError::DatabaseConnection(_)
            | LinkvaultError::DatabaseOperation(_)
            | LinkvaultError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// 是否属于对外不暴露详情的服务端错误
    pub fn is_internal(&self) -> bool {
        self.http_status() == StatusCode::INTERNAL_SERVER_ERROR
    }

    pub fn format_simple(&self) -> String {
        format!("{}: {}", self.error_type(), self.message())
    }
}

impl fmt::Display for LinkvaultError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.format_simple())
    }
}

impl std::error::Error for LinkvaultError {}

// 便捷的构造函数
impl LinkvaultError {
    pub fn validation<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Validation(msg.into())
    }

    pub fn auth<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Auth(msg.into())
    }

    pub fn forbidden<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Forbidden(msg.into())
    }

    pub fn conflict<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Conflict(msg.into())
    }

    pub fn not_found<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::NotFound(msg.into())
    }

    pub fn config<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Config(msg.into())
    }

    pub fn database_connection<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::DatabaseConnection(msg.into())
    }

    pub fn database_operation<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::DatabaseOperation(msg.into())
    }

    pub fn internal<T: Into<String>>(msg: T) -> Self {
        LinkvaultError::Internal(msg.into())
    }
}

// 为常见的错误类型实现 From trait
impl From<sea_orm::DbErr> for LinkvaultError {
    fn from(err: sea_orm::DbErr) -> Self {
        LinkvaultError::DatabaseOperation(err.to_string())
    }
}

impl From<serde_json::Error> for LinkvaultError {
    fn from(err: serde_json::Error) -> Self {
        LinkvaultError::Internal(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for LinkvaultError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        LinkvaultError::Auth(format!("invalid or expired token: {}", err))
    }
}

pub type Result<T> = std::result::Result<T, LinkvaultError>;

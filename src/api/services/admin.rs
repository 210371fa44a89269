//! 管理端点
//!
//! The single "admin" capability of the system: a destructive full reset of
//! the store. Any authenticated user can reach the route; only the
//! hardcoded `admin` subject may use it.

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpMessage, HttpRequest, Responder, Result as ActixResult, web};
use tracing::warn;

use crate::services::AuthedUser;
use crate::storage::Storage;

use super::error_code::ErrorCode;
use super::helpers::{error_from_linkvault, error_response, success_response};
use super::types::MessageResponse;

pub const ADMIN_USERNAME: &str = "admin";

/// 清空数据库（用户、映射、吊销记录）
pub async fn reset(
    req: HttpRequest,
    storage: web::Data<Arc<dyn Storage>>,
) -> ActixResult<impl Responder> {
    let authed = req.extensions().get::<AuthedUser>().cloned();

    let Some(authed) = authed else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "missing bearer token",
        ));
    };

    if authed.username != ADMIN_USERNAME {
        warn!(
            "Admin API: reset refused for non-admin user '{}'",
            authed.username
        );
        return Ok(error_response(
            StatusCode::FORBIDDEN,
            ErrorCode::Forbidden,
            "admin privileges required",
        ));
    }

    match storage.reset().await {
        Ok(()) => {
            warn!("Admin API: database reset by '{}'", authed.username);
            Ok(success_response(MessageResponse {
                message: "Database reset successful".to_string(),
            }))
        }
        Err(e) => Ok(error_from_linkvault(&e)),
    }
}

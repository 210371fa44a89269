//! 认证相关端点

use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{HttpRequest, Responder, Result as ActixResult, web};

use crate::services::AuthService;

use super::error_code::ErrorCode;
use super::helpers::{
    created_response, error_from_linkvault, error_response, extract_bearer_token, success_response,
};
use super::types::{CredentialsRequest, MessageResponse, TokenResponse};

/// 注册新用户并签发首个 token
pub async fn signup(
    body: web::Json<CredentialsRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let username = body.username.clone().unwrap_or_default();
    let password = body.password.clone().unwrap_or_default();

    match auth.signup(&username, &password).await {
        Ok(token) => Ok(created_response(TokenResponse {
            access_token: token,
        })),
        Err(e) => Ok(error_from_linkvault(&e)),
    }
}

/// 校验凭据并签发 token
pub async fn login(
    body: web::Json<CredentialsRequest>,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let username = body.username.clone().unwrap_or_default();
    let password = body.password.clone().unwrap_or_default();

    match auth.login(&username, &password).await {
        Ok(token) => Ok(success_response(TokenResponse {
            access_token: token,
        })),
        Err(e) => Ok(error_from_linkvault(&e)),
    }
}

/// 注销：吊销当前 token
///
/// Revoke validates the token itself (an expired or malformed token cannot
/// be logged out), so this endpoint sits outside the auth middleware.
pub async fn logout(
    req: HttpRequest,
    auth: web::Data<Arc<AuthService>>,
) -> ActixResult<impl Responder> {
    let Some(token) = extract_bearer_token(&req) else {
        return Ok(error_response(
            StatusCode::UNAUTHORIZED,
            ErrorCode::Unauthorized,
            "missing bearer token",
        ));
    };

    match auth.logout(&token).await {
        Ok(_) => Ok(success_response(MessageResponse {
            message: "Successfully logged out".to_string(),
        })),
        Err(e) => Ok(error_from_linkvault(&e)),
    }
}

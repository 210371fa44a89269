use std::rc::Rc;
use std::sync::Arc;

use actix_service::{Service, Transform};
use actix_web::{
    Error, HttpMessage, HttpResponse,
    body::EitherBody,
    dev::{ServiceRequest, ServiceResponse},
    http::StatusCode,
    web,
};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::{info, trace};

use crate::api::services::error_code::ErrorCode;
use crate::api::services::helpers::{error_from_linkvault, error_response};
use crate::services::AuthService;

/// Bearer-token authentication middleware
///
/// Validates the token (signature, expiry, revocation list) and injects the
/// resulting [`AuthedUser`](crate::services::AuthedUser) into request
/// extensions for downstream handlers. Any valid non-revoked token grants
/// access; per-user authorization beyond that is a handler concern.
#[derive(Clone)]
pub struct BearerAuth;

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthMiddleware {
            service: Rc::new(service),
        }))
    }
}

pub struct BearerAuthMiddleware<S> {
    service: Rc<S>,
}

impl<S, B> BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    fn handle_unauthorized(req: ServiceRequest, message: &str) -> ServiceResponse<EitherBody<B>> {
        info!("Bearer authentication failed: {}", message);
        req.into_response(
            error_response(StatusCode::UNAUTHORIZED, ErrorCode::Unauthorized, message)
                .map_into_right_body(),
        )
    }

    fn handle_error(
        req: ServiceRequest,
        err: &crate::errors::LinkvaultError,
    ) -> ServiceResponse<EitherBody<B>> {
        req.into_response(error_from_linkvault(err).map_into_right_body())
    }

    /// 从 Authorization header 提取 Bearer token
    fn extract_bearer_token(req: &ServiceRequest) -> Option<String> {
        req.headers()
            .get("Authorization")
            .and_then(|h| h.to_str().ok())
            .and_then(|s| s.strip_prefix("Bearer "))
            .map(|s| s.to_string())
    }
}

impl<S, B> Service<ServiceRequest> for BearerAuthMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(
        &self,
        ctx: &mut std::task::Context<'_>,
    ) -> std::task::Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let srv = self.service.clone();

        Box::pin(async move {
            let Some(auth_service) = req
                .app_data::<web::Data<Arc<AuthService>>>()
                .map(|d| d.get_ref().clone())
            else {
                // Service wiring problem, not a client error.
                return Ok(req.into_response(
                    HttpResponse::InternalServerError()
                        .finish()
                        .map_into_right_body(),
                ));
            };

            let Some(token) = Self::extract_bearer_token(&req) else {
                return Ok(Self::handle_unauthorized(req, "missing bearer token"));
            };

            match auth_service.validate(&token).await {
                Ok(authed) => {
                    trace!("Bearer authentication successful for '{}'", authed.username);
                    req.extensions_mut().insert(authed);
                    let response = srv.call(req).await?.map_into_left_body();
                    Ok(response)
                }
                Err(e) if e.is_internal() => Ok(Self::handle_error(req, &e)),
                Err(e) => Ok(Self::handle_unauthorized(req, e.message())),
            }
        })
    }
}

//! Route tree
//!
//! /auth: signup/login pass through unauthenticated; logout validates the
//! token itself as part of revoke.
//! /api: encode/decode behind the bearer middleware.
//! /admin: bearer middleware plus the handler-side admin check.

use actix_web::web;

use crate::api::middleware::BearerAuth;
use crate::api::services::{admin, auth, mapping};

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/auth")
            .route("/signup", web::post().to(auth::signup))
            .route("/login", web::post().to(auth::login))
            .route("/logout", web::post().to(auth::logout)),
    )
    .service(
        web::scope("/api")
            .wrap(BearerAuth)
            .route("/encode", web::post().to(mapping::encode))
            .route("/decode", web::post().to(mapping::decode)),
    )
    .service(
        web::scope("/admin")
            .wrap(BearerAuth)
            .route("/reset", web::post().to(admin::reset)),
    );
}

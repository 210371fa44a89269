//! 编码/解码端点

use std::sync::Arc;

use actix_web::{Responder, Result as ActixResult, web};

use crate::config::AppConfig;
use crate::services::{EncodeOutcome, MappingService};

use super::helpers::{api_result, created_response, error_from_linkvault, success_response};
use super::types::{DecodeRequest, EncodeRequest, LongUrlResponse, ShortUrlResponse};

/// 长链接 → 短链接
///
/// 201 on a freshly created mapping, 200 when the request resolved to an
/// existing one.
pub async fn encode(
    body: web::Json<EncodeRequest>,
    mapping: web::Data<Arc<MappingService>>,
    config: web::Data<AppConfig>,
) -> ActixResult<impl Responder> {
    let long_url = body.long_url.clone().unwrap_or_default();

    match mapping.encode(&long_url).await {
        Ok(result) => {
            let short_url = format!(
                "{}/{}",
                config.features.public_base_url.trim_end_matches('/'),
                result.short_code
            );
            let response = ShortUrlResponse { short_url };
            Ok(match result.outcome {
                EncodeOutcome::Created => created_response(response),
                EncodeOutcome::AlreadyMapped => success_response(response),
            })
        }
        Err(e) => Ok(error_from_linkvault(&e)),
    }
}

/// 短链接 → 长链接
pub async fn decode(
    body: web::Json<DecodeRequest>,
    mapping: web::Data<Arc<MappingService>>,
) -> ActixResult<impl Responder> {
    let short_url = body.short_url.clone().unwrap_or_default();

    let result = mapping
        .decode(&short_url)
        .await
        .map(|long_url| LongUrlResponse { long_url });

    Ok(api_result(result))
}

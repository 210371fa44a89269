//! API 类型定义

use serde::{Deserialize, Serialize};

/// Signup/login request body. Fields stay optional so that "not provided"
/// is reported through the normal validation path instead of a bare
/// deserializer error; unknown fields are rejected outright.
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct CredentialsRequest {
    pub username: Option<String>,
    pub password: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct EncodeRequest {
    pub long_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(deny_unknown_fields)]
pub struct DecodeRequest {
    pub short_url: Option<String>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ApiResponse<T> {
    pub code: i32,
    pub message: String,
    pub data: Option<T>,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct ShortUrlResponse {
    pub short_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct LongUrlResponse {
    pub long_url: String,
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct MessageResponse {
    pub message: String,
}

//! Request guards. `StationApiKey` covers the station-scoped `/rms/*`
//! routes; `AuthUser` carries bearer-token claims for profile routes.

use std::future::{ready, Ready};

use actix_web::dev::Payload;
use actix_web::{web, FromRequest, HttpRequest};
use rms_common::auth::{decode_token, Claims};

use crate::config::AppConfig;
use crate::error::ApiError;

pub const API_KEY_HEADER: &str = "x-api-key";

/// Present in a handler signature, this proves the request carried the
/// exact configured key. Constant content, so the guard itself is a unit.
pub struct StationApiKey;

impl FromRequest for StationApiKey {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let configured = req
            .app_data::<web::Data<AppConfig>>()
            .map(|cfg| cfg.api_key.as_str());
        let provided = req
            .headers()
            .get(API_KEY_HEADER)
            .and_then(|v| v.to_str().ok());

        ready(match (configured, provided) {
            (Some(expected), Some(key)) if key == expected => Ok(StationApiKey),
            _ => Err(ApiError::Unauthorized(
                "invalid or missing api key".to_string(),
            )),
        })
    }
}

/// Verified bearer-token claims of the signed-in user.
pub struct AuthUser(pub Claims);

impl FromRequest for AuthUser {
    type Error = ApiError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let token = req
            .headers()
            .get("Authorization")
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.strip_prefix("Bearer "));

        ready(match token {
            Some(token) => decode_token(token).map(AuthUser).map_err(|_| {
                ApiError::Unauthorized("invalid or expired token".to_string())
            }),
            None => Err(ApiError::Unauthorized("missing bearer token".to_string())),
        })
    }
}

//! Actix-web extractor guarding mutating endpoints.
//!
//! # Security
//! - The provided key is wrapped in `SecretString` as soon as it is read
//! - Key values are never logged or exposed in debug output
//! - Comparison is constant-time

use actix_web::dev::Payload;
use actix_web::http::StatusCode;
use actix_web::{web, FromRequest, HttpRequest, HttpResponse, ResponseError};
use secrecy::{ExposeSecret, SecretString};
use std::future::{ready, Ready};

use super::WriteKey;
use crate::config::API_KEY_HEADER;
use crate::error::ErrorResponse;

/// Extract a secret header value, wrapping it in SecretString.
/// Returns None if the header is missing or invalid UTF-8.
fn extract_secret_header(req: &HttpRequest, header_name: &str) -> Option<SecretString> {
    req.headers()
        .get(header_name)
        .and_then(|v| v.to_str().ok())
        .map(|s| SecretString::from(s.to_string()))
}

/// Authentication error for extractors.
#[derive(Debug)]
pub struct AuthError {
    message: String,
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl ResponseError for AuthError {
    fn status_code(&self) -> StatusCode {
        StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(StatusCode::UNAUTHORIZED).json(ErrorResponse {
            error: "UNAUTHORIZED".to_string(),
            message: self.message.clone(),
        })
    }
}

/// Proof that the request carried the shared write key.
///
/// ```ignore
/// async fn submit(_auth: WriteAccess, ...) -> AppResult<HttpResponse> { ... }
/// ```
#[derive(Debug)]
pub struct WriteAccess;

impl FromRequest for WriteAccess {
    type Error = AuthError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let Some(stored) = req.app_data::<web::Data<WriteKey>>() else {
            return ready(Err(AuthError {
                message: "Internal configuration error".to_string(),
            }));
        };

        let outcome = match extract_secret_header(req, API_KEY_HEADER) {
            Some(provided) if stored.verify(provided.expose_secret()) => Ok(WriteAccess),
            Some(_) => Err(AuthError {
                message: "Invalid API key".to_string(),
            }),
            None => Err(AuthError {
                message: format!("Missing API key. Provide {} header.", API_KEY_HEADER),
            }),
        };

        ready(outcome)
    }
}

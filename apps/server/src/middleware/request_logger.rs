//! Request logging middleware.
//!
//! Every request gets a UUIDv7 id, echoed back in `X-Request-Id`, so client
//! reports can be matched with the start and end log lines.

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderName, HeaderValue};
use actix_web::http::StatusCode;
use actix_web::Error;
use futures_util::future::LocalBoxFuture;
use std::future::{ready, Ready};
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use crate::config::API_KEY_HEADER;

/// Response header carrying the request id.
pub const REQUEST_ID_HEADER: &str = "x-request-id";

/// Liveness and readiness polls, logged at debug level when they succeed.
fn is_health_check(path: &str) -> bool {
    path.ends_with("/health") || path.ends_with("/ready")
}

/// Request logger middleware factory.
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

/// Request logger middleware service.
pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let start = Instant::now();
        let request_id = Uuid::now_v7();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let quiet = is_health_check(&path);

        if quiet {
            debug!(target: "api", %request_id, %method, %path, "→ Health check");
        } else {
            let remote_addr = req
                .connection_info()
                .realip_remote_addr()
                .unwrap_or("unknown")
                .to_string();
            // Presence only; the key itself never reaches the logs
            let has_api_key = req.headers().contains_key(API_KEY_HEADER);

            info!(
                target: "api",
                %request_id,
                %method,
                %path,
                query = %req.query_string(),
                %remote_addr,
                has_api_key,
                "→ Request started"
            );
        }

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            if let Ok(value) = HeaderValue::from_str(&request_id.to_string()) {
                res.headers_mut()
                    .insert(HeaderName::from_static(REQUEST_ID_HEADER), value);
            }

            log_completion(request_id, &method, &path, res.status(), start.elapsed(), quiet);
            Ok(res)
        })
    }
}

fn log_completion(
    request_id: Uuid,
    method: &str,
    path: &str,
    status: StatusCode,
    elapsed: Duration,
    quiet: bool,
) {
    let status_code = status.as_u16();
    let duration_ms = elapsed.as_millis();

    if status.is_server_error() {
        error!(target: "api", %request_id, method, path, status = status_code, %duration_ms, "← Server error");
    } else if status.is_client_error() {
        warn!(target: "api", %request_id, method, path, status = status_code, %duration_ms, "← Client error");
    } else if quiet {
        debug!(target: "api", %request_id, method, path, status = status_code, %duration_ms, "← Health check");
    } else {
        info!(target: "api", %request_id, method, path, status = status_code, %duration_ms, "← Request completed");
    }
}

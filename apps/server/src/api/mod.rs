//! API endpoint modules.

pub mod defects;
pub mod health;
pub mod inspections;
pub mod openapi;
pub mod orders;
pub mod production_tasks;
pub mod qc_reports;

use actix_web::{error, web, HttpRequest};

pub use defects::configure_routes as configure_defect_routes;
pub use health::configure_health_routes;
pub use inspections::configure_routes as configure_inspection_routes;
pub use openapi::ApiDoc;
pub use orders::configure_routes as configure_order_routes;
pub use production_tasks::configure_routes as configure_task_routes;
pub use qc_reports::configure_routes as configure_qc_report_routes;

use crate::error::AppError;

fn json_error(err: error::JsonPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(err.to_string()).into()
}

fn query_error(err: error::QueryPayloadError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(err.to_string()).into()
}

fn path_error(err: error::PathError, _req: &HttpRequest) -> actix_web::Error {
    AppError::InvalidInput(err.to_string()).into()
}

/// Everything mounted under `/api/v1`.
///
/// Extractor failures render as `INVALID_INPUT` error bodies.
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.app_data(web::JsonConfig::default().error_handler(json_error))
        .app_data(web::QueryConfig::default().error_handler(query_error))
        .app_data(web::PathConfig::default().error_handler(path_error))
        .configure(configure_health_routes)
        .configure(configure_order_routes)
        .configure(configure_task_routes)
        .configure(configure_inspection_routes)
        .configure(configure_defect_routes)
        .configure(configure_qc_report_routes);
}

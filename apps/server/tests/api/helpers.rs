//! Shared test helpers for API integration tests.

use actix_web::{dev::ServiceResponse, test, web, App};
use atelier_qc_lib::api;
use atelier_qc_lib::auth::WriteKey;
use atelier_qc_lib::config::{DatabaseSettings, API_KEY_HEADER};
use atelier_qc_lib::db::DbPool;
use serde_json::{json, Value};
use tempfile::TempDir;

/// Write key configured for every test app.
pub const TEST_API_KEY: &str = "test-write-key-for-api-tests";

/// A migrated database that lives as long as this value.
pub struct TestDb {
    pub pool: DbPool,
    _dir: TempDir,
}

/// Create a fresh SQLite database file and run migrations.
pub async fn create_test_db() -> TestDb {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let url = format!(
        "sqlite://{}?mode=rwc",
        dir.path().join("atelier-test.db").display()
    );

    let pool = DbPool::connect(&DatabaseSettings {
        url,
        max_connections: 2,
        min_connections: 1,
    })
    .await
    .expect("Failed to open test database");
    pool.run_migrations()
        .await
        .expect("Failed to run migrations");

    TestDb { pool, _dir: dir }
}

/// Create a test app mounted under `/api/v1`.
pub async fn create_test_app(
    pool: &DbPool,
) -> impl actix_web::dev::Service<
    actix_http::Request,
    Response = ServiceResponse,
    Error = actix_web::Error,
> {
    test::init_service(
        App::new()
            .app_data(web::Data::new(pool.clone()))
            .app_data(web::Data::new(WriteKey::new(Some(TEST_API_KEY.to_string()))))
            .service(web::scope("/api/v1").configure(api::configure_api)),
    )
    .await
}

/// GET a JSON endpoint without credentials.
pub async fn get_json<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::get().uri(uri).to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// POST a JSON body with the test write key.
pub async fn post_json<S>(app: &S, uri: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .set_json(body)
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// POST without a body, with the test write key.
pub async fn post_empty<S>(app: &S, uri: &str) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let req = test::TestRequest::post()
        .uri(uri)
        .insert_header((API_KEY_HEADER, TEST_API_KEY))
        .to_request();
    let resp = test::call_service(app, req).await;
    let status = resp.status().as_u16();
    let body: Value = test::read_body_json(resp).await;
    (status, body)
}

/// Create an order and return its detail body.
pub async fn create_order<S>(app: &S, model: &str, tasks: Value) -> Value
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = post_json(
        app,
        "/api/v1/orders",
        json!({
            "customer_id": "CUST-001",
            "model": model,
            "qty_total": 100,
            "tasks": tasks,
        }),
    )
    .await;
    assert_eq!(status, 201, "Failed to create order: {}", body);
    body
}

/// Create a single-task order and return the task id.
pub async fn create_single_task<S>(app: &S, process: &str) -> String
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let order = create_order(app, "Polo Shirt", json!([{ "process": process }])).await;
    order["tasks"][0]["id"]
        .as_str()
        .expect("task id")
        .to_string()
}

/// Start and complete a task so it is ready for inspection.
pub async fn produce_task<S>(app: &S, task_id: &str)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    let (status, body) = post_empty(app, &format!("/api/v1/tasks/{}/start", task_id)).await;
    assert_eq!(status, 200, "Failed to start task: {}", body);

    let (status, body) = post_empty(app, &format!("/api/v1/tasks/{}/complete", task_id)).await;
    assert_eq!(status, 200, "Failed to complete task: {}", body);
    assert_eq!(body["status"], "completed");
}

/// Submit an inspection for a task.
pub async fn submit_inspection<S>(app: &S, task_id: &str, body: Value) -> (u16, Value)
where
    S: actix_web::dev::Service<
            actix_http::Request,
            Response = ServiceResponse,
            Error = actix_web::Error,
        >,
{
    post_json(app, &format!("/api/v1/tasks/{}/inspections", task_id), body).await
}

/// One defect entry of `qty` units.
pub fn defect(defect_type: &str, severity: &str, qty: i64) -> Value {
    json!({
        "defect_type": defect_type,
        "defect_category": "stitching",
        "severity": severity,
        "qty_defect": qty,
    })
}

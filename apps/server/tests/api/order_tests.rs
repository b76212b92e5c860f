//! Order creation, search and task lifecycle.

use actix_web::test;
use atelier_qc_lib::db::orders;
use atelier_qc_lib::entity::order;
use chrono::Utc;
use sea_orm::ActiveValue::Set;
use serde_json::json;
use uuid::Uuid;

use super::helpers::*;

#[actix_rt::test]
async fn test_create_order_with_tasks() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let body = create_order(
        &app,
        "Polo Shirt",
        json!([
            { "process": "cutting" },
            { "process": "sewing", "qty_target": 80 },
            { "process": "packing" },
        ]),
    )
    .await;

    let today = Utc::now().format("%Y%m%d").to_string();
    assert_eq!(
        body["order"]["order_code"],
        format!("ORD-{}-0001", today).as_str()
    );
    assert_eq!(body["order"]["status"], "draft");
    assert_eq!(body["order"]["model"], "Polo Shirt");
    assert_eq!(body["report_ready"], false);

    let tasks = body["tasks"].as_array().unwrap();
    assert_eq!(tasks.len(), 3);
    assert_eq!(tasks[0]["process"], "cutting");
    assert_eq!(tasks[0]["sequence"], 1);
    assert_eq!(tasks[0]["qty_target"], 100);
    assert_eq!(tasks[1]["qty_target"], 80);
    assert_eq!(tasks[2]["sequence"], 3);
    assert!(tasks.iter().all(|t| t["status"] == "pending"));

    let second = create_order(&app, "Cargo Pants", json!([{ "process": "sewing" }])).await;
    assert_eq!(
        second["order"]["order_code"],
        format!("ORD-{}-0002", today).as_str()
    );
}

#[actix_rt::test]
async fn test_order_codes_continue_past_four_digits() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let now = Utc::now();
    let today = now.format("%Y%m%d").to_string();
    for seq in ["9999", "10000"] {
        orders::insert(
            db.pool.connection(),
            order::ActiveModel {
                id: Set(Uuid::now_v7()),
                order_code: Set(format!("ORD-{}-{}", today, seq)),
                customer_id: Set("CUST-001".to_string()),
                product_model: Set("Seeded".to_string()),
                qty_total: Set(10),
                status: Set("draft".to_string()),
                deadline: Set(None),
                notes: Set(None),
                created_at: Set(now),
                updated_at: Set(now),
            },
        )
        .await
        .expect("Failed to seed order");
    }

    let body = create_order(&app, "Polo Shirt", json!([{ "process": "sewing" }])).await;
    assert_eq!(
        body["order"]["order_code"],
        format!("ORD-{}-10001", today).as_str()
    );
}

#[actix_rt::test]
async fn test_create_order_validation() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let cases = [
        json!({ "customer_id": "C1", "model": "Polo", "qty_total": 10, "tasks": [] }),
        json!({ "customer_id": "C1", "model": "Polo", "qty_total": 0, "tasks": [{ "process": "sewing" }] }),
        json!({ "customer_id": "C1", "model": " ", "qty_total": 10, "tasks": [{ "process": "sewing" }] }),
        json!({
            "customer_id": "C1", "model": "Polo", "qty_total": 10,
            "tasks": [{ "process": "sewing" }, { "process": "sewing" }]
        }),
        json!({ "customer_id": "C1", "model": "Polo", "qty_total": 10, "tasks": [{ "process": "dyeing" }] }),
    ];

    for case in cases {
        let (status, body) = post_json(&app, "/api/v1/orders", case.clone()).await;
        assert_eq!(status, 400, "{} -> {}", case, body);
        assert_eq!(body["error"], "INVALID_INPUT");
    }

    let (_, list) = get_json(&app, "/api/v1/orders").await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[actix_rt::test]
async fn test_create_order_requires_api_key() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let req = test::TestRequest::post()
        .uri("/api/v1/orders")
        .set_json(json!({
            "customer_id": "C1", "model": "Polo", "qty_total": 10,
            "tasks": [{ "process": "sewing" }]
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
}

#[actix_rt::test]
async fn test_list_orders_search_and_filter() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let polo = create_order(&app, "Polo Shirt", json!([{ "process": "sewing" }])).await;
    create_order(&app, "Cargo Pants", json!([{ "process": "sewing" }])).await;

    let (status, all) = get_json(&app, "/api/v1/orders").await;
    assert_eq!(status, 200);
    assert_eq!(all["pagination"]["total"], 2);
    // Newest first
    assert_eq!(all["orders"][0]["model"], "Cargo Pants");

    let (_, cargo) = get_json(&app, "/api/v1/orders?search=Cargo").await;
    assert_eq!(cargo["pagination"]["total"], 1);
    assert_eq!(cargo["orders"][0]["model"], "Cargo Pants");

    // Order codes match regardless of case
    let (_, by_code) = get_json(&app, "/api/v1/orders?search=ord-").await;
    assert_eq!(by_code["pagination"]["total"], 2);

    let task_id = polo["tasks"][0]["id"].as_str().unwrap();
    post_empty(&app, &format!("/api/v1/tasks/{}/start", task_id)).await;

    let (_, in_production) = get_json(&app, "/api/v1/orders?status=in_production").await;
    assert_eq!(in_production["pagination"]["total"], 1);
    assert_eq!(in_production["orders"][0]["model"], "Polo Shirt");

    let (_, drafts) = get_json(&app, "/api/v1/orders?status=draft").await;
    assert_eq!(drafts["pagination"]["total"], 1);
}

#[actix_rt::test]
async fn test_task_lifecycle_drives_order_status() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "cutting" }, { "process": "sewing" }]),
    )
    .await;
    let order_uri = format!("/api/v1/orders/{}", order["order"]["id"].as_str().unwrap());
    let cutting = order["tasks"][0]["id"].as_str().unwrap().to_string();
    let sewing = order["tasks"][1]["id"].as_str().unwrap().to_string();

    let (status, started) = post_empty(&app, &format!("/api/v1/tasks/{}/start", cutting)).await;
    assert_eq!(status, 200, "{}", started);
    assert_eq!(started["status"], "in_progress");
    assert!(started["actual_start"].is_string());

    let (_, detail) = get_json(&app, &order_uri).await;
    assert_eq!(detail["order"]["status"], "in_production");

    // Starting twice is rejected
    let (status, body) = post_empty(&app, &format!("/api/v1/tasks/{}/start", cutting)).await;
    assert_eq!(status, 409, "{}", body);

    // Completing a pending task is rejected
    let (status, _) = post_empty(&app, &format!("/api/v1/tasks/{}/complete", sewing)).await;
    assert_eq!(status, 409);

    let (status, completed) = post_json(
        &app,
        &format!("/api/v1/tasks/{}/complete", cutting),
        json!({ "qty_completed": 98, "qty_defect": 2 }),
    )
    .await;
    assert_eq!(status, 200, "{}", completed);
    assert_eq!(completed["qty_completed"], 98);
    assert_eq!(completed["qty_defect"], 2);
    assert_eq!(completed["progress"], 98);
    assert!(completed["actual_end"].is_string());

    let (_, detail) = get_json(&app, &order_uri).await;
    assert_eq!(detail["order"]["status"], "in_production");

    produce_task(&app, &sewing).await;
    let (_, detail) = get_json(&app, &order_uri).await;
    assert_eq!(detail["order"]["status"], "qc_pending");

    // Rework is only for failed inspections
    let (status, _) = post_empty(&app, &format!("/api/v1/tasks/{}/rework", sewing)).await;
    assert_eq!(status, 409);
}

#[actix_rt::test]
async fn test_complete_task_rejects_inconsistent_quantities() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "sewing").await;
    post_empty(&app, &format!("/api/v1/tasks/{}/start", task_id)).await;

    let uri = format!("/api/v1/tasks/{}/complete", task_id);
    let (status, body) = post_json(&app, &uri, json!({ "qty_completed": 5, "qty_defect": 6 })).await;
    assert_eq!(status, 400, "{}", body);

    let (status, _) = post_json(&app, &uri, json!({ "qty_completed": -1 })).await;
    assert_eq!(status, 400);

    let (status, body) = post_json(&app, &uri, json!({ "qty_completed": i64::MAX })).await;
    assert_eq!(status, 400, "{}", body);
    assert_eq!(body["error"], "INVALID_INPUT");

    let (_, task) = get_json(&app, &format!("/api/v1/tasks/{}", task_id)).await;
    assert_eq!(task["task"]["status"], "in_progress");
}

#[actix_rt::test]
async fn test_cancel_order() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(&app, "Hoodie", json!([{ "process": "sablon" }])).await;
    let order_id = order["order"]["id"].as_str().unwrap().to_string();
    let task_id = order["tasks"][0]["id"].as_str().unwrap().to_string();

    let cancel_uri = format!("/api/v1/orders/{}/cancel", order_id);
    let (status, cancelled) = post_empty(&app, &cancel_uri).await;
    assert_eq!(status, 200, "{}", cancelled);
    assert_eq!(cancelled["status"], "cancelled");

    let (status, _) = post_empty(&app, &cancel_uri).await;
    assert_eq!(status, 409);

    let (status, body) = post_empty(&app, &format!("/api/v1/tasks/{}/start", task_id)).await;
    assert_eq!(status, 409, "{}", body);
}

#[actix_rt::test]
async fn test_get_order_errors() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let (status, body) = get_json(&app, "/api/v1/orders/0190f5a2-0000-7000-8000-000000000000").await;
    assert_eq!(status, 404);
    assert_eq!(body["error"], "NOT_FOUND");

    let (status, body) = get_json(&app, "/api/v1/orders/not-a-uuid").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_list_tasks_filters() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let first = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "cutting" }, { "process": "sewing" }]),
    )
    .await;
    create_order(&app, "Cargo Pants", json!([{ "process": "cutting" }])).await;

    let first_id = first["order"]["id"].as_str().unwrap();
    let (_, by_order) = get_json(&app, &format!("/api/v1/tasks?order_id={}", first_id)).await;
    assert_eq!(by_order["pagination"]["total"], 2);
    assert_eq!(by_order["tasks"][0]["process"], "cutting");

    let (_, cutting) = get_json(&app, "/api/v1/tasks?process=cutting").await;
    assert_eq!(cutting["pagination"]["total"], 2);

    let sewing_id = first["tasks"][1]["id"].as_str().unwrap();
    post_empty(&app, &format!("/api/v1/tasks/{}/start", sewing_id)).await;
    let (_, running) = get_json(&app, "/api/v1/tasks?status=in_progress").await;
    assert_eq!(running["pagination"]["total"], 1);
    assert_eq!(running["tasks"][0]["id"], sewing_id);
}

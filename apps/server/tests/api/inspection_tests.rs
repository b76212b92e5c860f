//! Inspection submission, rework cycles and defect tracking.

use actix_web::test;
use sea_orm::ConnectionTrait;
use serde_json::json;

use super::helpers::*;

/// Sequence suffix of a `QC-YYYYMMDD-NNNN` code.
fn code_sequence(code: &str) -> u32 {
    code.rsplit('-').next().unwrap().parse().unwrap()
}

#[actix_rt::test]
async fn test_pass_completes_single_task_order() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(&app, "Polo Shirt", json!([{ "process": "sewing" }])).await;
    let order_id = order["order"]["id"].as_str().unwrap().to_string();
    let task_id = order["tasks"][0]["id"].as_str().unwrap().to_string();
    produce_task(&app, &task_id).await;

    let (status, body) = submit_inspection(
        &app,
        &task_id,
        json!({
            "qty_checked": 100,
            "qty_ng": 2,
            "inspector_id": "EMP-042",
            "defects": [defect("skipped stitch", "minor", 2)],
        }),
    )
    .await;

    assert_eq!(status, 201, "{}", body);
    assert_eq!(body["evaluation"]["result"], "pass");
    assert_eq!(body["evaluation"]["defect_rate"], 0.02);
    assert_eq!(body["evaluation"]["pass_rate"], 0.98);
    assert_eq!(body["task_status"], "inspected_pass");
    assert_eq!(body["sheet"]["result"], "pass");
    assert!(body["sheet"]["inspection_code"]
        .as_str()
        .unwrap()
        .starts_with("QC-"));
    assert_eq!(body["defects"].as_array().unwrap().len(), 1);
    assert!(body["warnings"].as_array().unwrap().is_empty());

    let (_, order) = get_json(&app, &format!("/api/v1/orders/{}", order_id)).await;
    assert_eq!(order["order"]["status"], "completed");
    assert_eq!(order["report_ready"], true);
}

#[actix_rt::test]
async fn test_fail_rework_and_reinspect_appends_history() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(&app, "Polo Shirt", json!([{ "process": "sewing" }])).await;
    let order_id = order["order"]["id"].as_str().unwrap().to_string();
    let task_id = order["tasks"][0]["id"].as_str().unwrap().to_string();
    produce_task(&app, &task_id).await;

    let (status, first) = submit_inspection(
        &app,
        &task_id,
        json!({
            "qty_checked": 100,
            "qty_ng": 5,
            "defects": [defect("stain", "major", 3), defect("hole", "critical", 2)],
        }),
    )
    .await;
    assert_eq!(status, 201, "{}", first);
    assert_eq!(first["evaluation"]["result"], "fail");
    assert_eq!(first["task_status"], "inspected_fail");

    let (_, order) = get_json(&app, &format!("/api/v1/orders/{}", order_id)).await;
    assert_eq!(order["order"]["status"], "qc_pending");
    assert_eq!(order["report_ready"], false);

    // A failed task cannot be inspected again before rework
    let (status, body) =
        submit_inspection(&app, &task_id, json!({ "qty_checked": 100, "qty_ng": 0 })).await;
    assert_eq!(status, 409, "{}", body);

    let (status, body) = post_empty(&app, &format!("/api/v1/tasks/{}/rework", task_id)).await;
    assert_eq!(status, 200, "{}", body);
    assert_eq!(body["status"], "rework");

    let (status, body) = post_empty(&app, &format!("/api/v1/tasks/{}/complete", task_id)).await;
    assert_eq!(status, 200, "{}", body);

    let (status, second) =
        submit_inspection(&app, &task_id, json!({ "qty_checked": 100, "qty_ng": 0 })).await;
    assert_eq!(status, 201, "{}", second);
    assert_eq!(second["evaluation"]["result"], "pass");

    let (status, history) =
        get_json(&app, &format!("/api/v1/tasks/{}/inspections", task_id)).await;
    assert_eq!(status, 200);
    let history = history.as_array().unwrap();
    assert_eq!(history.len(), 2);
    assert_eq!(history[0]["id"], first["sheet"]["id"]);
    assert_eq!(history[0]["result"], "fail");
    assert_eq!(history[0]["qty_ng"], 5);
    assert_eq!(history[1]["result"], "pass");

    let (_, detail) = get_json(
        &app,
        &format!("/api/v1/inspections/{}", first["sheet"]["id"].as_str().unwrap()),
    )
    .await;
    assert_eq!(detail["defects"].as_array().unwrap().len(), 2);
    assert_eq!(detail["has_critical_defect"], true);

    let (_, order) = get_json(&app, &format!("/api/v1/orders/{}", order_id)).await;
    assert_eq!(order["order"]["status"], "completed");
}

#[actix_rt::test]
async fn test_exactly_two_and_a_half_percent_fails() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "cutting").await;
    produce_task(&app, &task_id).await;

    let (status, body) = submit_inspection(
        &app,
        &task_id,
        json!({
            "qty_checked": 40,
            "qty_ng": 1,
            "defects": [defect("uneven cut", "minor", 1)],
        }),
    )
    .await;

    assert_eq!(status, 201, "{}", body);
    assert_eq!(body["evaluation"]["result"], "fail");
    assert_eq!(body["evaluation"]["defect_rate"], 0.025);
}

#[actix_rt::test]
async fn test_invalid_quantities_rejected_without_side_effects() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "sewing").await;
    produce_task(&app, &task_id).await;

    let cases = [
        json!({ "qty_checked": 0, "qty_ng": 0 }),
        json!({ "qty_checked": 10, "qty_ng": 11, "defects": [defect("stain", "minor", 11)] }),
        json!({ "qty_checked": -5, "qty_ng": 0 }),
        json!({ "qty_checked": 10, "qty_ng": -1 }),
        json!({ "qty_checked": i64::MAX - 1, "qty_ng": 0 }),
    ];
    for case in cases {
        let (status, body) = submit_inspection(&app, &task_id, case.clone()).await;
        assert_eq!(status, 400, "{} -> {}", case, body);
        assert_eq!(body["error"], "INVALID_INPUT");
    }

    let (_, list) = get_json(&app, "/api/v1/inspections").await;
    assert_eq!(list["pagination"]["total"], 0);

    let (_, task) = get_json(&app, &format!("/api/v1/tasks/{}", task_id)).await;
    assert_eq!(task["task"]["status"], "completed");
}

#[actix_rt::test]
async fn test_failed_defect_insert_rolls_back_sheet() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "sewing").await;
    produce_task(&app, &task_id).await;

    db.pool
        .connection()
        .execute_unprepared(
            "CREATE TRIGGER reject_defect_logs BEFORE INSERT ON defect_logs \
             BEGIN SELECT RAISE(ABORT, 'defect log rejected'); END;",
        )
        .await
        .expect("Failed to create trigger");

    let inspection = json!({
        "qty_checked": 100,
        "qty_ng": 5,
        "defects": [defect("stain", "major", 5)],
    });
    let (status, body) = submit_inspection(&app, &task_id, inspection.clone()).await;
    assert_eq!(status, 500, "{}", body);
    assert_eq!(body["error"], "DATABASE_ERROR");

    let (_, list) = get_json(&app, "/api/v1/inspections").await;
    assert_eq!(list["pagination"]["total"], 0);
    let (_, defects) = get_json(&app, "/api/v1/defects").await;
    assert_eq!(defects["pagination"]["total"], 0);
    let (_, task) = get_json(&app, &format!("/api/v1/tasks/{}", task_id)).await;
    assert_eq!(task["task"]["status"], "completed");

    db.pool
        .connection()
        .execute_unprepared("DROP TRIGGER reject_defect_logs;")
        .await
        .expect("Failed to drop trigger");

    // The rolled-back sheet did not consume a code
    let (status, body) = submit_inspection(&app, &task_id, inspection).await;
    assert_eq!(status, 201, "{}", body);
    assert_eq!(
        code_sequence(body["sheet"]["inspection_code"].as_str().unwrap()),
        1
    );
    assert_eq!(body["task_status"], "inspected_fail");
}

#[actix_rt::test]
async fn test_failed_status_transition_rolls_back_sheet() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "sewing").await;
    produce_task(&app, &task_id).await;

    db.pool
        .connection()
        .execute_unprepared(
            "CREATE TRIGGER reject_task_update BEFORE UPDATE ON production_tasks \
             BEGIN SELECT RAISE(ABORT, 'task update rejected'); END;",
        )
        .await
        .expect("Failed to create trigger");

    let (status, body) =
        submit_inspection(&app, &task_id, json!({ "qty_checked": 100, "qty_ng": 0 })).await;
    assert_eq!(status, 500, "{}", body);

    let (_, list) = get_json(&app, "/api/v1/inspections").await;
    assert_eq!(list["pagination"]["total"], 0);
    let (_, task) = get_json(&app, &format!("/api/v1/tasks/{}", task_id)).await;
    assert_eq!(task["task"]["status"], "completed");
}

#[actix_rt::test]
async fn test_defect_entries_must_match_rejected_units() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "sewing").await;
    produce_task(&app, &task_id).await;

    // Rejected units without a description
    let (status, body) =
        submit_inspection(&app, &task_id, json!({ "qty_checked": 100, "qty_ng": 3 })).await;
    assert_eq!(status, 400, "{}", body);

    // Defects logged on a clean inspection
    let (status, body) = submit_inspection(
        &app,
        &task_id,
        json!({ "qty_checked": 100, "qty_ng": 0, "defects": [defect("stain", "minor", 1)] }),
    )
    .await;
    assert_eq!(status, 400, "{}", body);

    // Invalid defect entry
    let (status, body) = submit_inspection(
        &app,
        &task_id,
        json!({ "qty_checked": 100, "qty_ng": 3, "defects": [defect("", "minor", 3)] }),
    )
    .await;
    assert_eq!(status, 400, "{}", body);

    let (_, list) = get_json(&app, "/api/v1/inspections").await;
    assert_eq!(list["pagination"]["total"], 0);
    let (_, defects) = get_json(&app, "/api/v1/defects").await;
    assert_eq!(defects["pagination"]["total"], 0);
}

#[actix_rt::test]
async fn test_task_must_be_completed() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "finishing").await;
    let submission = json!({ "qty_checked": 10, "qty_ng": 0 });

    let (status, body) = submit_inspection(&app, &task_id, submission.clone()).await;
    assert_eq!(status, 409, "{}", body);
    assert_eq!(body["error"], "INVALID_STATE");

    post_empty(&app, &format!("/api/v1/tasks/{}/start", task_id)).await;
    let (status, _) = submit_inspection(&app, &task_id, submission.clone()).await;
    assert_eq!(status, 409);

    post_empty(&app, &format!("/api/v1/tasks/{}/complete", task_id)).await;
    let (status, _) = submit_inspection(&app, &task_id, submission.clone()).await;
    assert_eq!(status, 201);

    // Passed tasks stay passed
    let (status, _) = submit_inspection(&app, &task_id, submission).await;
    assert_eq!(status, 409);

    let (_, history) = get_json(&app, &format!("/api/v1/tasks/{}/inspections", task_id)).await;
    assert_eq!(history.as_array().unwrap().len(), 1);
}

#[actix_rt::test]
async fn test_cancelled_order_blocks_inspection() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(&app, "Hoodie", json!([{ "process": "sablon" }])).await;
    let order_id = order["order"]["id"].as_str().unwrap().to_string();
    let task_id = order["tasks"][0]["id"].as_str().unwrap().to_string();
    produce_task(&app, &task_id).await;

    let (status, _) = post_empty(&app, &format!("/api/v1/orders/{}/cancel", order_id)).await;
    assert_eq!(status, 200);

    let (status, body) =
        submit_inspection(&app, &task_id, json!({ "qty_checked": 10, "qty_ng": 0 })).await;
    assert_eq!(status, 409, "{}", body);

    let (_, list) = get_json(&app, "/api/v1/inspections").await;
    assert_eq!(list["pagination"]["total"], 0);
}

#[actix_rt::test]
async fn test_unknown_task_is_not_found() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let (status, body) = submit_inspection(
        &app,
        "0190f5a2-0000-7000-8000-000000000000",
        json!({ "qty_checked": 10, "qty_ng": 0 }),
    )
    .await;
    assert_eq!(status, 404, "{}", body);
    assert_eq!(body["error"], "NOT_FOUND");
}

#[actix_rt::test]
async fn test_writes_require_api_key() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "sewing").await;
    produce_task(&app, &task_id).await;
    let uri = format!("/api/v1/tasks/{}/inspections", task_id);

    let req = test::TestRequest::post()
        .uri(&uri)
        .set_json(json!({ "qty_checked": 10, "qty_ng": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);

    let req = test::TestRequest::post()
        .uri(&uri)
        .insert_header(("X-API-Key", "not-the-key"))
        .set_json(json!({ "qty_checked": 10, "qty_ng": 0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status().as_u16(), 401);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "UNAUTHORIZED");

    // Reads are public
    let (status, history) = get_json(&app, &uri).await;
    assert_eq!(status, 200);
    assert!(history.as_array().unwrap().is_empty());
}

#[actix_rt::test]
async fn test_checking_more_than_target_warns() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "packing", "qty_target": 50 }]),
    )
    .await;
    let task_id = order["tasks"][0]["id"].as_str().unwrap().to_string();
    produce_task(&app, &task_id).await;

    let (status, body) =
        submit_inspection(&app, &task_id, json!({ "qty_checked": 60, "qty_ng": 0 })).await;
    assert_eq!(status, 201, "{}", body);

    let warnings = body["warnings"].as_array().unwrap();
    assert_eq!(warnings.len(), 1);
    assert!(warnings[0].as_str().unwrap().contains("qty_target"));
}

#[actix_rt::test]
async fn test_inspection_codes_follow_daily_sequence() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "cutting" }, { "process": "sewing" }]),
    )
    .await;
    let first_task = order["tasks"][0]["id"].as_str().unwrap().to_string();
    let second_task = order["tasks"][1]["id"].as_str().unwrap().to_string();
    produce_task(&app, &first_task).await;
    produce_task(&app, &second_task).await;

    let clean = json!({ "qty_checked": 100, "qty_ng": 0 });
    let (_, first) = submit_inspection(&app, &first_task, clean.clone()).await;
    let (_, second) = submit_inspection(&app, &second_task, clean).await;

    let first_code = first["sheet"]["inspection_code"].as_str().unwrap();
    let second_code = second["sheet"]["inspection_code"].as_str().unwrap();
    assert_eq!(code_sequence(first_code), 1);
    assert_eq!(code_sequence(second_code), 2);
    assert_eq!(first_code.len(), "QC-20260301-0001".len());
}

#[actix_rt::test]
async fn test_add_and_resolve_defects() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "cutting" }, { "process": "sewing" }]),
    )
    .await;
    let failed_task = order["tasks"][0]["id"].as_str().unwrap().to_string();
    let clean_task = order["tasks"][1]["id"].as_str().unwrap().to_string();
    produce_task(&app, &failed_task).await;
    produce_task(&app, &clean_task).await;

    let (_, failed) = submit_inspection(
        &app,
        &failed_task,
        json!({ "qty_checked": 20, "qty_ng": 4, "defects": [defect("fraying", "major", 4)] }),
    )
    .await;
    let (_, clean) =
        submit_inspection(&app, &clean_task, json!({ "qty_checked": 20, "qty_ng": 0 })).await;

    let failed_sheet = failed["sheet"]["id"].as_str().unwrap();
    let clean_sheet = clean["sheet"]["id"].as_str().unwrap();

    let (status, added) = post_json(
        &app,
        &format!("/api/v1/inspections/{}/defects", failed_sheet),
        defect("loose thread", "minor", 1),
    )
    .await;
    assert_eq!(status, 201, "{}", added);
    assert_eq!(added["is_resolved"], false);

    let (status, body) = post_json(
        &app,
        &format!("/api/v1/inspections/{}/defects", clean_sheet),
        defect("loose thread", "minor", 1),
    )
    .await;
    assert_eq!(status, 400, "{}", body);

    let defect_id = added["id"].as_str().unwrap();
    let resolve_uri = format!("/api/v1/defects/{}/resolve", defect_id);
    let (status, resolved) = post_json(
        &app,
        &resolve_uri,
        json!({ "action_taken": "Re-stitched seam" }),
    )
    .await;
    assert_eq!(status, 200, "{}", resolved);
    assert_eq!(resolved["is_resolved"], true);
    assert_eq!(resolved["action_taken"], "Re-stitched seam");
    assert!(resolved["resolved_at"].is_string());

    let (status, _) = post_json(&app, &resolve_uri, json!({ "action_taken": "again" })).await;
    assert_eq!(status, 409);

    let (_, open) = get_json(&app, "/api/v1/defects?resolved=false").await;
    assert_eq!(open["pagination"]["total"], 1);
    assert_eq!(open["defects"][0]["defect_type"], "fraying");

    let (_, major) = get_json(&app, "/api/v1/defects?severity=major").await;
    assert_eq!(major["pagination"]["total"], 1);
}

#[actix_rt::test]
async fn test_list_inspections_filters_by_result() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "cutting" }, { "process": "sewing" }]),
    )
    .await;
    let order_id = order["order"]["id"].as_str().unwrap().to_string();
    let first_task = order["tasks"][0]["id"].as_str().unwrap().to_string();
    let second_task = order["tasks"][1]["id"].as_str().unwrap().to_string();
    produce_task(&app, &first_task).await;
    produce_task(&app, &second_task).await;

    submit_inspection(&app, &first_task, json!({ "qty_checked": 100, "qty_ng": 0 })).await;
    submit_inspection(
        &app,
        &second_task,
        json!({ "qty_checked": 100, "qty_ng": 10, "defects": [defect("stain", "major", 10)] }),
    )
    .await;

    let (_, fails) = get_json(&app, "/api/v1/inspections?result=fail").await;
    assert_eq!(fails["pagination"]["total"], 1);
    assert_eq!(fails["inspections"][0]["production_task_id"], second_task.as_str());

    let (_, by_order) = get_json(&app, &format!("/api/v1/inspections?order_id={}", order_id)).await;
    assert_eq!(by_order["pagination"]["total"], 2);

    let (_, paged) = get_json(&app, "/api/v1/inspections?limit=1&page=2").await;
    assert_eq!(paged["inspections"].as_array().unwrap().len(), 1);
    assert_eq!(paged["pagination"]["total_pages"], 2);
}

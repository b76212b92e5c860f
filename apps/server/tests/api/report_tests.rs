//! QC dashboard and report endpoints.

use serde_json::json;

use super::helpers::*;

#[actix_rt::test]
async fn test_reports_on_empty_database() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let (status, stats) = get_json(&app, "/api/v1/qc/stats").await;
    assert_eq!(status, 200);
    assert_eq!(stats["inspections"]["total"], 0);
    assert_eq!(stats["defects"]["unresolved"], 0);

    let (status, fpy) = get_json(&app, "/api/v1/qc/fpy").await;
    assert_eq!(status, 200);
    assert_eq!(fpy["fpy_percentage"], 100.0);
    assert_eq!(fpy["total_checked"], 0);

    let (_, pareto) = get_json(&app, "/api/v1/qc/pareto?days=7").await;
    assert_eq!(pareto["total_defects"], 0);
    assert_eq!(pareto["period_days"], 7);
    assert!(pareto["entries"].as_array().unwrap().is_empty());

    let (_, processes) = get_json(&app, "/api/v1/qc/processes").await;
    assert!(processes["processes"].as_array().unwrap().is_empty());
    assert!(processes["best_process"].is_null());
}

#[actix_rt::test]
async fn test_reports_aggregate_inspections() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let order = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "cutting" }, { "process": "sewing" }]),
    )
    .await;
    let cutting = order["tasks"][0]["id"].as_str().unwrap().to_string();
    let sewing = order["tasks"][1]["id"].as_str().unwrap().to_string();
    produce_task(&app, &cutting).await;
    produce_task(&app, &sewing).await;

    submit_inspection(
        &app,
        &cutting,
        json!({ "qty_checked": 100, "qty_ng": 1, "defects": [defect("uneven cut", "minor", 1)] }),
    )
    .await;
    submit_inspection(
        &app,
        &sewing,
        json!({
            "qty_checked": 100,
            "qty_ng": 9,
            "defects": [
                defect("skipped stitch", "major", 6),
                defect("broken seam", "critical", 3),
            ],
        }),
    )
    .await;

    let (_, stats) = get_json(&app, "/api/v1/qc/stats").await;
    assert_eq!(stats["inspections"]["total"], 2);
    assert_eq!(stats["inspections"]["passed"], 1);
    assert_eq!(stats["inspections"]["failed"], 1);
    assert_eq!(stats["defects"]["minor"], 1);
    assert_eq!(stats["defects"]["major"], 1);
    assert_eq!(stats["defects"]["critical"], 1);
    assert_eq!(stats["defects"]["unresolved"], 3);

    let (_, fpy) = get_json(&app, "/api/v1/qc/fpy").await;
    assert_eq!(fpy["total_checked"], 200);
    assert_eq!(fpy["total_failed"], 10);
    assert_eq!(fpy["total_passed"], 190);
    assert_eq!(fpy["fpy_percentage"], 95.0);

    let (_, pareto) = get_json(&app, "/api/v1/qc/pareto").await;
    assert_eq!(pareto["total_defects"], 10);
    assert_eq!(pareto["entries"][0]["defect_type"], "skipped stitch");
    assert_eq!(pareto["entries"][0]["cumulative_percentage"], 60.0);
    assert_eq!(pareto["entries"][2]["cumulative_percentage"], 100.0);

    let (_, processes) = get_json(&app, "/api/v1/qc/processes").await;
    assert_eq!(processes["processes"].as_array().unwrap().len(), 2);
    assert_eq!(processes["best_process"], "cutting");
    assert_eq!(processes["worst_process"], "sewing");
}

#[actix_rt::test]
async fn test_quality_score_trends_and_summary() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let (status, empty) = get_json(&app, "/api/v1/qc/quality-score").await;
    assert_eq!(status, 200);
    assert_eq!(empty["quality_score"], 98.5);
    assert_eq!(empty["grade"], "A");

    let order = create_order(
        &app,
        "Polo Shirt",
        json!([{ "process": "cutting" }, { "process": "sewing" }]),
    )
    .await;
    let cutting = order["tasks"][0]["id"].as_str().unwrap().to_string();
    let sewing = order["tasks"][1]["id"].as_str().unwrap().to_string();
    produce_task(&app, &cutting).await;
    produce_task(&app, &sewing).await;
    submit_inspection(
        &app,
        &cutting,
        json!({ "qty_checked": 100, "qty_ng": 1, "defects": [defect("uneven cut", "minor", 1)] }),
    )
    .await;
    submit_inspection(
        &app,
        &sewing,
        json!({
            "qty_checked": 100,
            "qty_ng": 9,
            "defects": [
                defect("skipped stitch", "major", 6),
                defect("broken seam", "critical", 3),
            ],
        }),
    )
    .await;

    // FPY 95, 5% NG, no defects resolved
    let (_, score) = get_json(&app, "/api/v1/qc/quality-score?days=7").await;
    assert_eq!(score["quality_score"], 61.5);
    assert_eq!(score["grade"], "D");
    assert_eq!(score["status"], "Below Average");
    assert_eq!(score["components"]["ng_score"], 50.0);
    assert_eq!(score["components"]["resolution_score"], 0.0);

    let (status, trends) = get_json(&app, "/api/v1/qc/trends?period=monthly&count=3").await;
    assert_eq!(status, 200, "{}", trends);
    assert_eq!(trends["period"], "monthly");
    let buckets = trends["buckets"].as_array().unwrap();
    assert_eq!(buckets.len(), 3);
    assert_eq!(buckets[0]["inspections"], 0);
    assert_eq!(buckets[2]["inspections"], 2);
    assert_eq!(buckets[2]["total_ng"], 10);
    assert_eq!(buckets[2]["defect_rate_percent"], 5.0);

    let (status, summary) = get_json(&app, "/api/v1/qc/summary?period=month").await;
    assert_eq!(status, 200, "{}", summary);
    assert_eq!(summary["period"], "month");
    assert_eq!(summary["fpy"], 95.0);
    assert_eq!(summary["fpy_change"], -5.0);
    assert_eq!(summary["fpy_trend"], "down");
    assert_eq!(summary["total_defects"], 3);
    assert_eq!(summary["open_defects"], 3);
    assert_eq!(summary["processes"].as_array().unwrap().len(), 2);
    assert_eq!(summary["top_defects"][0]["defect_type"], "skipped stitch");

    let (status, body) = get_json(&app, "/api/v1/qc/summary?period=quarter").await;
    assert_eq!(status, 400);
    assert_eq!(body["error"], "INVALID_INPUT");
}

#[actix_rt::test]
async fn test_reports_survive_rejected_oversized_inspection() {
    let db = create_test_db().await;
    let app = create_test_app(&db.pool).await;

    let task_id = create_single_task(&app, "sewing").await;
    produce_task(&app, &task_id).await;

    let (status, body) = submit_inspection(
        &app,
        &task_id,
        json!({ "qty_checked": i64::MAX - 1, "qty_ng": 1, "defects": [defect("stain", "minor", 1)] }),
    )
    .await;
    assert_eq!(status, 400, "{}", body);

    for uri in ["/api/v1/qc/fpy", "/api/v1/qc/processes", "/api/v1/qc/quality-score"] {
        let (status, body) = get_json(&app, uri).await;
        assert_eq!(status, 200, "{} -> {}", uri, body);
    }
}

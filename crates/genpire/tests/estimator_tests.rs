//! Cost estimation caching and persistence scenarios.

mod common;

use common::harness::TestHarness;

use genpire::api::{estimate_cost, EstimateCostRequest};
use genpire::db::estimate_repo;

fn model_response() -> String {
    serde_json::json!({
        "material_cost_base": 8.0,
        "complexity_level": "low",
        "sample_cost": {"materials": 12.0, "labor": 6.0, "tooling": 10.0, "total": 28.0},
        "production_cost": {"materials": 5.2, "labor": 4.0, "tooling": 5.0, "total": 14.2},
        "lead_times": {"sample_days": 10, "production_days": 35},
        "regional_multipliers": {"china": 1.0, "india": 0.9, "vietnam": 0.95, "usa": 1.7},
        "confidence": "medium"
    })
    .to_string()
}

fn request(entity: &str) -> EstimateCostRequest {
    EstimateCostRequest {
        entity_id: entity.to_string(),
        product_name: "Canvas Tote".to_string(),
        category: "bags".to_string(),
        known_material_cost: None,
        materials: vec!["canvas".to_string(), "leather strap".to_string()],
        hardware: vec!["brass zipper".to_string()],
        dimensions: Some("40x30x12cm".to_string()),
        force_refresh: false,
    }
}

#[tokio::test]
async fn test_identical_requests_make_one_ai_call() {
    let harness = TestHarness::new(vec![&model_response()]);
    let estimator = harness.estimator();

    let first = estimate_cost(&estimator, request("p1")).await;
    let second = estimate_cost(&estimator, request("p1")).await;

    assert!(first.success && second.success);
    assert!(!first.cached);
    assert!(second.cached);
    assert_eq!(harness.completion.call_count(), 1);
    assert_eq!(first.estimate, second.estimate);
}

#[tokio::test]
async fn test_estimate_call_is_deterministic_config() {
    let harness = TestHarness::new(vec![&model_response()]);
    let estimator = harness.estimator();

    estimate_cost(&estimator, request("p1")).await;

    let calls = harness.completion.calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].temperature, 0.0);
    assert!(calls[0].seed.is_some());
    assert!(calls[0].json_response);
    assert!(calls[0].text.contains("Complexity level: low"));
}

#[tokio::test]
async fn test_force_refresh_skips_cache() {
    let harness = TestHarness::new(vec![&model_response(), &model_response()]);
    let estimator = harness.estimator();

    estimate_cost(&estimator, request("p1")).await;
    let mut refresh = request("p1");
    refresh.force_refresh = true;
    let refreshed = estimate_cost(&estimator, refresh).await;

    assert!(refreshed.success);
    assert!(!refreshed.cached);
    assert_eq!(harness.completion.call_count(), 2);
}

#[tokio::test]
async fn test_different_materials_miss_the_cache() {
    let harness = TestHarness::new(vec![&model_response(), &model_response()]);
    let estimator = harness.estimator();

    estimate_cost(&estimator, request("p1")).await;
    let mut other = request("p1");
    other.materials = vec!["denim".to_string()];
    estimate_cost(&estimator, other).await;

    assert_eq!(harness.completion.call_count(), 2);
}

#[tokio::test]
async fn test_estimate_is_persisted() {
    let harness = TestHarness::new(vec![&model_response()]);
    let estimator = harness.estimator();

    let response = estimate_cost(&estimator, request("p1")).await;
    assert!(response.success);

    let stored = estimate_repo::list_for_entity(&harness.db, "p1").unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].model.as_deref(), Some("gpt-4o-mini"));

    // The stored payload decodes back into the returned estimate.
    let decoded: genpire::generator::CostEstimate =
        serde_json::from_str(&stored[0].estimate).unwrap();
    assert_eq!(Some(decoded), response.estimate);
}

#[tokio::test]
async fn test_arithmetic_enforced_over_model_output() {
    let harness = TestHarness::new(vec![&model_response()]);
    let estimator = harness.estimator();

    let response = estimate_cost(&estimator, request("p1")).await;
    let estimate = response.estimate.unwrap();

    // base 8.0: sample materials ×1.5, production materials ×0.65.
    assert_eq!(estimate.material_cost_base, 8.0);
    assert_eq!(estimate.sample_cost.materials, 12.0);
    assert_eq!(estimate.production_cost.materials, 5.2);
    assert_eq!(
        estimate.sample_cost.total,
        estimate.sample_cost.materials + estimate.sample_cost.labor + estimate.sample_cost.tooling
    );
    assert_eq!(estimate.complexity_level, "low");
}

#[tokio::test]
async fn test_unparseable_model_answer_fails_cleanly() {
    let harness = TestHarness::new(vec!["sure! your estimate is roughly $40"]);
    let estimator = harness.estimator();

    let response = estimate_cost(&estimator, request("p1")).await;
    assert!(!response.success);
    assert!(response.estimate.is_none());
    assert!(response.error.unwrap().contains("JSON"));

    // Nothing was stored for the failed attempt.
    assert!(estimate_repo::list_for_entity(&harness.db, "p1").unwrap().is_empty());
}

#[tokio::test]
async fn test_electronics_request_estimates_as_high() {
    let high_response = model_response().replace("\"complexity_level\": \"low\"", "\"complexity_level\": \"high\"");
    let harness = TestHarness::new(vec![&high_response]);
    let estimator = harness.estimator();

    let mut req = request("p1");
    req.hardware = vec!["LED panel".to_string(), "battery".to_string()];
    let response = estimate_cost(&estimator, req).await;

    let estimate = response.estimate.unwrap();
    assert_eq!(estimate.complexity_level, "high");

    let calls = harness.completion.calls.lock().unwrap().clone();
    assert!(calls[0].text.contains("Complexity level: high"));
}

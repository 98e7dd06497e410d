//! Cost-estimation endpoint.

use serde::{Deserialize, Serialize};

use crate::generator::{CostEstimate, CostEstimator, EstimateRequest};

/// Incoming estimation request.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateCostRequest {
    pub entity_id: String,
    pub product_name: String,
    pub category: String,
    #[serde(default)]
    pub known_material_cost: Option<f64>,
    #[serde(default)]
    pub materials: Vec<String>,
    #[serde(default)]
    pub hardware: Vec<String>,
    #[serde(default)]
    pub dimensions: Option<String>,
    #[serde(default)]
    pub force_refresh: bool,
}

/// Uniform estimation response.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EstimateCostResponse {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimate: Option<CostEstimate>,
    pub cached: bool,
}

/// Runs the estimation operation, serving from cache when possible.
pub async fn estimate_cost(
    estimator: &CostEstimator,
    request: EstimateCostRequest,
) -> EstimateCostResponse {
    let outcome = estimator
        .estimate(&EstimateRequest {
            entity_id: request.entity_id,
            product_name: request.product_name,
            category: request.category,
            known_material_cost: request.known_material_cost,
            materials: request.materials,
            hardware: request.hardware,
            dimensions: request.dimensions,
            force_refresh: request.force_refresh,
        })
        .await;

    match outcome {
        Ok(outcome) => EstimateCostResponse {
            success: true,
            error: None,
            estimate: Some(outcome.estimate),
            cached: outcome.cached,
        },
        Err(e) => EstimateCostResponse {
            success: false,
            error: Some(e.to_string()),
            estimate: None,
            cached: false,
        },
    }
}

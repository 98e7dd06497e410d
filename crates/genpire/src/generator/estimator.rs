//! Deterministic, cached manufacturing cost estimation.
//!
//! One JSON-constrained completion at temperature 0 with a fixed seed, so
//! identical inputs reproduce and the fingerprint cache is meaningful.
//! The multiplier arithmetic is recomputed here from the model's stated
//! material base rather than trusted from its output.

use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;

use chrono::Utc;
use moka::sync::Cache;
use serde::{Deserialize, Serialize};
use tracing::{info_span, Instrument};
use uuid::Uuid;

use crate::ai::{CompletionClient, CompletionOptions};
use crate::db::estimate_repo::{self, EstimateRow};
use crate::db::Database;

use super::complexity::{self, ComplexityLevel};
use super::error::GeneratorError;
use super::fingerprint::materials_fingerprint;
use super::prompt;

const ESTIMATE_SCHEMA: &str = include_str!("estimate_schema.json");

/// Markup on the material base for a one-off sample unit.
const SAMPLE_MARKUP: f64 = 1.5;
/// Per-unit discount on the material base at 1000-unit volume.
const PRODUCTION_DISCOUNT: f64 = 0.65;

/// Fixed sampling seed; pairs with temperature 0.
const ESTIMATE_SEED: u64 = 7151;

/// Input for one estimation request.
#[derive(Debug, Clone)]
pub struct EstimateRequest {
    pub entity_id: String,
    pub product_name: String,
    pub category: String,
    /// Known total material cost per unit, when the caller has one.
    pub known_material_cost: Option<f64>,
    pub materials: Vec<String>,
    pub hardware: Vec<String>,
    pub dimensions: Option<String>,
    /// Skip the cache-read branch and regenerate.
    pub force_refresh: bool,
}

/// One cost breakdown (sample or production).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostBreakdown {
    pub materials: f64,
    pub labor: f64,
    pub tooling: f64,
    pub total: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeadTimes {
    pub sample_days: u32,
    pub production_days: u32,
}

/// The structured estimate, as stored and returned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub material_cost_base: f64,
    pub complexity_level: String,
    pub sample_cost: CostBreakdown,
    pub production_cost: CostBreakdown,
    pub lead_times: LeadTimes,
    pub regional_multipliers: BTreeMap<String, f64>,
    pub confidence: String,
}

/// An estimate plus where it came from.
#[derive(Debug, Clone)]
pub struct EstimateOutcome {
    pub estimate: CostEstimate,
    pub fingerprint: String,
    /// True when no AI call was made.
    pub cached: bool,
}

/// Cached, persistent estimator over the completion provider.
pub struct CostEstimator {
    completion: Arc<dyn CompletionClient>,
    db: Database,
    model: String,
    hot: Cache<(String, String), Arc<CostEstimate>>,
}

impl CostEstimator {
    pub fn new(completion: Arc<dyn CompletionClient>, db: Database, model: &str) -> Self {
        Self {
            completion,
            db,
            model: model.to_string(),
            hot: Cache::builder()
                .max_capacity(1024)
                .time_to_live(Duration::from_secs(3600))
                .build(),
        }
    }

    /// Returns a cached estimate when one exists for (entity, fingerprint),
    /// otherwise generates, persists, and prunes.
    pub async fn estimate(
        &self,
        request: &EstimateRequest,
    ) -> Result<EstimateOutcome, GeneratorError> {
        let fingerprint = materials_fingerprint(&request.materials);
        let span = info_span!("cost_estimate",
            entity_id = %request.entity_id,
            fingerprint = %fingerprint,
            force_refresh = request.force_refresh,
        );
        self.estimate_inner(request, fingerprint).instrument(span).await
    }

    async fn estimate_inner(
        &self,
        request: &EstimateRequest,
        fingerprint: String,
    ) -> Result<EstimateOutcome, GeneratorError> {
        let key = (request.entity_id.clone(), fingerprint.clone());

        if !request.force_refresh {
            if let Some(hit) = self.hot.get(&key) {
                return Ok(EstimateOutcome {
                    estimate: (*hit).clone(),
                    fingerprint,
                    cached: true,
                });
            }
            if let Some(row) =
                estimate_repo::find_latest(&self.db, &request.entity_id, &fingerprint)?
            {
                match serde_json::from_str::<CostEstimate>(&row.estimate) {
                    Ok(estimate) => {
                        self.hot.insert(key, Arc::new(estimate.clone()));
                        return Ok(EstimateOutcome {
                            estimate,
                            fingerprint,
                            cached: true,
                        });
                    }
                    Err(e) => {
                        // A stored row that no longer decodes is a miss.
                        log::warn!("Discarding corrupt stored estimate {}: {}", row.id, e);
                    }
                }
            }
        }

        let level = complexity::derive(
            &request.category,
            request
                .materials
                .iter()
                .chain(request.hardware.iter())
                .map(String::as_str),
        );

        let raw = self
            .completion
            .complete(
                &prompt::estimate_messages(request, level),
                &CompletionOptions {
                    model: self.model.clone(),
                    max_tokens: 900,
                    temperature: 0.0,
                    seed: Some(ESTIMATE_SEED),
                    json_response: true,
                },
            )
            .await
            .map_err(GeneratorError::Estimation)?;

        let mut estimate = parse_estimate(&raw)?;
        enforce_arithmetic(&mut estimate, request.known_material_cost, level);

        self.persist(request, &fingerprint, &estimate);
        self.hot.insert(key, Arc::new(estimate.clone()));

        Ok(EstimateOutcome {
            estimate,
            fingerprint,
            cached: false,
        })
    }

    /// Stores the estimate and prunes old rows. Both are denormalization
    /// writes: failures are logged, never surfaced.
    fn persist(&self, request: &EstimateRequest, fingerprint: &str, estimate: &CostEstimate) {
        let payload = match serde_json::to_string(estimate) {
            Ok(json) => json,
            Err(e) => {
                log::warn!("Failed to serialize estimate for storage: {}", e);
                return;
            }
        };

        let row = EstimateRow {
            id: Uuid::new_v4().to_string(),
            entity_id: request.entity_id.clone(),
            fingerprint: fingerprint.to_string(),
            estimate: payload,
            model: Some(self.model.clone()),
            created_at: Utc::now().to_rfc3339(),
        };

        if let Err(e) = estimate_repo::insert(&self.db, &row) {
            log::warn!("Failed to store estimate for {}: {}", request.entity_id, e);
            return;
        }
        if let Err(e) = estimate_repo::prune(&self.db, &request.entity_id) {
            log::warn!("Failed to prune estimates for {}: {}", request.entity_id, e);
        }
    }
}

/// Parses and schema-validates the model's JSON answer.
fn parse_estimate(raw: &str) -> Result<CostEstimate, GeneratorError> {
    let value: serde_json::Value = serde_json::from_str(raw.trim())
        .map_err(|e| GeneratorError::EstimateParse(e.to_string()))?;

    let schema: serde_json::Value =
        serde_json::from_str(ESTIMATE_SCHEMA).map_err(|e| GeneratorError::EstimateSchema(e.to_string()))?;
    let validator = jsonschema::validator_for(&schema)
        .map_err(|e| GeneratorError::EstimateSchema(e.to_string()))?;

    let errors: Vec<String> = validator
        .iter_errors(&value)
        .map(|e| format!("{} at {}", e, e.instance_path()))
        .collect();
    if !errors.is_empty() {
        return Err(GeneratorError::EstimateSchema(errors.join("; ")));
    }

    serde_json::from_value(value).map_err(|e| GeneratorError::EstimateParse(e.to_string()))
}

/// Per-sample labor band in dollars for a complexity level.
fn labor_band(level: ComplexityLevel) -> (f64, f64) {
    match level {
        ComplexityLevel::Low => (2.0, 10.0),
        ComplexityLevel::Medium => (10.0, 30.0),
        ComplexityLevel::High => (30.0, 90.0),
    }
}

/// Tooling band in dollars for a complexity level.
fn tooling_band(level: ComplexityLevel) -> (f64, f64) {
    match level {
        ComplexityLevel::Low => (0.0, 50.0),
        ComplexityLevel::Medium => (50.0, 500.0),
        ComplexityLevel::High => (500.0, 5000.0),
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

fn clamp(v: f64, lo: f64, hi: f64) -> f64 {
    v.max(lo).min(hi)
}

/// Recomputes the fixed-multiplier arithmetic from the material base and
/// clamps labor/tooling into the complexity band. The model's own totals
/// are discarded.
fn enforce_arithmetic(
    estimate: &mut CostEstimate,
    known_material_cost: Option<f64>,
    level: ComplexityLevel,
) {
    if let Some(known) = known_material_cost {
        estimate.material_cost_base = known;
    }
    let base = estimate.material_cost_base.max(0.0);
    estimate.material_cost_base = round2(base);
    estimate.complexity_level = level.as_str().to_string();

    let (labor_lo, labor_hi) = labor_band(level);
    let (tooling_lo, tooling_hi) = tooling_band(level);

    estimate.sample_cost.materials = round2(base * SAMPLE_MARKUP);
    estimate.sample_cost.labor = round2(clamp(estimate.sample_cost.labor, labor_lo, labor_hi));
    estimate.sample_cost.tooling =
        round2(clamp(estimate.sample_cost.tooling, tooling_lo, tooling_hi));
    estimate.sample_cost.total = round2(
        estimate.sample_cost.materials + estimate.sample_cost.labor + estimate.sample_cost.tooling,
    );

    estimate.production_cost.materials = round2(base * PRODUCTION_DISCOUNT);
    estimate.production_cost.labor =
        round2(clamp(estimate.production_cost.labor, labor_lo, labor_hi));
    estimate.production_cost.tooling =
        round2(clamp(estimate.production_cost.tooling, tooling_lo, tooling_hi));
    estimate.production_cost.total = round2(
        estimate.production_cost.materials
            + estimate.production_cost.labor
            + estimate.production_cost.tooling,
    );
}

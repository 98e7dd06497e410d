//! Thin request/response boundary over the services.
//!
//! Handlers translate service results into the uniform
//! `{success, error?, ...}` shape. Transport (HTTP framework, routing,
//! auth) belongs to the embedding application.

pub mod edit;
pub mod estimate;
pub mod history;
pub mod webhook;

pub use edit::{edit_views, EditViewsRequest, EditViewsResponse};
pub use estimate::{estimate_cost, EstimateCostRequest, EstimateCostResponse};
pub use history::{revision_history, HistoryResponse};
pub use webhook::receive_model_webhook;

//! Summary report and bulk closure

use alert_registry::AlertSummary;
use axum::{
    extract::{rejection::JsonRejection, State},
    Json,
};

use super::{actor_or_system, lifecycle::CloseRequest, optional_body, Envelope};
use crate::{ApiError, SharedState};

/// Point-in-time summary over all alerts
pub async fn summary(
    State(state): State<SharedState>,
) -> Result<Json<Envelope<AlertSummary>>, ApiError> {
    let summary = state.registry.summary().map_err(|e| state.fault(e))?;
    Ok(Json(Envelope::data(summary)))
}

/// Close every remediated or false-positive alert
pub async fn close_resolved(
    State(state): State<SharedState>,
    body: Result<Json<CloseRequest>, JsonRejection>,
) -> Result<Json<Envelope<()>>, ApiError> {
    let request = optional_body(body)?;
    let closed_by = actor_or_system(request.closed_by);
    let count = state
        .registry
        .close_resolved(&closed_by)
        .map_err(|e| state.fault(e))?;
    Ok(Json(
        Envelope::message(format!("{} resolved alerts closed", count)).with_count(count),
    ))
}

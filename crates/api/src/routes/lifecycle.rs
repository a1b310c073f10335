//! Alert lifecycle actions: validate, gather logs, screen, investigate,
//! remediate, escalate, close.

use alert_registry::Alert;
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::{Deserialize, Serialize};

use super::{actor_or_system, optional_body, required_body, Envelope};
use crate::{ApiError, AppState, SharedState};

#[derive(Debug, Default, Deserialize)]
pub struct InvestigateRequest {
    pub investigated_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct RemediateRequest {
    pub remediation_type: Option<String>,
    pub notes: Option<String>,
    pub remediated_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct EscalateRequest {
    pub escalation_notes: Option<String>,
    pub recommended_next_steps: Option<String>,
    pub escalated_by: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CloseRequest {
    pub closed_by: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ValidateResponse {
    pub success: bool,
    pub is_valid: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct FalsePositiveResponse {
    pub success: bool,
    pub is_false_positive: bool,
    pub reason: String,
    pub data: Alert,
}

/// Current snapshot, or 404
fn existing(state: &AppState, id: u64) -> Result<Alert, ApiError> {
    state
        .registry
        .get(id)
        .map_err(|e| state.fault(e))?
        .ok_or(ApiError::NotFound)
}

pub async fn validate_alert(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<ValidateResponse>, ApiError> {
    existing(&state, id)?;
    let verdict = state.registry.validate(id).map_err(|e| state.fault(e))?;
    Ok(Json(ValidateResponse {
        success: true,
        is_valid: verdict.ok,
        message: verdict.message,
    }))
}

pub async fn gather_logs(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    body: Result<Json<Vec<String>>, JsonRejection>,
) -> Result<Json<Envelope<Alert>>, ApiError> {
    existing(&state, id)?;
    let logs = optional_body(body)?;
    let alert = state
        .registry
        .gather_context(id, logs.as_slice())
        .map_err(|e| state.fault(e))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(
        Envelope::data(alert).with_message("Logs gathered successfully"),
    ))
}

pub async fn check_false_positive(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<FalsePositiveResponse>, ApiError> {
    existing(&state, id)?;
    let verdict = state
        .registry
        .check_false_positive(id)
        .map_err(|e| state.fault(e))?;
    Ok(Json(FalsePositiveResponse {
        success: true,
        is_false_positive: verdict.ok,
        reason: verdict.message,
        data: existing(&state, id)?,
    }))
}

pub async fn investigate_alert(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    body: Result<Json<InvestigateRequest>, JsonRejection>,
) -> Result<Json<Envelope<Alert>>, ApiError> {
    existing(&state, id)?;
    let request = optional_body(body)?;
    let investigated_by = actor_or_system(request.investigated_by);
    let alert = state
        .registry
        .investigate(id, &investigated_by)
        .map_err(|e| state.fault(e))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(
        Envelope::data(alert).with_message("Alert investigation started"),
    ))
}

pub async fn remediate_alert(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    body: Result<Json<RemediateRequest>, JsonRejection>,
) -> Result<Json<Envelope<Alert>>, ApiError> {
    existing(&state, id)?;
    let request = required_body(body, "Remediation type is required")?;

    let remediation_type = request
        .remediation_type
        .filter(|t| !t.trim().is_empty())
        .ok_or_else(|| ApiError::bad_request("Remediation type is required"))?;
    let notes = request.notes.unwrap_or_default();
    let remediated_by = actor_or_system(request.remediated_by);

    let verdict = state
        .registry
        .remediate(id, &remediation_type, &notes, &remediated_by)
        .map_err(|e| state.fault(e))?;
    if !verdict.ok {
        return Err(ApiError::BadRequest(verdict.message));
    }

    Ok(Json(
        Envelope::data(existing(&state, id)?).with_message(verdict.message),
    ))
}

pub async fn escalate_alert(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    body: Result<Json<EscalateRequest>, JsonRejection>,
) -> Result<Json<Envelope<Alert>>, ApiError> {
    existing(&state, id)?;
    let request = optional_body(body)?;
    let notes = request
        .escalation_notes
        .unwrap_or_else(|| "Requires security team review".to_string());
    let next_steps = request
        .recommended_next_steps
        .unwrap_or_else(|| "Further investigation needed".to_string());
    let escalated_by = actor_or_system(request.escalated_by);

    let alert = state
        .registry
        .escalate(id, &notes, &next_steps, &escalated_by)
        .map_err(|e| state.fault(e))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(
        Envelope::data(alert).with_message("Alert escalated to security team"),
    ))
}

pub async fn close_alert(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
    body: Result<Json<CloseRequest>, JsonRejection>,
) -> Result<Json<Envelope<Alert>>, ApiError> {
    existing(&state, id)?;
    let request = optional_body(body)?;
    let closed_by = actor_or_system(request.closed_by);
    let alert = state
        .registry
        .close(id, &closed_by)
        .map_err(|e| state.fault(e))?
        .ok_or(ApiError::NotFound)?;
    Ok(Json(
        Envelope::data(alert).with_message("Alert closed successfully"),
    ))
}

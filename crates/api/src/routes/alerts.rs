//! Alert Routes

use alert_registry::{Alert, NewAlert, ParseSeverityError, Severity};
use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use serde::Deserialize;
use tracing::debug;

use super::{required_body, Envelope};
use crate::{ApiError, SharedState};

/// Body for raising an alert
#[derive(Debug, Default, Deserialize)]
pub struct CreateAlertRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub severity: Option<SeverityField>,
    pub source: Option<String>,
    pub affected_endpoint: Option<String>,
    pub affected_user: Option<String>,
}

/// Severity as sent by the client: a level name or its numeric code
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum SeverityField {
    Name(String),
    Code(i64),
}

impl SeverityField {
    fn is_blank(&self) -> bool {
        matches!(self, SeverityField::Name(name) if name.trim().is_empty())
    }

    fn parse(self) -> Result<Severity, ApiError> {
        let invalid = |e: ParseSeverityError| ApiError::bad_request(e.to_string());
        match self {
            SeverityField::Name(name) => name.parse::<Severity>().map_err(invalid),
            SeverityField::Code(code) => u8::try_from(code)
                .ok()
                .and_then(Severity::from_code)
                .ok_or_else(|| {
                    invalid(ParseSeverityError {
                        input: code.to_string(),
                    })
                }),
        }
    }
}

fn required(field: Option<String>) -> Option<String> {
    field.filter(|v| !v.trim().is_empty())
}

impl CreateAlertRequest {
    /// Check required fields and parse the severity
    pub fn into_new_alert(self) -> Result<NewAlert, ApiError> {
        let (Some(title), Some(description), Some(severity), Some(source)) = (
            required(self.title),
            required(self.description),
            self.severity.filter(|s| !s.is_blank()),
            required(self.source),
        ) else {
            return Err(ApiError::bad_request(
                "Title, description, severity, and source are required",
            ));
        };

        let severity = severity.parse()?;

        Ok(NewAlert {
            title,
            description,
            severity,
            source,
            affected_endpoint: self.affected_endpoint,
            affected_user: self.affected_user,
        })
    }
}

/// List every alert
pub async fn list_alerts(
    State(state): State<SharedState>,
) -> Result<Json<Envelope<Vec<Alert>>>, ApiError> {
    let alerts = state.registry.all().map_err(|e| state.fault(e))?;
    let count = alerts.len();
    Ok(Json(Envelope::data(alerts).with_count(count)))
}

/// List alerts that are not closed or false positives
pub async fn active_alerts(
    State(state): State<SharedState>,
) -> Result<Json<Envelope<Vec<Alert>>>, ApiError> {
    let alerts = state.registry.active().map_err(|e| state.fault(e))?;
    let count = alerts.len();
    Ok(Json(Envelope::data(alerts).with_count(count)))
}

/// Fetch one alert
pub async fn get_alert(
    State(state): State<SharedState>,
    Path(id): Path<u64>,
) -> Result<Json<Envelope<Alert>>, ApiError> {
    let alert = state
        .registry
        .get(id)
        .map_err(|e| state.fault(e))?
        .ok_or(ApiError::NotFound)?;
    debug!(alert_id = id, "Alert fetched");
    Ok(Json(Envelope::data(alert)))
}

/// Raise a new alert
pub async fn create_alert(
    State(state): State<SharedState>,
    body: Result<Json<CreateAlertRequest>, JsonRejection>,
) -> Result<Json<Envelope<Alert>>, ApiError> {
    let new = required_body(body, "Alert data is required")?.into_new_alert()?;
    let alert = state.registry.create(new).map_err(|e| state.fault(e))?;
    Ok(Json(
        Envelope::data(alert).with_message("Alert created successfully"),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn full_request() -> CreateAlertRequest {
        CreateAlertRequest {
            title: Some("Suspicious Login".into()),
            description: Some("Failed logins from 192.168.1.100".into()),
            severity: Some(SeverityField::Name("high".into())),
            source: Some("SIEM".into()),
            affected_endpoint: Some("DESKTOP-123".into()),
            affected_user: None,
        }
    }

    #[test]
    fn test_into_new_alert() {
        let new = full_request().into_new_alert().unwrap();
        assert_eq!(new.severity, Severity::High);
        assert_eq!(new.affected_endpoint.as_deref(), Some("DESKTOP-123"));
        assert!(new.affected_user.is_none());
    }

    #[test]
    fn test_missing_fields_rejected() {
        let request = CreateAlertRequest {
            source: Some("  ".into()),
            ..full_request()
        };
        let err = request.into_new_alert().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Title, description, severity, and source are required"
        );

        let err = CreateAlertRequest::default().into_new_alert().unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn test_bad_severity_rejected() {
        let request = CreateAlertRequest {
            severity: Some(SeverityField::Name("apocalyptic".into())),
            ..full_request()
        };
        let err = request.into_new_alert().unwrap_err();
        assert_eq!(err.to_string(), "Invalid severity level");

        for code in [0, 6, -1, 300] {
            let request = CreateAlertRequest {
                severity: Some(SeverityField::Code(code)),
                ..full_request()
            };
            let err = request.into_new_alert().unwrap_err();
            assert_eq!(err.to_string(), "Invalid severity level", "code {code}");
        }
    }

    #[test]
    fn test_numeric_severity() {
        let request = CreateAlertRequest {
            severity: Some(SeverityField::Code(3)),
            ..full_request()
        };
        assert_eq!(request.into_new_alert().unwrap().severity, Severity::Medium);

        let blank = CreateAlertRequest {
            severity: Some(SeverityField::Name("  ".into())),
            ..full_request()
        };
        assert_eq!(
            blank.into_new_alert().unwrap_err().to_string(),
            "Title, description, severity, and source are required"
        );
    }
}

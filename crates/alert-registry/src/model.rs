//! Alert data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Alert severity
///
/// Declared lowest first so the derived ordering puts `Critical` on top.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Severity {
    Informational,
    Low,
    Medium,
    High,
    Critical,
}

impl Severity {
    /// All severities, most urgent first
    pub const ALL: [Severity; 5] = [
        Severity::Critical,
        Severity::High,
        Severity::Medium,
        Severity::Low,
        Severity::Informational,
    ];

    /// Ordinal code (Critical = 1 .. Informational = 5)
    pub fn code(self) -> u8 {
        match self {
            Severity::Critical => 1,
            Severity::High => 2,
            Severity::Medium => 3,
            Severity::Low => 4,
            Severity::Informational => 5,
        }
    }

    /// Look up a severity by its ordinal code
    pub fn from_code(code: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.code() == code)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Critical => "Critical",
            Severity::High => "High",
            Severity::Medium => "Medium",
            Severity::Low => "Low",
            Severity::Informational => "Informational",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected severity text
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid severity level")]
pub struct ParseSeverityError {
    pub input: String,
}

impl FromStr for Severity {
    type Err = ParseSeverityError;

    /// Accepts variant names in any case, or the ordinal codes 1-5.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        if let Ok(code) = trimmed.parse::<u8>() {
            return Severity::from_code(code).ok_or_else(|| ParseSeverityError {
                input: s.to_string(),
            });
        }

        Severity::ALL
            .into_iter()
            .find(|sev| sev.as_str().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| ParseSeverityError {
                input: s.to_string(),
            })
    }
}

/// Lifecycle status of an alert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AlertStatus {
    New,
    InProgress,
    Remediated,
    Escalated,
    Closed,
    FalsePositive,
}

impl AlertStatus {
    pub const ALL: [AlertStatus; 6] = [
        AlertStatus::New,
        AlertStatus::InProgress,
        AlertStatus::Remediated,
        AlertStatus::Escalated,
        AlertStatus::Closed,
        AlertStatus::FalsePositive,
    ];

    /// Ordinal code (New = 1 .. FalsePositive = 6)
    pub fn code(self) -> u8 {
        match self {
            AlertStatus::New => 1,
            AlertStatus::InProgress => 2,
            AlertStatus::Remediated => 3,
            AlertStatus::Escalated => 4,
            AlertStatus::Closed => 5,
            AlertStatus::FalsePositive => 6,
        }
    }

    /// Still needs attention
    pub fn is_active(self) -> bool {
        !matches!(self, AlertStatus::Closed | AlertStatus::FalsePositive)
    }

    /// Investigation may (re)start from here
    pub fn can_investigate(self) -> bool {
        matches!(self, AlertStatus::New | AlertStatus::Escalated)
    }

    /// Ready to be closed
    pub fn is_resolved(self) -> bool {
        matches!(self, AlertStatus::Remediated | AlertStatus::FalsePositive)
    }
}

impl fmt::Display for AlertStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AlertStatus::New => "New",
            AlertStatus::InProgress => "InProgress",
            AlertStatus::Remediated => "Remediated",
            AlertStatus::Escalated => "Escalated",
            AlertStatus::Closed => "Closed",
            AlertStatus::FalsePositive => "FalsePositive",
        };
        f.write_str(name)
    }
}

/// Fields supplied when an alert is raised
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewAlert {
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub source: String,
    pub affected_endpoint: Option<String>,
    pub affected_user: Option<String>,
}

impl NewAlert {
    pub fn new(
        title: impl Into<String>,
        description: impl Into<String>,
        severity: Severity,
        source: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            severity,
            source: source.into(),
            affected_endpoint: None,
            affected_user: None,
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.affected_endpoint = Some(endpoint.into());
        self
    }

    pub fn with_user(mut self, user: impl Into<String>) -> Self {
        self.affected_user = Some(user.into());
        self
    }
}

/// A tracked security incident
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: u64,
    /// Human-readable code, `SEC-yyyyMMdd-NNNNNN`
    pub alert_code: String,
    pub title: String,
    pub description: String,
    pub severity: Severity,
    pub source: String,
    pub status: AlertStatus,
    pub detected_at: DateTime<Utc>,
    pub investigated_at: Option<DateTime<Utc>>,
    pub resolved_at: Option<DateTime<Utc>>,
    pub affected_endpoint: Option<String>,
    pub affected_user: Option<String>,
    pub related_logs: Vec<String>,
    pub is_false_positive: bool,
    pub remediation_action: Option<String>,
    pub escalation_notes: Option<String>,
    pub investigated_by: Option<String>,
}

impl Alert {
    pub(crate) fn raise(id: u64, new: NewAlert, now: DateTime<Utc>) -> Self {
        Self {
            id,
            alert_code: alert_code(id, now),
            title: new.title,
            description: new.description,
            severity: new.severity,
            source: new.source,
            status: AlertStatus::New,
            detected_at: now,
            investigated_at: None,
            resolved_at: None,
            affected_endpoint: new.affected_endpoint,
            affected_user: new.affected_user,
            related_logs: Vec::new(),
            is_false_positive: false,
            remediation_action: None,
            escalation_notes: None,
            investigated_by: None,
        }
    }
}

/// Format the human-readable alert code
pub fn alert_code(id: u64, detected_at: DateTime<Utc>) -> String {
    format!("SEC-{}-{:06}", detected_at.format("%Y%m%d"), id)
}

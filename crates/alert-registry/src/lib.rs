//! Security Alert Registry
//!
//! In-memory lifecycle tracking for security alerts: validation, context
//! gathering, false-positive screening, investigation, simulated
//! remediation, escalation, closure and summary reporting.

mod false_positive;
mod model;
mod registry;
mod remediation;
mod summary;

pub use false_positive::{matching_indicator, FALSE_POSITIVE_INDICATORS};
pub use model::{alert_code, Alert, AlertStatus, NewAlert, ParseSeverityError, Severity};
pub use registry::{
    AlertRegistry, Verdict, MAX_LOGS_PER_GATHER, MSG_FALSE_POSITIVE, MSG_LEGITIMATE,
    MSG_NOT_FOUND, MSG_SOURCE_MISSING, MSG_VALIDATED,
};
pub use remediation::{
    BlockIp, DisableAccount, IsolateEndpoint, PatchVulnerability, RemediationError, Remediator,
    RemediatorTable, RevokeCredentials,
};
pub use summary::AlertSummary;

use thiserror::Error;

/// Registry faults; business outcomes are reported as values, not errors
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Registry lock poisoned: {0}")]
    LockPoisoned(String),
}

//! Alert Registry Implementation
//!
//! Every operation takes the same mutex over the record collection, the id
//! counter and the remediation table, so operations are linearizable and no
//! caller ever sees a half-applied transition. Reads hand out clones.

use crate::false_positive::matching_indicator;
use crate::model::{Alert, AlertStatus, NewAlert};
use crate::remediation::{RemediationError, Remediator, RemediatorTable};
use crate::summary::AlertSummary;
use crate::RegistryError;
use chrono::Utc;
use metrics::counter;
use serde::Serialize;
use std::sync::{Mutex, MutexGuard};
use tracing::{debug, info, warn};

/// Most log lines accepted by a single gather call
pub const MAX_LOGS_PER_GATHER: usize = 100;

pub const MSG_NOT_FOUND: &str = "Alert not found";
pub const MSG_VALIDATED: &str = "Alert validated successfully";
pub const MSG_SOURCE_MISSING: &str = "Alert source is missing";
pub const MSG_FALSE_POSITIVE: &str = "Alert marked as false positive based on context analysis";
pub const MSG_LEGITIMATE: &str = "Alert appears to be legitimate";

/// Boolean outcome with a caller-facing message
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Verdict {
    pub ok: bool,
    pub message: String,
}

impl Verdict {
    pub fn pass(message: impl Into<String>) -> Self {
        Self {
            ok: true,
            message: message.into(),
        }
    }

    pub fn fail(message: impl Into<String>) -> Self {
        Self {
            ok: false,
            message: message.into(),
        }
    }
}

struct Inner {
    alerts: Vec<Alert>,
    next_id: u64,
    remediators: RemediatorTable,
}

impl Inner {
    fn find(&self, id: u64) -> Option<&Alert> {
        self.alerts.iter().find(|a| a.id == id)
    }

    fn find_mut(&mut self, id: u64) -> Option<&mut Alert> {
        self.alerts.iter_mut().find(|a| a.id == id)
    }
}

/// In-memory store of security alerts
pub struct AlertRegistry {
    inner: Mutex<Inner>,
}

impl AlertRegistry {
    /// Create an empty registry with the built-in remediation effectors
    pub fn new() -> Self {
        Self::with_remediators(RemediatorTable::default())
    }

    /// Create an empty registry with a custom remediation table
    pub fn with_remediators(remediators: RemediatorTable) -> Self {
        info!(
            "Creating alert registry with remediators: {:?}",
            remediators.names()
        );
        Self {
            inner: Mutex::new(Inner {
                alerts: Vec::new(),
                next_id: 1,
                remediators,
            }),
        }
    }

    fn lock(&self) -> Result<MutexGuard<'_, Inner>, RegistryError> {
        self.inner
            .lock()
            .map_err(|e| RegistryError::LockPoisoned(e.to_string()))
    }

    /// Install or replace a remediation effector
    pub fn register_remediator(&self, remediator: Box<dyn Remediator>) -> Result<(), RegistryError> {
        let mut inner = self.lock()?;
        info!("Registering remediator {}", remediator.name());
        inner.remediators.register(remediator);
        Ok(())
    }

    /// Record a new alert
    pub fn create(&self, new: NewAlert) -> Result<Alert, RegistryError> {
        let mut inner = self.lock()?;

        let id = inner.next_id;
        inner.next_id += 1;

        let alert = Alert::raise(id, new, Utc::now());
        inner.alerts.push(alert.clone());

        counter!("alerts_created_total").increment(1);
        info!(
            alert_id = id,
            code = %alert.alert_code,
            severity = %alert.severity,
            source = %alert.source,
            "Alert created"
        );
        Ok(alert)
    }

    /// Snapshot of one alert
    pub fn get(&self, id: u64) -> Result<Option<Alert>, RegistryError> {
        let inner = self.lock()?;
        Ok(inner.find(id).cloned())
    }

    /// Snapshot of every alert in creation order
    pub fn all(&self) -> Result<Vec<Alert>, RegistryError> {
        let inner = self.lock()?;
        Ok(inner.alerts.clone())
    }

    /// Snapshot of alerts that are neither closed nor false positives
    pub fn active(&self) -> Result<Vec<Alert>, RegistryError> {
        let inner = self.lock()?;
        Ok(inner
            .alerts
            .iter()
            .filter(|a| a.status.is_active())
            .cloned()
            .collect())
    }

    /// Structural check of severity and source; never changes status
    pub fn validate(&self, id: u64) -> Result<Verdict, RegistryError> {
        let inner = self.lock()?;
        let Some(alert) = inner.find(id) else {
            return Ok(Verdict::fail(MSG_NOT_FOUND));
        };

        // Severity is a closed enum, so only the source can be malformed here.
        if alert.source.trim().is_empty() {
            debug!(alert_id = id, "Validation failed: missing source");
            return Ok(Verdict::fail(MSG_SOURCE_MISSING));
        }

        debug!(alert_id = id, "Alert validated");
        Ok(Verdict::pass(MSG_VALIDATED))
    }

    /// Append related log lines, dropping blanks and keeping at most
    /// [`MAX_LOGS_PER_GATHER`] per call
    pub fn gather_context<S: AsRef<str>>(
        &self,
        id: u64,
        logs: &[S],
    ) -> Result<Option<Alert>, RegistryError> {
        let mut inner = self.lock()?;
        let Some(alert) = inner.find_mut(id) else {
            return Ok(None);
        };

        let before = alert.related_logs.len();
        alert.related_logs.extend(
            logs.iter()
                .map(AsRef::<str>::as_ref)
                .filter(|line| !line.trim().is_empty())
                .take(MAX_LOGS_PER_GATHER)
                .map(str::to_string),
        );

        let added = alert.related_logs.len() - before;
        if added > 0 {
            info!(alert_id = id, added, total = alert.related_logs.len(), "Context gathered");
        }
        Ok(Some(alert.clone()))
    }

    /// Screen the alert text for benign-activity indicators
    ///
    /// A match flags the alert and moves it to `FalsePositive` from any status,
    /// `Closed` included. Repeat matches change nothing further.
    pub fn check_false_positive(&self, id: u64) -> Result<Verdict, RegistryError> {
        let mut inner = self.lock()?;
        let Some(alert) = inner.find_mut(id) else {
            return Ok(Verdict::fail(MSG_NOT_FOUND));
        };

        let Some(indicator) = matching_indicator(&alert.title, &alert.description) else {
            debug!(alert_id = id, "No false positive indicator matched");
            return Ok(Verdict::fail(MSG_LEGITIMATE));
        };

        if !(alert.is_false_positive && alert.status == AlertStatus::FalsePositive) {
            alert.is_false_positive = true;
            alert.status = AlertStatus::FalsePositive;
            counter!("alert_transitions_total", "transition" => "false_positive").increment(1);
            info!(alert_id = id, indicator, "Alert marked as false positive");
        }
        Ok(Verdict::pass(MSG_FALSE_POSITIVE))
    }

    /// Start (or resume after escalation) an investigation
    ///
    /// Only `New` and `Escalated` alerts move; anything else is returned unchanged.
    pub fn investigate(&self, id: u64, investigated_by: &str) -> Result<Option<Alert>, RegistryError> {
        let mut inner = self.lock()?;
        let Some(alert) = inner.find_mut(id) else {
            return Ok(None);
        };

        if alert.status.can_investigate() {
            alert.status = AlertStatus::InProgress;
            alert.investigated_at = Some(Utc::now());
            alert.investigated_by = Some(investigated_by.to_string());
            counter!("alert_transitions_total", "transition" => "investigate").increment(1);
            info!(alert_id = id, investigated_by, "Investigation started");
        } else {
            debug!(alert_id = id, status = %alert.status, "Investigate ignored");
        }
        Ok(Some(alert.clone()))
    }

    /// Apply a simulated remediation effector
    ///
    /// On any failure the record is left exactly as it was.
    pub fn remediate(
        &self,
        id: u64,
        remediation_type: &str,
        notes: &str,
        remediated_by: &str,
    ) -> Result<Verdict, RegistryError> {
        let mut guard = self.lock()?;
        let inner = &mut *guard;
        let Some(alert) = inner.alerts.iter_mut().find(|a| a.id == id) else {
            return Ok(Verdict::fail(MSG_NOT_FOUND));
        };

        let applied = if alert.is_false_positive {
            Err(RemediationError::FalsePositive)
        } else {
            inner
                .remediators
                .get(remediation_type)
                .and_then(|effector| effector.apply(alert))
        };

        if let Err(e) = applied {
            counter!("alert_remediations_total", "outcome" => "rejected").increment(1);
            warn!(alert_id = id, remediation_type, remediated_by, "Remediation rejected: {}", e);
            return Ok(Verdict::fail(e.to_string()));
        }

        alert.remediation_action = Some(format!("{}: {}", remediation_type, notes));
        alert.status = AlertStatus::Remediated;
        alert.resolved_at = Some(Utc::now());

        counter!("alert_remediations_total", "outcome" => "applied").increment(1);
        info!(alert_id = id, remediation_type, remediated_by, "Alert remediated");
        Ok(Verdict::pass(format!(
            "Alert remediated successfully using {}",
            remediation_type
        )))
    }

    /// Hand the alert to a higher tier; allowed from any status
    pub fn escalate(
        &self,
        id: u64,
        escalation_notes: &str,
        recommended_next_steps: &str,
        escalated_by: &str,
    ) -> Result<Option<Alert>, RegistryError> {
        let mut inner = self.lock()?;
        let Some(alert) = inner.find_mut(id) else {
            return Ok(None);
        };

        alert.status = AlertStatus::Escalated;
        alert.escalation_notes = Some(format!(
            "[{}] {}\nRecommended: {}",
            escalated_by, escalation_notes, recommended_next_steps
        ));

        counter!("alert_transitions_total", "transition" => "escalate").increment(1);
        info!(alert_id = id, escalated_by, "Alert escalated");
        Ok(Some(alert.clone()))
    }

    /// Close a remediated or false-positive alert; other statuses are left alone
    pub fn close(&self, id: u64, closed_by: &str) -> Result<Option<Alert>, RegistryError> {
        let mut inner = self.lock()?;
        let Some(alert) = inner.find_mut(id) else {
            return Ok(None);
        };

        if alert.status.is_resolved() {
            alert.status = AlertStatus::Closed;
            alert.resolved_at = Some(Utc::now());
            counter!("alert_transitions_total", "transition" => "close").increment(1);
            info!(alert_id = id, closed_by, "Alert closed");
        } else {
            debug!(alert_id = id, status = %alert.status, "Close ignored");
        }
        Ok(Some(alert.clone()))
    }

    /// Close every remediated or false-positive alert, returning how many moved
    pub fn close_resolved(&self, closed_by: &str) -> Result<usize, RegistryError> {
        let mut inner = self.lock()?;
        let now = Utc::now();

        let mut closed = 0;
        for alert in inner.alerts.iter_mut().filter(|a| a.status.is_resolved()) {
            alert.status = AlertStatus::Closed;
            alert.resolved_at = Some(now);
            closed += 1;
        }

        counter!("alert_transitions_total", "transition" => "close").increment(closed as u64);
        info!(closed, closed_by, "Closed resolved alerts");
        Ok(closed)
    }

    /// Aggregate report over the current store
    pub fn summary(&self) -> Result<AlertSummary, RegistryError> {
        let inner = self.lock()?;
        Ok(AlertSummary::from_alerts(&inner.alerts, Utc::now()))
    }

    /// Drop every alert and restart ids at 1 (test isolation only)
    pub fn clear(&self) -> Result<(), RegistryError> {
        let mut inner = self.lock()?;
        inner.alerts.clear();
        inner.next_id = 1;
        warn!("Alert registry cleared");
        Ok(())
    }
}

impl Default for AlertRegistry {
    fn default() -> Self {
        Self::new()
    }
}

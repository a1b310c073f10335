//! Point-in-time summary report over all alerts

use crate::model::{Alert, AlertStatus, Severity};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;

/// Aggregate report; computed on demand, never stored
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AlertSummary {
    pub total_alerts: usize,
    pub alerts_investigated: usize,
    pub alerts_remediated: usize,
    pub alerts_escalated: usize,
    pub alerts_closed: usize,
    pub false_positives: usize,
    /// Every severity present, zero-filled
    pub alerts_by_severity: BTreeMap<Severity, usize>,
    /// Every status present, zero-filled
    pub alerts_by_status: BTreeMap<AlertStatus, usize>,
    pub actions_taken: Vec<String>,
    pub pending_escalations: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

impl AlertSummary {
    /// Build the report from a snapshot of the store
    pub fn from_alerts<'a, I>(alerts: I, generated_at: DateTime<Utc>) -> Self
    where
        I: IntoIterator<Item = &'a Alert>,
    {
        let mut summary = Self {
            total_alerts: 0,
            alerts_investigated: 0,
            alerts_remediated: 0,
            alerts_escalated: 0,
            alerts_closed: 0,
            false_positives: 0,
            alerts_by_severity: Severity::ALL.into_iter().map(|s| (s, 0)).collect(),
            alerts_by_status: AlertStatus::ALL.into_iter().map(|s| (s, 0)).collect(),
            actions_taken: Vec::new(),
            pending_escalations: Vec::new(),
            generated_at,
        };

        for alert in alerts {
            summary.total_alerts += 1;

            if alert.investigated_at.is_some() {
                summary.alerts_investigated += 1;
            }
            if alert.is_false_positive {
                summary.false_positives += 1;
            }
            match alert.status {
                AlertStatus::Remediated => summary.alerts_remediated += 1,
                AlertStatus::Escalated => summary.alerts_escalated += 1,
                AlertStatus::Closed => summary.alerts_closed += 1,
                _ => {}
            }

            *summary.alerts_by_severity.entry(alert.severity).or_insert(0) += 1;
            *summary.alerts_by_status.entry(alert.status).or_insert(0) += 1;

            if let Some(action) = alert.remediation_action.as_deref().filter(|a| !a.is_empty()) {
                summary
                    .actions_taken
                    .push(format!("Alert {}: {}", alert.alert_code, action));
            }
            if alert.status == AlertStatus::Escalated {
                summary.pending_escalations.push(format!(
                    "Alert {} - {}: {}",
                    alert.alert_code,
                    alert.title,
                    alert.escalation_notes.as_deref().unwrap_or_default()
                ));
            }
        }

        summary
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NewAlert;

    fn alert(id: u64, severity: Severity, status: AlertStatus) -> Alert {
        let mut alert = Alert::raise(
            id,
            NewAlert::new(format!("Alert {id}"), "desc", severity, "SIEM"),
            Utc::now(),
        );
        alert.status = status;
        alert
    }

    #[test]
    fn test_empty_store_is_zero_filled() {
        let summary = AlertSummary::from_alerts(&Vec::<Alert>::new(), Utc::now());
        assert_eq!(summary.total_alerts, 0);
        assert_eq!(summary.alerts_by_severity.len(), 5);
        assert_eq!(summary.alerts_by_status.len(), 6);
        assert!(summary.alerts_by_severity.values().all(|&n| n == 0));
        assert!(summary.alerts_by_status.values().all(|&n| n == 0));
        assert!(summary.actions_taken.is_empty());
        assert!(summary.pending_escalations.is_empty());
    }

    #[test]
    fn test_counts_and_lines() {
        let mut remediated = alert(1, Severity::Critical, AlertStatus::Remediated);
        remediated.remediation_action = Some("block_ip: 10.0.0.9".to_string());

        let mut escalated = alert(2, Severity::High, AlertStatus::Escalated);
        escalated.escalation_notes = Some("[Analyst1] APT\nRecommended: call IR".to_string());

        let mut closed_fp = alert(3, Severity::Low, AlertStatus::Closed);
        closed_fp.is_false_positive = true;

        let alerts = vec![remediated.clone(), escalated.clone(), closed_fp];
        let summary = AlertSummary::from_alerts(&alerts, Utc::now());

        assert_eq!(summary.total_alerts, 3);
        assert_eq!(summary.alerts_remediated, 1);
        assert_eq!(summary.alerts_escalated, 1);
        assert_eq!(summary.alerts_closed, 1);
        assert_eq!(summary.false_positives, 1);
        assert_eq!(summary.alerts_by_severity[&Severity::Medium], 0);
        assert_eq!(summary.alerts_by_severity[&Severity::Critical], 1);
        assert_eq!(summary.alerts_by_status[&AlertStatus::New], 0);
        assert_eq!(
            summary.actions_taken,
            vec![format!("Alert {}: block_ip: 10.0.0.9", remediated.alert_code)]
        );
        assert_eq!(
            summary.pending_escalations,
            vec![format!(
                "Alert {} - Alert 2: [Analyst1] APT\nRecommended: call IR",
                escalated.alert_code
            )]
        );
    }

    #[test]
    fn test_serializes_enum_keys() {
        let summary = AlertSummary::from_alerts(&Vec::<Alert>::new(), Utc::now());
        let json = serde_json::to_value(&summary).unwrap();
        assert_eq!(json["alerts_by_severity"]["Critical"], 0);
        assert_eq!(json["alerts_by_status"]["FalsePositive"], 0);
    }
}

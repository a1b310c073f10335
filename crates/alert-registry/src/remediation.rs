//! Simulated remediation effectors
//!
//! Each effector checks its precondition against the alert and reports
//! success; none of them touch real infrastructure.

use crate::model::Alert;
use std::collections::HashMap;
use thiserror::Error;

/// Why a remediation could not be applied
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemediationError {
    #[error("Cannot remediate a false positive alert")]
    FalsePositive,

    #[error("Unknown remediation type: {0}")]
    UnknownType(String),

    #[error("Cannot isolate endpoint: AffectedEndpoint not specified")]
    MissingEndpoint,

    #[error("Cannot {action}: AffectedUser not specified")]
    MissingUser { action: &'static str },
}

/// A corrective action that can be applied to an alert
pub trait Remediator: Send + Sync {
    /// Type name callers select this effector by
    fn name(&self) -> &'static str;

    /// Check preconditions and apply the action
    fn apply(&self, alert: &Alert) -> Result<(), RemediationError>;
}

fn has_value(field: &Option<String>) -> bool {
    field.as_deref().is_some_and(|v| !v.is_empty())
}

/// Cut an endpoint off the network
pub struct IsolateEndpoint;

impl Remediator for IsolateEndpoint {
    fn name(&self) -> &'static str {
        "isolate_endpoint"
    }

    fn apply(&self, alert: &Alert) -> Result<(), RemediationError> {
        if has_value(&alert.affected_endpoint) {
            Ok(())
        } else {
            Err(RemediationError::MissingEndpoint)
        }
    }
}

/// Revoke the affected user's credentials
pub struct RevokeCredentials;

impl Remediator for RevokeCredentials {
    fn name(&self) -> &'static str {
        "revoke_credentials"
    }

    fn apply(&self, alert: &Alert) -> Result<(), RemediationError> {
        if has_value(&alert.affected_user) {
            Ok(())
        } else {
            Err(RemediationError::MissingUser {
                action: "revoke credentials",
            })
        }
    }
}

/// Disable the affected user's account
pub struct DisableAccount;

impl Remediator for DisableAccount {
    fn name(&self) -> &'static str {
        "disable_account"
    }

    fn apply(&self, alert: &Alert) -> Result<(), RemediationError> {
        if has_value(&alert.affected_user) {
            Ok(())
        } else {
            Err(RemediationError::MissingUser {
                action: "disable account",
            })
        }
    }
}

/// Roll out a patch
pub struct PatchVulnerability;

impl Remediator for PatchVulnerability {
    fn name(&self) -> &'static str {
        "patch_vulnerability"
    }

    fn apply(&self, _alert: &Alert) -> Result<(), RemediationError> {
        Ok(())
    }
}

/// Push a firewall deny rule
pub struct BlockIp;

impl Remediator for BlockIp {
    fn name(&self) -> &'static str {
        "block_ip"
    }

    fn apply(&self, _alert: &Alert) -> Result<(), RemediationError> {
        Ok(())
    }
}

/// Effectors keyed by lower-cased type name
pub struct RemediatorTable {
    entries: HashMap<String, Box<dyn Remediator>>,
}

impl RemediatorTable {
    /// Table with no effectors installed
    pub fn empty() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Add or replace an effector
    pub fn register(&mut self, remediator: Box<dyn Remediator>) {
        self.entries
            .insert(remediator.name().to_lowercase(), remediator);
    }

    /// Case-insensitive lookup
    pub fn get(&self, remediation_type: &str) -> Result<&dyn Remediator, RemediationError> {
        self.entries
            .get(&remediation_type.to_lowercase())
            .map(|r| r.as_ref())
            .ok_or_else(|| RemediationError::UnknownType(remediation_type.to_string()))
    }

    /// Installed type names, sorted
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.entries.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }
}

impl Default for RemediatorTable {
    fn default() -> Self {
        let mut table = Self::empty();
        table.register(Box::new(IsolateEndpoint));
        table.register(Box::new(RevokeCredentials));
        table.register(Box::new(PatchVulnerability));
        table.register(Box::new(BlockIp));
        table.register(Box::new(DisableAccount));
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{NewAlert, Severity};
    use chrono::Utc;

    fn alert(endpoint: Option<&str>, user: Option<&str>) -> Alert {
        let mut new = NewAlert::new("t", "d", Severity::High, "SIEM");
        new.affected_endpoint = endpoint.map(str::to_string);
        new.affected_user = user.map(str::to_string);
        Alert::raise(1, new, Utc::now())
    }

    #[test]
    fn test_default_table() {
        let table = RemediatorTable::default();
        assert_eq!(
            table.names(),
            vec![
                "block_ip",
                "disable_account",
                "isolate_endpoint",
                "patch_vulnerability",
                "revoke_credentials"
            ]
        );
    }

    #[test]
    fn test_lookup_is_case_insensitive() {
        let table = RemediatorTable::default();
        assert_eq!(table.get("ISOLATE_Endpoint").unwrap().name(), "isolate_endpoint");
        assert_eq!(
            table.get("reboot").err(),
            Some(RemediationError::UnknownType("reboot".to_string()))
        );
    }

    #[test]
    fn test_endpoint_precondition() {
        let err = IsolateEndpoint.apply(&alert(None, None)).unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot isolate endpoint: AffectedEndpoint not specified"
        );
        assert!(IsolateEndpoint.apply(&alert(Some(""), None)).is_err());
        assert!(IsolateEndpoint.apply(&alert(Some("DESKTOP-1"), None)).is_ok());
    }

    #[test]
    fn test_user_preconditions() {
        let bare = alert(None, None);
        assert_eq!(
            RevokeCredentials.apply(&bare).unwrap_err().to_string(),
            "Cannot revoke credentials: AffectedUser not specified"
        );
        assert_eq!(
            DisableAccount.apply(&bare).unwrap_err().to_string(),
            "Cannot disable account: AffectedUser not specified"
        );

        let with_user = alert(None, Some("user@company.com"));
        assert!(RevokeCredentials.apply(&with_user).is_ok());
        assert!(DisableAccount.apply(&with_user).is_ok());
    }

    #[test]
    fn test_unconditional_effectors() {
        let bare = alert(None, None);
        assert!(PatchVulnerability.apply(&bare).is_ok());
        assert!(BlockIp.apply(&bare).is_ok());
    }

    #[test]
    fn test_register_replaces() {
        struct NeverBlock;
        impl Remediator for NeverBlock {
            fn name(&self) -> &'static str {
                "BLOCK_IP"
            }
            fn apply(&self, _alert: &Alert) -> Result<(), RemediationError> {
                Err(RemediationError::UnknownType("block_ip".into()))
            }
        }

        let mut table = RemediatorTable::default();
        table.register(Box::new(NeverBlock));
        assert_eq!(table.names().len(), 5);
        assert!(table.get("block_ip").unwrap().apply(&alert(None, None)).is_err());
    }
}

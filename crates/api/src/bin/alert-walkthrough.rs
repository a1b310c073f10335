//! Scripted run of the alert lifecycle against an in-process registry.
//!
//! Raises three alerts, then validates, gathers context, screens for false
//! positives, investigates, remediates, escalates, reports and closes,
//! logging each step.

use alert_registry::{AlertRegistry, NewAlert, Severity};
use api::{config::LoggingConfig, init_logging};
use tracing::info;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging(&LoggingConfig::default())?;
    let registry = AlertRegistry::new();

    info!("Step 1: collecting alerts from SIEM");
    let login = registry.create(
        NewAlert::new(
            "Suspicious Login Attempt",
            "Multiple failed login attempts from unknown IP 192.168.1.100",
            Severity::High,
            "SIEM",
        )
        .with_endpoint("DESKTOP-123")
        .with_user("john.doe@company.com"),
    )?;
    let malware = registry.create(
        NewAlert::new(
            "Malware Detected",
            "Ransomware detected on endpoint",
            Severity::Critical,
            "Antivirus",
        )
        .with_endpoint("LAPTOP-456")
        .with_user("jane.smith@company.com"),
    )?;
    let scan = registry.create(
        NewAlert::new(
            "Test Environment Alert",
            "Authorized security scan in test environment",
            Severity::Low,
            "SecurityScanner",
        )
        .with_endpoint("TEST-SERVER-01"),
    )?;
    for alert in [&login, &malware, &scan] {
        info!("Created {} - {}", alert.alert_code, alert.title);
    }

    info!("Step 2: validating and gathering context");
    let verdict = registry.validate(login.id)?;
    info!("{}: {}", login.alert_code, verdict.message);

    let logs = [
        "2024-01-15 10:30:00 - Failed login from 192.168.1.100",
        "2024-01-15 10:30:15 - Failed login from 192.168.1.100",
        "2024-01-15 10:30:30 - Account locked for john.doe@company.com",
        "2024-01-15 10:31:00 - Suspicious activity detected",
    ];
    if let Some(alert) = registry.gather_context(login.id, &logs)? {
        info!("{}: {} related log entries", alert.alert_code, alert.related_logs.len());
    }

    let verdict = registry.check_false_positive(scan.id)?;
    info!("{}: {}", scan.alert_code, verdict.message);

    info!("Step 3: investigating");
    registry.investigate(login.id, "SecurityAnalyst1")?;
    registry.investigate(malware.id, "SecurityAnalyst2")?;

    info!("Step 4: remediating");
    let verdict = registry.remediate(
        login.id,
        "revoke_credentials",
        "Reset password and revoked active sessions",
        "SecurityAnalyst1",
    )?;
    info!("{}: {}", login.alert_code, verdict.message);

    let verdict = registry.remediate(scan.id, "block_ip", "Blocked scanner", "SecurityAnalyst1")?;
    info!("{}: {}", scan.alert_code, verdict.message);

    info!("Step 5: escalating");
    registry.escalate(
        malware.id,
        "Ransomware may have spread laterally",
        "Engage incident response team and isolate the subnet",
        "SecurityAnalyst2",
    )?;

    info!("Step 6: summary report");
    let summary = registry.summary()?;
    info!(
        total = summary.total_alerts,
        investigated = summary.alerts_investigated,
        remediated = summary.alerts_remediated,
        escalated = summary.alerts_escalated,
        false_positives = summary.false_positives,
        "Summary generated"
    );
    for action in &summary.actions_taken {
        info!("Action: {}", action);
    }
    for escalation in &summary.pending_escalations {
        info!("Pending: {}", escalation);
    }

    info!("Step 7: closing resolved alerts");
    let closed = registry.close_resolved("SecurityManager")?;
    info!("Closed {} resolved alerts; {} still active", closed, registry.active()?.len());

    Ok(())
}

//! Content heuristic for benign alerts

/// Phrases that mark an alert as expected activity
pub const FALSE_POSITIVE_INDICATORS: [&str; 4] = [
    "test environment",
    "scheduled maintenance",
    "authorized security scan",
    "known benign activity",
];

/// Returns the first indicator found in the title or description, ignoring case.
pub fn matching_indicator(title: &str, description: &str) -> Option<&'static str> {
    let title = title.to_lowercase();
    let description = description.to_lowercase();

    FALSE_POSITIVE_INDICATORS
        .into_iter()
        .find(|indicator| description.contains(*indicator) || title.contains(*indicator))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matches_description() {
        assert_eq!(
            matching_indicator("Port sweep", "Authorized Security Scan from Qualys"),
            Some("authorized security scan")
        );
    }

    #[test]
    fn test_matches_title() {
        assert_eq!(
            matching_indicator("SCHEDULED MAINTENANCE reboot", "host went offline"),
            Some("scheduled maintenance")
        );
    }

    #[test]
    fn test_no_match() {
        assert_eq!(
            matching_indicator("Malware Detected", "Ransomware detected on endpoint"),
            None
        );
        // Indicator words split across fields do not count
        assert_eq!(matching_indicator("test", "environment"), None);
    }
}

//! Wire types for the dashboard's `/update_data` response.
//!
//! A snapshot has no identity: it is created from one response body, rendered,
//! and dropped.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::PollFailure;

/// One JSON response body representing current metrics at poll time.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MetricsSnapshot {
    /// Occurrence count per attack type, keyed by attack-type name.
    pub attack_stats: BTreeMap<String, u64>,

    /// Base64-encoded PNG of the attack chart.
    #[serde(default)]
    pub attack_chart: String,

    /// Addresses the server currently flags as malicious.
    ///
    /// Only read at page load, when the IP table is built.
    #[serde(default)]
    pub malicious_ips: Vec<MaliciousIp>,
}

/// A flagged source address, one row of the IP table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaliciousIp {
    pub ip: String,
    #[serde(default)]
    pub threat_level: String,
    #[serde(default)]
    pub first_detected: String,
    #[serde(default)]
    pub attack_type: String,
}

impl MetricsSnapshot {
    /// Parse and validate a response body.
    pub fn from_slice(bytes: &[u8]) -> Result<Self, PollFailure> {
        let snapshot: MetricsSnapshot = serde_json::from_slice(bytes)?;
        snapshot.validate()?;
        Ok(snapshot)
    }

    /// Check that every attack type has a non-empty name.
    ///
    /// Negative counts are already rejected by deserialization into `u64`.
    pub fn validate(&self) -> Result<(), PollFailure> {
        if self.attack_stats.keys().any(|k| k.is_empty()) {
            return Err(PollFailure::Parse(
                "attack_stats contains an empty attack type".to_string(),
            ));
        }
        Ok(())
    }

    /// Total number of attacks across all types.
    pub fn total_attacks(&self) -> u64 {
        saturating_total(self.attack_stats.values().copied())
    }
}

/// Sum of attack counts, clamped at `u64::MAX` instead of overflowing.
pub fn saturating_total(counts: impl IntoIterator<Item = u64>) -> u64 {
    counts.into_iter().fold(0u64, |acc, c| acc.saturating_add(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_snapshot() {
        let json = br#"{
            "attack_stats": { "SQLi": 3, "XSS": 1 },
            "attack_chart": "iVBORw0KG",
            "malicious_ips": [
                {
                    "ip": "10.0.0.5",
                    "threat_level": "high",
                    "first_detected": "2025-01-01 12:00:00",
                    "attack_type": "SQLi"
                }
            ]
        }"#;

        let snapshot = MetricsSnapshot::from_slice(json).unwrap();
        assert_eq!(snapshot.attack_stats.len(), 2);
        assert_eq!(snapshot.attack_stats.get("SQLi"), Some(&3));
        assert_eq!(snapshot.attack_stats.get("XSS"), Some(&1));
        assert_eq!(snapshot.attack_chart, "iVBORw0KG");
        assert_eq!(snapshot.malicious_ips.len(), 1);
        assert_eq!(snapshot.malicious_ips[0].ip, "10.0.0.5");
        assert_eq!(snapshot.total_attacks(), 4);
    }

    #[test]
    fn test_malicious_ips_optional() {
        let json = br#"{"attack_stats": {}, "attack_chart": ""}"#;
        let snapshot = MetricsSnapshot::from_slice(json).unwrap();
        assert!(snapshot.attack_stats.is_empty());
        assert!(snapshot.malicious_ips.is_empty());
    }

    #[test]
    fn test_rejects_negative_count() {
        let json = br#"{"attack_stats": {"DDoS": -1}, "attack_chart": ""}"#;
        let err = MetricsSnapshot::from_slice(json).unwrap_err();
        assert!(matches!(err, PollFailure::Parse(_)));
    }

    #[test]
    fn test_rejects_empty_attack_type() {
        let json = br#"{"attack_stats": {"": 2}, "attack_chart": ""}"#;
        let err = MetricsSnapshot::from_slice(json).unwrap_err();
        assert!(err.to_string().contains("empty attack type"));
    }

    #[test]
    fn test_total_attacks_saturates() {
        let json = br#"{"attack_stats": {"A": 18446744073709551615, "B": 1}, "attack_chart": ""}"#;
        let snapshot = MetricsSnapshot::from_slice(json).unwrap();
        assert_eq!(snapshot.total_attacks(), u64::MAX);
    }

    #[test]
    fn test_rejects_missing_stats() {
        let json = br#"{"attack_chart": "abc"}"#;
        assert!(MetricsSnapshot::from_slice(json).is_err());
    }
}

//! Server-wide settings consumed by the engine and the transport.

use serde::de::{self, Deserializer, Unexpected};
use serde::{Deserialize, Serialize};
use std::time::Duration;

pub const DEFAULT_PORT: u16 = 3000;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MockConfig {
    /// Default response delay in milliseconds, for variants without their own
    #[serde(
        default,
        deserialize_with = "deserialize_millis",
        skip_serializing_if = "Option::is_none"
    )]
    pub delay: Option<u64>,
    /// Collection served at startup; the first defined one when absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selected: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

impl MockConfig {
    pub fn port(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    /// Variant delay when present, else the configured default, else zero.
    pub fn effective_delay(&self, variant_delay: Option<u64>) -> Duration {
        Duration::from_millis(variant_delay.or(self.delay).unwrap_or(0))
    }
}

/// Millisecond delay written as any non-negative number. Fractions are truncated.
pub(crate) fn deserialize_millis<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<f64>::deserialize(deserializer)? {
        None => Ok(None),
        Some(ms) if ms.is_finite() && ms >= 0.0 => Ok(Some(ms.trunc() as u64)),
        Some(ms) => Err(de::Error::invalid_value(
            Unexpected::Float(ms),
            &"a non-negative number of milliseconds",
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(Some(50), Some(500), 50)]
    #[case(None, Some(500), 500)]
    #[case(Some(0), Some(500), 0)]
    #[case(Some(20), None, 20)]
    #[case(None, None, 0)]
    fn test_effective_delay(
        #[case] variant: Option<u64>,
        #[case] configured: Option<u64>,
        #[case] expected_ms: u64,
    ) {
        let config = MockConfig {
            delay: configured,
            ..Default::default()
        };
        assert_eq!(
            config.effective_delay(variant),
            Duration::from_millis(expected_ms)
        );
    }

    #[rstest]
    fn test_port_defaults_to_3000() {
        assert_eq!(MockConfig::default().port(), 3000);
        let config: MockConfig = serde_json::from_str(r#"{"port": 8080}"#).unwrap();
        assert_eq!(config.port(), 8080);
    }

    #[rstest]
    #[case(r#"{"delay": 250}"#, Some(250))]
    #[case(r#"{"delay": 12.9}"#, Some(12))]
    #[case(r#"{"delay": 0.5}"#, Some(0))]
    #[case(r#"{}"#, None)]
    fn test_delay_accepts_fractional_millis(#[case] raw: &str, #[case] expected: Option<u64>) {
        let config: MockConfig = serde_json::from_str(raw).unwrap();
        assert_eq!(config.delay, expected);
    }

    #[rstest]
    #[case(r#"{"delay": -1}"#)]
    #[case(r#"{"delay": -0.5}"#)]
    #[case(r#"{"delay": "slow"}"#)]
    fn test_delay_rejects_invalid_values(#[case] raw: &str) {
        assert!(serde_json::from_str::<MockConfig>(raw).is_err());
    }
}

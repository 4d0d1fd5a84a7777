//! Log severity scale.
//!
//! The relative order follows syslog (RFC 5424): `Emergency` is code 0 and the
//! most severe, `Debug` is code 7. Only the uppercase name ever crosses the
//! wire or reaches the store.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// Severity of a log entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Emergency,
    Alert,
    Critical,
    Error,
    Warning,
    Notice,
    Informational,
    Debug,
}

/// Returned when text does not name a severity.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid severity {0:?}")]
pub struct InvalidSeverity(pub String);

impl Severity {
    /// Every level, most severe first.
    pub const ALL: [Severity; 8] = [
        Severity::Emergency,
        Severity::Alert,
        Severity::Critical,
        Severity::Error,
        Severity::Warning,
        Severity::Notice,
        Severity::Informational,
        Severity::Debug,
    ];

    /// Wire name.
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Emergency => "EMERGENCY",
            Severity::Alert => "ALERT",
            Severity::Critical => "CRITICAL",
            Severity::Error => "ERROR",
            Severity::Warning => "WARNING",
            Severity::Notice => "NOTICE",
            Severity::Informational => "INFORMATIONAL",
            Severity::Debug => "DEBUG",
        }
    }

    /// Syslog numeric code (0 = most severe).
    pub fn code(self) -> u8 {
        match self {
            Severity::Emergency => 0,
            Severity::Alert => 1,
            Severity::Critical => 2,
            Severity::Error => 3,
            Severity::Warning => 4,
            Severity::Notice => 5,
            Severity::Informational => 6,
            Severity::Debug => 7,
        }
    }

    /// True when `self` is as severe as `threshold` or more.
    pub fn is_at_least(self, threshold: Severity) -> bool {
        self.code() <= threshold.code()
    }
}

impl FromStr for Severity {
    type Err = InvalidSeverity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Severity::ALL
            .into_iter()
            .find(|level| level.as_str() == s)
            .ok_or_else(|| InvalidSeverity(s.to_string()))
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let text = String::deserialize(deserializer)?;
        text.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip_all_levels() {
        for level in Severity::ALL {
            assert_eq!(level.as_str().parse::<Severity>(), Ok(level));
        }
    }

    #[test]
    fn test_parse_rejects_unknown_text() {
        assert_eq!("".parse::<Severity>(), Err(InvalidSeverity(String::new())));
        assert_eq!(
            "bogus".parse::<Severity>(),
            Err(InvalidSeverity("bogus".to_string()))
        );
        assert!("NOT_A_LEVEL".parse::<Severity>().is_err());
    }

    #[test]
    fn test_parse_is_case_sensitive() {
        assert!("informational".parse::<Severity>().is_err());
        assert!("Warning".parse::<Severity>().is_err());
        assert!(" DEBUG".parse::<Severity>().is_err());
    }

    #[test]
    fn test_ordering_follows_syslog() {
        assert_eq!(Severity::Emergency.code(), 0);
        assert_eq!(Severity::Alert.code(), 1);
        assert_eq!(Severity::Critical.code(), 2);
        assert_eq!(Severity::Debug.code(), 7);

        for level in Severity::ALL {
            assert!(Severity::Emergency.is_at_least(level));
        }
        assert!(Severity::Error.is_at_least(Severity::Warning));
        assert!(!Severity::Notice.is_at_least(Severity::Warning));
        assert!(Severity::Debug.is_at_least(Severity::Debug));
        assert!(!Severity::Debug.is_at_least(Severity::Informational));
    }

    #[test]
    fn test_serde_uses_names() {
        let json = serde_json::to_string(&Severity::Informational).unwrap();
        assert_eq!(json, "\"INFORMATIONAL\"");

        let level: Severity = serde_json::from_str("\"ALERT\"").unwrap();
        assert_eq!(level, Severity::Alert);

        let err = serde_json::from_str::<Severity>("\"LOUD\"").unwrap_err();
        assert!(err.to_string().contains("invalid severity"));

        // Ordinals are never accepted.
        assert!(serde_json::from_str::<Severity>("6").is_err());
    }
}

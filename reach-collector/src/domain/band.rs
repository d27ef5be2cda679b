//! Travel-time band type.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Error returned when constructing or parsing an invalid time band.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid time band {input:?}: {reason}")]
pub struct InvalidTimeBand {
    input: String,
    reason: &'static str,
}

/// A contiguous minute range `[lower, higher]` used to batch reachability
/// queries.
///
/// A `TimeBand` built through [`TimeBand::new`] or parsed from its label
/// always satisfies `lower < higher`. Bands deserialized from configuration
/// are checked by `CollectorConfig::validate`.
///
/// # Examples
///
/// ```
/// use reach_collector::domain::TimeBand;
///
/// let band = TimeBand::new(10, 20).unwrap();
/// assert_eq!(band.to_string(), "10-20");
/// assert_eq!("10-20".parse::<TimeBand>().unwrap(), band);
///
/// // Empty and inverted ranges are rejected
/// assert!(TimeBand::new(20, 20).is_err());
/// assert!("30-10".parse::<TimeBand>().is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TimeBand {
    pub lower: u32,
    pub higher: u32,
}

impl TimeBand {
    /// Create a band, rejecting `lower >= higher`.
    pub fn new(lower: u32, higher: u32) -> Result<Self, InvalidTimeBand> {
        let band = TimeBand { lower, higher };
        band.check()?;
        Ok(band)
    }

    /// Check the `lower < higher` invariant.
    pub fn check(&self) -> Result<(), InvalidTimeBand> {
        if self.lower >= self.higher {
            return Err(InvalidTimeBand {
                input: self.to_string(),
                reason: "lower bound must be below higher bound",
            });
        }
        Ok(())
    }

    /// The `"<lower>-<higher>"` label used in output keys.
    pub fn label(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for TimeBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.lower, self.higher)
    }
}

impl FromStr for TimeBand {
    type Err = InvalidTimeBand;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = |reason| InvalidTimeBand {
            input: s.to_string(),
            reason,
        };

        let (lower, higher) = s
            .split_once('-')
            .ok_or_else(|| invalid("expected <lower>-<higher>"))?;
        let lower = minutes(lower).ok_or_else(|| invalid("lower bound is not a number of minutes"))?;
        let higher =
            minutes(higher).ok_or_else(|| invalid("higher bound is not a number of minutes"))?;

        TimeBand::new(lower, higher).map_err(|_| invalid("lower bound must be below higher bound"))
    }
}

/// Plain ASCII digits only; `u32::from_str` would also take a leading `+`.
fn minutes(part: &str) -> Option<u32> {
    if part.is_empty() || !part.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    part.parse().ok()
}

/// Serde adapter storing a [`TimeBand`] as its `"<lower>-<higher>"` label.
pub mod label {
    use serde::{Deserialize, Deserializer, Serializer};

    use super::TimeBand;

    pub fn serialize<S: Serializer>(band: &TimeBand, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(band)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<TimeBand, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_valid_bands() {
        assert_eq!("0-10".parse::<TimeBand>().unwrap(), TimeBand::new(0, 10).unwrap());
        assert_eq!(
            "100-110".parse::<TimeBand>().unwrap(),
            TimeBand::new(100, 110).unwrap()
        );
    }

    #[test]
    fn reject_malformed_labels() {
        assert!("".parse::<TimeBand>().is_err());
        assert!("10".parse::<TimeBand>().is_err());
        assert!("10-".parse::<TimeBand>().is_err());
        assert!("-10".parse::<TimeBand>().is_err());
        assert!("a-b".parse::<TimeBand>().is_err());
        assert!("10-20-30".parse::<TimeBand>().is_err());
        assert!(" 10-20".parse::<TimeBand>().is_err());
    }

    #[test]
    fn reject_signed_bounds() {
        assert!("+5-10".parse::<TimeBand>().is_err());
        assert!("5-+10".parse::<TimeBand>().is_err());
        assert!("0-１０".parse::<TimeBand>().is_err());
    }

    #[test]
    fn reject_inverted_or_empty() {
        assert!(TimeBand::new(10, 10).is_err());
        assert!(TimeBand::new(20, 10).is_err());
        assert!(TimeBand { lower: 5, higher: 1 }.check().is_err());
    }

    #[test]
    fn error_display() {
        let err = "20-10".parse::<TimeBand>().unwrap_err();
        assert_eq!(
            err.to_string(),
            "invalid time band \"20-10\": lower bound must be below higher bound"
        );
    }

    #[test]
    fn range_and_label_serialization() {
        #[derive(Serialize, Deserialize)]
        struct Holder {
            range: TimeBand,
            #[serde(with = "label")]
            band: TimeBand,
        }

        let band = TimeBand::new(20, 30).unwrap();
        let json = serde_json::to_string(&Holder { range: band, band }).unwrap();
        assert_eq!(json, r#"{"range":{"lower":20,"higher":30},"band":"20-30"}"#);

        let back: Holder = serde_json::from_str(&json).unwrap();
        assert_eq!(back.band, band);
        assert_eq!(back.range, band);
    }
}

#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        /// Any valid band survives label formatting and parsing
        #[test]
        fn label_parses_back(lower in 0u32..10_000, width in 1u32..1_000) {
            let band = TimeBand::new(lower, lower + width).unwrap();
            prop_assert_eq!(band.label().parse::<TimeBand>().unwrap(), band);
        }

        /// Arbitrary text never panics the parser
        #[test]
        fn parse_never_panics(s in ".*") {
            let _ = s.parse::<TimeBand>();
        }
    }
}

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// Berths per deck; the coach has one upper and one lower deck.
pub const SEATS_PER_DECK: u8 = 16;

/// Total berths in the coach (16 upper + 16 lower).
pub const TOTAL_SEATS: usize = 32;

/// Deck position of a sleeper berth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Berth {
    Upper,
    Lower,
}

impl Berth {
    pub fn suffix(&self) -> char {
        match self {
            Berth::Upper => 'U',
            Berth::Lower => 'L',
        }
    }
}

/// A fixed berth identifier of the form `{1..16}{U|L}`.
///
/// The 32 labels are the whole universe; berths are never created or
/// destroyed at runtime. Serialized as the label string (`"5U"`, `"12L"`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SeatLabel {
    number: u8,
    berth: Berth,
}

impl SeatLabel {
    pub fn new(number: u8, berth: Berth) -> Result<Self, SeatLabelError> {
        if number == 0 || number > SEATS_PER_DECK {
            return Err(SeatLabelError::NumberOutOfRange(number));
        }
        Ok(Self { number, berth })
    }

    pub fn number(&self) -> u8 {
        self.number
    }

    pub fn berth(&self) -> Berth {
        self.berth
    }

    /// All 32 labels in stable order: `1U..16U`, then `1L..16L`.
    pub fn all() -> impl Iterator<Item = SeatLabel> {
        let upper = (1..=SEATS_PER_DECK).map(|n| SeatLabel { number: n, berth: Berth::Upper });
        let lower = (1..=SEATS_PER_DECK).map(|n| SeatLabel { number: n, berth: Berth::Lower });
        upper.chain(lower)
    }
}

impl fmt::Display for SeatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.number, self.berth.suffix())
    }
}

impl FromStr for SeatLabel {
    type Err = SeatLabelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let suffix = s
            .chars()
            .last()
            .ok_or_else(|| SeatLabelError::Malformed(s.to_string()))?;
        let berth = match suffix {
            'U' => Berth::Upper,
            'L' => Berth::Lower,
            _ => return Err(SeatLabelError::Malformed(s.to_string())),
        };
        let digits = &s[..s.len() - suffix.len_utf8()];
        let number: u8 = digits
            .parse()
            .map_err(|_| SeatLabelError::Malformed(s.to_string()))?;
        Self::new(number, berth)
    }
}

impl Serialize for SeatLabel {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for SeatLabel {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SeatLabelError {
    #[error("Seat number out of range: {0}")]
    NumberOutOfRange(u8),

    #[error("Malformed seat label: {0}")]
    Malformed(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_label_roundtrip() {
        for label in SeatLabel::all() {
            let text = label.to_string();
            assert_eq!(text.parse::<SeatLabel>().unwrap(), label);
        }
    }

    #[test]
    fn test_universe_is_distinct_and_stable() {
        let labels: Vec<SeatLabel> = SeatLabel::all().collect();
        assert_eq!(labels.len(), TOTAL_SEATS);

        let unique: HashSet<String> = labels.iter().map(|l| l.to_string()).collect();
        assert_eq!(unique.len(), TOTAL_SEATS);

        assert_eq!(labels[0].to_string(), "1U");
        assert_eq!(labels[15].to_string(), "16U");
        assert_eq!(labels[16].to_string(), "1L");
        assert_eq!(labels[31].to_string(), "16L");
    }

    #[test]
    fn test_rejects_out_of_range_numbers() {
        assert_eq!(
            "0U".parse::<SeatLabel>(),
            Err(SeatLabelError::NumberOutOfRange(0))
        );
        assert_eq!(
            "17L".parse::<SeatLabel>(),
            Err(SeatLabelError::NumberOutOfRange(17))
        );
        // Legacy 40-seat labels from older occupancy data
        assert!("25L".parse::<SeatLabel>().is_err());
    }

    #[test]
    fn test_rejects_malformed_labels() {
        assert!("".parse::<SeatLabel>().is_err());
        assert!("U5".parse::<SeatLabel>().is_err());
        assert!("5X".parse::<SeatLabel>().is_err());
        assert!("5".parse::<SeatLabel>().is_err());
    }

    #[test]
    fn test_serde_uses_string_form() {
        let label: SeatLabel = serde_json::from_str("\"7L\"").unwrap();
        assert_eq!(label.number(), 7);
        assert_eq!(label.berth(), Berth::Lower);
        assert_eq!(serde_json::to_string(&label).unwrap(), "\"7L\"");
    }
}

//! Common enumerations used across the platform

use serde::{Deserialize, Serialize};

use crate::error::ScoringError;

/// Tasting slot label. Every quarter has exactly one sample per label.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum SampleId {
    A,
    B,
    C,
    D,
}

impl SampleId {
    /// All labels in tie-break order
    pub const ALL: [SampleId; 4] = [SampleId::A, SampleId::B, SampleId::C, SampleId::D];

    pub fn as_str(&self) -> &'static str {
        match self {
            SampleId::A => "A",
            SampleId::B => "B",
            SampleId::C => "C",
            SampleId::D => "D",
        }
    }
}

impl std::fmt::Display for SampleId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SampleId {
    type Err = ScoringError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "A" => Ok(SampleId::A),
            "B" => Ok(SampleId::B),
            "C" => Ok(SampleId::C),
            "D" => Ok(SampleId::D),
            _ => Err(ScoringError::invalid_input(
                "sampleId",
                format!("'{}' is not one of A, B, C, D", s),
            )),
        }
    }
}

/// Grain-recipe category of a whiskey
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MashbillType {
    Bourbon,
    Rye,
    Wheat,
    #[serde(rename = "Single Malt")]
    SingleMalt,
    Specialty,
}

impl MashbillType {
    pub const ALL: [MashbillType; 5] = [
        MashbillType::Bourbon,
        MashbillType::Rye,
        MashbillType::Wheat,
        MashbillType::SingleMalt,
        MashbillType::Specialty,
    ];

    /// Label shown to players and matched against guesses
    pub fn label(&self) -> &'static str {
        match self {
            MashbillType::Bourbon => "Bourbon",
            MashbillType::Rye => "Rye",
            MashbillType::Wheat => "Wheat",
            MashbillType::SingleMalt => "Single Malt",
            MashbillType::Specialty => "Specialty",
        }
    }

    /// Case-insensitive lookup of a category by label
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.label().eq_ignore_ascii_case(label))
    }
}

impl std::fmt::Display for MashbillType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Difficulty label attached to a quarter
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Beginner,
    Intermediate,
    Advanced,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Difficulty::Beginner => "beginner",
            Difficulty::Intermediate => "intermediate",
            Difficulty::Advanced => "advanced",
        }
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for Difficulty {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "beginner" => Ok(Difficulty::Beginner),
            "intermediate" => Ok(Difficulty::Intermediate),
            "advanced" => Ok(Difficulty::Advanced),
            other => Err(format!("unknown difficulty '{}'", other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sample_ids_order_alphabetically() {
        let mut ids = vec![SampleId::D, SampleId::B, SampleId::A, SampleId::C];
        ids.sort();
        assert_eq!(ids, SampleId::ALL.to_vec());
    }

    #[test]
    fn test_sample_id_from_str() {
        assert_eq!("a".parse::<SampleId>().unwrap(), SampleId::A);
        assert_eq!(" D ".parse::<SampleId>().unwrap(), SampleId::D);
        assert!("E".parse::<SampleId>().is_err());
    }

    #[test]
    fn test_mashbill_parse_is_case_insensitive() {
        assert_eq!(MashbillType::parse("rye"), Some(MashbillType::Rye));
        assert_eq!(MashbillType::parse("BOURBON"), Some(MashbillType::Bourbon));
        assert_eq!(MashbillType::parse("single malt"), Some(MashbillType::SingleMalt));
        assert_eq!(MashbillType::parse("Vodka"), None);
        assert_eq!(MashbillType::parse(""), None);
    }

    #[test]
    fn test_mashbill_serializes_with_label() {
        let json = serde_json::to_string(&MashbillType::SingleMalt).unwrap();
        assert_eq!(json, "\"Single Malt\"");
    }

    #[test]
    fn test_difficulty_round_trips_through_str() {
        for difficulty in [Difficulty::Beginner, Difficulty::Intermediate, Difficulty::Advanced] {
            assert_eq!(difficulty.as_str().parse::<Difficulty>().unwrap(), difficulty);
        }
        assert!("expert".parse::<Difficulty>().is_err());
    }
}

//! Quarter models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{ScoringRules, WhiskeySample};
use crate::types::{Difficulty, SampleId};

/// A time-boxed round: four samples and one rule set
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Quarter {
    pub id: Uuid,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub difficulty: Difficulty,
    pub samples: Vec<WhiskeySample>,
    pub scoring_rules: ScoringRules,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Quarter {
    pub fn sample(&self, id: SampleId) -> Option<&WhiskeySample> {
        self.samples.iter().find(|sample| sample.id == id)
    }

    /// Whether players may submit at `now`
    pub fn is_open_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active && self.start_date <= now && now < self.end_date
    }

    /// Player-facing view without the sample ground truth
    pub fn summary(&self) -> QuarterSummary {
        let mut sample_ids: Vec<SampleId> = self.samples.iter().map(|s| s.id).collect();
        sample_ids.sort();

        QuarterSummary {
            id: self.id,
            name: self.name.clone(),
            start_date: self.start_date,
            end_date: self.end_date,
            is_active: self.is_active,
            difficulty: self.difficulty,
            sample_ids,
            max_score_per_sample: self.scoring_rules.max_possible_score(),
        }
    }
}

/// Quarter as shown to players before they submit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuarterSummary {
    pub id: Uuid,
    pub name: String,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
    pub difficulty: Difficulty,
    pub sample_ids: Vec<SampleId>,
    pub max_score_per_sample: Decimal,
}

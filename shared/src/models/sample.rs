//! Whiskey sample models

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::types::{MashbillType, SampleId};

/// Ground truth for one tasting slot
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WhiskeySample {
    pub id: SampleId,
    /// Bottle name, revealed after the player submits
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Age in years
    pub age: u32,
    pub proof: Decimal,
    #[serde(alias = "mashbillType")]
    pub mashbill: MashbillType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl WhiskeySample {
    pub fn new(id: SampleId, age: u32, proof: Decimal, mashbill: MashbillType) -> Self {
        Self {
            id,
            name: None,
            age,
            proof,
            mashbill,
            notes: None,
        }
    }
}

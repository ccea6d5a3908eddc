use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

pub const ALGORITHM_VERSION: &str = "1.0.0";

/// Eight weighted sub-scores keyed by factor name (spec §3, §4.2).
/// A `BTreeMap` keeps serialized output key-ordered and deterministic.
pub type SubScores = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    A,
    #[serde(rename = "B+")]
    BPlus,
    B,
    C,
    D,
    F,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub enum SuitabilityClass {
    Excellent,
    Good,
    Moderate,
    Poor,
    Unsuitable,
}

/// Scoring engine output (spec §3 `Verdict`).
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Verdict {
    pub score: i32,
    pub grade: Grade,
    pub suitability_class: SuitabilityClass,
    pub confidence: i32,
    pub constraint_violations: Vec<String>,
    pub calibration_adjustment: f64,
    #[schema(value_type = std::collections::BTreeMap<String, f64>)]
    pub sub_scores: SubScores,
    pub is_suitable: bool,
    pub algorithm_version: String,
    pub recommendation: String,
}

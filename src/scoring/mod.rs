//! Pure, deterministic scoring engine (spec §4.2). Takes acquired
//! `Features` and a `Query`, returns a `Verdict` with no calibration
//! applied yet — the calibrator's delta is folded in by the orchestrator
//! after this function returns (spec §4.2, §4.3).

mod normalize;

use std::collections::BTreeMap;

use crate::models::features::Features;
use crate::models::query::Query;
use crate::models::verdict::{Grade, SubScores, SuitabilityClass, Verdict, ALGORITHM_VERSION};

use normalize::{gaussian, inverted_sigmoid, sigmoid, step};

const WEIGHT_SOLAR: f64 = 0.30;
const WEIGHT_TEMPERATURE: f64 = 0.10;
const WEIGHT_ELEVATION: f64 = 0.10;
const WEIGHT_WIND: f64 = 0.08;
const WEIGHT_CLOUD: f64 = 0.10;
const WEIGHT_SLOPE: f64 = 0.10;
const WEIGHT_GRID: f64 = 0.12;
const WEIGHT_PLANT_FEASIBILITY: f64 = 0.10;

/// Headroom multiplier applied to the weighted sum before clamping (spec
/// §4.2): a site scoring perfectly on every factor still has margin
/// before hitting the 100 ceiling elsewhere in the table.
const AGGREGATION_HEADROOM: f64 = 1.05;

const SLOPE_BANDS: [(f64, f64); 4] = [(5.0, 1.00), (15.0, 0.65), (25.0, 0.30), (f64::INFINITY, 0.05)];

/// Reference irradiance used to normalize `plant_feasibility`'s
/// irradiance factor into `[0, 1]` (spec's `irradiance_factor` term is
/// undocumented beyond its role in this product; 7.0 kWh/m^2/day is near
/// the top of the realistic global range — see DESIGN.md).
const PLANT_FEASIBILITY_IRRADIANCE_REF: f64 = 7.0;
const PLANT_FEASIBILITY_SIGMOID_MIDPOINT: f64 = 0.5;
const PLANT_FEASIBILITY_SIGMOID_STEEPNESS: f64 = 8.0;

const MIN_SOLAR_IRRADIANCE: f64 = 2.0;
const MAX_SLOPE_DEGREES: f64 = 25.0;
const MAX_CLOUD_COVER_PCT: f64 = 90.0;
const MAX_GRID_DISTANCE_KM: f64 = 100.0;
const MIN_AREA_RATIO: f64 = 0.4;

/// Hard score ceiling for any site that trips a hard constraint (spec
/// §4.2): the grade/class table still runs, but the result is forced to
/// `Unsuitable` regardless of what the table would otherwise say.
const CONSTRAINT_VIOLATION_SCORE_CAP: i32 = 34;

/// Minimum score for `is_suitable` (spec §3): a site with no tripped hard
/// constraint can still score too low to recommend.
const MIN_SUITABLE_SCORE: i32 = 50;

fn plant_footprint_m2(plant_size_kw: f64) -> f64 {
    plant_size_kw * 8.0
}

fn sub_scores(features: &Features, query: &Query) -> SubScores {
    let mut scores = BTreeMap::new();
    scores.insert(
        "solar".to_string(),
        gaussian(features.solar_irradiance, 5.5, 1.5),
    );
    scores.insert(
        "temperature".to_string(),
        gaussian(features.temperature_c, 22.0, 8.0),
    );
    scores.insert(
        "elevation".to_string(),
        gaussian(features.elevation_m, 600.0, 800.0),
    );
    scores.insert("wind".to_string(), gaussian(features.wind_speed, 3.5, 2.0));
    scores.insert(
        "cloud".to_string(),
        inverted_sigmoid(features.cloud_cover_pct, 50.0, 0.06),
    );
    scores.insert("slope".to_string(), step(features.slope_degrees, &SLOPE_BANDS));
    scores.insert(
        "grid".to_string(),
        inverted_sigmoid(features.grid_distance_km, 25.0, 0.10),
    );
    scores.insert(
        "plant_feasibility".to_string(),
        plant_feasibility_score(features, query),
    );
    scores
}

fn plant_feasibility_score(features: &Features, query: &Query) -> f64 {
    let footprint = plant_footprint_m2(query.plant_size_kw);
    let area_ratio = match query.available_area_m2 {
        Some(area) => (area / footprint).min(1.0),
        None => 1.0,
    };
    let irradiance_factor = (features.solar_irradiance / PLANT_FEASIBILITY_IRRADIANCE_REF).clamp(0.0, 1.0);
    let feasibility = area_ratio * irradiance_factor;
    sigmoid(
        feasibility,
        PLANT_FEASIBILITY_SIGMOID_MIDPOINT,
        PLANT_FEASIBILITY_SIGMOID_STEEPNESS,
    )
}

fn weighted_sum(scores: &SubScores) -> f64 {
    scores.get("solar").copied().unwrap_or(0.0) * WEIGHT_SOLAR
        + scores.get("temperature").copied().unwrap_or(0.0) * WEIGHT_TEMPERATURE
        + scores.get("elevation").copied().unwrap_or(0.0) * WEIGHT_ELEVATION
        + scores.get("wind").copied().unwrap_or(0.0) * WEIGHT_WIND
        + scores.get("cloud").copied().unwrap_or(0.0) * WEIGHT_CLOUD
        + scores.get("slope").copied().unwrap_or(0.0) * WEIGHT_SLOPE
        + scores.get("grid").copied().unwrap_or(0.0) * WEIGHT_GRID
        + scores.get("plant_feasibility").copied().unwrap_or(0.0) * WEIGHT_PLANT_FEASIBILITY
}

fn constraint_violations(features: &Features, query: &Query) -> Vec<String> {
    let mut violations = Vec::new();
    if features.solar_irradiance < MIN_SOLAR_IRRADIANCE {
        violations.push(format!(
            "solar irradiance {:.2} kWh/m^2/day is below the minimum of {:.2}",
            features.solar_irradiance, MIN_SOLAR_IRRADIANCE
        ));
    }
    if features.slope_degrees > MAX_SLOPE_DEGREES {
        violations.push(format!(
            "slope {:.1} degrees exceeds the maximum of {:.1}",
            features.slope_degrees, MAX_SLOPE_DEGREES
        ));
    }
    if features.cloud_cover_pct > MAX_CLOUD_COVER_PCT {
        violations.push(format!(
            "cloud cover {:.1}% exceeds the maximum of {:.1}%",
            features.cloud_cover_pct, MAX_CLOUD_COVER_PCT
        ));
    }
    if features.grid_distance_km > MAX_GRID_DISTANCE_KM {
        violations.push(format!(
            "grid distance {:.1} km exceeds the maximum of {:.1} km",
            features.grid_distance_km, MAX_GRID_DISTANCE_KM
        ));
    }
    if let Some(area) = query.available_area_m2 {
        let required = MIN_AREA_RATIO * plant_footprint_m2(query.plant_size_kw);
        if area < required {
            violations.push(format!(
                "available area {area:.1} m^2 is below the minimum of {required:.1} m^2"
            ));
        }
    }
    violations
}

fn factor_agreement(scores: &SubScores) -> f64 {
    let values: Vec<f64> = scores.values().copied().collect();
    let mean = values.iter().sum::<f64>() / values.len() as f64;
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / values.len() as f64;
    (1.0 - variance / 2500.0).clamp(0.0, 1.0)
}

fn confidence(scores: &SubScores, features: &Features) -> i32 {
    let agreement = factor_agreement(scores);
    let source_coverage = features.data_sources as f64 / 4.0;
    let plausibility = (1.0 - 0.25 * features.impossible_input_count() as f64).max(0.0);
    let value = 0.50 * agreement + 0.30 * source_coverage + 0.20 * plausibility;
    (value * 100.0).round() as i32
}

fn grade_and_class(score: i32, has_violation: bool) -> (Grade, SuitabilityClass) {
    let (grade, class) = match score {
        88..=100 => (Grade::APlus, SuitabilityClass::Excellent),
        78..=87 => (Grade::A, SuitabilityClass::Excellent),
        68..=77 => (Grade::BPlus, SuitabilityClass::Good),
        58..=67 => (Grade::B, SuitabilityClass::Good),
        47..=57 => (Grade::C, SuitabilityClass::Moderate),
        35..=46 => (Grade::D, SuitabilityClass::Poor),
        _ => (Grade::F, SuitabilityClass::Unsuitable),
    };
    if has_violation {
        (grade, SuitabilityClass::Unsuitable)
    } else {
        (grade, class)
    }
}

fn recommendation(class: SuitabilityClass, violations: &[String]) -> String {
    if !violations.is_empty() {
        return format!(
            "Site does not meet minimum requirements: {}.",
            violations.join("; ")
        );
    }
    match class {
        SuitabilityClass::Excellent => {
            "Excellent site for solar deployment; proceed to detailed engineering review.".to_string()
        }
        SuitabilityClass::Good => {
            "Good site for solar deployment with minor constraints to manage.".to_string()
        }
        SuitabilityClass::Moderate => {
            "Moderately suitable; a detailed feasibility study is recommended before committing.".to_string()
        }
        SuitabilityClass::Poor => {
            "Poor site; solar deployment is discouraged without significant mitigation.".to_string()
        }
        SuitabilityClass::Unsuitable => "Site is unsuitable for solar deployment.".to_string(),
    }
}

/// Scores one acquired site. Returns a `Verdict` with `calibration_adjustment`
/// left at `0.0` — the orchestrator applies the regional calibrator's delta
/// afterward and re-derives the grade/class/recommendation from the final
/// score (spec §4.3, §4.5).
pub fn score(features: &Features, query: &Query) -> Verdict {
    let scores = sub_scores(features, query);
    let raw = (weighted_sum(&scores) * AGGREGATION_HEADROOM).clamp(0.0, 100.0);
    let violations = constraint_violations(features, query);
    let has_violation = !violations.is_empty();

    let mut final_score = raw.round() as i32;
    if has_violation {
        final_score = final_score.min(CONSTRAINT_VIOLATION_SCORE_CAP);
    }
    let (grade, class) = grade_and_class(final_score, has_violation);
    let confidence = confidence(&scores, features);
    let recommendation = recommendation(class, &violations);

    Verdict {
        score: final_score,
        grade,
        suitability_class: class,
        confidence,
        constraint_violations: violations,
        calibration_adjustment: 0.0,
        sub_scores: scores,
        is_suitable: final_score >= MIN_SUITABLE_SCORE && !has_violation,
        algorithm_version: ALGORITHM_VERSION.to_string(),
        recommendation,
    }
}

/// Re-derives grade/class/recommendation after the orchestrator folds in
/// the calibrator's delta, leaving `sub_scores`/`constraint_violations`
/// untouched (spec §4.3: calibration never changes which constraints were
/// violated, only the final numeric score and its banding).
pub fn apply_calibration(mut verdict: Verdict, delta: f64) -> Verdict {
    let has_violation = !verdict.constraint_violations.is_empty();
    let adjusted = (verdict.score as f64 + delta).round().clamp(0.0, 100.0) as i32;
    let mut final_score = adjusted;
    if has_violation {
        final_score = final_score.min(CONSTRAINT_VIOLATION_SCORE_CAP);
    }
    let (grade, class) = grade_and_class(final_score, has_violation);
    verdict.score = final_score;
    verdict.grade = grade;
    verdict.suitability_class = class;
    verdict.calibration_adjustment = delta;
    verdict.is_suitable = final_score >= MIN_SUITABLE_SCORE && !has_violation;
    verdict.recommendation = recommendation(class, &verdict.constraint_violations);
    verdict
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ideal_features() -> Features {
        Features {
            solar_irradiance: 5.5,
            wind_speed: 3.5,
            temperature_c: 22.0,
            humidity_pct: 40.0,
            cloud_cover_pct: 10.0,
            elevation_m: 600.0,
            slope_degrees: 2.0,
            grid_distance_km: 5.0,
            data_sources: 4,
        }
    }

    fn base_query() -> Query {
        Query {
            lat: 26.92,
            lng: 70.90,
            plant_size_kw: 20.0,
            electricity_rate: 8.0,
            available_area_m2: Some(200.0),
            installation_cost: None,
            grid_distance_km: None,
            panel_area: None,
            efficiency: None,
        }
    }

    #[test]
    fn weights_sum_to_one() {
        let total = WEIGHT_SOLAR
            + WEIGHT_TEMPERATURE
            + WEIGHT_ELEVATION
            + WEIGHT_WIND
            + WEIGHT_CLOUD
            + WEIGHT_SLOPE
            + WEIGHT_GRID
            + WEIGHT_PLANT_FEASIBILITY;
        assert!((total - 1.0).abs() < 1e-9);
    }

    #[test]
    fn ideal_site_scores_highly_and_in_range() {
        let verdict = score(&ideal_features(), &base_query());
        assert!(verdict.score > 70);
        assert!((0..=100).contains(&verdict.score));
        assert!((0..=100).contains(&verdict.confidence));
    }

    #[test]
    fn scoring_is_deterministic() {
        let f = ideal_features();
        let q = base_query();
        let a = score(&f, &q);
        let b = score(&f, &q);
        assert_eq!(a.score, b.score);
        assert_eq!(a.sub_scores, b.sub_scores);
    }

    #[test]
    fn weak_site_with_no_violation_is_not_suitable() {
        // Irradiance above the hard floor, slope/cloud/grid all within
        // limits, but every gaussian/sigmoid factor is far from its ideal
        // center, so the weighted score lands well under 50.
        let f = Features {
            solar_irradiance: 2.1,
            wind_speed: 0.2,
            temperature_c: -5.0,
            humidity_pct: 90.0,
            cloud_cover_pct: 85.0,
            elevation_m: 3000.0,
            slope_degrees: 20.0,
            grid_distance_km: 95.0,
            data_sources: 2,
        };
        let verdict = score(&f, &base_query());
        assert!(verdict.constraint_violations.is_empty());
        assert!(verdict.score < MIN_SUITABLE_SCORE);
        assert!(!verdict.is_suitable);
    }

    #[test]
    fn low_irradiance_triggers_constraint_and_caps_score() {
        let mut f = ideal_features();
        f.solar_irradiance = 1.0;
        let verdict = score(&f, &base_query());
        assert!(verdict.score <= CONSTRAINT_VIOLATION_SCORE_CAP);
        assert_eq!(verdict.suitability_class, SuitabilityClass::Unsuitable);
        assert!(!verdict.is_suitable);
    }

    #[test]
    fn steep_slope_exactly_at_boundary_is_not_a_violation() {
        let mut f = ideal_features();
        f.slope_degrees = 25.0;
        let verdict = score(&f, &base_query());
        assert!(verdict.constraint_violations.is_empty());
    }

    #[test]
    fn slope_just_past_boundary_is_a_violation() {
        let mut f = ideal_features();
        f.slope_degrees = 25.01;
        let verdict = score(&f, &base_query());
        assert!(!verdict.constraint_violations.is_empty());
    }

    #[test]
    fn insufficient_area_is_a_violation() {
        let mut q = base_query();
        q.available_area_m2 = Some(1.0);
        let verdict = score(&ideal_features(), &q);
        assert!(verdict
            .constraint_violations
            .iter()
            .any(|v| v.contains("area")));
    }

    #[test]
    fn apply_calibration_reclassifies_score() {
        let verdict = score(&ideal_features(), &base_query());
        let before = verdict.score;
        let adjusted = apply_calibration(verdict, 10.0);
        assert_eq!(adjusted.score, (before + 10).min(100));
        assert_eq!(adjusted.calibration_adjustment, 10.0);
    }

    #[test]
    fn apply_calibration_keeps_violations_capped() {
        let mut f = ideal_features();
        f.solar_irradiance = 1.0;
        let verdict = score(&f, &base_query());
        let adjusted = apply_calibration(verdict, 50.0);
        assert!(adjusted.score <= CONSTRAINT_VIOLATION_SCORE_CAP);
    }
}

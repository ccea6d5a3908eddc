//! Financial engine (spec §4.4). Pure, deterministic capacity-first yield,
//! payback and subsidy calculator — takes a scored query's inputs and
//! returns projections, never touching the network or any shared state.

use crate::config::Config;
use crate::models::features::Features;
use crate::models::financial::Financial;
use crate::models::query::Query;

const PLANT_LIFETIME_YEARS: u32 = 25;
const ANNUAL_DEGRADATION: f64 = 0.005;
const PERFORMANCE_RATIO: f64 = 0.80;
const DAYS_PER_YEAR: f64 = 365.0;

/// `(max_system_size_kwp, subsidy_amount)`, ascending by size — a sorted
/// table scanned linearly rather than a branch-per-tier match, matching
/// this product's table-driven banding elsewhere (sub-scores, grades).
const SUBSIDY_TIERS: &[(f64, f64)] = &[(1.0, 30_000.0), (2.0, 60_000.0), (3.0, 78_000.0), (10.0, 78_000.0)];

pub struct FinancialEngine {
    installation_rate_per_kw: f64,
    land_area_per_kw_m2: f64,
}

impl FinancialEngine {
    pub fn new(config: &Config) -> Self {
        Self {
            installation_rate_per_kw: config.installation_rate_per_kw,
            land_area_per_kw_m2: config.land_area_per_kw_m2,
        }
    }

    pub fn calculate(&self, query: &Query, features: &Features) -> Financial {
        // `installation_cost = Some(0.0)` is the wire-documented "auto from
        // capacity" sentinel, not a real zero cost (spec §3) — treat it the
        // same as `None`.
        let installation_cost_override = query.installation_cost.filter(|c| *c > 0.0);

        // Legacy area-first mode (spec §4.4): when the caller supplies an
        // explicit installation cost alongside `panel_area`/`efficiency`,
        // derive `system_size_kwp` from the panel footprint instead of
        // trusting `plant_size_kw`.
        let (system_size_kwp, installation_cost) =
            match (installation_cost_override, query.panel_area, query.efficiency) {
                (Some(cost), Some(panel_area), Some(efficiency)) => (panel_area * efficiency, cost),
                (Some(cost), _, _) => (query.plant_size_kw, cost),
                (None, _, _) => (
                    query.plant_size_kw,
                    query.plant_size_kw * self.installation_rate_per_kw,
                ),
            };
        let required_land_area_m2 = system_size_kwp * self.land_area_per_kw_m2;

        let annual_energy_kwh =
            system_size_kwp * features.solar_irradiance * DAYS_PER_YEAR * PERFORMANCE_RATIO;
        let annual_savings = annual_energy_kwh * query.electricity_rate;

        let lifetime_degradation_factor = degradation_series_sum(ANNUAL_DEGRADATION, PLANT_LIFETIME_YEARS);
        let lifetime_revenue = annual_savings * lifetime_degradation_factor;
        let lifetime_profit = lifetime_revenue - installation_cost;

        let payback_years = payback(installation_cost, annual_savings);

        let subsidy_amount = subsidy_for(system_size_kwp);
        let net_cost_after_subsidy = (installation_cost - subsidy_amount).max(0.0);
        let payback_years_after_subsidy = payback(net_cost_after_subsidy, annual_savings);
        let lifetime_profit_after_subsidy = lifetime_revenue - net_cost_after_subsidy;

        Financial {
            annual_energy_kwh,
            annual_savings,
            installation_cost,
            payback_years,
            lifetime_profit,
            subsidy_amount,
            net_cost_after_subsidy,
            payback_years_after_subsidy,
            lifetime_profit_after_subsidy,
            system_size_kwp,
            required_land_area_m2,
        }
    }
}

/// `sum_{k=0}^{years-1} (1 - rate)^k`, the closed-form geometric series
/// behind the 25-year degraded-output total (spec §4.4, §8 exactness
/// requirement).
fn degradation_series_sum(rate: f64, years: u32) -> f64 {
    let r = 1.0 - rate;
    (0..years).map(|k| r.powi(k as i32)).sum()
}

fn payback(cost: f64, annual_savings: f64) -> f64 {
    if annual_savings <= 0.0 {
        f64::INFINITY
    } else {
        cost / annual_savings
    }
}

/// Tiered subsidy lookup (spec §4.4): the first tier whose size cap is
/// `>=` the system size wins; anything larger than the largest tier gets
/// no subsidy at all.
fn subsidy_for(system_size_kwp: f64) -> f64 {
    for (max_kwp, amount) in SUBSIDY_TIERS {
        if system_size_kwp <= *max_kwp {
            return *amount;
        }
    }
    0.0
}

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Financial engine output (spec §3 `Financial`). `payback_years` and its
/// subsidized counterpart use `f64::INFINITY` for the "never pays back"
/// case (spec §4.4, §8 boundary behaviour) — serialized as a JSON string
/// since JSON has no native infinity literal.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Financial {
    pub annual_energy_kwh: f64,
    pub annual_savings: f64,
    pub installation_cost: f64,
    #[serde(with = "finite_or_infinite")]
    #[schema(value_type = f64)]
    pub payback_years: f64,
    pub lifetime_profit: f64,
    pub subsidy_amount: f64,
    pub net_cost_after_subsidy: f64,
    #[serde(with = "finite_or_infinite")]
    #[schema(value_type = f64)]
    pub payback_years_after_subsidy: f64,
    pub lifetime_profit_after_subsidy: f64,
    pub system_size_kwp: f64,
    pub required_land_area_m2: f64,
}

/// Serializes `f64::INFINITY` as the JSON string `"Infinity"` and any
/// other value as a normal JSON number, since `serde_json` refuses to
/// emit a bare `Infinity` token.
mod finite_or_infinite {
    use serde::{de::Error as DeError, Deserialize, Deserializer, Serialize, Serializer};

    pub fn serialize<S: Serializer>(v: &f64, s: S) -> Result<S::Ok, S::Error> {
        if v.is_finite() {
            v.serialize(s)
        } else if v.is_sign_positive() {
            s.serialize_str("Infinity")
        } else {
            s.serialize_str("-Infinity")
        }
    }

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum NumOrStr {
        Num(f64),
        Str(String),
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
        match NumOrStr::deserialize(d)? {
            NumOrStr::Num(n) => Ok(n),
            NumOrStr::Str(s) if s == "Infinity" => Ok(f64::INFINITY),
            NumOrStr::Str(s) if s == "-Infinity" => Ok(f64::NEG_INFINITY),
            NumOrStr::Str(s) => s
                .parse::<f64>()
                .map_err(|e| DeError::custom(e.to_string())),
        }
    }
}

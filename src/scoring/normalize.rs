//! Pure 0-100 normalization primitives (spec §4.2). No I/O, no state —
//! every function here is a closed-form expression of its inputs.

/// Bell curve centered on `mu` with spread `sigma`, scaled to `[0, 100]`.
pub fn gaussian(x: f64, mu: f64, sigma: f64) -> f64 {
    let z = (x - mu) / sigma;
    100.0 * (-0.5 * z * z).exp()
}

/// Logistic curve with midpoint `m` and steepness `k`, scaled to `[0, 100]`.
pub fn sigmoid(x: f64, m: f64, k: f64) -> f64 {
    100.0 / (1.0 + (-k * (x - m)).exp())
}

/// `1 - sigmoid`, for factors where a larger `x` is worse (cloud cover,
/// grid distance).
pub fn inverted_sigmoid(x: f64, m: f64, k: f64) -> f64 {
    100.0 - sigmoid(x, m, k)
}

/// Piecewise-constant score from ascending `(upper_bound, value)` bands,
/// where `value` is a fraction of 100 (e.g. `0.65`). The last band is the
/// catch-all for any `x` past every `upper_bound`.
pub fn step(x: f64, bands: &[(f64, f64)]) -> f64 {
    for (upper_bound, value) in bands {
        if x < *upper_bound {
            return value * 100.0;
        }
    }
    bands.last().map(|(_, v)| v * 100.0).unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gaussian_peaks_at_mean() {
        assert!((gaussian(5.5, 5.5, 1.5) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn gaussian_decays_away_from_mean() {
        assert!(gaussian(0.0, 5.5, 1.5) < gaussian(4.0, 5.5, 1.5));
    }

    #[test]
    fn sigmoid_is_half_at_midpoint() {
        assert!((sigmoid(50.0, 50.0, 0.06) - 50.0).abs() < 1e-9);
    }

    #[test]
    fn inverted_sigmoid_complements_sigmoid() {
        let x = 30.0;
        let (m, k) = (25.0, 0.10);
        assert!((sigmoid(x, m, k) + inverted_sigmoid(x, m, k) - 100.0).abs() < 1e-9);
    }

    #[test]
    fn step_picks_first_matching_band() {
        let bands = [(5.0, 1.00), (15.0, 0.65), (25.0, 0.30), (f64::INFINITY, 0.05)];
        assert_eq!(step(2.0, &bands), 100.0);
        assert_eq!(step(10.0, &bands), 65.0);
        assert_eq!(step(20.0, &bands), 30.0);
        assert_eq!(step(30.0, &bands), 5.0);
    }

    #[test]
    fn step_uses_last_band_when_past_every_bound() {
        let bands = [(5.0, 1.00)];
        assert_eq!(step(100.0, &bands), 100.0);
    }
}

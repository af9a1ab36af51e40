//! Maintainability index.
//!
//! MI = 171 - 3.42 * ln(E) - 0.23 * CC - 16.2 * ln(LLOC)
//!
//! where E is Halstead effort, CC cyclomatic complexity and LLOC logical
//! lines. Logarithm arguments below 1 are clamped to 1. With `rescale`,
//! the result is mapped onto 0..100 and floored at 0.

/// Compute the maintainability index.
pub fn maintainability_index(effort: f64, cyclomatic: f64, logical_sloc: f64, rescale: bool) -> f64 {
    let mi = 171.0 - 3.42 * effort.max(1.0).ln() - 0.23 * cyclomatic - 16.2 * logical_sloc.max(1.0).ln();
    if rescale {
        (mi * 100.0 / 171.0).max(0.0)
    } else {
        mi
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trivial_input_is_max() {
        let mi = maintainability_index(0.0, 0.0, 0.0, false);
        assert!((mi - 171.0).abs() < 1e-9);
        let rescaled = maintainability_index(0.0, 0.0, 0.0, true);
        assert!((rescaled - 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_known_value() {
        // 171 - 3.42*ln(1000) - 0.23*5 - 16.2*ln(20)
        let expected = 171.0 - 3.42 * 1000f64.ln() - 1.15 - 16.2 * 20f64.ln();
        let mi = maintainability_index(1000.0, 5.0, 20.0, false);
        assert!((mi - expected).abs() < 1e-9);
    }

    #[test]
    fn test_rescaled_never_negative() {
        let mi = maintainability_index(1e30, 5000.0, 1e9, true);
        assert_eq!(mi, 0.0);
        assert!(maintainability_index(1e30, 5000.0, 1e9, false) < 0.0);
    }

    #[test]
    fn test_more_complexity_lowers_score() {
        let simple = maintainability_index(500.0, 2.0, 10.0, true);
        let complex = maintainability_index(5000.0, 20.0, 100.0, true);
        assert!(complex < simple);
    }
}

/// Feature derivation and efficiency rating.
///
/// Live readings arrive in W/m²; the model takes kW/m². Module temperature
/// is estimated from air temperature plus an irradiance-proportional offset
/// (panels run hotter than ambient air under load). The rating compares a
/// user-reported inverter reading against the retained model prediction and
/// classifies the shortfall into three tiers.

use crate::models::forecast::{EfficiencyAssessment, ModelFeatures, Severity};

/// Thermal offset of the module above ambient air, °C per W/m².
pub const MODULE_TEMP_COEFF: f64 = 0.025;

// Manual-simulation input bounds (min, max).
pub const IRRADIANCE_RANGE_KW_M2: (f64, f64) = (0.0, 1.2);
pub const AIR_TEMP_RANGE_C: (f64, f64) = (15.0, 45.0);
pub const MODULE_TEMP_RANGE_C: (f64, f64) = (20.0, 75.0);

const EXCELLENT_THRESHOLD_PCT: f64 = 95.0;
const FAIR_THRESHOLD_PCT: f64 = 80.0;

/// Convert a live weather reading into the model's input vector.
pub fn derive_features(air_temp_c: f64, irradiance_w_m2: f64) -> ModelFeatures {
    ModelFeatures {
        irradiance_kw_m2: irradiance_w_m2 / 1000.0,
        air_temp_c,
        module_temp_c: air_temp_c + irradiance_w_m2 * MODULE_TEMP_COEFF,
    }
}

/// Rate an actual inverter reading against the predicted output.
///
/// Returns `None` when `actual_kw` is zero or negative (no reading to rate,
/// not an error) and when `predicted_kw` is not positive — a non-positive
/// forecast gives no baseline, so no rating is computed rather than dividing
/// by zero. The caller decides how to report the latter case.
pub fn evaluate(predicted_kw: f64, actual_kw: f64) -> Option<EfficiencyAssessment> {
    if actual_kw <= 0.0 || predicted_kw <= 0.0 {
        return None;
    }

    let efficiency_pct = (actual_kw / predicted_kw) * 100.0;
    let loss_kw = predicted_kw - actual_kw;
    let severity = classify(efficiency_pct);

    let message = match severity {
        Severity::Excellent => "System is performing optimally.".to_string(),
        Severity::Fair => format!(
            "You are losing {:.2} kW. Consider cleaning the panels.",
            loss_kw
        ),
        Severity::Critical => format!(
            "High efficiency loss: {:.2} kW missing. Check for faults.",
            loss_kw
        ),
    };

    Some(EfficiencyAssessment {
        actual_power_kw: actual_kw,
        efficiency_pct,
        loss_kw,
        severity,
        message,
        progress: progress_fraction(efficiency_pct),
    })
}

/// Three-tier rating, first match wins. Both thresholds are inclusive on the
/// upper tier: exactly 95% is Excellent, exactly 80% is Fair.
pub fn classify(efficiency_pct: f64) -> Severity {
    match efficiency_pct {
        p if p >= EXCELLENT_THRESHOLD_PCT => Severity::Excellent,
        p if p >= FAIR_THRESHOLD_PCT => Severity::Fair,
        _ => Severity::Critical,
    }
}

/// Fill level for the rating bar. Over-100% efficiency shows a full bar; the
/// reported percentage itself is never clamped.
pub fn progress_fraction(efficiency_pct: f64) -> f64 {
    (efficiency_pct / 100.0).clamp(0.0, 1.0)
}

/// First out-of-range manual input, as a user-facing message.
pub fn manual_bounds_error(features: &ModelFeatures) -> Option<String> {
    fn outside(value: f64, (min, max): (f64, f64)) -> bool {
        value < min || value > max
    }

    if outside(features.irradiance_kw_m2, IRRADIANCE_RANGE_KW_M2) {
        return Some(format!(
            "Irradiance must be between {:.1} and {:.1} kW/m².",
            IRRADIANCE_RANGE_KW_M2.0, IRRADIANCE_RANGE_KW_M2.1
        ));
    }
    if outside(features.air_temp_c, AIR_TEMP_RANGE_C) {
        return Some(format!(
            "Air temperature must be between {:.0} and {:.0} °C.",
            AIR_TEMP_RANGE_C.0, AIR_TEMP_RANGE_C.1
        ));
    }
    if outside(features.module_temp_c, MODULE_TEMP_RANGE_C) {
        return Some(format!(
            "Module temperature must be between {:.0} and {:.0} °C.",
            MODULE_TEMP_RANGE_C.0, MODULE_TEMP_RANGE_C.1
        ));
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_close(left: f64, right: f64) {
        assert!(
            (left - right).abs() < 1e-9,
            "expected {right}, got {left}"
        );
    }

    #[test]
    fn derives_model_units_from_raw_reading() {
        let features = derive_features(25.0, 800.0);
        assert_eq!(features.irradiance_kw_m2, 0.8);
        assert_eq!(features.air_temp_c, 25.0);
        assert_close(features.module_temp_c, 45.0);
    }

    #[test]
    fn zero_irradiance_leaves_module_at_air_temperature() {
        let features = derive_features(18.5, 0.0);
        assert_eq!(features.irradiance_kw_m2, 0.0);
        assert_eq!(features.module_temp_c, 18.5);
    }

    #[test]
    fn rates_excellent_above_95_percent() {
        let assessment = evaluate(10.0, 9.6).unwrap();
        assert_close(assessment.efficiency_pct, 96.0);
        assert_close(assessment.loss_kw, 0.4);
        assert_eq!(assessment.severity, Severity::Excellent);
    }

    #[test]
    fn rates_fair_between_80_and_95_percent() {
        let assessment = evaluate(10.0, 8.5).unwrap();
        assert_close(assessment.efficiency_pct, 85.0);
        assert_close(assessment.loss_kw, 1.5);
        assert_eq!(assessment.severity, Severity::Fair);
        assert!(assessment.message.contains("1.50 kW"));
    }

    #[test]
    fn rates_critical_below_80_percent() {
        let assessment = evaluate(10.0, 5.0).unwrap();
        assert_close(assessment.efficiency_pct, 50.0);
        assert_close(assessment.loss_kw, 5.0);
        assert_eq!(assessment.severity, Severity::Critical);
        assert!(assessment.message.contains("5.00 kW"));
    }

    #[test]
    fn tier_boundaries_are_inclusive_on_the_upper_tier() {
        assert_eq!(classify(95.0), Severity::Excellent);
        assert_eq!(classify(94.9), Severity::Fair);
        assert_eq!(classify(80.0), Severity::Fair);
        assert_eq!(classify(79.9), Severity::Critical);
        assert_eq!(classify(120.0), Severity::Excellent);
        assert_eq!(classify(0.1), Severity::Critical);
    }

    #[test]
    fn zero_reading_produces_no_assessment() {
        assert!(evaluate(10.0, 0.0).is_none());
        assert!(evaluate(10.0, -1.0).is_none());
    }

    #[test]
    fn zero_prediction_produces_no_assessment() {
        assert!(evaluate(0.0, 5.0).is_none());
        assert!(evaluate(-0.2, 5.0).is_none());
    }

    #[test]
    fn progress_is_clamped_but_percentage_is_not() {
        let assessment = evaluate(10.0, 12.0).unwrap();
        assert_close(assessment.efficiency_pct, 120.0);
        assert_eq!(assessment.progress, 1.0);

        assert_eq!(progress_fraction(250.0), 1.0);
        assert_close(progress_fraction(50.0), 0.5);
        assert_eq!(progress_fraction(0.0), 0.0);
    }

    #[test]
    fn manual_bounds_reject_out_of_range_inputs() {
        let ok = ModelFeatures {
            irradiance_kw_m2: 0.8,
            air_temp_c: 32.0,
            module_temp_c: 50.0,
        };
        assert!(manual_bounds_error(&ok).is_none());

        let hot_module = ModelFeatures {
            module_temp_c: 80.0,
            ..ok
        };
        assert!(manual_bounds_error(&hot_module).unwrap().contains("Module temperature"));

        let negative_irradiance = ModelFeatures {
            irradiance_kw_m2: -0.1,
            ..ok
        };
        assert!(manual_bounds_error(&negative_irradiance).unwrap().contains("Irradiance"));

        let cold_air = ModelFeatures {
            air_temp_c: 10.0,
            ..ok
        };
        assert!(manual_bounds_error(&cold_air).unwrap().contains("Air temperature"));
    }

    #[test]
    fn bounds_are_inclusive_at_their_endpoints() {
        let at_min = ModelFeatures {
            irradiance_kw_m2: 0.0,
            air_temp_c: 15.0,
            module_temp_c: 20.0,
        };
        assert!(manual_bounds_error(&at_min).is_none());

        let at_max = ModelFeatures {
            irradiance_kw_m2: 1.2,
            air_temp_c: 45.0,
            module_temp_c: 75.0,
        };
        assert!(manual_bounds_error(&at_max).is_none());
    }
}

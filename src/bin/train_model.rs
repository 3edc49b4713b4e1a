//! Trains the regression artifact served by the forecaster.
//!
//! The forecaster itself never trains anything — it loads the JSON artifact
//! written here. Training data is a deterministic sweep over the manual-mode
//! input ranges, labelled with the standard PV power equation
//! `P = P_nom × (G/1000) × (1 + α·(T_module − 25))`, α = −0.004/°C.
//! Module temperature varies around its irradiance-derived value so the
//! three feature columns stay linearly independent.

use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::{LinearRegression, LinearRegressionParameters};
use std::error::Error;
use std::fs::File;
use std::io::BufWriter;

/// Peak DC capacity of the reference plant (kW).
const NOMINAL_POWER_KW: f64 = 12.0;
/// Power temperature coefficient (1/°C).
const TEMP_COEFF: f64 = -0.004;
/// Module runs hotter than air by this much per W/m² of irradiance.
const MODULE_TEMP_OFFSET_PER_W_M2: f64 = 0.025;

const DEFAULT_OUTPUT: &str = "solar_model.json";

fn expected_power_kw(irradiance_kw_m2: f64, module_temp_c: f64) -> f64 {
    let temp_factor = 1.0 + TEMP_COEFF * (module_temp_c - 25.0);
    (NOMINAL_POWER_KW * irradiance_kw_m2 * temp_factor).max(0.0)
}

fn training_grid() -> (Vec<Vec<f64>>, Vec<f64>) {
    let mut rows = Vec::new();
    let mut targets = Vec::new();

    let mut irradiance_w_m2 = 0.0;
    while irradiance_w_m2 <= 1200.0 {
        let mut air_temp_c = 15.0;
        while air_temp_c <= 45.0 {
            let derived_module_temp =
                air_temp_c + irradiance_w_m2 * MODULE_TEMP_OFFSET_PER_W_M2;
            // Spread around the derived value — manual mode sets module
            // temperature independently of air temperature.
            for module_offset in [-5.0, 0.0, 5.0] {
                let module_temp_c = derived_module_temp + module_offset;
                let irradiance_kw_m2 = irradiance_w_m2 / 1000.0;
                rows.push(vec![irradiance_kw_m2, air_temp_c, module_temp_c]);
                targets.push(expected_power_kw(irradiance_kw_m2, module_temp_c));
            }
            air_temp_c += 2.5;
        }
        irradiance_w_m2 += 50.0;
    }

    (rows, targets)
}

fn main() -> Result<(), Box<dyn Error>> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_OUTPUT.to_string());

    let (rows, targets) = training_grid();
    println!("Training on {} samples", targets.len());

    let x = DenseMatrix::from_2d_vec(&rows)?;
    let model = LinearRegression::fit(&x, &targets, LinearRegressionParameters::default())?;

    // Fit quality on the training grid
    let fitted = model.predict(&x)?;
    let mse: f64 = fitted
        .iter()
        .zip(&targets)
        .map(|(f, t)| (f - t).powi(2))
        .sum::<f64>()
        / targets.len() as f64;
    println!("Training RMSE: {:.4} kW", mse.sqrt());

    let file = File::create(&output)?;
    serde_json::to_writer(BufWriter::new(file), &model)?;
    println!("Model written to {}", output);

    Ok(())
}

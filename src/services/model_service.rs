/// Regression model wrapper.
///
/// The artifact is a smartcore linear regression serialized as JSON by the
/// `train_model` binary. It is loaded exactly once at startup; the serving
/// process never trains or mutates it.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use smartcore::linalg::basic::matrix::DenseMatrix;
use smartcore::linear::linear_regression::LinearRegression;
use thiserror::Error;

use crate::models::forecast::ModelFeatures;

pub type SolarRegressor = LinearRegression<f64, f64, DenseMatrix<f64>, Vec<f64>>;

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("model artifact unreadable: {0}")]
    Io(#[from] std::io::Error),
    #[error("model artifact malformed: {0}")]
    Format(#[from] serde_json::Error),
    #[error("prediction failed: {0}")]
    Inference(String),
}

#[derive(Debug)]
pub struct PowerModel {
    model: SolarRegressor,
}

impl PowerModel {
    pub fn load(path: &Path) -> Result<Self, ModelError> {
        let file = File::open(path)?;
        Self::from_reader(BufReader::new(file))
    }

    pub fn from_reader(reader: impl Read) -> Result<Self, ModelError> {
        let model = serde_json::from_reader(reader)?;
        Ok(Self { model })
    }

    /// Single-sample prediction over the ordered vector
    /// `[irradiance_kw_m2, air_temp_c, module_temp_c]`.
    pub fn predict(&self, features: &ModelFeatures) -> Result<f64, ModelError> {
        let input = DenseMatrix::from_2d_vec(&vec![vec![
            features.irradiance_kw_m2,
            features.air_temp_c,
            features.module_temp_c,
        ]])
        .map_err(|e| ModelError::Inference(e.to_string()))?;

        let output = self
            .model
            .predict(&input)
            .map_err(|e| ModelError::Inference(e.to_string()))?;

        output
            .first()
            .copied()
            .ok_or_else(|| ModelError::Inference("model returned no output".to_string()))
    }
}

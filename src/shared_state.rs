use std::sync::{Arc, RwLock};
use std::time::Instant;

use axum::extract::FromRef;

use crate::config::Config;
use crate::models::forecast::ForecastSession;
use crate::services::model_service::PowerModel;

#[derive(Clone)]
pub struct AppState {
    /// Regression model, loaded once at startup.
    pub model: Arc<PowerModel>,
    /// Latest live forecast; overwritten by each successful forecast,
    /// untouched when resolution fails.
    session: Arc<RwLock<Option<ForecastSession>>>,
    started_at: Instant,
}

impl AppState {
    pub fn new(model: PowerModel) -> Self {
        Self {
            model: Arc::new(model),
            session: Arc::new(RwLock::new(None)),
            started_at: Instant::now(),
        }
    }

    pub fn set_session(&self, session: ForecastSession) {
        if let Ok(mut current) = self.session.write() {
            *current = Some(session);
        }
    }

    pub fn session(&self) -> Option<ForecastSession> {
        if let Ok(current) = self.session.read() {
            current.clone()
        } else {
            None
        }
    }

    pub fn has_session(&self) -> bool {
        self.session
            .read()
            .map(|current| current.is_some())
            .unwrap_or(false)
    }

    pub fn uptime_seconds(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Handlers extract `State<AppState>` and/or `State<Config>` via
/// `FromRef<SharedState>` — a single `.with_state(shared)` covers both.
#[derive(Clone)]
pub struct SharedState {
    pub app: AppState,
    pub config: Config,
}

impl FromRef<SharedState> for AppState {
    fn from_ref(shared: &SharedState) -> Self {
        shared.app.clone()
    }
}

impl FromRef<SharedState> for Config {
    fn from_ref(shared: &SharedState) -> Self {
        shared.config.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::forecast::{
        ModelFeatures, PredictionResult, WeatherSnapshot,
    };
    use smartcore::linalg::basic::matrix::DenseMatrix;
    use smartcore::linear::linear_regression::{
        LinearRegression, LinearRegressionParameters,
    };

    fn test_model() -> PowerModel {
        let rows = vec![
            vec![0.0, 15.0, 20.0],
            vec![0.3, 20.0, 28.0],
            vec![0.6, 25.0, 40.0],
            vec![0.9, 30.0, 55.0],
            vec![1.2, 40.0, 70.0],
        ];
        let targets: Vec<f64> = rows.iter().map(|r| 10.0 * r[0]).collect();
        let x = DenseMatrix::from_2d_vec(&rows).unwrap();
        let model =
            LinearRegression::fit(&x, &targets, LinearRegressionParameters::default()).unwrap();
        let bytes = serde_json::to_vec(&model).unwrap();
        PowerModel::from_reader(bytes.as_slice()).unwrap()
    }

    fn session_for(city: &str, predicted_kw: f64) -> ForecastSession {
        ForecastSession {
            snapshot: WeatherSnapshot {
                location_name: city.to_string(),
                air_temp_c: 25.0,
                irradiance_w_m2: 800.0,
                wind_speed_m_s: 8.0,
            },
            features: ModelFeatures {
                irradiance_kw_m2: 0.8,
                air_temp_c: 25.0,
                module_temp_c: 45.0,
            },
            prediction: PredictionResult {
                predicted_power_kw: predicted_kw,
                predicted_at: chrono::Utc::now(),
            },
        }
    }

    #[test]
    fn starts_without_a_session() {
        let state = AppState::new(test_model());
        assert!(!state.has_session());
        assert!(state.session().is_none());
    }

    #[test]
    fn new_forecast_overwrites_the_retained_one() {
        let state = AppState::new(test_model());

        state.set_session(session_for("Pune", 10.0));
        assert!(state.has_session());
        assert_eq!(
            state.session().unwrap().prediction.predicted_power_kw,
            10.0
        );

        state.set_session(session_for("Nagpur", 7.5));
        let retained = state.session().unwrap();
        assert_eq!(retained.snapshot.location_name, "Nagpur");
        assert_eq!(retained.prediction.predicted_power_kw, 7.5);
    }
}

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

// ─── Core forecast data ──────────────────────────────────────────────────────

/// Current conditions at a resolved location, as read from the weather API.
/// Overwritten on every lookup; never stored beyond the active session.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct WeatherSnapshot {
    pub location_name: String,
    /// Air temperature at 2 m (°C)
    pub air_temp_c: f64,
    /// Shortwave radiation, used as the irradiance reading (W/m²)
    pub irradiance_w_m2: f64,
    /// Wind speed at 10 m (m/s)
    pub wind_speed_m_s: f64,
}

/// Ordered input vector for the regression model:
/// `[irradiance_kw_m2, air_temp_c, module_temp_c]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema)]
pub struct ModelFeatures {
    /// Irradiance in model units (kW/m²)
    pub irradiance_kw_m2: f64,
    pub air_temp_c: f64,
    /// Estimated panel operating temperature (°C)
    pub module_temp_c: f64,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PredictionResult {
    pub predicted_power_kw: f64,
    pub predicted_at: DateTime<Utc>,
}

/// Everything retained from the last successful live forecast. Held until the
/// next forecast overwrites it; efficiency ratings are computed against it on
/// demand and never stored.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ForecastSession {
    pub snapshot: WeatherSnapshot,
    pub features: ModelFeatures,
    pub prediction: PredictionResult,
}

// ─── Efficiency rating ───────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Severity {
    Excellent,
    Fair,
    Critical,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct EfficiencyAssessment {
    pub actual_power_kw: f64,
    /// Actual over predicted, in percent. Not clamped.
    pub efficiency_pct: f64,
    pub loss_kw: f64,
    pub severity: Severity,
    pub message: String,
    /// Fill level for the rating bar, always within [0, 1].
    pub progress: f64,
}

// ─── Open-Meteo wire types ───────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct GeocodingResponse {
    /// Absent entirely when the query matches nothing.
    #[serde(default)]
    pub results: Vec<GeocodingMatch>,
}

#[derive(Debug, Deserialize)]
pub struct GeocodingMatch {
    pub latitude: f64,
    pub longitude: f64,
    pub name: String,
}

#[derive(Debug, Deserialize)]
pub struct CurrentWeatherResponse {
    pub current: CurrentConditions,
}

#[derive(Debug, Deserialize)]
pub struct CurrentConditions {
    pub temperature_2m: f64,
    pub shortwave_radiation: f64,
    pub wind_speed_10m: f64,
}

// ─── REST API request/response types ─────────────────────────────────────────

#[derive(Debug, Deserialize, ToSchema)]
pub struct ForecastRequest {
    pub city: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct EfficiencyRequest {
    pub actual_power_kw: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SimulateResponse {
    pub features: ModelFeatures,
    pub predicted_power_kw: f64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SliderRange {
    pub min: f64,
    pub max: f64,
}

/// Defaults and input bounds the front-end renders its controls from.
#[derive(Debug, Serialize, ToSchema)]
pub struct UiDefaults {
    pub default_city: String,
    pub irradiance_kw_m2: SliderRange,
    pub air_temp_c: SliderRange,
    pub module_temp_c: SliderRange,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthStatus {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub has_prediction: bool,
}

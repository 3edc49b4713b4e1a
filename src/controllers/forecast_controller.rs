use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use chrono::Utc;
use tracing::{info, warn};

use crate::config::Config;
use crate::models::forecast::{
    EfficiencyAssessment, EfficiencyRequest, ForecastRequest, ForecastSession, HealthStatus,
    ModelFeatures, PredictionResult, SimulateResponse, SliderRange, UiDefaults,
};
use crate::services::weather_service::WeatherError;
use crate::services::{efficiency, weather_service};
use crate::shared_state::AppState;

/// POST /api/forecast
/// Live mode: resolve a city, predict its expected output, retain the result
///
/// Geocodes the city, reads current conditions, derives the model features and runs the
/// regression. The returned session is retained so a later efficiency rating can be
/// computed against it; it is left untouched when resolution fails.
#[utoipa::path(
    post,
    path = "/api/forecast",
    request_body = ForecastRequest,
    responses(
        (status = 200, description = "Forecast computed and retained", body = ForecastSession),
        (status = 404, description = "City not found"),
        (status = 422, description = "Empty city name"),
        (status = 502, description = "Weather service unreachable or returned an unreadable payload"),
        (status = 500, description = "Model inference failed")
    )
)]
pub async fn create_forecast(
    State(app): State<AppState>,
    State(config): State<Config>,
    Json(request): Json<ForecastRequest>,
) -> impl IntoResponse {
    let city = request.city.trim();
    if city.is_empty() {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": "City name must not be empty."})),
        )
            .into_response();
    }

    let snapshot = match weather_service::resolve_city(&config.weather, city).await {
        Ok(snapshot) => snapshot,
        Err(WeatherError::CityNotFound) => {
            return (
                StatusCode::NOT_FOUND,
                Json(serde_json::json!({"error": "City not found."})),
            )
                .into_response();
        }
        Err(e) => {
            warn!("weather resolution failed for {}: {}", city, e);
            return (
                StatusCode::BAD_GATEWAY,
                Json(serde_json::json!({"error": format!("Error: {e}")})),
            )
                .into_response();
        }
    };

    let features = efficiency::derive_features(snapshot.air_temp_c, snapshot.irradiance_w_m2);
    let predicted_power_kw = match app.model.predict(&features) {
        Ok(value) => value,
        Err(e) => {
            warn!("prediction failed: {}", e);
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": format!("Error: {e}")})),
            )
                .into_response();
        }
    };

    let session = ForecastSession {
        snapshot,
        features,
        prediction: PredictionResult {
            predicted_power_kw,
            predicted_at: Utc::now(),
        },
    };
    app.set_session(session.clone());
    info!(
        "[FORECAST] {} | {:.0} W/m² | {:.1}°C air | {:.2} kW expected",
        session.snapshot.location_name,
        session.snapshot.irradiance_w_m2,
        session.snapshot.air_temp_c,
        predicted_power_kw
    );

    (StatusCode::OK, Json(session)).into_response()
}

/// GET /api/forecast
/// Read the currently retained forecast
#[utoipa::path(
    get,
    path = "/api/forecast",
    responses(
        (status = 200, description = "The retained forecast", body = ForecastSession),
        (status = 404, description = "No forecast has been requested yet")
    )
)]
pub async fn get_forecast(State(app): State<AppState>) -> impl IntoResponse {
    match app.session() {
        Some(session) => (StatusCode::OK, Json(session)).into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No forecast yet."})),
        )
            .into_response(),
    }
}

/// POST /api/efficiency
/// Rate an actual inverter reading against the retained forecast
///
/// A reading of zero is not an error — there is simply nothing to rate, so the
/// response is empty. A zero predicted output gives no baseline to rate against
/// and is rejected with a message instead of dividing by zero.
#[utoipa::path(
    post,
    path = "/api/efficiency",
    request_body = EfficiencyRequest,
    responses(
        (status = 200, description = "Efficiency assessment", body = EfficiencyAssessment),
        (status = 204, description = "No reading supplied — nothing to assess"),
        (status = 404, description = "No retained forecast to rate against"),
        (status = 422, description = "Negative reading, or the forecast predicts no output")
    )
)]
pub async fn rate_efficiency(
    State(app): State<AppState>,
    Json(request): Json<EfficiencyRequest>,
) -> impl IntoResponse {
    if request.actual_power_kw < 0.0 {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": "Actual power must be non-negative."})),
        )
            .into_response();
    }

    let Some(session) = app.session() else {
        return (
            StatusCode::NOT_FOUND,
            Json(serde_json::json!({"error": "No forecast yet. Request a forecast first."})),
        )
            .into_response();
    };

    if request.actual_power_kw == 0.0 {
        return StatusCode::NO_CONTENT.into_response();
    }

    match efficiency::evaluate(
        session.prediction.predicted_power_kw,
        request.actual_power_kw,
    ) {
        Some(assessment) => (StatusCode::OK, Json(assessment)).into_response(),
        // actual > 0 here, so the only way evaluate declines is a non-positive baseline
        None => (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({
                "error": "Predicted output is zero; there is no baseline to rate against."
            })),
        )
            .into_response(),
    }
}

/// POST /api/simulate
/// Manual mode: predict from user-set features
///
/// Takes the three model features verbatim (no derivation), bounds-checked against
/// the slider ranges. Does not touch the retained live forecast.
#[utoipa::path(
    post,
    path = "/api/simulate",
    request_body = ModelFeatures,
    responses(
        (status = 200, description = "Predicted output for the given features", body = SimulateResponse),
        (status = 422, description = "A feature is outside its allowed range"),
        (status = 500, description = "Model inference failed")
    )
)]
pub async fn simulate(
    State(app): State<AppState>,
    Json(features): Json<ModelFeatures>,
) -> impl IntoResponse {
    if let Some(message) = efficiency::manual_bounds_error(&features) {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(serde_json::json!({"error": message})),
        )
            .into_response();
    }

    match app.model.predict(&features) {
        Ok(predicted_power_kw) => (
            StatusCode::OK,
            Json(SimulateResponse {
                features,
                predicted_power_kw,
            }),
        )
            .into_response(),
        Err(e) => {
            warn!("prediction failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({"error": format!("Error: {e}")})),
            )
                .into_response()
        }
    }
}

/// GET /api/config
/// Defaults and input bounds for the front-end controls
#[utoipa::path(
    get,
    path = "/api/config",
    responses(
        (status = 200, description = "UI defaults", body = UiDefaults)
    )
)]
pub async fn get_ui_defaults(State(config): State<Config>) -> impl IntoResponse {
    let (irr_min, irr_max) = efficiency::IRRADIANCE_RANGE_KW_M2;
    let (air_min, air_max) = efficiency::AIR_TEMP_RANGE_C;
    let (module_min, module_max) = efficiency::MODULE_TEMP_RANGE_C;

    Json(UiDefaults {
        default_city: config.forecast.default_city,
        irradiance_kw_m2: SliderRange {
            min: irr_min,
            max: irr_max,
        },
        air_temp_c: SliderRange {
            min: air_min,
            max: air_max,
        },
        module_temp_c: SliderRange {
            min: module_min,
            max: module_max,
        },
    })
    .into_response()
}

/// GET /api/health
/// Liveness and session status
#[utoipa::path(
    get,
    path = "/api/health",
    responses(
        (status = 200, description = "Service health", body = HealthStatus)
    )
)]
pub async fn get_health(State(app): State<AppState>) -> impl IntoResponse {
    Json(HealthStatus {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: app.uptime_seconds(),
        has_prediction: app.has_session(),
    })
    .into_response()
}

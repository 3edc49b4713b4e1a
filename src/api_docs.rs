use utoipa::OpenApi;
use crate::controllers::forecast_controller;
use crate::models::forecast;

#[derive(OpenApi)]
#[openapi(
    paths(
        forecast_controller::create_forecast,
        forecast_controller::get_forecast,
        forecast_controller::rate_efficiency,
        forecast_controller::simulate,
        forecast_controller::get_ui_defaults,
        forecast_controller::get_health
    ),
    components(
        schemas(
            forecast::ForecastRequest,
            forecast::ForecastSession,
            forecast::WeatherSnapshot,
            forecast::ModelFeatures,
            forecast::PredictionResult,
            forecast::EfficiencyRequest,
            forecast::EfficiencyAssessment,
            forecast::Severity,
            forecast::SimulateResponse,
            forecast::SliderRange,
            forecast::UiDefaults,
            forecast::HealthStatus
        )
    ),
    tags(
        (name = "solar-forecaster", description = "Solar Forecaster & Fault Detector API")
    )
)]
pub struct ApiDoc;

use axum::{
    routing::{get, post},
    Router,
};

use crate::controllers::forecast_controller::{
    // Forecast & efficiency
    create_forecast, get_forecast, rate_efficiency,
    // Manual simulation
    simulate,
    // UI config & health
    get_health, get_ui_defaults,
};
use crate::shared_state::SharedState;

/// Build the `/api/*` sub-router.
/// Handlers extract `State<AppState>` and/or `State<Config>` via
/// `FromRef<SharedState>` — a single `.with_state(shared)` covers both.
pub fn api_routes(shared: SharedState) -> Router {
    Router::new()
        .route("/forecast",   post(create_forecast).get(get_forecast))
        .route("/efficiency", post(rate_efficiency))
        .route("/simulate",   post(simulate))
        .route("/config",     get(get_ui_defaults))
        .route("/health",     get(get_health))
        .with_state(shared)
}

/// City → current weather resolution against Open-Meteo.
///
/// Two fresh outbound calls per resolution (geocode, then current
/// conditions), no retries, no caching. Failures map to a single error type
/// the handler turns into a user-visible message.

use thiserror::Error;

use crate::config::WeatherConfig;
use crate::models::forecast::{
    CurrentWeatherResponse, GeocodingMatch, GeocodingResponse, WeatherSnapshot,
};

const CURRENT_FIELDS: &str = "temperature_2m,shortwave_radiation,wind_speed_10m";

#[derive(Debug, Error)]
pub enum WeatherError {
    #[error("City not found.")]
    CityNotFound,
    #[error("{0}")]
    Request(#[from] reqwest::Error),
}

/// Resolve a free-text city name to a weather snapshot.
pub async fn resolve_city(cfg: &WeatherConfig, city: &str) -> Result<WeatherSnapshot, WeatherError> {
    let geocoding: GeocodingResponse = reqwest::Client::new()
        .get(format!("{}/v1/search", cfg.geocoding_url))
        .query(&[
            ("name", city),
            ("count", "1"),
            ("language", "en"),
            ("format", "json"),
        ])
        .send()
        .await?
        .json()
        .await?;

    let location = best_match(geocoding)?;

    let weather: CurrentWeatherResponse = reqwest::Client::new()
        .get(format!("{}/v1/forecast", cfg.forecast_url))
        .query(&[
            ("latitude", location.latitude.to_string()),
            ("longitude", location.longitude.to_string()),
            ("current", CURRENT_FIELDS.to_string()),
        ])
        .send()
        .await?
        .json()
        .await?;

    Ok(WeatherSnapshot {
        location_name: location.name,
        air_temp_c: weather.current.temperature_2m,
        irradiance_w_m2: weather.current.shortwave_radiation,
        wind_speed_m_s: weather.current.wind_speed_10m,
    })
}

fn best_match(response: GeocodingResponse) -> Result<GeocodingMatch, WeatherError> {
    response
        .results
        .into_iter()
        .next()
        .ok_or(WeatherError::CityNotFound)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn picks_the_first_geocoding_match() {
        let response: GeocodingResponse = serde_json::from_str(
            r#"{
                "results": [
                    { "latitude": 18.51957, "longitude": 73.85535, "name": "Pune" },
                    { "latitude": 31.56496, "longitude": 74.1, "name": "Pune Khurd" }
                ]
            }"#,
        )
        .unwrap();

        let location = best_match(response).unwrap();
        assert_eq!(location.name, "Pune");
        assert!((location.latitude - 18.51957).abs() < 1e-9);
        assert!((location.longitude - 73.85535).abs() < 1e-9);
    }

    #[test]
    fn empty_results_is_city_not_found() {
        let response: GeocodingResponse = serde_json::from_str(r#"{ "results": [] }"#).unwrap();
        assert!(matches!(
            best_match(response),
            Err(WeatherError::CityNotFound)
        ));
    }

    #[test]
    fn absent_results_field_is_city_not_found() {
        // Open-Meteo omits `results` entirely on no match.
        let response: GeocodingResponse =
            serde_json::from_str(r#"{ "generationtime_ms": 0.5 }"#).unwrap();
        assert!(matches!(
            best_match(response),
            Err(WeatherError::CityNotFound)
        ));
    }

    #[test]
    fn decodes_current_conditions_payload() {
        let response: CurrentWeatherResponse = serde_json::from_str(
            r#"{
                "latitude": 18.5,
                "longitude": 73.875,
                "current": {
                    "time": "2026-08-05T09:30",
                    "temperature_2m": 27.4,
                    "shortwave_radiation": 612.0,
                    "wind_speed_10m": 11.2
                }
            }"#,
        )
        .unwrap();

        assert!((response.current.temperature_2m - 27.4).abs() < 1e-9);
        assert!((response.current.shortwave_radiation - 612.0).abs() < 1e-9);
        assert!((response.current.wind_speed_10m - 11.2).abs() < 1e-9);
    }

    #[test]
    fn missing_current_field_fails_to_decode() {
        let result: Result<CurrentWeatherResponse, _> = serde_json::from_str(
            r#"{ "current": { "time": "2026-08-05T09:30", "temperature_2m": 27.4 } }"#,
        );
        assert!(result.is_err());
    }
}

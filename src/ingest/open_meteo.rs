/// Open-Meteo forecast API client.
///
/// Retrieves the hourly precipitation series around "now" for a sensor's
/// coordinates and reduces it to the three aggregates the risk scorer
/// consumes: rainfall over the last 24h and 72h, and the forecast for the
/// next 24h.
///
/// API documentation: https://open-meteo.com/en/docs
///
/// With `past_days=3&forecast_days=2` the hourly series starts 72 hours in
/// the past, so indices 0..72 are history, 0..24 the most recent day of it,
/// and 72..96 the next 24 hours of forecast.

use serde::Deserialize;

use crate::model::TelemetryError;

const OPEN_METEO_BASE_URL: &str = "https://api.open-meteo.com";

const PAST_HOURS: usize = 72;
const WINDOW_24H: usize = 24;
const FORECAST_END: usize = 96;

// ============================================================================
// Open-Meteo API Response Structures
// ============================================================================

/// Forecast response, trimmed to the fields we request.
#[derive(Debug, Deserialize)]
pub struct ForecastResponse {
    pub hourly: HourlySeries,
}

/// Hourly data block. Precipitation values may be null for hours the
/// provider has no data for; those contribute nothing to the sums.
#[derive(Debug, Deserialize)]
pub struct HourlySeries {
    pub time: Vec<String>,
    pub precipitation: Vec<Option<f64>>,
}

/// The three precipitation aggregates handed to the risk scorer,
/// in millimeters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecipitationWindows {
    pub last_24h_mm: f64,
    pub last_72h_mm: f64,
    pub forecast_24h_mm: f64,
}

// ============================================================================
// API Client Functions
// ============================================================================

/// Builds the forecast URL for a coordinate pair: hourly precipitation,
/// 3 past days and 2 forecast days.
pub fn build_forecast_url(latitude: f64, longitude: f64) -> String {
    format!(
        "{}/v1/forecast?latitude={}&longitude={}&hourly=precipitation&past_days=3&forecast_days=2",
        OPEN_METEO_BASE_URL, latitude, longitude
    )
}

/// Fetches the hourly precipitation series for a coordinate pair and
/// aggregates it into the scorer's three windows.
pub fn fetch_precipitation(
    client: &reqwest::blocking::Client,
    latitude: f64,
    longitude: f64,
) -> Result<PrecipitationWindows, TelemetryError> {
    let url = build_forecast_url(latitude, longitude);

    let response = client
        .get(&url)
        .header("Accept", "application/json")
        .send()
        .map_err(|e| TelemetryError::Network(e.to_string()))?;

    if !response.status().is_success() {
        return Err(TelemetryError::HttpError(response.status().as_u16()));
    }

    let forecast: ForecastResponse = response
        .json()
        .map_err(|e| TelemetryError::ParseError(e.to_string()))?;

    if forecast.hourly.precipitation.is_empty() {
        return Err(TelemetryError::MissingData(
            "hourly precipitation series is empty".to_string(),
        ));
    }

    Ok(aggregate_windows(&forecast.hourly.precipitation))
}

// ============================================================================
// Aggregation Helpers
// ============================================================================

/// Sums the non-null values in `hourly[start..end]`, clamping the range to
/// the series length.
fn sum_window(hourly: &[Option<f64>], start: usize, end: usize) -> f64 {
    let start = start.min(hourly.len());
    let end = end.min(hourly.len());
    hourly[start..end].iter().flatten().sum()
}

/// Reduces a full hourly series (72 past + forecast hours) to the three
/// scoring windows. Short series simply yield smaller sums.
pub fn aggregate_windows(hourly: &[Option<f64>]) -> PrecipitationWindows {
    PrecipitationWindows {
        last_24h_mm: sum_window(hourly, 0, WINDOW_24H),
        last_72h_mm: sum_window(hourly, 0, PAST_HOURS),
        forecast_24h_mm: sum_window(hourly, PAST_HOURS, FORECAST_END),
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_forecast_url_encodes_coordinates_and_windows() {
        let url = build_forecast_url(-23.5505, -46.6333);
        assert!(url.starts_with("https://api.open-meteo.com/v1/forecast?"));
        assert!(url.contains("latitude=-23.5505"));
        assert!(url.contains("longitude=-46.6333"));
        assert!(url.contains("hourly=precipitation"));
        assert!(url.contains("past_days=3"));
        assert!(url.contains("forecast_days=2"));
    }

    #[test]
    fn test_aggregate_windows_splits_history_and_forecast() {
        // 1mm for every past hour, 2mm for every forecast hour.
        let mut hourly = vec![Some(1.0); 72];
        hourly.extend(vec![Some(2.0); 48]);

        let windows = aggregate_windows(&hourly);
        assert_eq!(windows.last_24h_mm, 24.0);
        assert_eq!(windows.last_72h_mm, 72.0);
        // Forecast window is exactly hours 72..96, not the whole tail.
        assert_eq!(windows.forecast_24h_mm, 48.0);
    }

    #[test]
    fn test_aggregate_windows_skips_null_hours() {
        let mut hourly: Vec<Option<f64>> = vec![None; 120];
        hourly[0] = Some(3.5);
        hourly[23] = Some(0.5);
        hourly[24] = Some(10.0); // inside 72h window only
        hourly[80] = Some(7.0);  // forecast window

        let windows = aggregate_windows(&hourly);
        assert_eq!(windows.last_24h_mm, 4.0);
        assert_eq!(windows.last_72h_mm, 14.0);
        assert_eq!(windows.forecast_24h_mm, 7.0);
    }

    #[test]
    fn test_aggregate_windows_tolerates_short_series() {
        let hourly = vec![Some(1.0); 10];
        let windows = aggregate_windows(&hourly);
        assert_eq!(windows.last_24h_mm, 10.0);
        assert_eq!(windows.last_72h_mm, 10.0);
        assert_eq!(windows.forecast_24h_mm, 0.0);

        let empty: Vec<Option<f64>> = Vec::new();
        let windows = aggregate_windows(&empty);
        assert_eq!(windows.last_24h_mm, 0.0);
        assert_eq!(windows.last_72h_mm, 0.0);
        assert_eq!(windows.forecast_24h_mm, 0.0);
    }

    #[test]
    fn test_forecast_response_parses_open_meteo_shape() {
        let body = r#"{
            "latitude": -23.5,
            "longitude": -46.6,
            "hourly": {
                "time": ["2026-08-27T00:00", "2026-08-27T01:00", "2026-08-27T02:00"],
                "precipitation": [0.0, null, 1.2]
            }
        }"#;
        let parsed: ForecastResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.hourly.time.len(), 3);
        assert_eq!(parsed.hourly.precipitation, vec![Some(0.0), None, Some(1.2)]);
    }
}

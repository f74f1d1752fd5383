/// External API clients for the landslide telemetry service.
///
/// Submodules:
/// - `open_meteo` — hourly precipitation history + forecast (Open-Meteo).
/// - `nominatim` — reverse-geocoding lookup URL construction (OSM Nominatim).

pub mod nominatim;
pub mod open_meteo;

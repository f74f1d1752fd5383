/// Core data types for the landslide telemetry service.
///
/// This module defines the shared domain model imported by all other modules.
/// It contains no logic and no I/O — only types. The risk scoring inputs and
/// outputs live in `crate::risk` alongside the algorithm that owns them.

use serde::{Deserialize, Serialize};

use crate::risk::{RiskLevel, SoilType};

// ---------------------------------------------------------------------------
// Wire types
// ---------------------------------------------------------------------------

/// One telemetry frame posted by a field device.
///
/// The SW-420 modules report binary triggers rather than measured values:
/// `tilt_triggered` means the tilt switch tripped, not a measured angle.
/// Displacement detection comes from the MPU6050 accelerometer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReport {
    #[serde(rename = "deviceId")]
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Soil moisture in percent, as reported. Not clamped or validated.
    #[serde(rename = "moisturePercent")]
    pub soil_moisture_pct: f64,
    /// SW-420 tilt switch trigger.
    #[serde(rename = "tiltTriggered")]
    pub tilt_triggered: bool,
    /// SW-420 vibration trigger.
    pub vibration: bool,
    /// MPU6050 displacement detection.
    pub displacement: bool,
    /// Soil classification at the install site, if surveyed.
    #[serde(default, rename = "soilType")]
    pub soil_type: SoilType,
    /// Whether the surrounding area is deforested, if surveyed.
    #[serde(default)]
    pub deforested: bool,
    /// Device-supplied timestamp, ISO 8601. Stored as-is.
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Persisted record
// ---------------------------------------------------------------------------

/// A single assessed reading as appended to the flat record store —
/// the raw telemetry combined with the fetched precipitation windows
/// and the computed risk level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentRecord {
    pub device_id: String,
    pub latitude: f64,
    pub longitude: f64,
    pub soil_moisture_pct: f64,
    pub tilt_triggered: bool,
    pub vibration: bool,
    pub displacement: bool,
    pub rainfall_24h_mm: f64,
    pub rainfall_72h_mm: f64,
    pub rainfall_forecast_24h_mm: f64,
    pub risk: RiskLevel,
    pub timestamp: String,
}

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can arise in the ingestion and persistence layer.
///
/// The risk scorer itself is total over its inputs and never produces an
/// error; everything here belongs to the surrounding I/O.
#[derive(Debug, PartialEq)]
pub enum TelemetryError {
    /// Non-2xx HTTP response from an external API.
    HttpError(u16),
    /// The request never completed (connect failure, timeout).
    Network(String),
    /// A response body could not be deserialized.
    ParseError(String),
    /// The response was well-formed but lacked the data we need
    /// (e.g. an empty hourly precipitation series).
    MissingData(String),
    /// Record store read or write failure.
    Io(String),
}

impl std::fmt::Display for TelemetryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TelemetryError::HttpError(code) => write!(f, "HTTP error: {}", code),
            TelemetryError::Network(msg) => write!(f, "Network error: {}", msg),
            TelemetryError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            TelemetryError::MissingData(what) => write!(f, "No data available: {}", what),
            TelemetryError::Io(msg) => write!(f, "Store I/O error: {}", msg),
        }
    }
}

impl std::error::Error for TelemetryError {}

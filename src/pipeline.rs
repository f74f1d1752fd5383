/// Per-report ingestion orchestration.
///
/// One posted telemetry frame flows through here: fetch the precipitation
/// aggregates for the device's coordinates, normalize the frame into a
/// scoring input, run the risk scorer, and append the combined record to
/// the flat store. The scorer itself stays pure — every failure path in
/// this module is I/O.

use crate::ingest::nominatim;
use crate::ingest::open_meteo::{self, PrecipitationWindows};
use crate::logging::{self, DataSource};
use crate::model::{AssessmentRecord, SensorReport, TelemetryError};
use crate::risk::{self, RiskLevel, SensorReading};
use crate::store::RecordStore;

/// Tilt angle assumed when the SW-420 tilt switch trips. The switch is
/// binary, so a trip is mapped to the critical tier's angle; adjust per
/// region once devices report a measured angle.
pub const TILT_TRIGGERED_DEG: f64 = 30.0;

/// What the caller gets back for one ingested frame.
#[derive(Debug, Clone, PartialEq)]
pub struct IngestOutcome {
    pub risk: RiskLevel,
    /// Ready-made Nominatim lookup URL for the reading's coordinates.
    pub reverse_geocode_url: String,
}

/// Normalizes a wire frame plus fetched precipitation into the scorer's
/// input bundle.
pub fn reading_from_report(
    report: &SensorReport,
    windows: &PrecipitationWindows,
) -> SensorReading {
    SensorReading {
        soil_moisture_pct: report.soil_moisture_pct,
        tilt_deg: if report.tilt_triggered {
            TILT_TRIGGERED_DEG
        } else {
            0.0
        },
        vibration: report.vibration,
        displacement: report.displacement,
        rainfall_24h_mm: windows.last_24h_mm,
        rainfall_72h_mm: windows.last_72h_mm,
        rainfall_forecast_24h_mm: windows.forecast_24h_mm,
        soil_type: report.soil_type,
        deforested: report.deforested,
    }
}

/// Scores an already-augmented frame and persists the combined record.
/// Split from `ingest_report` so the scoring+persistence path is testable
/// without network access.
pub fn assess_and_store(
    store: &RecordStore,
    report: &SensorReport,
    windows: &PrecipitationWindows,
) -> Result<IngestOutcome, TelemetryError> {
    let reading = reading_from_report(report, windows);
    let assessment = risk::assess_risk(&reading, false);

    let record = AssessmentRecord {
        device_id: report.device_id.clone(),
        latitude: report.latitude,
        longitude: report.longitude,
        soil_moisture_pct: report.soil_moisture_pct,
        tilt_triggered: report.tilt_triggered,
        vibration: report.vibration,
        displacement: report.displacement,
        rainfall_24h_mm: windows.last_24h_mm,
        rainfall_72h_mm: windows.last_72h_mm,
        rainfall_forecast_24h_mm: windows.forecast_24h_mm,
        risk: assessment.level,
        timestamp: report.timestamp.clone(),
    };
    store.append(&record)?;

    logging::info(
        DataSource::System,
        Some(&report.device_id),
        &format!("assessed reading: risk {}", assessment.level),
    );

    Ok(IngestOutcome {
        risk: assessment.level,
        reverse_geocode_url: nominatim::build_reverse_geocode_url(
            report.latitude,
            report.longitude,
        ),
    })
}

/// Full ingestion path for one posted frame: fetch precipitation windows,
/// score, persist, and return the risk level plus the address lookup URL.
pub fn ingest_report(
    client: &reqwest::blocking::Client,
    store: &RecordStore,
    report: &SensorReport,
) -> Result<IngestOutcome, TelemetryError> {
    let windows =
        match open_meteo::fetch_precipitation(client, report.latitude, report.longitude) {
            Ok(windows) => windows,
            Err(e) => {
                logging::log_weather_failure(&report.device_id, "precipitation fetch", &e);
                return Err(e);
            }
        };

    assess_and_store(store, report, &windows)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::risk::SoilType;

    fn report() -> SensorReport {
        SensorReport {
            device_id: "esp32-01".to_string(),
            latitude: -22.9068,
            longitude: -43.1729,
            soil_moisture_pct: 68.0,
            tilt_triggered: false,
            vibration: false,
            displacement: false,
            soil_type: SoilType::Common,
            deforested: false,
            timestamp: "2026-08-30T12:00:00Z".to_string(),
        }
    }

    fn dry_windows() -> PrecipitationWindows {
        PrecipitationWindows {
            last_24h_mm: 0.0,
            last_72h_mm: 0.0,
            forecast_24h_mm: 0.0,
        }
    }

    #[test]
    fn test_tilt_trigger_maps_to_critical_angle() {
        let tripped = SensorReport {
            tilt_triggered: true,
            ..report()
        };
        let reading = reading_from_report(&tripped, &dry_windows());
        assert_eq!(reading.tilt_deg, TILT_TRIGGERED_DEG);

        let untripped = reading_from_report(&report(), &dry_windows());
        assert_eq!(untripped.tilt_deg, 0.0);
    }

    #[test]
    fn test_precipitation_windows_flow_into_reading() {
        let windows = PrecipitationWindows {
            last_24h_mm: 31.5,
            last_72h_mm: 104.0,
            forecast_24h_mm: 12.0,
        };
        let reading = reading_from_report(&report(), &windows);
        assert_eq!(reading.rainfall_24h_mm, 31.5);
        assert_eq!(reading.rainfall_72h_mm, 104.0);
        assert_eq!(reading.rainfall_forecast_24h_mm, 12.0);
        assert_eq!(reading.soil_moisture_pct, 68.0);
    }

    #[test]
    fn test_assess_and_store_persists_combined_record() {
        let dir = tempfile::tempdir().unwrap();
        let store = RecordStore::new(dir.path().join("records.jsonl"));

        let saturated = SensorReport {
            soil_moisture_pct: 90.0,
            tilt_triggered: true,
            vibration: true,
            ..report()
        };
        let windows = PrecipitationWindows {
            last_24h_mm: 85.0,
            last_72h_mm: 120.0,
            forecast_24h_mm: 10.0,
        };

        let outcome = assess_and_store(&store, &saturated, &windows).unwrap();
        assert_eq!(outcome.risk, RiskLevel::High);
        assert!(outcome
            .reverse_geocode_url
            .contains("nominatim.openstreetmap.org/reverse"));

        let records = store.load_all().unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].device_id, "esp32-01");
        assert_eq!(records[0].rainfall_24h_mm, 85.0);
        assert_eq!(records[0].risk, RiskLevel::High);
        assert_eq!(records[0].timestamp, "2026-08-30T12:00:00Z");
    }
}

/// Landslide risk scoring.
///
/// A pure, deterministic weighted-scoring rule engine: each environmental
/// signal contributes at most one tier's weight, booleans and site factors
/// add fixed adjustments, and the accumulated score maps to a three-level
/// classification. The function is total over all real inputs — negative or
/// extreme values simply fail every threshold and contribute nothing. No
/// I/O, no clock, no hidden state.
///
/// Weights and thresholds are calibrated from literature and field practice
/// and live in the tier tables below so they can be recalibrated without
/// touching control flow.

use serde::{Deserialize, Serialize};
use std::fmt;

// ---------------------------------------------------------------------------
// Classification types
// ---------------------------------------------------------------------------

/// Landslide risk levels, in ascending order of severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
        }
    }
}

/// Soil classification at the sensor site.
///
/// Unrecognized labels deserialize to `Common`, which applies no score
/// adjustment. That is the defined default for unsurveyed sites, not an
/// error.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SoilType {
    Clay,
    Sandy,
    Rock,
    #[default]
    #[serde(other)]
    Common,
}

// ---------------------------------------------------------------------------
// Scoring inputs and output
// ---------------------------------------------------------------------------

/// The normalized input bundle for one assessment.
///
/// All precipitation sums are in millimeters; moisture in percent; tilt in
/// degrees from the reference plane. Values are taken as-is — range
/// enforcement is the caller's responsibility.
#[derive(Debug, Clone, PartialEq)]
pub struct SensorReading {
    pub soil_moisture_pct: f64,
    pub tilt_deg: f64,
    pub vibration: bool,
    pub displacement: bool,
    pub rainfall_24h_mm: f64,
    pub rainfall_72h_mm: f64,
    pub rainfall_forecast_24h_mm: f64,
    pub soil_type: SoilType,
    pub deforested: bool,
}

/// Result of one scoring pass.
///
/// `score` and `explanations` are populated only when the caller asked for
/// an explanation trace; `explanations` then lists one sentence per
/// triggered rule, in evaluation order, ending with the classification
/// sentence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub score: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub explanations: Option<Vec<String>>,
}

// ---------------------------------------------------------------------------
// Weight and threshold tables
// ---------------------------------------------------------------------------

/// One tier of a signal's threshold cascade. Tables are ordered from the
/// highest threshold down; the first matching tier wins and the rest are
/// skipped, so each signal contributes at most one weight.
struct Tier {
    threshold: f64,
    weight: f64,
    /// Whether crossing this tier counts toward the critical-factor tally.
    /// Only the top tiers of rainfall24h, rainfall72h, moisture, and tilt
    /// are eligible — booleans, soil, and deforestation never are.
    critical: bool,
    message: &'static str,
}

static RAINFALL_24H_TIERS: &[Tier] = &[
    Tier { threshold: 80.0, weight: 3.0, critical: true, message: "Intense rainfall in the last 24h (>80mm)." },
    Tier { threshold: 50.0, weight: 2.0, critical: false, message: "Heavy rainfall in the last 24h (>50mm)." },
    Tier { threshold: 30.0, weight: 1.0, critical: false, message: "Moderate rainfall in the last 24h (>30mm)." },
];

static RAINFALL_72H_TIERS: &[Tier] = &[
    Tier { threshold: 150.0, weight: 2.0, critical: true, message: "Extreme rainfall in the last 72h (>150mm)." },
    Tier { threshold: 100.0, weight: 1.0, critical: false, message: "Heavy rainfall in the last 72h (>100mm)." },
];

// Forecast rainfall carries weight but is never a critical factor — a
// forecast is not an observation.
static RAINFALL_FORECAST_TIERS: &[Tier] = &[
    Tier { threshold: 50.0, weight: 2.0, critical: false, message: "Heavy rain forecast (>50mm) for the next 24h." },
    Tier { threshold: 30.0, weight: 1.0, critical: false, message: "Moderate rain forecast (>30mm) for the next 24h." },
];

static MOISTURE_TIERS: &[Tier] = &[
    Tier { threshold: 85.0, weight: 3.0, critical: true, message: "Critical soil moisture (>85%)." },
    Tier { threshold: 75.0, weight: 2.0, critical: false, message: "High soil moisture (>75%)." },
    Tier { threshold: 60.0, weight: 1.0, critical: false, message: "Moderate soil moisture (>60%)." },
];

static TILT_TIERS: &[Tier] = &[
    Tier { threshold: 30.0, weight: 2.5, critical: true, message: "Critical terrain tilt (>=30 deg)." },
    Tier { threshold: 20.0, weight: 1.5, critical: false, message: "High terrain tilt (>=20 deg)." },
    Tier { threshold: 10.0, weight: 1.0, critical: false, message: "Moderate terrain tilt (>=10 deg)." },
];

const WEIGHT_VIBRATION: f64 = 2.0;
const WEIGHT_DISPLACEMENT: f64 = 2.0;
const WEIGHT_SOIL_CLAY: f64 = 1.2;
const WEIGHT_SOIL_SANDY: f64 = 1.0;
const WEIGHT_SOIL_ROCK: f64 = -1.0;
const WEIGHT_DEFORESTED: f64 = 1.5;

/// Flat penalty added once when a saturated score coincides with detected
/// ground movement. Checked against the score before the penalty itself.
const COMPOUND_PENALTY: f64 = 1.0;
const COMPOUND_PENALTY_MIN_SCORE: f64 = 6.0;

// Classification cut-offs, evaluated in order: the multi-critical branch
// first, then the plain score thresholds.
const MULTI_CRITICAL_COUNT: u32 = 2;
const MULTI_CRITICAL_MIN_SCORE: f64 = 8.0;
const HIGH_MIN_SCORE: f64 = 6.0;
const MEDIUM_MIN_SCORE: f64 = 3.0;

const MSG_VIBRATION: &str = "Ground vibration detected.";
const MSG_DISPLACEMENT: &str = "Ground displacement detected.";
const MSG_SOIL_CLAY: &str = "Clay soil: more susceptible.";
const MSG_SOIL_SANDY: &str = "Sandy soil: moderately susceptible.";
const MSG_SOIL_ROCK: &str = "Rocky soil: less susceptible.";
const MSG_DEFORESTED: &str = "Deforested area: far more vulnerable.";
const MSG_COMPOUND: &str =
    "Extra penalty: compounded risk from saturated soil and ground movement.";
const MSG_MULTI_CRITICAL: &str =
    "Multiple critical factors present. CRITICAL LANDSLIDE RISK!";
const MSG_HIGH: &str = "HIGH landslide risk.";
const MSG_MEDIUM: &str = "MEDIUM risk: attention!";
const MSG_LOW: &str = "Low risk.";

// ---------------------------------------------------------------------------
// Scoring
// ---------------------------------------------------------------------------

/// Returns the highest tier whose threshold the value meets, if any.
/// Tables are descending, so a top-down scan with early exit keeps tiers
/// mutually exclusive.
fn match_tier(value: f64, tiers: &'static [Tier]) -> Option<&'static Tier> {
    tiers.iter().find(|tier| value >= tier.threshold)
}

fn soil_adjustment(soil: SoilType) -> Option<(f64, &'static str)> {
    match soil {
        SoilType::Clay => Some((WEIGHT_SOIL_CLAY, MSG_SOIL_CLAY)),
        SoilType::Sandy => Some((WEIGHT_SOIL_SANDY, MSG_SOIL_SANDY)),
        SoilType::Rock => Some((WEIGHT_SOIL_ROCK, MSG_SOIL_ROCK)),
        SoilType::Common => None,
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Assesses landslide risk for one reading.
///
/// Single-pass weighted scoring: each tiered signal contributes at most one
/// weight, boolean and site factors add fixed amounts, and a compound
/// penalty applies once when a score of 6 or more coincides with vibration
/// or displacement. Identical inputs always yield identical output.
///
/// With `explain = false` only the level is populated; with `explain = true`
/// the score (rounded to 2 decimals) and the full rule trace are returned.
pub fn assess_risk(reading: &SensorReading, explain: bool) -> RiskAssessment {
    let mut score = 0.0;
    let mut critical_factors: u32 = 0;
    let mut explanations: Vec<String> = Vec::new();

    let tiered_signals: [(f64, &'static [Tier]); 5] = [
        (reading.rainfall_24h_mm, RAINFALL_24H_TIERS),
        (reading.rainfall_72h_mm, RAINFALL_72H_TIERS),
        (reading.rainfall_forecast_24h_mm, RAINFALL_FORECAST_TIERS),
        (reading.soil_moisture_pct, MOISTURE_TIERS),
        (reading.tilt_deg, TILT_TIERS),
    ];
    for (value, tiers) in tiered_signals {
        if let Some(tier) = match_tier(value, tiers) {
            score += tier.weight;
            if tier.critical {
                critical_factors += 1;
            }
            explanations.push(tier.message.to_string());
        }
    }

    if reading.vibration {
        score += WEIGHT_VIBRATION;
        explanations.push(MSG_VIBRATION.to_string());
    }
    if reading.displacement {
        score += WEIGHT_DISPLACEMENT;
        explanations.push(MSG_DISPLACEMENT.to_string());
    }

    if let Some((weight, message)) = soil_adjustment(reading.soil_type) {
        score += weight;
        explanations.push(message.to_string());
    }

    if reading.deforested {
        score += WEIGHT_DEFORESTED;
        explanations.push(MSG_DEFORESTED.to_string());
    }

    // Evaluated once, against the pre-penalty score. Never cascades.
    if score >= COMPOUND_PENALTY_MIN_SCORE && (reading.vibration || reading.displacement) {
        score += COMPOUND_PENALTY;
        explanations.push(MSG_COMPOUND.to_string());
    }

    let level = if critical_factors >= MULTI_CRITICAL_COUNT && score >= MULTI_CRITICAL_MIN_SCORE {
        explanations.push(MSG_MULTI_CRITICAL.to_string());
        RiskLevel::High
    } else if score >= HIGH_MIN_SCORE {
        explanations.push(MSG_HIGH.to_string());
        RiskLevel::High
    } else if score >= MEDIUM_MIN_SCORE {
        explanations.push(MSG_MEDIUM.to_string());
        RiskLevel::Medium
    } else {
        explanations.push(MSG_LOW.to_string());
        RiskLevel::Low
    };

    if explain {
        RiskAssessment {
            level,
            score: Some(round2(score)),
            explanations: Some(explanations),
        }
    } else {
        RiskAssessment {
            level,
            score: None,
            explanations: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

//! Landslide telemetry ingestion and risk assessment service.
//!
//! Field devices post telemetry frames (soil moisture, tilt, vibration,
//! displacement); the service augments each frame with precipitation
//! aggregates from Open-Meteo, runs a deterministic weighted-scoring rule
//! engine to classify landslide risk, and appends the combined record to a
//! flat JSON-lines store.
//!
//! The scoring core (`risk`) is a pure function with no I/O; everything
//! around it is thin glue.

pub mod config;
pub mod ingest;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod risk;
pub mod store;

//! Measurement conversion handler

use axum::Json;
use serde::Deserialize;

use crate::models::{MeasurementSet, MeasurementUnit};

#[derive(Debug, Deserialize)]
pub struct ConvertMeasurementsInput {
    pub measurements: MeasurementSet,
    pub to: MeasurementUnit,
}

/// Convert every numeric field of a measurement set to another unit
pub async fn convert_measurements(
    Json(input): Json<ConvertMeasurementsInput>,
) -> Json<MeasurementSet> {
    Json(input.measurements.converted(input.to))
}

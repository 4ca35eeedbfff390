mod fence;
mod range;
mod shape;

pub use fence::strip_fences;
pub use range::average_range;
pub use shape::Shape;

use log::{debug, warn};
use serde_json::Value;

use crate::error::TrackerError;
use crate::model::NutritionRecord;

/// The outcome of normalizing one model answer.
///
/// A failed normalization is not an error for the caller: it still carries
/// the cleaned text so the row logger can record what was received.
#[derive(Debug)]
pub struct Normalization {
    /// The answer after fence and quote stripping
    pub cleaned: String,
    /// Records on success; [`TrackerError::MalformedJson`] or
    /// [`TrackerError::UnknownFormat`] otherwise
    pub outcome: Result<Vec<NutritionRecord>, TrackerError>,
}

impl Normalization {
    pub fn records(&self) -> &[NutritionRecord] {
        match &self.outcome {
            Ok(records) => records,
            Err(_) => &[],
        }
    }
}

/// Turn a raw model answer into nutrition records.
///
/// `food` is the user's description, used as the item name when the model
/// answers with a single flat object.
pub fn normalize(raw: &str, food: &str) -> Normalization {
    let cleaned = strip_fences(raw);

    let value: Value = match serde_json::from_str(&cleaned) {
        Ok(value) => value,
        Err(e) => {
            warn!("Model answer is not valid JSON: {}", e);
            return Normalization {
                cleaned,
                outcome: Err(TrackerError::MalformedJson(e.to_string())),
            };
        }
    };

    let shape = Shape::detect(&value);
    let records = shape.records(&value, food);
    debug!("Detected {:?} with {} record(s)", shape, records.len());

    let outcome = if records.is_empty() {
        Err(TrackerError::UnknownFormat)
    } else {
        Ok(records)
    };

    Normalization { cleaned, outcome }
}

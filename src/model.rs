use serde_json::Value;

/// Format of the timestamp written in the first log column.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One normalized nutrition entry.
///
/// Every field is a display string, because the model may answer with ranges,
/// units or nothing at all. Missing values are empty strings.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NutritionRecord {
    pub item: String,
    pub quantity: String,
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
    pub notes: String,
}

/// A record prefixed with its timestamp, in spreadsheet column order:
/// timestamp, item, quantity, calories, protein, carbs, fat, notes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRow([String; 8]);

impl LogRow {
    pub fn from_record(timestamp: &str, record: &NutritionRecord) -> Self {
        LogRow([
            timestamp.to_string(),
            record.item.clone(),
            record.quantity.clone(),
            record.calories.clone(),
            record.protein.clone(),
            record.carbs.clone(),
            record.fat.clone(),
            record.notes.clone(),
        ])
    }

    /// A degenerate row that carries only an item, an optional quantity slot
    /// and a note.
    pub fn diagnostic(timestamp: &str, item: &str, quantity: &str, notes: String) -> Self {
        LogRow([
            timestamp.to_string(),
            item.to_string(),
            quantity.to_string(),
            String::new(),
            String::new(),
            String::new(),
            String::new(),
            notes,
        ])
    }

    pub fn timestamp(&self) -> &str {
        &self.0[0]
    }

    pub fn item(&self) -> &str {
        &self.0[1]
    }

    pub fn quantity(&self) -> &str {
        &self.0[2]
    }

    pub fn notes(&self) -> &str {
        &self.0[7]
    }

    pub fn values(&self) -> &[String; 8] {
        &self.0
    }
}

/// The current local time in [`TIMESTAMP_FORMAT`].
pub fn timestamp_now() -> String {
    chrono::Local::now().format(TIMESTAMP_FORMAT).to_string()
}

/// Render a JSON value the way it should appear in a spreadsheet cell.
pub fn display_value(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        other => other.to_string(),
    }
}

/// Look up `key` in an object-like value and render it, empty when absent.
pub fn field(value: &Value, key: &str) -> String {
    value.get(key).map(display_value).unwrap_or_default()
}

use async_trait::async_trait;
use log::{info, warn};

use crate::error::TrackerError;
use crate::model::LogRow;
use crate::normalize::Normalization;

/// Something rows can be appended to
#[async_trait]
pub trait RowSink: Send + Sync {
    async fn append_row(&self, row: &LogRow) -> Result<(), TrackerError>;
}

/// Opens a [`RowSink`] for one submission, authorizing as needed
#[async_trait]
pub trait RowStore: Send + Sync {
    async fn open(&self) -> Result<Box<dyn RowSink>, TrackerError>;
}

/// Append the rows for one normalized answer and return how many were written.
///
/// Records are appended one by one. If the answer could not be parsed, or
/// parsed into nothing usable, a single fallback row records what was received
/// instead. Rows already appended stay in place when a later append fails.
pub async fn log_normalization(
    sink: &dyn RowSink,
    food: &str,
    raw: &str,
    normalization: &Normalization,
    timestamp: &str,
) -> Result<usize, TrackerError> {
    let rows: Vec<LogRow> = match &normalization.outcome {
        Ok(records) => records
            .iter()
            .map(|record| LogRow::from_record(timestamp, record))
            .collect(),
        Err(TrackerError::UnknownFormat) => {
            warn!("Unknown nutrition format, logging cleaned answer");
            vec![LogRow::diagnostic(
                timestamp,
                food,
                "",
                format!("Unknown format: {}", normalization.cleaned),
            )]
        }
        Err(error) => {
            warn!("Logging diagnostic row: {}", error);
            vec![LogRow::diagnostic(
                timestamp,
                food,
                raw,
                format!("{}. Raw response: {}", error, raw),
            )]
        }
    };

    append_all(sink, &rows).await
}

/// Record a failed lookup as a single diagnostic row.
pub async fn log_lookup_failure(
    sink: &dyn RowSink,
    food: &str,
    error: &TrackerError,
    timestamp: &str,
) -> Result<usize, TrackerError> {
    let row = LogRow::diagnostic(
        timestamp,
        food,
        "",
        format!("Error fetching nutrition: {}", error),
    );
    append_all(sink, std::slice::from_ref(&row)).await
}

async fn append_all(sink: &dyn RowSink, rows: &[LogRow]) -> Result<usize, TrackerError> {
    for (appended, row) in rows.iter().enumerate() {
        if let Err(e) = sink.append_row(row).await {
            warn!("Append failed after {} row(s): {}", appended, e);
            return Err(e);
        }
    }
    info!("Appended {} row(s)", rows.len());
    Ok(rows.len())
}


#[cfg(test)]
mod tests {
    use super::testing::MemorySink;
    use super::*;
    use crate::normalize::normalize;

    const TS: &str = "2024-05-01 08:30:00";

    #[tokio::test]
    async fn test_one_row_per_record() {
        let sink = MemorySink::default();
        let raw = r#"{"food_items": [{"item": "Egg", "calories": "78"}, {"item": "Toast"}]}"#;
        let normalization = normalize(raw, "egg and toast");

        let appended = log_normalization(&sink, "egg and toast", raw, &normalization, TS)
            .await
            .unwrap();

        let rows = sink.rows.lock().unwrap();
        assert_eq!(appended, 2);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].values()[..4], ["2024-05-01 08:30:00", "Egg", "", "78"]);
        assert_eq!(rows[1].item(), "Toast");
    }

    #[tokio::test]
    async fn test_unparseable_logs_diagnostic_row() {
        let sink = MemorySink::default();
        let raw = "Sorry, I can't help with that";
        let normalization = normalize(raw, "mystery stew");

        log_normalization(&sink, "mystery stew", raw, &normalization, TS)
            .await
            .unwrap();

        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].timestamp(), TS);
        assert_eq!(rows[0].item(), "mystery stew");
        assert_eq!(rows[0].quantity(), raw);
        assert!(rows[0].notes().starts_with("Error parsing nutrition JSON"));
        assert!(rows[0].notes().contains(raw));
    }

    #[tokio::test]
    async fn test_unknown_format_logs_cleaned_json() {
        let sink = MemorySink::default();
        let raw = "```json\n{\"meal\": \"pizza\"}\n```";
        let normalization = normalize(raw, "pizza");

        log_normalization(&sink, "pizza", raw, &normalization, TS)
            .await
            .unwrap();

        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].notes(), r#"Unknown format: {"meal": "pizza"}"#);
        assert!(!rows[0].notes().contains("```"));
        assert_eq!(rows[0].quantity(), "");
    }

    #[tokio::test]
    async fn test_partial_failure_keeps_earlier_rows() {
        let sink = MemorySink {
            fail_after: Some(1),
            ..MemorySink::default()
        };
        let raw = r#"{"food_items": [{"item": "A"}, {"item": "B"}, {"item": "C"}]}"#;
        let normalization = normalize(raw, "abc");

        let result = log_normalization(&sink, "abc", raw, &normalization, TS).await;

        assert!(matches!(result, Err(TrackerError::Store(_))));
        let rows = sink.rows.lock().unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].item(), "A");
    }

    #[tokio::test]
    async fn test_lookup_failure_row() {
        let sink = MemorySink::default();
        let error = TrackerError::ApiStatus {
            status: 403,
            body: "API key not valid".to_string(),
        };

        let appended = log_lookup_failure(&sink, "salad", &error, TS).await.unwrap();

        let rows = sink.rows.lock().unwrap();
        assert_eq!(appended, 1);
        assert!(rows[0].notes().contains("API key not valid"));
        assert!(rows[0].notes().starts_with("Error fetching nutrition"));
    }
}

//! Google Sheets backend for the row logger.

mod auth;
mod client;

pub use auth::{build_assertion, fetch_access_token, AccessToken};
pub use client::{SheetsStore, Worksheet};

use crate::error::TrackerError;

/// Extract the spreadsheet id from a sheet URL, or accept a bare id.
///
/// `https://docs.google.com/spreadsheets/d/<id>/edit?usp=sharing` -> `<id>`
pub fn spreadsheet_id(url: &str) -> Result<String, TrackerError> {
    let url = url.trim();
    let id = match url.split_once("/spreadsheets/d/") {
        Some((_, rest)) => rest.split(['/', '?', '#']).next().unwrap_or_default(),
        None if !url.contains('/') => url,
        None => "",
    };

    let valid = !id.is_empty()
        && id
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(id.to_string())
    } else {
        Err(TrackerError::InvalidSpreadsheetUrl(url.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_from_share_url() {
        let url = "https://docs.google.com/spreadsheets/d/1Oo-ZlGXV2gioSCmp_x8s_cqJDDKR4shXjWzJqacZYxA/edit?usp=sharing";
        assert_eq!(
            spreadsheet_id(url).unwrap(),
            "1Oo-ZlGXV2gioSCmp_x8s_cqJDDKR4shXjWzJqacZYxA"
        );
    }

    #[test]
    fn test_id_without_trailing_path() {
        let url = "https://docs.google.com/spreadsheets/d/abc123#gid=0";
        assert_eq!(spreadsheet_id(url).unwrap(), "abc123");
    }

    #[test]
    fn test_bare_id() {
        assert_eq!(spreadsheet_id("abc_123-XYZ").unwrap(), "abc_123-XYZ");
    }

    #[test]
    fn test_invalid_urls() {
        assert!(spreadsheet_id("https://example.com/not-a-sheet").is_err());
        assert!(spreadsheet_id("https://docs.google.com/spreadsheets/d/").is_err());
        assert!(spreadsheet_id("").is_err());
    }
}

use caltrack::config::SheetsConfig;
use caltrack::credentials::{FileCredentials, SecretStoreCredentials, ServiceAccountKey};
use caltrack::{LogRow, NutritionRecord, RowSink, RowStore, SheetsStore, TrackerError};
use mockito::{Matcher, Mock, Server};
use serde_json::json;

const APPEND_PATH: &str = "/v4/spreadsheets/sheet123/values/A1:append";

fn service_account(server: &Server) -> ServiceAccountKey {
    let contents = include_str!("fixtures/service_account.json");
    let mut key: ServiceAccountKey = serde_json::from_str(contents).unwrap();
    key.token_uri = format!("{}/token", server.url());
    key
}

fn sheets_config(server: &Server) -> SheetsConfig {
    SheetsConfig {
        spreadsheet_url: "https://docs.google.com/spreadsheets/d/sheet123/edit?usp=sharing"
            .to_string(),
        api_base: server.url(),
        ..SheetsConfig::default()
    }
}

fn store(server: &Server) -> SheetsStore {
    SheetsStore::new(
        sheets_config(server),
        Box::new(SecretStoreCredentials::new(service_account(server))),
    )
    .unwrap()
}

async fn token_mock(server: &mut Server) -> Mock {
    server
        .mock("POST", "/token")
        .match_body(Matcher::UrlEncoded(
            "grant_type".into(),
            "urn:ietf:params:oauth:grant-type:jwt-bearer".into(),
        ))
        .with_status(200)
        .with_header("content-type", "application/json")
        .with_body(r#"{"access_token": "test-token", "expires_in": 3599, "token_type": "Bearer"}"#)
        .create_async()
        .await
}

fn apple_row() -> LogRow {
    let record = NutritionRecord {
        item: "Apple".to_string(),
        quantity: "1 medium".to_string(),
        calories: "95".to_string(),
        protein: "0.5".to_string(),
        carbs: "25".to_string(),
        fat: "0.3".to_string(),
        notes: String::new(),
    };
    LogRow::from_record("2024-05-01 12:00:00", &record)
}

#[tokio::test]
async fn test_append_row() {
    let mut server = Server::new_async().await;
    let token = token_mock(&mut server).await;
    let append = server
        .mock("POST", APPEND_PATH)
        .match_query(Matcher::AllOf(vec![
            Matcher::UrlEncoded("valueInputOption".into(), "RAW".into()),
            Matcher::UrlEncoded("insertDataOption".into(), "INSERT_ROWS".into()),
        ]))
        .match_header("authorization", "Bearer test-token")
        .match_body(Matcher::Json(json!({
            "values": [[
                "2024-05-01 12:00:00", "Apple", "1 medium", "95", "0.5", "25", "0.3", ""
            ]]
        })))
        .with_status(200)
        .with_body(r#"{"spreadsheetId": "sheet123", "updates": {"updatedRows": 1}}"#)
        .create_async()
        .await;

    let sink = store(&server).open().await.unwrap();
    sink.append_row(&apple_row()).await.unwrap();

    token.assert_async().await;
    append.assert_async().await;
}

#[tokio::test]
async fn test_token_rejected() {
    let mut server = Server::new_async().await;
    let _token = server
        .mock("POST", "/token")
        .with_status(400)
        .with_body(r#"{"error": "invalid_grant"}"#)
        .create_async()
        .await;

    let result = store(&server).open().await;
    match result {
        Err(TrackerError::Auth(message)) => assert!(message.contains("invalid_grant")),
        Err(other) => panic!("expected Auth error, got {:?}", other),
        Ok(_) => panic!("expected Auth error"),
    }
}

#[tokio::test]
async fn test_append_failure_is_store_error() {
    let mut server = Server::new_async().await;
    let _token = token_mock(&mut server).await;
    let _append = server
        .mock("POST", APPEND_PATH)
        .match_query(Matcher::Any)
        .with_status(403)
        .with_body(r#"{"error": {"message": "The caller does not have permission"}}"#)
        .create_async()
        .await;

    let sink = store(&server).open().await.unwrap();
    let result = sink.append_row(&apple_row()).await;

    match result {
        Err(TrackerError::Store(message)) => {
            assert!(message.contains("403"));
            assert!(message.contains("does not have permission"));
        }
        other => panic!("expected Store error, got {:?}", other),
    }
}

#[tokio::test]
async fn test_invalid_spreadsheet_url() {
    let server = Server::new_async().await;
    let config = SheetsConfig {
        spreadsheet_url: "https://example.com/nope".to_string(),
        ..sheets_config(&server)
    };
    let store = SheetsStore::new(
        config,
        Box::new(SecretStoreCredentials::new(service_account(&server))),
    )
    .unwrap();

    assert!(matches!(
        store.open().await,
        Err(TrackerError::InvalidSpreadsheetUrl(_))
    ));
}

#[tokio::test]
async fn test_missing_credentials_file() {
    let server = Server::new_async().await;
    let store = SheetsStore::new(
        sheets_config(&server),
        Box::new(FileCredentials::new("does/not/exist.json")),
    )
    .unwrap();

    assert!(matches!(
        store.open().await,
        Err(TrackerError::Credentials(_))
    ));
}

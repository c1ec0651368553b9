//! Tests for the DashboardError type

use wastebin_dashboard::DashboardError;

#[test]
fn test_error_display_missing_input() {
    let err = DashboardError::MissingInput("bin id".to_string());
    assert_eq!(format!("{}", err), "Missing input: bin id");
}

#[test]
fn test_error_display_invalid_input() {
    let err = DashboardError::InvalidInput("fill level 'x'".to_string());
    assert_eq!(format!("{}", err), "Invalid input: fill level 'x'");
}

#[test]
fn test_error_display_http() {
    let err = DashboardError::Http("Failed to fetch".to_string());
    assert_eq!(format!("{}", err), "HTTP request failed: Failed to fetch");
}

#[test]
fn test_error_display_api() {
    let err = DashboardError::Api {
        status: 400,
        message: "Missing bin_id or fill_level".to_string(),
    };
    assert_eq!(
        format!("{}", err),
        "Server returned 400: Missing bin_id or fill_level"
    );
}

#[test]
fn test_error_display_dom() {
    let err = DashboardError::Dom("Bootstrap is not loaded".to_string());
    assert_eq!(format!("{}", err), "DOM error: Bootstrap is not loaded");
}

#[test]
fn test_error_display_config() {
    let err = DashboardError::Config("unreadable".to_string());
    assert_eq!(format!("{}", err), "Configuration error: unreadable");
}

#[test]
fn test_error_from_json() {
    let json_err = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
    let err: DashboardError = json_err.into();
    assert!(format!("{}", err).starts_with("JSON parse error:"));
}

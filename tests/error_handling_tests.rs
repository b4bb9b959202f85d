//! Error handling tests for the One Touch client

use epay_onetouch::{ClientConfig, EpayError, Endpoints, OneTouchClient};

#[test]
fn test_config_error_message() {
    let error = EpayError::config("app_id cannot be empty");

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("Configuration error"),
        "Error message MUST contain 'Configuration error' - actual: {}",
        error_msg
    );
    assert!(
        error_msg.contains("app_id cannot be empty"),
        "Error message MUST contain the specific reason - actual: {}",
        error_msg
    );
}

#[test]
fn test_json_error_conversion() {
    let json_error = serde_json::from_str::<serde_json::Value>("{not json").unwrap_err();
    let error: EpayError = json_error.into();

    assert!(matches!(error, EpayError::Json(_)));
    assert!(error.to_string().starts_with("JSON error:"));
    assert!(error.status().is_none());
}

#[test]
fn test_url_error_from_bad_endpoint() {
    let error = Endpoints::custom("::nope::", "https://example.com").unwrap_err();

    assert!(matches!(error, EpayError::Url(_)));
    assert!(error.to_string().starts_with("URL error:"));
}

#[test]
fn test_non_http_endpoint_rejected() {
    let error = Endpoints::custom("https://example.com", "mailto:pay@example.com").unwrap_err();

    let error_msg = error.to_string();
    assert!(
        error_msg.contains("http or https"),
        "Error message MUST name the allowed schemes - actual: {}",
        error_msg
    );
}

#[test]
fn test_empty_credentials_rejected() {
    for (app_id, secret, kin, field) in [
        ("", "secret", "kin", "app_id"),
        ("app", "", "kin", "secret"),
        ("app", "secret", "", "kin"),
    ] {
        let error = OneTouchClient::new(ClientConfig::new(true, app_id, secret, kin)).unwrap_err();
        assert!(
            error.to_string().contains(field),
            "Error message MUST name the empty field {} - actual: {}",
            field,
            error
        );
    }
}

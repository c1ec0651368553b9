//! Alert simulation API types
//!
//! These mirror the JSON bodies of the `/api/alert` endpoint and are shared
//! between the browser client and the native simulator.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Sensor alert payload posted to /api/alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SimulatedAlert {
    pub bin_id: String,
    pub fill_level: i64,
}

impl SimulatedAlert {
    /// Build a payload from the raw text of the two input fields
    pub fn from_inputs(bin_id: &str, fill_level: &str) -> crate::Result<Self> {
        if bin_id.is_empty() || fill_level.is_empty() {
            return Err(crate::DashboardError::MissingInput(
                "bin id and fill level are required".to_string(),
            ));
        }
        Ok(Self {
            bin_id: bin_id.to_string(),
            fill_level: parse_fill_level(fill_level)?,
        })
    }
}

/// Successful reply from /api/alert
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlertResponse {
    pub severity: String,
    #[serde(default)]
    pub message: Option<String>,
}

/// Error reply from /api/alert (400 or 404)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorBody {
    pub error: String,
}

/// Parse a fill level the way `parseInt` reads form input: leading
/// whitespace, an optional sign, then the longest run of digits. A `0x`
/// prefix switches to hexadecimal.
pub fn parse_fill_level(raw: &str) -> crate::Result<i64> {
    let trimmed = raw.trim_start();
    let (sign, rest) = match trimmed.as_bytes().first() {
        Some(b'-') => (-1, &trimmed[1..]),
        Some(b'+') => (1, &trimmed[1..]),
        _ => (1, trimmed),
    };
    let (radix, rest) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };
    let digits_len = rest
        .chars()
        .take_while(|c| c.is_digit(radix))
        .count();
    if digits_len == 0 {
        return Err(crate::DashboardError::InvalidInput(format!(
            "fill level '{}' is not a whole number",
            raw
        )));
    }
    i64::from_str_radix(&rest[..digits_len], radix)
        .map(|n| sign * n)
        .map_err(|e| {
            crate::DashboardError::InvalidInput(format!("fill level '{}': {}", raw, e))
        })
}

/// Interpret an HTTP reply from /api/alert
pub fn decode_response(status: u16, body: &str) -> crate::Result<AlertResponse> {
    if !(200..300).contains(&status) {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .map(|b| b.error)
            .unwrap_or_else(|_| format!("unexpected response body ({} bytes)", body.len()));
        return Err(crate::DashboardError::Api { status, message });
    }
    let response: AlertResponse = serde_json::from_str(body)?;
    Ok(response)
}

/// Abstraction over the alert endpoint for dependency injection
#[async_trait(?Send)]
#[cfg_attr(test, mockall::automock)]
pub trait AlertApi {
    /// POST the payload as JSON and decode the reply
    async fn post_alert(&self, alert: &SimulatedAlert) -> crate::Result<AlertResponse>;
}

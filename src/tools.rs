//! Tool bodies and schemas for the APOD gateway.
//!
//! Result bodies are typed structs serialized with serde, so the dispatch
//! layer in `server.rs` stays thin and the shapes are testable without a
//! live transport.

use chrono::Utc;
use serde::Serialize;
use serde_json::{json, Map, Value};

use crate::config::Stage;

pub const QUERY_APOD: &str = "query_apod";
pub const GET_API_INFO: &str = "get_api_info";

/// Error-shaped body for a privileged tool called without a credential.
///
/// A structured result rather than a protocol fault, so clients can tell
/// "you forgot auth" apart from "the service is broken".
#[derive(Debug, Serialize)]
pub struct MissingCredential {
    pub error: &'static str,
}

pub fn missing_credential_error() -> MissingCredential {
    MissingCredential {
        error: "No API key found. Please authenticate with Authorization: Bearer YOUR_API_KEY",
    }
}

/// Acknowledgment of an authenticated APOD query.
///
/// The upstream NASA API call is not wired up; the body mirrors the shape a
/// real lookup would return so end-to-end flows can be exercised.
#[derive(Debug, Serialize)]
pub struct QueryApodResult {
    pub status: &'static str,
    pub message: &'static str,
    pub query: String,
    pub timestamp: String,
}

pub fn query_apod_result(query: &str) -> QueryApodResult {
    QueryApodResult {
        status: "success",
        message: "APOD query accepted; upstream NASA API integration is not connected.",
        query: query.to_string(),
        timestamp: Utc::now().to_rfc3339(),
    }
}

/// Service metadata plus the caller's authentication status.
#[derive(Debug, Serialize)]
pub struct ApiInfo {
    pub status: &'static str,
    pub auth_status: &'static str,
    pub api_name: &'static str,
    pub api_url: &'static str,
    pub stage: String,
    pub documentation: &'static str,
    pub description: &'static str,
    pub authentication: &'static str,
}

pub fn api_info(stage: Stage, authenticated: bool) -> ApiInfo {
    ApiInfo {
        status: "ready",
        auth_status: if authenticated {
            "authenticated"
        } else {
            "not authenticated"
        },
        api_name: "NASA Astronomy Picture of the Day",
        api_url: stage.api_base_url(),
        stage: stage.to_string(),
        documentation: "https://api.nasa.gov/",
        description: "NASA APOD API integration for astronomy data",
        authentication: "Bearer token required in Authorization header",
    }
}

pub fn query_apod_schema() -> Map<String, Value> {
    object_schema(json!({
        "type": "object",
        "properties": {
            "query": {
                "type": "string",
                "description": "Free-form APOD query, e.g. a date or search term"
            }
        },
        "required": ["query"]
    }))
}

pub fn get_api_info_schema() -> Map<String, Value> {
    object_schema(json!({
        "type": "object",
        "properties": {}
    }))
}

fn object_schema(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_error_names_the_expected_header() {
        let body = missing_credential_error();
        assert!(body.error.contains("Authorization: Bearer YOUR_API_KEY"));
    }

    #[test]
    fn query_result_echoes_the_query() {
        let body = query_apod_result("2024-01-01");
        assert_eq!(body.status, "success");
        assert_eq!(body.query, "2024-01-01");
        assert!(!body.timestamp.is_empty());
    }

    #[test]
    fn api_info_reports_auth_status() {
        assert_eq!(api_info(Stage::Mainnet, true).auth_status, "authenticated");
        assert_eq!(
            api_info(Stage::Mainnet, false).auth_status,
            "not authenticated"
        );
    }

    #[test]
    fn api_info_serializes_the_wire_field_names() {
        let body = serde_json::to_value(api_info(Stage::Testnet, false)).unwrap();
        assert_eq!(body["auth_status"], "not authenticated");
        assert_eq!(body["stage"], "TESTNET");
        assert_eq!(body["api_url"], Stage::Testnet.api_base_url());
        assert_eq!(body["authentication"], "Bearer token required in Authorization header");
    }

    #[test]
    fn query_schema_requires_the_query_argument() {
        let schema = query_apod_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["required"][0], "query");
    }
}

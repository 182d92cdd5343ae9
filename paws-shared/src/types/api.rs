//! JSON envelopes shared by every PawsomePals service.
//!
//! Handlers return `ApiResponse<T>` on success; `AppError` renders the
//! matching `ApiErrorResponse`, so clients always see either
//! `{ "success": true, "data": ... }` or `{ "success": false, "error": ... }`.

use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub data: T,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self { success: true, data }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    pub success: bool,
    pub error: ApiErrorDetail,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ApiErrorDetail {
    /// Stable machine code, e.g. `E3002`. Clients branch on this, not
    /// on the human-readable message.
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ApiErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error: ApiErrorDetail {
                code: code.into(),
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn with_details(mut self, details: serde_json::Value) -> Self {
        self.error.details = Some(details);
        self
    }
}

/// Liveness payload for the `/health` endpoint every service exposes.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub service: String,
    pub version: String,
}

impl HealthResponse {
    pub fn healthy(service: impl Into<String>, version: impl Into<String>) -> Self {
        Self {
            status: "ok",
            service: service.into(),
            version: version.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn success_envelope_wraps_the_payload() {
        let json = serde_json::to_value(ApiResponse::ok(vec![1, 2, 3])).unwrap();
        assert_eq!(json, serde_json::json!({ "success": true, "data": [1, 2, 3] }));
    }

    #[test]
    fn error_envelope_omits_empty_details() {
        let json = serde_json::to_value(ApiErrorResponse::new("E0002", "bad input")).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "success": false,
                "error": { "code": "E0002", "message": "bad input" }
            })
        );
    }

    #[test]
    fn error_details_round_trip() {
        let resp = ApiErrorResponse::new("E0002", "bad input")
            .with_details(serde_json::json!({ "field": "breed" }));
        let json = serde_json::to_value(resp).unwrap();
        assert_eq!(json["error"]["details"]["field"], "breed");
    }
}

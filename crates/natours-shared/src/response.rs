//! Standardized API response envelope.

use serde::{Deserialize, Serialize};

/// Outcome class of a response: 2xx success, 4xx failure, 5xx error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Success,
    Failure,
    Error,
}

impl Status {
    pub fn from_code(code: u16) -> Self {
        match code {
            400..=499 => Status::Failure,
            500..=599 => Status::Error,
            _ => Status::Success,
        }
    }
}

/// List metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Meta {
    pub results: usize,
}

/// Every response body: `status` plus data, a message, or an access token.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiResponse<T> {
    pub status: Status,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Meta>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            status: Status::Success,
            access_token: None,
            meta: None,
            data: Some(data),
            message: None,
        }
    }

    pub fn with_access_token(mut self, token: impl Into<String>) -> Self {
        self.access_token = Some(token.into());
        self
    }

    pub fn with_meta(mut self, results: usize) -> Self {
        self.meta = Some(Meta { results });
        self
    }
}

impl ApiResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            access_token: None,
            meta: None,
            data: None,
            message: Some(message.into()),
        }
    }

    pub fn token(token: impl Into<String>) -> Self {
        Self {
            status: Status::Success,
            access_token: Some(token.into()),
            meta: None,
            data: None,
            message: None,
        }
    }

    /// Failure or error body for an HTTP status code.
    pub fn from_error(code: u16, message: impl Into<String>) -> Self {
        Self {
            status: Status::from_code(code),
            access_token: None,
            meta: None,
            data: None,
            message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_status_from_code() {
        assert_eq!(Status::from_code(201), Status::Success);
        assert_eq!(Status::from_code(404), Status::Failure);
        assert_eq!(Status::from_code(500), Status::Error);
    }

    #[test]
    fn test_error_body_shape() {
        let body = serde_json::to_value(ApiResponse::from_error(400, "Please provide a password"))
            .unwrap();

        assert_eq!(body, json!({"status": "failure", "message": "Please provide a password"}));
    }

    #[test]
    fn test_token_body_shape() {
        let body = serde_json::to_value(ApiResponse::token("abc")).unwrap();

        assert_eq!(body, json!({"status": "success", "accessToken": "abc"}));
    }
}

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum StoreError {
    /// The remote service rejected the call; carries its error message.
    #[error("{0}")]
    Remote(String),

    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
}

/// Pulls a human-readable message out of a remote error body.
///
/// The data service reports `{"message": ...}`, the auth service either
/// `{"error_description": ...}` or `{"msg": ...}`. Anything else falls back
/// to the status code.
pub fn remote_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        for key in ["message", "error_description", "msg"] {
            if let Some(message) = value.get(key).and_then(|m| m.as_str()) {
                return message.to_string();
            }
        }
    }
    format!("remote call failed with status {status}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn prefers_message_field() {
        let body = r#"{"message":"duplicate key value"}"#;
        assert_eq!(
            remote_message(StatusCode::CONFLICT, body),
            "duplicate key value"
        );
    }

    #[test]
    fn reads_auth_error_shapes() {
        let body = r#"{"error_description":"Invalid login credentials"}"#;
        assert_eq!(
            remote_message(StatusCode::BAD_REQUEST, body),
            "Invalid login credentials"
        );
    }

    #[test]
    fn falls_back_to_status() {
        assert_eq!(
            remote_message(StatusCode::BAD_GATEWAY, "<html>"),
            "remote call failed with status 502 Bad Gateway"
        );
    }
}

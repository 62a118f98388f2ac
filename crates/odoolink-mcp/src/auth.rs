// ABOUTME: Optional bearer token authentication middleware for the HTTP transport
// ABOUTME: Enforces ODOOLINK_API_KEY when set, allows unauthenticated access otherwise
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2026 dravr.ai

use axum::extract::Request;
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use subtle::ConstantTimeEq;

/// Environment variable name for the API key
pub const API_KEY_ENV: &str = "ODOOLINK_API_KEY";

/// Middleware that validates the bearer token against `ODOOLINK_API_KEY`
///
/// The env var is read on every request to allow runtime key rotation
/// without restarting the server. If the variable is not set, all requests
/// are allowed through (localhost development mode). If set, requests must
/// include a matching `Authorization: Bearer <key>` header.
pub async fn require_auth(request: Request, next: Next) -> Response {
    let expected_key = match std::env::var(API_KEY_ENV) {
        Ok(key) if !key.is_empty() => key,
        _ => return next.run(request).await,
    };

    let auth_header = request
        .headers()
        .get("authorization")
        .and_then(|v| v.to_str().ok());

    match auth_header.map(|header| header.strip_prefix("Bearer ")) {
        Some(Some(token)) => {
            if bool::from(token.as_bytes().ct_eq(expected_key.as_bytes())) {
                next.run(request).await
            } else {
                auth_error("Invalid API key")
            }
        }
        Some(None) => auth_error("Authorization header must use Bearer scheme"),
        None => auth_error("Missing Authorization header"),
    }
}

/// Build a 401 error response
fn auth_error(message: &str) -> Response {
    let body = json!({ "error": { "kind": "authentication_error", "message": message } });
    (StatusCode::UNAUTHORIZED, Json(body)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn api_key_env_is_correct() {
        assert_eq!(API_KEY_ENV, "ODOOLINK_API_KEY");
    }

    #[test]
    fn rejection_is_unauthorized() {
        let response = auth_error("Missing Authorization header");
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

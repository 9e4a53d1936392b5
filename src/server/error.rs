//! Mapping of handshake and proxy errors onto HTTP responses.
//!
//! Bodies are plain text and fixed per variant. The internal detail only
//! goes to the log: 4xx at `warn`, 5xx at `error`.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use crate::auth::oauth::OAuthError;
use crate::proxy::ProxyError;

fn status(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for OAuthError {
    fn into_response(self) -> Response {
        let status = status(self.status_code());
        if status.is_server_error() {
            tracing::error!(error = %self, "Install handshake failed");
        } else {
            tracing::warn!(error = %self, "Install handshake rejected");
        }
        (status, self.public_message()).into_response()
    }
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Could not forward request");
        (status(self.status_code()), self.public_message()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::oauth::UpstreamStep;
    use crate::clients::HttpError;

    async fn body_text(response: Response) -> String {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn test_state_mismatch_response() {
        let response = OAuthError::StateMismatch {
            query_present: true,
            cookie_present: false,
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(body_text(response).await, "Request origin cannot be verified");
    }

    #[tokio::test]
    async fn test_upstream_failure_hides_details() {
        let response = OAuthError::UpstreamRequestFailed {
            step: UpstreamStep::CodeExchange,
            source: HttpError::Status {
                status: 401,
                body: "invalid client_secret".to_string(),
            },
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_text(response).await;
        assert_eq!(body, "Unexpected Error. See server logs for details.");
        assert!(!body.contains("client_secret"));
    }

    #[tokio::test]
    async fn test_proxy_error_response() {
        let response = ProxyError::TargetUnreachable(HttpError::Timeout).into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            response.headers()["content-type"],
            "text/plain; charset=utf-8"
        );
        assert_eq!(body_text(response).await, "Could not get resource");
    }
}

//! HTTP implementation of the chat backend transport.
//!
//! Talks JSON to the courier-support REST endpoints. A reply body that
//! parses is always surfaced to the controller as a reply, whatever the
//! HTTP status was; only requests that never produce a usable body become
//! [`TransportError`]s.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use kurir_core::error::{KurirError, Result};
use kurir_core::session::Rating;
use kurir_core::transport::{
    HistoryReply, MessageReply, RatingReply, Transport, TransportError,
};

use crate::config;

const SEND_MESSAGE_PATH: &str = "/api/send-message/";
const SUBMIT_RATING_PATH: &str = "/api/submit-rating/";
const HISTORY_PATH: &str = "/api/history";
const CSRF_HEADER: &str = "X-CSRFToken";
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// [`Transport`] implementation over plain JSON/HTTP.
#[derive(Clone)]
pub struct HttpTransport {
    client: Client,
    base_url: String,
    csrf_token: Option<String>,
    timeout: Duration,
}

impl HttpTransport {
    /// Creates a transport for the backend at the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Self {
            client: Client::new(),
            base_url,
            csrf_token: None,
            timeout: DEFAULT_TIMEOUT,
        }
    }

    /// Loads backend settings, preferring the configuration file.
    ///
    /// Priority:
    /// 1. ~/.config/kurir/config.json
    /// 2. Environment variables (KURIR_BASE_URL, KURIR_CSRF_TOKEN)
    ///
    /// # Errors
    ///
    /// Returns an error if neither source provides a base URL.
    pub fn try_from_env() -> Result<Self> {
        let config = match config::load_backend_config() {
            Ok(config) => config,
            Err(_) => config::from_env().ok_or_else(|| {
                KurirError::config(format!(
                    "backend base URL not found in ~/.config/kurir/config.json or {}",
                    config::BASE_URL_ENV
                ))
            })?,
        };

        let mut transport = Self::new(config.base_url);
        if let Some(token) = config.csrf_token {
            transport = transport.with_csrf_token(token);
        }
        if let Some(secs) = config.timeout_secs {
            transport = transport.with_timeout(Duration::from_secs(secs));
        }
        Ok(transport)
    }

    /// Sets the anti-forgery token sent with every POST.
    pub fn with_csrf_token(mut self, token: impl Into<String>) -> Self {
        self.csrf_token = Some(token.into());
        self
    }

    /// Overrides the per-request timeout.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn post_json<B, R>(
        &self,
        path: &str,
        body: &B,
    ) -> std::result::Result<(StatusCode, R), TransportError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let mut request = self
            .client
            .post(self.endpoint(path))
            .timeout(self.timeout)
            .json(body);
        if let Some(token) = &self.csrf_token {
            request = request.header(CSRF_HEADER, token);
        }

        tracing::debug!(path, "posting to chat backend");
        let response = request.send().await.map_err(map_request_error)?;
        read_reply(response).await
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send_message(
        &self,
        message: &str,
        session_id: Option<&str>,
    ) -> std::result::Result<MessageReply, TransportError> {
        let body = SendMessageRequest {
            message,
            session_id,
        };
        let (status, mut reply): (_, MessageReply) =
            self.post_json(SEND_MESSAGE_PATH, &body).await?;
        // A non-2xx reply is server-reported even if the body claims success.
        if !status.is_success() && reply.is_success() {
            reply.status = format!("http-{}", status.as_u16());
        }
        Ok(reply)
    }

    async fn submit_rating(
        &self,
        rating: &Rating,
    ) -> std::result::Result<RatingReply, TransportError> {
        let body = SubmitRatingRequest {
            rating: rating.value,
            comment: &rating.comment,
            session_id: rating.session_id.as_deref(),
        };
        let (status, mut reply): (_, RatingReply) =
            self.post_json(SUBMIT_RATING_PATH, &body).await?;
        if !status.is_success() && reply.is_success() {
            reply.status = format!("http-{}", status.as_u16());
        }
        Ok(reply)
    }

    async fn fetch_history(
        &self,
        session_id: &str,
    ) -> std::result::Result<HistoryReply, TransportError> {
        let url = format!("{}/{}/", self.endpoint(HISTORY_PATH), session_id);
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(map_request_error)?;
        let (status, mut reply): (_, HistoryReply) = read_reply(response).await?;
        if !status.is_success() && reply.is_success() {
            reply.status = format!("http-{}", status.as_u16());
        }
        Ok(reply)
    }
}

#[derive(Serialize)]
struct SendMessageRequest<'a> {
    message: &'a str,
    session_id: Option<&'a str>,
}

#[derive(Serialize)]
struct SubmitRatingRequest<'a> {
    rating: u8,
    comment: &'a str,
    session_id: Option<&'a str>,
}

async fn read_reply<R: DeserializeOwned>(
    response: reqwest::Response,
) -> std::result::Result<(StatusCode, R), TransportError> {
    let status = response.status();
    let body = response.text().await.map_err(map_request_error)?;
    let reply = decode_reply(status, &body)?;
    Ok((status, reply))
}

fn decode_reply<R: DeserializeOwned>(
    status: StatusCode,
    body: &str,
) -> std::result::Result<R, TransportError> {
    serde_json::from_str(body).map_err(|err| {
        log::warn!("unreadable backend reply (HTTP {status}): {err}");
        TransportError::InvalidBody(format!("HTTP {}: {err}", status.as_u16()))
    })
}

fn map_request_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::Connection(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_endpoint_joins_without_double_slash() {
        let transport = HttpTransport::new("http://localhost:8000/");
        assert_eq!(
            transport.endpoint(SEND_MESSAGE_PATH),
            "http://localhost:8000/api/send-message/"
        );
    }

    #[test]
    fn test_send_message_request_shape() {
        let body = SendMessageRequest {
            message: "status paket saya",
            session_id: Some("s1"),
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"message": "status paket saya", "session_id": "s1"})
        );
    }

    #[test]
    fn test_submit_rating_request_shape() {
        let body = SubmitRatingRequest {
            rating: 5,
            comment: "",
            session_id: None,
        };
        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            serde_json::json!({"rating": 5, "comment": "", "session_id": null})
        );
    }

    #[test]
    fn test_decode_success_reply() {
        let reply: MessageReply = decode_reply(
            StatusCode::OK,
            r#"{"response": "Paket Anda dalam pengiriman.", "session_id": "s1", "status": "success"}"#,
        )
        .unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.session_id.as_deref(), Some("s1"));
        assert_eq!(reply.response, "Paket Anda dalam pengiriman.");
    }

    #[test]
    fn test_decode_server_error_reply() {
        let reply: MessageReply = decode_reply(
            StatusCode::INTERNAL_SERVER_ERROR,
            r#"{"error": "Terjadi kesalahan server. Silakan coba lagi.", "status": "error",
                "fallback_response": "Maaf, sistem sedang mengalami gangguan."}"#,
        )
        .unwrap();
        assert!(!reply.is_success());
        assert_eq!(
            reply.fallback_response.as_deref(),
            Some("Maaf, sistem sedang mengalami gangguan.")
        );
    }

    #[test]
    fn test_decode_garbage_is_invalid_body() {
        let err = decode_reply::<MessageReply>(StatusCode::BAD_GATEWAY, "<html>nope</html>")
            .unwrap_err();
        assert!(matches!(err, TransportError::InvalidBody(_)));
    }

    #[test]
    fn test_decode_history_reply() {
        let reply: HistoryReply = decode_reply(
            StatusCode::OK,
            r#"{"status": "success", "history": [
                {"content": "halo", "is_user": true, "timestamp": "2025-01-01T10:00:00Z"}
            ]}"#,
        )
        .unwrap();
        assert!(reply.is_success());
        assert_eq!(reply.history.len(), 1);
        assert!(reply.history[0].is_user);
    }
}

use async_stream::try_stream;

use futures_core::Stream;
use futures_util::StreamExt;
use guru_core::credential::Credential;
use reqwest::{
    Client as HttpClient, Response, StatusCode,
    header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue},
};
use std::time::Duration;

use crate::{
    api_v1::{ApiErrorEnvelope, ChatCompletionChunkResponse, ChatCompletionRequest},
    error::OpenAiError,
    sse::decode_chunks,
};

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";

/// Minimal HTTP client for an OpenAI-compatible *chat/completions* endpoint.
///
/// * Streaming only: the reply is consumed as server-sent events.
/// * The credential is passed per request, so one client serves every
///   session.
/// * Shares a single `reqwest::Client`, so cloning `OpenAiClient` is cheap.
#[derive(Clone, Debug)]
pub struct OpenAiClient {
    http: HttpClient,
    base: String,
}

impl OpenAiClient {
    /// Build a default `reqwest` client. Without `timeout` a request may
    /// take as long as the upstream keeps streaming.
    pub fn new(base_url: Option<String>, timeout: Option<Duration>) -> Result<Self, OpenAiError> {
        let mut builder = HttpClient::builder();
        if let Some(timeout) = timeout {
            builder = builder.timeout(timeout);
        }

        Ok(Self::with_http(builder.build()?, base_url))
    }

    /// Build with a custom `reqwest::Client` in case the caller needs proxy
    /// settings, custom TLS, etc.
    pub fn with_http(http: HttpClient, base_url: Option<String>) -> Self {
        let base = base_url.unwrap_or_else(|| DEFAULT_BASE_URL.to_owned());
        Self {
            http,
            base: base.trim_end_matches('/').to_owned(),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn headers(credential: &Credential) -> Result<HeaderMap, OpenAiError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {}", credential.expose()))
            .map_err(|_| OpenAiError::InvalidCredential)?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        headers.insert(ACCEPT, HeaderValue::from_static("text/event-stream"));
        headers.insert(AUTHORIZATION, bearer);
        Ok(headers)
    }

    /// Perform a **streaming** chat completion.
    pub fn chat_completion_stream(
        &self,
        request: ChatCompletionRequest,
        credential: &Credential,
    ) -> impl Stream<Item = Result<ChatCompletionChunkResponse, OpenAiError>> + Send + '_ {
        let request = request.stream(true);
        let headers = Self::headers(credential);
        let url = format!("{}/chat/completions", self.base);

        try_stream! {
            let headers = headers?;
            tracing::debug!(%url, model = %request.model, "sending chat completion request");

            let resp = self.http.post(url).headers(headers).json(&request).send().await?;
            let resp = ensure_success(resp).await?;

            let chunks = decode_chunks(resp.bytes_stream());
            futures_util::pin_mut!(chunks);

            while let Some(chunk) = chunks.next().await {
                yield chunk?;
            }
        }
    }
}

async fn ensure_success(resp: Response) -> Result<Response, OpenAiError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    tracing::warn!(%status, "chat completion rejected");
    match resp.text().await {
        Ok(body) => Err(api_error(status, &body)),
        Err(err) => Err(OpenAiError::Api {
            status,
            message: format!("error body could not be read: {err}"),
        }),
    }
}

/// Prefer the `error.message` of a JSON error body over the raw text.
fn api_error(status: StatusCode, body: &str) -> OpenAiError {
    let message = serde_json::from_str::<ApiErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.trim().to_owned());

    OpenAiError::Api { status, message }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn json_error_bodies_are_unwrapped() {
        let err = api_error(
            StatusCode::UNAUTHORIZED,
            r#"{"error":{"message":"Invalid API Key","type":"invalid_request_error","code":"invalid_api_key"}}"#,
        );
        assert!(matches!(err, OpenAiError::Api { status, ref message }
            if status == StatusCode::UNAUTHORIZED && message == "Invalid API Key"));

        let err = api_error(StatusCode::BAD_GATEWAY, " upstream down \n");
        assert!(matches!(err, OpenAiError::Api { ref message, .. } if message == "upstream down"));
    }

    #[test]
    fn base_url_trailing_slash_is_dropped() {
        let client = OpenAiClient::with_http(HttpClient::new(), Some("http://localhost:1/v1/".into()));
        assert_eq!(client.base_url(), "http://localhost:1/v1");
        assert_eq!(
            OpenAiClient::with_http(HttpClient::new(), None).base_url(),
            DEFAULT_BASE_URL
        );
    }

    #[test]
    fn credential_with_control_characters_is_rejected() {
        let credential = Credential::new("bad\u{7f}key").unwrap();
        assert!(matches!(
            OpenAiClient::headers(&credential),
            Err(OpenAiError::InvalidCredential)
        ));
    }
}

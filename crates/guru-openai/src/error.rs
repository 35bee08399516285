use guru_core::error::GuruError;
use reqwest::StatusCode;

/// High-level error type covering every failure mode the client can hit.
#[derive(Debug, thiserror::Error)]
pub enum OpenAiError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("couldn’t (de)serialise payload: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("upstream returned non-success status {status}: {message}")]
    Api { status: StatusCode, message: String },

    /// An `{"error": …}` object arrived inside the event stream.
    #[error("upstream reported an error mid-stream: {0}")]
    Upstream(String),

    #[error("credential cannot be sent as a bearer token")]
    InvalidCredential,

    #[error("stream format error: {0}")]
    Format(String),
}

impl From<OpenAiError> for GuruError {
    fn from(value: OpenAiError) -> Self {
        match value {
            OpenAiError::Http(err) => GuruError::Transport(Box::new(err)),
            OpenAiError::Api { status, message }
                if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN =>
            {
                GuruError::Authentication(format!("{status}: {message}"))
            }
            OpenAiError::InvalidCredential => GuruError::Authentication(value.to_string()),
            OpenAiError::Api { .. }
            | OpenAiError::Upstream(_)
            | OpenAiError::Serde(_)
            | OpenAiError::Format(_) => GuruError::Remote(value.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejected_keys_become_authentication_errors() {
        for status in [StatusCode::UNAUTHORIZED, StatusCode::FORBIDDEN] {
            let err: GuruError = OpenAiError::Api {
                status,
                message: "Invalid API Key".into(),
            }
            .into();
            assert!(matches!(err, GuruError::Authentication(ref m) if m.contains("Invalid API Key")));
        }
    }

    #[test]
    fn other_statuses_and_payload_errors_are_remote() {
        let err: GuruError = OpenAiError::Api {
            status: StatusCode::TOO_MANY_REQUESTS,
            message: "slow down".into(),
        }
        .into();
        assert!(matches!(err, GuruError::Remote(_)));

        let err: GuruError = OpenAiError::Upstream("model overloaded".into()).into();
        assert!(matches!(err, GuruError::Remote(ref m) if m.contains("model overloaded")));

        let err: GuruError = OpenAiError::Format("bad frame".into()).into();
        assert!(err.is_gateway_failure());
    }
}

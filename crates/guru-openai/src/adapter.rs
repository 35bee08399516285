use std::{sync::Arc, time::Duration};

use guru_core::error::{GuruError, Result};

use crate::client::OpenAiClient;

/// Wires the HTTP client [`OpenAiClient`] into a value that implements
/// [`guru_core::provider::StreamingChatProvider`].
///
/// The adapter holds no credential: every request carries the one resolved
/// for its session, so a single adapter can serve many sessions.
#[derive(Debug, Clone)]
pub struct OpenAiAdapter {
    pub(crate) client: Arc<OpenAiClient>,
}

impl OpenAiAdapter {
    pub fn base_url(&self) -> &str {
        self.client.base_url()
    }
}

/// Builder for [`OpenAiAdapter`].
///
/// ```rust
/// use std::time::Duration;
/// use guru_openai::OpenAiAdapterBuilder;
///
/// let backend = OpenAiAdapterBuilder::new()
///     .with_base_url("http://localhost:8080/v1")
///     .with_timeout(Duration::from_secs(60))
///     .build()
///     .expect("valid HTTP client settings");
/// assert_eq!(backend.base_url(), "http://localhost:8080/v1");
/// ```
#[derive(Default)]
pub struct OpenAiAdapterBuilder {
    pub(crate) base_url: Option<String>,
    pub(crate) timeout: Option<Duration>,
    pub(crate) http: Option<reqwest::Client>,
}

impl OpenAiAdapterBuilder {
    /// Create an *empty* builder targeting the default Groq endpoint.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Transport-level timeout for a whole request, stream included.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Use a preconfigured `reqwest::Client`. Overrides [`Self::with_timeout`].
    pub fn with_http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// # Errors
    ///
    /// * [`GuruError::Config`] – the HTTP client could not be built.
    pub fn build(self) -> Result<OpenAiAdapter> {
        let client = match self.http {
            Some(http) => OpenAiClient::with_http(http, self.base_url),
            None => OpenAiClient::new(self.base_url, self.timeout)
                .map_err(|e| GuruError::Config(format!("cannot build HTTP client: {e}")))?,
        };

        Ok(OpenAiAdapter {
            client: Arc::new(client),
        })
    }
}

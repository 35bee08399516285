//! Deployment configuration.
//!
//! Every field has a default, so an absent file is a valid configuration:
//!
//! ```toml
//! model = "llama-3.1-8b-instant"
//! base_url = "https://api.groq.com/openai/v1"
//! request_timeout_secs = 120
//! temperature = 0.7
//! secrets_path = ".guru/secrets.toml"
//! credential_env = "GROQ_API_KEY"
//! ```
//!
//! `GURU_MODEL` and `GURU_BASE_URL` override the file.
use std::{
    env, fs,
    path::{Path, PathBuf},
    time::Duration,
};

use guru_core::{
    credential::{self, Credential},
    error::{GuruError, Result},
    model::Model,
};
use guru_prompt::{SystemInstruction, instruction::DEFAULT_SYSTEM_INSTRUCTION};
use serde::Deserialize;

use crate::secrets::{EnvCredential, SecretsFile};

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct GuruConfig {
    pub model: String,
    /// `None` targets the backend's default endpoint.
    pub base_url: Option<String>,
    pub system_instruction: String,
    /// No timeout unless set.
    pub request_timeout_secs: Option<u64>,
    /// Sampling temperature in `0.0..=2.0`; `None` leaves it to the upstream.
    pub temperature: Option<f64>,
    pub secrets_path: PathBuf,
    /// Name of the credential, both as the secrets-file key and as the
    /// environment variable.
    pub credential_env: String,
}

impl Default for GuruConfig {
    fn default() -> Self {
        Self {
            model: Model::default().id().to_owned(),
            base_url: None,
            system_instruction: DEFAULT_SYSTEM_INSTRUCTION.to_owned(),
            request_timeout_secs: None,
            temperature: None,
            secrets_path: PathBuf::from(".guru/secrets.toml"),
            credential_env: "GROQ_API_KEY".to_owned(),
        }
    }
}

impl GuruConfig {
    /// Read `path` (if given) and apply environment overrides.
    ///
    /// # Errors
    ///
    /// * [`GuruError::Config`] – the file cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => {
                let raw = fs::read_to_string(path).map_err(|err| {
                    GuruError::Config(format!("cannot read {}: {err}", path.display()))
                })?;
                Self::from_toml_str(&raw)?
            }
            None => Self::default(),
        };

        Ok(config.with_overrides(|name| env::var(name).ok()))
    }

    /// # Errors
    ///
    /// * [`GuruError::Config`] – malformed TOML, an unknown key or a
    ///   temperature outside `0.0..=2.0`.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let config: Self = toml::from_str(raw).map_err(|err| GuruError::Config(err.to_string()))?;

        if let Some(t) = config.temperature.filter(|t| !(0.0..=2.0).contains(t)) {
            return Err(GuruError::Config(format!(
                "temperature must be between 0.0 and 2.0, got {t}"
            )));
        }
        Ok(config)
    }

    /// Apply `GURU_MODEL` / `GURU_BASE_URL` as returned by `lookup`.
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let lookup = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(model) = lookup("GURU_MODEL") {
            self.model = model;
        }
        if let Some(base_url) = lookup("GURU_BASE_URL") {
            self.base_url = Some(base_url);
        }
        self
    }

    pub fn model(&self) -> Model {
        Model::from_id(self.model.clone())
    }

    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }

    pub fn system_instruction(&self) -> SystemInstruction {
        SystemInstruction::new(self.system_instruction.clone())
    }

    /// Load the stored deployment credential: the secrets file first, then
    /// the environment.
    pub fn stored_credential(&self) -> Result<Option<Credential>> {
        let file = SecretsFile::new(&self.secrets_path, &self.credential_env);
        let env = EnvCredential::new(&self.credential_env);
        credential::load_first(&[&file, &env])
    }
}

//! Stored deployment credentials.
//!
//! The secrets file is plain TOML with the key at the top level:
//!
//! ```toml
//! GROQ_API_KEY = "gsk_…"
//! ```
use std::{
    env, fs,
    io::ErrorKind,
    path::{Path, PathBuf},
};

use guru_core::{
    credential::{Credential, CredentialStore},
    error::{GuruError, Result},
};

/// Credential read from a TOML secrets file. A missing file means "no
/// stored credential", a malformed file is an error.
#[derive(Debug, Clone)]
pub struct SecretsFile {
    path: PathBuf,
    key: String,
}

impl SecretsFile {
    pub fn new(path: impl Into<PathBuf>, key: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            key: key.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for SecretsFile {
    fn load(&self) -> Result<Option<Credential>> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
            Err(err) => {
                return Err(GuruError::Config(format!(
                    "cannot read secrets file {}: {err}",
                    self.path.display()
                )));
            }
        };

        let table: toml::Table = raw.parse().map_err(|err| {
            GuruError::Config(format!(
                "malformed secrets file {}: {err}",
                self.path.display()
            ))
        })?;

        match table.get(&self.key) {
            None => Ok(None),
            Some(toml::Value::String(secret)) => Ok(Credential::new(secret.as_str())),
            Some(_) => Err(GuruError::Config(format!(
                "`{}` in {} must be a string",
                self.key,
                self.path.display()
            ))),
        }
    }

    fn describe(&self) -> String {
        format!("secrets file {}", self.path.display())
    }
}

/// Credential read from an environment variable.
#[derive(Debug, Clone)]
pub struct EnvCredential {
    var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialStore for EnvCredential {
    fn load(&self) -> Result<Option<Credential>> {
        Ok(env::var(&self.var).ok().and_then(Credential::new))
    }

    fn describe(&self) -> String {
        format!("environment variable {}", self.var)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write as _;

    use super::*;

    fn secrets(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn reads_the_configured_key() {
        let file = secrets("GROQ_API_KEY = \"gsk_from_file\"\nOTHER = 1\n");
        let store = SecretsFile::new(file.path(), "GROQ_API_KEY");
        assert_eq!(store.load().unwrap().unwrap().expose(), "gsk_from_file");
    }

    #[test]
    fn missing_file_or_key_is_not_an_error() {
        let store = SecretsFile::new("/definitely/not/here/secrets.toml", "GROQ_API_KEY");
        assert!(store.load().unwrap().is_none());

        let file = secrets("OTHER = \"x\"\n");
        assert!(SecretsFile::new(file.path(), "GROQ_API_KEY").load().unwrap().is_none());
    }

    #[test]
    fn empty_key_in_file_counts_as_absent() {
        let file = secrets("GROQ_API_KEY = \"\"\n");
        assert!(SecretsFile::new(file.path(), "GROQ_API_KEY").load().unwrap().is_none());
    }

    #[test]
    fn malformed_file_is_a_config_error() {
        let file = secrets("GROQ_API_KEY = \n");
        let err = SecretsFile::new(file.path(), "GROQ_API_KEY").load().unwrap_err();
        assert!(matches!(err, GuruError::Config(_)));

        let file = secrets("GROQ_API_KEY = 42\n");
        let err = SecretsFile::new(file.path(), "GROQ_API_KEY").load().unwrap_err();
        assert!(matches!(err, GuruError::Config(ref m) if m.contains("must be a string")));
    }

    #[test]
    fn unset_env_var_yields_nothing() {
        let store = EnvCredential::new("GURU_TEST_SURELY_UNSET_VARIABLE");
        assert!(store.load().unwrap().is_none());
    }
}

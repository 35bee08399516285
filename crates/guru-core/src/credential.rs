//! API credential and the resolution policy deciding which one a session uses.
//!
//! The policy is fixed:
//!
//! 1. a **stored** deployment credential (secrets file, environment) wins;
//! 2. otherwise a credential the user **entered manually**;
//! 3. otherwise there is no credential and no request may be issued.
//!
//! An empty key never counts as a credential, so a misconfigured deployment
//! cannot silently send `Authorization: Bearer `.
use std::fmt;

use crate::error::Result;

/// A non-empty secret API key.
///
/// `Debug` is redacted so the key cannot leak through logs.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Returns `None` for empty or whitespace-only input.
    pub fn new(secret: impl Into<String>) -> Option<Self> {
        let secret = secret.into();
        let trimmed = secret.trim();
        if trimmed.is_empty() {
            return None;
        }
        Some(Self(trimmed.to_owned()))
    }

    /// The raw key, for building the `Authorization` header.
    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Credential(***)")
    }
}

/// Where the credential of a session came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CredentialOrigin {
    Stored,
    Manual,
}

/// Source of a stored deployment credential.
///
/// `Ok(None)` means "nothing stored here", which is not an error.
pub trait CredentialStore {
    fn load(&self) -> Result<Option<Credential>>;

    /// Short label used in log output.
    fn describe(&self) -> String;
}

/// Pick the credential to use, preferring the stored one.
pub fn resolve<'c>(
    stored: Option<&'c Credential>,
    manual: Option<&'c Credential>,
) -> Option<(&'c Credential, CredentialOrigin)> {
    stored
        .map(|c| (c, CredentialOrigin::Stored))
        .or_else(|| manual.map(|c| (c, CredentialOrigin::Manual)))
}

/// Try every store in order and return the first credential found.
pub fn load_first(stores: &[&dyn CredentialStore]) -> Result<Option<Credential>> {
    for store in stores {
        if let Some(credential) = store.load()? {
            tracing::debug!(store = %store.describe(), "stored credential found");
            return Ok(Some(credential));
        }
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(Option<&'static str>);

    impl CredentialStore for Fixed {
        fn load(&self) -> Result<Option<Credential>> {
            Ok(self.0.and_then(Credential::new))
        }

        fn describe(&self) -> String {
            "fixed".into()
        }
    }

    #[test]
    fn empty_keys_are_not_credentials() {
        assert!(Credential::new("").is_none());
        assert!(Credential::new("   \n").is_none());
        assert_eq!(Credential::new(" gsk_1 ").unwrap().expose(), "gsk_1");
    }

    #[test]
    fn debug_output_is_redacted() {
        let c = Credential::new("gsk_secret").unwrap();
        assert!(!format!("{c:?}").contains("gsk_secret"));
    }

    #[test]
    fn stored_credential_wins_over_manual() {
        let stored = Credential::new("stored").unwrap();
        let manual = Credential::new("manual").unwrap();

        let (c, origin) = resolve(Some(&stored), Some(&manual)).unwrap();
        assert_eq!(c.expose(), "stored");
        assert_eq!(origin, CredentialOrigin::Stored);

        let (c, origin) = resolve(None, Some(&manual)).unwrap();
        assert_eq!(c.expose(), "manual");
        assert_eq!(origin, CredentialOrigin::Manual);

        assert!(resolve(None, None).is_none());
    }

    #[test]
    fn first_store_with_a_key_is_used() {
        let empty = Fixed(None);
        let blank = Fixed(Some(""));
        let real = Fixed(Some("gsk_real"));

        let found = load_first(&[&empty, &blank, &real]).unwrap();
        assert_eq!(found.unwrap().expose(), "gsk_real");

        assert!(load_first(&[&empty]).unwrap().is_none());
    }
}

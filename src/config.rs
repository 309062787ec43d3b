//! Configuration for the Meter Down client

use std::env;
use std::time::Duration;
use url::Url;

use crate::error::{Error, Result};
use crate::locale::Locale;

/// Environment variable holding the Supabase project URL
pub const URL_VAR: &str = "SUPABASE_URL";
/// Environment variable holding the public (anon) API key
pub const ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
/// Older name for the anon key, still accepted
pub const LEGACY_KEY_VAR: &str = "SUPABASE_KEY";
/// Optional default display language (`en` or `hi`)
pub const LOCALE_VAR: &str = "METER_DOWN_LOCALE";

/// Configuration options for the client
#[derive(Debug, Clone)]
pub struct ClientOptions {
    /// Whether the auth client keeps the session after verification
    pub persist_session: bool,

    /// Whether a code request may create a new user for an unknown number
    pub create_user: bool,

    /// The request timeout
    pub request_timeout: Option<Duration>,

    /// Locale new login screens start in
    pub default_locale: Locale,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            persist_session: true,
            create_user: true,
            request_timeout: Some(Duration::from_secs(30)),
            default_locale: Locale::En,
        }
    }
}

impl ClientOptions {
    /// Set whether to persist the session
    pub fn with_persist_session(mut self, value: bool) -> Self {
        self.persist_session = value;
        self
    }

    /// Set whether unknown numbers get a new user on sign in
    pub fn with_create_user(mut self, value: bool) -> Self {
        self.create_user = value;
        self
    }

    /// Set the request timeout
    pub fn with_request_timeout(mut self, value: Option<Duration>) -> Self {
        self.request_timeout = value;
        self
    }

    /// Set the locale login screens start in
    pub fn with_default_locale(mut self, value: Locale) -> Self {
        self.default_locale = value;
        self
    }
}

/// Startup configuration: where the auth service lives and how to talk to it
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub url: Url,
    pub anon_key: String,
    pub options: ClientOptions,
}

impl AppConfig {
    /// Creates a new configuration, validating the URL and key.
    pub fn new(url: &str, anon_key: &str) -> Result<Self> {
        let url = Url::parse(url)?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::config(format!(
                "{} must be an http(s) URL, got scheme {}",
                URL_VAR,
                url.scheme()
            )));
        }
        if anon_key.trim().is_empty() {
            return Err(Error::config(format!("{} cannot be empty", ANON_KEY_VAR)));
        }
        Ok(Self {
            url,
            anon_key: anon_key.to_string(),
            options: ClientOptions::default(),
        })
    }

    /// Replace the client options
    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    /// Reads the configuration from environment variables.
    ///
    /// A missing URL or key is a startup error; the caller is expected to
    /// abort rather than run without an auth service.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let url = present(URL_VAR).ok_or_else(|| {
            Error::config(format!("{} environment variable not found", URL_VAR))
        })?;
        let anon_key = present(ANON_KEY_VAR)
            .or_else(|| present(LEGACY_KEY_VAR))
            .ok_or_else(|| {
                Error::config(format!("{} environment variable not found", ANON_KEY_VAR))
            })?;

        let mut options = ClientOptions::default();
        if let Some(tag) = present(LOCALE_VAR) {
            let locale = tag.parse::<Locale>().map_err(Error::config)?;
            options = options.with_default_locale(locale);
        }

        Ok(Self::new(&url, &anon_key)?.with_options(options))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| vars.get(name).cloned()
    }

    #[test]
    fn test_from_lookup() {
        let config = AppConfig::from_lookup(lookup(&[
            (URL_VAR, "https://abc.supabase.co"),
            (ANON_KEY_VAR, "anon"),
            (LOCALE_VAR, "hi"),
        ]))
        .unwrap();

        assert_eq!(config.url.as_str(), "https://abc.supabase.co/");
        assert_eq!(config.anon_key, "anon");
        assert_eq!(config.options.default_locale, Locale::Hi);
    }

    #[test]
    fn test_legacy_key_variable() {
        let config = AppConfig::from_lookup(lookup(&[
            (URL_VAR, "https://abc.supabase.co"),
            (LEGACY_KEY_VAR, "legacy"),
        ]))
        .unwrap();
        assert_eq!(config.anon_key, "legacy");
        assert_eq!(config.options.default_locale, Locale::En);
    }

    #[test]
    fn test_missing_variables_are_fatal() {
        let err = AppConfig::from_lookup(lookup(&[(ANON_KEY_VAR, "anon")])).unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(URL_VAR)));

        let err = AppConfig::from_lookup(lookup(&[
            (URL_VAR, "https://abc.supabase.co"),
            (ANON_KEY_VAR, "  "),
        ]))
        .unwrap_err();
        assert!(matches!(err, Error::Config(ref m) if m.contains(ANON_KEY_VAR)));
    }

    #[test]
    fn test_invalid_values() {
        assert!(matches!(
            AppConfig::new("not a url", "anon"),
            Err(Error::Url(_))
        ));
        assert!(matches!(
            AppConfig::new("ftp://abc.supabase.co", "anon"),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            AppConfig::from_lookup(lookup(&[
                (URL_VAR, "https://abc.supabase.co"),
                (ANON_KEY_VAR, "anon"),
                (LOCALE_VAR, "fr"),
            ])),
            Err(Error::Config(_))
        ));
    }
}

//! Meter Down login core
//!
//! The sign-in flow of the Meter Down ride-hailing client: phone number
//! entry, a one-time SMS code from Supabase Auth, and the hand-off to the
//! home screen.

pub mod config;
pub mod error;
pub mod locale;
pub mod login;
pub mod navigation;
pub mod phone;
pub mod provider;

use log::info;
use reqwest::Client;
use std::sync::Arc;

use meter_down_auth::{Auth, AuthOptions};

use crate::config::AppConfig;
use crate::error::Result;
use crate::login::LoginFlow;
use crate::navigation::Navigator;
use crate::provider::OtpProvider;

/// Application context, built once at startup and shared by every screen
pub struct MeterDown {
    /// Startup configuration
    pub config: AppConfig,
    /// The auth collaborator every login flow talks to
    provider: Arc<dyn OtpProvider>,
    /// Concrete auth client, when the provider is Supabase Auth
    auth: Option<Arc<Auth>>,
}

impl MeterDown {
    /// Create the application context from configuration
    ///
    /// # Example
    ///
    /// ```
    /// use meter_down::{MeterDown, config::AppConfig};
    ///
    /// let config = AppConfig::new("https://your-project-url.supabase.co", "your-anon-key").unwrap();
    /// let app = MeterDown::new(config).unwrap();
    /// assert!(app.auth().is_some());
    /// ```
    pub fn new(config: AppConfig) -> Result<Self> {
        let mut builder = Client::builder();
        if let Some(timeout) = config.options.request_timeout {
            builder = builder.timeout(timeout);
        }
        let http_client = builder.build()?;

        let auth = Arc::new(Auth::new(
            config.url.as_str(),
            &config.anon_key,
            http_client,
            AuthOptions {
                persist_session: config.options.persist_session,
                create_user: config.options.create_user,
            },
        ));
        info!("auth client initialised for {}", config.url);

        Ok(Self {
            config,
            provider: auth.clone(),
            auth: Some(auth),
        })
    }

    /// Create the application context from `SUPABASE_URL` and `SUPABASE_ANON_KEY`
    pub fn from_env() -> Result<Self> {
        Self::new(AppConfig::from_env()?)
    }

    /// Create the application context around another auth provider
    pub fn with_provider(config: AppConfig, provider: Arc<dyn OtpProvider>) -> Self {
        Self {
            config,
            provider,
            auth: None,
        }
    }

    /// The Supabase Auth client, for session and user queries
    pub fn auth(&self) -> Option<&Arc<Auth>> {
        self.auth.as_ref()
    }

    /// Open a login screen reporting to `navigator`
    pub fn login(&self, navigator: Arc<dyn Navigator>) -> LoginFlow {
        LoginFlow::new(
            Arc::clone(&self.provider),
            navigator,
            self.config.options.default_locale,
        )
    }
}

/// A convenience module for common imports
pub mod prelude {
    pub use crate::config::{AppConfig, ClientOptions};
    pub use crate::error::Error;
    pub use crate::locale::Locale;
    pub use crate::login::{LoginError, LoginFlow, LoginState, Step};
    pub use crate::navigation::{Navigator, Route};
    pub use crate::provider::{OtpProvider, ProviderFailure};
    pub use crate::MeterDown;
}

//! Phone number and one-time code login flow

mod state;

use log::{debug, info, warn};
use meter_down_auth::{mask_phone, Session};
use std::sync::{Arc, Mutex, MutexGuard};

use crate::locale::{Locale, LocaleStrings};
use crate::navigation::{Navigator, Route};
use crate::phone;
use crate::provider::{OtpProvider, ProviderFailure};

pub use state::*;

struct Inner {
    state: LoginState,
    detached: bool,
}

impl Inner {
    /// Refuse auth-state changes while closed or while a call is outstanding
    fn ensure_idle(&self) -> Result<(), LoginError> {
        if self.detached {
            return Err(LoginError::Detached);
        }
        if self.state.loading {
            return Err(LoginError::Busy);
        }
        Ok(())
    }

    fn ensure_step(&self, step: Step) -> Result<(), LoginError> {
        if self.state.step != step {
            return Err(LoginError::WrongStep(self.state.step));
        }
        Ok(())
    }
}

fn lock(inner: &Mutex<Inner>) -> MutexGuard<'_, Inner> {
    match inner.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    }
}

/// Clears `loading` if a provider call is abandoned before it settles
struct LoadingGuard<'a> {
    inner: &'a Mutex<Inner>,
    armed: bool,
}

impl<'a> LoadingGuard<'a> {
    fn new(inner: &'a Mutex<Inner>) -> Self {
        Self { inner, armed: true }
    }

    fn disarm(mut self) {
        self.armed = false;
    }
}

impl Drop for LoadingGuard<'_> {
    fn drop(&mut self) {
        if self.armed {
            let mut inner = lock(self.inner);
            if !inner.detached {
                inner.state.loading = false;
            }
        }
    }
}

/// Controller for the login screen.
///
/// Handles are cheap to clone and share one screen state. Provider calls
/// are the only await points and no lock is held across them, so the host
/// can keep reading [`LoginFlow::state`] while a request is in flight.
#[derive(Clone)]
pub struct LoginFlow {
    inner: Arc<Mutex<Inner>>,
    provider: Arc<dyn OtpProvider>,
    navigator: Arc<dyn Navigator>,
}

impl LoginFlow {
    /// Create a login flow in the phone entry step
    pub fn new(
        provider: Arc<dyn OtpProvider>,
        navigator: Arc<dyn Navigator>,
        locale: Locale,
    ) -> Self {
        let state = LoginState {
            locale,
            ..Default::default()
        };
        Self {
            inner: Arc::new(Mutex::new(Inner {
                state,
                detached: false,
            })),
            provider,
            navigator,
        }
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        lock(&self.inner)
    }

    /// Snapshot of the current screen state
    pub fn state(&self) -> LoginState {
        self.lock().state.clone()
    }

    /// Strings for the active locale
    pub fn strings(&self) -> &'static LocaleStrings {
        self.lock().state.locale.strings()
    }

    /// Whether the continue button is enabled
    pub fn can_request_code(&self) -> bool {
        let inner = self.lock();
        inner.ensure_idle().is_ok()
            && inner.state.step == Step::Input
            && phone::is_complete(&inner.state.phone_number)
    }

    /// Whether the verify button is enabled
    pub fn can_verify_code(&self) -> bool {
        let inner = self.lock();
        inner.ensure_idle().is_ok()
            && inner.state.step == Step::CodeEntry
            && inner.state.code.chars().count() == CODE_LENGTH
    }

    pub fn is_detached(&self) -> bool {
        self.lock().detached
    }

    /// Close the screen. Results of calls still in flight are discarded.
    pub fn detach(&self) {
        let mut inner = self.lock();
        if !inner.detached {
            debug!("login flow detached");
            inner.detached = true;
        }
    }

    /// Leave the login screen without signing in
    pub fn leave(&self) {
        self.detach();
        self.navigator.go_back();
    }

    /// Update the phone number from the field text
    pub fn set_phone_number(&self, raw: &str) -> Result<(), LoginError> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.ensure_step(Step::Input)?;
        let normalized = phone::normalize_phone_input(&inner.state.phone_number, raw);
        inner.state.phone_number = normalized;
        Ok(())
    }

    /// Ask the provider to text a code to the entered number.
    ///
    /// Moves to [`Step::CodeEntry`] only when the provider accepts.
    pub async fn request_code(&self) -> Result<(), LoginError> {
        let phone_number = {
            let mut inner = self.lock();
            inner.ensure_idle()?;
            inner.ensure_step(Step::Input)?;
            if !phone::is_complete(&inner.state.phone_number) {
                debug!("refusing code request for incomplete number");
                return Err(ValidationError::InvalidPhoneNumber.into());
            }
            inner.state.loading = true;
            inner.state.phone_number.clone()
        };

        info!("requesting code for {}", mask_phone(&phone_number));
        let guard = LoadingGuard::new(&self.inner);
        let result = self.provider.send_code(&phone_number).await;
        guard.disarm();

        let mut inner = self.lock();
        if inner.detached {
            debug!("discarding code request result for detached flow");
            return Err(LoginError::Detached);
        }
        inner.state.loading = false;

        match result {
            Ok(()) => {
                inner.state.step = Step::CodeEntry;
                inner.state.code.clear();
                info!("code sent to {}", mask_phone(&phone_number));
                Ok(())
            }
            Err(failure) => Err(settle_failure(Operation::SendCode, failure)),
        }
    }

    /// Update the code from the field text, keeping at most six characters
    pub fn set_code(&self, raw: &str) -> Result<(), LoginError> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.ensure_step(Step::CodeEntry)?;
        inner.state.code = raw.chars().take(CODE_LENGTH).collect();
        Ok(())
    }

    /// Verify the entered code and go to the home screen on success.
    ///
    /// The flow detaches after a successful verification; the session is
    /// kept by the provider.
    pub async fn verify_code(&self) -> Result<Session, LoginError> {
        let (phone_number, code) = {
            let mut inner = self.lock();
            inner.ensure_idle()?;
            inner.ensure_step(Step::CodeEntry)?;
            if inner.state.code.chars().count() != CODE_LENGTH {
                debug!("refusing verification of short code");
                return Err(ValidationError::InvalidCode.into());
            }
            inner.state.loading = true;
            (inner.state.phone_number.clone(), inner.state.code.clone())
        };

        info!("verifying code for {}", mask_phone(&phone_number));
        let guard = LoadingGuard::new(&self.inner);
        let result = self.provider.verify_code(&phone_number, &code).await;
        guard.disarm();

        {
            let mut inner = self.lock();
            if inner.detached {
                debug!("discarding verification result for detached flow");
                return Err(LoginError::Detached);
            }
            inner.state.loading = false;
            if result.is_ok() {
                inner.detached = true;
            }
        }

        match result {
            Ok(session) => {
                info!("signed in as user {}", session.user.id);
                self.navigator.navigate(Route::Home);
                Ok(session)
            }
            Err(failure) => Err(settle_failure(Operation::VerifyCode, failure)),
        }
    }

    /// Go back to phone entry, keeping the number and clearing the code
    pub fn restart_phone_entry(&self) -> Result<(), LoginError> {
        let mut inner = self.lock();
        inner.ensure_idle()?;
        inner.ensure_step(Step::CodeEntry)?;
        inner.state.step = Step::Input;
        inner.state.code.clear();
        Ok(())
    }

    /// Switch to the other display language
    pub fn toggle_locale(&self) -> Locale {
        let mut inner = self.lock();
        inner.state.locale = inner.state.locale.toggle();
        inner.state.locale
    }
}

fn settle_failure(operation: Operation, failure: ProviderFailure) -> LoginError {
    match failure {
        ProviderFailure::Rejected(message) => {
            info!("provider refused to {}: {}", operation, message);
            LoginError::Provider(message)
        }
        ProviderFailure::Transport(detail) => {
            warn!("could not {}: {}", operation, detail);
            LoginError::Transport { operation, detail }
        }
    }
}

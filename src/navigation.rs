//! Navigation intents emitted by the login flow

use std::fmt;

/// Screens the app can be sent to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    /// Authenticated landing screen
    Home,
    EnterLocation,
    Services,
}

impl Route {
    pub fn path(self) -> &'static str {
        match self {
            Route::Home => "/home",
            Route::EnterLocation => "/enter-location",
            Route::Services => "/services",
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Receiver of one-way navigation intents.
///
/// The navigation stack belongs to the host; the login flow only asks to
/// move.
pub trait Navigator: Send + Sync {
    /// Push `route` onto the stack
    fn navigate(&self, route: Route);

    /// Pop the current screen
    fn go_back(&self);
}

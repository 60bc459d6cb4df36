//! Session lifecycle notifications.

/// Emitted by the auth layer whenever the session changes state.
///
/// The core never navigates or prompts on its own. A front end subscribes
/// (see [`crate::application::services::CredentialRefresher::subscribe`]) and
/// decides what to show, e.g. sending the user back to the login screen on
/// [`SessionEvent::Invalidated`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionEvent {
    /// Credentials were stored after a successful login.
    Established,
    /// The access token was renewed by a refresh exchange.
    Renewed,
    /// Credentials were dropped after an unrecoverable authentication failure.
    Invalidated { reason: String },
    /// The user logged out explicitly.
    LoggedOut,
}

impl SessionEvent {
    /// Creates an invalidation event.
    pub fn invalidated(reason: impl Into<String>) -> Self {
        Self::Invalidated {
            reason: reason.into(),
        }
    }

    /// Returns true when the front end must send the user to log in again.
    pub fn requires_login(&self) -> bool {
        matches!(self, Self::Invalidated { .. } | Self::LoggedOut)
    }
}

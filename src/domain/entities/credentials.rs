//! Credential pair held for the authenticated session.

use std::fmt;

/// Access/refresh token pair.
///
/// Both tokens are opaque strings; the client never inspects or validates
/// their contents. `expires_in` is the server-declared access token lifetime
/// in seconds and is informational only (expiry is detected by a 401).
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialPair {
    pub access_token: String,
    pub refresh_token: String,
    pub expires_in: Option<u64>,
}

impl CredentialPair {
    /// Creates a new credential pair.
    pub fn new(
        access_token: impl Into<String>,
        refresh_token: impl Into<String>,
        expires_in: Option<u64>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.into(),
            expires_in,
        }
    }

    /// Returns a copy with the access token replaced.
    ///
    /// The refresh token is replaced only when the server rotated it.
    pub fn renewed(
        &self,
        access_token: impl Into<String>,
        refresh_token: Option<String>,
        expires_in: Option<u64>,
    ) -> Self {
        Self {
            access_token: access_token.into(),
            refresh_token: refresh_token.unwrap_or_else(|| self.refresh_token.clone()),
            expires_in: expires_in.or(self.expires_in),
        }
    }
}

// Secrets never end up in logs.
impl fmt::Debug for CredentialPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialPair")
            .field("access_token", &"***")
            .field("refresh_token", &"***")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

//! Authenticated account.

use serde::Serialize;

/// The user the current session belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct User {
    pub id: String,
    pub email: String,
}

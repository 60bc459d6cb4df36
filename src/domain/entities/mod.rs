//! Core domain entities representing the client's data model.
//!
//! Entities are plain data structures. Links, visits and users are transient
//! copies of records owned by the remote service; the credential pair is the
//! only entity the client owns and persists.
//!
//! # Entity Types
//!
//! - [`CredentialPair`] - Access/refresh token pair for the current session
//! - [`Link`] - A shortened URL owned by the authenticated user
//! - [`Visit`] - A single recorded click on a link
//! - [`User`] - The authenticated account
//!
//! Mutations use a dedicated input struct ([`LinkUpdate`]).

pub mod credentials;
pub mod link;
pub mod user;
pub mod visit;

pub use credentials::CredentialPair;
pub use link::{Link, LinkUpdate};
pub use user::User;
pub use visit::Visit;

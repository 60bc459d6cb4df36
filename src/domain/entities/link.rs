//! Link entity representing a shortened URL.

use serde::Serialize;

/// A shortened URL owned by the authenticated user.
///
/// `slug` is the server-assigned short identifier and may change through an
/// update; `id` is stable for the lifetime of the link.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Link {
    pub id: String,
    pub slug: String,
    pub original_url: String,
    pub owner_id: String,
}

impl Link {
    /// Creates a new Link instance.
    pub fn new(
        id: impl Into<String>,
        slug: impl Into<String>,
        original_url: impl Into<String>,
        owner_id: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            slug: slug.into(),
            original_url: original_url.into(),
            owner_id: owner_id.into(),
        }
    }
}

/// Input data for updating an existing link.
///
/// The link is addressed by its current `slug`. `new_slug: None` keeps the
/// slug unchanged.
#[derive(Debug, Clone)]
pub struct LinkUpdate {
    pub slug: String,
    pub url: String,
    pub new_slug: Option<String>,
}

impl LinkUpdate {
    /// Update that only changes the destination URL.
    pub fn url(slug: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            url: url.into(),
            new_slug: None,
        }
    }

    /// Also renames the slug.
    pub fn with_new_slug(mut self, new_slug: impl Into<String>) -> Self {
        self.new_slug = Some(new_slug.into());
        self
    }
}

//! DTOs for the link management endpoints under `/shorten/`.

use serde::{Deserialize, Serialize};
use serde_with::{DefaultOnNull, serde_as};

use crate::domain::entities::{Link, LinkUpdate};

/// Body of `POST /shorten/`.
#[derive(Debug, Serialize)]
pub struct ShortenRequest<'a> {
    pub url: &'a str,
}

/// Body of `PUT /shorten/`.
#[derive(Debug, Serialize)]
pub struct UpdateRequest<'a> {
    pub slug: &'a str,
    pub updated_url: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_slug: Option<&'a str>,
}

impl<'a> From<&'a LinkUpdate> for UpdateRequest<'a> {
    fn from(update: &'a LinkUpdate) -> Self {
        Self {
            slug: &update.slug,
            updated_url: &update.url,
            updated_slug: update.new_slug.as_deref(),
        }
    }
}

/// Body of `DELETE /shorten/`; the key travels in the body, not the path.
#[derive(Debug, Serialize)]
pub struct DeleteRequest<'a> {
    pub slug: &'a str,
}

/// A link as returned by the service.
#[derive(Debug, Deserialize)]
pub struct LinkPayload {
    #[serde(deserialize_with = "super::flexible_id::deserialize")]
    pub id: String,
    pub slug: String,
    #[serde(alias = "originalUrl")]
    pub url: String,
    #[serde(
        default,
        alias = "userId",
        deserialize_with = "super::flexible_id::deserialize"
    )]
    pub user_id: String,
}

impl From<LinkPayload> for Link {
    fn from(payload: LinkPayload) -> Self {
        Link::new(payload.id, payload.slug, payload.url, payload.user_id)
    }
}

/// Create/update response, either wrapped in `{message, data}` or bare.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum LinkEnvelope {
    Wrapped {
        data: LinkPayload,
        #[serde(default)]
        message: Option<String>,
    },
    Bare(LinkPayload),
}

impl LinkEnvelope {
    pub fn into_link(self) -> Link {
        match self {
            Self::Wrapped { data, .. } | Self::Bare(data) => data.into(),
        }
    }
}

/// Response of `GET /shorten/`.
#[serde_as]
#[derive(Debug, Deserialize)]
pub struct ListResponse {
    #[serde_as(as = "DefaultOnNull")]
    #[serde(default, alias = "shortUrls")]
    pub short_urls: Vec<LinkPayload>,
}

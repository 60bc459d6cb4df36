//! Base URL handling for the remote service and public short links.

use thiserror::Error;
use url::Url;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum BaseUrlError {
    #[error("invalid URL: {0}")]
    Invalid(String),

    #[error("unsupported scheme '{0}', expected http or https")]
    UnsupportedScheme(String),

    #[error("base URL must not contain a query or fragment")]
    HasQueryOrFragment,
}

/// Validates a base URL and strips trailing slashes.
///
/// # Examples
///
/// ```
/// use shortener_dashboard::utils::short_url::normalize_base_url;
///
/// assert_eq!(
///     normalize_base_url("https://sho.rt/").unwrap(),
///     "https://sho.rt"
/// );
/// ```
///
/// # Errors
///
/// Returns an error if the URL does not parse, is not http(s), or carries a
/// query or fragment.
pub fn normalize_base_url(raw: &str) -> Result<String, BaseUrlError> {
    let url = Url::parse(raw.trim()).map_err(|e| BaseUrlError::Invalid(e.to_string()))?;

    match url.scheme() {
        "http" | "https" => {}
        other => return Err(BaseUrlError::UnsupportedScheme(other.to_string())),
    }

    if url.query().is_some() || url.fragment().is_some() {
        return Err(BaseUrlError::HasQueryOrFragment);
    }

    Ok(url.as_str().trim_end_matches('/').to_string())
}

/// Joins a short link base and a slug.
pub fn format_short_url(base: &str, slug: &str) -> String {
    format!("{}/{}", base.trim_end_matches('/'), slug.trim_start_matches('/'))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_strips_trailing_slash() {
        assert_eq!(
            normalize_base_url("http://localhost:8000/").unwrap(),
            "http://localhost:8000"
        );
        assert_eq!(
            normalize_base_url("  https://api.example.com/v1/ ").unwrap(),
            "https://api.example.com/v1"
        );
    }

    #[test]
    fn test_normalize_rejects_other_schemes() {
        assert_eq!(
            normalize_base_url("ftp://example.com"),
            Err(BaseUrlError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_normalize_rejects_query() {
        assert_eq!(
            normalize_base_url("https://example.com/?a=1"),
            Err(BaseUrlError::HasQueryOrFragment)
        );
    }

    #[test]
    fn test_normalize_rejects_garbage() {
        assert!(matches!(
            normalize_base_url("not a url"),
            Err(BaseUrlError::Invalid(_))
        ));
    }

    #[test]
    fn test_format_short_url() {
        assert_eq!(format_short_url("https://sho.rt", "abc"), "https://sho.rt/abc");
        assert_eq!(format_short_url("https://sho.rt/", "abc"), "https://sho.rt/abc");
    }
}

use url::Url;

use crate::error::ScrapeError;

/// Accept only absolute URLs that carry both a scheme and a host.
pub fn validate_url(raw: &str) -> Result<Url, ScrapeError> {
    let raw = raw.trim();
    let url = Url::parse(raw).map_err(|_| ScrapeError::InvalidUrl)?;
    match url.host_str() {
        Some(host) if !url.scheme().is_empty() && !host.is_empty() => Ok(url),
        _ => Err(ScrapeError::InvalidUrl),
    }
}

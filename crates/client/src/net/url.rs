//! URL resolution for manifest entries and host-supplied paths.

use ombra_core::Error;
use reqwest::Url;

/// Resolve a manifest entry against the application origin.
///
/// Root-relative paths (`/offline.html`) are joined onto the origin; absolute
/// URLs (CDN assets) are parsed as-is. Fragments are dropped either way so the
/// resolved URL is stable as a descriptor component.
pub fn resolve(origin: &Url, entry: &str) -> Result<Url, Error> {
    let trimmed = entry.trim();
    if trimmed.is_empty() {
        return Err(Error::InvalidUrl("empty URL".to_string()));
    }

    let mut resolved = if trimmed.starts_with('/') {
        origin.join(trimmed).map_err(|e| Error::InvalidUrl(e.to_string()))?
    } else {
        Url::parse(trimmed).map_err(|e| Error::InvalidUrl(e.to_string()))?
    };

    match resolved.scheme() {
        "http" | "https" => {}
        scheme => return Err(Error::InvalidUrl(format!("unsupported scheme: {scheme}"))),
    }

    resolved.set_fragment(None);

    Ok(resolved)
}

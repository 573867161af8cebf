//! Fixed install manifest of shell assets.
//!
//! Every URL here must be fetchable at install time; a single failure aborts
//! the install and nothing is seeded. Root-relative paths resolve against the
//! configured origin, absolute URLs are third-party CDN assets and are stored
//! opaque when the response comes back cross-origin.

use ombra_client::net::url::resolve;
use ombra_client::{Destination, Request};
use ombra_core::Error;
use url::Url;

/// Ordered shell-asset manifest seeded into the core partition.
pub const CORE_MANIFEST: &[&str] = &[
    "/",
    "/login.html",
    "/signup.html",
    "/forgot.html",
    "/reset.html",
    "/mainapp.html",
    "/loading.html",
    "/offline.html",
    "/files/style.css",
    "/images/app_icon.ico",
    "/images/app_icon.png",
    "/images/default_avatar.png",
    "/images/default_banner.png",
    // CDN dependencies used across pages, cached opaque when cross-origin
    "https://cdn.tailwindcss.com",
    "https://unpkg.com/feather-icons",
    "https://cdn.socket.io/4.7.2/socket.io.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/cropperjs/1.5.13/cropper.min.js",
    "https://cdnjs.cloudflare.com/ajax/libs/cropperjs/1.5.13/cropper.min.css",
    "https://cdn.jsdelivr.net/npm/emoji-mart@latest/css/emoji-mart.css",
    "https://cdn.jsdelivr.net/npm/emoji-mart@latest/dist/browser.js",
];

/// Build the request used to fetch (and key) one manifest entry.
///
/// HTML pages get the canonical navigation descriptor so the runtime fallback
/// lookup for the same page hashes to the same key. Other entries get a
/// destination inferred from their path, which only affects diagnostics.
pub fn manifest_request(origin: &Url, entry: &str) -> Result<Request, Error> {
    let url = resolve(origin, entry)?;
    if entry == "/" || entry.ends_with(".html") {
        return Ok(Request::navigation(url));
    }
    let destination = infer_destination(&url);
    Ok(Request::get(url).with_destination(destination))
}

fn infer_destination(url: &Url) -> Destination {
    let path = url.path();
    if path.ends_with(".js") {
        Destination::Script
    } else if path.ends_with(".css") {
        Destination::Style
    } else if path.ends_with(".png") || path.ends_with(".ico") || path.ends_with(".jpg") {
        Destination::Image
    } else {
        Destination::Other
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ombra_client::HTML_ACCEPT;

    fn origin() -> Url {
        Url::parse("https://app.example.com").unwrap()
    }

    #[test]
    fn test_manifest_includes_offline_page() {
        assert!(CORE_MANIFEST.contains(&"/offline.html"));
    }

    #[test]
    fn test_manifest_entries_all_resolve() {
        for entry in CORE_MANIFEST {
            assert!(manifest_request(&origin(), entry).is_ok(), "unresolvable entry: {entry}");
        }
    }

    #[test]
    fn test_html_entries_use_navigation_descriptor() {
        let req = manifest_request(&origin(), "/offline.html").unwrap();
        assert_eq!(req.accept, HTML_ACCEPT);
        assert_eq!(req.destination, Destination::Document);
        // must hash identically to the runtime fallback lookup
        let runtime = Request::navigation(resolve(&origin(), "/offline.html").unwrap());
        assert_eq!(req.key(), runtime.key());
    }

    #[test]
    fn test_destination_inference() {
        let script = manifest_request(&origin(), "https://cdn.socket.io/4.7.2/socket.io.min.js").unwrap();
        assert_eq!(script.destination, Destination::Script);
        assert_eq!(script.url.as_str(), "https://cdn.socket.io/4.7.2/socket.io.min.js");

        let style = manifest_request(&origin(), "/files/style.css").unwrap();
        assert_eq!(style.destination, Destination::Style);

        let image = manifest_request(&origin(), "/images/default_avatar.png").unwrap();
        assert_eq!(image.destination, Destination::Image);
    }
}

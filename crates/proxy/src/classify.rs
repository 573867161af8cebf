//! Request classification into caching strategies.
//!
//! Classification is a pure function of the request descriptor plus the
//! configured origin and path prefixes, checked in fixed priority order. The
//! dispatcher in `proxy` maps each `Strategy` to its handler.

use ombra_client::{Destination, Method, Request};
use ombra_core::ProxyConfig;
use url::Url;

/// The caching strategy applied to a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Strategy {
    /// HTML navigation: network-first, cache fallback, then offline page.
    Navigation,
    /// Same-origin API GET: network-first with `api` partition fallback.
    Api,
    /// Same-origin static asset: cache-first.
    Static,
    /// Script/style/font destination: stale-while-revalidate.
    Revalidate,
    /// Not intercepted; the host performs a plain fetch.
    Passthrough,
}

/// Classify a request, in priority order.
pub fn classify(origin: &Url, config: &ProxyConfig, req: &Request) -> Strategy {
    if req.wants_html() {
        return Strategy::Navigation;
    }

    let same_origin = req.url.origin() == origin.origin();
    let path = req.url.path();

    if same_origin && path.starts_with(config.api_prefix.as_str()) && req.method == Method::GET {
        return Strategy::Api;
    }

    if same_origin && config.static_prefixes.iter().any(|prefix| path.starts_with(prefix.as_str())) {
        return Strategy::Static;
    }

    if matches!(req.destination, Destination::Script | Destination::Style | Destination::Font) {
        return Strategy::Revalidate;
    }

    Strategy::Passthrough
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (Url, ProxyConfig) {
        let config = ProxyConfig { origin: "https://app.example.com".into(), ..Default::default() };
        (Url::parse(&config.origin).unwrap(), config)
    }

    fn same_origin(path: &str) -> Url {
        Url::parse(&format!("https://app.example.com{path}")).unwrap()
    }

    #[test]
    fn test_navigation_wins_over_everything() {
        let (origin, config) = setup();
        // an HTML request under the api prefix is still a navigation
        let req = Request::navigation(same_origin("/api/docs"));
        assert_eq!(classify(&origin, &config, &req), Strategy::Navigation);
    }

    #[test]
    fn test_api_get_same_origin() {
        let (origin, config) = setup();
        let req = Request::get(same_origin("/api/stats"));
        assert_eq!(classify(&origin, &config, &req), Strategy::Api);
    }

    #[test]
    fn test_api_post_not_intercepted() {
        let (origin, config) = setup();
        let mut req = Request::get(same_origin("/api/stats"));
        req.method = Method::POST;
        assert_eq!(classify(&origin, &config, &req), Strategy::Passthrough);
    }

    #[test]
    fn test_api_cross_origin_not_api() {
        let (origin, config) = setup();
        let req = Request::get(Url::parse("https://other.example.com/api/stats").unwrap());
        assert_eq!(classify(&origin, &config, &req), Strategy::Passthrough);
    }

    #[test]
    fn test_static_prefixes() {
        let (origin, config) = setup();
        for path in ["/images/a.png", "/uploads/avatar.png", "/files/style.css"] {
            let req = Request::get(same_origin(path));
            assert_eq!(classify(&origin, &config, &req), Strategy::Static, "path: {path}");
        }
    }

    #[test]
    fn test_script_destination_revalidates() {
        let (origin, config) = setup();
        let req = Request::get(Url::parse("https://cdn.socket.io/4.7.2/socket.io.min.js").unwrap())
            .with_destination(Destination::Script);
        assert_eq!(classify(&origin, &config, &req), Strategy::Revalidate);
    }

    #[test]
    fn test_font_destination_revalidates() {
        let (origin, config) = setup();
        let req = Request::get(Url::parse("https://fonts.example.net/inter.woff2").unwrap())
            .with_destination(Destination::Font);
        assert_eq!(classify(&origin, &config, &req), Strategy::Revalidate);
    }

    #[test]
    fn test_plain_cross_origin_passthrough() {
        let (origin, config) = setup();
        let req = Request::get(Url::parse("https://telemetry.example.net/beacon").unwrap());
        assert_eq!(classify(&origin, &config, &req), Strategy::Passthrough);
    }

    #[test]
    fn test_same_origin_unprefixed_passthrough() {
        let (origin, config) = setup();
        let req = Request::get(same_origin("/socket.io/?EIO=4"));
        assert_eq!(classify(&origin, &config, &req), Strategy::Passthrough);
    }
}

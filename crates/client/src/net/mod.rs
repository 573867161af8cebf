//! Request/response model and the `Network` backend trait.
//!
//! A `Request` carries the descriptor the proxy classifies and keys on:
//! (method, absolute URL, Accept), plus the destination hint the host knows
//! about the resource being loaded. Constructors canonicalize the Accept value
//! so install-time and runtime descriptors hash identically.

pub mod http;
pub mod url;

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::Url;
use reqwest::{Method, header::HeaderMap};

pub use http::HttpNetwork;

use ombra_core::store::descriptor_key;
use ombra_core::{Error, StoredResponse};

/// Canonical Accept value for HTML navigations.
pub const HTML_ACCEPT: &str = "text/html";

/// What kind of resource a request is loading, as known by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Destination {
    Document,
    Script,
    Style,
    Font,
    Image,
    Other,
}

/// An outgoing request as seen by the proxy.
#[derive(Debug, Clone)]
pub struct Request {
    pub method: Method,
    pub url: Url,
    pub accept: String,
    pub destination: Destination,
}

impl Request {
    /// A plain GET with wildcard Accept.
    pub fn get(url: Url) -> Self {
        Self { method: Method::GET, url, accept: "*/*".to_string(), destination: Destination::Other }
    }

    /// A page navigation: GET with the canonical HTML Accept value.
    pub fn navigation(url: Url) -> Self {
        Self { method: Method::GET, url, accept: HTML_ACCEPT.to_string(), destination: Destination::Document }
    }

    /// Override the destination hint.
    pub fn with_destination(mut self, destination: Destination) -> Self {
        self.destination = destination;
        self
    }

    /// Whether the Accept header asks for an HTML document.
    pub fn wants_html(&self) -> bool {
        self.accept.contains("text/html")
    }

    /// Cache key for this request's descriptor.
    pub fn key(&self) -> String {
        descriptor_key(self.method.as_str(), self.url.as_str(), &self.accept)
    }
}

/// A response flowing back through the proxy.
///
/// `status` is 0 for opaque responses, which carry replayable body bytes but
/// no readable metadata. Bodies are `Bytes`, so storing a copy never consumes
/// the one handed to the caller.
#[derive(Debug, Clone)]
pub struct Response {
    pub url: Url,
    pub status: u16,
    pub headers: HeaderMap,
    pub body: Bytes,
    pub opaque: bool,
}

impl Response {
    /// Build the store row for a copy of this response.
    ///
    /// Opaque responses are recorded with status 0 and no headers; their body
    /// stays replayable.
    pub fn to_stored(&self, partition: &str, req: &Request) -> StoredResponse {
        let (status, headers_json) = if self.opaque {
            (0, "[]".to_string())
        } else {
            (self.status, headers_to_json(&self.headers))
        };
        StoredResponse {
            partition_name: partition.to_string(),
            key: req.key(),
            method: req.method.as_str().to_string(),
            url: req.url.as_str().to_string(),
            accept: req.accept.clone(),
            status,
            headers_json,
            body: self.body.to_vec(),
            opaque: self.opaque,
            stored_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Replay a stored entry as a response.
    pub fn from_stored(entry: &StoredResponse) -> Result<Self, Error> {
        let url = Url::parse(&entry.url).map_err(|e| Error::InvalidUrl(e.to_string()))?;
        Ok(Self {
            url,
            status: entry.status,
            headers: headers_from_json(&entry.headers_json),
            body: Bytes::from(entry.body.clone()),
            opaque: entry.opaque,
        })
    }
}

/// Backend the proxy fetches through.
///
/// The production implementation is `HttpNetwork`; tests substitute a mock.
/// Implementations resolve with whatever the server said, including 4xx/5xx
/// statuses; `Err` means the transport itself failed.
#[async_trait]
pub trait Network: Send + Sync {
    async fn fetch(&self, req: &Request) -> Result<Response, Error>;
}

fn headers_to_json(headers: &HeaderMap) -> String {
    let pairs: Vec<(String, String)> = headers
        .iter()
        .filter_map(|(name, value)| value.to_str().ok().map(|v| (name.as_str().to_string(), v.to_string())))
        .collect();
    serde_json::to_string(&pairs).unwrap_or_else(|_| "[]".to_string())
}

fn headers_from_json(json: &str) -> HeaderMap {
    let pairs: Vec<(String, String)> = serde_json::from_str(json).unwrap_or_default();
    let mut headers = HeaderMap::new();
    for (name, value) in pairs {
        if let (Ok(name), Ok(value)) = (
            reqwest::header::HeaderName::from_bytes(name.as_bytes()),
            reqwest::header::HeaderValue::from_str(&value),
        ) {
            headers.append(name, value);
        }
    }
    headers
}

#[cfg(test)]
mod tests {
    use super::*;

    fn example(path: &str) -> Url {
        Url::parse(&format!("https://app.example.com{path}")).unwrap()
    }

    #[test]
    fn test_navigation_wants_html() {
        let req = Request::navigation(example("/login.html"));
        assert!(req.wants_html());
        assert_eq!(req.destination, Destination::Document);
    }

    #[test]
    fn test_plain_get_does_not_want_html() {
        let req = Request::get(example("/api/stats"));
        assert!(!req.wants_html());
        assert_eq!(req.accept, "*/*");
    }

    #[test]
    fn test_key_matches_descriptor() {
        let req = Request::get(example("/images/a.png"));
        assert_eq!(req.key(), descriptor_key("GET", "https://app.example.com/images/a.png", "*/*"));
    }

    #[test]
    fn test_stored_round_trip() {
        let req = Request::navigation(example("/"));
        let resp = Response {
            url: example("/"),
            status: 200,
            headers: HeaderMap::new(),
            body: Bytes::from_static(b"<html></html>"),
            opaque: false,
        };

        let stored = resp.to_stored("runtime-v1", &req);
        assert_eq!(stored.key, req.key());
        assert_eq!(stored.status, 200);

        let replayed = Response::from_stored(&stored).unwrap();
        assert_eq!(replayed.status, 200);
        assert_eq!(replayed.body, resp.body);
        assert!(!replayed.opaque);
    }

    #[test]
    fn test_opaque_stored_without_metadata() {
        let req = Request::get(Url::parse("https://cdn.tailwindcss.com/").unwrap());
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::CONTENT_TYPE, "text/javascript".parse().unwrap());
        let resp = Response {
            url: Url::parse("https://cdn.tailwindcss.com/").unwrap(),
            status: 200,
            headers,
            body: Bytes::from_static(b"tailwind()"),
            opaque: true,
        };

        let stored = resp.to_stored("core-v1", &req);
        assert_eq!(stored.status, 0);
        assert_eq!(stored.headers_json, "[]");
        assert!(stored.opaque);
        assert_eq!(stored.body, b"tailwind()");
    }

    #[test]
    fn test_headers_json_round_trip() {
        let mut headers = HeaderMap::new();
        headers.insert(reqwest::header::CONTENT_TYPE, "text/css".parse().unwrap());
        let json = headers_to_json(&headers);
        let back = headers_from_json(&json);
        assert_eq!(back.get(reqwest::header::CONTENT_TYPE).unwrap(), "text/css");
    }
}

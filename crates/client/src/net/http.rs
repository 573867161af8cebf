//! reqwest-backed production network.

use super::{Network, Request, Response};
use async_trait::async_trait;
use ombra_core::{Error, ProxyConfig};
use reqwest::{Client, Url, header};

/// HTTP network backend used outside of tests.
///
/// Responses from a different origin than the configured application origin
/// are marked opaque, so copies of third-party CDN assets are stored without
/// readable metadata but stay replayable.
pub struct HttpNetwork {
    http: Client,
    origin: Url,
    max_bytes: usize,
}

impl HttpNetwork {
    /// Build the backend from proxy configuration.
    pub fn new(config: &ProxyConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .use_rustls_tls()
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::Network(format!("failed to build HTTP client: {e}")))?;

        let origin = Url::parse(&config.origin).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        Ok(Self { http, origin, max_bytes: config.max_bytes })
    }
}

#[async_trait]
impl Network for HttpNetwork {
    async fn fetch(&self, req: &Request) -> Result<Response, Error> {
        let response = self
            .http
            .request(req.method.clone(), req.url.clone())
            .header(header::ACCEPT, &req.accept)
            .send()
            .await
            .map_err(|e| Error::Network(e.to_string()))?;

        let status = response.status().as_u16();
        let final_url = response.url().clone();
        let headers = response.headers().clone();

        if let Some(len) = response.content_length()
            && len as usize > self.max_bytes
        {
            return Err(Error::TooLarge(format!("{} bytes exceeds {}", len, self.max_bytes)));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::Network(format!("failed to read response: {e}")))?;

        if body.len() > self.max_bytes {
            return Err(Error::TooLarge(format!("{} bytes exceeds {}", body.len(), self.max_bytes)));
        }

        let opaque = final_url.origin() != self.origin.origin();

        tracing::debug!(
            url = %req.url,
            status,
            opaque,
            bytes = body.len(),
            "fetched"
        );

        Ok(Response { url: final_url, status, headers, body, opaque })
    }
}

//! Network backends and the request/response model for the ombra proxy.
//!
//! This crate defines the `Network` seam the proxy fetches through, a
//! production backend built on reqwest, and the request/response types the
//! host application hands to the proxy.

pub mod net;

pub use net::{Destination, HTML_ACCEPT, HttpNetwork, Network, Request, Response};
pub use reqwest::Method;

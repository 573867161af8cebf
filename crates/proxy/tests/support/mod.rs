//! Test support: an in-memory network backend with routable responses, an
//! offline toggle, and per-URL hit counters.

use std::collections::HashMap;
use std::sync::Mutex;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use ombra_client::{Network, Request, Response};
use ombra_core::Error;

#[derive(Clone)]
pub struct Route {
    pub status: u16,
    pub body: Vec<u8>,
    pub opaque: bool,
}

#[derive(Default)]
pub struct MockNetwork {
    routes: Mutex<HashMap<String, Route>>,
    offline: AtomicBool,
    hits: Mutex<HashMap<String, u32>>,
}

impl MockNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn route(&self, url: &str, body: &[u8]) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route { status: 200, body: body.to_vec(), opaque: false });
    }

    pub fn route_opaque(&self, url: &str, body: &[u8]) {
        self.routes
            .lock()
            .unwrap()
            .insert(url.to_string(), Route { status: 200, body: body.to_vec(), opaque: true });
    }

    pub fn unroute(&self, url: &str) {
        self.routes.lock().unwrap().remove(url);
    }

    pub fn set_offline(&self, offline: bool) {
        self.offline.store(offline, Ordering::SeqCst);
    }

    pub fn hits(&self, url: &str) -> u32 {
        *self.hits.lock().unwrap().get(url).unwrap_or(&0)
    }
}

#[async_trait]
impl Network for MockNetwork {
    async fn fetch(&self, req: &Request) -> Result<Response, Error> {
        let url = req.url.as_str().to_string();
        *self.hits.lock().unwrap().entry(url.clone()).or_insert(0) += 1;

        if self.offline.load(Ordering::SeqCst) {
            return Err(Error::Network("offline".to_string()));
        }

        let route = self.routes.lock().unwrap().get(&url).cloned();
        match route {
            Some(route) => Ok(Response {
                url: req.url.clone(),
                status: route.status,
                headers: Default::default(),
                body: Bytes::from(route.body),
                opaque: route.opaque,
            }),
            None => Err(Error::Network(format!("unreachable: {url}"))),
        }
    }
}

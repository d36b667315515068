//! Shared transport doubles for the client integration tests.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;

use polycache_core::{ApiError, ClientConfig, Method, RestClient, Transport};
use serde_json::Value;
use tempfile::TempDir;

#[derive(Debug, Clone)]
pub struct Call {
    pub url: String,
    pub query: Vec<(String, String)>,
}

impl Call {
    pub fn param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

/// Answers requests from a script, in order, and records them.
/// Panics if asked for more responses than were scripted.
#[derive(Default)]
pub struct ScriptedTransport {
    responses: RefCell<VecDeque<Result<Value, ApiError>>>,
    calls: RefCell<Vec<Call>>,
}

impl ScriptedTransport {
    pub fn new(responses: Vec<Value>) -> Self {
        Self {
            responses: RefCell::new(responses.into_iter().map(Ok).collect()),
            calls: RefCell::new(Vec::new()),
        }
    }

    pub fn failing(error: ApiError) -> Self {
        let transport = Self::default();
        transport.responses.borrow_mut().push_back(Err(error));
        transport
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    pub fn call_count(&self) -> usize {
        self.calls.borrow().len()
    }
}

impl Transport for ScriptedTransport {
    fn send(
        &self,
        method: &Method,
        url: &str,
        query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        assert_eq!(*method, Method::GET);
        self.calls.borrow_mut().push(Call {
            url: url.to_string(),
            query: query.to_vec(),
        });
        self.responses
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {}", url))
    }
}

/// Fails the test if any request reaches it.
pub struct NoNetwork;

impl Transport for NoNetwork {
    fn send(
        &self,
        _method: &Method,
        url: &str,
        _query: &[(String, String)],
    ) -> Result<Value, ApiError> {
        panic!("network must not be used, but got a request to {}", url);
    }
}

pub fn cached_config(dir: &TempDir) -> ClientConfig {
    ClientConfig::new("test-key", dir.path())
}

pub fn uncached_config() -> ClientConfig {
    ClientConfig::new("test-key", "unused-cache").with_cache_enabled(false)
}

pub fn client<T: Transport>(config: ClientConfig, transport: T) -> RestClient<T> {
    RestClient::with_transport(config, transport).expect("client should build")
}

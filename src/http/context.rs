use std::collections::HashMap;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::http::bind::{Bind, BindError, bind_map};
use crate::http::handler::HandlerResult;
use crate::http::request::{Method, Request};
use crate::http::response::{CONTENT_TYPE, MIME_HTML, MIME_JSON, MIME_TEXT, Response, StatusCode};
use crate::http::store::{Store, Value};

/// Everything a handler chain sees for one request.
///
/// Built by the connection handler after routing, passed by `&mut` to each
/// handler in turn, and turned into the outgoing [`Response`] once the chain
/// and any error handling are done.
#[derive(Debug)]
pub struct Context {
    request: Request,
    response: Response,
    store: Store,
}

impl Context {
    pub fn new(request: Request) -> Self {
        Self {
            request,
            response: Response::new(),
            store: Store::new(),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub fn into_response(self) -> Response {
        self.response
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut Store {
        &mut self.store
    }

    // Binding

    /// Deserializes the request body as JSON.
    pub fn bind_body<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.request.body)
    }

    pub fn bind_query<T: Bind>(&self) -> Result<T, BindError> {
        bind_map(&self.request.query_params)
    }

    pub fn bind_path<T: Bind>(&self) -> Result<T, BindError> {
        bind_map(&self.request.path_params)
    }

    pub fn bind_header<T: Bind>(&self) -> Result<T, BindError> {
        bind_map(&self.request.headers)
    }

    // Response senders

    pub fn json<T: Serialize + ?Sized>(&mut self, status: StatusCode, data: &T) -> HandlerResult {
        let body = serde_json::to_vec(data)?;
        self.bytes(status, MIME_JSON, body)
    }

    pub fn string(&mut self, status: StatusCode, data: impl Into<String>) -> HandlerResult {
        self.bytes(status, MIME_TEXT, data.into().into_bytes())
    }

    pub fn html(&mut self, status: StatusCode, data: impl Into<String>) -> HandlerResult {
        self.bytes(status, MIME_HTML, data.into().into_bytes())
    }

    /// Sends raw bytes. An empty `content_type` leaves the header alone, so
    /// whatever was set before (or the plain-text default) applies.
    pub fn bytes(
        &mut self,
        status: StatusCode,
        content_type: &str,
        data: impl Into<Vec<u8>>,
    ) -> HandlerResult {
        if !content_type.is_empty() {
            self.response.remove_header_ignore_case(CONTENT_TYPE);
            self.response.set_header(CONTENT_TYPE, content_type);
        }
        self.response.set_status(status);
        self.response.set_body(data);
        Ok(())
    }

    // Request accessors

    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.request.query_param(key)
    }

    pub fn path_param(&self, key: &str) -> Option<&str> {
        self.request.path_param(key)
    }

    pub fn header(&self, key: &str) -> Option<&str> {
        self.request.header(key)
    }

    pub fn query_params(&self) -> &HashMap<String, String> {
        &self.request.query_params
    }

    pub fn path_params(&self) -> &HashMap<String, String> {
        &self.request.path_params
    }

    pub fn headers(&self) -> &HashMap<String, String> {
        &self.request.headers
    }

    /// Sets a response header.
    pub fn set_header(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.response.set_header(key, value);
    }

    /// The normalized request path.
    pub fn url(&self) -> &str {
        &self.request.path
    }

    pub fn method(&self) -> Method {
        self.request.method
    }

    // Scratch store

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.store.set(key, value);
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.store.get(key)
    }

    pub fn get_string(&self, key: &str) -> Option<&str> {
        self.store.get_string(key)
    }

    pub fn get_int(&self, key: &str) -> Option<i64> {
        self.store.get_int(key)
    }

    pub fn get_float(&self, key: &str) -> Option<f64> {
        self.store.get_float(key)
    }

    pub fn get_bool(&self, key: &str) -> Option<bool> {
        self.store.get_bool(key)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.store.remove(key)
    }
}

//! Network fetch abstraction used by the offline cache worker.
//!
//! Requests and responses are plain data so the worker can store, clone and
//! replay them without holding host objects.

use bytes::Bytes;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::{error::Result, platform::PlatformSendSync};

/// HTTP method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HttpMethod {
    Get,
    Head,
    Post,
    Put,
    Patch,
    Delete,
}

impl HttpMethod {
    /// Parse a method name, case-insensitively. Unknown names map to `None`.
    pub fn parse(method: &str) -> Option<Self> {
        match method.to_ascii_uppercase().as_str() {
            "GET" => Some(HttpMethod::Get),
            "HEAD" => Some(HttpMethod::Head),
            "POST" => Some(HttpMethod::Post),
            "PUT" => Some(HttpMethod::Put),
            "PATCH" => Some(HttpMethod::Patch),
            "DELETE" => Some(HttpMethod::Delete),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Head => "HEAD",
            HttpMethod::Post => "POST",
            HttpMethod::Put => "PUT",
            HttpMethod::Patch => "PATCH",
            HttpMethod::Delete => "DELETE",
        }
    }
}

/// What the request is for, as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestDestination {
    /// A full-page navigation.
    Document,
    Script,
    Style,
    Image,
    Manifest,
    Audio,
    #[default]
    Other,
}

/// Outgoing resource request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub destination: RequestDestination,
}

impl FetchRequest {
    /// A `GET` request with no particular destination.
    pub fn get(url: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Get,
            url: url.into(),
            headers: HashMap::new(),
            destination: RequestDestination::Other,
        }
    }

    /// A `GET` navigation request for a full page.
    pub fn navigate(url: impl Into<String>) -> Self {
        Self::get(url).with_destination(RequestDestination::Document)
    }

    pub fn with_method(mut self, method: HttpMethod) -> Self {
        self.method = method;
        self
    }

    pub fn with_destination(mut self, destination: RequestDestination) -> Self {
        self.destination = destination;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Whether this request loads a whole page.
    pub fn is_navigation(&self) -> bool {
        self.destination == RequestDestination::Document
    }

    /// Key under which the request is stored: the URL without fragment.
    pub fn cache_key(&self) -> &str {
        match self.url.split_once('#') {
            Some((base, _)) => base,
            None => &self.url,
        }
    }
}

/// Response tainting as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResponseType {
    /// Same-origin response.
    #[default]
    Basic,
    /// Cross-origin response readable through CORS.
    Cors,
    /// Cross-origin response with hidden contents.
    Opaque,
    /// Network error response.
    Error,
}

/// Resource response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchResponse {
    pub status: u16,
    pub response_type: ResponseType,
    pub headers: HashMap<String, String>,
    pub body: Bytes,
}

impl FetchResponse {
    /// A same-origin response with the given status and body.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            response_type: ResponseType::Basic,
            headers: HashMap::new(),
            body: body.into(),
        }
    }

    pub fn with_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(key.into(), value.into());
        self
    }

    /// Case-insensitive header lookup.
    pub fn header_value(&self, key: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(key))
            .map(|(_, value)| value.as_str())
    }

    /// Get response body as UTF-8 string
    pub fn text(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Check if response status is successful (2xx)
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the response is same-origin.
    pub fn is_same_origin(&self) -> bool {
        self.response_type == ResponseType::Basic
    }
}

/// Async network fetch.
///
/// Implementations return `Err` only when no response arrived at all
/// (offline, DNS failure, aborted). HTTP error statuses are responses.
#[cfg_attr(target_arch = "wasm32", async_trait::async_trait(?Send))]
#[cfg_attr(not(target_arch = "wasm32"), async_trait::async_trait)]
pub trait Fetcher: PlatformSendSync {
    async fn fetch(&self, request: &FetchRequest) -> Result<FetchResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_builder() {
        let request = FetchRequest::get("https://app.example/index.html")
            .header("Accept", "text/html")
            .with_destination(RequestDestination::Document);

        assert_eq!(request.method, HttpMethod::Get);
        assert_eq!(request.headers.get("Accept"), Some(&"text/html".to_string()));
        assert!(request.is_navigation());
        assert!(!FetchRequest::get("https://app.example/app.js").is_navigation());
    }

    #[test]
    fn cache_key_drops_fragment() {
        let request = FetchRequest::get("https://app.example/index.html#player");
        assert_eq!(request.cache_key(), "https://app.example/index.html");

        let plain = FetchRequest::get("https://app.example/style.css");
        assert_eq!(plain.cache_key(), "https://app.example/style.css");
    }

    #[test]
    fn response_status_checks() {
        let response = FetchResponse::new(200, "body").header("Content-Type", "text/css");

        assert!(response.is_success());
        assert!(response.is_same_origin());
        assert_eq!(response.header_value("content-type"), Some("text/css"));
        assert_eq!(response.text(), Some("body"));

        let opaque = FetchResponse::new(0, "").with_type(ResponseType::Opaque);
        assert!(!opaque.is_success());
        assert!(!opaque.is_same_origin());
    }

    #[test]
    fn method_parsing() {
        assert_eq!(HttpMethod::parse("get"), Some(HttpMethod::Get));
        assert_eq!(HttpMethod::parse("POST"), Some(HttpMethod::Post));
        assert_eq!(HttpMethod::parse("OPTIONS"), None);
        assert_eq!(HttpMethod::Delete.as_str(), "DELETE");
    }
}

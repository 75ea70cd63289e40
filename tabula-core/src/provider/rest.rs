use async_trait::async_trait;
use serde_json::Value;
use tabula_types::{Params, ProviderError, ProviderResponse, Verb};

use super::DataProvider;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

impl HttpRequest {
    pub fn get(url: impl Into<String>) -> Self {
        Self { method: Method::Get, url: url.into(), headers: Vec::new(), body: None }
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    pub fn with_body(mut self, body: Value) -> Self {
        self.headers.push(("Content-Type".to_string(), "application/json".to_string()));
        self.body = Some(body);
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    /// Parsed JSON body, `Null` when empty.
    pub body: Value,
}

impl HttpResponse {
    pub fn new(status: u16, body: Value) -> Self {
        Self { status, headers: Vec::new(), body }
    }

    pub fn with_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(key, _)| key.eq_ignore_ascii_case(name))
            .map(|(_, value)| value.as_str())
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Transport. The crate ships no implementation; integrators wrap their
/// HTTP library of choice.
#[async_trait]
pub trait HttpClient: Send + Sync {
    async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError>;
}

/// Translates provider calls to a backend's URL scheme and back.
pub trait RestFlavor: Send + Sync {
    fn http_request_from_action(&self, verb: Verb, resource: &str, params: &Params) -> Result<HttpRequest, ProviderError>;

    fn success_payload_from_http_response(
        &self,
        response: HttpResponse,
        verb: Verb,
        resource: &str,
        params: &Params,
    ) -> Result<ProviderResponse, ProviderError>;
}

/// A `DataProvider` built from a REST flavor and an HTTP client.
pub struct RestDataProvider<F, C> {
    flavor: F,
    client: C,
}

impl<F: RestFlavor, C: HttpClient> RestDataProvider<F, C> {
    pub fn new(flavor: F, client: C) -> Self {
        Self { flavor, client }
    }
}

#[async_trait]
impl<F: RestFlavor, C: HttpClient> DataProvider for RestDataProvider<F, C> {
    async fn call(&self, verb: Verb, resource: &str, params: Params) -> Result<ProviderResponse, ProviderError> {
        let request = self.flavor.http_request_from_action(verb, resource, &params)?;
        log::debug!(target: "provider", "{} {} ({} {})", request.method.as_str(), request.url, verb, resource);
        let response = self.client.send(request).await?;
        if !response.is_success() {
            return Err(error_from_response(&response));
        }
        self.flavor.success_payload_from_http_response(response, verb, resource, &params)
    }
}

/// Prefer the server's own `message`, fall back to the status.
fn error_from_response(response: &HttpResponse) -> ProviderError {
    let message = response
        .body
        .get("message")
        .and_then(Value::as_str)
        .map(str::to_string)
        .unwrap_or_else(|| format!("HTTP {}", response.status));
    ProviderError::with_status(message, response.status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Mutex;
    use tabula_types::{Record, RecordId};

    struct EchoFlavor;

    impl RestFlavor for EchoFlavor {
        fn http_request_from_action(&self, _verb: Verb, resource: &str, _params: &Params) -> Result<HttpRequest, ProviderError> {
            Ok(HttpRequest::get(format!("http://api/{}", resource)))
        }

        fn success_payload_from_http_response(
            &self,
            response: HttpResponse,
            _verb: Verb,
            _resource: &str,
            _params: &Params,
        ) -> Result<ProviderResponse, ProviderError> {
            Record::from_json(response.body)
                .map(ProviderResponse::one)
                .ok_or_else(|| ProviderError::new("not an object"))
        }
    }

    struct CannedClient {
        response: HttpResponse,
        seen: Mutex<Vec<HttpRequest>>,
    }

    #[async_trait]
    impl HttpClient for CannedClient {
        async fn send(&self, request: HttpRequest) -> Result<HttpResponse, ProviderError> {
            self.seen.lock().unwrap().push(request);
            Ok(self.response.clone())
        }
    }

    fn provider(response: HttpResponse) -> RestDataProvider<EchoFlavor, CannedClient> {
        RestDataProvider::new(EchoFlavor, CannedClient { response, seen: Mutex::new(Vec::new()) })
    }

    #[tokio::test]
    async fn success_goes_through_the_flavor() {
        let provider = provider(HttpResponse::new(200, json!({"id": 1})));
        let result = provider.call(Verb::GetOne, "posts", Params::GetOne { id: RecordId::Int(1) }).await.unwrap();
        assert_eq!(result.record().and_then(|r| r.id("id")), Some(RecordId::Int(1)));
        assert_eq!(provider.client.seen.lock().unwrap()[0].url, "http://api/posts");
    }

    #[tokio::test]
    async fn non_2xx_becomes_provider_error() {
        let provider = provider(HttpResponse::new(500, json!({"message": "db down"})));
        let err = provider.call(Verb::GetOne, "posts", Params::GetOne { id: RecordId::Int(1) }).await.unwrap_err();
        assert_eq!(err, ProviderError::with_status("db down", 500));

        let provider = provider_without_message();
        let err = provider.call(Verb::GetOne, "posts", Params::GetOne { id: RecordId::Int(1) }).await.unwrap_err();
        assert_eq!(err, ProviderError::with_status("HTTP 404", 404));
    }

    fn provider_without_message() -> RestDataProvider<EchoFlavor, CannedClient> {
        provider(HttpResponse::new(404, Value::Null))
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse::new(200, Value::Null).with_header("x-total-count", "3");
        assert_eq!(response.header("X-Total-Count"), Some("3"));
        assert_eq!(response.header("Content-Range"), None);
    }
}

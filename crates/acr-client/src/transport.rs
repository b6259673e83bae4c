use async_trait::async_trait;
use serde_json::Value;

use acr_core::flatten::command::HttpMethod;

use crate::error::TransportError;

/// One outbound HTTP exchange, fully described before it leaves the
/// dispatcher.
#[derive(Debug, Clone)]
pub struct TransportRequest {
    pub method: HttpMethod,
    pub url: String,
    pub query: Vec<(String, String)>,
    pub headers: Vec<(String, String)>,
    pub body: Option<Value>,
}

/// Status and decoded body of a completed exchange. Non-JSON payloads
/// decode to a plain string value.
#[derive(Debug, Clone)]
pub struct TransportResponse {
    pub status: u16,
    pub body: Value,
}

/// The single outbound capability the dispatcher consumes. Retries,
/// redirects, pooling and backoff belong behind this seam, never in the
/// dispatcher.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError>;
}

/// reqwest-backed transport.
#[derive(Debug, Clone, Default)]
pub struct HttpTransport {
    client: reqwest::Client,
}

impl HttpTransport {
    pub fn new() -> Self {
        Self {
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: TransportRequest) -> Result<TransportResponse, TransportError> {
        let mut req = self
            .client
            .request(to_reqwest_method(request.method), &request.url);

        if !request.query.is_empty() {
            req = req.query(&request.query);
        }
        for (name, value) in &request.headers {
            req = req.header(name, value);
        }
        if let Some(body) = &request.body {
            req = req.json(body);
        }

        let response = req.send().await?;
        let status = response.status().as_u16();
        let text = response.text().await?;
        let body = serde_json::from_str(&text).unwrap_or(Value::String(text));
        Ok(TransportResponse { status, body })
    }
}

fn to_reqwest_method(method: HttpMethod) -> reqwest::Method {
    match method {
        HttpMethod::Get => reqwest::Method::GET,
        HttpMethod::Post => reqwest::Method::POST,
        HttpMethod::Put => reqwest::Method::PUT,
        HttpMethod::Delete => reqwest::Method::DELETE,
        HttpMethod::Patch => reqwest::Method::PATCH,
        HttpMethod::Options => reqwest::Method::OPTIONS,
        HttpMethod::Head => reqwest::Method::HEAD,
        HttpMethod::Trace => reqwest::Method::TRACE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sends_query_headers_and_decodes_json() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/core/version")
            .match_query(mockito::Matcher::UrlEncoded(
                "verbose".into(),
                "true".into(),
            ))
            .match_header("x-session-id", "abc")
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"version":"1.4.0"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let response = transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: format!("{}/core/version", server.url()),
                query: vec![("verbose".to_string(), "true".to_string())],
                headers: vec![("X-Session-Id".to_string(), "abc".to_string())],
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.status, 200);
        assert_eq!(response.body["version"], "1.4.0");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn posts_json_body() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("POST", "/scan/start")
            .match_header("content-type", "application/json")
            .match_body(mockito::Matcher::Json(serde_json::json!({
                "target-url": "http://t"
            })))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(r#"{"scanId":9}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let response = transport
            .send(TransportRequest {
                method: HttpMethod::Post,
                url: format!("{}/scan/start", server.url()),
                query: Vec::new(),
                headers: Vec::new(),
                body: Some(serde_json::json!({"target-url": "http://t"})),
            })
            .await
            .unwrap();

        assert_eq!(response.body["scanId"], 9);
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn non_json_payload_decodes_to_string() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/plain")
            .with_status(200)
            .with_header("content-type", "text/plain")
            .with_body("OK")
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let response = transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: format!("{}/plain", server.url()),
                query: Vec::new(),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap();

        assert_eq!(response.body, Value::String("OK".to_string()));
    }

    #[tokio::test]
    async fn status_is_reported_not_raised() {
        let mut server = mockito::Server::new_async().await;
        let _mock = server
            .mock("GET", "/missing")
            .with_status(404)
            .with_body(r#"{"message":"no such thing"}"#)
            .create_async()
            .await;

        let transport = HttpTransport::new();
        let response = transport
            .send(TransportRequest {
                method: HttpMethod::Get,
                url: format!("{}/missing", server.url()),
                query: Vec::new(),
                headers: Vec::new(),
                body: None,
            })
            .await
            .unwrap();

        // The dispatcher decides what a non-2xx means; the transport just
        // reports it.
        assert_eq!(response.status, 404);
        assert_eq!(response.body["message"], "no such thing");
    }
}

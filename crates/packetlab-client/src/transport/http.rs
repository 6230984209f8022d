use log::debug;
use reqwest::blocking::{Client, RequestBuilder};

use super::{ByteStream, Method, RawResponse, Transport, TransportError, filename_from_disposition};

/// Blocking reqwest-backed [`Transport`].
///
/// Joins `base_url` with request paths and raises [`TransportError::Status`]
/// for every non-2xx response, with the response body as the message.
pub struct HttpTransport {
    client: Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport rooted at `base_url` (e.g. `https://lab.example/api/v1`).
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self {
            client: Client::new(),
            base_url,
        }
    }

    /// Create a transport with a caller-configured reqwest client.
    pub fn with_client(client: Client, base_url: impl Into<String>) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { client, base_url }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn builder(&self, method: Method, path: &str, query: &[(&str, String)]) -> RequestBuilder {
        let url = self.url(path);
        debug!("{} {} (query: {:?})", method.as_str(), url, query);
        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        builder.query(query)
    }
}

impl Transport for HttpTransport {
    fn send(
        &self,
        method: Method,
        path: &str,
        query: &[(&str, String)],
        body: Option<&serde_json::Value>,
    ) -> Result<RawResponse, TransportError> {
        let mut builder = self.builder(method, path, query);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let response = builder.send().map_err(request_error)?;
        let status = response.status();
        let filename = disposition_filename(response.headers());
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let body = response.bytes().map_err(request_error)?.to_vec();
        Ok(RawResponse {
            status: status.as_u16(),
            filename,
            body,
        })
    }

    fn stream(&self, path: &str, query: &[(&str, String)]) -> Result<ByteStream, TransportError> {
        let response = self
            .builder(Method::Get, path, query)
            .send()
            .map_err(request_error)?;
        let status = response.status();
        if !status.is_success() {
            let message = response.text().unwrap_or_default();
            return Err(TransportError::Status {
                status: status.as_u16(),
                message,
            });
        }
        let filename = disposition_filename(response.headers());
        Ok(ByteStream {
            reader: Box::new(response),
            filename,
        })
    }
}

fn request_error(err: reqwest::Error) -> TransportError {
    TransportError::Request(err.to_string())
}

fn disposition_filename(headers: &reqwest::header::HeaderMap) -> Option<String> {
    headers
        .get(reqwest::header::CONTENT_DISPOSITION)
        .and_then(|value| value.to_str().ok())
        .and_then(filename_from_disposition)
}

//! Network access
//!
//! The gateway reaches the network only through the `Fetcher` trait, so
//! hosts and tests can substitute their own transport.

use url::Url;

use crate::request::{same_origin, Method, Request, Response, ResponseKind};

/// Network error
#[derive(Debug, thiserror::Error)]
pub enum NetError {
    #[error("HTTP error: {status}")]
    HttpError { status: u16 },

    #[error("network error: {0}")]
    Network(String),

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Something that can perform a network fetch.
pub trait Fetcher {
    fn fetch(
        &self,
        request: &Request,
    ) -> impl Future<Output = Result<Response, NetError>> + Send;
}

/// Real fetcher backed by a blocking reqwest client, driven off the async
/// executor via `smol::unblock`.
pub struct HttpFetcher {
    client: reqwest::blocking::Client,
    origin: Url,
}

impl HttpFetcher {
    pub fn new(origin: Url) -> Result<Self, NetError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent("owl/0.1")
            .build()
            .map_err(|e| NetError::Network(e.to_string()))?;

        Ok(Self { client, origin })
    }
}

impl Fetcher for HttpFetcher {
    async fn fetch(&self, request: &Request) -> Result<Response, NetError> {
        let client = self.client.clone();
        let method = to_reqwest_method(request.method);
        let url = request.url.clone();
        let headers = request.headers.clone();
        let body = request.body.clone();

        let kind = if same_origin(&request.url, &self.origin) {
            ResponseKind::Basic
        } else {
            ResponseKind::Cors
        };

        let (status, status_text, resp_headers, resp_body) = smol::unblock(move || {
            let mut builder = client.request(method, &url);
            for (key, value) in &headers {
                builder = builder.header(key, value);
            }
            if let Some(body) = body {
                builder = builder.body(body);
            }

            let response = builder
                .send()
                .map_err(|e| NetError::Network(e.to_string()))?;

            let status = response.status().as_u16();
            let status_text = response
                .status()
                .canonical_reason()
                .unwrap_or_default()
                .to_string();
            let headers: Vec<(String, String)> = response
                .headers()
                .iter()
                .map(|(k, v)| {
                    (
                        k.as_str().to_string(),
                        String::from_utf8_lossy(v.as_bytes()).into_owned(),
                    )
                })
                .collect();
            let body = response
                .bytes()
                .map_err(|e| NetError::Network(e.to_string()))?
                .to_vec();

            Ok::<_, NetError>((status, status_text, headers, body))
        })
        .await?;

        Ok(Response {
            status,
            status_text,
            headers: resp_headers,
            body: resp_body,
            kind,
        })
    }
}

fn to_reqwest_method(method: Method) -> reqwest::Method {
    match method {
        Method::Get => reqwest::Method::GET,
        Method::Post => reqwest::Method::POST,
        Method::Put => reqwest::Method::PUT,
        Method::Delete => reqwest::Method::DELETE,
        Method::Head => reqwest::Method::HEAD,
        Method::Options => reqwest::Method::OPTIONS,
        Method::Patch => reqwest::Method::PATCH,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_net_error_display() {
        let err = NetError::HttpError { status: 404 };
        assert!(err.to_string().contains("404"));

        let err = NetError::Network("connection refused".into());
        assert!(err.to_string().contains("connection refused"));

        let err = NetError::InvalidUrl("not a url".into());
        assert!(err.to_string().contains("not a url"));
    }

    #[test]
    fn test_http_fetcher_builds() {
        let origin = Url::parse("https://shelf.example").unwrap();
        assert!(HttpFetcher::new(origin).is_ok());
    }

    #[test]
    fn test_method_mapping() {
        assert_eq!(to_reqwest_method(Method::Get), reqwest::Method::GET);
        assert_eq!(to_reqwest_method(Method::Put), reqwest::Method::PUT);
        assert_eq!(to_reqwest_method(Method::Patch), reqwest::Method::PATCH);
    }
}

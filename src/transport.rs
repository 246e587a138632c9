use crate::config::ConnectionConfig;
use crate::error::TransportError;
use bytes::Bytes;
use reqwest::{
    header::{HeaderValue, AUTHORIZATION, CONTENT_TYPE},
    Client, Method, Request,
};
use serde::Serialize;
use tracing::{debug, warn};

/// HTTP access to the OHA server API
///
/// Non-2xx answers are not treated as failures: the server reports errors in
/// the JSON body, which callers print as-is.
pub struct Transport {
    pub base_url: String,
    pub client: Client,
}

impl Transport {
    pub fn new(
        base_url: impl Into<String>,
        accept_invalid_certs: bool,
    ) -> Result<Self, TransportError> {
        let base_url = base_url.into();
        if accept_invalid_certs {
            warn!(%base_url, "TLS certificate verification is disabled");
        }
        let client = Client::builder()
            .danger_accept_invalid_certs(accept_invalid_certs)
            .build()
            .map_err(TransportError::Client)?;
        Ok(Transport { base_url, client })
    }

    pub fn from_config(cfg: &ConnectionConfig) -> Result<Self, TransportError> {
        Self::new(cfg.base_url(), cfg.accept_invalid_certs())
    }

    /// Base URL with `path` appended verbatim, query string included
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Assemble a request without sending it
    ///
    /// A body always goes out as `application/json`; a token adds
    /// `Authorization: Bearer <token>`.
    pub fn build_request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        token: Option<&str>,
    ) -> Result<Request, TransportError> {
        let url = self.url(path);
        let mut req = self.client.request(method, &url);
        if let Some(tok) = token {
            req = req.bearer_auth(tok);
        }
        if let Some(data) = body {
            req = req
                .header(CONTENT_TYPE, HeaderValue::from_static("application/json"))
                .body(data);
        }
        req.build()
            .map_err(|source| TransportError::Request { url, source })
    }

    /// Send one request and return the whole response body
    pub async fn request(
        &self,
        method: Method,
        path: &str,
        body: Option<Vec<u8>>,
        token: Option<&str>,
    ) -> Result<Bytes, TransportError> {
        let req = self.build_request(method, path, body, token)?;
        let url = req.url().to_string();
        debug!(
            method = %req.method(),
            %url,
            authorized = req.headers().contains_key(AUTHORIZATION),
            "sending request"
        );
        let resp = self
            .client
            .execute(req)
            .await
            .map_err(|source| TransportError::Request {
                url: url.clone(),
                source,
            })?;
        let status = resp.status();
        let data = resp
            .bytes()
            .await
            .map_err(|source| TransportError::Body { url, source })?;
        debug!(%status, len = data.len(), "received response");
        Ok(data)
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> Result<Bytes, TransportError> {
        self.request(Method::GET, path, None, token).await
    }

    pub async fn post(
        &self,
        path: &str,
        body: Vec<u8>,
        token: Option<&str>,
    ) -> Result<Bytes, TransportError> {
        self.request(Method::POST, path, Some(body), token).await
    }

    /// POST `payload` serialized as JSON
    pub async fn post_json<T: Serialize + ?Sized>(
        &self,
        path: &str,
        payload: &T,
        token: Option<&str>,
    ) -> anyhow::Result<Bytes> {
        let body = serde_json::to_vec(payload)?;
        Ok(self.post(path, body, token).await?)
    }
}

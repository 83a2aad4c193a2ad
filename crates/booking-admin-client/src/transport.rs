use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;
use tracing::{debug, warn};

use crate::config::AdminClientConfig;
use crate::error::AdminError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Patch,
    Delete,
}

impl Method {
    pub fn as_str(self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Patch => "PATCH",
            Method::Delete => "DELETE",
        }
    }
}

/// バックエンドへの 1 リクエスト。パスはベース URL からの相対。
#[derive(Debug, Clone, PartialEq)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub query: Vec<(&'static str, String)>,
    pub body: Option<Value>,
}

impl ApiRequest {
    fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Post, path).body(body)
    }

    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Put, path).body(body)
    }

    pub fn patch(path: impl Into<String>, body: Value) -> Self {
        Self::new(Method::Patch, path).body(body)
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    pub fn query(mut self, query: Vec<(&'static str, String)>) -> Self {
        self.query = query;
        self
    }

    fn body(mut self, body: Value) -> Self {
        self.body = Some(body);
        self
    }
}

/// 管理 API への送信口。レスポンスは形を問わず JSON 値で返す。
#[async_trait]
#[cfg_attr(feature = "mock", mockall::automock)]
pub trait AdminTransport: Send + Sync {
    async fn send(&self, request: ApiRequest) -> Result<Value, AdminError>;
}

/// reqwest による `AdminTransport` 実装。
pub struct HttpTransport {
    http: reqwest::Client,
    base_url: String,
    token: Option<SecretString>,
}

impl HttpTransport {
    pub fn new(config: &AdminClientConfig) -> Result<Self, AdminError> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout())
            .build()?;

        Ok(Self {
            http,
            base_url: config.base_url().to_string(),
            token: config.api.token.clone(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// HTTP レスポンスのステータスを確認し、エラーを `AdminError` に変換する。
    async fn check_response(
        resp: reqwest::Response,
        path: &str,
    ) -> Result<reqwest::Response, AdminError> {
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        let body = resp.text().await.unwrap_or_default();
        match status.as_u16() {
            404 => Err(AdminError::NotFound(path.to_string())),
            code => Err(AdminError::Api {
                status: code,
                message: body,
            }),
        }
    }

    /// `reqwest::Error` を `AdminError` へ変換するヘルパー。
    fn map_request_error(e: reqwest::Error) -> AdminError {
        if e.is_timeout() {
            AdminError::Timeout(e.to_string())
        } else {
            AdminError::Http(e)
        }
    }

    /// 本文を JSON として読む。空の本文は null、JSON でない本文も null として扱う。
    async fn read_body(resp: reqwest::Response, path: &str) -> Result<Value, AdminError> {
        let text = resp.text().await.map_err(Self::map_request_error)?;
        if text.trim().is_empty() {
            return Ok(Value::Null);
        }
        match serde_json::from_str(&text) {
            Ok(value) => Ok(value),
            Err(e) => {
                warn!(path = path, error = %e, "JSON でないレスポンス本文を無視");
                Ok(Value::Null)
            }
        }
    }
}

#[async_trait]
impl AdminTransport for HttpTransport {
    async fn send(&self, request: ApiRequest) -> Result<Value, AdminError> {
        let url = self.url(&request.path);
        let mut builder = match request.method {
            Method::Get => self.http.get(&url),
            Method::Post => self.http.post(&url),
            Method::Put => self.http.put(&url),
            Method::Patch => self.http.patch(&url),
            Method::Delete => self.http.delete(&url),
        };
        if !request.query.is_empty() {
            builder = builder.query(&request.query);
        }
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        debug!(method = request.method.as_str(), path = %request.path, "管理 API へ送信");
        let resp = builder.send().await.map_err(|e| {
            warn!(method = request.method.as_str(), path = %request.path, error = %e, "送信エラー");
            Self::map_request_error(e)
        })?;
        debug!(
            method = request.method.as_str(),
            path = %request.path,
            status = resp.status().as_u16(),
            "レスポンス受信"
        );
        let resp = Self::check_response(resp, &request.path).await?;
        Self::read_body(resp, &request.path).await
    }
}

use std::{
    sync::Arc,
    time::Duration,
};

use reqwest::{
    header::{
        HeaderMap,
        AUTHORIZATION,
        USER_AGENT,
    },
    Client,
    Method,
    Response,
    StatusCode,
};
use serde::de::DeserializeOwned;

use crate::{
    core::MemoError,
    session::Session,
};

const CLIENT_USER_AGENT: &str = concat!("somemo/", env!("CARGO_PKG_VERSION"), " (+reqwest)");

pub fn http_client(timeout: Duration) -> Result<Client, MemoError> {
    Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| MemoError::Config(format!("HTTP client build failed: {e}")))
}

/// Unauthenticated access to the backend: a shared client plus the base URL.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(http: Client, base_url: &str) -> Self {
        Self { http, base_url: base_url.trim_end_matches('/').to_string() }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    pub fn http(&self) -> &Client {
        &self.http
    }
}

/// Bearer-token requests with uniform handling of authentication failures.
///
/// A missing token or a 401 expires the session (credentials cleared, then
/// login redirect) and yields `Unauthenticated`. Nothing is retried.
#[derive(Clone)]
pub struct AuthenticatedClient {
    api: ApiClient,
    session: Arc<Session>,
}

impl AuthenticatedClient {
    pub fn new(api: ApiClient, session: Arc<Session>) -> Self {
        Self { api, session }
    }

    pub fn session(&self) -> &Arc<Session> {
        &self.session
    }

    pub async fn request<T: DeserializeOwned>(
        &self,
        method: Method,
        path: &str,
        body: Option<serde_json::Value>,
        headers: Option<HeaderMap>,
    ) -> Result<T, MemoError> {
        let Some(token) = self.session.token() else {
            tracing::debug!(path, "no token, skipping request");
            self.session.expire();
            return Err(MemoError::Unauthenticated);
        };

        let url = self.api.url(path);
        let mut builder = self
            .api
            .http()
            .request(method.clone(), &url)
            .header(USER_AGENT, CLIENT_USER_AGENT)
            .header(AUTHORIZATION, format!("Bearer {token}"));
        if let Some(mut headers) = headers {
            // The session token is the only credential we ever send.
            if headers.remove(AUTHORIZATION).is_some() {
                tracing::debug!(path, "dropping caller-supplied authorization header");
            }
            builder = builder.headers(headers);
        }
        if let Some(body) = body {
            builder = builder.json(&body);
        }

        tracing::debug!(%method, %url, "sending request");
        let resp = builder.send().await?;

        if resp.status() == StatusCode::UNAUTHORIZED {
            self.session.expire();
            return Err(MemoError::Unauthenticated);
        }

        let resp = ensure_success(resp).await?;
        resp.json::<T>()
            .await
            .map_err(|e| MemoError::request_failed(format!("Invalid response from {url}: {e}")))
    }

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, MemoError> {
        self.request(Method::GET, path, None, None).await
    }

    pub async fn post<T: DeserializeOwned>(
        &self,
        path: &str,
        body: serde_json::Value,
    ) -> Result<T, MemoError> {
        self.request(Method::POST, path, Some(body), None).await
    }
}

/// Turns a non-2xx response into `RequestFailed`, keeping the body as detail.
pub(crate) async fn ensure_success(resp: Response) -> Result<Response, MemoError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let url = resp.url().to_string();
    let text = resp.text().await.unwrap_or_default();
    let detail = if text.trim().is_empty() {
        format!("HTTP error {} from {}", status, url)
    } else {
        text
    };
    Err(MemoError::RequestFailed { status: Some(status.as_u16()), detail })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_joining() {
        let api = ApiClient::new(Client::new(), "http://localhost:8000/");
        assert_eq!(api.base_url(), "http://localhost:8000");
        assert_eq!(api.url("/cards/"), "http://localhost:8000/cards/");
        assert_eq!(api.url("auth/login"), "http://localhost:8000/auth/login");
    }
}

use reqwest::header::USER_AGENT;

use super::Session;
use crate::core::{
    http::ApiClient,
    models::{
        LoginRequest,
        LoginResponse,
    },
    Credential,
    MemoError,
};

const LOGIN_PATH: &str = "/auth/login";

/// Exchanges username and password for a bearer token and stores the pair.
pub async fn login(
    api: &ApiClient,
    session: &Session,
    username: &str,
    password: &str,
) -> Result<Credential, MemoError> {
    if username.trim().is_empty() {
        return Err(MemoError::Validation("username is required".to_string()));
    }
    if password.is_empty() {
        return Err(MemoError::Validation("password is required".to_string()));
    }

    let url = api.url(LOGIN_PATH);
    tracing::debug!(%url, username, "requesting token");
    let resp = api
        .http()
        .post(&url)
        .header(USER_AGENT, concat!("somemo/", env!("CARGO_PKG_VERSION")))
        .json(&LoginRequest { username, password })
        .send()
        .await?;

    if !resp.status().is_success() {
        tracing::debug!(status = %resp.status(), "login rejected");
        return Err(MemoError::RequestFailed {
            status: Some(resp.status().as_u16()),
            detail: "Invalid credentials".to_string(),
        });
    }

    let body: LoginResponse = resp
        .json()
        .await
        .map_err(|e| MemoError::request_failed(format!("Invalid login response: {e}")))?;

    session.establish(username, &body.access_token)
}

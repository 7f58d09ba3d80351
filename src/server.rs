use std::sync::{Mutex, PoisonError};
use std::time::Duration;

use reqwest::StatusCode;
use reqwest::blocking::{Client, RequestBuilder, Response};
use reqwest::header::CONTENT_TYPE;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Credentials;

#[derive(Debug, Error)]
pub enum ServerError {
    #[error("{0}")]
    Transport(#[from] reqwest::Error),
    #[error("login rejected: server answered {0}")]
    LoginRejected(StatusCode),
    #[error("server requires a login, set username and password in the config")]
    NoCredentials,
    #[error("malformed login reply: {0}")]
    Malformed(String),
}

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

#[derive(Deserialize)]
struct LoginReply {
    user_id: u64,
}

/// Cookie-keeping client shared by the word source and the result sink.
/// `/api/session` and `/api/result` need the `session_token` cookie that
/// `POST /api/login` sets.
pub struct ServerClient {
    client: Client,
    base_url: String,
    credentials: Option<Credentials>,
    logged_in: Mutex<bool>,
}

impl ServerClient {
    pub fn new(base_url: &str, credentials: Option<Credentials>) -> Result<Self, ServerError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(10))
            .cookie_store(true)
            .build()?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            credentials,
            logged_in: Mutex::new(false),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Log in unless a session is already held. Without credentials this is
    /// a no-op and protected routes answer 401.
    fn ensure_login(&self) -> Result<(), ServerError> {
        let mut logged_in = self.logged_in.lock().unwrap_or_else(PoisonError::into_inner);
        if *logged_in {
            return Ok(());
        }
        let Some(credentials) = &self.credentials else {
            return Ok(());
        };

        let body = serde_json::to_vec(&LoginRequest {
            username: &credentials.username,
            password: &credentials.password,
        })
        .map_err(|err| ServerError::Malformed(err.to_string()))?;
        let response = self
            .client
            .post(self.url("/api/login"))
            .header(CONTENT_TYPE, "application/json")
            .body(body)
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(ServerError::LoginRejected(status));
        }
        let reply: LoginReply = serde_json::from_str(&response.text()?)
            .map_err(|err| ServerError::Malformed(err.to_string()))?;
        tracing::info!(user = %credentials.username, user_id = reply.user_id, "logged in to game server");
        *logged_in = true;
        Ok(())
    }

    fn forget_login(&self) {
        *self.logged_in.lock().unwrap_or_else(PoisonError::into_inner) = false;
    }

    /// Send a request to a protected route. An expired session gets one
    /// fresh login and one resend.
    pub fn send(&self, build: impl Fn(&Client) -> RequestBuilder) -> Result<Response, ServerError> {
        self.ensure_login()?;
        let response = build(&self.client).send()?;
        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }
        if self.credentials.is_none() {
            return Err(ServerError::NoCredentials);
        }

        tracing::debug!("server session expired, logging in again");
        self.forget_login();
        self.ensure_login()?;
        Ok(build(&self.client).send()?)
    }
}

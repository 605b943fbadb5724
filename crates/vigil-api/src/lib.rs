// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use reqwest::StatusCode;
use reqwest::blocking::{Client as HttpClient, Response};
use serde::Deserialize;
use std::time::Duration;
use thiserror::Error;
use url::Url;

use vigil_app::{
    Category, CategoryFormInput, CategoryId, ContentId, ContentItem, ContentPage, ListQuery,
    Session, Stats,
};

/// Failure taxonomy for dashboard API calls: the request never completed,
/// the server answered with an error status, or the body did not decode.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("server.base_url must not be empty")]
    EmptyBaseUrl,

    #[error("invalid server.base_url {url:?}: {source}")]
    InvalidBaseUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("build HTTP client: {0}")]
    Build(#[source] reqwest::Error),

    #[error("cannot reach {base_url} -- check that the dashboard server is running ({source})")]
    Transport {
        base_url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("server error ({status}): {message}")]
    Status { status: u16, message: String },

    #[error("decode {what}: {source}")]
    Decode {
        what: &'static str,
        #[source]
        source: reqwest::Error,
    },
}

impl ApiError {
    pub const fn is_not_found(&self) -> bool {
        matches!(self, Self::Status { status: 404, .. })
    }

    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Status { status: 401 | 403, .. })
    }

    /// The message to surface inline (login errors, category CRUD
    /// failures): the server-supplied text for status failures, the full
    /// description otherwise.
    pub fn user_message(&self) -> String {
        match self {
            Self::Status { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(Debug, Clone)]
pub struct Client {
    base_url: String,
    timeout: Duration,
    http: HttpClient,
}

impl Client {
    pub fn new(base_url: &str, timeout: Duration) -> ApiResult<Self> {
        let base_url = base_url.trim_end_matches('/').to_owned();
        if base_url.is_empty() {
            return Err(ApiError::EmptyBaseUrl);
        }
        Url::parse(&base_url).map_err(|source| ApiError::InvalidBaseUrl {
            url: base_url.clone(),
            source,
        })?;

        // The session rides a server-set cookie, so the client keeps a
        // cookie store for the lifetime of the process.
        let http = HttpClient::builder()
            .timeout(timeout)
            .cookie_store(true)
            .build()
            .map_err(ApiError::Build)?;

        Ok(Self {
            base_url,
            timeout,
            http,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn login(&self, username: &str, password: &str) -> ApiResult<Session> {
        let response = self
            .http
            .post(format!("{}/api/auth/login", self.base_url))
            .json(&serde_json::json!({ "username": username, "password": password }))
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        let envelope: SessionEnvelope = response
            .json()
            .map_err(|source| ApiError::Decode {
                what: "login response",
                source,
            })?;
        Ok(envelope.into_session())
    }

    /// Validates the current session cookie. Any failure means the caller
    /// must treat the session as gone.
    pub fn session(&self) -> ApiResult<Session> {
        let response = self
            .http
            .get(format!("{}/api/auth/session", self.base_url))
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        let envelope: SessionEnvelope = response
            .json()
            .map_err(|source| ApiError::Decode {
                what: "session response",
                source,
            })?;
        Ok(envelope.into_session())
    }

    /// Ends the server-side session. Callers navigate to the login view
    /// regardless of the outcome, so the result is advisory.
    pub fn logout(&self) -> ApiResult<()> {
        let response = self
            .http
            .post(format!("{}/api/auth/logout", self.base_url))
            .send()
            .map_err(|error| self.transport_error(error))?;
        check_status(response)?;
        Ok(())
    }

    pub fn list_categories(&self) -> ApiResult<Vec<Category>> {
        let response = self
            .http
            .get(format!("{}/api/categories", self.base_url))
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        response.json().map_err(|source| ApiError::Decode {
            what: "category list",
            source,
        })
    }

    pub fn create_category(&self, input: &CategoryFormInput) -> ApiResult<Category> {
        let response = self
            .http
            .post(format!("{}/api/categories", self.base_url))
            .json(input)
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        response.json().map_err(|source| ApiError::Decode {
            what: "created category",
            source,
        })
    }

    pub fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryFormInput,
    ) -> ApiResult<Category> {
        let response = self
            .http
            .put(format!("{}/api/categories/{}", self.base_url, id))
            .json(input)
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        response.json().map_err(|source| ApiError::Decode {
            what: "updated category",
            source,
        })
    }

    pub fn delete_category(&self, id: &CategoryId) -> ApiResult<()> {
        let response = self
            .http
            .delete(format!("{}/api/categories/{}", self.base_url, id))
            .send()
            .map_err(|error| self.transport_error(error))?;
        check_status(response)?;
        Ok(())
    }

    pub fn list_contents(&self, query: &ListQuery) -> ApiResult<ContentPage> {
        let response = self
            .http
            .get(format!("{}/api/contents", self.base_url))
            .query(&query.to_params())
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        response.json().map_err(|source| ApiError::Decode {
            what: "content page",
            source,
        })
    }

    pub fn get_content(&self, id: &ContentId) -> ApiResult<ContentItem> {
        let response = self
            .http
            .get(format!("{}/api/contents/{}", self.base_url, id))
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        response.json().map_err(|source| ApiError::Decode {
            what: "content item",
            source,
        })
    }

    pub fn stats(&self) -> ApiResult<Stats> {
        let response = self
            .http
            .get(format!("{}/api/contents/stats", self.base_url))
            .send()
            .map_err(|error| self.transport_error(error))?;

        let response = check_status(response)?;
        response.json().map_err(|source| ApiError::Decode {
            what: "statistics",
            source,
        })
    }

    fn transport_error(&self, source: reqwest::Error) -> ApiError {
        ApiError::Transport {
            base_url: self.base_url.clone(),
            source,
        }
    }
}

fn check_status(response: Response) -> ApiResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().unwrap_or_default();
    Err(clean_error_response(status, &body))
}

/// Extracts a readable message from an error response: the JSON envelope's
/// `message`, a short plain-text body, or a generic fallback.
fn clean_error_response(status: StatusCode, body: &str) -> ApiError {
    if let Ok(parsed) = serde_json::from_str::<ErrorEnvelope>(body)
        && let Some(message) = parsed.message
        && !message.is_empty()
    {
        return ApiError::Status {
            status: status.as_u16(),
            message,
        };
    }

    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() < 100 && !trimmed.contains('{') {
        return ApiError::Status {
            status: status.as_u16(),
            message: trimmed.to_owned(),
        };
    }

    ApiError::Status {
        status: status.as_u16(),
        message: "request failed".to_owned(),
    }
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    message: Option<String>,
}

/// The session endpoint answers either `{user: {username, role}}` or a
/// flat `{username, role}`; the nested form wins when both appear.
#[derive(Debug, Deserialize)]
struct SessionEnvelope {
    user: Option<SessionUser>,
    username: Option<String>,
    role: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SessionUser {
    username: Option<String>,
    role: Option<String>,
}

impl SessionEnvelope {
    fn into_session(self) -> Session {
        let (nested_username, nested_role) = match self.user {
            Some(user) => (user.username, user.role),
            None => (None, None),
        };
        Session {
            username: nested_username.or(self.username).unwrap_or_default(),
            role: nested_role.or(self.role).unwrap_or_default(),
        }
    }
}

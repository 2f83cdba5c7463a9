//! Request core and domain operations of the API client.

use std::sync::Arc;

use reqwest::{Method, multipart};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::Url;

use taskdeck_model::auth::{AuthSuccess, Credentials, Registration};
use taskdeck_model::task::{Task, TaskDraft, TaskId, TaskPatch};
use taskdeck_model::team::{Team, TeamDraft, TeamId};
use taskdeck_model::user::{User, UserId};

use super::{ApiConfig, ApiError};
use crate::credentials::TokenStore;

/// User agent sent with every request.
const USER_AGENT: &str = concat!("taskdeck/", env!("CARGO_PKG_VERSION"));

/// Fallback error message when the server supplies none.
const GENERIC_FAILURE: &str = "API request failed";

/// Fixed filename and content type for photo uploads; the server only
/// cares about the `photo` multipart field.
const PHOTO_FILE_NAME: &str = "task-photo.jpg";
const PHOTO_MIME: &str = "image/jpeg";

/// Shorthand for calls that send no request body.
const NO_BODY: Option<&serde_json::Value> = None;

/// HTTP client for the task service.
///
/// Cheap to clone; the underlying connection pool and credential store
/// are shared. Reads the bearer token from the credential store on every
/// request, so a login or logout elsewhere takes effect immediately.
#[derive(Debug, Clone)]
pub struct ApiClient<S> {
    http: reqwest::Client,
    base_url: String,
    credentials: Arc<S>,
}

impl<S: TokenStore> ApiClient<S> {
    /// Builds a client for the given service.
    ///
    /// # Errors
    ///
    /// Returns [`ApiError::Transport`] if the underlying HTTP client
    /// cannot be constructed.
    pub fn new(config: &ApiConfig, credentials: Arc<S>) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(USER_AGENT)
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            credentials,
        })
    }

    /// Builds the absolute URL for an endpoint path.
    ///
    /// Paths are concatenated, not resolved: a base URL carrying a path
    /// prefix (`https://host/api`) keeps that prefix.
    fn endpoint(&self, path: &str) -> Result<Url, ApiError> {
        Ok(Url::parse(&format!("{}{}", self.base_url, path))?)
    }

    /// Sends a prepared request, attaching the given bearer token, and
    /// decodes the response.
    ///
    /// A non-success status becomes [`ApiError::Api`] with the message
    /// taken from the body's `message` field when one parses out. A
    /// success with an empty body decodes as `{}`.
    async fn execute<T: DeserializeOwned>(
        &self,
        builder: reqwest::RequestBuilder,
        token: Option<String>,
    ) -> Result<T, ApiError> {
        let builder = match token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        };
        let response = builder.send().await?;
        let status = response.status();
        let bytes = response.bytes().await?;

        if !status.is_success() {
            tracing::debug!(%status, "api request failed");
            return Err(ApiError::Api {
                status,
                message: error_message(&bytes),
            });
        }
        decode_body(&bytes)
    }

    /// Issues a JSON request with the token currently in the credential
    /// store (absence means an unauthenticated request, not a failure).
    async fn request<T, B>(
        &self,
        method: Method,
        path: &str,
        body: Option<&B>,
    ) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        let url = self.endpoint(path)?;
        let mut builder = self.http.request(method, url);
        if let Some(body) = body {
            builder = builder.json(body);
        }
        let token = self.credentials.load().await?;
        self.execute(builder, token).await
    }

    // -- Auth ---------------------------------------------------------

    /// `POST /auth/login`.
    pub async fn login(&self, credentials: &Credentials) -> Result<AuthSuccess, ApiError> {
        self.request(Method::POST, "/auth/login", Some(credentials))
            .await
    }

    /// `POST /auth/register`.
    pub async fn register(&self, registration: &Registration) -> Result<AuthSuccess, ApiError> {
        self.request(Method::POST, "/auth/register", Some(registration))
            .await
    }

    /// `GET /auth/me` with the stored token.
    pub async fn current_user(&self) -> Result<User, ApiError> {
        self.request(Method::GET, "/auth/me", NO_BODY).await
    }

    /// `GET /auth/me` with an explicit token, bypassing the credential
    /// store. Used during session restoration, where the candidate token
    /// has been read but not yet trusted.
    pub async fn current_user_with_token(&self, token: &str) -> Result<User, ApiError> {
        let url = self.endpoint("/auth/me")?;
        let builder = self.http.get(url);
        self.execute(builder, Some(token.to_string())).await
    }

    // -- Tasks --------------------------------------------------------

    /// `GET /tasks` with the given filters as query parameters.
    ///
    /// Filter names and values are passed through unmodified; the server
    /// decides what they mean.
    pub async fn list_tasks(&self, filters: &[(String, String)]) -> Result<Vec<Task>, ApiError> {
        let url = self.endpoint("/tasks")?;
        let builder = self.http.get(url).query(filters);
        let token = self.credentials.load().await?;
        self.execute(builder, token).await
    }

    /// `GET /tasks/{id}`.
    pub async fn get_task(&self, id: &TaskId) -> Result<Task, ApiError> {
        self.request(Method::GET, &format!("/tasks/{id}"), NO_BODY)
            .await
    }

    /// `POST /tasks`.
    pub async fn create_task(&self, draft: &TaskDraft) -> Result<Task, ApiError> {
        self.request(Method::POST, "/tasks", Some(draft)).await
    }

    /// `PUT /tasks/{id}`.
    pub async fn update_task(&self, id: &TaskId, patch: &TaskPatch) -> Result<Task, ApiError> {
        self.request(Method::PUT, &format!("/tasks/{id}"), Some(patch))
            .await
    }

    /// `DELETE /tasks/{id}`. The response body, if any, is discarded.
    pub async fn delete_task(&self, id: &TaskId) -> Result<(), ApiError> {
        let _: serde_json::Value = self
            .request(Method::DELETE, &format!("/tasks/{id}"), NO_BODY)
            .await?;
        Ok(())
    }

    /// `POST /tasks/{id}/assign`.
    pub async fn assign_task(&self, id: &TaskId, member: &UserId) -> Result<Task, ApiError> {
        let body = serde_json::json!({ "assigned_to": member });
        self.request(Method::POST, &format!("/tasks/{id}/assign"), Some(&body))
            .await
    }

    /// `POST /tasks/{id}/upload-photo` as a multipart form with the image
    /// bytes under the `photo` field. Fire-and-forget: no progress
    /// reporting, no resume.
    pub async fn upload_task_photo(&self, id: &TaskId, photo: Vec<u8>) -> Result<Task, ApiError> {
        let url = self.endpoint(&format!("/tasks/{id}/upload-photo"))?;
        let part = multipart::Part::bytes(photo)
            .file_name(PHOTO_FILE_NAME)
            .mime_str(PHOTO_MIME)?;
        let form = multipart::Form::new().part("photo", part);
        let builder = self.http.post(url).multipart(form);
        let token = self.credentials.load().await?;
        self.execute(builder, token).await
    }

    // -- Teams --------------------------------------------------------

    /// `GET /teams`.
    pub async fn list_teams(&self) -> Result<Vec<Team>, ApiError> {
        self.request(Method::GET, "/teams", NO_BODY).await
    }

    /// `POST /teams`.
    pub async fn create_team(&self, draft: &TeamDraft) -> Result<Team, ApiError> {
        self.request(Method::POST, "/teams", Some(draft)).await
    }

    /// `GET /teams/{id}/members`.
    pub async fn team_members(&self, id: &TeamId) -> Result<Vec<User>, ApiError> {
        self.request(Method::GET, &format!("/teams/{id}/members"), NO_BODY)
            .await
    }

    /// `POST /teams/{id}/members`, returning the updated team.
    pub async fn add_team_member(&self, id: &TeamId, user: &UserId) -> Result<Team, ApiError> {
        let body = serde_json::json!({ "user_id": user });
        self.request(Method::POST, &format!("/teams/{id}/members"), Some(&body))
            .await
    }

    // -- Notifications ------------------------------------------------

    /// `POST /notifications/send-email`. The acknowledgment body carries
    /// nothing the client uses.
    pub async fn send_email_notification(
        &self,
        task: &TaskId,
        recipient: &UserId,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "task_id": task, "recipient_id": recipient });
        let _: serde_json::Value = self
            .request(Method::POST, "/notifications/send-email", Some(&body))
            .await?;
        Ok(())
    }

    /// `POST /notifications/send-sms`.
    pub async fn send_sms_notification(
        &self,
        task: &TaskId,
        recipient: &UserId,
    ) -> Result<(), ApiError> {
        let body = serde_json::json!({ "task_id": task, "recipient_id": recipient });
        let _: serde_json::Value = self
            .request(Method::POST, "/notifications/send-sms", Some(&body))
            .await?;
        Ok(())
    }
}

/// Extracts the server's `message` field from an error body, falling back
/// to a generic description when the body is not JSON or has no message.
fn error_message(body: &[u8]) -> String {
    serde_json::from_slice::<serde_json::Value>(body)
        .ok()
        .and_then(|value| {
            value
                .get("message")
                .and_then(|m| m.as_str())
                .map(String::from)
        })
        .unwrap_or_else(|| GENERIC_FAILURE.to_string())
}

/// Decodes a success body, treating an empty body as `{}`.
fn decode_body<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, ApiError> {
    if bytes.is_empty() {
        Ok(serde_json::from_slice(b"{}")?)
    } else {
        Ok(serde_json::from_slice(bytes)?)
    }
}

use blog_api::{
    ChangePasswordRequest, ChangeUsernameRequest, CreatePostRequest, ErrorEnvelope, LoginRequest,
    LoginResponse, MessageResponse, PostResponse, UpdatePostRequest, UserResponse,
};
use reqwest::{Method, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::config::ClientConfig;

#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// The server answered with its error envelope.
    #[error("{} ({})", .envelope.message, .status)]
    Api { status: u16, envelope: ErrorEnvelope },
    #[error("Unexpected response ({status}): {body}")]
    Unexpected { status: u16, body: String },
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),
}

impl ClientError {
    /// Machine-readable code, when the server sent one.
    pub fn code(&self) -> Option<&str> {
        match self {
            Self::Api { envelope, .. } => Some(&envelope.code),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Api { status: 401, .. })
    }

    fn from_body(status: u16, body: String) -> Self {
        match serde_json::from_str::<ErrorEnvelope>(&body) {
            Ok(envelope) => Self::Api { status, envelope },
            Err(_) => Self::Unexpected { status, body },
        }
    }
}

/// Typed HTTP client for the blog API.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ApiClient {
    pub fn new(config: &ClientConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: config.api_url.clone(),
            token: None,
        }
    }

    /// Attaches `Authorization: Bearer <token>` to every following request.
    #[must_use]
    pub fn with_token(mut self, token: Option<String>) -> Self {
        self.token = token;
        self
    }

    // === Auth ===

    pub async fn login(&self, request: &LoginRequest) -> Result<LoginResponse, ClientError> {
        self.send(self.request(Method::POST, "/auth/login").json(request))
            .await
    }

    pub async fn logout(&self) -> Result<MessageResponse, ClientError> {
        self.send(self.request(Method::POST, "/auth/logout")).await
    }

    pub async fn me(&self) -> Result<UserResponse, ClientError> {
        self.send(self.request(Method::GET, "/auth/me")).await
    }

    pub async fn change_username(
        &self,
        request: &ChangeUsernameRequest,
    ) -> Result<UserResponse, ClientError> {
        self.send(self.request(Method::PATCH, "/auth/username").json(request))
            .await
    }

    pub async fn change_password(
        &self,
        request: &ChangePasswordRequest,
    ) -> Result<MessageResponse, ClientError> {
        self.send(
            self.request(Method::POST, "/auth/change-password")
                .json(request),
        )
        .await
    }

    // === Public posts ===

    /// Published posts; an empty category means all of them.
    pub async fn list_posts(&self, category: &str) -> Result<Vec<PostResponse>, ClientError> {
        self.send(with_category(self.request(Method::GET, "/posts"), category))
            .await
    }

    pub async fn categories(&self) -> Result<Vec<String>, ClientError> {
        self.send(self.request(Method::GET, "/posts/categories"))
            .await
    }

    pub async fn post_by_slug(&self, slug: &str) -> Result<PostResponse, ClientError> {
        self.send(self.request(Method::GET, &format!("/posts/{slug}")))
            .await
    }

    // === Admin posts ===

    pub async fn admin_posts(&self, category: &str) -> Result<Vec<PostResponse>, ClientError> {
        self.send(with_category(
            self.request(Method::GET, "/admin/posts"),
            category,
        ))
        .await
    }

    pub async fn admin_post(&self, id: Uuid) -> Result<PostResponse, ClientError> {
        self.send(self.request(Method::GET, &format!("/admin/posts/{id}")))
            .await
    }

    pub async fn create_post(
        &self,
        request: &CreatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        self.send(self.request(Method::POST, "/admin/posts").json(request))
            .await
    }

    pub async fn update_post(
        &self,
        id: Uuid,
        request: &UpdatePostRequest,
    ) -> Result<PostResponse, ClientError> {
        self.send(
            self.request(Method::PUT, &format!("/admin/posts/{id}"))
                .json(request),
        )
        .await
    }

    pub async fn delete_post(&self, id: Uuid) -> Result<(), ClientError> {
        let response = self
            .request(Method::DELETE, &format!("/admin/posts/{id}"))
            .send()
            .await?;
        check(response).await.map(|_| ())
    }

    // === Internals ===

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .http
            .request(method, format!("{}{path}", self.base_url));
        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ClientError> {
        let response = check(builder.send().await?).await?;
        Ok(response.json::<T>().await?)
    }
}

fn with_category(builder: RequestBuilder, category: &str) -> RequestBuilder {
    if category.is_empty() {
        builder
    } else {
        builder.query(&[("category", category)])
    }
}

async fn check(response: Response) -> Result<Response, ClientError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await?;
    tracing::debug!(%status, "API request failed");
    Err(ClientError::from_body(status.as_u16(), body))
}

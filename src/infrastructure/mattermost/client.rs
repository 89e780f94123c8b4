//! Mattermost API HTTP client.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Method, RequestBuilder, StatusCode, header};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{ErrorResponse, OpenGraphRequest, PostActionRequest};
use crate::domain::entities::{
    ChannelId, CustomEmoji, OpenGraphMetadata, PostId, PostList, UserId, UserProfile, UserStatus,
};
use crate::domain::errors::ApiError;
use crate::domain::ports::{ChatApiPort, PostActionResponse};

const API_PATH: &str = "/api/v4";
const USER_AGENT: &str = concat!("matterpost/", env!("CARGO_PKG_VERSION"));

/// Mattermost API client.
pub struct MattermostClient {
    client: Client,
    base_url: String,
    token: Option<String>,
}

impl MattermostClient {
    /// Creates client for the server at `server_url`.
    ///
    /// # Errors
    /// Returns error if the URL is empty or HTTP client creation fails.
    pub fn new(
        server_url: &str,
        token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, ApiError> {
        let server_url = server_url.trim().trim_end_matches('/');
        if server_url.is_empty() {
            return Err(ApiError::invalid_request("server URL is not configured"));
        }

        let client = Client::builder()
            .user_agent(USER_AGENT)
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::network(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: format!("{server_url}{API_PATH}"),
            token: token.filter(|t| !t.is_empty()),
        })
    }

    /// Base URL of the REST API.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        let builder = self
            .client
            .request(method, format!("{}{path}", self.base_url))
            .header("X-Requested-With", "XMLHttpRequest")
            .header(header::ACCEPT, "application/json");

        match &self.token {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> Result<T, ApiError> {
        let response = builder.send().await.map_err(|e| {
            warn!(error = %e, "Failed to reach Mattermost server");
            map_transport_error(&e)
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        response.json::<T>().await.map_err(|e| {
            warn!(error = %e, "Failed to parse response");
            ApiError::decode(e.to_string())
        })
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> ApiError {
        let message = match response.json::<ErrorResponse>().await {
            Ok(error) => {
                debug!(error_id = %error.id, "Server returned error");
                error.message
            }
            Err(_) => format!("HTTP {status}"),
        };

        error_for_status(status, message)
    }
}

fn map_transport_error(e: &reqwest::Error) -> ApiError {
    if e.is_timeout() {
        ApiError::network("request timed out")
    } else if e.is_connect() {
        ApiError::network("failed to connect to server")
    } else {
        ApiError::network(e.to_string())
    }
}

fn error_for_status(status: StatusCode, message: String) -> ApiError {
    match status {
        StatusCode::UNAUTHORIZED => ApiError::unauthorized(message),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited,
        StatusCode::SERVICE_UNAVAILABLE | StatusCode::GATEWAY_TIMEOUT => {
            ApiError::network("server is temporarily unavailable")
        }
        _ => ApiError::status(status.as_u16(), message),
    }
}

#[async_trait]
impl ChatApiPort for MattermostClient {
    async fn get_me(&self) -> Result<UserProfile, ApiError> {
        debug!("GET users/me");
        self.send(self.request(Method::GET, "/users/me")).await
    }

    async fn get_posts(
        &self,
        channel_id: &ChannelId,
        page: u32,
        per_page: u32,
    ) -> Result<PostList, ApiError> {
        debug!(channel_id = %channel_id, page, per_page, "GET posts");
        let builder = self
            .request(Method::GET, &format!("/channels/{channel_id}/posts"))
            .query(&[("page", page), ("per_page", per_page)]);
        self.send(builder).await
    }

    async fn get_posts_since(
        &self,
        channel_id: &ChannelId,
        since: i64,
    ) -> Result<PostList, ApiError> {
        debug!(channel_id = %channel_id, since, "GET posts since");
        let builder = self
            .request(Method::GET, &format!("/channels/{channel_id}/posts"))
            .query(&[("since", since)]);
        self.send(builder).await
    }

    async fn get_profiles_by_ids(&self, user_ids: &[UserId]) -> Result<Vec<UserProfile>, ApiError> {
        debug!(count = user_ids.len(), "POST users/ids");
        let builder = self.request(Method::POST, "/users/ids").json(user_ids);
        self.send(builder).await
    }

    async fn get_profiles_by_usernames(
        &self,
        usernames: &[String],
    ) -> Result<Vec<UserProfile>, ApiError> {
        debug!(count = usernames.len(), "POST users/usernames");
        let builder = self.request(Method::POST, "/users/usernames").json(usernames);
        self.send(builder).await
    }

    async fn get_statuses_by_ids(&self, user_ids: &[UserId]) -> Result<Vec<UserStatus>, ApiError> {
        debug!(count = user_ids.len(), "POST users/status/ids");
        let builder = self.request(Method::POST, "/users/status/ids").json(user_ids);
        self.send(builder).await
    }

    async fn get_custom_emojis_by_names(
        &self,
        names: &[String],
    ) -> Result<Vec<CustomEmoji>, ApiError> {
        debug!(count = names.len(), "POST emoji/names");
        let builder = self.request(Method::POST, "/emoji/names").json(names);
        self.send(builder).await
    }

    async fn get_open_graph_metadata(&self, url: &str) -> Result<OpenGraphMetadata, ApiError> {
        debug!(url = %url, "POST opengraph");
        let builder = self
            .request(Method::POST, "/opengraph")
            .json(&OpenGraphRequest { url });
        self.send(builder).await
    }

    async fn do_post_action(
        &self,
        post_id: &PostId,
        action_id: &str,
        selected_option: &str,
    ) -> Result<PostActionResponse, ApiError> {
        if action_id.is_empty() {
            return Err(ApiError::invalid_request("action id is empty"));
        }

        debug!(post_id = %post_id, action_id = %action_id, "POST post action");
        let builder = self
            .request(
                Method::POST,
                &format!("/posts/{post_id}/actions/{action_id}"),
            )
            .json(&PostActionRequest { selected_option });
        self.send(builder).await
    }
}

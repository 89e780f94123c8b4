use serde::{Deserialize, Serialize};

/// Error body returned by the server.
#[derive(Debug, Deserialize)]
pub struct ErrorResponse {
    /// Human readable error message.
    pub message: String,
    /// Server error id, e.g. `api.context.session_expired.app_error`.
    #[serde(default)]
    pub id: String,
}

/// Body of the Open Graph scrape request.
#[derive(Debug, Serialize)]
pub struct OpenGraphRequest<'a> {
    /// Link to scrape.
    pub url: &'a str,
}

/// Body of an interactive post action.
#[derive(Debug, Serialize)]
pub struct PostActionRequest<'a> {
    /// Value picked in a menu; empty for buttons.
    #[serde(skip_serializing_if = "str::is_empty")]
    pub selected_option: &'a str,
}

//! Mattermost REST API adapter.

mod client;
mod dto;

pub use client::MattermostClient;

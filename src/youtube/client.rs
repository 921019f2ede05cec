use super::wire::{
    ApiErrorResponse, ChannelListResponse, PlaylistItemListResponse, SearchListResponse,
    VideoListResponse,
};
use super::{ChannelLookup, SearchRequest, VideoPlatformApi};
use crate::config::ApiConfig;
use crate::error::{NicheError, Result};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::debug;
use url::Url;

const CHANNEL_PARTS: &str = "snippet,statistics,contentDetails";
const PLAYLIST_ITEM_PARTS: &str = "snippet,contentDetails";
const VIDEO_PARTS: &str = "snippet,statistics,contentDetails";

const QUOTA_REASONS: [&str; 4] = [
    "quotaExceeded",
    "rateLimitExceeded",
    "dailyLimitExceeded",
    "userRateLimitExceeded",
];

const CREDENTIAL_REASONS: [&str; 6] = [
    "keyInvalid",
    "forbidden",
    "keyExpired",
    "accessNotConfigured",
    "ipRefererBlocked",
    "API_KEY_INVALID",
];

/// HTTP client for the YouTube Data API v3.
///
/// Built once per process and passed to [`super::CatalogFetcher`]; every
/// request carries the caller's API key and a bounded timeout.
pub struct YouTubeClient {
    client: Client,
    base_url: String,
    api_key: String,
}

impl YouTubeClient {
    pub fn new(config: &ApiConfig) -> Result<Self> {
        let api_key = config
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                NicheError::InvalidCredential(
                    "no API key provided (use --api-key or YOUTUBE_API_KEY)".to_string(),
                )
            })?;

        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| NicheError::Config(format!("cannot build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key,
        })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        resource: &str,
        params: &[(&str, String)],
    ) -> Result<T> {
        let endpoint = format!("{}/{}", self.base_url, resource);
        let url = Url::parse_with_params(
            &endpoint,
            params
                .iter()
                .map(|(k, v)| (*k, v.as_str()))
                .chain(std::iter::once(("key", self.api_key.as_str()))),
        )
        .map_err(|e| NicheError::Config(format!("invalid API base URL {}: {}", endpoint, e)))?;

        debug!("GET {} {:?}", endpoint, params);

        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(classify_error(status, &text));
        }

        Ok(response.json::<T>().await?)
    }
}

/// Map a non-2xx response onto the error taxonomy
pub fn classify_error(status: StatusCode, body: &str) -> NicheError {
    let parsed = serde_json::from_str::<ApiErrorResponse>(body).ok();
    let reason = parsed
        .as_ref()
        .map(|r| r.error.reason().to_string())
        .unwrap_or_default();
    let message = parsed
        .as_ref()
        .map(|r| r.error.message.clone())
        .filter(|m| !m.is_empty())
        .unwrap_or_else(|| status.canonical_reason().unwrap_or("unknown error").to_string());

    if status == StatusCode::TOO_MANY_REQUESTS || QUOTA_REASONS.contains(&reason.as_str()) {
        return NicheError::QuotaExceeded(message);
    }

    if status == StatusCode::UNAUTHORIZED || CREDENTIAL_REASONS.contains(&reason.as_str()) {
        return NicheError::InvalidCredential(message);
    }

    if status.is_server_error() || parsed.is_none() {
        return NicheError::Transport(format!("HTTP {}: {}", status.as_u16(), message));
    }

    NicheError::Api {
        status: status.as_u16(),
        reason,
        message,
    }
}

#[async_trait]
impl VideoPlatformApi for YouTubeClient {
    async fn list_channels(&self, lookup: &ChannelLookup) -> Result<ChannelListResponse> {
        let mut params = vec![("part", CHANNEL_PARTS.to_string())];
        match lookup {
            ChannelLookup::Ids(ids) => {
                params.push(("id", ids.join(",")));
                params.push(("maxResults", ids.len().clamp(1, 50).to_string()));
            }
            ChannelLookup::Handle(handle) => {
                params.push(("forHandle", format!("@{}", handle.trim_start_matches('@'))));
            }
            ChannelLookup::Username(name) => params.push(("forUsername", name.clone())),
        }

        self.get_json("channels", &params).await
    }

    async fn list_playlist_items(
        &self,
        playlist_id: &str,
        page_token: Option<&str>,
        max_results: u32,
    ) -> Result<PlaylistItemListResponse> {
        let mut params = vec![
            ("part", PLAYLIST_ITEM_PARTS.to_string()),
            ("playlistId", playlist_id.to_string()),
            ("maxResults", max_results.to_string()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token.to_string()));
        }

        self.get_json("playlistItems", &params).await
    }

    async fn list_videos(&self, ids: &[String]) -> Result<VideoListResponse> {
        let params = [
            ("part", VIDEO_PARTS.to_string()),
            ("id", ids.join(",")),
            ("maxResults", ids.len().clamp(1, 50).to_string()),
        ];

        self.get_json("videos", &params).await
    }

    async fn search(&self, request: &SearchRequest) -> Result<SearchListResponse> {
        let mut params = vec![
            ("part", "snippet".to_string()),
            ("q", request.query.clone()),
            ("type", request.kind.as_str().to_string()),
            ("maxResults", request.max_results.to_string()),
        ];
        if let Some(token) = &request.page_token {
            params.push(("pageToken", token.clone()));
        }

        self.get_json("search", &params).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_api_key_is_credential_error() {
        let config = ApiConfig::default();
        assert!(matches!(
            YouTubeClient::new(&config),
            Err(NicheError::InvalidCredential(_))
        ));
    }

    #[test]
    fn test_classify_quota() {
        let body = r#"{"error":{"code":403,"message":"quota","errors":[{"reason":"quotaExceeded"}]}}"#;
        assert!(matches!(
            classify_error(StatusCode::FORBIDDEN, body),
            NicheError::QuotaExceeded(_)
        ));
        assert!(matches!(
            classify_error(StatusCode::TOO_MANY_REQUESTS, ""),
            NicheError::QuotaExceeded(_)
        ));
    }

    #[test]
    fn test_classify_bad_key() {
        let body = r#"{"error":{"code":400,"message":"API key not valid.","errors":[{"reason":"keyInvalid"}]}}"#;
        assert!(matches!(
            classify_error(StatusCode::BAD_REQUEST, body),
            NicheError::InvalidCredential(_)
        ));
    }

    #[test]
    fn test_classify_server_and_payload_errors() {
        assert!(matches!(
            classify_error(StatusCode::BAD_GATEWAY, "<html>"),
            NicheError::Transport(_)
        ));

        let body = r#"{"error":{"code":404,"message":"Playlist not found","errors":[{"reason":"playlistNotFound"}]}}"#;
        match classify_error(StatusCode::NOT_FOUND, body) {
            NicheError::Api { status, reason, .. } => {
                assert_eq!(status, 404);
                assert_eq!(reason, "playlistNotFound");
            }
            other => panic!("unexpected error: {:?}", other),
        }
    }
}

//! Integration tests for the YouTube client and the analysis pipeline,
//! run against a mock Data API server.

use niche_scout::config::{Config, ConfigBuilder};
use niche_scout::error::NicheError;
use niche_scout::pipeline::{AnalysisReport, NicheAnalyzer};
use niche_scout::youtube::{CatalogFetcher, YouTubeClient};
use serde_json::{json, Value};
use std::time::Duration;
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const API_KEY: &str = "test-key";

fn test_config(server: &MockServer, page_size: u32) -> Config {
    ConfigBuilder::new()
        .with_api_key(API_KEY.to_string())
        .with_base_url(server.uri())
        .with_page_size(page_size)
        .build()
}

fn create_fetcher(server: &MockServer, page_size: u32) -> CatalogFetcher {
    let config = test_config(server, page_size);
    let client = YouTubeClient::new(&config.api).expect("Failed to build client");
    CatalogFetcher::new(Box::new(client)).with_page_size(page_size)
}

fn create_fetcher_with_timeout(base_url: String, timeout_seconds: u64) -> CatalogFetcher {
    let config = ConfigBuilder::new()
        .with_api_key(API_KEY.to_string())
        .with_base_url(base_url)
        .with_timeout(timeout_seconds)
        .build();
    let client = YouTubeClient::new(&config.api).expect("Failed to build client");
    CatalogFetcher::new(Box::new(client))
}

fn create_analyzer(server: &MockServer) -> NicheAnalyzer {
    let config = test_config(server, 50);
    let client = YouTubeClient::new(&config.api).expect("Failed to build client");
    let fetcher = CatalogFetcher::new(Box::new(client)).with_page_size(config.api.page_size);
    NicheAnalyzer::new(fetcher, config)
}

fn channel_body() -> Value {
    json!({
        "items": [{
            "id": "UCfitnesslab0000000000000",
            "snippet": {"title": "Fitness Lab", "customUrl": "@fitnesslab"},
            "statistics": {
                "subscriberCount": "1000000",
                "viewCount": "42000000",
                "videoCount": "3",
                "hiddenSubscriberCount": false
            },
            "contentDetails": {"relatedPlaylists": {"uploads": "UUfitnesslab"}}
        }]
    })
}

fn playlist_item(id: &str) -> Value {
    json!({
        "snippet": {"title": format!("Upload {}", id), "resourceId": {"videoId": id}},
        "contentDetails": {"videoId": id, "videoPublishedAt": "2024-03-01T12:00:00Z"}
    })
}

fn video(id: &str, views: u64, likes: u64, comments: u64, tags: &[&str]) -> Value {
    json!({
        "id": id,
        "snippet": {"title": format!("Video {}", id), "tags": tags},
        "statistics": {
            "viewCount": views.to_string(),
            "likeCount": likes.to_string(),
            "commentCount": comments.to_string()
        },
        "contentDetails": {"duration": "PT12M30S"}
    })
}

fn error_body(code: u16, reason: &str, message: &str) -> Value {
    json!({
        "error": {
            "code": code,
            "message": message,
            "errors": [{"reason": reason, "domain": "youtube", "message": message}]
        }
    })
}

#[tokio::test]
async fn test_channel_analysis_follows_pagination() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .and(query_param("key", API_KEY))
        .respond_with(ResponseTemplate::new(200).set_body_json(channel_body()))
        .expect(2)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [playlist_item("c")]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("playlistId", "UUfitnesslab"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [playlist_item("a"), playlist_item("b")],
            "nextPageToken": "page-2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .and(query_param("id", "a,b,c"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                video("a", 90_000, 1_800, 200, &["fitness", "workout"]),
                video("b", 30_000, 600, 60, &["Fitness"]),
                video("c", 12_000, 240, 30, &["diet"])
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let analyzer = create_analyzer(&server);
    let report = analyzer
        .analyze_input("https://www.youtube.com/@fitnesslab", None)
        .await
        .expect("Analysis failed");

    let AnalysisReport::Channel(report) = report else {
        panic!("expected a channel report");
    };

    assert_eq!(report.channel.title, "Fitness Lab");
    assert_eq!(report.metrics.record_count, 3);
    assert_eq!(report.metrics.total_views, 132_000);
    assert_eq!(report.metrics.max_views, 90_000);
    assert!((report.metrics.avg_duration_seconds - 750.0).abs() < 1e-9);
    assert_eq!(report.metrics.top_tags[0].tag, "fitness");
    assert_eq!(report.metrics.top_tags[0].count, 2);

    let ids: Vec<_> = report.metrics.top_videos.iter().map(|v| v.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b", "c"]);
}

#[tokio::test]
async fn test_statistics_are_fetched_in_batches() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/videos"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"items": []})))
        .expect(3)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(&server, 2);
    let ids: Vec<String> = ["v1", "v2", "v3", "v4", "v5", "v1"].iter().map(|s| s.to_string()).collect();

    let stats = fetcher.fetch_item_statistics(&ids).await.expect("Fetch failed");
    assert!(stats.is_empty());
}

#[tokio::test]
async fn test_quota_error_is_reported_as_quota() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(403).set_body_json(error_body(
            403,
            "quotaExceeded",
            "The request cannot be completed because you have exceeded your quota.",
        )))
        .mount(&server)
        .await;

    let analyzer = create_analyzer(&server);
    let result = analyzer.analyze_search("home workouts", 25).await;

    let err = result.expect_err("quota error should propagate");
    assert!(matches!(err, NicheError::QuotaExceeded(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_invalid_key_is_credential_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(400).set_body_json(error_body(
            400,
            "keyInvalid",
            "API key not valid. Please pass a valid API key.",
        )))
        .mount(&server)
        .await;

    let fetcher = create_fetcher(&server, 50);
    let result = fetcher.fetch_channel_summary("UCfitnesslab0000000000000").await;

    assert!(matches!(result, Err(NicheError::InvalidCredential(_))));
}

#[tokio::test]
async fn test_server_error_is_transport_error() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(503).set_body_string("Service Unavailable"))
        .mount(&server)
        .await;

    let fetcher = create_fetcher(&server, 50);
    let result = fetcher.fetch_playlist_listing("UUfitnesslab", 10).await;

    assert!(matches!(result, Err(NicheError::Transport(_))));
}

#[tokio::test]
async fn test_error_payload_on_later_page_keeps_partial_listing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .and(query_param("pageToken", "page-2"))
        .respond_with(ResponseTemplate::new(404).set_body_json(error_body(
            404,
            "playlistNotFound",
            "The playlist identified with the request's playlistId parameter cannot be found.",
        )))
        .with_priority(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/playlistItems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [playlist_item("a"), playlist_item("b")],
            "nextPageToken": "page-2"
        })))
        .mount(&server)
        .await;

    let fetcher = create_fetcher(&server, 50);
    let listing = fetcher
        .fetch_playlist_listing("UUfitnesslab", 10)
        .await
        .expect("Error payloads should degrade");

    let ids: Vec<_> = listing.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["a", "b"]);
}

#[tokio::test]
async fn test_channel_discovery_keeps_search_order() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("type", "channel"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": {"kind": "youtube#channel", "channelId": "UCsecond"}, "snippet": {"title": "Second"}},
                {"id": {"kind": "youtube#channel", "channelId": "UCfirst"}, "snippet": {"title": "First"}}
            ]
        })))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": "UCfirst", "snippet": {"title": "First"}, "statistics": {"subscriberCount": "10"}},
                {"id": "UCsecond", "snippet": {"title": "Second"}, "statistics": {"subscriberCount": "20"}}
            ]
        })))
        .mount(&server)
        .await;

    let analyzer = create_analyzer(&server);
    let report = analyzer
        .discover_channels("calisthenics", 5)
        .await
        .expect("Discovery failed");

    let ids: Vec<_> = report.channels.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["UCsecond", "UCfirst"]);
    assert_eq!(report.channels[0].subscriber_count, 20);
}

#[tokio::test]
async fn test_empty_search_page_with_token_keeps_paging() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .and(query_param("pageToken", "p2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [
                {"id": {"kind": "youtube#video", "videoId": "vid1"}, "snippet": {"title": "Fitness basics"}}
            ]
        })))
        .with_priority(1)
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "items": [],
            "nextPageToken": "p2"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let fetcher = create_fetcher(&server, 50);
    let items = fetcher
        .search_video_ids("fitness", 10)
        .await
        .expect("Search failed");

    let ids: Vec<_> = items.iter().map(|item| item.id.as_str()).collect();
    assert_eq!(ids, vec!["vid1"]);
}

#[tokio::test]
async fn test_slow_response_is_transport_timeout() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/channels"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(channel_body())
                .set_delay(Duration::from_secs(3)),
        )
        .mount(&server)
        .await;

    let fetcher = create_fetcher_with_timeout(server.uri(), 1);
    let err = fetcher
        .fetch_channel_summary("UCfitnesslab0000000000000")
        .await
        .expect_err("request should time out");

    assert!(matches!(err, NicheError::Transport(_)));
    assert!(err.is_retryable());
}

#[tokio::test]
async fn test_closed_port_is_transport_error() {
    let port = {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("Failed to bind port");
        listener.local_addr().expect("No local address").port()
    };

    let fetcher = create_fetcher_with_timeout(format!("http://127.0.0.1:{}", port), 5);
    let err = fetcher
        .fetch_channel_summary("UCfitnesslab0000000000000")
        .await
        .expect_err("connection should be refused");

    assert!(matches!(err, NicheError::Transport(_)));
    assert!(err.is_retryable());
}

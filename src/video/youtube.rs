use crate::config::VideoConfig;
use crate::error::GroceryError;
use crate::model::VideoInfo;
use log::{debug, info};
use reqwest::Client;
use scraper::{Html, Selector};
use serde::Deserialize;
use std::time::Duration;

const DEFAULT_API_BASE_URL: &str = "https://www.googleapis.com/youtube/v3";
const DEFAULT_TRANSCRIPT_BASE_URL: &str = "https://www.youtube.com";

/// YouTube Data API search plus timed-text transcript download
pub struct YouTubeClient {
    client: Client,
    api_key: String,
    api_base_url: String,
    transcript_base_url: String,
    max_results: u32,
}

impl YouTubeClient {
    /// Create a client from configuration.
    ///
    /// Returns `Ok(None)` when video lookup is disabled or no API key is available.
    pub fn new(config: &VideoConfig, timeout: Duration) -> Result<Option<Self>, GroceryError> {
        Self::with_api_key(config, config.resolved_api_key(), timeout)
    }

    fn with_api_key(
        config: &VideoConfig,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Option<Self>, GroceryError> {
        if !config.enabled {
            debug!("Video lookup disabled in configuration");
            return Ok(None);
        }

        let Some(api_key) = api_key else {
            info!("YOUTUBE_API_KEY not set; video recipe data disabled");
            return Ok(None);
        };

        let client = Client::builder()
            .timeout(timeout)
            .user_agent("Mozilla/5.0 (compatible; GroceryListBot/1.0)")
            .build()?;

        Ok(Some(YouTubeClient {
            client,
            api_key,
            api_base_url: config
                .api_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_API_BASE_URL.to_string()),
            transcript_base_url: config
                .transcript_base_url
                .clone()
                .unwrap_or_else(|| DEFAULT_TRANSCRIPT_BASE_URL.to_string()),
            max_results: config.max_results,
        }))
    }

    #[doc(hidden)]
    pub fn with_base_urls(api_key: String, api_base_url: String, transcript_base_url: String) -> Self {
        YouTubeClient {
            client: Client::new(),
            api_key,
            api_base_url,
            transcript_base_url,
            max_results: 5,
        }
    }

    /// Search for cooking tutorials matching a dish
    pub async fn search_recipe_videos(&self, dish: &str) -> Result<Vec<VideoInfo>, GroceryError> {
        let query = format!("{} recipe cooking", dish);
        let max_results = self.max_results.to_string();

        let response = self
            .client
            .get(format!("{}/search", self.api_base_url))
            .query(&[
                ("part", "snippet"),
                ("q", query.as_str()),
                ("type", "video"),
                ("maxResults", max_results.as_str()),
                ("videoDuration", "medium"),
                ("order", "relevance"),
                ("key", self.api_key.as_str()),
            ])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GroceryError::VideoError(format!(
                "YouTube search failed with status: {}",
                response.status()
            )));
        }

        let body: SearchResponse = response.json().await?;
        let videos: Vec<VideoInfo> = body
            .items
            .into_iter()
            .filter_map(SearchItem::into_video)
            .collect();

        debug!("Found {} videos for '{}'", videos.len(), dish);
        Ok(videos)
    }

    /// Download the English transcript of a video, `None` when it has none
    pub async fn transcript(&self, video_id: &str) -> Result<Option<String>, GroceryError> {
        let response = self
            .client
            .get(format!("{}/api/timedtext", self.transcript_base_url))
            .query(&[("lang", "en"), ("v", video_id)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(GroceryError::VideoError(format!(
                "Transcript request for {} failed with status: {}",
                video_id,
                response.status()
            )));
        }

        let body = response.text().await?;
        let text = parse_timed_text(&body)?;
        Ok(if text.is_empty() { None } else { Some(text) })
    }
}

/// Extract caption text from a timed-text XML document, one segment per line
pub fn parse_timed_text(xml: &str) -> Result<String, GroceryError> {
    let document = Html::parse_fragment(xml);
    let selector = Selector::parse("text")
        .map_err(|e| GroceryError::VideoError(format!("Invalid selector: {:?}", e)))?;

    let lines: Vec<String> = document
        .select(&selector)
        .map(|el| el.text().collect::<String>())
        // Captions are entity-encoded twice; the parser removes one layer
        .map(|text| html_escape::decode_html_entities(&text).into_owned())
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|text| !text.is_empty())
        .collect();

    Ok(lines.join("\n"))
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchId,
    snippet: Snippet,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchId {
    video_id: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Snippet {
    #[serde(default)]
    title: String,
    #[serde(default)]
    description: String,
    #[serde(default)]
    channel_title: String,
    #[serde(default)]
    thumbnails: Thumbnails,
}

#[derive(Debug, Deserialize, Default)]
struct Thumbnails {
    high: Option<Thumbnail>,
    default: Option<Thumbnail>,
}

#[derive(Debug, Deserialize)]
struct Thumbnail {
    url: String,
}

impl SearchItem {
    fn into_video(self) -> Option<VideoInfo> {
        let video_id = self.id.video_id?;
        let thumbnail_url = self
            .snippet
            .thumbnails
            .high
            .or(self.snippet.thumbnails.default)
            .map(|t| t.url);

        Some(VideoInfo {
            url: VideoInfo::watch_url(&video_id),
            title: html_escape::decode_html_entities(&self.snippet.title).into_owned(),
            channel: html_escape::decode_html_entities(&self.snippet.channel_title).into_owned(),
            description: self.snippet.description,
            thumbnail_url,
            video_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockito::{Matcher, Server};

    const SEARCH_BODY: &str = r#"{
        "items": [
            {
                "id": {"kind": "youtube#video", "videoId": "abc123"},
                "snippet": {
                    "title": "Fluffy Pancakes &amp; Syrup",
                    "description": "Easy breakfast",
                    "channelTitle": "Chef&#39;s Table",
                    "thumbnails": {"high": {"url": "https://i.ytimg.com/vi/abc123/hq.jpg"}}
                }
            },
            {
                "id": {"kind": "youtube#channel", "channelId": "UC123"},
                "snippet": {"title": "A channel"}
            }
        ]
    }"#;

    #[tokio::test]
    async fn test_search_recipe_videos() {
        let mut server = Server::new_async().await;
        let mock = server
            .mock("GET", "/search")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("q".into(), "Pancakes recipe cooking".into()),
                Matcher::UrlEncoded("type".into(), "video".into()),
                Matcher::UrlEncoded("key".into(), "yt-key".into()),
            ]))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body(SEARCH_BODY)
            .create_async()
            .await;

        let client =
            YouTubeClient::with_base_urls("yt-key".to_string(), server.url(), server.url());
        let videos = client.search_recipe_videos("Pancakes").await.unwrap();

        assert_eq!(videos.len(), 1);
        assert_eq!(videos[0].video_id, "abc123");
        assert_eq!(videos[0].title, "Fluffy Pancakes & Syrup");
        assert_eq!(videos[0].channel, "Chef's Table");
        assert_eq!(videos[0].url, "https://www.youtube.com/watch?v=abc123");
        mock.assert_async().await;
    }

    #[tokio::test]
    async fn test_search_error_status() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/search")
            .match_query(Matcher::Any)
            .with_status(403)
            .with_body(r#"{"error": {"message": "quota exceeded"}}"#)
            .create_async()
            .await;

        let client =
            YouTubeClient::with_base_urls("yt-key".to_string(), server.url(), server.url());
        let err = client.search_recipe_videos("Pancakes").await.unwrap_err();
        assert!(err.to_string().contains("403"));
    }

    #[tokio::test]
    async fn test_transcript_download() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/timedtext")
            .match_query(Matcher::UrlEncoded("v".into(), "abc123".into()))
            .with_status(200)
            .with_header("content-type", "text/xml")
            .with_body(
                r#"<?xml version="1.0" encoding="utf-8" ?><transcript><text start="0.5" dur="2.1">first add 2 cups of flour</text><text start="2.6" dur="1.9">it&amp;#39;s that easy</text></transcript>"#,
            )
            .create_async()
            .await;

        let client =
            YouTubeClient::with_base_urls("yt-key".to_string(), server.url(), server.url());
        let transcript = client.transcript("abc123").await.unwrap().unwrap();
        assert_eq!(transcript, "first add 2 cups of flour\nit's that easy");
    }

    #[tokio::test]
    async fn test_empty_transcript_is_none() {
        let mut server = Server::new_async().await;
        let _mock = server
            .mock("GET", "/api/timedtext")
            .match_query(Matcher::Any)
            .with_status(200)
            .with_body("")
            .create_async()
            .await;

        let client =
            YouTubeClient::with_base_urls("yt-key".to_string(), server.url(), server.url());
        assert!(client.transcript("novideo").await.unwrap().is_none());
    }

    #[test]
    fn test_new_without_key_is_disabled() {
        let config = VideoConfig::default();
        assert!(YouTubeClient::with_api_key(&config, None, Duration::from_secs(5))
            .unwrap()
            .is_none());

        let client = YouTubeClient::with_api_key(
            &config,
            config.api_key_or(Some("yt-env".to_string())),
            Duration::from_secs(5),
        )
        .unwrap()
        .unwrap();
        assert_eq!(client.api_key, "yt-env");
    }

    #[test]
    fn test_new_respects_enabled_flag() {
        let config = VideoConfig {
            enabled: false,
            api_key: Some("yt-key".to_string()),
            ..VideoConfig::default()
        };
        assert!(YouTubeClient::new(&config, Duration::from_secs(5))
            .unwrap()
            .is_none());

        let config = VideoConfig {
            api_key: Some("yt-key".to_string()),
            max_results: 2,
            ..VideoConfig::default()
        };
        let client = YouTubeClient::new(&config, Duration::from_secs(5))
            .unwrap()
            .unwrap();
        assert_eq!(client.max_results, 2);
    }
}

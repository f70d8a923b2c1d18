//! YouTube video metadata
//!
//! Video ids are resolved locally from whatever the caller pasted; title
//! comes from oEmbed, duration and search from the Data API v3.

use std::sync::{Arc, OnceLock};

use regex::Regex;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::config::YoutubeConfig;
use crate::error::{ApiaryError, Result};
use crate::transport::{url_with_params, HttpTransport};

const WATCH_URL: &str = "https://www.youtube.com/watch";

fn id_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[\w-]{11}$").expect("video id pattern is valid"))
}

fn duration_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r"^P(?:(\d+)D)?(?:T(?:(\d+)H)?(?:(\d+)M)?(?:(\d+)S)?)?$")
            .expect("duration pattern is valid")
    })
}

/// Video length split into clock units
///
/// `stream` is set when every unit is zero, which is how the API reports
/// live broadcasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoDuration {
    pub hours: u64,
    pub minutes: u64,
    pub seconds: u64,
    pub stream: bool,
}

impl VideoDuration {
    /// Build from units, deriving `stream`
    pub fn new(hours: u64, minutes: u64, seconds: u64) -> Self {
        Self {
            hours,
            minutes,
            seconds,
            stream: hours == 0 && minutes == 0 && seconds == 0,
        }
    }

    /// Parse an ISO-8601 duration such as `PT1H2M3S`
    ///
    /// Days are folded into hours.
    ///
    /// # Errors
    ///
    /// Returns [`ApiaryError::MalformedResponse`] for anything that is not an
    /// ISO-8601 duration.
    pub fn parse_iso8601(raw: &str) -> Result<Self> {
        let caps = duration_pattern()
            .captures(raw.trim())
            .ok_or_else(|| ApiaryError::MalformedResponse(format!("bad duration: {}", raw)))?;

        let unit = |idx: usize| -> Result<u64> {
            match caps.get(idx) {
                Some(m) => m.as_str().parse::<u64>().map_err(|e| {
                    ApiaryError::MalformedResponse(format!("bad duration {}: {}", raw, e)).into()
                }),
                None => Ok(0),
            }
        };

        let (days, hours) = (unit(1)?, unit(2)?);
        let hours = days
            .checked_mul(24)
            .and_then(|h| h.checked_add(hours))
            .ok_or_else(|| ApiaryError::MalformedResponse(format!("duration overflows: {}", raw)))?;
        Ok(Self::new(hours, unit(3)?, unit(4)?))
    }

    /// Total length in seconds, saturating at `u64::MAX`
    pub fn total_seconds(&self) -> u64 {
        self.hours
            .saturating_mul(3600)
            .saturating_add(self.minutes.saturating_mul(60))
            .saturating_add(self.seconds)
    }
}

/// Everything the `/youtube` endpoint reports about one video
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VideoInfo {
    pub id: String,
    pub thumbnail: String,
    pub title: String,
    pub time: VideoDuration,
}

#[derive(Debug, Deserialize)]
struct OembedResponse {
    title: String,
}

#[derive(Debug, Deserialize)]
struct VideosResponse {
    #[serde(default)]
    items: Vec<VideoItem>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct VideoItem {
    content_details: ContentDetails,
}

#[derive(Debug, Deserialize)]
struct ContentDetails {
    duration: String,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    items: Vec<SearchItem>,
}

#[derive(Debug, Deserialize)]
struct SearchItem {
    id: SearchItemId,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SearchItemId {
    video_id: Option<String>,
}

/// Extract an 11-character video id
///
/// Accepts a bare id, a `youtube.com/watch?v=<id>` URL or a
/// `youtu.be/<id>` URL, with or without scheme.
///
/// # Errors
///
/// Returns [`ApiaryError::InvalidInput`] when no id can be found.
///
/// # Examples
///
/// ```
/// use apiary::services::youtube::video_id;
///
/// assert_eq!(video_id("youtu.be/dQw4w9WgXcQ").unwrap(), "dQw4w9WgXcQ");
/// ```
pub fn video_id(input: &str) -> Result<String> {
    let input = input.trim();
    if id_pattern().is_match(input) {
        return Ok(input.to_string());
    }

    let absolute = if input.contains("://") {
        input.to_string()
    } else {
        format!("http://{}", input.trim_start_matches('/'))
    };

    let candidate = Url::parse(&absolute).ok().and_then(|url| {
        match url.host_str()? {
            "youtube.com" | "www.youtube.com" => url
                .query_pairs()
                .find(|(k, _)| k == "v")
                .map(|(_, v)| v.into_owned()),
            "youtu.be" | "www.youtu.be" => url
                .path_segments()
                .and_then(|mut segments| segments.next_back().map(str::to_string)),
            _ => None,
        }
    });

    match candidate {
        Some(id) if id_pattern().is_match(&id) => Ok(id),
        _ => Err(ApiaryError::InvalidInput(format!(
            "Need 11 character video id or the URL of the video. Got {}",
            input
        ))
        .into()),
    }
}

/// Client for the YouTube endpoints
#[derive(Debug, Clone)]
pub struct YoutubeClient {
    transport: Arc<dyn HttpTransport>,
    config: YoutubeConfig,
}

impl YoutubeClient {
    /// Create a client from configuration
    pub fn new(config: &YoutubeConfig, transport: Arc<dyn HttpTransport>) -> Self {
        Self {
            transport,
            config: config.clone(),
        }
    }

    /// Max-resolution thumbnail URL for an id
    pub fn thumbnail(&self, id: &str) -> String {
        self.config.thumbnail_url.replace("{id}", id)
    }

    /// Video title via oEmbed
    pub async fn title(&self, id: &str) -> Result<String> {
        let watch = url_with_params(WATCH_URL, &[("v", id)])?;
        let url = url_with_params(
            &self.config.oembed_url,
            &[("url", watch.as_str()), ("format", "json")],
        )?;

        let response = self
            .transport
            .get(&url, &[])
            .await?
            .error_for_status("youtube oembed")?;
        let oembed: OembedResponse = response.json()?;
        Ok(oembed.title)
    }

    /// Video length from the Data API
    pub async fn duration(&self, id: &str) -> Result<VideoDuration> {
        let url = url_with_params(
            &self.config.videos_url,
            &[
                ("id", id),
                ("key", self.config.api_key.as_str()),
                ("part", "contentDetails"),
            ],
        )?;

        let response = self
            .transport
            .get(&url, &[])
            .await?
            .error_for_status("youtube videos")?;
        let videos: VideosResponse = response.json()?;
        let item = videos
            .items
            .into_iter()
            .next()
            .ok_or_else(|| ApiaryError::NotFound(format!("no video with id {}", id)))?;

        VideoDuration::parse_iso8601(&item.content_details.duration)
    }

    /// Id of the first search hit for `query`
    pub async fn search_first(&self, query: &str) -> Result<String> {
        let url = url_with_params(
            &self.config.search_url,
            &[
                ("key", self.config.api_key.as_str()),
                ("q", query),
                ("maxResults", "1"),
                ("part", "snippet"),
                ("type", "video"),
            ],
        )?;

        let response = self
            .transport
            .get(&url, &[])
            .await?
            .error_for_status("youtube search")?;
        let results: SearchResponse = response.json()?;

        results
            .items
            .into_iter()
            .find_map(|item| item.id.video_id)
            .ok_or_else(|| ApiaryError::NotFound(format!("no videos match {}", query)).into())
    }

    /// Full info for a URL/id, or for the first search hit when `search`
    pub async fn info(&self, query: &str, search: bool) -> Result<VideoInfo> {
        let id = if search {
            self.search_first(query).await?
        } else {
            video_id(query)?
        };
        tracing::debug!("Fetching info for video {}", id);

        let (title, time) = futures::try_join!(self.title(&id), self.duration(&id))?;

        Ok(VideoInfo {
            thumbnail: self.thumbnail(&id),
            id,
            title,
            time,
        })
    }
}

//! NetEase Cloud Music lyrics client
//!
//! Two unauthenticated endpoints are enough: the web search to turn a title and
//! artist into a song id, and the lyric endpoint for that id.

use crate::config::LyricsConfig;
use anyhow::Context;
use reqwest::header::{HeaderMap, HeaderValue, ORIGIN, REFERER, USER_AGENT};
use serde::Deserialize;

#[derive(Debug, Deserialize, Default)]
struct SearchResponse {
    #[serde(default)]
    result: Option<SearchResult>,
}

#[derive(Debug, Deserialize, Default)]
struct SearchResult {
    #[serde(default)]
    songs: Vec<SearchSong>,
}

#[derive(Debug, Deserialize)]
struct SearchSong {
    id: u64,
}

#[derive(Debug, Deserialize, Default)]
struct LyricResponse {
    #[serde(default)]
    lrc: Option<LyricBody>,
    #[serde(default)]
    tlyric: Option<LyricBody>,
}

#[derive(Debug, Deserialize, Default)]
struct LyricBody {
    #[serde(default)]
    lyric: Option<String>,
}

/// NetEase API client
#[derive(Debug, Clone)]
pub struct NeteaseClient {
    client: reqwest::Client,
    search_url: String,
    lyric_url: String,
}

impl NeteaseClient {
    const USER_AGENT: &'static str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

    pub fn new(cfg: &LyricsConfig) -> anyhow::Result<Self> {
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static(Self::USER_AGENT));
        headers.insert(REFERER, HeaderValue::from_static("https://music.163.com/"));
        headers.insert(ORIGIN, HeaderValue::from_static("https://music.163.com"));

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if cfg.timeout_secs > 0 {
            builder = builder.timeout(std::time::Duration::from_secs(cfg.timeout_secs));
        }

        Ok(Self {
            client: builder.build().context("build reqwest client")?,
            search_url: cfg.search_url.clone(),
            lyric_url: cfg.lyric_url.clone(),
        })
    }

    /// Look up the id of the first song matching `title` and `artist`.
    pub async fn search_song(&self, title: &str, artist: &str) -> anyhow::Result<Option<u64>> {
        let query = format!("{} {}", title, artist);
        let url = format!(
            "{}?s={}&type=1&limit=1",
            self.search_url,
            urlencoding::encode(query.trim())
        );
        tracing::debug!(%url, "searching song");

        let response = self.client.get(&url).send().await.context("send search")?;
        if !response.status().is_success() {
            anyhow::bail!("NetEase search error: {}", response.status());
        }

        let body = response.text().await.context("read search body")?;
        Ok(first_song_id(&body))
    }

    /// Fetch the raw LRC payload for a song id.
    pub async fn get_lyric(&self, song_id: u64) -> anyhow::Result<Option<String>> {
        let url = format!("{}?id={}&lv=1&kv=1&tv=-1", self.lyric_url, song_id);
        tracing::debug!(%url, "fetching lyric");

        let response = self.client.get(&url).send().await.context("send lyric request")?;
        if !response.status().is_success() {
            anyhow::bail!("NetEase lyric error: {}", response.status());
        }

        let body = response.text().await.context("read lyric body")?;
        let parsed: LyricResponse =
            serde_json::from_str(&body).context("decode lyric response")?;
        Ok(pick_lyric(parsed))
    }
}

/// First search hit. An empty or malformed body is a miss, not an error.
fn first_song_id(body: &str) -> Option<u64> {
    let parsed: SearchResponse = match serde_json::from_str(body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(error = %e, "malformed search response");
            return None;
        }
    };
    parsed.result?.songs.first().map(|s| s.id)
}

/// Original lyrics first, the translated variant if that is all there is.
fn pick_lyric(resp: LyricResponse) -> Option<String> {
    let non_empty = |body: Option<LyricBody>| body.and_then(|b| b.lyric).filter(|l| !l.trim().is_empty());
    non_empty(resp.lrc).or_else(|| non_empty(resp.tlyric))
}

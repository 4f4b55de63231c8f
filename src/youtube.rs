use log::debug;
use regex::Regex;
use reqwest::StatusCode;
use serde::Deserialize;

use crate::Segment;
use crate::error::{RetrievalError, RetrievalResult};

const USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// One language variant of a video's captions
#[derive(Debug, Clone, PartialEq)]
pub struct Track {
    pub video_id: String,
    pub language_code: String,
    /// Human readable name, e.g. "Spanish (auto-generated)"
    pub language: String,
    pub is_generated: bool,
    pub base_url: String,
}

/// Every caption track a video offers, split by how it was produced.
///
/// Tracks keep the order the service listed them in.
#[derive(Debug, Clone, Default)]
pub struct TranscriptCatalog {
    pub video_id: String,
    pub manually_created: Vec<Track>,
    pub generated: Vec<Track>,
}

impl TranscriptCatalog {
    pub fn new(video_id: &str, tracks: Vec<Track>) -> Self {
        let (generated, manually_created): (Vec<Track>, Vec<Track>) = tracks.into_iter().partition(|t| t.is_generated);
        Self {
            video_id: video_id.to_string(),
            manually_created,
            generated,
        }
    }

    /// First track matching any of `codes`, in priority order, preferring manual tracks
    pub fn find_transcript(&self, codes: &[&str]) -> Option<&Track> {
        codes.iter().find_map(|code| {
            find_in(&self.manually_created, code).or_else(|| find_in(&self.generated, code))
        })
    }

    pub fn find_manually_created(&self, codes: &[&str]) -> Option<&Track> {
        codes.iter().find_map(|code| find_in(&self.manually_created, code))
    }

    pub fn find_generated(&self, codes: &[&str]) -> Option<&Track> {
        codes.iter().find_map(|code| find_in(&self.generated, code))
    }

    pub fn is_empty(&self) -> bool {
        self.manually_created.is_empty() && self.generated.is_empty()
    }
}

fn find_in<'a>(tracks: &'a [Track], code: &str) -> Option<&'a Track> {
    tracks.iter().find(|t| t.language_code == code)
}

/// Outcome of a direct lookup; a miss keeps the catalog that was searched
#[derive(Debug)]
pub enum Lookup {
    Found(Vec<Segment>),
    Missing(TranscriptCatalog),
}

/// Source of caption tracks for a video
#[allow(async_fn_in_trait)]
pub trait TranscriptService {
    async fn list_transcripts(&self, video_id: &str) -> RetrievalResult<TranscriptCatalog>;

    async fn fetch(&self, track: &Track) -> RetrievalResult<Vec<Segment>>;

    /// Fetch the best track for the first of `languages` the video has
    async fn lookup_transcript(&self, video_id: &str, languages: &[&str]) -> RetrievalResult<Lookup> {
        let catalog = self.list_transcripts(video_id).await?;
        match catalog.find_transcript(languages) {
            Some(track) => {
                debug!("Using caption track: video={video_id} lang={}", track.language_code);
                Ok(Lookup::Found(self.fetch(track).await?))
            }
            None => Ok(Lookup::Missing(catalog)),
        }
    }

    /// Like [`lookup_transcript`](Self::lookup_transcript), with a miss as `NoTranscriptFound`
    async fn get_transcript(&self, video_id: &str, languages: &[&str]) -> RetrievalResult<Vec<Segment>> {
        match self.lookup_transcript(video_id, languages).await? {
            Lookup::Found(segments) => Ok(segments),
            Lookup::Missing(_) => Err(RetrievalError::NoTranscriptFound {
                video_id: video_id.to_string(),
                languages: languages.iter().map(|l| l.to_string()).collect(),
            }),
        }
    }
}

#[derive(Debug, Deserialize)]
struct InnerTubePlayerResponse {
    captions: Option<CaptionsData>,
    #[serde(rename = "playabilityStatus")]
    playability_status: Option<PlayabilityStatus>,
}

#[derive(Debug, Deserialize)]
struct PlayabilityStatus {
    status: Option<String>,
    reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CaptionsData {
    #[serde(rename = "playerCaptionsTracklistRenderer")]
    player_captions_tracklist_renderer: Option<CaptionTracklistRenderer>,
}

#[derive(Debug, Deserialize)]
struct CaptionTracklistRenderer {
    #[serde(rename = "captionTracks")]
    caption_tracks: Option<Vec<CaptionTrack>>,
}

#[derive(Debug, Deserialize)]
struct CaptionTrack {
    #[serde(rename = "baseUrl")]
    base_url: String,
    #[serde(rename = "languageCode")]
    language_code: String,
    name: Option<TrackName>,
    kind: Option<String>,
}

#[derive(Debug, Deserialize)]
struct TrackName {
    #[serde(rename = "simpleText")]
    simple_text: Option<String>,
    runs: Option<Vec<TextRun>>,
}

#[derive(Debug, Deserialize)]
struct TextRun {
    text: String,
}

impl TrackName {
    fn text(&self) -> Option<String> {
        self.simple_text
            .clone()
            .or_else(|| self.runs.as_ref()?.first().map(|r| r.text.clone()))
    }
}

/// Caption tracks read from YouTube through the InnerTube player API
pub struct YouTube {
    client: reqwest::Client,
}

impl YouTube {
    pub fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn send(&self, request: reqwest::RequestBuilder, video_id: &str) -> RetrievalResult<reqwest::Response> {
        let resp = request.header("User-Agent", USER_AGENT).send().await?;
        if resp.status() == StatusCode::TOO_MANY_REQUESTS {
            return Err(RetrievalError::TooManyRequests(video_id.to_string()));
        }
        Ok(resp.error_for_status()?)
    }
}

impl TranscriptService for YouTube {
    async fn list_transcripts(&self, video_id: &str) -> RetrievalResult<TranscriptCatalog> {
        // Step 1: Fetch the watch page to get the InnerTube API key
        let watch_url = format!("https://www.youtube.com/watch?v={video_id}");
        debug!("Fetching watch page: {watch_url}");

        let page_html = self.send(self.client.get(&watch_url), video_id).await?.text().await?;

        let api_key = extract_api_key(&page_html).ok_or_else(|| RetrievalError::Unparsable {
            video_id: video_id.to_string(),
            reason: "could not extract InnerTube API key from watch page".to_string(),
        })?;
        debug!("Extracted InnerTube API key: {api_key}");

        // Step 2: Call InnerTube player endpoint
        let player_url = format!("https://www.youtube.com/youtubei/v1/player?key={api_key}&prettyPrint=false");

        let body = serde_json::json!({
            "context": {
                "client": {
                    "clientName": "ANDROID",
                    "clientVersion": "20.10.38"
                }
            },
            "videoId": video_id
        });

        let resp: InnerTubePlayerResponse = self
            .send(self.client.post(&player_url).json(&body), video_id)
            .await?
            .json()
            .await?;

        catalog_from_player(video_id, resp)
    }

    async fn fetch(&self, track: &Track) -> RetrievalResult<Vec<Segment>> {
        debug!("Fetching caption track: video={} lang={}", track.video_id, track.language_code);

        let caption_xml = self
            .send(self.client.get(&track.base_url), &track.video_id)
            .await?
            .text()
            .await?;

        parse_caption_xml(&caption_xml)
    }
}

fn catalog_from_player(video_id: &str, resp: InnerTubePlayerResponse) -> RetrievalResult<TranscriptCatalog> {
    let renderer = resp.captions.and_then(|c| c.player_captions_tracklist_renderer);

    let Some(renderer) = renderer else {
        if let Some(PlayabilityStatus {
            status: Some(status),
            reason,
        }) = resp.playability_status
        {
            if status != "OK" {
                return Err(RetrievalError::VideoUnplayable {
                    video_id: video_id.to_string(),
                    reason: reason.unwrap_or(status),
                });
            }
        }
        return Err(RetrievalError::TranscriptsDisabled(video_id.to_string()));
    };

    let tracks: Vec<Track> = renderer
        .caption_tracks
        .unwrap_or_default()
        .into_iter()
        .map(|t| Track {
            video_id: video_id.to_string(),
            language: t.name.as_ref().and_then(TrackName::text).unwrap_or_else(|| t.language_code.clone()),
            is_generated: t.kind.as_deref() == Some("asr"),
            base_url: t.base_url.replace("&fmt=srv3", ""),
            language_code: t.language_code,
        })
        .collect();

    if tracks.is_empty() {
        return Err(RetrievalError::TranscriptsDisabled(video_id.to_string()));
    }

    Ok(TranscriptCatalog::new(video_id, tracks))
}

fn extract_api_key(html: &str) -> Option<String> {
    let patterns = [r#""INNERTUBE_API_KEY"\s*:\s*"([^"]+)""#, r#"innertubeApiKey\s*[=:]\s*"([^"]+)""#];

    patterns.iter().find_map(|pattern| {
        Regex::new(pattern)
            .ok()?
            .captures(html)
            .map(|caps| caps[1].to_string())
    })
}

fn parse_caption_xml(xml: &str) -> RetrievalResult<Vec<Segment>> {
    use quick_xml::Reader;
    use quick_xml::events::Event;

    let mut reader = Reader::from_str(xml);
    let mut segments = Vec::new();
    let mut current_start: Option<f64> = None;
    let mut current_dur: Option<f64> = None;

    loop {
        match reader.read_event()? {
            Event::Start(ref e) if e.name().as_ref() == b"text" => {
                let mut start = None;
                let mut dur = None;
                for attr in e.attributes().flatten() {
                    match attr.key.as_ref() {
                        b"start" => {
                            start = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        b"dur" => {
                            dur = String::from_utf8_lossy(&attr.value).parse::<f64>().ok();
                        }
                        _ => {}
                    }
                }
                current_start = start;
                current_dur = dur;
            }
            Event::Text(ref e) => {
                if let Some(start) = current_start.take() {
                    let raw_text = e.unescape().unwrap_or_default().to_string();
                    let text = html_escape::decode_html_entities(&raw_text).to_string();
                    if !text.is_empty() {
                        segments.push(Segment {
                            text,
                            start,
                            duration: current_dur.take().unwrap_or_default(),
                        });
                    }
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(segments)
}

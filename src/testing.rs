//! In-memory collaborators shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

use crate::Segment;
use crate::error::{RetrievalError, RetrievalResult};
use crate::report::Reporter;
use crate::youtube::{Lookup, Track, TranscriptCatalog, TranscriptService};

enum FakeVideo {
    Disabled,
    Broken(String),
    Tracks(Vec<(Track, Option<Vec<Segment>>)>),
}

#[derive(Default)]
pub struct FakeService {
    videos: HashMap<String, FakeVideo>,
    direct_misses: HashSet<String>,
    list_calls: Cell<usize>,
}

impl FakeService {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn disabled(mut self, video_id: &str) -> Self {
        self.videos.insert(video_id.to_string(), FakeVideo::Disabled);
        self
    }

    pub fn broken(mut self, video_id: &str, reason: &str) -> Self {
        self.videos.insert(video_id.to_string(), FakeVideo::Broken(reason.to_string()));
        self
    }

    /// Make the direct lookup miss for `video_id` even when a matching track exists
    pub fn direct_lookup_fails(mut self, video_id: &str) -> Self {
        self.direct_misses.insert(video_id.to_string());
        self
    }

    /// How many times a track list was requested
    pub fn list_calls(&self) -> usize {
        self.list_calls.get()
    }

    pub fn without_tracks(mut self, video_id: &str) -> Self {
        self.videos.insert(video_id.to_string(), FakeVideo::Tracks(Vec::new()));
        self
    }

    pub fn track(self, video_id: &str, code: &str, language: &str, generated: bool, texts: &[&str]) -> Self {
        let segments = texts.iter().map(|t| Segment::new(*t)).collect();
        self.add_track(video_id, code, language, generated, Some(segments))
    }

    /// A listed track whose caption download fails
    pub fn unfetchable_track(self, video_id: &str, code: &str, language: &str, generated: bool) -> Self {
        self.add_track(video_id, code, language, generated, None)
    }

    fn add_track(
        mut self,
        video_id: &str,
        code: &str,
        language: &str,
        generated: bool,
        segments: Option<Vec<Segment>>,
    ) -> Self {
        let track = Track {
            video_id: video_id.to_string(),
            language_code: code.to_string(),
            language: language.to_string(),
            is_generated: generated,
            base_url: format!("https://captions.test/{video_id}/{code}"),
        };
        let entry = self
            .videos
            .entry(video_id.to_string())
            .or_insert_with(|| FakeVideo::Tracks(Vec::new()));
        if let FakeVideo::Tracks(tracks) = entry {
            tracks.push((track, segments));
        }
        self
    }
}

impl TranscriptService for FakeService {
    async fn list_transcripts(&self, video_id: &str) -> RetrievalResult<TranscriptCatalog> {
        self.list_calls.set(self.list_calls.get() + 1);
        match self.videos.get(video_id) {
            Some(FakeVideo::Disabled) => Err(RetrievalError::TranscriptsDisabled(video_id.to_string())),
            Some(FakeVideo::Broken(reason)) => Err(RetrievalError::Unparsable {
                video_id: video_id.to_string(),
                reason: reason.clone(),
            }),
            Some(FakeVideo::Tracks(tracks)) => Ok(TranscriptCatalog::new(
                video_id,
                tracks.iter().map(|(t, _)| t.clone()).collect(),
            )),
            None => Err(RetrievalError::VideoUnplayable {
                video_id: video_id.to_string(),
                reason: "Video unavailable".to_string(),
            }),
        }
    }

    async fn lookup_transcript(&self, video_id: &str, languages: &[&str]) -> RetrievalResult<Lookup> {
        let catalog = self.list_transcripts(video_id).await?;
        if self.direct_misses.contains(video_id) {
            return Ok(Lookup::Missing(catalog));
        }
        match catalog.find_transcript(languages) {
            Some(track) => Ok(Lookup::Found(self.fetch(track).await?)),
            None => Ok(Lookup::Missing(catalog)),
        }
    }

    async fn fetch(&self, track: &Track) -> RetrievalResult<Vec<Segment>> {
        let segments = match self.videos.get(&track.video_id) {
            Some(FakeVideo::Tracks(tracks)) => tracks
                .iter()
                .find(|(t, _)| t == track)
                .and_then(|(_, segments)| segments.clone()),
            _ => None,
        };
        segments.ok_or_else(|| RetrievalError::Unparsable {
            video_id: track.video_id.clone(),
            reason: "caption download failed".to_string(),
        })
    }
}

/// Keeps every message so tests can assert on what the user would see
#[derive(Default)]
pub struct RecordingReporter {
    warnings: RefCell<Vec<String>>,
    errors: RefCell<Vec<String>>,
    successes: RefCell<Vec<String>>,
}

impl RecordingReporter {
    pub fn warnings(&self) -> Vec<String> {
        self.warnings.borrow().clone()
    }

    pub fn errors(&self) -> Vec<String> {
        self.errors.borrow().clone()
    }

    pub fn successes(&self) -> Vec<String> {
        self.successes.borrow().clone()
    }
}

impl Reporter for RecordingReporter {
    fn warning(&self, message: &str) {
        self.warnings.borrow_mut().push(message.to_string());
    }

    fn error(&self, message: &str) {
        self.errors.borrow_mut().push(message.to_string());
    }

    fn success(&self, message: &str) {
        self.successes.borrow_mut().push(message.to_string());
    }
}

pub mod archive;
pub mod batch;
pub mod config;
pub mod error;
pub mod format;
pub mod input;
pub mod report;
pub mod resolver;
pub mod youtube;

#[cfg(test)]
pub(crate) mod testing;

use serde::{Deserialize, Serialize};

pub use error::{Error, RetrievalError};

/// A single captioned segment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub text: String,
    pub start: f64,
    pub duration: f64,
}

impl Segment {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            start: 0.0,
            duration: 0.0,
        }
    }
}

/// Transcript languages offered to the user
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, clap::ValueEnum)]
pub enum Language {
    #[default]
    English,
    Telugu,
    Hindi,
    Tamil,
    Kannada,
}

impl Language {
    pub const ALL: [Language; 5] = [
        Language::English,
        Language::Telugu,
        Language::Hindi,
        Language::Tamil,
        Language::Kannada,
    ];

    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Telugu => "te",
            Language::Hindi => "hi",
            Language::Tamil => "ta",
            Language::Kannada => "kn",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Telugu => "Telugu",
            Language::Hindi => "Hindi",
            Language::Tamil => "Tamil",
            Language::Kannada => "Kannada",
        }
    }

    pub fn from_code(code: &str) -> Option<Language> {
        Self::ALL.into_iter().find(|l| l.code() == code)
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.code())
    }
}

/// Extract the video ID from a watch, youtu.be or shorts URL.
///
/// Markers are checked in that order and the first one present wins.
pub fn extract_video_id(url: &str) -> Result<String, Error> {
    if url.contains("youtube.com/watch?v=") {
        let rest = after(url, "v=");
        return Ok(until(rest, '&').to_string());
    }

    if url.contains("youtu.be/") {
        let rest = after(url, "youtu.be/");
        return Ok(until(rest, '?').to_string());
    }

    if url.contains("youtube.com/shorts/") {
        let rest = after(url, "shorts/");
        return Ok(until(rest, '?').to_string());
    }

    Err(Error::InvalidUrl(url.to_string()))
}

// Text following the first occurrence of `marker`, up to the next occurrence of it.
fn after<'a>(haystack: &'a str, marker: &str) -> &'a str {
    haystack
        .split(marker)
        .nth(1)
        .unwrap_or_default()
}

fn until(s: &str, stop: char) -> &str {
    s.split(stop).next().unwrap_or_default()
}

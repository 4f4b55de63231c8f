use thiserror::Error;

/// Errors raised while turning user input into work for the batch.
#[derive(Debug, Error)]
pub enum Error {
    #[error("URL is not a valid YouTube URL")]
    InvalidUrl(String),

    #[error("Uploaded file does not contain a 'URL' column.")]
    MissingUrlColumn,

    #[error("unsupported input file: {0} (expected .csv, .xlsx, .xls or .ods)")]
    UnsupportedInput(String),
}

/// Failures reported by a transcript retrieval service.
#[derive(Debug, Error)]
pub enum RetrievalError {
    #[error("no transcript found for video {video_id} in any of: {}", languages.join(", "))]
    NoTranscriptFound { video_id: String, languages: Vec<String> },

    #[error("transcripts are disabled for video {0}")]
    TranscriptsDisabled(String),

    #[error("YouTube is rate limiting requests for video {0}")]
    TooManyRequests(String),

    #[error("video {video_id} is unplayable: {reason}")]
    VideoUnplayable { video_id: String, reason: String },

    #[error("could not parse YouTube response for video {video_id}: {reason}")]
    Unparsable { video_id: String, reason: String },

    #[error("malformed caption XML: {0}")]
    CaptionXml(#[from] quick_xml::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}

pub type RetrievalResult<T> = std::result::Result<T, RetrievalError>;

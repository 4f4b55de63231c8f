use log::debug;

use crate::error::{RetrievalError, RetrievalResult};
use crate::format::format_paragraph;
use crate::report::Reporter;
use crate::youtube::{Lookup, TranscriptCatalog, TranscriptService};

const FALLBACK_LANGUAGE: &str = "en";

/// Fetch a transcript for `video_id` in `lang`, falling back to other tracks.
///
/// Never fails: retrieval problems come back as a descriptive message
/// that [`is_unavailable`] recognises. Fallbacks are announced through
/// `reporter` as warnings.
pub async fn fetch_transcript<S, R>(service: &S, video_id: &str, lang: &str, reporter: &R) -> String
where
    S: TranscriptService,
    R: Reporter + ?Sized,
{
    match service.lookup_transcript(video_id, &[lang]).await {
        Ok(Lookup::Found(segments)) => format_paragraph(&segments),
        Ok(Lookup::Missing(catalog)) => {
            debug!("No {lang} transcript for {video_id}, trying fallbacks");
            match fetch_fallback(service, &catalog, lang, reporter).await {
                Ok(text) => text,
                Err(RetrievalError::TranscriptsDisabled(_)) => disabled_message(video_id),
                Err(e) => format!("Error fetching fallback transcript for video ID {video_id}: {e}"),
            }
        }
        Err(RetrievalError::TranscriptsDisabled(_)) => disabled_message(video_id),
        Err(e) => format!("Error for video ID {video_id}: {e}"),
    }
}

// Works from the catalog the direct lookup already fetched
async fn fetch_fallback<S, R>(service: &S, catalog: &TranscriptCatalog, lang: &str, reporter: &R) -> RetrievalResult<String>
where
    S: TranscriptService,
    R: Reporter + ?Sized,
{
    // A manual track in `lang` would have matched the direct lookup already.
    if catalog.find_manually_created(&[lang]).is_some() {
        reporter.warning(&format!("Transcript not found in {lang}."));
    }

    if let Some(track) = catalog.find_manually_created(&[FALLBACK_LANGUAGE]) {
        reporter.warning("Falling back to English transcript.");
        return Ok(format_paragraph(&service.fetch(track).await?));
    }

    let pool = if catalog.manually_created.is_empty() {
        &catalog.generated
    } else {
        &catalog.manually_created
    };

    match pool.first() {
        Some(track) => {
            reporter.warning(&format!("Falling back to {} transcript.", track.language));
            Ok(format_paragraph(&service.fetch(track).await?))
        }
        None => Ok(format!("No transcripts available for video ID {}.", catalog.video_id)),
    }
}

fn disabled_message(video_id: &str) -> String {
    format!("Transcripts are disabled for video ID {video_id}.")
}

/// True when `text` is one of the resolver's failure messages rather than a transcript
pub fn is_unavailable(text: &str) -> bool {
    text.starts_with("Error") || text.contains("No transcript") || text.contains("Transcripts are disabled")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeService, RecordingReporter};

    #[tokio::test]
    async fn test_direct_match() {
        let service = FakeService::new().track("vid", "en", "English", false, &["hello", "world"]);
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "en", &reporter).await;

        assert_eq!(text, "hello world");
        assert!(reporter.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_direct_match_uses_generated_track() {
        let service = FakeService::new().track("vid", "hi", "Hindi (auto-generated)", true, &["namaste"]);
        let reporter = RecordingReporter::default();

        assert_eq!(fetch_transcript(&service, "vid", "hi", &reporter).await, "namaste");
        assert!(reporter.warnings().is_empty());
    }

    #[tokio::test]
    async fn test_falls_back_to_manual_english() {
        let service = FakeService::new()
            .track("vid", "es", "Spanish", false, &["hola"])
            .track("vid", "en", "English", false, &["hi", "there"]);
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "te", &reporter).await;

        assert_eq!(text, "hi there");
        assert_eq!(reporter.warnings(), ["Falling back to English transcript."]);
    }

    #[tokio::test]
    async fn test_requested_manual_track_missed_directly_warns_then_uses_english() {
        let service = FakeService::new()
            .track("vid", "te", "Telugu", false, &["a"])
            .track("vid", "en", "English", false, &["b"])
            .direct_lookup_fails("vid");
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "te", &reporter).await;

        assert_eq!(text, "b");
        assert_eq!(
            reporter.warnings(),
            ["Transcript not found in te.", "Falling back to English transcript."]
        );
    }

    #[tokio::test]
    async fn test_fallback_reuses_track_list() {
        let service = FakeService::new().track("vid", "es", "Spanish (auto-generated)", true, &["hola"]);
        let reporter = RecordingReporter::default();

        fetch_transcript(&service, "vid", "en", &reporter).await;

        assert_eq!(service.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_falls_back_to_first_manual_track() {
        let service = FakeService::new()
            .track("vid", "fr", "French", false, &["bonjour"])
            .track("vid", "de", "German", false, &["hallo"])
            .track("vid", "en", "English (auto-generated)", true, &["hello"]);
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "kn", &reporter).await;

        assert_eq!(text, "bonjour");
        assert_eq!(reporter.warnings(), ["Falling back to French transcript."]);
    }

    #[tokio::test]
    async fn test_falls_back_to_generated_track() {
        let service = FakeService::new().track("vid", "es", "Spanish (auto-generated)", true, &["hola", "amigos"]);
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "en", &reporter).await;

        assert_eq!(text, "hola amigos");
        assert_eq!(reporter.warnings(), ["Falling back to Spanish (auto-generated) transcript."]);
    }

    #[tokio::test]
    async fn test_no_tracks_at_all() {
        let service = FakeService::new().without_tracks("vid");
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "en", &reporter).await;

        assert_eq!(text, "No transcripts available for video ID vid.");
        assert!(is_unavailable(&text));
    }

    #[tokio::test]
    async fn test_transcripts_disabled() {
        let service = FakeService::new().disabled("vid");
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "en", &reporter).await;

        assert_eq!(text, "Transcripts are disabled for video ID vid.");
        assert!(is_unavailable(&text));
    }

    #[tokio::test]
    async fn test_other_error_is_described() {
        let service = FakeService::new().broken("vid", "bad gateway");
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "en", &reporter).await;

        assert!(text.starts_with("Error for video ID vid: "), "{text}");
        assert!(text.contains("bad gateway"));
    }

    #[tokio::test]
    async fn test_error_during_fallback_is_described() {
        let service = FakeService::new().unfetchable_track("vid", "en", "English", false);
        let reporter = RecordingReporter::default();

        let text = fetch_transcript(&service, "vid", "ta", &reporter).await;

        assert!(text.starts_with("Error fetching fallback transcript for video ID vid: "), "{text}");
        assert!(is_unavailable(&text));
    }

    #[test]
    fn test_is_unavailable() {
        assert!(is_unavailable("Error for video ID x: boom"));
        assert!(is_unavailable("No transcripts available for video ID x."));
        assert!(is_unavailable("Transcripts are disabled for video ID x."));
        assert!(!is_unavailable("an ordinary transcript about errors"));
    }
}

use std::io::Cursor;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, bail};
use log::{debug, info};

use crate::archive::zip_folder;
use crate::extract_video_id;
use crate::report::Reporter;
use crate::resolver::{fetch_transcript, is_unavailable};
use crate::youtube::TranscriptService;

/// A reference that produced no transcript file
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub url: String,
    pub message: String,
}

/// Outcome of one pass over a list of URLs
#[derive(Debug, Default)]
pub struct BatchReport {
    pub processed: usize,
    pub failures: Vec<Failure>,
}

/// Result of [`build_transcript_archive`]; `archive` is `None` when nothing succeeded
#[derive(Debug)]
pub struct BatchOutcome {
    pub report: BatchReport,
    pub archive: Option<Cursor<Vec<u8>>>,
}

pub fn transcript_file_name(video_id: &str) -> String {
    format!("{video_id}_transcript.txt")
}

/// Resolve each URL in order and write `<id>_transcript.txt` into `folder` for every success.
///
/// `folder` must already exist. One bad URL never stops the rest of the batch.
pub async fn save_transcripts_to_folder<S, R>(
    service: &S,
    urls: &[String],
    lang: &str,
    folder: &Path,
    reporter: &R,
) -> BatchReport
where
    S: TranscriptService,
    R: Reporter + ?Sized,
{
    let mut report = BatchReport::default();

    for url in urls {
        let video_id = match extract_video_id(url) {
            Ok(id) => id,
            Err(e) => {
                let message = format!("Error processing {url}: {e}");
                reporter.error(&message);
                report.failures.push(Failure {
                    url: url.clone(),
                    message,
                });
                continue;
            }
        };

        let transcript = fetch_transcript(service, &video_id, lang, reporter).await;

        if is_unavailable(&transcript) {
            reporter.warning(&transcript);
            report.failures.push(Failure {
                url: url.clone(),
                message: transcript,
            });
            continue;
        }

        match write_transcript(folder, &video_id, &transcript) {
            Ok(path) => {
                debug!("Wrote {}", path.display());
                report.processed += 1;
            }
            Err(e) => {
                let message = format!("Error processing {url}: {e:#}");
                reporter.error(&message);
                report.failures.push(Failure {
                    url: url.clone(),
                    message,
                });
            }
        }
    }

    report
}

fn write_transcript(folder: &Path, video_id: &str, transcript: &str) -> Result<PathBuf> {
    // The ID becomes a file name and must not leave `folder`
    if video_id.is_empty() || video_id.contains(['/', '\\']) || video_id.contains("..") {
        bail!("video ID {video_id:?} cannot be used as a file name");
    }

    let path = folder.join(transcript_file_name(video_id));
    if let Err(e) = std::fs::write(&path, transcript) {
        let _ = std::fs::remove_file(&path);
        return Err(e).wrap_err_with(|| format!("failed to write {}", path.display()));
    }
    Ok(path)
}

/// Run a whole batch inside a fresh temporary folder and zip the results.
pub async fn build_transcript_archive<S, R>(service: &S, urls: &[String], lang: &str, reporter: &R) -> Result<BatchOutcome>
where
    S: TranscriptService,
    R: Reporter + ?Sized,
{
    build_transcript_archive_in(&std::env::temp_dir(), service, urls, lang, reporter).await
}

/// Like [`build_transcript_archive`], with the temporary folder created under `parent`.
///
/// The temporary folder is removed before returning, on success and on error.
pub async fn build_transcript_archive_in<S, R>(
    parent: &Path,
    service: &S,
    urls: &[String],
    lang: &str,
    reporter: &R,
) -> Result<BatchOutcome>
where
    S: TranscriptService,
    R: Reporter + ?Sized,
{
    let workdir = tempfile::Builder::new()
        .prefix("ytzip-")
        .tempdir_in(parent)
        .wrap_err_with(|| format!("failed to create working folder in {}", parent.display()))?;
    debug!("Working folder: {}", workdir.path().display());

    let report = save_transcripts_to_folder(service, urls, lang, workdir.path(), reporter).await;
    info!("Processed {} of {} URLs", report.processed, urls.len());

    if report.processed == 0 {
        reporter.error("No transcripts were available for the provided URLs.");
        return Ok(BatchOutcome { report, archive: None });
    }

    let archive = zip_folder(workdir.path()).wrap_err("failed to build transcript archive")?;
    reporter.success(&format!(
        "Transcripts for {} videos have been processed.",
        report.processed
    ));

    Ok(BatchOutcome {
        report,
        archive: Some(archive),
    })
}

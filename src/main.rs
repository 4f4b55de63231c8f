use std::io;
use std::path::PathBuf;

use eyre::{Result, WrapErr, bail};
use log::{debug, info, warn};

use ytzip::Language;
use ytzip::archive::{ARCHIVE_FILE_NAME, ARCHIVE_MIME_TYPE};
use ytzip::report::{ConsoleReporter, Reporter};
use ytzip::youtube::YouTube;

mod cli;

use cli::Cli;

fn setup_logging() -> Result<()> {
    let log_dir = log_dir();
    std::fs::create_dir_all(&log_dir)?;
    let log_file = log_dir.join("ytzip.log");

    let target = Box::new(std::fs::OpenOptions::new().create(true).append(true).open(&log_file)?);

    env_logger::Builder::from_default_env()
        .target(env_logger::Target::Pipe(target))
        .init();

    info!("Logging initialized: {}", log_file.display());
    Ok(())
}

fn log_dir() -> PathBuf {
    dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("ytzip")
        .join("logs")
}

fn build_after_help() -> String {
    let languages = Language::ALL
        .iter()
        .map(|l| format!("  {:<10} {}", l.display_name(), l.code()))
        .collect::<Vec<_>>()
        .join("\n");

    let log_path = log_dir().join("ytzip.log");

    format!(
        "\nLANGUAGES:\n{languages}\n\nInput files need a header row with a \"URL\" column.\n\nLogs are written to: {}",
        log_path.display()
    )
}

#[tokio::main]
async fn main() -> Result<()> {
    setup_logging()?;

    let after_help = build_after_help();
    let cmd = <Cli as clap::CommandFactory>::command().after_help(after_help);
    let matches = cmd.get_matches();
    let cli = <Cli as clap::FromArgMatches>::from_arg_matches(&matches)?;

    // Load config file (non-fatal if missing/invalid)
    let config = ytzip::config::Config::load().unwrap_or_default();

    // CLI flags take priority over config
    let lang = match cli.lang {
        Some(lang) => lang,
        None => config
            .default_language()
            .unwrap_or_else(|e| {
                warn!("Ignoring config language: {e}");
                None
            })
            .unwrap_or_default(),
    };
    let output = cli
        .output
        .clone()
        .or_else(|| config.output.clone())
        .unwrap_or_else(|| PathBuf::from(ARCHIVE_FILE_NAME));

    if cli.verbose {
        let config_path = ytzip::config::config_path();
        if config_path.exists() {
            eprintln!("Config: {}", config_path.display());
        }
        eprintln!("Language: {lang}");
    }
    debug!("Language: {lang}, output: {}", output.display());

    let reporter = ConsoleReporter;
    let service = YouTube::new(reqwest::Client::new());

    if let Some(ref url) = cli.url {
        match ytzip::extract_video_id(url) {
            Ok(video_id) => {
                let transcript = ytzip::resolver::fetch_transcript(&service, &video_id, lang.code(), &reporter).await;
                println!("Transcript:\n{transcript}");
            }
            Err(e) => reporter.error(&format!("Error processing {url}: {e}")),
        }
    }

    // Collect batch URLs: from input file, or stdin when no single URL was given
    let urls = if let Some(ref input) = cli.input {
        ytzip::input::read_urls(input)?
    } else if cli.url.is_none() {
        let urls = ytzip::input::read_url_lines(io::stdin().lock())?;
        if urls.is_empty() {
            bail!("no URL provided\n\nUsage: ytzip <URL>\n       ytzip --input videos.xlsx\n       cat urls.txt | ytzip");
        }
        urls
    } else {
        return Ok(());
    };

    let outcome = ytzip::batch::build_transcript_archive(&service, &urls, lang.code(), &reporter).await?;

    if cli.verbose {
        eprintln!(
            "Processed {} of {} URLs ({} failed)",
            outcome.report.processed,
            urls.len(),
            outcome.report.failures.len()
        );
    }

    if let Some(archive) = outcome.archive {
        std::fs::write(&output, archive.get_ref())
            .wrap_err_with(|| format!("failed to write archive to {}", output.display()))?;
        eprintln!(
            "Archive written to: {} ({ARCHIVE_MIME_TYPE}, {} bytes)",
            output.display(),
            archive.get_ref().len()
        );
    }

    Ok(())
}

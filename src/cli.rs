use clap::Parser;
use std::path::PathBuf;

use ytzip::Language;

#[derive(Parser)]
#[command(
    name = "ytzip",
    about = "Convert YouTube videos into plain-text transcripts, bundled as a zip for batches",
    version = env!("GIT_DESCRIBE"),
)]
pub struct Cli {
    /// YouTube video URL to print the transcript of
    pub url: Option<String>,

    /// Spreadsheet or CSV with a "URL" column (reads URLs from stdin if neither this nor URL is given)
    #[arg(short, long)]
    pub input: Option<PathBuf>,

    /// Transcript language
    #[arg(short, long, value_enum)]
    pub lang: Option<Language>,

    /// Where to write the zip archive [default: transcripts.zip]
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Show progress details
    #[arg(short, long)]
    pub verbose: bool,
}

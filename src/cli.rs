use clap::Parser;
use std::path::PathBuf;

use crate::encode::AudioFormat;

/// Convert EPUB ebooks to per-chapter audiobook files
#[derive(Parser, Debug)]
#[command(name = "epub2audio", version, about)]
pub struct Cli {
    /// One or more .epub files to process
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Override the author name
    #[arg(short, long)]
    pub author: Option<String>,

    /// Override the book title
    #[arg(short, long)]
    pub title: Option<String>,

    /// Audio format: m4a, mp3, wav or aiff (leading dot optional)
    #[arg(short, long, default_value = ".m4a", value_parser = AudioFormat::parse)]
    pub format: AudioFormat,

    /// Output filename template. Use ${Author}, ${Title}, ${ext} and a
    /// printf-style chapter number directive such as %02d.
    #[arg(
        short = 'F',
        long,
        default_value = "${Author}-${Title} - Chapter %02d.${ext}"
    )]
    pub filename_format: String,

    /// Directory the rendered filenames resolve against
    #[arg(short, long, default_value = ".")]
    pub output: PathBuf,

    /// Show progress details (written to stderr, alongside errors)
    #[arg(short, long, default_value_t = false)]
    pub verbose: bool,
}

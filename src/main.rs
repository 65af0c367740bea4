mod cli;
mod encode;
mod epub_reader;
mod filename;
mod metadata;
mod pipeline;
mod synth;
mod text;

use anyhow::{Context, Result};
use clap::Parser;
use log::{error, LevelFilter};
use std::fs;
use std::process::ExitCode;

use crate::encode::FfmpegTranscoder;
use crate::epub_reader::EpubOpener;
use crate::filename::FilenameTemplate;
use crate::pipeline::OutputSpec;
use crate::synth::SayCommand;

fn main() -> ExitCode {
    let cli = cli::Cli::parse();

    env_logger::Builder::new()
        .filter_level(if cli.verbose {
            LevelFilter::Info
        } else {
            LevelFilter::Error
        })
        .format_timestamp(None)
        .format_target(false)
        .init();

    match run(&cli) {
        Ok(true) => ExitCode::SUCCESS,
        Ok(false) => ExitCode::FAILURE,
        Err(err) => {
            error!("{:#}", err);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &cli::Cli) -> Result<bool> {
    // A bad template would make every chapter of the run collide on one
    // name, so reject it before touching any input.
    let template = FilenameTemplate::parse(&cli.filename_format)?;

    fs::create_dir_all(&cli.output).with_context(|| {
        format!("Failed to create output directory: {}", cli.output.display())
    })?;

    let spec = OutputSpec {
        format: cli.format,
        template,
        dir: cli.output.clone(),
    };

    Ok(pipeline::process_books(
        &cli.files,
        &spec,
        cli.author.as_deref(),
        cli.title.as_deref(),
        &EpubOpener,
        &SayCommand,
        &FfmpegTranscoder,
    ))
}

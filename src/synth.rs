use anyhow::{bail, Context, Result};
use std::path::Path;
use std::process::Command;

/// Turns plain text into a speech audio file at the given path.
///
/// A trait so the pipeline can be exercised in tests without a real engine.
pub trait Synthesizer {
    /// Extension (with dot) of the files this engine produces.
    fn native_extension(&self) -> &'static str;

    fn synthesize(&self, text: &str, output: &Path) -> Result<()>;
}

/// The native macOS `say` command. Produces AIFF.
pub struct SayCommand;

impl Synthesizer for SayCommand {
    fn native_extension(&self) -> &'static str {
        ".aiff"
    }

    fn synthesize(&self, text: &str, output: &Path) -> Result<()> {
        let status = Command::new("say")
            .arg("-o")
            .arg(output)
            .arg(text)
            .status()
            .context("Failed to run the 'say' speech engine")?;

        if !status.success() {
            bail!("speech synthesis exited with {}", status);
        }

        Ok(())
    }
}

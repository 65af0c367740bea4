use anyhow::{bail, Context, Result};
use std::fs;
use std::path::Path;
use std::process::{Command, Stdio};

/// Output formats the pipeline can produce.
///
/// The speech engine emits AIFF natively; every other format goes through
/// the external encoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AudioFormat {
    M4a,
    Mp3,
    Wav,
    Aiff,
}

impl AudioFormat {
    /// Parses a format flag value. A leading dot is optional; matching is
    /// case-sensitive.
    pub fn parse(value: &str) -> Result<Self, String> {
        match value.strip_prefix('.').unwrap_or(value) {
            "m4a" => Ok(Self::M4a),
            "mp3" => Ok(Self::Mp3),
            "wav" => Ok(Self::Wav),
            "aiff" => Ok(Self::Aiff),
            other => Err(format!(
                "unsupported format '{}' (expected m4a, mp3, wav or aiff)",
                other
            )),
        }
    }

    /// Extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::M4a => ".m4a",
            Self::Mp3 => ".mp3",
            Self::Wav => ".wav",
            Self::Aiff => ".aiff",
        }
    }
}

/// Converts the raw synthesis output into the requested format.
///
/// A trait so the pipeline can be exercised in tests without ffmpeg.
pub trait Transcoder {
    fn transcode(&self, input: &Path, output: &Path, format: AudioFormat) -> Result<()>;
}

/// Shells out to ffmpeg with speech-oriented encode settings.
pub struct FfmpegTranscoder;

impl Transcoder for FfmpegTranscoder {
    fn transcode(&self, input: &Path, output: &Path, format: AudioFormat) -> Result<()> {
        // The speech engine already produces AIFF; a matching target needs
        // a move, not a re-encode.
        if format == AudioFormat::Aiff {
            return move_file(input, output);
        }

        let mut cmd = Command::new("ffmpeg");
        cmd.arg("-y").arg("-i").arg(input);
        match format {
            // Mono with variable bitrate keeps speech intelligible at a
            // fraction of music-grade size.
            AudioFormat::Mp3 => {
                cmd.args(["-ac", "1", "-c:a", "libmp3lame", "-q:a", "5"]);
            }
            AudioFormat::M4a => {
                cmd.args(["-c:a", "aac", "-b:a", "128k"]);
            }
            AudioFormat::Wav => {
                cmd.args(["-ar", "44100"]);
            }
            AudioFormat::Aiff => unreachable!("handled above"),
        }
        cmd.arg(output);

        let status = cmd
            .stdout(Stdio::null())
            .stderr(Stdio::null())
            .status()
            .context("ffmpeg not found. Install it (e.g. brew install ffmpeg) for conversions")?;

        if !status.success() {
            // ffmpeg can leave a truncated file behind when it dies mid-encode.
            let _ = fs::remove_file(output);
            bail!(
                "ffmpeg exited with {} while encoding {}",
                status,
                output.display()
            );
        }

        Ok(())
    }
}

/// Rename where possible. Temp files often live on another filesystem than
/// the output, in which case fall back to copy-and-delete.
fn move_file(input: &Path, output: &Path) -> Result<()> {
    if fs::rename(input, output).is_ok() {
        return Ok(());
    }
    if let Err(err) = fs::copy(input, output) {
        // A copy that dies mid-write must not leave a truncated output.
        let _ = fs::remove_file(output);
        return Err(err).with_context(|| {
            format!(
                "Failed to move {} to {}",
                input.display(),
                output.display()
            )
        });
    }
    let _ = fs::remove_file(input);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn parses_formats_with_and_without_dot() {
        assert_eq!(AudioFormat::parse(".mp3"), Ok(AudioFormat::Mp3));
        assert_eq!(AudioFormat::parse("mp3"), Ok(AudioFormat::Mp3));
        assert_eq!(AudioFormat::parse(".m4a"), Ok(AudioFormat::M4a));
        assert_eq!(AudioFormat::parse("wav"), Ok(AudioFormat::Wav));
        assert_eq!(AudioFormat::parse("aiff"), Ok(AudioFormat::Aiff));
    }

    #[test]
    fn format_matching_is_case_sensitive() {
        assert!(AudioFormat::parse("MP3").is_err());
        assert!(AudioFormat::parse(".M4A").is_err());
        assert!(AudioFormat::parse("ogg").is_err());
    }

    #[test]
    fn extension_carries_leading_dot() {
        assert_eq!(AudioFormat::M4a.extension(), ".m4a");
        assert_eq!(AudioFormat::Aiff.extension(), ".aiff");
    }

    #[test]
    fn passthrough_moves_bytes_unchanged() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("raw.aiff");
        let dest = dir.path().join("out.aiff");
        fs::write(&src, b"fake aiff bytes").unwrap();

        FfmpegTranscoder
            .transcode(&src, &dest, AudioFormat::Aiff)
            .unwrap();

        assert_eq!(fs::read(&dest).unwrap(), b"fake aiff bytes");
        assert!(!src.exists());
    }

    #[test]
    fn failed_passthrough_leaves_no_destination() {
        let dir = tempfile::tempdir().unwrap();
        let src = dir.path().join("raw.aiff");
        // Both the rename and the copy fallback fail on a missing parent.
        let dest = dir.path().join("no-such-dir").join("out.aiff");
        fs::write(&src, b"fake aiff bytes").unwrap();

        let result = FfmpegTranscoder.transcode(&src, &dest, AudioFormat::Aiff);

        assert!(result.is_err());
        assert!(!dest.exists());
    }
}

//! Aspect classification via `ffprobe`.

use anyhow::{anyhow, Result};
use async_trait::async_trait;
use serde::Deserialize;
use std::path::Path;
use std::process::Stdio;
use std::time::Duration;
use thiserror::Error;
use tokio::process::Command;
use tubely_core::AspectBucket;

const LANDSCAPE_RANGE: (f64, f64) = (1.76, 1.79);
const PORTRAIT_RANGE: (f64, f64) = (0.54, 0.57);

#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("failed to run media prober: {0}")]
    Spawn(#[source] std::io::Error),

    #[error("media prober did not finish within {0:?}")]
    Timeout(Duration),

    #[error("could not decode prober output: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("no streams found in media file")]
    NoStreams,
}

/// Something that can place a media file into an [`AspectBucket`].
#[async_trait]
pub trait AspectClassifier: Send + Sync {
    async fn classify(&self, path: &Path) -> Result<AspectBucket, ProbeError>;
}

#[derive(Debug, Deserialize)]
struct ProbeOutput {
    #[serde(default)]
    streams: Vec<ProbeStream>,
}

#[derive(Debug, Deserialize)]
struct ProbeStream {
    #[serde(default)]
    codec_type: Option<String>,
    #[serde(default)]
    width: f64,
    #[serde(default)]
    height: f64,
}

/// Bucket a width/height pair. Ratios are compared on open intervals and a
/// zero height is never divided by.
pub fn classify_dimensions(width: f64, height: f64) -> AspectBucket {
    if height <= 0.0 {
        return AspectBucket::Other;
    }
    let ratio = width / height;
    if ratio > LANDSCAPE_RANGE.0 && ratio < LANDSCAPE_RANGE.1 {
        AspectBucket::Landscape
    } else if ratio > PORTRAIT_RANGE.0 && ratio < PORTRAIT_RANGE.1 {
        AspectBucket::Portrait
    } else {
        AspectBucket::Other
    }
}

/// Classify raw `ffprobe -print_format json -show_streams` output using the first stream.
pub fn parse_probe_output(stdout: &[u8]) -> Result<AspectBucket, ProbeError> {
    let output: ProbeOutput = serde_json::from_slice(stdout)?;
    let first = output.streams.first().ok_or(ProbeError::NoStreams)?;

    let bucket = classify_dimensions(first.width, first.height);
    tracing::debug!(
        width = first.width,
        height = first.height,
        codec_type = first.codec_type.as_deref().unwrap_or("unknown"),
        aspect = %bucket,
        "Video aspect measured"
    );
    Ok(bucket)
}

/// Validate that a prober path doesn't contain shell metacharacters or traversal
fn validate_prober_path(path: &str) -> Result<()> {
    if path.trim().is_empty() {
        return Err(anyhow!("ffprobe path is empty"));
    }
    let dangerous_chars = [';', '|', '&', '$', '`', '(', ')', '<', '>', '\n', '\r'];
    if path.chars().any(|c| dangerous_chars.contains(&c)) {
        return Err(anyhow!("ffprobe path contains dangerous characters: {}", path));
    }
    if path.contains("..") {
        return Err(anyhow!("ffprobe path contains directory traversal: {}", path));
    }
    Ok(())
}

/// Classifier backed by an `ffprobe` subprocess.
#[derive(Debug, Clone)]
pub struct FfprobeClassifier {
    ffprobe_path: String,
    timeout: Duration,
}

impl FfprobeClassifier {
    pub fn new(ffprobe_path: impl Into<String>, timeout: Duration) -> Result<Self> {
        let ffprobe_path = ffprobe_path.into();
        validate_prober_path(&ffprobe_path)?;
        Ok(Self {
            ffprobe_path,
            timeout,
        })
    }
}

#[async_trait]
impl AspectClassifier for FfprobeClassifier {
    #[tracing::instrument(skip(self), fields(
        process.executable.path = %self.ffprobe_path,
        ffprobe.operation = "probe"
    ))]
    async fn classify(&self, path: &Path) -> Result<AspectBucket, ProbeError> {
        let run = Command::new(&self.ffprobe_path)
            .args(["-v", "error", "-print_format", "json", "-show_streams"])
            .arg(path)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output();

        let output = tokio::time::timeout(self.timeout, run)
            .await
            .map_err(|_| ProbeError::Timeout(self.timeout))?
            .map_err(ProbeError::Spawn)?;

        // A non-zero exit still often carries usable stream data; parse it anyway.
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            tracing::warn!(
                status = %output.status,
                stderr = %stderr.trim(),
                "ffprobe exited with a failure status"
            );
        }

        parse_probe_output(&output.stdout)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_common_dimensions() {
        assert_eq!(classify_dimensions(1920.0, 1080.0), AspectBucket::Landscape);
        assert_eq!(classify_dimensions(1080.0, 1920.0), AspectBucket::Portrait);
        assert_eq!(classify_dimensions(1000.0, 1000.0), AspectBucket::Other);
        assert_eq!(classify_dimensions(640.0, 480.0), AspectBucket::Other);
    }

    #[test]
    fn test_zero_height_is_other() {
        assert_eq!(classify_dimensions(1920.0, 0.0), AspectBucket::Other);
        assert_eq!(classify_dimensions(0.0, 0.0), AspectBucket::Other);
    }

    #[test]
    fn test_interval_bounds_are_open() {
        assert_eq!(classify_dimensions(176.0, 100.0), AspectBucket::Other);
        assert_eq!(classify_dimensions(179.0, 100.0), AspectBucket::Other);
        assert_eq!(classify_dimensions(54.0, 100.0), AspectBucket::Other);
        assert_eq!(classify_dimensions(57.0, 100.0), AspectBucket::Other);
        assert_eq!(classify_dimensions(177.0, 100.0), AspectBucket::Landscape);
        assert_eq!(classify_dimensions(56.0, 100.0), AspectBucket::Portrait);
    }

    #[test]
    fn test_parse_uses_first_stream() {
        let json = br#"{"streams":[
            {"index":0,"codec_type":"video","width":1080,"height":1920},
            {"index":1,"codec_type":"audio"}
        ]}"#;
        assert_eq!(parse_probe_output(json).unwrap(), AspectBucket::Portrait);
    }

    #[test]
    fn test_parse_audio_first_stream_is_other() {
        let json = br#"{"streams":[{"codec_type":"audio"},{"width":1920,"height":1080}]}"#;
        assert_eq!(parse_probe_output(json).unwrap(), AspectBucket::Other);
    }

    #[test]
    fn test_parse_empty_streams() {
        assert!(matches!(
            parse_probe_output(br#"{"streams":[]}"#),
            Err(ProbeError::NoStreams)
        ));
        assert!(matches!(parse_probe_output(b"{}"), Err(ProbeError::NoStreams)));
    }

    #[test]
    fn test_parse_garbage() {
        assert!(matches!(parse_probe_output(b""), Err(ProbeError::Decode(_))));
        assert!(matches!(
            parse_probe_output(b"Invalid data found when processing input"),
            Err(ProbeError::Decode(_))
        ));
    }

    #[test]
    fn test_rejects_dangerous_prober_path() {
        assert!(FfprobeClassifier::new("ffprobe; rm -rf /", Duration::from_secs(1)).is_err());
        assert!(FfprobeClassifier::new("", Duration::from_secs(1)).is_err());
        assert!(FfprobeClassifier::new("/usr/bin/ffprobe", Duration::from_secs(1)).is_ok());
    }

    #[tokio::test]
    async fn test_missing_binary_is_spawn_error() {
        let classifier =
            FfprobeClassifier::new("/nonexistent/tubely-ffprobe", Duration::from_secs(5)).unwrap();
        let err = classifier
            .classify(Path::new("/tmp/whatever.mp4"))
            .await
            .unwrap_err();
        assert!(matches!(err, ProbeError::Spawn(_)));
    }

    #[cfg(unix)]
    mod fake_prober {
        use super::*;
        use std::os::unix::fs::PermissionsExt;

        fn write_script(dir: &Path, body: &str) -> String {
            let path = dir.join("fake-ffprobe");
            std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
            std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
            path.to_string_lossy().into_owned()
        }

        #[tokio::test]
        async fn test_nonzero_exit_output_is_still_parsed() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(
                dir.path(),
                r#"echo '{"streams":[{"width":1920,"height":1080}]}'
echo 'moov atom not found' >&2
exit 1"#,
            );
            let classifier = FfprobeClassifier::new(script, Duration::from_secs(5)).unwrap();

            let bucket = classifier
                .classify(&dir.path().join("clip.mp4"))
                .await
                .unwrap();
            assert_eq!(bucket, AspectBucket::Landscape);
        }

        #[tokio::test]
        async fn test_slow_prober_times_out() {
            let dir = tempfile::tempdir().unwrap();
            let script = write_script(dir.path(), "sleep 5");
            let classifier =
                FfprobeClassifier::new(script, Duration::from_millis(100)).unwrap();

            let err = classifier
                .classify(&dir.path().join("clip.mp4"))
                .await
                .unwrap_err();
            assert!(matches!(err, ProbeError::Timeout(_)));
        }
    }
}

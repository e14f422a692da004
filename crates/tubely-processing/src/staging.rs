//! Staging buffer: copies an untrusted upload stream to a size-capped scratch file.
//!
//! The scratch file is owned by [`StagedFile`] and removed when it is dropped, so
//! every exit path (success, error, early return, panic unwinding) cleans up.
//! A stream that hits the cap fails before the offending chunk is written and
//! its partial file is removed in the same way.

use std::io::SeekFrom;
use std::path::Path;
use tempfile::TempPath;
use thiserror::Error;
use tokio::fs::File;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncSeekExt, AsyncWriteExt};

const STAGING_CHUNK_SIZE: usize = 64 * 1024;
const SCRATCH_PREFIX: &str = "tubely-upload-";

#[derive(Debug, Error)]
pub enum StagingError {
    #[error("upload exceeds the {limit} byte limit")]
    TooLarge { limit: u64 },

    #[error("failed to read upload stream: {0}")]
    Read(#[source] std::io::Error),

    #[error("scratch file I/O failed: {0}")]
    Io(#[from] std::io::Error),
}

/// A fully staged upload on local disk.
#[derive(Debug)]
pub struct StagedFile {
    file: File,
    path: TempPath,
    size: u64,
}

impl StagedFile {
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of bytes staged.
    pub fn size(&self) -> u64 {
        self.size
    }

    pub async fn rewind(&mut self) -> std::io::Result<()> {
        self.file.seek(SeekFrom::Start(0)).await?;
        Ok(())
    }

    /// A handle positioned at offset zero for a second full read.
    ///
    /// The handle shares the underlying descriptor; the scratch file itself is
    /// still removed when `self` is dropped.
    pub async fn reader(&mut self) -> std::io::Result<File> {
        self.rewind().await?;
        self.file.try_clone().await
    }
}

/// Copy `reader` into a new scratch file, failing once more than `max_bytes` arrive.
///
/// When `declared_len` is known and already over the cap, nothing is created.
/// `scratch_dir` of `None` uses the OS temp directory.
pub async fn stage_stream<R>(
    reader: &mut R,
    max_bytes: u64,
    declared_len: Option<u64>,
    scratch_dir: Option<&Path>,
) -> Result<StagedFile, StagingError>
where
    R: AsyncRead + Unpin + ?Sized,
{
    if let Some(declared) = declared_len {
        if declared > max_bytes {
            tracing::debug!(
                declared_bytes = declared,
                limit = max_bytes,
                "Rejecting upload by declared length"
            );
            return Err(StagingError::TooLarge { limit: max_bytes });
        }
    }

    let mut builder = tempfile::Builder::new();
    builder.prefix(SCRATCH_PREFIX).suffix(".mp4");
    let named = match scratch_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };
    let (std_file, path) = named.into_parts();
    let mut file = File::from_std(std_file);

    let mut buf = vec![0u8; STAGING_CHUNK_SIZE];
    let mut written: u64 = 0;

    loop {
        let n = match reader.read(&mut buf).await {
            Ok(n) => n,
            // The transport cut the body off at its own length limit.
            Err(e) if e.kind() == std::io::ErrorKind::FileTooLarge => {
                tracing::debug!(
                    staged_bytes = written,
                    limit = max_bytes,
                    error = %e,
                    "Upload body hit the transport length limit while staging"
                );
                return Err(StagingError::TooLarge { limit: max_bytes });
            }
            Err(e) => return Err(StagingError::Read(e)),
        };
        if n == 0 {
            break;
        }
        if written + n as u64 > max_bytes {
            tracing::debug!(
                staged_bytes = written,
                limit = max_bytes,
                path = %path.display(),
                "Upload exceeded size limit while staging"
            );
            return Err(StagingError::TooLarge { limit: max_bytes });
        }
        file.write_all(&buf[..n]).await?;
        written += n as u64;
    }

    file.flush().await?;
    file.seek(SeekFrom::Start(0)).await?;

    tracing::debug!(
        size_bytes = written,
        path = %path.display(),
        "Upload staged to scratch file"
    );

    Ok(StagedFile {
        file,
        path,
        size: written,
    })
}

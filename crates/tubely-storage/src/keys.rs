//! Object key planning shared by all storage backends.
//!
//! Key format: `{aspect}/{token}.{extension}`, where `token` is 32 bytes from a
//! cryptographically secure RNG encoded as URL-safe base64 without padding.

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use rand::{CryptoRng, RngCore};
use std::fmt::{Display, Formatter, Result as FmtResult};
use tubely_core::AspectBucket;

use crate::traits::StorageError;

/// Number of random bytes in an object key token.
pub const KEY_TOKEN_BYTES: usize = 32;

/// A validated, path-like storage key.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ObjectKey(String);

impl ObjectKey {
    /// Wrap an existing key, rejecting traversal sequences and absolute paths.
    pub fn parse(key: impl Into<String>) -> Result<Self, StorageError> {
        let key = key.into();
        if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
            return Err(StorageError::InvalidKey(format!(
                "Storage key contains invalid characters: {}",
                key
            )));
        }
        Ok(ObjectKey(key))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for ObjectKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ObjectKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Plan the storage key for a new upload.
///
/// Draws fresh randomness on every call, so two plans never share a token in
/// practice. The extension must come from the validated content type, never
/// from a client-supplied filename.
pub fn plan_object_key<R>(rng: &mut R, bucket: AspectBucket, extension: &str) -> ObjectKey
where
    R: RngCore + CryptoRng + ?Sized,
{
    let mut token = [0u8; KEY_TOKEN_BYTES];
    rng.fill_bytes(&mut token);
    let token = URL_SAFE_NO_PAD.encode(token);
    ObjectKey(format!("{}/{}.{}", bucket.as_prefix(), token, extension))
}

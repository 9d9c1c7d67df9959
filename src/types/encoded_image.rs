use std::fmt;
use std::io;
use std::path::Path;

use base64::Engine;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::observability::{IMAGE_BYTES, IMAGES_ENCODED};

/// Prefix of every encoded image.
///
/// The media type is always JPEG; the file contents are not inspected.
pub const DATA_URL_PREFIX: &str = "data:image/jpeg;base64,";

/// An image file encoded inline as a data URL.
///
/// Produced once per file and never modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EncodedImage {
    data_url: String,
}

impl EncodedImage {
    /// Encode raw image bytes.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let payload = base64::engine::general_purpose::STANDARD.encode(bytes);
        Self {
            data_url: format!("{DATA_URL_PREFIX}{payload}"),
        }
    }

    /// Read the file at `path` and encode it.
    ///
    /// A path that does not name a readable file is [`Error::NotFound`]; any
    /// other I/O failure is [`Error::ReadFailure`].
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = std::fs::read(path).map_err(|err| read_error(path, err))?;
        IMAGES_ENCODED.click();
        IMAGE_BYTES.count(bytes.len() as u64);
        tracing::debug!(path = %path.display(), bytes = bytes.len(), "encoded image");
        Ok(Self::from_bytes(&bytes))
    }

    /// The full data URL.
    pub fn as_str(&self) -> &str {
        &self.data_url
    }

    /// The base64 payload after the media-type prefix.
    pub fn payload(&self) -> &str {
        self.data_url
            .strip_prefix(DATA_URL_PREFIX)
            .unwrap_or(&self.data_url)
    }

    /// Decode the payload back into the original bytes.
    pub fn decode(&self) -> Result<Vec<u8>> {
        base64::engine::general_purpose::STANDARD
            .decode(self.payload())
            .map_err(|err| Error::serialization("invalid base64 payload", Some(Box::new(err))))
    }
}

/// Classify a failed read: anything that means "no file here" is `NotFound`.
fn read_error(path: &Path, err: io::Error) -> Error {
    match err.kind() {
        io::ErrorKind::NotFound
        | io::ErrorKind::NotADirectory
        | io::ErrorKind::InvalidFilename => Error::not_found(path.display().to_string()),
        io::ErrorKind::IsADirectory => {
            Error::not_found(format!("{} is a directory", path.display()))
        }
        _ if path.is_dir() => Error::not_found(format!("{} is a directory", path.display())),
        _ => Error::read_failure(path.display().to_string(), err),
    }
}

impl fmt::Display for EncodedImage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payloads run to megabytes; show the size instead.
        write!(f, "{}<{} chars>", DATA_URL_PREFIX, self.payload().len())
    }
}

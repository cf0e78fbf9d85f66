use std::path::Path;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::error::StoreError;

const DATA_URL_PREFIX: &str = "data:";

/// Where an entity's image lives.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
  /// Embedded in the record, survives a reload with the record itself.
  DataUrl(String),
  RemoteUrl(String),
}

impl ImageSource {
  pub fn from_url(url: &str) -> Self {
    if url.starts_with(DATA_URL_PREFIX) {
      ImageSource::DataUrl(url.to_string())
    } else {
      ImageSource::RemoteUrl(url.to_string())
    }
  }

  pub fn url(&self) -> &str {
    match self {
      ImageSource::DataUrl(url) | ImageSource::RemoteUrl(url) => url,
    }
  }

  pub fn is_embedded(&self) -> bool {
    matches!(self, ImageSource::DataUrl(_))
  }
}

pub fn mime_type_for_path(path: &Path) -> &'static str {
  let ext = path
    .extension()
    .and_then(std::ffi::OsStr::to_str)
    .unwrap_or("")
    .to_ascii_lowercase();
  match ext.as_str() {
    "png" => "image/png",
    "jpg" | "jpeg" => "image/jpeg",
    "gif" => "image/gif",
    "webp" => "image/webp",
    "svg" => "image/svg+xml",
    "bmp" => "image/bmp",
    _ => "application/octet-stream",
  }
}

pub fn data_url(mime_type: &str, bytes: &[u8]) -> String {
  format!("data:{};base64,{}", mime_type, STANDARD.encode(bytes))
}

/// Reads the image at `path` and embeds it as a base64 `data:` url.
///
/// The read completes before any store is touched. Dropping the future abandons the read and
/// nothing is added.
pub async fn embed_image<P: AsRef<Path>>(path: P) -> Result<ImageSource, StoreError> {
  let path = path.as_ref();
  let bytes = tokio::fs::read(path).await?;
  tracing::trace!("embed image {:?}, {} bytes", path, bytes.len());
  Ok(ImageSource::DataUrl(data_url(
    mime_type_for_path(path),
    &bytes,
  )))
}

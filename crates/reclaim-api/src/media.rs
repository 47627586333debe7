//! Local-disk implementation of [`MediaStore`].
//!
//! Writes each upload under a single directory with a UUID filename and an
//! extension guessed from the declared content type, and returns a reference
//! of the form `<url_prefix>/<uuid>.<ext>`. The server binary serves the
//! directory statically under the same prefix.

use std::path::PathBuf;

use reclaim_core::media::MediaStore;
use tokio::fs;
use uuid::Uuid;

pub struct LocalMediaStore {
  /// Root directory for all uploads (e.g. `./data/uploads`).
  root:       PathBuf,
  /// Public URL prefix (e.g. `/uploads`).
  url_prefix: String,
}

impl LocalMediaStore {
  pub fn new(root: PathBuf, url_prefix: impl Into<String>) -> Self {
    Self { root, url_prefix: url_prefix.into() }
  }
}

impl MediaStore for LocalMediaStore {
  type Error = std::io::Error;

  async fn store(
    &self,
    data: Vec<u8>,
    content_type: &str,
  ) -> Result<String, Self::Error> {
    let ext = mime_guess::get_mime_extensions_str(content_type)
      .and_then(|exts| exts.first())
      .copied()
      .unwrap_or("bin");
    let filename = format!("{}.{ext}", Uuid::new_v4());

    fs::create_dir_all(&self.root).await?;
    fs::write(self.root.join(&filename), &data).await?;

    Ok(format!("{}/{filename}", self.url_prefix))
  }
}

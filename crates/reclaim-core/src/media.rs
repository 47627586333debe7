//! The `MediaStore` trait — object storage for uploaded item photos.
//!
//! The board only keeps the returned reference string on the post; it never
//! interprets or validates image content.

use std::future::Future;

/// Abstraction over an upload target (local disk, S3, a CDN, …).
pub trait MediaStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// Persist `data` and return an opaque reference usable as a URL path.
  fn store<'a>(
    &'a self,
    data: Vec<u8>,
    content_type: &'a str,
  ) -> impl Future<Output = Result<String, Self::Error>> + Send + 'a;
}

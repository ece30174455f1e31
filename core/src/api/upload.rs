//! Generic image upload and client-side image validation.

use crate::client::ApiClient;
use crate::config::{endpoints, IMAGE_TIMEOUT};
use crate::error::ApiError;
use crate::request::{FilePayload, Method, RequestOptions};
use crate::types::{Envelope, UploadedImage};

/// Largest accepted image, in bytes.
pub const DEFAULT_MAX_IMAGE_BYTES: usize = 10 * 1024 * 1024;

/// Image formats the server accepts.
pub const SUPPORTED_IMAGE_TYPES: [&str; 5] = [
    "image/jpeg",
    "image/jpg",
    "image/png",
    "image/gif",
    "image/webp",
];

/// Check a file before uploading it: must be an image, within the size cap,
/// and one of the supported formats.
pub fn validate_image_file(file: &FilePayload, max_bytes: usize) -> Result<(), ApiError> {
    if !file.is_image() {
        return Err(ApiError::new("only image files can be uploaded"));
    }
    if file.size() > max_bytes {
        let max_mb = max_bytes / (1024 * 1024);
        return Err(ApiError::new(format!(
            "file exceeds the {max_mb} MB size limit"
        )));
    }
    if !SUPPORTED_IMAGE_TYPES.contains(&file.mime.as_str()) {
        return Err(ApiError::new(
            "unsupported image format; expected JPEG, PNG, GIF, or WebP",
        ));
    }
    Ok(())
}

impl ApiClient {
    /// Upload an image; the server stores it and returns its URL.
    pub async fn upload_image(&self, file: FilePayload) -> Result<Envelope<UploadedImage>, ApiError> {
        validate_image_file(&file, DEFAULT_MAX_IMAGE_BYTES)?;
        self.upload(endpoints::UPLOAD_IMAGE, file, "image", Some(IMAGE_TIMEOUT))
            .await
    }

    /// Upload an image, reporting `(sent_bytes, total_bytes)` as the body
    /// streams out.
    pub async fn upload_image_with_progress(
        &self,
        file: FilePayload,
        on_progress: impl Fn(u64, u64) + Send + Sync + 'static,
    ) -> Result<Envelope<UploadedImage>, ApiError> {
        validate_image_file(&file, DEFAULT_MAX_IMAGE_BYTES)?;
        let form = file.into_form_with_progress("image", on_progress)?;
        self.request(
            endpoints::UPLOAD_IMAGE,
            RequestOptions::multipart(Method::POST, form).with_timeout(IMAGE_TIMEOUT),
        )
        .await
    }
}

//! Free-text and image intake: the server extracts a structured people
//! record from unstructured input. Both calls run a slow extraction backend,
//! so they carry timeout overrides well above the process default.

use serde::Serialize;

use crate::client::ApiClient;
use crate::config::{endpoints, IMAGE_TIMEOUT, TEXT_TIMEOUT};
use crate::error::ApiError;
use crate::request::FilePayload;
use crate::types::{Envelope, People};

#[derive(Serialize)]
struct RecognizeTextRequest<'a> {
    text: &'a str,
}

impl ApiClient {
    /// Submit free text and get a structured extraction back.
    pub async fn recognize_text(&self, text: &str) -> Result<Envelope<People>, ApiError> {
        self.post_with_timeout(
            endpoints::RECOGNIZE_TEXT,
            &RecognizeTextRequest { text },
            TEXT_TIMEOUT,
        )
        .await
    }

    /// Submit an image and get a structured extraction back.
    ///
    /// Rejects non-image payloads before touching the network.
    pub async fn recognize_image(&self, file: FilePayload) -> Result<Envelope<People>, ApiError> {
        if !file.is_image() {
            return Err(ApiError::new("only image files can be submitted"));
        }
        self.upload(
            endpoints::RECOGNIZE_IMAGE,
            file,
            "image",
            Some(IMAGE_TIMEOUT),
        )
        .await
    }
}

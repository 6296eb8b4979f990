//! Image insertion from a URL prompt or an uploaded file.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

pub const ACCEPTED_IMAGE_TYPE: &str = "image/jpeg";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ImageError {
    #[error("Only JPEG file")]
    UnsupportedType(String),
    #[error("no file selected")]
    NoFile,
    #[error("failed to read image: {0}")]
    Read(String),
    #[error("upload cancelled")]
    Cancelled,
}

/// Result of the URL prompt. Cancelled or blank input inserts nothing.
pub fn url_from_prompt(input: Option<&str>) -> Option<String> {
    let url = input?.trim();
    (!url.is_empty()).then(|| url.to_string())
}

pub fn check_media_type(media_type: &str) -> Result<(), ImageError> {
    if media_type == ACCEPTED_IMAGE_TYPE {
        Ok(())
    } else {
        Err(ImageError::UnsupportedType(media_type.to_string()))
    }
}

/// Same form `FileReader.readAsDataURL` produces.
pub fn to_data_url(media_type: &str, bytes: &[u8]) -> String {
    format!("data:{media_type};base64,{}", STANDARD.encode(bytes))
}

/// Start an upload for a file of `media_type`. A rejected file produces one
/// user-facing message through `notify` and no task.
pub fn begin_upload(media_type: &str, notify: impl FnOnce(String)) -> Option<UploadTask> {
    match UploadTask::begin(media_type) {
        Ok(task) => Some(task),
        Err(e) => {
            tracing::info!(error = %e, media_type, "upload rejected");
            notify(e.to_string());
            None
        }
    }
}

/// One in-flight upload. Tasks never cancel each other; the owning view
/// cancels whatever is still pending when it goes away.
#[derive(Clone, Debug, Default)]
pub struct UploadTask {
    cancelled: Arc<AtomicBool>,
}

impl UploadTask {
    /// Validate the file type up front; no read starts for a rejected file.
    pub fn begin(media_type: &str) -> Result<Self, ImageError> {
        check_media_type(media_type)?;
        Ok(Self::default())
    }

    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Relaxed)
    }

    /// Whether `other` is a handle to this same task.
    pub fn is_same(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.cancelled, &other.cancelled)
    }

    /// Await the file bytes and transcode them into a data URL.
    pub async fn finish<F>(&self, read: F) -> Result<String, ImageError>
    where
        F: Future<Output = Result<Vec<u8>, ImageError>>,
    {
        let bytes = read.await?;
        if self.is_cancelled() {
            return Err(ImageError::Cancelled);
        }
        Ok(to_data_url(ACCEPTED_IMAGE_TYPE, &bytes))
    }
}

/// Read a browser `File` fully into memory.
pub async fn read_file(file: web_sys::File) -> Result<Vec<u8>, ImageError> {
    let buffer = wasm_bindgen_futures::JsFuture::from(file.array_buffer())
        .await
        .map_err(|e| ImageError::Read(format!("{e:?}")))?;
    Ok(js_sys::Uint8Array::new(&buffer).to_vec())
}

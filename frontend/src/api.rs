//! Thin wrappers around the three condition-check REST calls.

use gloo_file::File as GlooFile;
use gloo_net::http::{Request, Response};
use serde::de::DeserializeOwned;
use shared::{ImageId, PredictionId, PredictionJob, PredictionReport, UploadedImage};
use thiserror::Error;

const API_BASE: &str = "/api/v1";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("request failed: {0}")]
    Transport(gloo_net::Error),
    #[error("server responded with status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Decode(gloo_net::Error),
    #[error("could not assemble the upload form")]
    Form,
}

/// POST the photo as a single-part multipart form. The backend validates
/// size and media type; the client only names the field.
pub async fn upload_image(file: &GlooFile) -> Result<UploadedImage, ApiError> {
    let form = web_sys::FormData::new().map_err(|_| ApiError::Form)?;
    form.append_with_blob("image", file.as_ref())
        .map_err(|_| ApiError::Form)?;

    let response = Request::post(&format!("{API_BASE}/images/upload"))
        .body(form)
        .map_err(ApiError::Transport)?
        .send()
        .await
        .map_err(ApiError::Transport)?;
    into_json(response).await
}

/// POST an empty-bodied job request for an already-uploaded image.
pub async fn start_prediction(image: &ImageId) -> Result<PredictionJob, ApiError> {
    let response = Request::post(&format!("{API_BASE}/predict/{image}"))
        .send()
        .await
        .map_err(ApiError::Transport)?;
    into_json(response).await
}

/// GET the current state of a prediction job.
pub async fn fetch_prediction(job: &PredictionId) -> Result<PredictionReport, ApiError> {
    let response = Request::get(&format!("{API_BASE}/predictions/{job}"))
        .send()
        .await
        .map_err(ApiError::Transport)?;
    into_json(response).await
}

async fn into_json<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    if !response.ok() {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        return Err(ApiError::Status { status, body });
    }
    response.json::<T>().await.map_err(ApiError::Decode)
}

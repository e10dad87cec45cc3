//! Upload submission: turn the draft into a job and decide what the user sees.

use std::cell::RefCell;

use crate::config::{
    ERROR_NOTICE_MS, LOGIN_REDIRECT_DELAY_MS, SUCCESS_NOTICE_MS, VALIDATION_NOTICE_MS,
};
use crate::error::{ApiError, ApiResult};
use crate::services::http::{ApiClient, Transport};
use crate::state::draft::{PreviewUrls, UploadDraft};
use crate::state::notice::Notice;
use crate::types::Job;

pub const NO_IMAGES_MESSAGE: &str = "Please select at least one image";
pub const JOB_STARTED_MESSAGE: &str = "Video generation started! Check the job list for progress.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Authentication failed. Please log in again.";

/// Submit the draft as a new generation job.
///
/// An empty draft fails with [`ApiError::LocalValidation`] before any
/// request. On success every image leaves the draft and its preview is
/// revoked; on failure the draft is kept so the user can retry.
pub async fn submit_draft<T, U>(api: &ApiClient<T>, draft: &RefCell<UploadDraft<U>>) -> ApiResult<Job>
where
    T: Transport,
    U: PreviewUrls<File = T::File>,
{
    let Some(submission) = draft.borrow().prepare() else {
        log::warn!("No files selected, aborting upload");
        return Err(ApiError::LocalValidation(NO_IMAGES_MESSAGE.to_string()));
    };

    log::info!(
        "Starting video generation with {} image(s), ratio {}, provider {}",
        submission.images.len(),
        submission.aspect_ratio.as_str(),
        submission.provider.as_str()
    );
    let job = api
        .create_job(
            submission.images,
            &[submission.aspect_ratio],
            Some(submission.provider),
        )
        .await?;

    draft.borrow_mut().clear();
    Ok(job)
}

/// What the upload form shows after a submission attempt.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SubmitFeedback {
    pub notice: Notice,
    /// Navigate to the login page after this delay.
    pub redirect_after_ms: Option<u32>,
}

impl SubmitFeedback {
    pub fn for_result(result: &ApiResult<Job>) -> Self {
        match result {
            Ok(_) => Self {
                notice: Notice::success(JOB_STARTED_MESSAGE, SUCCESS_NOTICE_MS),
                redirect_after_ms: None,
            },
            Err(ApiError::LocalValidation(msg)) => Self {
                notice: Notice::error(msg.clone(), VALIDATION_NOTICE_MS),
                redirect_after_ms: None,
            },
            Err(ApiError::Unauthorized { .. }) => Self {
                notice: Notice::error(SESSION_EXPIRED_MESSAGE, ERROR_NOTICE_MS),
                redirect_after_ms: Some(LOGIN_REDIRECT_DELAY_MS),
            },
            Err(err) => Self {
                notice: Notice::error(err.user_message(), ERROR_NOTICE_MS),
                redirect_after_ms: None,
            },
        }
    }
}

/// Label of the submit button.
pub fn generate_label(uploading: bool, count: usize) -> String {
    match (uploading, count) {
        (true, _) => "Uploading...".to_string(),
        (false, 0) => "Generate Video".to_string(),
        (false, 1) => "Generate Video (1 image)".to_string(),
        (false, n) => format!("Generate Video ({} images)", n),
    }
}

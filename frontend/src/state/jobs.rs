//! Job list state and per-job render plan.
//!
//! [`JobBoard`] holds the last snapshot received from the backend. Every
//! response replaces the whole list; whichever response arrives last wins.
//! [`JobView`] decides which sections of a job card are shown.

use crate::error::{ApiError, ApiResult};
use crate::services::http::{ApiClient, Transport};
use crate::types::{Job, JobStatus};

// =============================================================================
// Board
// =============================================================================

#[derive(Clone, Debug, Default, PartialEq)]
pub struct JobBoard {
    jobs: Vec<Job>,
    loaded: bool,
    closed: bool,
}

impl JobBoard {
    pub fn jobs(&self) -> &[Job] {
        &self.jobs
    }

    /// True until the first response (success or failure) arrives.
    pub fn is_loading(&self) -> bool {
        !self.loaded
    }

    pub fn is_empty(&self) -> bool {
        self.jobs.is_empty()
    }

    pub fn contains(&self, job_id: &str) -> bool {
        self.jobs.iter().any(|job| job.job_id == job_id)
    }

    /// Apply a list response. Returns `true` when the visible list changed.
    ///
    /// Failures keep the previous snapshot. Once closed, responses are
    /// ignored.
    pub fn apply(&mut self, result: ApiResult<Vec<Job>>) -> bool {
        if self.closed {
            log::debug!("Ignoring job list response after teardown");
            return false;
        }
        self.loaded = true;
        match result {
            Ok(jobs) if jobs == self.jobs => false,
            Ok(jobs) => {
                self.jobs = jobs;
                true
            }
            Err(err) => {
                log::error!("Failed to fetch jobs: {}", err);
                false
            }
        }
    }

    /// Stop accepting responses (the list view is gone).
    pub fn close(&mut self) {
        self.closed = true;
    }
}

/// Result of a delete request.
#[derive(Clone, Debug, PartialEq)]
pub enum DeleteOutcome {
    /// Deleted; carries the list fetched right after.
    Refreshed(ApiResult<Vec<Job>>),
    /// The delete itself failed; the list must stay as it is.
    Failed(ApiError),
}

/// Delete a job, then fetch the list again.
pub async fn delete_and_refresh<T: Transport>(api: &ApiClient<T>, job_id: &str) -> DeleteOutcome {
    if let Err(err) = api.delete_job(job_id).await {
        return DeleteOutcome::Failed(err);
    }
    log::info!("🗑️ Deleted job {}", job_id);
    DeleteOutcome::Refreshed(api.list_jobs().await)
}

// =============================================================================
// Render plan
// =============================================================================

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct ClipView {
    pub label: String,
    pub url: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct VideoView {
    pub aspect_ratio: String,
    pub url: String,
}

/// What one job card shows.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct JobView {
    pub job_id: String,
    pub short_id: String,
    pub status_line: String,
    pub status_class: &'static str,
    pub created: String,
    /// Uploaded product images; empty hides the section.
    pub images: Vec<String>,
    /// Intermediate clips; empty hides the section.
    pub clips: Vec<ClipView>,
    /// Final videos, only for completed jobs.
    pub videos: Vec<VideoView>,
    /// Progress percentage, only while processing.
    pub progress: Option<u8>,
    /// Failure reason, only for failed jobs.
    pub error: Option<String>,
}

impl JobView {
    pub fn from_job(job: &Job) -> Self {
        let mut status_line = job.status.label().to_string();
        if job.progress > 0 {
            status_line.push_str(&format!(" - {}%", job.progress));
        }

        let videos = match (&job.status, &job.video_urls) {
            (JobStatus::Completed, Some(urls)) => urls
                .iter()
                .map(|(ratio, url)| VideoView {
                    aspect_ratio: ratio.clone(),
                    url: url.clone(),
                })
                .collect(),
            _ => Vec::new(),
        };

        let error = match job.status {
            JobStatus::Failed => job.error_message.clone().filter(|msg| !msg.is_empty()),
            _ => None,
        };

        Self {
            job_id: job.job_id.clone(),
            short_id: job.job_id.chars().take(8).collect(),
            status_line,
            status_class: job.status.css_class(),
            created: job.created_label(),
            images: job.image_urls.clone().unwrap_or_default(),
            clips: job
                .clips()
                .iter()
                .map(|clip| ClipView {
                    label: format!("Shot {} - {}", clip.shot + 1, clip.aspect_ratio),
                    url: clip.url.clone(),
                })
                .collect(),
            videos,
            progress: (job.status == JobStatus::Processing).then(|| job.progress.min(100)),
            error,
        }
    }

    /// Inline style of the progress fill.
    pub fn progress_style(&self) -> Option<String> {
        self.progress.map(|p| format!("width: {}%", p))
    }
}

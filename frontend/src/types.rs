//! Common types used across the frontend application.
//!
//! # Categories
//!
//! - **Account Types** - users and login tokens
//! - **Job Types** - video generation jobs as returned by the backend
//! - **Option Types** - aspect ratios and video providers offered in the form

use std::collections::BTreeMap;

use chrono::{DateTime, NaiveDateTime};
use serde::{Deserialize, Serialize};

// =============================================================================
// Account Types
// =============================================================================

/// The signed-in user, as returned by `/api/v1/auth/me`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: String,
    pub email: String,
    pub subscription_tier: String,
    pub credits: i64,
}

/// Response of the login endpoint.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

// =============================================================================
// Job Types
// =============================================================================

/// Lifecycle of a generation job.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    /// Accepted, waiting for a worker. The backend calls this `pending`.
    #[serde(alias = "pending")]
    Queued,
    Processing,
    Completed,
    Failed,
}

impl JobStatus {
    /// Upper-case label for the job card.
    pub fn label(&self) -> &'static str {
        match self {
            JobStatus::Queued => "QUEUED",
            JobStatus::Processing => "PROCESSING",
            JobStatus::Completed => "COMPLETED",
            JobStatus::Failed => "FAILED",
        }
    }

    /// Get CSS class for styling.
    pub fn css_class(&self) -> &'static str {
        match self {
            JobStatus::Completed => "status-completed",
            JobStatus::Processing => "status-processing",
            JobStatus::Failed => "status-failed",
            JobStatus::Queued => "status-queued",
        }
    }
}

/// One intermediate clip, generated before final assembly.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct VideoClip {
    /// Zero-based shot index.
    pub shot: u32,
    pub aspect_ratio: String,
    pub url: String,
    /// Seconds; the backend may omit it or send null.
    #[serde(default)]
    pub duration: Option<f64>,
}

/// The parts of the job metadata the client displays. Other keys
/// (storyboard, subtitles, ...) are ignored.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct JobMetadata {
    #[serde(default, deserialize_with = "lenient_clips")]
    pub video_clips: Option<Vec<VideoClip>>,
}

/// Keeps the clips that decode and drops the rest, so one malformed clip
/// does not hide the whole job.
fn lenient_clips<'de, D>(deserializer: D) -> Result<Option<Vec<VideoClip>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let raw = Option::<Vec<serde_json::Value>>::deserialize(deserializer)?;
    Ok(raw.map(|clips| {
        clips
            .into_iter()
            .filter_map(|clip| match serde_json::from_value(clip) {
                Ok(clip) => Some(clip),
                Err(e) => {
                    log::warn!("⚠️ Skipping malformed video clip: {}", e);
                    None
                }
            })
            .collect()
    }))
}

/// A server-tracked video generation job.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Job {
    pub job_id: String,
    pub status: JobStatus,
    #[serde(default)]
    pub progress: u8,
    #[serde(default)]
    pub image_urls: Option<Vec<String>>,
    /// Final videos keyed by aspect ratio.
    #[serde(default)]
    pub video_urls: Option<BTreeMap<String, String>>,
    #[serde(default)]
    pub thumbnail_url: Option<String>,
    #[serde(default)]
    pub error_message: Option<String>,
    #[serde(default)]
    pub job_metadata: Option<JobMetadata>,
    /// ISO-8601 creation time, as sent by the server.
    pub created_at: String,
}

impl Job {
    /// Intermediate clips, empty when the backend sent none.
    pub fn clips(&self) -> &[VideoClip] {
        self.job_metadata
            .as_ref()
            .and_then(|m| m.video_clips.as_deref())
            .unwrap_or_default()
    }

    /// Creation time formatted as `YYYY-MM-DD HH:MM`.
    ///
    /// Accepts RFC 3339 and offset-less ISO timestamps; anything else is
    /// returned unchanged.
    pub fn created_label(&self) -> String {
        const DISPLAY: &str = "%Y-%m-%d %H:%M";
        if let Ok(at) = DateTime::parse_from_rfc3339(&self.created_at) {
            return at.format(DISPLAY).to_string();
        }
        if let Ok(at) = NaiveDateTime::parse_from_str(&self.created_at, "%Y-%m-%dT%H:%M:%S%.f") {
            return at.format(DISPLAY).to_string();
        }
        self.created_at.clone()
    }
}

/// Acknowledgement returned by `DELETE /api/v1/videos/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DeleteAck {
    #[serde(default)]
    pub message: Option<String>,
}

// =============================================================================
// Option Types
// =============================================================================

/// Output frame proportion.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AspectRatio {
    #[default]
    #[serde(rename = "9:16")]
    Portrait,
    #[serde(rename = "1:1")]
    Square,
    #[serde(rename = "16:9")]
    Landscape,
}

impl AspectRatio {
    pub const ALL: [AspectRatio; 3] = [
        AspectRatio::Portrait,
        AspectRatio::Square,
        AspectRatio::Landscape,
    ];

    /// Wire value, also used as the button label.
    pub fn as_str(&self) -> &'static str {
        match self {
            AspectRatio::Portrait => "9:16",
            AspectRatio::Square => "1:1",
            AspectRatio::Landscape => "16:9",
        }
    }
}

/// Backend service that renders the clips.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VideoProvider {
    #[default]
    Seedream,
    #[serde(rename = "openai")]
    OpenAi,
    Kling,
    Veo3,
}

impl VideoProvider {
    pub const ALL: [VideoProvider; 4] = [
        VideoProvider::Seedream,
        VideoProvider::OpenAi,
        VideoProvider::Kling,
        VideoProvider::Veo3,
    ];

    /// Form value sent as `video_provider`.
    pub fn as_str(&self) -> &'static str {
        match self {
            VideoProvider::Seedream => "seedream",
            VideoProvider::OpenAi => "openai",
            VideoProvider::Kling => "kling",
            VideoProvider::Veo3 => "veo3",
        }
    }

    /// Display name in the provider dropdown.
    pub fn label(&self) -> &'static str {
        match self {
            VideoProvider::Seedream => "Seedream",
            VideoProvider::OpenAi => "OpenAI (Sora)",
            VideoProvider::Kling => "Kling AI",
            VideoProvider::Veo3 => "Veo3 (Google)",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.as_str() == value)
    }
}

/// A local file paired with the name it is uploaded under.
#[derive(Clone, Debug, PartialEq)]
pub struct UploadImage<F> {
    pub file: F,
    pub name: String,
}

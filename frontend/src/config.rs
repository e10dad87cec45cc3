//! Application configuration.
//!
//! Centralized configuration for the Frame frontend. Everything is a
//! compile-time constant; the backend URL can be overridden when building
//! with `FRAME_API_URL=https://... trunk build`.

/// Backend URL used when `FRAME_API_URL` is not set (local development).
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// Backend API base URL.
pub const API_URL: &str = match option_env!("FRAME_API_URL") {
    Some(url) => url,
    None => DEFAULT_API_URL,
};

/// Liveness endpoint used to tell "backend down" from "request failed".
pub const HEALTH_PATH: &str = "/health";

/// `localStorage` key holding the bearer token.
pub const TOKEN_STORAGE_KEY: &str = "access_token";

/// Deadline for every API request (30 s).
pub const REQUEST_TIMEOUT_MS: u32 = 30_000;

/// Deadline for the reachability probe.
pub const PROBE_TIMEOUT_MS: u32 = 5_000;

/// Deadline for the start-up session check.
pub const AUTH_CHECK_TIMEOUT_MS: u32 = 10_000;

/// Interval between two job list refreshes.
pub const POLL_INTERVAL_MS: u32 = 5_000;

/// Maximum number of images in one generation request.
pub const MAX_UPLOAD_FILES: usize = 10;

/// File extensions accepted by the dropzone (lowercase, no dot).
pub const ACCEPTED_IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "webp"];

/// Any MIME type under this prefix is accepted by the dropzone.
pub const ACCEPTED_IMAGE_MIME_PREFIX: &str = "image/";

/// How long the "job started" notice stays visible.
pub const SUCCESS_NOTICE_MS: u32 = 5_000;

/// How long the "files rejected" warning stays visible.
pub const REJECTED_NOTICE_MS: u32 = 5_000;

/// How long the "no images selected" message stays visible.
pub const VALIDATION_NOTICE_MS: u32 = 3_000;

/// How long a failed submission stays visible.
pub const ERROR_NOTICE_MS: u32 = 8_000;

/// Delay before sending the user to the login page after a 401.
pub const LOGIN_REDIRECT_DELAY_MS: u32 = 2_000;

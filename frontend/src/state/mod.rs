//! Application state, kept free of view code so it can be unit tested.

pub mod draft;
pub mod jobs;
pub mod notice;
pub mod poll;
pub mod scroll_lock;
pub mod session;
pub mod upload;

pub use draft::{BlobUrls, PreviewTile, UploadDraft};
pub use jobs::{delete_and_refresh, DeleteOutcome, JobBoard, JobView};
pub use notice::{Notice, NoticeKind, NoticeSlot};
pub use poll::{start_polling, PollHandle};
pub use scroll_lock::ScrollLock;
pub use session::{AuthPhase, Session, SessionStore, WebSession};
pub use upload::{generate_label, submit_draft, SubmitFeedback};

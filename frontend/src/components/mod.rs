//! UI Components for the Frame application.
//!
//! # Layout Components
//! - [`Header`] - Navigation bar with the signed-in user and credits
//! - [`Hero`] - Main title and description
//! - [`NoticeBanner`] - Transient success / warning / error messages
//! - [`Footer`] - Page footer
//!
//! # Pages
//! - [`HomePage`] - Start-up auth check, then upload form and job list
//! - [`LoginPage`] - Login and registration form
//!
//! # Feature Components
//! - [`VideoUpload`] - Image dropzone, options and submission
//! - [`JobList`] - Polled list of generation jobs
//! - [`ImageModal`] - Full-size image overlay

mod footer;
mod header;
mod hero;
mod home;
mod image_modal;
mod job_list;
mod login;
mod notice;
mod upload;

pub use footer::*;
pub use header::*;
pub use hero::*;
pub use home::*;
pub use image_modal::*;
pub use job_list::*;
pub use login::*;
pub use notice::*;
pub use upload::*;

use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::*;

use crate::services::http::WebApi;
use crate::state::{Notice, NoticeSlot, Session, WebSession};

// =============================================================================
// Shared context
// =============================================================================

/// Session store plus a signal mirroring its state.
#[derive(Clone, Copy)]
pub struct AuthContext {
    pub store: StoredValue<Rc<WebSession>>,
    pub session: RwSignal<Session>,
}

pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// API client of the current session.
pub fn use_api() -> WebApi {
    use_auth().store.with_value(|store| store.api().clone())
}

pub fn use_notices() -> RwSignal<NoticeSlot> {
    expect_context::<RwSignal<NoticeSlot>>()
}

/// Show `notice` and remove it after its time to live, unless a newer
/// notice replaced it meanwhile.
pub fn flash(slot: RwSignal<NoticeSlot>, notice: Notice) {
    let ttl_ms = notice.ttl_ms;
    let Some(id) = slot.try_update(|s| s.show(notice)) else {
        return;
    };
    Timeout::new(ttl_ms, move || {
        slot.try_update(|s| s.expire(id));
    })
    .forget();
}

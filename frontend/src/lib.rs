//! Frame - Frontend Rust/Leptos Application
//!
//! A WebAssembly client for an AI video generation service: users log in,
//! upload product images, pick generation options and follow their jobs
//! until the videos are ready.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                        App                                   │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Header (user, credits, logout)                              │
//! │  NoticeBanner                                                │
//! ├─────────────────────────────────────────────────────────────┤
//! │  /       HomePage                                            │
//! │          ├── Hero                                            │
//! │          ├── VideoUpload (dropzone, options, ImageModal)     │
//! │          └── JobList (polled, JobCard, ImageModal)           │
//! │  /login  LoginPage                                           │
//! ├─────────────────────────────────────────────────────────────┤
//! │  Footer                                                      │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Modules
//!
//! - [`types`] - Backend data types (Job, User, options)
//! - [`error`] - Error taxonomy and user-facing messages
//! - [`services`] - Backend communication (HTTP wrapper, auth, videos)
//! - [`state`] - Session, upload draft, job board, polling, notices
//! - [`components`] - UI components

use std::rc::Rc;

use leptos::*;
use leptos_meta::*;
use leptos_router::*;

// =============================================================================
// Module declarations
// =============================================================================

pub mod components;
pub mod config;
pub mod error;
pub mod services;
pub mod state;
pub mod types;

#[cfg(test)]
mod testing;

// =============================================================================
// Re-exports
// =============================================================================

// Configuration
pub use config::*;

// Types
pub use types::{
    // Jobs
    Job, JobStatus, JobMetadata, VideoClip, DeleteAck,
    // Options
    AspectRatio, VideoProvider,
    // Auth
    User, LoginResponse,
};

// Errors
pub use error::{ApiError, ApiResult};

// Components
pub use components::*;

// Services
pub use services::*;

// =============================================================================
// Application
// =============================================================================

#[component]
pub fn App() -> impl IntoView {
    provide_meta_context();

    let store = state::WebSession::new(WebApi::browser());
    let session = create_rw_signal(store.session());
    store.subscribe(move |s| {
        let _ = session.try_set(s.clone());
    });
    log::info!(
        "🔐 Session restored: {}",
        if store.is_authenticated() { "token present" } else { "anonymous" }
    );

    provide_context(AuthContext {
        store: store_value(Rc::clone(&store)),
        session,
    });
    provide_context(create_rw_signal(state::NoticeSlot::default()));

    view! {
        <Title text="Frame - AI Video Generation"/>
        <Router>
            <Header/>
            <NoticeBanner/>
            <main>
                <Routes>
                    <Route path="/" view=HomePage/>
                    <Route path="/login" view=LoginPage/>
                </Routes>
            </main>
            <Footer/>
        </Router>
    }
}

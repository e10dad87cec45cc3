//! Home page: start-up auth check, then the upload form and job list.

use leptos::*;
use leptos_router::*;

use crate::components::{use_auth, Hero, JobList, VideoUpload};
use crate::config::AUTH_CHECK_TIMEOUT_MS;
use crate::services::http::with_deadline;
use crate::state::Session;

#[component]
pub fn HomePage() -> impl IntoView {
    let auth = use_auth();

    // A persisted token is only trusted once /auth/me has answered (or the
    // check gave up).
    let checking = create_rw_signal(auth.session.with_untracked(Session::is_authenticated));
    if checking.get_untracked() {
        let store = auth.store.get_value();
        spawn_local(async move {
            if with_deadline(store.fetch_user(), AUTH_CHECK_TIMEOUT_MS).await.is_none() {
                log::warn!("⏱️ Auth check timed out after {}ms", AUTH_CHECK_TIMEOUT_MS);
            }
            let _ = checking.try_set(false);
        });
    }

    view! {
        <div class="container">
            <Hero/>
            <Show
                when=move || !checking.get()
                fallback=|| view! { <div class="loading">"Loading..."</div> }
            >
                <Show
                    when=move || auth.session.with(Session::is_authenticated)
                    fallback=|| view! {
                        <div class="login-prompt">
                            <p>"Please log in to create videos"</p>
                            <A href="/login" class="primary-button">"Log in"</A>
                        </div>
                    }
                >
                    <VideoUpload/>
                    <JobList/>
                </Show>
            </Show>
        </div>
    }
}

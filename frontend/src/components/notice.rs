use leptos::*;

use crate::components::use_notices;
use crate::state::NoticeSlot;

/// The notice currently held by the app-level slot, if any.
#[component]
pub fn NoticeBanner() -> impl IntoView {
    let notices = use_notices();

    move || {
        notices.with(|slot| slot.current().cloned()).map(|notice| {
            view! {
                <div class=notice.kind.css_class() role="status">
                    <span>{notice.text}</span>
                    <button class="notice-close" on:click=move |_| notices.update(NoticeSlot::dismiss)>
                        "×"
                    </button>
                </div>
            }
        })
    }
}

//! Full-size image overlay.

use leptos::*;
use web_sys::MouseEvent;

use crate::state::scroll_lock::{BodyOverflow, ScrollLock};

/// Shows `image_url` over the page while it is `Some`. Page scrolling is
/// locked for as long as the overlay is visible.
#[component]
pub fn ImageModal(
    #[prop(into)] image_url: Signal<Option<String>>,
    #[prop(into)] on_close: Callback<()>,
) -> impl IntoView {
    let lock = store_value(None::<ScrollLock>);

    create_effect(move |_| {
        let open = image_url.with(Option::is_some);
        lock.update_value(|held| match (open, held.is_some()) {
            (true, false) => *held = Some(ScrollLock::acquire(BodyOverflow)),
            (false, true) => *held = None,
            _ => {}
        });
    });

    on_cleanup(move || {
        lock.try_update_value(|held| *held = None);
    });

    move || {
        image_url.get().map(|url| {
            view! {
                <div class="modal-backdrop" on:click=move |_| on_close.call(())>
                    <div class="modal-content" on:click=|ev: MouseEvent| ev.stop_propagation()>
                        <button class="modal-close" on:click=move |_| on_close.call(())>"×"</button>
                        <img src=url alt="Preview" class="modal-image"/>
                    </div>
                </div>
            }
        })
    }
}

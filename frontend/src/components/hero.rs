//! Hero section component

use leptos::*;

#[component]
pub fn Hero() -> impl IntoView {
    view! {
        <div class="hero">
            <h1>"AI Video Generation Platform"</h1>
            <p class="subtitle">
                "Upload product images, pick a format and a provider, "
                "and get short marketing videos back."
            </p>
        </div>
    }
}

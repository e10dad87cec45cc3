//! Login / registration page.

use leptos::*;
use leptos_router::*;
use web_sys::SubmitEvent;

use crate::components::use_auth;

#[component]
pub fn LoginPage() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let email = create_rw_signal(String::new());
    let password = create_rw_signal(String::new());
    let registering = create_rw_signal(false);
    let busy = create_rw_signal(false);
    let error = create_rw_signal(None::<String>);

    let on_submit = move |ev: SubmitEvent| {
        ev.prevent_default();
        if busy.get_untracked() {
            return;
        }

        let store = auth.store.get_value();
        let email = email.get_untracked();
        let password = password.get_untracked();
        let register = registering.get_untracked();
        let navigate = navigate.clone();
        busy.set(true);
        error.set(None);

        spawn_local(async move {
            let result = if register {
                store.register(&email, &password).await
            } else {
                store.login(&email, &password).await
            };
            let _ = busy.try_set(false);
            match result {
                Ok(()) => navigate("/", Default::default()),
                Err(err) => {
                    log::error!("❌ Authentication failed: {}", err);
                    let _ = error.try_set(Some(err.user_message()));
                }
            }
        });
    };

    view! {
        <div class="container">
            <div class="auth-card">
                <h2>{move || if registering.get() { "Create an account" } else { "Log in" }}</h2>
                <form on:submit=on_submit>
                    <label for="email">"Email"</label>
                    <input
                        id="email"
                        type="email"
                        required=true
                        prop:value=move || email.get()
                        on:input=move |ev| email.set(event_target_value(&ev))
                    />
                    <label for="password">"Password"</label>
                    <input
                        id="password"
                        type="password"
                        required=true
                        prop:value=move || password.get()
                        on:input=move |ev| password.set(event_target_value(&ev))
                    />
                    <Show when=move || error.with(Option::is_some)>
                        <div class="error-message">{move || error.get().unwrap_or_default()}</div>
                    </Show>
                    <button type="submit" class="primary-button" disabled=move || busy.get()>
                        {move || match (busy.get(), registering.get()) {
                            (true, _) => "Please wait...",
                            (false, true) => "Register",
                            (false, false) => "Log in",
                        }}
                    </button>
                </form>
                <button
                    class="link-button"
                    on:click=move |_| {
                        registering.update(|r| *r = !*r);
                        error.set(None);
                    }
                >
                    {move || if registering.get() {
                        "Already have an account? Log in"
                    } else {
                        "No account yet? Register"
                    }}
                </button>
            </div>
        </div>
    }
}

use leptos::*;
use leptos_router::*;

use crate::components::use_auth;
use crate::state::Session;

#[component]
pub fn Header() -> impl IntoView {
    let auth = use_auth();
    let navigate = use_navigate();

    let on_logout = Callback::new(move |_: ()| {
        log::info!("👋 Logging out");
        auth.store.with_value(|store| store.logout());
        navigate("/login", Default::default());
    });

    view! {
        <header>
            <div class="header-left">
                <A href="/" class="logo">"FRAME"</A>
                <Show when=move || auth.session.with(Session::is_authenticated)>
                    <span class="badge">
                        {move || match auth.session.with(Session::credits) {
                            Some(credits) => format!("{} credits", credits),
                            None => "-- credits".to_string(),
                        }}
                    </span>
                </Show>
            </div>
            <div class="header-right">
                <Show
                    when=move || auth.session.with(Session::is_authenticated)
                    fallback=|| view! { <A href="/login" class="header-button">"Login"</A> }
                >
                    <span class="user-email">
                        {move || auth.session.with(|s| s.user.as_ref().map(|u| u.email.clone()).unwrap_or_default())}
                    </span>
                    <button class="header-button" on:click=move |_| on_logout.call(())>
                        "Logout"
                    </button>
                </Show>
            </div>
        </header>
    }
}

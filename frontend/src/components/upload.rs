//! Image upload form with drag & drop support.
//!
//! Handles file selection, generation options and submission to the backend.

use std::cell::RefCell;
use std::rc::Rc;

use gloo_timers::callback::Timeout;
use leptos::*;
use leptos_router::*;
use wasm_bindgen::JsCast;
use web_sys::{DragEvent, Event, FileList, HtmlInputElement, MouseEvent};

use crate::components::{flash, use_auth, use_notices, ImageModal};
use crate::state::{generate_label, submit_draft, BlobUrls, PreviewTile, Session, SubmitFeedback, UploadDraft};
use crate::types::{AspectRatio, VideoProvider};

type Draft = Rc<RefCell<UploadDraft<BlobUrls>>>;

#[component]
pub fn VideoUpload() -> impl IntoView {
    let auth = use_auth();
    let notices = use_notices();
    let navigate = use_navigate();

    let draft: StoredValue<Draft> = store_value(Rc::new(RefCell::new(UploadDraft::new(BlobUrls))));
    let tiles = create_rw_signal(Vec::<PreviewTile>::new());
    let aspect_ratio = create_rw_signal(AspectRatio::default());
    let provider = create_rw_signal(VideoProvider::default());
    let uploading = create_rw_signal(false);
    let dragging = create_rw_signal(false);
    let enlarged = create_rw_signal(None::<String>);

    let refresh_tiles = move || {
        let _ = tiles.try_set(draft.with_value(|d| d.borrow().tiles()));
    };

    let take_files = move |files: Vec<web_sys::File>| {
        if files.is_empty() || uploading.get_untracked() {
            return;
        }
        let outcome = draft.with_value(|d| d.borrow_mut().accept_drop(files));
        if let Some(warning) = outcome.warning() {
            flash(notices, warning);
        }
        if outcome.truncated > 0 {
            log::warn!("Only the first {} images were kept", outcome.accepted);
        }
        log::info!("🖼️ {} image(s) selected", outcome.accepted);
        refresh_tiles();
    };

    let on_file_change = move |ev: Event| {
        let input: HtmlInputElement = event_target(&ev);
        take_files(files_of(input.files()));
        // Selecting the same file again must fire `change`.
        input.set_value("");
    };

    let on_drop = move |ev: DragEvent| {
        ev.prevent_default();
        dragging.set(false);
        take_files(files_of(ev.data_transfer().and_then(|dt| dt.files())));
    };

    let trigger_file_input = move |_| {
        if let Some(input) = gloo_utils::document().get_element_by_id("imageInput") {
            if let Some(html_input) = input.dyn_ref::<HtmlInputElement>() {
                html_input.click();
            }
        }
    };

    let remove_tile = move |index: usize| {
        if draft.with_value(|d| d.borrow_mut().remove(index)) {
            refresh_tiles();
        }
    };

    let on_generate = move |_| {
        if uploading.get_untracked() {
            return;
        }
        let store = auth.store.get_value();
        let draft = draft.get_value();
        {
            let mut d = draft.borrow_mut();
            d.aspect_ratio = aspect_ratio.get_untracked();
            d.provider = provider.get_untracked();
        }
        let navigate = navigate.clone();
        uploading.set(true);

        spawn_local(async move {
            let result = submit_draft(store.api(), &*draft).await;
            match &result {
                Ok(job) => log::info!("✅ Job {} created", job.job_id),
                Err(err) => log::error!("❌ Upload failed: {}", err),
            }

            let feedback = SubmitFeedback::for_result(&result);
            flash(notices, feedback.notice);
            let _ = tiles.try_set(draft.borrow().tiles());
            let _ = uploading.try_set(false);

            if let Some(delay_ms) = feedback.redirect_after_ms {
                Timeout::new(delay_ms, move || navigate("/login", Default::default())).forget();
            } else if result.is_ok() {
                // Credits were spent.
                store.fetch_user().await;
            }
        });
    };

    {
        let draft = draft.get_value();
        on_cleanup(move || draft.borrow_mut().clear());
    }

    view! {
        <div class="upload-card">
            <div class="upload-header">
                <h2>"Create a video"</h2>
                <span class="badge">
                    {move || auth.session.with(Session::credits).map(|c| format!("{} credits left", c)).unwrap_or_default()}
                </span>
            </div>

            <div
                class="upload-section"
                class:dragging=move || dragging.get()
                id="uploadZone"
                on:click=trigger_file_input
                on:dragover=move |ev: DragEvent| {
                    ev.prevent_default();
                    dragging.set(true);
                }
                on:dragleave=move |_| dragging.set(false)
                on:drop=on_drop
            >
                <div class="upload-icon">"📤"</div>
                <div class="upload-text">"Drop product images here"</div>
                <div class="upload-hint">"or click to select (PNG, JPG, JPEG, WEBP, up to 10)"</div>
                <input
                    type="file"
                    id="imageInput"
                    accept="image/*"
                    multiple=true
                    style="display:none"
                    on:click=|ev: MouseEvent| ev.stop_propagation()
                    on:change=on_file_change
                />
            </div>

            <Show when=move || !tiles.with(Vec::is_empty)>
                <div class="preview-grid">
                    <For
                        each=move || tiles.get().into_iter().enumerate()
                        key=|(index, tile)| (*index, tile.clone())
                        children=move |(index, tile)| {
                            let PreviewTile { name, url } = tile;
                            let src = url.clone().unwrap_or_default();
                            let alt = name.clone();
                            view! {
                                <div class="preview-tile">
                                    <img
                                        src=src
                                        alt=alt
                                        on:click=move |_| enlarged.set(url.clone())
                                    />
                                    <button
                                        class="remove-button"
                                        title="Remove image"
                                        on:click=move |ev: MouseEvent| {
                                            ev.stop_propagation();
                                            remove_tile(index);
                                        }
                                    >
                                        "×"
                                    </button>
                                    <span class="preview-name">{name}</span>
                                </div>
                            }
                        }
                    />
                </div>
            </Show>

            <div class="options">
                <div class="option-group">
                    <span class="option-label">"Aspect ratio"</span>
                    {AspectRatio::ALL
                        .into_iter()
                        .map(|ratio| view! {
                            <button
                                class="ratio-button"
                                class:selected=move || aspect_ratio.get() == ratio
                                on:click=move |_| aspect_ratio.set(ratio)
                            >
                                {ratio.as_str()}
                            </button>
                        })
                        .collect_view()}
                </div>
                <div class="option-group">
                    <label class="option-label" for="providerSelect">"Provider"</label>
                    <select
                        id="providerSelect"
                        prop:value=move || provider.get().as_str()
                        on:change=move |ev| {
                            if let Some(choice) = VideoProvider::parse(&event_target_value(&ev)) {
                                provider.set(choice);
                            }
                        }
                    >
                        {VideoProvider::ALL
                            .into_iter()
                            .map(|p| view! { <option value=p.as_str()>{p.label()}</option> })
                            .collect_view()}
                    </select>
                </div>
            </div>

            <button
                class="primary-button generate-button"
                disabled=move || uploading.get() || tiles.with(Vec::is_empty)
                on:click=on_generate
            >
                {move || generate_label(uploading.get(), tiles.with(Vec::len))}
            </button>

            <ImageModal image_url=enlarged on_close=move |_| enlarged.set(None)/>
        </div>
    }
}

fn files_of(list: Option<FileList>) -> Vec<web_sys::File> {
    let Some(list) = list else {
        return Vec::new();
    };
    (0..list.length()).filter_map(|i| list.get(i)).collect()
}

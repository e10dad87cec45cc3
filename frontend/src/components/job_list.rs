//! Polled list of generation jobs.

use leptos::*;
use web_sys::MouseEvent;

use crate::components::{use_api, ImageModal};
use crate::config::POLL_INTERVAL_MS;
use crate::state::jobs::{ClipView, VideoView};
use crate::state::{delete_and_refresh, start_polling, DeleteOutcome, JobBoard, JobView};

const CONFIRM_DELETE: &str = "Are you sure you want to delete this job?";
const DELETE_FAILED: &str = "Failed to delete job";

#[component]
pub fn JobList() -> impl IntoView {
    let api = use_api();
    let board = create_rw_signal(JobBoard::default());
    let enlarged = create_rw_signal(None::<String>);

    let poller = {
        let api = api.clone();
        start_polling(POLL_INTERVAL_MS, move || {
            let api = api.clone();
            async move {
                let result = api.list_jobs().await;
                board.try_update(|b| b.apply(result));
            }
        })
    };

    on_cleanup(move || {
        poller.cancel();
        board.try_update(JobBoard::close);
    });

    let views = create_memo(move |_| {
        board.with(|b| b.jobs().iter().map(JobView::from_job).collect::<Vec<_>>())
    });

    let on_delete = Callback::new(move |job_id: String| {
        let confirmed = gloo_utils::window()
            .confirm_with_message(CONFIRM_DELETE)
            .unwrap_or(false);
        if !confirmed {
            return;
        }

        let api = api.clone();
        spawn_local(async move {
            match delete_and_refresh(&api, &job_id).await {
                DeleteOutcome::Refreshed(result) => {
                    board.try_update(|b| b.apply(result));
                }
                DeleteOutcome::Failed(err) => {
                    log::error!("❌ Failed to delete job {}: {}", job_id, err);
                    let _ = gloo_utils::window().alert_with_message(DELETE_FAILED);
                }
            }
        });
    });

    let on_preview = Callback::new(move |url: String| enlarged.set(Some(url)));

    view! {
        <div class="job-list">
            <h2>"Your Videos"</h2>
            {move || {
                if board.with(JobBoard::is_loading) {
                    view! { <div class="loading">"Loading..."</div> }.into_view()
                } else if views.with(Vec::is_empty) {
                    view! { <div class="empty-state">"No videos yet. Create your first video!"</div> }.into_view()
                } else {
                    view! {
                        <For
                            each=move || views.get()
                            key=|job| job.clone()
                            children=move |job| view! { <JobCard job=job on_delete=on_delete on_preview=on_preview/> }
                        />
                    }
                    .into_view()
                }
            }}
            <ImageModal image_url=enlarged on_close=move |_| enlarged.set(None)/>
        </div>
    }
}

#[component]
fn JobCard(job: JobView, on_delete: Callback<String>, on_preview: Callback<String>) -> impl IntoView {
    let progress_style = job.progress_style();
    let JobView {
        job_id,
        short_id,
        status_line,
        status_class,
        created,
        images,
        clips,
        videos,
        error,
        ..
    } = job;

    view! {
        <div class="job-card">
            <div class="job-header">
                <div>
                    <h3>"Job #" {short_id}</h3>
                    <p class="job-date">{created}</p>
                </div>
                <div class="job-actions">
                    <span class=format!("job-status {}", status_class)>{status_line}</span>
                    <button
                        class="delete-button"
                        title="Delete job"
                        on:click=move |_| on_delete.call(job_id.clone())
                    >
                        "🗑️"
                    </button>
                </div>
            </div>

            {(!images.is_empty()).then(|| view! {
                <div class="job-section">
                    <h4>"Product Images"</h4>
                    <div class="image-grid">
                        {images
                            .into_iter()
                            .map(|url| {
                                let src = url.clone();
                                view! {
                                    <img
                                        src=src
                                        alt="Product image"
                                        class="job-image"
                                        on:click=move |ev: MouseEvent| {
                                            ev.stop_propagation();
                                            on_preview.call(url.clone());
                                        }
                                    />
                                }
                            })
                            .collect_view()}
                    </div>
                </div>
            })}

            {(!clips.is_empty()).then(|| view! {
                <div class="job-section">
                    <h4>"Video Clips"</h4>
                    <div class="clip-grid">
                        {clips.into_iter().map(clip_block).collect_view()}
                    </div>
                </div>
            })}

            {(!videos.is_empty()).then(|| view! {
                <div class="job-section">
                    <h4>"Generated Videos"</h4>
                    {videos.into_iter().map(video_block).collect_view()}
                </div>
            })}

            {progress_style.map(|style| view! {
                <div class="progress-bar">
                    <div class="progress-fill" style=style></div>
                </div>
            })}

            {error.map(|msg| view! { <div class="job-error">"Error: " {msg}</div> })}
        </div>
    }
}

fn clip_block(clip: ClipView) -> impl IntoView {
    let ClipView { label, url } = clip;
    view! {
        <div class="clip-block">
            <p class="clip-label">{label}</p>
            <video src=url controls=true class="job-video"></video>
        </div>
    }
}

fn video_block(video: VideoView) -> impl IntoView {
    let VideoView { aspect_ratio, url } = video;
    let href = url.clone();
    view! {
        <div class="video-block">
            <p class="video-ratio">{aspect_ratio}</p>
            <video src=url controls=true class="job-video"></video>
            <a href=href class="download-link" download="" target="_blank">"⬇️ Download"</a>
        </div>
    }
}

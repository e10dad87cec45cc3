//! Fixed-interval polling.
//!
//! A tick runs to completion before the next sleep starts, so two polls
//! from the same loop never overlap. Cancelling stops the loop at its next
//! await point; a request already in flight is left to finish and its
//! result must be dropped by the caller.

use std::future::Future;

use futures::future::{AbortHandle, Abortable};
use gloo_timers::future::TimeoutFuture;

/// Run `tick`, sleep, repeat until `handle` is aborted.
pub async fn poll_loop<T, TF, S, SF>(mut tick: T, mut sleep: S, handle: AbortHandle)
where
    T: FnMut() -> TF,
    TF: Future<Output = ()>,
    S: FnMut() -> SF,
    SF: Future<Output = ()>,
{
    loop {
        tick().await;
        if handle.is_aborted() {
            break;
        }
        sleep().await;
        if handle.is_aborted() {
            break;
        }
    }
}

/// Poll immediately, then every `interval_ms`, on the leptos executor.
pub fn start_polling<T, TF>(interval_ms: u32, tick: T) -> PollHandle
where
    T: FnMut() -> TF + 'static,
    TF: Future<Output = ()> + 'static,
{
    let (abort, registration) = AbortHandle::new_pair();
    let inner = poll_loop(tick, move || TimeoutFuture::new(interval_ms), abort.clone());
    leptos::spawn_local(async move {
        let _ = Abortable::new(inner, registration).await;
        log::debug!("⏹️ Polling stopped");
    });
    log::debug!("⏱️ Polling every {}ms", interval_ms);
    PollHandle { abort }
}

/// Stops the loop when cancelled or dropped.
#[derive(Debug)]
pub struct PollHandle {
    abort: AbortHandle,
}

impl PollHandle {
    pub fn cancel(&self) {
        self.abort.abort();
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.abort.abort();
    }
}

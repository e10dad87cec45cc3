//! Test doubles shared by the unit tests.

use std::cell::{Cell, RefCell};
use std::collections::{BTreeSet, VecDeque};
use std::rc::Rc;

use serde_json::{json, Value};

use crate::services::http::{ApiClient, HttpRequest, HttpResponse, Transport, TransportError};
use crate::services::storage::MemoryTokenStore;
use crate::state::draft::{ImageFile, PreviewUrls};

/// A local file as seen by the dropzone.
#[derive(Debug, Clone, PartialEq)]
pub struct FakeFile {
    pub name: String,
    pub mime: String,
}

impl FakeFile {
    pub fn new(name: &str, mime: &str) -> Self {
        Self {
            name: name.to_string(),
            mime: mime.to_string(),
        }
    }

    pub fn png(name: &str) -> Self {
        Self::new(name, "image/png")
    }
}

impl ImageFile for FakeFile {
    fn file_name(&self) -> String {
        self.name.clone()
    }

    fn mime_type(&self) -> String {
        self.mime.clone()
    }
}

#[derive(Default)]
struct FakeInner {
    replies: RefCell<VecDeque<Result<HttpResponse, TransportError>>>,
    requests: RefCell<Vec<HttpRequest<FakeFile>>>,
    probes: RefCell<Vec<String>>,
    healthy: Cell<bool>,
}

/// Scripted transport: replies are consumed in order, requests recorded.
#[derive(Clone, Default)]
pub struct FakeTransport {
    inner: Rc<FakeInner>,
}

impl FakeTransport {
    pub fn reply(&self, status: u16, body: &str) {
        self.inner.replies.borrow_mut().push_back(Ok(HttpResponse {
            status,
            body: body.to_string(),
        }));
    }

    pub fn fail(&self, error: TransportError) {
        self.inner.replies.borrow_mut().push_back(Err(error));
    }

    pub fn set_healthy(&self, healthy: bool) {
        self.inner.healthy.set(healthy);
    }

    pub fn requests(&self) -> Vec<HttpRequest<FakeFile>> {
        self.inner.requests.borrow().clone()
    }

    pub fn request_count(&self) -> usize {
        self.inner.requests.borrow().len()
    }

    pub fn probed_urls(&self) -> Vec<String> {
        self.inner.probes.borrow().clone()
    }

    pub fn probe_count(&self) -> usize {
        self.inner.probes.borrow().len()
    }
}

impl Transport for FakeTransport {
    type File = FakeFile;

    async fn send(&self, request: HttpRequest<FakeFile>) -> Result<HttpResponse, TransportError> {
        let url = request.url.clone();
        self.inner.requests.borrow_mut().push(request);
        self.inner
            .replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected request to {}", url))
    }

    async fn probe(&self, url: &str) -> bool {
        self.inner.probes.borrow_mut().push(url.to_string());
        self.inner.healthy.get()
    }
}

pub fn client(transport: &FakeTransport, tokens: &MemoryTokenStore) -> ApiClient<FakeTransport> {
    ApiClient::new("http://api.test/", transport.clone(), Rc::new(tokens.clone()))
}

pub fn job_json(job_id: &str, status: &str, progress: u8) -> Value {
    json!({
        "job_id": job_id,
        "status": status,
        "progress": progress,
        "image_urls": null,
        "video_urls": null,
        "thumbnail_url": null,
        "error_message": null,
        "job_metadata": {},
        "created_at": "2025-03-01T10:15:30+00:00",
    })
}

pub fn user_json(credits: i64) -> Value {
    json!({
        "id": "user-1",
        "email": "ada@example.com",
        "subscription_tier": "free",
        "credits": credits,
    })
}

/// Object URL registry that tracks which previews are still alive.
#[derive(Clone, Default)]
pub struct RecordingUrls {
    live: Rc<RefCell<BTreeSet<String>>>,
    created: Rc<Cell<usize>>,
}

impl RecordingUrls {
    pub fn live(&self) -> Vec<String> {
        self.live.borrow().iter().cloned().collect()
    }

    pub fn created(&self) -> usize {
        self.created.get()
    }
}

impl PreviewUrls for RecordingUrls {
    type File = FakeFile;

    fn create(&self, file: &FakeFile) -> Option<String> {
        let n = self.created.get() + 1;
        self.created.set(n);
        let url = format!("blob:test/{}/{}", n, file.name);
        self.live.borrow_mut().insert(url.clone());
        Some(url)
    }

    fn revoke(&self, url: &str) {
        self.live.borrow_mut().remove(url);
    }
}

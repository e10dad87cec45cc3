//! Upload draft: the images and options picked before a job is submitted.
//!
//! The draft owns one preview object URL per image and revokes it whenever
//! the image leaves the draft (replaced, removed, submitted or dropped), so
//! previews never outlive their file.

use crate::config::{ACCEPTED_IMAGE_EXTENSIONS, ACCEPTED_IMAGE_MIME_PREFIX, MAX_UPLOAD_FILES, REJECTED_NOTICE_MS};
use crate::state::notice::Notice;
use crate::types::{AspectRatio, UploadImage, VideoProvider};

// =============================================================================
// Files and preview URLs
// =============================================================================

/// A local file the dropzone can inspect.
pub trait ImageFile: Clone {
    fn file_name(&self) -> String;
    fn mime_type(&self) -> String;
}

impl ImageFile for web_sys::File {
    fn file_name(&self) -> String {
        self.name()
    }

    fn mime_type(&self) -> String {
        self.type_()
    }
}

/// Creates and releases preview URLs for local files.
pub trait PreviewUrls {
    type File: ImageFile;

    fn create(&self, file: &Self::File) -> Option<String>;
    fn revoke(&self, url: &str);
}

/// `URL.createObjectURL` / `URL.revokeObjectURL`.
#[derive(Debug, Clone, Copy, Default)]
pub struct BlobUrls;

impl PreviewUrls for BlobUrls {
    type File = web_sys::File;

    fn create(&self, file: &web_sys::File) -> Option<String> {
        web_sys::Url::create_object_url_with_blob(file)
            .map_err(|e| log::warn!("Could not create preview for {}: {:?}", file.name(), e))
            .ok()
    }

    fn revoke(&self, url: &str) {
        if let Err(e) = web_sys::Url::revoke_object_url(url) {
            log::warn!("Could not revoke preview {}: {:?}", url, e);
        }
    }
}

/// Whether the dropzone accepts this file as a product image.
pub fn is_accepted_image(name: &str, mime: &str) -> bool {
    let extension_ok = name
        .rsplit_once('.')
        .map(|(_, ext)| {
            let ext = ext.to_ascii_lowercase();
            ACCEPTED_IMAGE_EXTENSIONS.contains(&ext.as_str())
        })
        .unwrap_or(false);
    extension_ok || mime.starts_with(ACCEPTED_IMAGE_MIME_PREFIX)
}

// =============================================================================
// Draft
// =============================================================================

#[derive(Debug, Clone)]
pub struct DraftEntry<F> {
    pub file: F,
    pub name: String,
    pub preview_url: Option<String>,
}

/// What the UI needs to render one selected image.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PreviewTile {
    pub name: String,
    pub url: Option<String>,
}

/// Result of a drop or file selection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DropOutcome {
    /// Images now in the draft.
    pub accepted: usize,
    /// Names of files that are not images.
    pub rejected: Vec<String>,
    /// Accepted images dropped because of the size cap.
    pub truncated: usize,
}

impl DropOutcome {
    /// Transient warning to show, if any file was rejected.
    pub fn warning(&self) -> Option<Notice> {
        if self.rejected.is_empty() {
            return None;
        }
        Some(Notice::warning(
            "Some files were rejected. Please use PNG, JPG, or JPEG format.",
            REJECTED_NOTICE_MS,
        ))
    }
}

/// Everything the backend needs to start a job.
#[derive(Debug, Clone, PartialEq)]
pub struct Submission<F> {
    pub images: Vec<UploadImage<F>>,
    pub aspect_ratio: AspectRatio,
    pub provider: VideoProvider,
}

/// Images and options being composed. Never holds more than
/// [`MAX_UPLOAD_FILES`] images.
pub struct UploadDraft<U: PreviewUrls> {
    urls: U,
    entries: Vec<DraftEntry<U::File>>,
    pub aspect_ratio: AspectRatio,
    pub provider: VideoProvider,
}

impl<U: PreviewUrls> UploadDraft<U> {
    pub fn new(urls: U) -> Self {
        Self {
            urls,
            entries: Vec::new(),
            aspect_ratio: AspectRatio::default(),
            provider: VideoProvider::default(),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[DraftEntry<U::File>] {
        &self.entries
    }

    pub fn tiles(&self) -> Vec<PreviewTile> {
        self.entries
            .iter()
            .map(|entry| PreviewTile {
                name: entry.name.clone(),
                url: entry.preview_url.clone(),
            })
            .collect()
    }

    /// Take the files of a drop or selection.
    ///
    /// Accepted images replace the current selection, capped to the first
    /// [`MAX_UPLOAD_FILES`]. When nothing is accepted the draft is left alone.
    pub fn accept_drop(&mut self, files: Vec<U::File>) -> DropOutcome {
        let (accepted, rejected): (Vec<_>, Vec<_>) = files
            .into_iter()
            .partition(|file| is_accepted_image(&file.file_name(), &file.mime_type()));

        let rejected: Vec<String> = rejected.iter().map(ImageFile::file_name).collect();
        if !rejected.is_empty() {
            log::warn!("Rejected files: {:?}", rejected);
        }
        if accepted.is_empty() {
            return DropOutcome {
                accepted: 0,
                rejected,
                truncated: 0,
            };
        }

        let truncated = accepted.len().saturating_sub(MAX_UPLOAD_FILES);
        self.release_all();
        self.entries = accepted
            .into_iter()
            .take(MAX_UPLOAD_FILES)
            .map(|file| DraftEntry {
                name: file.file_name(),
                preview_url: self.urls.create(&file),
                file,
            })
            .collect();

        DropOutcome {
            accepted: self.entries.len(),
            rejected,
            truncated,
        }
    }

    /// Remove one image. Returns `false` when `index` is out of range.
    pub fn remove(&mut self, index: usize) -> bool {
        if index >= self.entries.len() {
            return false;
        }
        let entry = self.entries.remove(index);
        if let Some(url) = entry.preview_url {
            self.urls.revoke(&url);
        }
        true
    }

    /// Drop every image and release its preview. Options are kept.
    pub fn clear(&mut self) {
        self.release_all();
    }

    /// Snapshot for submission, `None` when no image is selected.
    pub fn prepare(&self) -> Option<Submission<U::File>> {
        if self.entries.is_empty() {
            return None;
        }
        Some(Submission {
            images: self
                .entries
                .iter()
                .map(|entry| UploadImage {
                    file: entry.file.clone(),
                    name: entry.name.clone(),
                })
                .collect(),
            aspect_ratio: self.aspect_ratio,
            provider: self.provider,
        })
    }

    fn release_all(&mut self) {
        for entry in self.entries.drain(..) {
            if let Some(url) = entry.preview_url {
                self.urls.revoke(&url);
            }
        }
    }
}

impl<U: PreviewUrls> Drop for UploadDraft<U> {
    fn drop(&mut self) {
        self.release_all();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{FakeFile, RecordingUrls};

    fn pngs(n: usize) -> Vec<FakeFile> {
        (0..n).map(|i| FakeFile::png(&format!("shot-{}.png", i))).collect()
    }

    #[test]
    fn test_accepted_image_types() {
        assert!(is_accepted_image("a.PNG", ""));
        assert!(is_accepted_image("a.jpeg", "image/jpeg"));
        assert!(is_accepted_image("blob", "image/webp"));
        assert!(is_accepted_image("anim.gif", "image/gif"));
        assert!(is_accepted_image("scan", "image/tiff"));
        assert!(!is_accepted_image("notes.txt", "text/plain"));
        assert!(!is_accepted_image("clip.mp4", "video/mp4"));
    }

    #[test]
    fn test_drop_is_capped_to_first_ten() {
        let urls = RecordingUrls::default();
        let mut draft = UploadDraft::new(urls.clone());

        let outcome = draft.accept_drop(pngs(13));

        assert_eq!(outcome.accepted, 10);
        assert_eq!(outcome.truncated, 3);
        assert_eq!(draft.len(), 10);
        assert_eq!(draft.entries()[0].name, "shot-0.png");
        assert_eq!(draft.entries()[9].name, "shot-9.png");
        assert_eq!(urls.created(), 10);
    }

    #[test]
    fn test_drop_replaces_and_revokes_previous_selection() {
        let urls = RecordingUrls::default();
        let mut draft = UploadDraft::new(urls.clone());
        draft.accept_drop(pngs(3));

        draft.accept_drop(vec![FakeFile::png("new.png")]);

        assert_eq!(draft.len(), 1);
        assert_eq!(urls.live().len(), 1);
        assert!(urls.live()[0].ends_with("new.png"));
    }

    #[test]
    fn test_rejected_files_warn_without_touching_draft() {
        let urls = RecordingUrls::default();
        let mut draft = UploadDraft::new(urls.clone());
        draft.accept_drop(pngs(2));

        let outcome = draft.accept_drop(vec![FakeFile::new("doc.pdf", "application/pdf")]);

        assert_eq!(outcome.accepted, 0);
        assert_eq!(outcome.rejected, vec!["doc.pdf".to_string()]);
        let warning = outcome.warning().unwrap();
        assert_eq!(warning.ttl_ms, REJECTED_NOTICE_MS);
        assert_eq!(draft.len(), 2);
    }

    #[test]
    fn test_mixed_drop_keeps_only_images() {
        let mut draft = UploadDraft::new(RecordingUrls::default());
        let outcome = draft.accept_drop(vec![
            FakeFile::png("a.png"),
            FakeFile::new("b.txt", "text/plain"),
            FakeFile::new("c.jpg", "image/jpeg"),
        ]);
        assert_eq!(outcome.accepted, 2);
        assert!(outcome.warning().is_some());
        let names: Vec<_> = draft.tiles().into_iter().map(|t| t.name).collect();
        assert_eq!(names, vec!["a.png", "c.jpg"]);
    }

    #[test]
    fn test_remove_revokes_preview() {
        let urls = RecordingUrls::default();
        let mut draft = UploadDraft::new(urls.clone());
        draft.accept_drop(pngs(3));

        assert!(draft.remove(1));
        assert!(!draft.remove(5));

        assert_eq!(draft.len(), 2);
        assert_eq!(urls.live().len(), 2);
        assert!(urls.live().iter().all(|url| !url.ends_with("shot-1.png")));
    }

    #[test]
    fn test_clear_and_drop_release_everything() {
        let urls = RecordingUrls::default();
        let mut draft = UploadDraft::new(urls.clone());
        draft.accept_drop(pngs(4));
        draft.clear();
        assert!(draft.is_empty());
        assert!(urls.live().is_empty());

        draft.accept_drop(pngs(2));
        drop(draft);
        assert!(urls.live().is_empty());
    }

    #[test]
    fn test_prepare_snapshot() {
        let mut draft = UploadDraft::new(RecordingUrls::default());
        assert!(draft.prepare().is_none());

        draft.accept_drop(pngs(2));
        draft.aspect_ratio = AspectRatio::Landscape;
        draft.provider = VideoProvider::Veo3;
        let submission = draft.prepare().unwrap();

        assert_eq!(submission.images.len(), 2);
        assert_eq!(submission.images[1].name, "shot-1.png");
        assert_eq!(submission.aspect_ratio, AspectRatio::Landscape);
        assert_eq!(submission.provider, VideoProvider::Veo3);
        assert_eq!(draft.len(), 2);
    }
}

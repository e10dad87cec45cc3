//! Video job endpoints.

use serde_json::Value;

use crate::config::MAX_UPLOAD_FILES;
use crate::error::{ApiError, ApiResult};
use crate::services::http::{ApiClient, Body, FormPart, Method, Transport};
use crate::types::{AspectRatio, DeleteAck, Job, UploadImage, VideoProvider};

const JOBS_PATH: &str = "/api/v1/videos/";

fn job_path(job_id: &str) -> String {
    format!("/api/v1/videos/{}", job_id)
}

impl<T: Transport> ApiClient<T> {
    /// Start a generation job from up to ten product images.
    ///
    /// Every image is sent as a repeated `images` part; the ratios travel
    /// comma-joined in `aspect_ratios`.
    pub async fn create_job(
        &self,
        images: Vec<UploadImage<T::File>>,
        aspect_ratios: &[AspectRatio],
        provider: Option<VideoProvider>,
    ) -> ApiResult<Job> {
        if images.is_empty() {
            return Err(ApiError::LocalValidation(
                "Please select at least one image".to_string(),
            ));
        }
        if images.len() > MAX_UPLOAD_FILES {
            return Err(ApiError::LocalValidation(format!(
                "Maximum {} images allowed",
                MAX_UPLOAD_FILES
            )));
        }

        let count = images.len();
        let mut parts: Vec<FormPart<T::File>> = images
            .into_iter()
            .map(|image| FormPart::File {
                name: "images".to_string(),
                file: image.file,
                file_name: image.name,
            })
            .collect();
        let ratios = aspect_ratios
            .iter()
            .map(AspectRatio::as_str)
            .collect::<Vec<_>>()
            .join(",");
        parts.push(FormPart::Text {
            name: "aspect_ratios".to_string(),
            value: ratios,
        });
        if let Some(provider) = provider {
            parts.push(FormPart::Text {
                name: "video_provider".to_string(),
                value: provider.as_str().to_string(),
            });
        }

        log::info!("📤 Submitting {} image(s) for video generation", count);
        self.send_json(Method::Post, JOBS_PATH, Body::Multipart(parts)).await
    }

    /// All jobs of the current user, newest first.
    ///
    /// Entries that do not decode are logged and left out, the rest of the
    /// list is still shown.
    pub async fn list_jobs(&self) -> ApiResult<Vec<Job>> {
        let entries: Vec<Value> = self.get_json(JOBS_PATH).await?;
        Ok(entries
            .into_iter()
            .filter_map(|entry| match serde_json::from_value::<Job>(entry) {
                Ok(job) => Some(job),
                Err(e) => {
                    log::warn!("⚠️ Skipping job that failed to decode: {}", e);
                    None
                }
            })
            .collect())
    }

    pub async fn get_job(&self, job_id: &str) -> ApiResult<Job> {
        self.get_json(&job_path(job_id)).await
    }

    pub async fn delete_job(&self, job_id: &str) -> ApiResult<DeleteAck> {
        self.send_json(Method::Delete, &job_path(job_id), Body::Empty).await
    }
}

#[cfg(test)]
mod tests {
    use futures::executor::block_on;
    use serde_json::json;

    use super::*;
    use crate::services::storage::MemoryTokenStore;
    use crate::testing::{client, job_json, FakeFile, FakeTransport};

    fn image(name: &str) -> UploadImage<FakeFile> {
        UploadImage {
            file: FakeFile::png(name),
            name: name.to_string(),
        }
    }

    #[test]
    fn test_create_job_multipart_layout() {
        let transport = FakeTransport::default();
        transport.reply(200, &job_json("job-1", "pending", 0).to_string());
        let api = client(&transport, &MemoryTokenStore::with_token("tok"));

        let job = block_on(api.create_job(
            vec![image("a.png"), image("b.png")],
            &[AspectRatio::Square],
            Some(VideoProvider::Kling),
        ))
        .unwrap();

        assert_eq!(job.job_id, "job-1");
        let request = &transport.requests()[0];
        assert_eq!(request.url, "http://api.test/api/v1/videos/");
        assert_eq!(request.bearer.as_deref(), Some("tok"));
        let Body::Multipart(parts) = &request.body else {
            panic!("expected multipart body, got {:?}", request.body);
        };
        assert_eq!(parts.len(), 4);
        assert!(matches!(&parts[0], FormPart::File { name, file_name, .. } if name == "images" && file_name == "a.png"));
        assert!(matches!(&parts[1], FormPart::File { file_name, .. } if file_name == "b.png"));
        assert_eq!(
            parts[2],
            FormPart::Text {
                name: "aspect_ratios".into(),
                value: "1:1".into()
            }
        );
        assert_eq!(
            parts[3],
            FormPart::Text {
                name: "video_provider".into(),
                value: "kling".into()
            }
        );
    }

    #[test]
    fn test_ratios_are_comma_joined() {
        let transport = FakeTransport::default();
        transport.reply(200, &job_json("job-1", "pending", 0).to_string());
        let api = client(&transport, &MemoryTokenStore::default());

        block_on(api.create_job(vec![image("a.png")], &AspectRatio::ALL, None)).unwrap();

        let Body::Multipart(parts) = &transport.requests()[0].body else {
            panic!("expected multipart body");
        };
        assert_eq!(parts.len(), 2);
        assert_eq!(
            parts[1],
            FormPart::Text {
                name: "aspect_ratios".into(),
                value: "9:16,1:1,16:9".into()
            }
        );
    }

    #[test]
    fn test_create_job_without_images_sends_nothing() {
        let transport = FakeTransport::default();
        let api = client(&transport, &MemoryTokenStore::default());

        let err = block_on(api.create_job(Vec::new(), &[AspectRatio::Portrait], None)).unwrap_err();

        assert!(matches!(err, ApiError::LocalValidation(_)));
        assert_eq!(transport.request_count(), 0);
    }

    #[test]
    fn test_job_endpoints() {
        let transport = FakeTransport::default();
        transport.reply(200, &job_json("job-9", "processing", 40).to_string());
        transport.reply(200, r#"{"message": "Job deleted"}"#);
        let api = client(&transport, &MemoryTokenStore::default());

        let job = block_on(api.get_job("job-9")).unwrap();
        assert_eq!(job.progress, 40);
        let ack = block_on(api.delete_job("job-9")).unwrap();
        assert_eq!(ack.message.as_deref(), Some("Job deleted"));

        let requests = transport.requests();
        assert_eq!(requests[0].url, "http://api.test/api/v1/videos/job-9");
        assert_eq!(requests[1].method, Method::Delete);
    }

    #[test]
    fn test_list_jobs_tolerates_null_clip_duration() {
        let mut rendering = job_json("job-2", "processing", 60);
        rendering["job_metadata"] = json!({
            "video_clips": [
                {"shot": 0, "aspect_ratio": "9:16", "url": "https://cdn.test/c0.mp4", "duration": null}
            ]
        });
        let transport = FakeTransport::default();
        transport.reply(200, &json!([job_json("job-1", "completed", 100), rendering]).to_string());
        let api = client(&transport, &MemoryTokenStore::with_token("tok"));

        let jobs = block_on(api.list_jobs()).unwrap();

        assert_eq!(jobs.len(), 2);
        assert_eq!(jobs[1].clips().len(), 1);
        assert_eq!(jobs[1].clips()[0].duration, None);
    }

    #[test]
    fn test_list_jobs_drops_only_undecodable_entries() {
        let transport = FakeTransport::default();
        transport.reply(
            200,
            &json!([
                job_json("job-1", "completed", 100),
                {"job_id": "job-2", "status": "exploded"},
                job_json("job-3", "queued", 0),
            ])
            .to_string(),
        );
        let api = client(&transport, &MemoryTokenStore::default());

        let jobs = block_on(api.list_jobs()).unwrap();

        let ids: Vec<_> = jobs.iter().map(|j| j.job_id.as_str()).collect();
        assert_eq!(ids, vec!["job-1", "job-3"]);
    }
}

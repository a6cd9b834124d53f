use std::time::Duration;

use reqwest::Response;
use serde::de::DeserializeOwned;
use url::Url;

use crawldash_core::{CreateJobRequest, Document, Job, JobId};
use crawldash_logging::{dash_debug, dash_trace};

use crate::error::{map_reqwest_error, ServiceError};

pub const DEFAULT_BASE_URL: &str = "http://localhost:4000";

#[derive(Debug, Clone)]
pub struct ServiceSettings {
    pub base_url: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
}

impl Default for ServiceSettings {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
        }
    }
}

/// The remote job/document service as seen by the dashboard.
#[async_trait::async_trait]
pub trait JobService: Send + Sync {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job, ServiceError>;

    async fn list_jobs(&self) -> Result<Vec<Job>, ServiceError>;

    async fn get_job(&self, job_id: &JobId) -> Result<Job, ServiceError>;

    /// Lists a job's documents, filtered server-side when `query` is given.
    async fn list_documents(
        &self,
        job_id: &JobId,
        query: Option<&str>,
    ) -> Result<Vec<Document>, ServiceError>;
}

#[derive(Debug, Clone)]
pub struct ReqwestJobService {
    base_url: Url,
    client: reqwest::Client,
}

impl ReqwestJobService {
    pub fn new(settings: ServiceSettings) -> Result<Self, ServiceError> {
        let base_url = Url::parse(&settings.base_url)
            .map_err(|err| ServiceError::InvalidUrl(format!("{}: {err}", settings.base_url)))?;
        if base_url.cannot_be_a_base() {
            return Err(ServiceError::InvalidUrl(settings.base_url));
        }

        let client = reqwest::Client::builder()
            .connect_timeout(settings.connect_timeout)
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| ServiceError::Connection(err.to_string()))?;

        Ok(Self { base_url, client })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, segments: &[&str]) -> Result<Url, ServiceError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ServiceError::InvalidUrl(self.base_url.to_string()))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn get_json<T: DeserializeOwned>(&self, url: Url) -> Result<T, ServiceError> {
        dash_trace!("GET {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }
}

async fn read_json<T: DeserializeOwned>(response: Response) -> Result<T, ServiceError> {
    let status = response.status();
    if !status.is_success() {
        dash_debug!("{} answered {}", response.url(), status);
        return Err(ServiceError::HttpStatus {
            status: status.as_u16(),
        });
    }
    let body = response.bytes().await.map_err(map_reqwest_error)?;
    serde_json::from_slice(&body).map_err(|err| ServiceError::Decode(err.to_string()))
}

#[async_trait::async_trait]
impl JobService for ReqwestJobService {
    async fn create_job(&self, request: &CreateJobRequest) -> Result<Job, ServiceError> {
        let url = self.endpoint(&["jobs"])?;
        dash_trace!("POST {} url={}", url, request.url());
        let response = self
            .client
            .post(url)
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;
        read_json(response).await
    }

    async fn list_jobs(&self) -> Result<Vec<Job>, ServiceError> {
        let url = self.endpoint(&["jobs"])?;
        self.get_json(url).await
    }

    async fn get_job(&self, job_id: &JobId) -> Result<Job, ServiceError> {
        let url = self.endpoint(&["jobs", job_id.as_str()])?;
        self.get_json(url).await
    }

    async fn list_documents(
        &self,
        job_id: &JobId,
        query: Option<&str>,
    ) -> Result<Vec<Document>, ServiceError> {
        let mut url = self.endpoint(&["jobs", job_id.as_str(), "docs"])?;
        if let Some(query) = query {
            url.query_pairs_mut().append_pair("q", query);
        }
        self.get_json(url).await
    }
}

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};
use url::Url;

use crawldash_logging::dash_warn;

pub const DEFAULT_SEED_URL: &str = "https://docs.firecrawl.dev";
pub const DEFAULT_LIMIT: u32 = 25;
pub const DEFAULT_FORMATS: &str = "markdown,html";
pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 1000;
pub const UNTITLED: &str = "Untitled";

/// Opaque job identifier assigned by the remote service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(#[serde(deserialize_with = "id_from_string_or_number")] String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Document identifier, unique within its job.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DocumentId(#[serde(deserialize_with = "id_from_string_or_number")] String);

impl DocumentId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DocumentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// The service is free to hand out numeric ids; they are kept as text.
fn id_from_string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Text(String),
        Number(serde_json::Number),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Text(text) => text,
        RawId::Number(number) => number.to_string(),
    })
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl JobStatus {
    /// `running` is the only non-terminal status.
    pub fn is_terminal(self) -> bool {
        !matches!(self, JobStatus::Running)
    }

    pub fn label(self) -> &'static str {
        match self {
            JobStatus::Running => "running",
            JobStatus::Completed => "completed",
            JobStatus::Failed => "failed",
            JobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Job {
    pub id: JobId,
    pub url: String,
    pub status: JobStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_docs: Option<u64>,
    pub started_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub finished_at: Option<DateTime<Utc>>,
}

impl Job {
    pub fn is_active(&self) -> bool {
        self.status == JobStatus::Running
    }

    /// `finished_at` is present exactly when the job has left `running`.
    pub fn is_consistent(&self) -> bool {
        self.finished_at.is_some() == self.status.is_terminal()
    }
}

/// Merges a freshly received job with the copy the client already knows.
///
/// A terminal status is final: a response that would move a terminal job back
/// to `running` or to another terminal status is ignored in favour of the
/// known copy.
pub fn reconcile_job(previous: Option<&Job>, incoming: Job) -> Job {
    if !incoming.is_consistent() {
        dash_warn!(
            "job {} reported status={} with finished_at={:?}",
            incoming.id,
            incoming.status,
            incoming.finished_at
        );
    }

    let Some(previous) = previous else {
        return incoming;
    };
    if !previous.status.is_terminal() {
        return incoming;
    }
    if incoming.status != previous.status {
        dash_warn!(
            "ignoring transition {} -> {} for job {}",
            previous.status,
            incoming.status,
            previous.id
        );
        return previous.clone();
    }

    Job {
        finished_at: previous.finished_at.or(incoming.finished_at),
        ..incoming
    }
}

/// Open key/value metadata attached to a document. Key order follows the
/// service response.
pub type Metadata = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: DocumentId,
    #[serde(default)]
    pub title: Option<String>,
    pub url: String,
    #[serde(default)]
    pub markdown: Option<String>,
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default, deserialize_with = "metadata_or_empty")]
    pub metadata: Metadata,
}

impl Document {
    pub fn display_title(&self) -> &str {
        match self.title.as_deref().map(str::trim) {
            Some(title) if !title.is_empty() => title,
            _ => UNTITLED,
        }
    }
}

fn metadata_or_empty<'de, D>(deserializer: D) -> Result<Metadata, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Metadata>::deserialize(deserializer)?.unwrap_or_default())
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateJobError {
    EmptyUrl,
    InvalidUrl(String),
    UnsupportedScheme(String),
    NoFormats,
}

impl fmt::Display for CreateJobError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CreateJobError::EmptyUrl => write!(f, "a seed url is required"),
            CreateJobError::InvalidUrl(reason) => write!(f, "invalid url: {reason}"),
            CreateJobError::UnsupportedScheme(scheme) => {
                write!(f, "unsupported url scheme {scheme}")
            }
            CreateJobError::NoFormats => write!(f, "at least one output format is required"),
        }
    }
}

impl std::error::Error for CreateJobError {}

/// Validated body of a job-creation request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateJobRequest {
    url: String,
    limit: u32,
    formats: String,
}

impl CreateJobRequest {
    /// Validates user input. The limit is clamped into `1..=1000` and the
    /// format list is normalized to comma-separated, trimmed entries.
    pub fn new(url: &str, limit: u32, formats: &str) -> Result<Self, CreateJobError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(CreateJobError::EmptyUrl);
        }
        let parsed = Url::parse(url).map_err(|err| CreateJobError::InvalidUrl(err.to_string()))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(CreateJobError::UnsupportedScheme(parsed.scheme().to_string()));
        }

        let formats = formats
            .split(',')
            .map(str::trim)
            .filter(|format| !format.is_empty())
            .collect::<Vec<_>>()
            .join(",");
        if formats.is_empty() {
            return Err(CreateJobError::NoFormats);
        }

        Ok(Self {
            url: url.to_string(),
            limit: limit.clamp(MIN_LIMIT, MAX_LIMIT),
            formats,
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn formats(&self) -> &str {
        &self.formats
    }
}

impl Default for CreateJobRequest {
    fn default() -> Self {
        Self {
            url: DEFAULT_SEED_URL.to_string(),
            limit: DEFAULT_LIMIT,
            formats: DEFAULT_FORMATS.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn job(status: JobStatus, finished: bool) -> Job {
        let started_at = "2024-05-01T10:00:00Z".parse().unwrap();
        Job {
            id: JobId::new("j1"),
            url: "https://example.com".into(),
            status,
            total_docs: None,
            started_at,
            finished_at: finished.then(|| "2024-05-01T10:05:00Z".parse().unwrap()),
        }
    }

    #[test]
    fn job_parses_camel_case_and_numeric_ids() {
        let parsed: Job = serde_json::from_value(json!({
            "id": 42,
            "url": "https://example.com",
            "status": "completed",
            "totalDocs": 12,
            "startedAt": "2024-05-01T10:00:00Z",
            "finishedAt": "2024-05-01T10:05:00Z"
        }))
        .unwrap();

        assert_eq!(parsed.id.as_str(), "42");
        assert_eq!(parsed.status, JobStatus::Completed);
        assert_eq!(parsed.total_docs, Some(12));
        assert!(parsed.is_consistent());
    }

    #[test]
    fn document_tolerates_missing_fields_and_keeps_metadata_order() {
        let doc: Document = serde_json::from_value(json!({
            "id": "d1",
            "title": "",
            "url": "https://example.com/a",
            "metadata": { "zeta": 1, "alpha": { "nested": true } }
        }))
        .unwrap();

        assert_eq!(doc.display_title(), UNTITLED);
        assert_eq!(doc.markdown, None);
        let keys: Vec<_> = doc.metadata.keys().cloned().collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let bare: Document = serde_json::from_value(json!({
            "id": 1, "url": "https://example.com/b", "metadata": null
        }))
        .unwrap();
        assert!(bare.metadata.is_empty());
    }

    #[test]
    fn terminal_status_is_never_reverted() {
        let done = job(JobStatus::Completed, true);
        let stale = job(JobStatus::Running, false);
        assert_eq!(reconcile_job(Some(&done), stale), done);

        let other_terminal = job(JobStatus::Failed, true);
        assert_eq!(reconcile_job(Some(&done), other_terminal), done);
    }

    #[test]
    fn finished_at_is_kept_once_set() {
        let done = job(JobStatus::Completed, true);
        let mut later = done.clone();
        later.finished_at = Some("2024-05-01T11:00:00Z".parse().unwrap());
        later.total_docs = Some(30);

        let merged = reconcile_job(Some(&done), later);
        assert_eq!(merged.finished_at, done.finished_at);
        assert_eq!(merged.total_docs, Some(30));
    }

    #[test]
    fn running_job_accepts_terminal_transition() {
        let running = job(JobStatus::Running, false);
        let mut done = job(JobStatus::Completed, true);
        done.total_docs = Some(12);
        assert_eq!(reconcile_job(Some(&running), done.clone()), done);
    }

    #[test]
    fn create_request_validates_and_normalizes() {
        let request = CreateJobRequest::new(" https://example.com ", 5000, " markdown, ,html ").unwrap();
        assert_eq!(request.url(), "https://example.com");
        assert_eq!(request.limit(), MAX_LIMIT);
        assert_eq!(request.formats(), "markdown,html");

        assert_eq!(
            CreateJobRequest::new("https://example.com", 0, "markdown").unwrap().limit(),
            MIN_LIMIT
        );
        assert_eq!(CreateJobRequest::new("  ", 25, "markdown"), Err(CreateJobError::EmptyUrl));
        assert_eq!(
            CreateJobRequest::new("ftp://example.com", 25, "markdown"),
            Err(CreateJobError::UnsupportedScheme("ftp".into()))
        );
        assert_eq!(
            CreateJobRequest::new("https://example.com", 25, " , "),
            Err(CreateJobError::NoFormats)
        );
        assert!(matches!(
            CreateJobRequest::new("not a url", 25, "markdown"),
            Err(CreateJobError::InvalidUrl(_))
        ));
    }

    #[test]
    fn create_request_serializes_wire_shape() {
        let body = serde_json::to_value(CreateJobRequest::default()).unwrap();
        assert_eq!(
            body,
            json!({ "url": DEFAULT_SEED_URL, "limit": 25, "formats": "markdown,html" })
        );
    }
}

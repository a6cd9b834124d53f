//! Crawldash client: async access to the remote job/document service.
mod error;
mod handle;
mod service;

pub use error::ServiceError;
pub use handle::{ServiceEvent, ServiceHandle};
pub use service::{JobService, ReqwestJobService, ServiceSettings, DEFAULT_BASE_URL};

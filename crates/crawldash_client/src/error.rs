use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("connection error: {0}")]
    Connection(String),
    #[error("request timed out: {0}")]
    Timeout(String),
    #[error("http status {status}")]
    HttpStatus { status: u16 },
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("runtime error: {0}")]
    Runtime(String),
}

pub(crate) fn map_reqwest_error(err: reqwest::Error) -> ServiceError {
    if err.is_timeout() {
        return ServiceError::Timeout(err.to_string());
    }
    if err.is_decode() {
        return ServiceError::Decode(err.to_string());
    }
    ServiceError::Connection(err.to_string())
}

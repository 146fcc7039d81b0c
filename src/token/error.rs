use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("empty signing secret")]
    EmptySecret,
    #[error("malformed token")]
    Malformed,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("token expired")]
    Expired,
    #[error("invalid token ttl")]
    InvalidTtl,
    #[error("invalid json")]
    Json(#[from] serde_json::Error),
}

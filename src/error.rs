use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("not found")]
    NotFound,

    #[error("insufficient tokens")]
    InsufficientTokens,

    #[error("purchase already credited: {0}")]
    DuplicatePurchase(String),

    #[error("unknown purchase tier: {0}")]
    UnknownTier(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("identity service error: {0}")]
    Identity(String),

    #[error("payment provider error: {0}")]
    Payment(String),

    #[error("unauthorized")]
    Unauthorized,

    #[error("forbidden: {0}")]
    Forbidden(String),

    #[error("no solution: {0}")]
    Unsolvable(String),

    #[error("bad request: {0}")]
    BadRequest(String),
}

pub type Result<T> = std::result::Result<T, Error>;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum PaginateError {
    #[error("Database driver error: {0}")]
    Database(#[from] mongodb::error::Error),

    #[error("Error deserializing record: {0}")]
    Deserialization(#[from] bson::de::Error),

    /// The MongoDB driver only accepts unsigned skip values, so a skip that
    /// resolved below zero (page <= 0) is rejected at the store boundary.
    #[error("Store rejected skip value: {0}")]
    NegativeSkip(i64),

    #[error("Store query failed: {0}")]
    Store(String),
}

pub type PaginateResult<T> = std::result::Result<T, PaginateError>;

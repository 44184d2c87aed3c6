use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("query error: {0}")]
    Query(String),

    #[error("invalid identifier: {0}")]
    InvalidIdentifier(String),
}

impl DatabaseError {
    pub fn connection(err: impl std::fmt::Display) -> Self {
        DatabaseError::Connection(err.to_string())
    }

    pub fn query(err: impl std::fmt::Display) -> Self {
        DatabaseError::Query(err.to_string())
    }
}

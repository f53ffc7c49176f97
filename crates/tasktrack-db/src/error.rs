use sqlx::error::ErrorKind as DbErrorKind;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database connection error: {0}")]
    Connection(String),

    #[error("Query error: {0}")]
    Query(String),

    #[error("Constraint violation: {0}")]
    Constraint(String),

    #[error("Operation cancelled before completion")]
    Cancelled,
}

/// Coarse classification of [`Error`], for callers that only branch on kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Connection,
    Query,
    Constraint,
    Cancelled,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Connection(_) => ErrorKind::Connection,
            Error::Query(_) => ErrorKind::Query,
            Error::Constraint(_) => ErrorKind::Constraint,
            Error::Cancelled => ErrorKind::Cancelled,
        }
    }

    /// Wrap a failure raised while establishing the pool. Anything that goes
    /// wrong before the repository exists is a connection failure.
    pub fn connect(err: sqlx::Error) -> Self {
        Error::Connection(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Database(db_err) => match db_err.kind() {
                DbErrorKind::UniqueViolation
                | DbErrorKind::ForeignKeyViolation
                | DbErrorKind::NotNullViolation
                | DbErrorKind::CheckViolation => {
                    let message = match db_err.constraint() {
                        Some(name) => format!("{} ({})", db_err.message(), name),
                        None => db_err.message().to_string(),
                    };
                    Error::Constraint(message)
                }
                _ => Error::Query(err.to_string()),
            },
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                Error::Connection(err.to_string())
            }
            _ => Error::Query(err.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

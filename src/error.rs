//! Error taxonomy for store access.
use thiserror::Error;

pub type Result<T, E = StoreError> = std::result::Result<T, E>;

/// Failures surfaced by the connection handle and the entity finders.
///
/// Nothing in this crate recovers from these locally; callers decide.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The store could not be opened or stopped answering.
    #[error("store unavailable: {0}")]
    Unavailable(#[source] sqlx::Error),
    /// A statement does not fit the current schema.
    #[error("malformed query: {0}")]
    MalformedQuery(#[source] sqlx::Error),
    /// A single-row finder matched nothing.
    #[error("{entity} not found ({key})")]
    NotFound { entity: &'static str, key: String },
    #[error("schema bootstrap failed: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
    #[error("store error: {0}")]
    Store(#[source] sqlx::Error),
}

impl StoreError {
    pub(crate) fn not_found(entity: &'static str, key: impl Into<String>) -> Self {
        StoreError::NotFound {
            entity,
            key: key.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, StoreError::NotFound { .. })
    }
}

// SQLite primary result codes that mean the file itself is unusable.
const SQLITE_BUSY: i32 = 5;
const SQLITE_LOCKED: i32 = 6;
const SQLITE_IOERR: i32 = 10;
const SQLITE_CANTOPEN: i32 = 14;
const SQLITE_NOTADB: i32 = 26;

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match &err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::Configuration(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err),
            sqlx::Error::Database(db_err) => {
                // Extended codes carry the primary code in the low byte.
                let primary = db_err
                    .code()
                    .and_then(|c| c.parse::<i32>().ok())
                    .map(|c| c & 0xff);
                match primary {
                    Some(
                        SQLITE_BUSY | SQLITE_LOCKED | SQLITE_IOERR | SQLITE_CANTOPEN
                        | SQLITE_NOTADB,
                    ) => StoreError::Unavailable(err),
                    _ => StoreError::MalformedQuery(err),
                }
            }
            sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::ColumnIndexOutOfBounds { .. }
            | sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::TypeNotFound { .. }
            | sqlx::Error::Decode(_) => StoreError::MalformedQuery(err),
            _ => StoreError::Store(err),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_errors_are_unavailable() {
        let err: StoreError = sqlx::Error::PoolClosed.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
        let err: StoreError = sqlx::Error::PoolTimedOut.into();
        assert!(matches!(err, StoreError::Unavailable(_)));
    }

    #[test]
    fn column_errors_are_malformed() {
        let err: StoreError = sqlx::Error::ColumnNotFound("fname".into()).into();
        assert!(matches!(err, StoreError::MalformedQuery(_)));
    }

    #[test]
    fn not_found_message_names_entity() {
        let err = StoreError::not_found("user", "id=7");
        assert!(err.is_not_found());
        assert_eq!(err.to_string(), "user not found (id=7)");
    }
}

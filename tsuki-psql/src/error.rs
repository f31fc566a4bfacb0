use eyre::Report;
use sqlx::Error as SqlxError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DatabaseError {
    #[error("database operation timed out")]
    Timeout,
    #[error("database pool is closed")]
    Closed,
    #[error("failed to execute query")]
    Query(#[source] SqlxError),
    #[error(transparent)]
    Report(#[from] Report),
}

impl From<SqlxError> for DatabaseError {
    fn from(err: SqlxError) -> Self {
        match err {
            SqlxError::PoolTimedOut => Self::Timeout,
            SqlxError::PoolClosed => Self::Closed,
            // the statement or its rows were at fault
            SqlxError::Database(_)
            | SqlxError::RowNotFound
            | SqlxError::TypeNotFound { .. }
            | SqlxError::ColumnNotFound(_)
            | SqlxError::ColumnIndexOutOfBounds { .. }
            | SqlxError::ColumnDecode { .. }
            | SqlxError::Encode(_)
            | SqlxError::Decode(_) => Self::Query(err),
            err => Self::Report(Report::new(err).wrap_err("Database connection failure")),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::{Error as IoError, ErrorKind};

    use super::*;

    #[test]
    fn classify_sqlx_errors() {
        assert!(matches!(
            DatabaseError::from(SqlxError::PoolTimedOut),
            DatabaseError::Timeout
        ));
        assert!(matches!(
            DatabaseError::from(SqlxError::PoolClosed),
            DatabaseError::Closed
        ));
        assert!(matches!(
            DatabaseError::from(SqlxError::RowNotFound),
            DatabaseError::Query(_)
        ));
        assert!(matches!(
            DatabaseError::from(SqlxError::ColumnNotFound("prefix".to_owned())),
            DatabaseError::Query(_)
        ));
    }

    #[test]
    fn transport_errors_are_not_query_errors() {
        let io = SqlxError::Io(IoError::from(ErrorKind::ConnectionReset));
        let report = match DatabaseError::from(io) {
            DatabaseError::Report(report) => report,
            err => panic!("expected report, got {err:?}"),
        };

        assert_eq!(report.to_string(), "Database connection failure");
        assert!(report.root_cause().to_string().contains("reset"));

        let config = SqlxError::Configuration("bad".into());

        assert!(matches!(
            DatabaseError::from(config),
            DatabaseError::Report(_)
        ));

        assert!(matches!(
            DatabaseError::from(SqlxError::Protocol("unexpected message".to_owned())),
            DatabaseError::Report(_)
        ));
    }
}

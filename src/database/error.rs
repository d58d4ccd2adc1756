use sqlx::error::ErrorKind as SqlxErrorKind;

/// Constraint class reported by the database alongside an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintViolation {
    ForeignKey,
    Unique,
}

/// A failure raised while invoking a stored procedure.
///
/// Keeps only what classification needs: the backend's own message text and
/// the constraint signal, so services and tests never depend on driver types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CollaboratorError {
    #[error("{message}")]
    Raised {
        message: String,
        constraint: Option<ConstraintViolation>,
    },
    #[error("timed out waiting for a database connection")]
    PoolTimedOut,
    #[error("{0}")]
    Driver(String),
}

impl CollaboratorError {
    /// An error raised by a stored procedure with the given message.
    pub fn raised(message: impl Into<String>) -> Self {
        CollaboratorError::Raised {
            message: message.into(),
            constraint: None,
        }
    }

    pub fn constraint(message: impl Into<String>, violation: ConstraintViolation) -> Self {
        CollaboratorError::Raised {
            message: message.into(),
            constraint: Some(violation),
        }
    }

    pub fn violation(&self) -> Option<ConstraintViolation> {
        match self {
            CollaboratorError::Raised { constraint, .. } => *constraint,
            _ => None,
        }
    }
}

impl From<sqlx::Error> for CollaboratorError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Database(db_err) => {
                let constraint = match db_err.kind() {
                    SqlxErrorKind::ForeignKeyViolation => Some(ConstraintViolation::ForeignKey),
                    SqlxErrorKind::UniqueViolation => Some(ConstraintViolation::Unique),
                    _ => None,
                };
                CollaboratorError::Raised {
                    message: db_err.message().to_string(),
                    constraint,
                }
            }
            sqlx::Error::PoolTimedOut => CollaboratorError::PoolTimedOut,
            other => CollaboratorError::Driver(other.to_string()),
        }
    }
}

use serde_json::json;

use super::{AppError, ErrorKind};
use crate::database::{CollaboratorError, ConstraintViolation};

/// How a matched error code is turned into an API error.
#[derive(Debug, Clone, Copy)]
enum Outcome {
    NotFound(&'static str),
    /// Forbidden, echoing the collaborator's message.
    Forbidden,
    /// Forbidden with a fixed message.
    ForbiddenWith(&'static str),
    Validation,
    Conflict,
    Unauthorized,
}

/// Error codes embedded in stored-procedure messages, in precedence order.
///
/// Matching is by substring, so an entry whose code contains an earlier one
/// (`ERR_USER_NOT_FOUND` contains `NOT_FOUND`) never fires.
const CODE_RULES: &[(&str, Outcome)] = &[
    ("NOT_FOUND", Outcome::NotFound("Resource")),
    ("FORBIDDEN", Outcome::Forbidden),
    ("BLOCKED", Outcome::ForbiddenWith("User is blocked")),
    ("VALIDATION", Outcome::Validation),
    ("CONFLICT", Outcome::Conflict),
    ("UNAUTHORIZED", Outcome::Unauthorized),
    (
        "ERR_PREMIUM_REQUIRED",
        Outcome::ForbiddenWith("Premium subscription required"),
    ),
    ("ERR_USER_NOT_FOUND", Outcome::NotFound("User")),
    ("ERR_ACTIVITY_NOT_FOUND", Outcome::NotFound("Activity")),
    ("ERR_CATEGORY_NOT_FOUND", Outcome::NotFound("Category")),
];

/// Classifies collaborator failures into the API error taxonomy.
#[derive(Debug, Clone, Copy, Default)]
pub struct ErrorMapper {
    expose_internal: bool,
}

impl ErrorMapper {
    /// `expose_internal` puts the raw backend message into the details of
    /// unclassified errors; only enabled for non-production debug runs.
    pub fn new(expose_internal: bool) -> Self {
        Self { expose_internal }
    }

    pub fn classify(&self, err: &CollaboratorError) -> AppError {
        let raw = err.to_string();

        if let Some(outcome) = CODE_RULES
            .iter()
            .find(|(code, _)| raw.contains(code))
            .map(|(_, outcome)| *outcome)
        {
            return match outcome {
                Outcome::NotFound(resource) => {
                    AppError::not_found(resource).with_details(json!({ "database_error": raw }))
                }
                Outcome::Forbidden => AppError::forbidden(raw),
                Outcome::ForbiddenWith(message) => AppError::forbidden(message),
                Outcome::Validation => AppError::validation(raw),
                Outcome::Conflict => AppError::conflict(raw),
                Outcome::Unauthorized => AppError::unauthorized(raw),
            };
        }

        match err.violation() {
            Some(ConstraintViolation::ForeignKey) => AppError::not_found("Referenced resource"),
            Some(ConstraintViolation::Unique) => AppError::conflict("Resource already exists")
                .with_details(json!({ "database_error": raw })),
            None => {
                let details = if self.expose_internal {
                    json!({ "error": raw })
                } else {
                    json!({})
                };
                AppError::new(ErrorKind::Internal, "An internal error occurred")
                    .with_code("DATABASE_ERROR")
                    .with_details(details)
            }
        }
    }

    /// Classify a failed stored call. Client faults are logged once, by the
    /// response conversion; unhandled failures are logged here with the raw
    /// collaborator text the envelope may hide.
    pub fn map(&self, operation: &'static str, err: CollaboratorError) -> AppError {
        let mapped = self.classify(&err);
        if !mapped.kind().is_client_fault() {
            tracing::error!(operation, error = %err, "unhandled_database_error");
        }
        mapped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    fn mapper() -> ErrorMapper {
        ErrorMapper::new(false)
    }

    #[rstest]
    #[case("ERR_NOT_FOUND: activity missing", ErrorKind::NotFound)]
    #[case("ERR_FORBIDDEN: only the organizer may cancel", ErrorKind::Forbidden)]
    #[case("ERR_BLOCKED", ErrorKind::Forbidden)]
    #[case("ERR_VALIDATION: max_participants below current count", ErrorKind::Validation)]
    #[case("ERR_CONFLICT: already reviewed", ErrorKind::Conflict)]
    #[case("ERR_UNAUTHORIZED", ErrorKind::Unauthorized)]
    #[case("ERR_PREMIUM_REQUIRED", ErrorKind::Forbidden)]
    #[case("ERR_CATEGORY_NOT_FOUND", ErrorKind::NotFound)]
    fn classifies_embedded_error_codes(#[case] message: &str, #[case] kind: ErrorKind) {
        let err = mapper().classify(&CollaboratorError::raised(message));
        assert_eq!(err.kind(), kind);
    }

    #[test]
    fn blocked_users_get_a_fixed_message() {
        let err = mapper().classify(&CollaboratorError::raised("ERR_BLOCKED: user 42"));
        assert_eq!(err.status().as_u16(), 403);
        assert_eq!(err.code(), "FORBIDDEN");
        assert_eq!(err.message(), "User is blocked");
    }

    #[test]
    fn premium_gate_maps_to_forbidden() {
        let err = mapper().classify(&CollaboratorError::raised("ERR_PREMIUM_REQUIRED"));
        assert_eq!(err.message(), "Premium subscription required");
    }

    #[test]
    fn not_found_wins_over_later_codes() {
        let err = mapper().classify(&CollaboratorError::raised(
            "ERR_NOT_FOUND while FORBIDDEN check ran",
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Resource not found");
    }

    #[test]
    fn code_text_takes_precedence_over_constraint_signals() {
        let err = mapper().classify(&CollaboratorError::constraint(
            "ERR_FORBIDDEN",
            ConstraintViolation::Unique,
        ));
        assert_eq!(err.kind(), ErrorKind::Forbidden);
    }

    #[test]
    fn foreign_key_violation_is_a_missing_reference() {
        let err = mapper().classify(&CollaboratorError::constraint(
            "insert or update on table violates foreign key constraint",
            ConstraintViolation::ForeignKey,
        ));
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Referenced resource not found");
    }

    #[test]
    fn unique_violation_is_a_conflict() {
        let err = mapper().classify(&CollaboratorError::constraint(
            "duplicate key value violates unique constraint \"categories_slug_key\"",
            ConstraintViolation::Unique,
        ));
        assert_eq!(err.status().as_u16(), 409);
        assert_eq!(err.code(), "CONFLICT");
    }

    #[test]
    fn unmatched_errors_are_opaque_outside_debug() {
        let err = mapper().classify(&CollaboratorError::Driver("connection reset".into()));
        assert_eq!(err.kind(), ErrorKind::Internal);
        assert_eq!(err.code(), "DATABASE_ERROR");
        assert_eq!(err.message(), "An internal error occurred");
        assert_eq!(err.details(), &json!({}));
    }

    #[test]
    fn unmatched_errors_expose_raw_text_in_debug() {
        let err = ErrorMapper::new(true).classify(&CollaboratorError::Driver(
            "connection reset".into(),
        ));
        assert_eq!(err.details(), &json!({ "error": "connection reset" }));
    }

    #[test]
    fn pool_exhaustion_is_internal() {
        let err = mapper().map("get_activity", CollaboratorError::PoolTimedOut);
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[derive(Clone, Default)]
    struct EventCount(Arc<AtomicUsize>);

    impl<S: tracing::Subscriber> Layer<S> for EventCount {
        fn on_event(&self, _: &tracing::Event<'_>, _: Context<'_, S>) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn events_while(f: impl FnOnce()) -> usize {
        let count = EventCount::default();
        let subscriber = tracing_subscriber::registry().with(count.clone());
        tracing::subscriber::with_default(subscriber, f);
        count.0.load(Ordering::SeqCst)
    }

    #[rstest]
    #[case(CollaboratorError::raised("ERR_CONFLICT: already reviewed"), 0)]
    #[case(CollaboratorError::raised("ERR_NOT_FOUND"), 0)]
    #[case(CollaboratorError::Driver("connection reset".into()), 1)]
    fn only_unhandled_failures_are_logged_when_mapped(
        #[case] err: CollaboratorError,
        #[case] expected: usize,
    ) {
        let logged = events_while(|| {
            mapper().map("create_review", err);
        });
        assert_eq!(logged, expected);
    }
}

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::participant::{PARTICIPANT_COLUMNS, WAITLIST_COLUMNS};
use crate::database::models::{ParticipantRow, WaitlistRow};
use crate::database::{CollaboratorError, Lookup, RowGroup};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ParticipantProcedures: Send + Sync {
    /// Privacy and blocking rules are applied by the procedure.
    async fn participants(
        &self,
        activity_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Lookup<RowGroup<ParticipantRow>>, CollaboratorError>;

    /// Fails with a FORBIDDEN-coded error unless the requester organizes
    /// the activity.
    async fn waitlist(
        &self,
        activity_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Lookup<RowGroup<WaitlistRow>>, CollaboratorError>;
}

pub struct ParticipantOperation {
    db: Arc<PgPool>,
}

impl ParticipantOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ParticipantProcedures for ParticipantOperation {
    async fn participants(
        &self,
        activity_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Lookup<RowGroup<ParticipantRow>>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {PARTICIPANT_COLUMNS} FROM activity.sp_get_activity_participants(
                p_activity_id := $1,
                p_requesting_user_id := $2
            )
            "#
        );

        let rows = sqlx::query_as::<_, ParticipantRow>(&sql)
            .bind(activity_id)
            .bind(requester_id)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::grouped(rows))
    }

    async fn waitlist(
        &self,
        activity_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Lookup<RowGroup<WaitlistRow>>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {WAITLIST_COLUMNS} FROM activity.sp_get_activity_waitlist(
                p_activity_id := $1,
                p_requesting_user_id := $2
            )
            "#
        );

        let rows = sqlx::query_as::<_, WaitlistRow>(&sql)
            .bind(activity_id)
            .bind(requester_id)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::grouped(rows))
    }
}

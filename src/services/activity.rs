use std::sync::Arc;

use uuid::Uuid;

use crate::database::Lookup;
use crate::database::operations::ActivityProcedures;
use crate::error::{AppError, ErrorKind, ErrorMapper};
use crate::models::activity::{
    Activity, ActivityCancel, ActivityCancelResponse, ActivityCreate, ActivityStatus,
    ActivityUpdate, DeleteResponse,
};
use crate::utils::normalize_tags;

pub struct ActivityService {
    store: Arc<dyn ActivityProcedures>,
    errors: ErrorMapper,
}

impl ActivityService {
    pub fn new(store: Arc<dyn ActivityProcedures>, errors: ErrorMapper) -> Self {
        Self { store, errors }
    }

    /// The caller becomes the organizer.
    pub async fn create(
        &self,
        organizer_id: Uuid,
        mut input: ActivityCreate,
    ) -> Result<Activity, AppError> {
        input.tags = normalize_tags(&input.tags);

        let row = self
            .store
            .create(organizer_id, &input)
            .await
            .map_err(|err| self.errors.map("create_activity", err))?
            .found()
            .ok_or_else(|| AppError::new(ErrorKind::NotFound, "Activity creation failed"))?;

        let activity = Activity::try_from(row)?;
        tracing::info!(activity_id = %activity.activity_id, "activity_created");
        Ok(activity)
    }

    /// Annotated with the requester's participation, permissions and
    /// blocking state.
    pub async fn get(&self, activity_id: Uuid, requester_id: Uuid) -> Result<Activity, AppError> {
        let row = self
            .store
            .get(activity_id, requester_id)
            .await
            .map_err(|err| self.errors.map("get_activity", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Activity"))?;

        tracing::info!(activity_id = %activity_id, "activity_retrieved");
        Activity::try_from(row)
    }

    pub async fn update(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        mut changes: ActivityUpdate,
    ) -> Result<Activity, AppError> {
        changes.tags = changes.tags.map(normalize_tags);

        let row = self
            .store
            .update(activity_id, user_id, &changes)
            .await
            .map_err(|err| self.errors.map("update_activity", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Activity"))?;

        tracing::info!(activity_id = %activity_id, "activity_updated");
        Activity::try_from(row)
    }

    pub async fn cancel(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        input: ActivityCancel,
    ) -> Result<ActivityCancelResponse, AppError> {
        let row = self
            .store
            .cancel(activity_id, user_id, input.cancellation_reason)
            .await
            .map_err(|err| self.errors.map("cancel_activity", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Activity"))?;

        let response = ActivityCancelResponse::try_from(row)?;
        if response.status != ActivityStatus::Cancelled {
            tracing::error!(
                activity_id = %activity_id,
                status = %response.status,
                "cancel_returned_wrong_status"
            );
            return Err(AppError::internal("An internal error occurred"));
        }

        tracing::info!(
            activity_id = %activity_id,
            participants_notified = response.participants_notified,
            "activity_cancelled"
        );
        Ok(response)
    }

    /// Only the organizer may delete, and only while nobody else has joined.
    pub async fn delete(&self, activity_id: Uuid, user_id: Uuid) -> Result<DeleteResponse, AppError> {
        let outcome = self
            .store
            .delete(activity_id, user_id)
            .await
            .map_err(|err| self.errors.map("delete_activity", err))?;

        match outcome {
            Lookup::Found(row) => {
                tracing::info!(activity_id = %activity_id, "activity_deleted");
                Ok(DeleteResponse::from(row))
            }
            Lookup::Empty | Lookup::NotFound => Err(AppError::not_found("Activity")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::CollaboratorError;
    use crate::database::models::{CancellationRow, DeletionRow};
    use crate::database::operations::activity::MockActivityProcedures;
    use crate::models::activity::fixtures::activity_row;
    use chrono::Utc;
    use mockall::predicate::eq;

    fn service(mock: MockActivityProcedures) -> ActivityService {
        ActivityService::new(Arc::new(mock), ErrorMapper::new(false))
    }

    fn create_input(tags: &[&str]) -> ActivityCreate {
        serde_json::from_value(serde_json::json!({
            "title": "Sunday hike",
            "description": "A relaxed hike around the lake",
            "scheduled_at": "2030-05-01T09:00:00Z",
            "max_participants": 10,
            "tags": tags,
        }))
        .expect("input")
    }

    #[tokio::test]
    async fn create_normalizes_tags_before_the_call() {
        let organizer = Uuid::new_v4();
        let activity_id = Uuid::new_v4();
        let mut mock = MockActivityProcedures::new();
        mock.expect_create()
            .withf(move |id, input| {
                *id == organizer && input.tags == vec!["Hiking".to_string(), "music".to_string()]
            })
            .times(1)
            .returning(move |id, _| Ok(Lookup::Found(activity_row(activity_id, id))));

        let activity = service(mock)
            .create(organizer, create_input(&["  Hiking ", "", "music"]))
            .await
            .expect("created");
        assert_eq!(activity.activity_id, activity_id);
        assert_eq!(activity.organizer.user_id, organizer);
    }

    #[tokio::test]
    async fn create_without_rows_is_not_found() {
        let mut mock = MockActivityProcedures::new();
        mock.expect_create().returning(|_, _| Ok(Lookup::NotFound));

        let err = service(mock)
            .create(Uuid::new_v4(), create_input(&[]))
            .await
            .expect_err("no rows");
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.message(), "Activity creation failed");
    }

    #[tokio::test]
    async fn get_passes_the_requester_through() {
        let activity_id = Uuid::new_v4();
        let requester = Uuid::new_v4();
        let mut mock = MockActivityProcedures::new();
        mock.expect_get()
            .with(eq(activity_id), eq(requester))
            .times(2)
            .returning(|id, _| Ok(Lookup::Found(activity_row(id, Uuid::nil()))));

        let service = service(mock);
        let first = service.get(activity_id, requester).await.expect("first");
        let second = service.get(activity_id, requester).await.expect("second");
        assert_eq!(first.activity_id, second.activity_id);
        assert_eq!(first.title, second.title);
    }

    #[tokio::test]
    async fn get_unknown_activity_is_not_found() {
        let mut mock = MockActivityProcedures::new();
        mock.expect_get().returning(|_, _| Ok(Lookup::NotFound));

        let err = service(mock)
            .get(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("missing");
        assert_eq!(err.message(), "Activity not found");
    }

    #[tokio::test]
    async fn blocked_users_are_forbidden() {
        let mut mock = MockActivityProcedures::new();
        mock.expect_get()
            .returning(|_, _| Err(CollaboratorError::raised("ERR_BLOCKED: blocked by organizer")));

        let err = service(mock)
            .get(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("blocked");
        assert_eq!(err.status().as_u16(), 403);
        assert_eq!(err.message(), "User is blocked");
    }

    #[tokio::test]
    async fn update_normalizes_present_tags_only() {
        let mut mock = MockActivityProcedures::new();
        mock.expect_update()
            .withf(|_, _, changes| changes.tags == Some(vec!["yoga".to_string()]))
            .returning(|id, user, _| Ok(Lookup::Found(activity_row(id, user))));

        let changes = ActivityUpdate {
            tags: Some(vec![" yoga ".to_string(), " ".to_string()]),
            ..ActivityUpdate::default()
        };
        service(mock)
            .update(Uuid::new_v4(), Uuid::new_v4(), changes)
            .await
            .expect("updated");
    }

    #[tokio::test]
    async fn cancel_reports_notified_participants() {
        let activity_id = Uuid::new_v4();
        let mut mock = MockActivityProcedures::new();
        mock.expect_cancel()
            .withf(|_, _, reason| reason.as_deref() == Some("Rain"))
            .returning(|id, _, _| {
                Ok(Lookup::Found(CancellationRow {
                    activity_id: Some(id),
                    status: "cancelled".to_string(),
                    cancelled_at: Utc::now(),
                    participants_notified_count: 4,
                }))
            });

        let response = service(mock)
            .cancel(
                activity_id,
                Uuid::new_v4(),
                ActivityCancel {
                    cancellation_reason: Some("Rain".to_string()),
                },
            )
            .await
            .expect("cancelled");
        assert_eq!(response.activity_id, activity_id);
        assert_eq!(response.participants_notified, 4);
        assert_eq!(
            response.message,
            "Activity cancelled successfully. All participants have been notified."
        );
    }

    #[tokio::test]
    async fn delete_by_non_organizer_is_forbidden() {
        let mut mock = MockActivityProcedures::new();
        mock.expect_delete().returning(|_, _| {
            Err(CollaboratorError::raised(
                "ERR_FORBIDDEN: Only the organizer can delete this activity",
            ))
        });

        let err = service(mock)
            .delete(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("forbidden");
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.status().as_u16(), 403);
    }

    #[tokio::test]
    async fn delete_returns_the_collaborator_message() {
        let mut mock = MockActivityProcedures::new();
        mock.expect_delete().returning(|_, _| {
            Ok(Lookup::Found(DeletionRow {
                deleted: Some(true),
                message: "Activity deleted".to_string(),
            }))
        });

        let response = service(mock)
            .delete(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect("deleted");
        assert!(response.deleted);
        assert_eq!(response.message, "Activity deleted");
    }
}

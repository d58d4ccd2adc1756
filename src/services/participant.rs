use std::sync::Arc;

use uuid::Uuid;

use crate::database::operations::ParticipantProcedures;
use crate::error::{AppError, ErrorMapper};
use crate::models::participant::{Participant, ParticipantsList, Waitlist, WaitlistEntry};

pub struct ParticipantService {
    store: Arc<dyn ParticipantProcedures>,
    errors: ErrorMapper,
}

impl ParticipantService {
    pub fn new(store: Arc<dyn ParticipantProcedures>, errors: ErrorMapper) -> Self {
        Self { store, errors }
    }

    pub async fn participants(
        &self,
        activity_id: Uuid,
        requester_id: Uuid,
    ) -> Result<ParticipantsList, AppError> {
        let group = self
            .store
            .participants(activity_id, requester_id)
            .await
            .map_err(|err| self.errors.map("list_participants", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Activity"))?;

        let participants = group
            .entries
            .into_iter()
            .map(Participant::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ParticipantsList {
            activity_id: group.head.activity_id,
            total_participants: group.head.total_participants,
            max_participants: group.head.max_participants,
            participants,
        })
    }

    /// Entries are ordered by join time and numbered from 1, whatever order
    /// the rows arrive in.
    pub async fn waitlist(&self, activity_id: Uuid, requester_id: Uuid) -> Result<Waitlist, AppError> {
        let group = self
            .store
            .waitlist(activity_id, requester_id)
            .await
            .map_err(|err| self.errors.map("get_waitlist", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Activity"))?;

        let mut waitlist = group
            .entries
            .into_iter()
            .map(WaitlistEntry::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        waitlist.sort_by_key(|entry| entry.joined_at);
        for (position, entry) in (1..).zip(waitlist.iter_mut()) {
            entry.position = position;
        }

        Ok(Waitlist {
            activity_id: group.head.activity_id,
            total_waitlist: group.head.total_waitlist,
            waitlist,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::models::{ParticipantRow, WaitlistRow};
    use crate::database::operations::participant::MockParticipantProcedures;
    use crate::database::{CollaboratorError, Lookup, RowGroup};
    use chrono::{Duration, Utc};

    fn waitlist_row(activity_id: Uuid, name: &str, minutes_ago: i64) -> WaitlistRow {
        WaitlistRow {
            activity_id,
            total_waitlist: 3,
            user_id: Some(Uuid::new_v4()),
            username: Some(name.to_string()),
            first_name: None,
            main_photo_url: None,
            is_verified: Some(false),
            created_at: Some(Utc::now() - Duration::minutes(minutes_ago)),
            notified_at: None,
        }
    }

    #[tokio::test]
    async fn waitlist_positions_follow_join_order() {
        let activity_id = Uuid::new_v4();
        let rows = vec![
            waitlist_row(activity_id, "carol", 5),
            waitlist_row(activity_id, "alice", 30),
            waitlist_row(activity_id, "bob", 10),
        ];
        let mut mock = MockParticipantProcedures::new();
        mock.expect_waitlist()
            .return_once(move |_, _| Ok(Lookup::grouped(rows)));

        let service = ParticipantService::new(Arc::new(mock), ErrorMapper::default());
        let waitlist = service
            .waitlist(activity_id, Uuid::new_v4())
            .await
            .expect("waitlist");

        let order: Vec<_> = waitlist
            .waitlist
            .iter()
            .map(|entry| (entry.position, entry.username.as_str()))
            .collect();
        assert_eq!(order, vec![(1, "alice"), (2, "bob"), (3, "carol")]);
        assert_eq!(waitlist.total_waitlist, 3);
    }

    #[tokio::test]
    async fn empty_waitlist_keeps_aggregates() {
        let activity_id = Uuid::new_v4();
        let placeholder = WaitlistRow {
            total_waitlist: 0,
            user_id: None,
            username: None,
            created_at: None,
            ..waitlist_row(activity_id, "", 0)
        };
        let mut mock = MockParticipantProcedures::new();
        mock.expect_waitlist()
            .return_once(move |_, _| Ok(Lookup::grouped(vec![placeholder])));

        let service = ParticipantService::new(Arc::new(mock), ErrorMapper::default());
        let waitlist = service
            .waitlist(activity_id, Uuid::new_v4())
            .await
            .expect("waitlist");
        assert!(waitlist.waitlist.is_empty());
        assert_eq!(waitlist.activity_id, activity_id);
    }

    #[tokio::test]
    async fn waitlist_for_non_organizer_is_forbidden() {
        let mut mock = MockParticipantProcedures::new();
        mock.expect_waitlist().returning(|_, _| {
            Err(CollaboratorError::raised(
                "ERR_FORBIDDEN: Only organizers can view the waitlist",
            ))
        });

        let service = ParticipantService::new(Arc::new(mock), ErrorMapper::default());
        let err = service
            .waitlist(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("forbidden");
        assert_eq!(err.status().as_u16(), 403);
    }

    #[tokio::test]
    async fn participant_placeholders_are_dropped() {
        let activity_id = Uuid::new_v4();
        let head = ParticipantRow {
            activity_id,
            total_participants: 0,
            max_participants: 8,
            user_id: None,
            username: None,
            first_name: None,
            main_photo_url: None,
            is_verified: None,
            role: None,
            participation_status: None,
            attendance_status: None,
            joined_at: None,
        };
        let mut mock = MockParticipantProcedures::new();
        mock.expect_participants().return_once(move |_, _| {
            Ok(Lookup::Found(RowGroup {
                head,
                entries: Vec::new(),
            }))
        });

        let service = ParticipantService::new(Arc::new(mock), ErrorMapper::default());
        let list = service
            .participants(activity_id, Uuid::new_v4())
            .await
            .expect("list");
        assert!(list.participants.is_empty());
        assert_eq!(list.max_participants, 8);
    }

    #[tokio::test]
    async fn unknown_activity_has_no_participants() {
        let mut mock = MockParticipantProcedures::new();
        mock.expect_participants()
            .returning(|_, _| Ok(Lookup::NotFound));

        let service = ParticipantService::new(Arc::new(mock), ErrorMapper::default());
        let err = service
            .participants(Uuid::new_v4(), Uuid::new_v4())
            .await
            .expect_err("missing");
        assert_eq!(err.message(), "Activity not found");
    }
}

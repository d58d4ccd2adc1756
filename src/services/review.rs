use std::sync::Arc;

use uuid::Uuid;

use crate::database::Lookup;
use crate::database::operations::ReviewProcedures;
use crate::error::{AppError, ErrorKind, ErrorMapper};
use crate::models::activity::DeleteResponse;
use crate::models::review::{Review, ReviewCreate, ReviewListQuery, ReviewUpdate, ReviewsList};

pub struct ReviewService {
    store: Arc<dyn ReviewProcedures>,
    errors: ErrorMapper,
}

impl ReviewService {
    pub fn new(store: Arc<dyn ReviewProcedures>, errors: ErrorMapper) -> Self {
        Self { store, errors }
    }

    /// Participation and one-review-per-activity are enforced by the
    /// collaborator.
    pub async fn create(
        &self,
        activity_id: Uuid,
        reviewer_id: Uuid,
        input: ReviewCreate,
    ) -> Result<Review, AppError> {
        let row = self
            .store
            .create(activity_id, reviewer_id, &input)
            .await
            .map_err(|err| self.errors.map("create_review", err))?
            .found()
            .ok_or_else(|| AppError::new(ErrorKind::NotFound, "Review creation failed"))?;

        let review = Review::for_requester(row, Some(reviewer_id))?;
        tracing::info!(
            review_id = %review.review_id,
            activity_id = %activity_id,
            rating = review.rating,
            "review_created"
        );
        Ok(review)
    }

    /// An activity without reviews and an unknown activity both come back
    /// with no rows; a second call tells them apart.
    pub async fn list(
        &self,
        activity_id: Uuid,
        requester_id: Option<Uuid>,
        query: ReviewListQuery,
    ) -> Result<ReviewsList, AppError> {
        let outcome = self
            .store
            .list(activity_id, requester_id, query.limit, query.offset)
            .await
            .map_err(|err| self.errors.map("list_reviews", err))?;

        let group = match outcome {
            Lookup::Found(group) => group,
            Lookup::Empty | Lookup::NotFound => {
                let exists = self
                    .store
                    .activity_exists(activity_id)
                    .await
                    .map_err(|err| self.errors.map("check_activity_exists", err))?;
                return if exists {
                    Ok(ReviewsList::empty(activity_id))
                } else {
                    Err(AppError::not_found("Activity"))
                };
            }
        };

        let total_reviews = group
            .head
            .total_reviews
            .unwrap_or(group.entries.len() as i64);
        let average_rating = group.head.average_rating;
        let reviews = group
            .entries
            .into_iter()
            .map(|row| Review::for_requester(row, requester_id))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(ReviewsList {
            activity_id,
            total_reviews,
            average_rating,
            reviews,
        })
    }

    pub async fn update(
        &self,
        review_id: Uuid,
        user_id: Uuid,
        changes: ReviewUpdate,
    ) -> Result<Review, AppError> {
        let row = self
            .store
            .update(review_id, user_id, &changes)
            .await
            .map_err(|err| self.errors.map("update_review", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Review"))?;

        tracing::info!(review_id = %review_id, "review_updated");
        Review::for_requester(row, Some(user_id))
    }

    pub async fn delete(&self, review_id: Uuid, user_id: Uuid) -> Result<DeleteResponse, AppError> {
        let row = self
            .store
            .delete(review_id, user_id)
            .await
            .map_err(|err| self.errors.map("delete_review", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Review"))?;

        tracing::info!(review_id = %review_id, "review_deleted");
        Ok(DeleteResponse::from(row))
    }
}

use std::sync::Arc;

use uuid::Uuid;

use crate::database::models::SummaryRow;
use crate::database::operations::SearchProcedures;
use crate::database::{Keyed, Lookup, RowGroup};
use crate::error::{AppError, ErrorMapper};
use crate::models::search::{
    ActivitySummary, FeedQuery, FeedResponse, NearbyQuery, RecommendationQuery,
    RecommendationsResponse, SearchQuery, SearchResponse,
};

const FEED_REASON: &str = "Based on your interests and past activities";
const RECOMMENDATION_REASON: &str = "Based on collaborative filtering and interest matching";

pub struct SearchService {
    store: Arc<dyn SearchProcedures>,
    errors: ErrorMapper,
}

fn summaries(rows: Vec<SummaryRow>) -> Result<Vec<ActivitySummary>, AppError> {
    rows.into_iter()
        .filter(Keyed::is_present)
        .map(ActivitySummary::try_from)
        .collect()
}

/// The total rides on the first row; no rows at all means no matches.
fn page(
    outcome: Lookup<RowGroup<SummaryRow>>,
    limit: i32,
    offset: i32,
) -> Result<SearchResponse, AppError> {
    let (total_results, activities) = match outcome {
        Lookup::Found(group) => (group.head.total_count.unwrap_or(0), summaries(group.entries)?),
        Lookup::Empty | Lookup::NotFound => (0, Vec::new()),
    };
    Ok(SearchResponse {
        total_results,
        limit,
        offset,
        activities,
    })
}

impl SearchService {
    pub fn new(store: Arc<dyn SearchProcedures>, errors: ErrorMapper) -> Self {
        Self { store, errors }
    }

    pub async fn search(&self, user_id: Uuid, filters: SearchQuery) -> Result<SearchResponse, AppError> {
        let outcome = self
            .store
            .search(user_id, &filters)
            .await
            .map_err(|err| self.errors.map("search_activities", err))?;

        let response = page(outcome, filters.limit, filters.offset)?;
        tracing::info!(
            user_id = %user_id,
            total_results = response.total_results,
            "activities_searched"
        );
        Ok(response)
    }

    pub async fn nearby(&self, user_id: Uuid, filters: NearbyQuery) -> Result<SearchResponse, AppError> {
        let outcome = self
            .store
            .nearby(user_id, &filters)
            .await
            .map_err(|err| self.errors.map("nearby_activities", err))?;

        page(outcome, filters.limit, filters.offset)
    }

    pub async fn feed(&self, user_id: Uuid, query: FeedQuery) -> Result<FeedResponse, AppError> {
        let rows = self
            .store
            .feed(user_id, query.limit)
            .await
            .map_err(|err| self.errors.map("personalized_feed", err))?;

        Ok(FeedResponse {
            activities: summaries(rows)?,
            reason: Some(FEED_REASON.to_string()),
        })
    }

    pub async fn recommendations(
        &self,
        user_id: Uuid,
        query: RecommendationQuery,
    ) -> Result<RecommendationsResponse, AppError> {
        let rows = self
            .store
            .recommendations(user_id, query.limit)
            .await
            .map_err(|err| self.errors.map("recommendations", err))?;

        Ok(RecommendationsResponse {
            activities: summaries(rows)?,
            recommendation_reason: Some(RECOMMENDATION_REASON.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::CollaboratorError;
    use crate::database::operations::search::MockSearchProcedures;
    use crate::error::ErrorKind;
    use crate::models::search::fixtures::summary_row;

    fn service(mock: MockSearchProcedures) -> SearchService {
        SearchService::new(Arc::new(mock), ErrorMapper::default())
    }

    #[tokio::test]
    async fn search_reports_the_head_total() {
        let mut head = summary_row("Board games");
        head.total_count = Some(42);
        let rows = vec![head, summary_row("Pub quiz")];
        let mut mock = MockSearchProcedures::new();
        mock.expect_search()
            .return_once(move |_, _| Ok(Lookup::grouped(rows)));

        let filters = SearchQuery {
            limit: 2,
            offset: 10,
            ..SearchQuery::default()
        };
        let response = service(mock)
            .search(Uuid::new_v4(), filters)
            .await
            .expect("search");
        assert_eq!(response.total_results, 42);
        assert_eq!((response.limit, response.offset), (2, 10));
        assert_eq!(response.activities.len(), 2);
    }

    #[tokio::test]
    async fn search_without_rows_is_an_empty_page() {
        let mut mock = MockSearchProcedures::new();
        mock.expect_search().returning(|_, _| Ok(Lookup::NotFound));

        let response = service(mock)
            .search(Uuid::new_v4(), SearchQuery::default())
            .await
            .expect("search");
        assert_eq!(response.total_results, 0);
        assert!(response.activities.is_empty());
    }

    #[tokio::test]
    async fn premium_language_filter_is_forbidden() {
        let mut mock = MockSearchProcedures::new();
        mock.expect_search()
            .returning(|_, _| Err(CollaboratorError::raised("ERR_PREMIUM_REQUIRED")));

        let err = service(mock)
            .search(Uuid::new_v4(), SearchQuery::default())
            .await
            .expect_err("premium");
        assert_eq!(err.kind(), ErrorKind::Forbidden);
        assert_eq!(err.message(), "Premium subscription required");
    }

    #[tokio::test]
    async fn feed_drops_placeholders_and_explains_itself() {
        let mut mock = MockSearchProcedures::new();
        mock.expect_feed()
            .withf(|_, limit| *limit == 20)
            .returning(|_, _| Ok(vec![summary_row("Run club"), SummaryRow::default()]));

        let response = service(mock)
            .feed(Uuid::new_v4(), FeedQuery { limit: 20 })
            .await
            .expect("feed");
        assert_eq!(response.activities.len(), 1);
        assert_eq!(response.reason.as_deref(), Some(FEED_REASON));
    }

    #[tokio::test]
    async fn over_capacity_rows_are_internal_errors() {
        let mut row = summary_row("Packed");
        row.current_participants_count = Some(11);
        let mut mock = MockSearchProcedures::new();
        mock.expect_recommendations()
            .return_once(move |_, _| Ok(vec![row]));

        let err = service(mock)
            .recommendations(Uuid::new_v4(), RecommendationQuery { limit: 10 })
            .await
            .expect_err("capacity");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}

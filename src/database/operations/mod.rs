// Stored-procedure operations
// One trait per area so services can be driven by test doubles; the Pg*
// implementations issue exactly one stored call per method

pub mod activity;
pub mod category;
pub mod participant;
pub mod review;
pub mod search;
pub mod tag;

use std::sync::Arc;

use sqlx::PgPool;

pub use activity::{ActivityOperation, ActivityProcedures};
pub use category::{CategoryOperation, CategoryProcedures};
pub use participant::{ParticipantOperation, ParticipantProcedures};
pub use review::{ReviewOperation, ReviewProcedures};
pub use search::{SearchOperation, SearchProcedures};
pub use tag::{TagOperation, TagProcedures};

/// Every collaborator the services need.
#[derive(Clone)]
pub struct Procedures {
    pub activities: Arc<dyn ActivityProcedures>,
    pub categories: Arc<dyn CategoryProcedures>,
    pub participants: Arc<dyn ParticipantProcedures>,
    pub reviews: Arc<dyn ReviewProcedures>,
    pub search: Arc<dyn SearchProcedures>,
    pub tags: Arc<dyn TagProcedures>,
}

impl Procedures {
    /// Postgres-backed operations sharing one pool.
    pub fn postgres(pool: PgPool) -> Self {
        let db = Arc::new(pool);
        Self {
            activities: Arc::new(ActivityOperation::new(db.clone())),
            categories: Arc::new(CategoryOperation::new(db.clone())),
            participants: Arc::new(ParticipantOperation::new(db.clone())),
            reviews: Arc::new(ReviewOperation::new(db.clone())),
            search: Arc::new(SearchOperation::new(db.clone())),
            tags: Arc::new(TagOperation::new(db)),
        }
    }
}

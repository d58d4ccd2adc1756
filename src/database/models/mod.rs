// Stored-procedure row types
// One FromRow struct per result shape returned by the activity schema

pub mod activity;
pub mod category;
pub mod participant;
pub mod review;
pub mod search;
pub mod tag;

pub use activity::{ActivityRow, CancellationRow, DeletionRow};
pub use category::CategoryRow;
pub use participant::{ParticipantRow, WaitlistRow};
pub use review::ReviewRow;
pub use search::SummaryRow;
pub use tag::TagRow;

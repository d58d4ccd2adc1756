//! Domain services.
//!
//! Each use case normalizes its input, makes one collaborator call, and
//! shapes the rows into a response. Collaborator failures are classified
//! exactly once, through the service's [`ErrorMapper`](crate::error::ErrorMapper).

pub mod activity;
pub mod category;
pub mod participant;
pub mod review;
pub mod search;
pub mod tag;

pub use activity::ActivityService;
pub use category::CategoryService;
pub use participant::ParticipantService;
pub use review::ReviewService;
pub use search::SearchService;
pub use tag::TagService;

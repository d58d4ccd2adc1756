use std::sync::Arc;

use crate::config::Config;
use crate::database::Procedures;
use crate::error::ErrorMapper;
use crate::infrastructure::auth::TokenVerifier;
use crate::services::{
    ActivityService, CategoryService, ParticipantService, ReviewService, SearchService, TagService,
};

pub mod config;
pub mod database;
pub mod error;
pub mod infrastructure;
pub mod middleware;
pub mod models;
pub mod router;
pub mod routes;
pub mod services;
pub mod utils;

/// Shared, read-only state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub verifier: Arc<TokenVerifier>,
    pub activities: Arc<ActivityService>,
    pub categories: Arc<CategoryService>,
    pub participants: Arc<ParticipantService>,
    pub reviews: Arc<ReviewService>,
    pub search: Arc<SearchService>,
    pub tags: Arc<TagService>,
}

impl AppState {
    pub fn new(config: Config, procedures: Procedures) -> Self {
        let errors = ErrorMapper::new(config.expose_internal_errors());
        let verifier = TokenVerifier::new(&config.jwt_secret_key, config.jwt_algorithm);

        AppState {
            verifier: Arc::new(verifier),
            activities: Arc::new(ActivityService::new(procedures.activities, errors)),
            categories: Arc::new(CategoryService::new(procedures.categories, errors)),
            participants: Arc::new(ParticipantService::new(procedures.participants, errors)),
            reviews: Arc::new(ReviewService::new(procedures.reviews, errors)),
            search: Arc::new(SearchService::new(procedures.search, errors)),
            tags: Arc::new(TagService::new(procedures.tags, errors)),
            config: Arc::new(config),
        }
    }
}

use std::sync::Arc;

use crate::database::operations::TagProcedures;
use crate::error::{AppError, ErrorMapper};
use crate::models::tag::{PopularTags, Tag, TagQuery};

pub struct TagService {
    store: Arc<dyn TagProcedures>,
    errors: ErrorMapper,
}

impl TagService {
    pub fn new(store: Arc<dyn TagProcedures>, errors: ErrorMapper) -> Self {
        Self { store, errors }
    }

    pub async fn popular(&self, query: TagQuery) -> Result<PopularTags, AppError> {
        let limit = query.effective_limit();
        let rows = self
            .store
            .popular(limit, query.prefix)
            .await
            .map_err(|err| self.errors.map("popular_tags", err))?;

        Ok(PopularTags {
            tags: rows.into_iter().map(Tag::from).collect(),
        })
    }
}

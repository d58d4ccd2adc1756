use std::sync::Arc;

use uuid::Uuid;

use crate::database::operations::CategoryProcedures;
use crate::error::{AppError, ErrorKind, ErrorMapper};
use crate::models::category::{Category, CategoryCreate, CategoryList, CategoryUpdate};

pub struct CategoryService {
    store: Arc<dyn CategoryProcedures>,
    errors: ErrorMapper,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryProcedures>, errors: ErrorMapper) -> Self {
        Self { store, errors }
    }

    pub async fn list(&self) -> Result<CategoryList, AppError> {
        let rows = self
            .store
            .list()
            .await
            .map_err(|err| self.errors.map("list_categories", err))?;

        let categories = rows
            .into_iter()
            .map(Category::try_from)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(CategoryList { categories })
    }

    pub async fn create(&self, mut input: CategoryCreate) -> Result<Category, AppError> {
        input.slug = input.slug.to_lowercase();

        let row = self
            .store
            .create(&input)
            .await
            .map_err(|err| self.errors.map("create_category", err))?
            .found()
            .ok_or_else(|| AppError::new(ErrorKind::NotFound, "Category creation failed"))?;

        let category = Category::try_from(row)?;
        tracing::info!(category_id = %category.category_id, slug = %category.slug, "category_created");
        Ok(category)
    }

    pub async fn update(
        &self,
        category_id: Uuid,
        mut changes: CategoryUpdate,
    ) -> Result<Category, AppError> {
        changes.slug = changes.slug.map(|slug| slug.to_lowercase());

        let row = self
            .store
            .update(category_id, &changes)
            .await
            .map_err(|err| self.errors.map("update_category", err))?
            .found()
            .ok_or_else(|| AppError::not_found("Category"))?;

        tracing::info!(category_id = %category_id, "category_updated");
        Category::try_from(row)
    }
}

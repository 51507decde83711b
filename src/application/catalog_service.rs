use serde_json::json;
use uuid::Uuid;

use crate::domain::catalog::{
    CategoryDetail, CategoryPatch, CategoryView, NewCategory, NewProduct, ProductFilter,
    ProductPatch, ProductView,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::{AuditLog, CatalogRepository};
use crate::domain::ListResult;

/// Catalog management: products, variants and the category tree. Every
/// mutation is audited with the acting user.
pub struct CatalogService<R, A> {
    repo: R,
    audit: A,
}

impl<R, A> CatalogService<R, A>
where
    R: CatalogRepository,
    A: AuditLog,
{
    pub fn new(repo: R, audit: A) -> Self {
        Self { repo, audit }
    }

    pub fn create_product(&self, actor: Uuid, input: NewProduct) -> Result<ProductView, DomainError> {
        if !self.repo.category_exists(input.category_id)? {
            return Err(DomainError::InvalidInput("Invalid category ID".to_string()));
        }
        let product = self.repo.create_product(input)?;
        self.audit.record(
            "PRODUCT_CREATED",
            Some(actor),
            json!({ "productId": product.id }),
        );
        Ok(product)
    }

    pub fn update_product(
        &self,
        actor: Uuid,
        id: Uuid,
        patch: ProductPatch,
    ) -> Result<ProductView, DomainError> {
        if let Some(category_id) = patch.category_id {
            if !self.repo.category_exists(category_id)? {
                return Err(DomainError::InvalidInput("Invalid category ID".to_string()));
            }
        }
        let product = self.repo.update_product(id, patch)?;
        self.audit.record(
            "PRODUCT_UPDATED",
            Some(actor),
            json!({ "productId": product.id }),
        );
        Ok(product)
    }

    pub fn delete_product(&self, actor: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete_product(id)?;
        self.audit
            .record("PRODUCT_DELETED", Some(actor), json!({ "productId": id }));
        Ok(())
    }

    pub fn get_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        self.repo.find_product(id)
    }

    pub fn list_products(&self, filter: &ProductFilter) -> Result<ListResult<ProductView>, DomainError> {
        self.repo.list_products(filter)
    }

    pub fn create_category(
        &self,
        actor: Uuid,
        input: NewCategory,
    ) -> Result<CategoryView, DomainError> {
        if self.repo.slug_taken(&input.slug, None)? {
            return Err(DomainError::Conflict("Slug must be unique".to_string()));
        }
        if let Some(parent_id) = input.parent_id {
            if !self.repo.category_exists(parent_id)? {
                return Err(DomainError::InvalidInput(
                    "Invalid parent category ID".to_string(),
                ));
            }
        }
        let category = self.repo.create_category(input)?;
        self.audit.record(
            "CATEGORY_CREATED",
            Some(actor),
            json!({ "categoryId": category.id }),
        );
        Ok(category)
    }

    pub fn update_category(
        &self,
        actor: Uuid,
        id: Uuid,
        patch: CategoryPatch,
    ) -> Result<CategoryView, DomainError> {
        if let Some(slug) = &patch.slug {
            if self.repo.slug_taken(slug, Some(id))? {
                return Err(DomainError::Conflict("Slug must be unique".to_string()));
            }
        }
        if let Some(parent_id) = patch.parent_id {
            if parent_id == id {
                return Err(DomainError::InvalidInput(
                    "Category cannot be its own parent".to_string(),
                ));
            }
            if !self.repo.category_exists(parent_id)? {
                return Err(DomainError::InvalidInput(
                    "Invalid parent category ID".to_string(),
                ));
            }
        }
        let category = self.repo.update_category(id, patch)?;
        self.audit.record(
            "CATEGORY_UPDATED",
            Some(actor),
            json!({ "categoryId": category.id }),
        );
        Ok(category)
    }

    pub fn delete_category(&self, actor: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete_category(id)?;
        self.audit
            .record("CATEGORY_DELETED", Some(actor), json!({ "categoryId": id }));
        Ok(())
    }

    pub fn get_category(&self, id: Uuid) -> Result<Option<CategoryDetail>, DomainError> {
        self.repo.find_category(id)
    }

    pub fn list_categories(&self) -> Result<Vec<CategoryView>, DomainError> {
        self.repo.list_categories()
    }
}

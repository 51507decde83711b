use std::collections::HashMap;

use diesel::dsl::{count_star, exists};
use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::catalog::{
    CategoryDetail, CategoryPatch, CategoryView, NewCategory, NewProduct, NewVariant,
    ProductFilter, ProductPatch, ProductSummary, ProductView, VariantView,
};
use crate::domain::errors::DomainError;
use crate::domain::ports::{CatalogReader, CatalogRepository};
use crate::domain::ListResult;
use crate::schema::{categories, order_items, prescriptions, product_variants, products};

use super::models::{
    CategoryRow, NewCategoryRow, NewProductRow, NewProductVariantRow, ProductRow,
    ProductVariantRow,
};

pub struct DieselCatalogRepository {
    pool: DbPool,
}

impl DieselCatalogRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[derive(AsChangeset)]
#[diesel(table_name = products)]
struct ProductChanges {
    category_id: Option<Uuid>,
    title: Option<String>,
    description: Option<String>,
    price_cents: Option<i32>,
    inventory: Option<i32>,
    prescription_required: Option<bool>,
    emergency_item: Option<bool>,
}

#[derive(AsChangeset)]
#[diesel(table_name = categories)]
struct CategoryChanges {
    name: Option<String>,
    slug: Option<String>,
    description: Option<String>,
    parent_id: Option<Uuid>,
}

fn variant_view(row: ProductVariantRow) -> VariantView {
    VariantView {
        id: row.id,
        size: row.size,
        model: row.model,
        certifications: row.certifications,
        additional_price_cents: row.additional_price_cents,
    }
}

fn product_view(row: ProductRow, variants: Vec<ProductVariantRow>) -> ProductView {
    ProductView {
        id: row.id,
        category_id: row.category_id,
        title: row.title,
        description: row.description,
        price_cents: row.price_cents,
        inventory: row.inventory,
        prescription_required: row.prescription_required,
        emergency_item: row.emergency_item,
        created_at: row.created_at,
        variants: variants.into_iter().map(variant_view).collect(),
    }
}

fn category_view(row: CategoryRow, product_count: i64) -> CategoryView {
    CategoryView {
        id: row.id,
        name: row.name,
        slug: row.slug,
        description: row.description,
        parent_id: row.parent_id,
        product_count,
        created_at: row.created_at,
    }
}

fn new_variant_rows(product_id: Uuid, variants: Vec<NewVariant>) -> Vec<NewProductVariantRow> {
    variants
        .into_iter()
        .map(|v| NewProductVariantRow {
            id: Uuid::new_v4(),
            product_id,
            size: v.size,
            model: v.model,
            certifications: v.certifications,
            additional_price_cents: v.additional_price_cents,
        })
        .collect()
}

fn product_counts(
    conn: &mut PgConnection,
    ids: &[Uuid],
) -> Result<HashMap<Uuid, i64>, DomainError> {
    let rows: Vec<(Uuid, i64)> = products::table
        .filter(products::category_id.eq_any(ids.to_vec()))
        .group_by(products::category_id)
        .select((products::category_id, count_star()))
        .load(conn)?;
    Ok(rows.into_iter().collect())
}

impl CatalogReader for DieselCatalogRepository {
    fn products_for_order(&self, ids: &[Uuid]) -> Result<Vec<ProductSummary>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<ProductRow> = products::table
            .filter(products::id.eq_any(ids.to_vec()))
            .select(ProductRow::as_select())
            .load(&mut conn)?;

        let variants: Vec<Vec<ProductVariantRow>> = ProductVariantRow::belonging_to(&rows)
            .select(ProductVariantRow::as_select())
            .load(&mut conn)?
            .grouped_by(&rows);

        Ok(rows
            .into_iter()
            .zip(variants)
            .map(|(p, vs)| ProductSummary {
                id: p.id,
                title: p.title,
                price_cents: p.price_cents,
                inventory: p.inventory,
                prescription_required: p.prescription_required,
                variant_ids: vs.into_iter().map(|v| v.id).collect(),
            })
            .collect())
    }
}

impl CatalogRepository for DieselCatalogRepository {
    fn create_product(&self, input: NewProduct) -> Result<ProductView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let product_id = Uuid::new_v4();
            let row: ProductRow = diesel::insert_into(products::table)
                .values(&NewProductRow {
                    id: product_id,
                    category_id: input.category_id,
                    title: input.title,
                    description: input.description,
                    price_cents: input.price_cents,
                    inventory: input.inventory,
                    prescription_required: input.prescription_required,
                    emergency_item: input.emergency_item,
                })
                .get_result(conn)?;

            let variants: Vec<ProductVariantRow> = if input.variants.is_empty() {
                Vec::new()
            } else {
                diesel::insert_into(product_variants::table)
                    .values(&new_variant_rows(product_id, input.variants))
                    .get_results(conn)?
            };

            Ok(product_view(row, variants))
        })
    }

    fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<ProductView, DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            let changes = ProductChanges {
                category_id: patch.category_id,
                title: patch.title,
                description: patch.description,
                price_cents: patch.price_cents,
                inventory: patch.inventory,
                prescription_required: patch.prescription_required,
                emergency_item: patch.emergency_item,
            };
            let row: ProductRow =
                diesel::update(products::table.filter(products::id.eq(id)))
                    .set((changes, products::updated_at.eq(diesel::dsl::now)))
                    .get_result(conn)
                    .optional()?
                    .ok_or(DomainError::NotFound("Product"))?;

            // A supplied variant list replaces the existing set; order items
            // keep their history through the SET NULL foreign key.
            if let Some(variants) = patch.variants {
                diesel::delete(
                    product_variants::table.filter(product_variants::product_id.eq(id)),
                )
                .execute(conn)?;
                if !variants.is_empty() {
                    diesel::insert_into(product_variants::table)
                        .values(&new_variant_rows(id, variants))
                        .execute(conn)?;
                }
            }

            let variants = product_variants::table
                .filter(product_variants::product_id.eq(id))
                .select(ProductVariantRow::as_select())
                .load(conn)?;

            Ok(product_view(row, variants))
        })
    }

    fn delete_product(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            products::table
                .filter(products::id.eq(id))
                .select(products::id)
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Product"))?;

            diesel::delete(prescriptions::table.filter(prescriptions::product_id.eq(id)))
                .execute(conn)?;
            diesel::delete(order_items::table.filter(order_items::product_id.eq(id)))
                .execute(conn)?;
            diesel::delete(product_variants::table.filter(product_variants::product_id.eq(id)))
                .execute(conn)?;
            diesel::delete(products::table.filter(products::id.eq(id))).execute(conn)?;

            Ok(())
        })
    }

    fn find_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = products::table
            .filter(products::id.eq(id))
            .select(ProductRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let variants = product_variants::table
            .filter(product_variants::product_id.eq(id))
            .select(ProductVariantRow::as_select())
            .load(&mut conn)?;

        Ok(Some(product_view(row, variants)))
    }

    fn list_products(&self, filter: &ProductFilter) -> Result<ListResult<ProductView>, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (filter.page - 1) * filter.limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let mut count_query = products::table.select(count_star()).into_boxed();
            let mut page_query = products::table.select(ProductRow::as_select()).into_boxed();

            if let Some(category_id) = filter.category_id {
                count_query = count_query.filter(products::category_id.eq(category_id));
                page_query = page_query.filter(products::category_id.eq(category_id));
            }
            if let Some(search) = &filter.search {
                let pattern = format!("%{search}%");
                count_query = count_query.filter(products::title.ilike(pattern.clone()));
                page_query = page_query.filter(products::title.ilike(pattern));
            }
            if let Some(certification) = &filter.certification {
                count_query = count_query.filter(exists(
                    product_variants::table
                        .filter(product_variants::product_id.eq(products::id))
                        .filter(
                            product_variants::certifications
                                .contains(vec![certification.clone()]),
                        ),
                ));
                page_query = page_query.filter(exists(
                    product_variants::table
                        .filter(product_variants::product_id.eq(products::id))
                        .filter(
                            product_variants::certifications
                                .contains(vec![certification.clone()]),
                        ),
                ));
            }

            let total: i64 = count_query.get_result(conn)?;

            let rows: Vec<ProductRow> = page_query
                .order(products::created_at.desc())
                .limit(filter.limit)
                .offset(offset)
                .load(conn)?;

            let variants: Vec<Vec<ProductVariantRow>> = ProductVariantRow::belonging_to(&rows)
                .select(ProductVariantRow::as_select())
                .load(conn)?
                .grouped_by(&rows);

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .zip(variants)
                    .map(|(p, vs)| product_view(p, vs))
                    .collect(),
                total,
            })
        })
    }

    fn create_category(&self, input: NewCategory) -> Result<CategoryView, DomainError> {
        let mut conn = self.pool.get()?;

        let row: CategoryRow = diesel::insert_into(categories::table)
            .values(&NewCategoryRow {
                id: Uuid::new_v4(),
                name: input.name,
                slug: input.slug,
                description: input.description,
                parent_id: input.parent_id,
            })
            .get_result(&mut conn)?;

        Ok(category_view(row, 0))
    }

    fn update_category(&self, id: Uuid, patch: CategoryPatch) -> Result<CategoryView, DomainError> {
        let mut conn = self.pool.get()?;

        let has_changes = patch.name.is_some()
            || patch.slug.is_some()
            || patch.description.is_some()
            || patch.parent_id.is_some();

        let row: CategoryRow = if has_changes {
            diesel::update(categories::table.filter(categories::id.eq(id)))
                .set(CategoryChanges {
                    name: patch.name,
                    slug: patch.slug,
                    description: patch.description,
                    parent_id: patch.parent_id,
                })
                .get_result(&mut conn)
                .optional()?
                .ok_or(DomainError::NotFound("Category"))?
        } else {
            categories::table
                .filter(categories::id.eq(id))
                .select(CategoryRow::as_select())
                .first(&mut conn)
                .optional()?
                .ok_or(DomainError::NotFound("Category"))?
        };

        let count = product_counts(&mut conn, &[id])?
            .remove(&id)
            .unwrap_or(0);
        Ok(category_view(row, count))
    }

    fn delete_category(&self, id: Uuid) -> Result<(), DomainError> {
        let mut conn = self.pool.get()?;

        conn.transaction::<_, DomainError, _>(|conn| {
            categories::table
                .filter(categories::id.eq(id))
                .select(categories::id)
                .first::<Uuid>(conn)
                .optional()?
                .ok_or(DomainError::NotFound("Category"))?;

            let in_use: i64 = products::table
                .filter(products::category_id.eq(id))
                .count()
                .get_result(conn)?;
            if in_use > 0 {
                return Err(DomainError::Conflict(
                    "Category still has products".to_string(),
                ));
            }

            // Orphan direct children rather than cascading the delete.
            diesel::update(categories::table.filter(categories::parent_id.eq(id)))
                .set(categories::parent_id.eq(None::<Uuid>))
                .execute(conn)?;
            diesel::delete(categories::table.filter(categories::id.eq(id))).execute(conn)?;

            Ok(())
        })
    }

    fn find_category(&self, id: Uuid) -> Result<Option<CategoryDetail>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = categories::table
            .filter(categories::id.eq(id))
            .select(CategoryRow::as_select())
            .first(&mut conn)
            .optional()?;

        let Some(row) = row else {
            return Ok(None);
        };

        let children: Vec<CategoryRow> = categories::table
            .filter(categories::parent_id.eq(id))
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)?;

        let mut ids: Vec<Uuid> = children.iter().map(|c| c.id).collect();
        ids.push(id);
        let mut counts = product_counts(&mut conn, &ids)?;

        Ok(Some(CategoryDetail {
            category: category_view(row, counts.remove(&id).unwrap_or(0)),
            children: children
                .into_iter()
                .map(|c| {
                    let count = counts.remove(&c.id).unwrap_or(0);
                    category_view(c, count)
                })
                .collect(),
        }))
    }

    fn list_categories(&self) -> Result<Vec<CategoryView>, DomainError> {
        let mut conn = self.pool.get()?;

        let rows: Vec<CategoryRow> = categories::table
            .order(categories::name.asc())
            .select(CategoryRow::as_select())
            .load(&mut conn)?;

        let ids: Vec<Uuid> = rows.iter().map(|c| c.id).collect();
        let mut counts = product_counts(&mut conn, &ids)?;

        Ok(rows
            .into_iter()
            .map(|c| {
                let count = counts.remove(&c.id).unwrap_or(0);
                category_view(c, count)
            })
            .collect())
    }

    fn category_exists(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let found = categories::table
            .filter(categories::id.eq(id))
            .select(categories::id)
            .first::<Uuid>(&mut conn)
            .optional()?;
        Ok(found.is_some())
    }

    fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let mut query = categories::table
            .filter(categories::slug.eq(slug))
            .select(count_star())
            .into_boxed();
        if let Some(id) = exclude {
            query = query.filter(categories::id.ne(id));
        }
        let count: i64 = query.get_result(&mut conn)?;
        Ok(count > 0)
    }
}

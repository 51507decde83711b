use uuid::Uuid;

use super::catalog::{
    CategoryDetail, CategoryPatch, CategoryView, NewCategory, NewProduct, ProductFilter,
    ProductPatch, ProductSummary, ProductView,
};
use super::errors::DomainError;
use super::order::{OrderView, PricedOrder};
use super::prescription::{
    NewPrescription, PrescriptionDetail, PrescriptionFilter, PrescriptionStatus, PrescriptionView,
    PrescriptionWithProduct,
};
use super::user::{NewUser, UserView};
use super::ListResult;

/// Read access to the catalog, as needed by order validation.
pub trait CatalogReader: Send + Sync + 'static {
    fn products_for_order(&self, ids: &[Uuid]) -> Result<Vec<ProductSummary>, DomainError>;
}

/// Answers whether an approved prescription exists for a (user, product)
/// pair, against data visible before the order transaction begins.
pub trait PrescriptionGate: Send + Sync + 'static {
    fn is_approved(&self, user_id: Uuid, product_id: Uuid) -> Result<bool, DomainError>;
}

/// Transactional persistence boundary for orders. `create` must apply the
/// order row, its items, the guarded inventory decrements, and the audit
/// entry as one atomic unit.
pub trait OrderRepository: Send + Sync + 'static {
    fn create(&self, order: PricedOrder) -> Result<OrderView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<OrderView>, DomainError>;
    fn list(
        &self,
        user_id: Option<Uuid>,
        page: i64,
        limit: i64,
    ) -> Result<ListResult<OrderView>, DomainError>;
}

pub trait CatalogRepository: CatalogReader {
    fn create_product(&self, input: NewProduct) -> Result<ProductView, DomainError>;
    fn update_product(&self, id: Uuid, patch: ProductPatch) -> Result<ProductView, DomainError>;
    fn delete_product(&self, id: Uuid) -> Result<(), DomainError>;
    fn find_product(&self, id: Uuid) -> Result<Option<ProductView>, DomainError>;
    fn list_products(&self, filter: &ProductFilter) -> Result<ListResult<ProductView>, DomainError>;

    fn create_category(&self, input: NewCategory) -> Result<CategoryView, DomainError>;
    fn update_category(&self, id: Uuid, patch: CategoryPatch) -> Result<CategoryView, DomainError>;
    fn delete_category(&self, id: Uuid) -> Result<(), DomainError>;
    fn find_category(&self, id: Uuid) -> Result<Option<CategoryDetail>, DomainError>;
    fn list_categories(&self) -> Result<Vec<CategoryView>, DomainError>;
    fn category_exists(&self, id: Uuid) -> Result<bool, DomainError>;
    fn slug_taken(&self, slug: &str, exclude: Option<Uuid>) -> Result<bool, DomainError>;
}

pub trait PrescriptionRepository: PrescriptionGate {
    fn create(&self, input: NewPrescription) -> Result<PrescriptionView, DomainError>;
    fn for_user(&self, user_id: Uuid) -> Result<Vec<PrescriptionWithProduct>, DomainError>;
    fn list(
        &self,
        filter: &PrescriptionFilter,
    ) -> Result<ListResult<PrescriptionDetail>, DomainError>;
    fn set_status(
        &self,
        id: Uuid,
        status: PrescriptionStatus,
    ) -> Result<PrescriptionView, DomainError>;
}

pub trait UserRepository: Send + Sync + 'static {
    fn create(&self, input: NewUser) -> Result<UserView, DomainError>;
    fn find_by_id(&self, id: Uuid) -> Result<Option<UserView>, DomainError>;
    fn email_taken(&self, email: &str) -> Result<bool, DomainError>;
    fn list(&self, page: i64, limit: i64) -> Result<ListResult<UserView>, DomainError>;
}

/// Append-only audit sink. Failures are swallowed by implementations (logged,
/// never surfaced); audit writes must not fail the operation they describe.
/// The order transaction is the exception: its audit row is written by
/// `OrderRepository::create` inside the atomic unit.
pub trait AuditLog: Send + Sync + 'static {
    fn record(&self, action: &str, user_id: Option<Uuid>, details: serde_json::Value);
}

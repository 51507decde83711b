use serde_json::json;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{AuditLog, CatalogRepository, PrescriptionRepository};
use crate::domain::prescription::{
    NewPrescription, PrescriptionDetail, PrescriptionFilter, PrescriptionStatus, PrescriptionView,
    PrescriptionWithProduct,
};
use crate::domain::ListResult;

/// Prescription intake and review. Approval state feeds the prescription
/// gate consumed by order placement.
pub struct PrescriptionService<P, C, A> {
    repo: P,
    catalog: C,
    audit: A,
}

impl<P, C, A> PrescriptionService<P, C, A>
where
    P: PrescriptionRepository,
    C: CatalogRepository,
    A: AuditLog,
{
    pub fn new(repo: P, catalog: C, audit: A) -> Self {
        Self { repo, catalog, audit }
    }

    pub fn submit(
        &self,
        user_id: Uuid,
        product_id: Uuid,
        document_ref: Option<String>,
    ) -> Result<PrescriptionView, DomainError> {
        let product = self
            .catalog
            .find_product(product_id)?
            .ok_or(DomainError::NotFound("Product"))?;
        if !product.prescription_required {
            return Err(DomainError::InvalidInput(
                "Prescription not required for this product".to_string(),
            ));
        }

        let prescription = self.repo.create(NewPrescription {
            user_id,
            product_id,
            document_ref,
        })?;
        self.audit.record(
            "PRESCRIPTION_SUBMITTED",
            Some(user_id),
            json!({ "productId": product_id, "prescriptionId": prescription.id }),
        );
        Ok(prescription)
    }

    pub fn mine(&self, user_id: Uuid) -> Result<Vec<PrescriptionWithProduct>, DomainError> {
        self.repo.for_user(user_id)
    }

    pub fn list(
        &self,
        filter: &PrescriptionFilter,
    ) -> Result<ListResult<PrescriptionDetail>, DomainError> {
        self.repo.list(filter)
    }

    pub fn review(
        &self,
        actor: Uuid,
        id: Uuid,
        approve: bool,
    ) -> Result<PrescriptionView, DomainError> {
        let status = if approve {
            PrescriptionStatus::Approved
        } else {
            PrescriptionStatus::Rejected
        };
        let prescription = self.repo.set_status(id, status)?;
        let action = if approve {
            "PRESCRIPTION_APPROVED"
        } else {
            "PRESCRIPTION_REJECTED"
        };
        self.audit
            .record(action, Some(actor), json!({ "prescriptionId": id }));
        Ok(prescription)
    }
}

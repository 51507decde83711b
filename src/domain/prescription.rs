use chrono::{DateTime, Utc};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrescriptionStatus {
    Pending,
    Approved,
    Rejected,
}

impl PrescriptionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PrescriptionStatus::Pending => "PENDING",
            PrescriptionStatus::Approved => "APPROVED",
            PrescriptionStatus::Rejected => "REJECTED",
        }
    }
}

impl fmt::Display for PrescriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PrescriptionStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(PrescriptionStatus::Pending),
            "APPROVED" => Ok(PrescriptionStatus::Approved),
            "REJECTED" => Ok(PrescriptionStatus::Rejected),
            other => Err(format!("unknown prescription status '{other}'")),
        }
    }
}

#[derive(Debug, Clone)]
pub struct NewPrescription {
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub document_ref: Option<String>,
}

#[derive(Debug, Clone)]
pub struct PrescriptionView {
    pub id: Uuid,
    pub user_id: Uuid,
    pub product_id: Uuid,
    pub status: PrescriptionStatus,
    pub document_ref: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Owner-facing listing entry.
#[derive(Debug, Clone)]
pub struct PrescriptionWithProduct {
    pub prescription: PrescriptionView,
    pub product_title: String,
}

/// Reviewer-facing listing entry.
#[derive(Debug, Clone)]
pub struct PrescriptionDetail {
    pub prescription: PrescriptionView,
    pub user_email: String,
    pub user_name: Option<String>,
    pub product_title: String,
}

#[derive(Debug, Clone)]
pub struct PrescriptionFilter {
    pub page: i64,
    pub limit: i64,
    pub status: Option<PrescriptionStatus>,
    pub user_id: Option<Uuid>,
}

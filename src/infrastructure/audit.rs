use diesel::prelude::*;
use serde_json::Value;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::ports::AuditLog;
use crate::schema::audit_log;

use super::models::NewAuditLogRow;

/// Append-only audit writer. A failed write is logged and swallowed: the
/// audited operation must not fail because its trail could not be recorded.
pub struct DieselAuditLog {
    pool: DbPool,
}

impl DieselAuditLog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

impl AuditLog for DieselAuditLog {
    fn record(&self, action: &str, user_id: Option<Uuid>, details: Value) {
        let result = self
            .pool
            .get()
            .map_err(|e| e.to_string())
            .and_then(|mut conn| {
                diesel::insert_into(audit_log::table)
                    .values(&NewAuditLogRow {
                        id: Uuid::new_v4(),
                        action: action.to_string(),
                        user_id,
                        details,
                    })
                    .execute(&mut conn)
                    .map_err(|e| e.to_string())
            });

        if let Err(e) = result {
            log::warn!("Failed to write audit log entry '{action}': {e}");
        }
    }
}

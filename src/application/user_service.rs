use serde_json::json;
use uuid::Uuid;

use crate::domain::errors::DomainError;
use crate::domain::ports::{AuditLog, UserRepository};
use crate::domain::user::{NewUser, UserView};
use crate::domain::ListResult;

/// User administration. Credentials never pass through here; authentication
/// lives in the upstream gateway.
pub struct UserService<R, A> {
    repo: R,
    audit: A,
}

impl<R, A> UserService<R, A>
where
    R: UserRepository,
    A: AuditLog,
{
    pub fn new(repo: R, audit: A) -> Self {
        Self { repo, audit }
    }

    pub fn create_user(&self, actor: Uuid, input: NewUser) -> Result<UserView, DomainError> {
        if self.repo.email_taken(&input.email)? {
            return Err(DomainError::Conflict("User already exists".to_string()));
        }
        let user = self.repo.create(input)?;
        self.audit.record(
            "USER_CREATED",
            Some(actor),
            json!({ "createdUserId": user.id, "role": user.role.as_str() }),
        );
        Ok(user)
    }

    pub fn get_user(&self, id: Uuid) -> Result<Option<UserView>, DomainError> {
        self.repo.find_by_id(id)
    }

    pub fn list_users(&self, page: i64, limit: i64) -> Result<ListResult<UserView>, DomainError> {
        self.repo.list(page, limit)
    }
}

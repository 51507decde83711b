use diesel::prelude::*;
use uuid::Uuid;

use crate::db::DbPool;
use crate::domain::errors::DomainError;
use crate::domain::ports::UserRepository;
use crate::domain::user::{NewUser, Role, UserView};
use crate::domain::ListResult;
use crate::schema::users;

use super::models::{NewUserRow, UserRow};

pub struct DieselUserRepository {
    pool: DbPool,
}

impl DieselUserRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn view_from_row(row: UserRow) -> Result<UserView, DomainError> {
    let role = row.role.parse::<Role>().map_err(DomainError::Internal)?;
    Ok(UserView {
        id: row.id,
        email: row.email,
        name: row.name,
        role,
        created_at: row.created_at,
    })
}

impl UserRepository for DieselUserRepository {
    fn create(&self, input: NewUser) -> Result<UserView, DomainError> {
        let mut conn = self.pool.get()?;

        let row: UserRow = diesel::insert_into(users::table)
            .values(&NewUserRow {
                id: Uuid::new_v4(),
                email: input.email,
                name: input.name,
                role: input.role.as_str().to_string(),
            })
            .get_result(&mut conn)?;

        view_from_row(row)
    }

    fn find_by_id(&self, id: Uuid) -> Result<Option<UserView>, DomainError> {
        let mut conn = self.pool.get()?;

        let row = users::table
            .filter(users::id.eq(id))
            .select(UserRow::as_select())
            .first(&mut conn)
            .optional()?;

        row.map(view_from_row).transpose()
    }

    fn email_taken(&self, email: &str) -> Result<bool, DomainError> {
        let mut conn = self.pool.get()?;
        let count: i64 = users::table
            .filter(users::email.eq(email))
            .count()
            .get_result(&mut conn)?;
        Ok(count > 0)
    }

    fn list(&self, page: i64, limit: i64) -> Result<ListResult<UserView>, DomainError> {
        let mut conn = self.pool.get()?;

        let offset = (page - 1) * limit;
        conn.transaction::<_, DomainError, _>(|conn| {
            let total: i64 = users::table.count().get_result(conn)?;

            let rows: Vec<UserRow> = users::table
                .select(UserRow::as_select())
                .order(users::created_at.desc())
                .limit(limit)
                .offset(offset)
                .load(conn)?;

            Ok(ListResult {
                items: rows
                    .into_iter()
                    .map(view_from_row)
                    .collect::<Result<Vec<_>, _>>()?,
                total,
            })
        })
    }
}

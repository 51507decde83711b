pub mod catalog;
pub mod errors;
pub mod order;
pub mod ports;
pub mod prescription;
pub mod user;

/// One page of a paginated query.
#[derive(Debug, Clone)]
pub struct ListResult<T> {
    pub items: Vec<T>,
    pub total: i64,
}

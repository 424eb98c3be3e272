//! Shared HTTP surface: the error taxonomy, pagination envelope, and health
//! payload every service uses.

pub mod db;
mod error;
mod health;
mod pagination;

pub use error::{AppError, Result};
pub use health::{health_response, HealthResponse};
pub use pagination::{PageQuery, PageInfo, Paginated};

//! Domain primitives shared by the persistence layer and its callers.
//!
//! Nothing in this crate touches the database: it holds identifier types,
//! the domain error, input validation rules, and password hashing.

pub mod error;
pub mod password;
pub mod types;
pub mod validation;

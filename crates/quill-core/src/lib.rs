//! # Quill Core
//!
//! The domain layer of the posts service.
//! Holds the `Post` entity, the error types and the repository ports.
//! Nothing in here knows about HTTP or SQL.

pub mod domain;
pub mod error;
pub mod ports;

pub use error::{DomainError, RepoError};

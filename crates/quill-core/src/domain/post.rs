use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::DomainError;

/// Post entity - a blog-style post owned by an external user.
///
/// `id` is `None` until the store assigns one. `version` belongs to the
/// persistence layer and is carried through untouched by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    #[serde(default)]
    pub id: Option<i32>,
    pub user_id: i32,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "body must not be empty"))]
    pub body: String,
    #[serde(default)]
    pub version: Option<i32>,
}

impl Post {
    /// Create a post that has not been stored yet.
    pub fn new(
        id: Option<i32>,
        user_id: i32,
        title: impl Into<String>,
        body: impl Into<String>,
    ) -> Self {
        Self {
            id,
            user_id,
            title: title.into(),
            body: body.into(),
            version: None,
        }
    }

    /// Check the required fields before anything is persisted.
    pub fn ensure_valid(&self) -> Result<(), DomainError> {
        self.validate()
            .map_err(|errors| DomainError::Validation(errors.to_string()))
    }

    /// Full-record replace: take title and body from `changes`,
    /// keep id, user and version from `self`.
    pub fn revise(&self, changes: Post) -> Post {
        Post {
            id: self.id,
            user_id: self.user_id,
            title: changes.title,
            body: changes.body,
            version: self.version,
        }
    }
}

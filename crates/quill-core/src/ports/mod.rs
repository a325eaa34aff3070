//! Ports - trait definitions infrastructure must implement.

mod repository;

pub use repository::{BaseRepository, PostRepository};

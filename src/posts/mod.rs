pub mod manager;
pub mod model;
pub mod store;
pub mod validation;

pub use manager::PostManager;
pub use model::{Comment, Like, NewPost, Post, PostInput};
pub use store::{PostStore, SqlitePostStore, StoreError};

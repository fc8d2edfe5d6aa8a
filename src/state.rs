use std::sync::Arc;

use r2d2::Pool;
use r2d2_sqlite::SqliteConnectionManager;

use crate::auth::Authenticator;
use crate::posts::PostManager;

pub type DbPool = Pool<SqliteConnectionManager>;

#[derive(Clone)]
pub struct AppState {
    pub posts: PostManager,
    pub auth: Arc<dyn Authenticator>,
}

//! HTTP middleware for the storefront.

pub mod auth;
pub mod request_id;

use sqlx::PgPool;
use tower_sessions::{Expiry, SessionManagerLayer, cookie::time};
use tower_sessions_sqlx_store::PostgresStore;

pub use auth::CurrentUser;
pub use request_id::request_id_middleware;

/// Session inactivity expiry.
const SESSION_EXPIRY_DAYS: i64 = 14;

/// Create the session store backed by `PostgreSQL`.
///
/// The store manages its own schema; run `migrate()` on the returned store
/// before serving.
#[must_use]
pub fn create_session_store(pool: &PgPool) -> PostgresStore {
    PostgresStore::new(pool.clone())
}

/// Create the session layer on top of a migrated store.
#[must_use]
pub fn create_session_layer(store: PostgresStore) -> SessionManagerLayer<PostgresStore> {
    SessionManagerLayer::new(store)
        .with_name("jacksnack_session")
        .with_expiry(Expiry::OnInactivity(time::Duration::days(
            SESSION_EXPIRY_DAYS,
        )))
}

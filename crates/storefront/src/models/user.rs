//! User model for session identity.

use chrono::{DateTime, Utc};
use jacksnack_core::{Email, UserId};
use serde::Serialize;

/// A signed-in user. Carts and orders are scoped to a user; nothing more is
/// stored about them.
#[derive(Debug, Clone, Serialize)]
pub struct User {
    pub id: UserId,
    pub email: Email,
    pub created_at: DateTime<Utc>,
}

//! Cart store with live snapshot fan-out.
//!
//! The store is the sole read and write path for cart state. Every mutation
//! goes through the repository and then republishes the user's full line set
//! on a per-user broadcast channel, so observers converge on the same state
//! the database holds. Observation is push-based; the HTTP layer exposes it
//! as a server-sent-event stream, one consumer per session.
//!
//! Known race, left open deliberately: an increment racing a delete of the
//! same line from another device can resurrect the line with only the
//! increment's quantity. Add and remove commute for distinct keys but not for
//! the same key, and nothing here arbitrates that interleaving.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use jacksnack_core::{ProductId, UserId};
use sqlx::PgPool;
use tokio::sync::broadcast;
use tracing::instrument;

use crate::db::{CartRepository, RepositoryError};
use crate::models::{CartLine, Product};

/// Buffered snapshots per subscriber; a receiver that lags past this many
/// updates skips to the newest snapshot, which is always safe because each
/// message is the complete state.
const SNAPSHOT_BUFFER: usize = 16;

/// A full view of one user's cart at a point in time.
pub type CartSnapshot = Vec<CartLine>;

/// Per-user cart store with publish/subscribe change notification.
#[derive(Clone)]
pub struct CartService {
    pool: PgPool,
    subscribers: Arc<Mutex<HashMap<UserId, broadcast::Sender<CartSnapshot>>>>,
}

impl CartService {
    /// Create a new cart service on the given pool.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            subscribers: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Add `quantity` of a product to the user's cart. If a line for the
    /// product exists the quantity is incremented atomically; otherwise a new
    /// line is created. Returns the resulting snapshot.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying statement fails; no
    /// partial state is written.
    #[instrument(skip(self, product), fields(user_id = %user_id, product_id = %product.id))]
    pub async fn add(
        &self,
        user_id: UserId,
        product: &Product,
        quantity: i32,
    ) -> Result<CartSnapshot, RepositoryError> {
        CartRepository::new(&self.pool)
            .upsert_line(user_id, product, quantity)
            .await?;
        self.publish(user_id).await
    }

    /// Remove a product's line from the user's cart. Removing an absent line
    /// is a no-op; the caller never sees an error for it.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying statement fails.
    #[instrument(skip(self), fields(user_id = %user_id, product_id = %product_id))]
    pub async fn remove(
        &self,
        user_id: UserId,
        product_id: &ProductId,
    ) -> Result<CartSnapshot, RepositoryError> {
        CartRepository::new(&self.pool)
            .remove_line(user_id, product_id)
            .await?;
        self.publish(user_id).await
    }

    /// Clear the user's cart in a single atomic statement.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the underlying statement fails.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn clear(&self, user_id: UserId) -> Result<(), RepositoryError> {
        CartRepository::new(&self.pool).clear(user_id).await?;
        self.publish(user_id).await?;
        Ok(())
    }

    /// Current line set for the user.
    ///
    /// # Errors
    ///
    /// Returns `RepositoryError` if the query fails.
    pub async fn items(&self, user_id: UserId) -> Result<CartSnapshot, RepositoryError> {
        CartRepository::new(&self.pool).list(user_id).await
    }

    /// Subscribe to the user's cart. The receiver gets a full snapshot after
    /// every mutation; the current state should be fetched once via
    /// [`Self::items`] before consuming the stream.
    #[must_use]
    pub fn subscribe(&self, user_id: UserId) -> broadcast::Receiver<CartSnapshot> {
        let mut map = self.lock_subscribers();
        map.entry(user_id)
            .or_insert_with(|| broadcast::channel(SNAPSHOT_BUFFER).0)
            .subscribe()
    }

    /// Reload the user's line set and fan it out to subscribers.
    async fn publish(&self, user_id: UserId) -> Result<CartSnapshot, RepositoryError> {
        let snapshot = self.items(user_id).await?;

        let mut map = self.lock_subscribers();
        if let Some(sender) = map.get(&user_id) {
            if sender.receiver_count() == 0 {
                // Last observer went away; drop the channel.
                map.remove(&user_id);
            } else {
                // Send failure only means every receiver disappeared between
                // the count check and the send.
                let _ = sender.send(snapshot.clone());
            }
        }

        Ok(snapshot)
    }

    fn lock_subscribers(
        &self,
    ) -> std::sync::MutexGuard<'_, HashMap<UserId, broadcast::Sender<CartSnapshot>>> {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

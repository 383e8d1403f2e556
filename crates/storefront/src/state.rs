//! Application state shared across handlers.
//!
//! Every client and service is constructed here, once, at startup, and
//! injected into handlers through this state. There are no lazily-initialized
//! globals; the lifecycle of every handle is process start to process
//! shutdown.

use std::sync::Arc;
use std::time::Duration;

use moka::future::Cache;
use sqlx::PgPool;

use crate::config::StorefrontConfig;
use crate::models::Product;
use crate::razorpay::RazorpayClient;
use crate::services::{CartService, CheckoutService, Notifier};

/// Catalog cache TTL; the catalog only changes when the CLI reseeds it.
const CATALOG_CACHE_TTL: Duration = Duration::from_secs(5 * 60);

/// Application state shared across all handlers.
///
/// This struct is cheaply cloneable via `Arc` and provides access to shared
/// resources like database connections and configuration.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    pool: PgPool,
    carts: CartService,
    checkout: CheckoutService,
    notifier: Notifier,
    catalog_cache: Cache<&'static str, Arc<Vec<Product>>>,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Arguments
    ///
    /// * `config` - Storefront configuration
    /// * `pool` - `PostgreSQL` connection pool
    #[must_use]
    pub fn new(config: StorefrontConfig, pool: PgPool) -> Self {
        let razorpay = config.razorpay.as_ref().map(RazorpayClient::new);
        if razorpay.is_none() {
            tracing::warn!("Razorpay credentials missing; only cash on delivery is available");
        }

        let notifier = Notifier::new(config.notifications.clone());
        let carts = CartService::new(pool.clone());
        let checkout = CheckoutService::new(
            pool.clone(),
            config.promo.clone(),
            config.base_url.clone(),
            razorpay,
            carts.clone(),
            notifier.clone(),
        );

        let catalog_cache = Cache::builder().time_to_live(CATALOG_CACHE_TTL).build();

        Self {
            inner: Arc::new(AppStateInner {
                config,
                pool,
                carts,
                checkout,
                notifier,
                catalog_cache,
            }),
        }
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the database connection pool.
    #[must_use]
    pub fn pool(&self) -> &PgPool {
        &self.inner.pool
    }

    /// Get a reference to the cart store.
    #[must_use]
    pub fn carts(&self) -> &CartService {
        &self.inner.carts
    }

    /// Get a reference to the checkout service.
    #[must_use]
    pub fn checkout(&self) -> &CheckoutService {
        &self.inner.checkout
    }

    /// Get a reference to the notification dispatcher.
    #[must_use]
    pub fn notifier(&self) -> &Notifier {
        &self.inner.notifier
    }

    /// Get a reference to the catalog cache.
    #[must_use]
    pub fn catalog_cache(&self) -> &Cache<&'static str, Arc<Vec<Product>>> {
        &self.inner.catalog_cache
    }
}
